pub mod executor;

use log::debug;
use sqlparser::ast::Statement;

use self::executor::{ResultSet, StatementExecutor};
use crate::{
    config::ConnectionConfig,
    core::{Datum, SQLError},
    schema::Builder,
    sql::{
        grammar::{is_schema_statement, Db2QueryGrammar, Db2SchemaGrammar, Grammar},
        parser::parse_sql,
        processor::Db2Processor,
        session::context::{SessionContext, SessionState},
    },
};

/// Extension points a host connection framework relies on to speak one SQL
/// dialect.
pub trait DatabaseDialect {
    type QueryGrammar;
    type SchemaGrammar;
    type PostProcessor;

    fn default_query_grammar(&self) -> Self::QueryGrammar;

    fn default_schema_grammar(&self) -> Self::SchemaGrammar;

    fn default_post_processor(&self) -> Self::PostProcessor;

    fn default_namespace(&self) -> &str;
}

/// A connection to a DB2 for i server.
///
/// Owns the physical connection, the session's schema state and the dialect
/// grammars. All mutation goes through `&mut self`; share a connection across
/// threads only behind a lock.
#[derive(Debug, Clone)]
pub struct IseriesConnection<E> {
    executor: E,
    database: String,
    table_prefix: String,
    session: SessionContext,
    query_grammar: Db2QueryGrammar,
    schema_grammar: Option<Db2SchemaGrammar>,
    post_processor: Db2Processor,
}

impl<E> DatabaseDialect for IseriesConnection<E> {
    type QueryGrammar = Db2QueryGrammar;
    type SchemaGrammar = Db2SchemaGrammar;
    type PostProcessor = Db2Processor;

    fn default_query_grammar(&self) -> Db2QueryGrammar {
        self.with_table_prefix(Db2QueryGrammar::new())
    }

    fn default_schema_grammar(&self) -> Db2SchemaGrammar {
        self.with_table_prefix(Db2SchemaGrammar::new())
    }

    fn default_post_processor(&self) -> Db2Processor {
        Db2Processor::new()
    }

    fn default_namespace(&self) -> &str {
        self.session.default_schema()
    }
}

impl<E> IseriesConnection<E> {
    /// Fails with `ConfigurationError` when `config` has no schema. The
    /// physical connection is assumed to be open already; nothing is sent.
    pub fn new(executor: E, config: ConnectionConfig) -> Result<Self, SQLError> {
        let session = SessionContext::new(&config)?;

        let mut connection = Self {
            executor,
            database: config.database,
            table_prefix: config.table_prefix,
            session,
            query_grammar: Db2QueryGrammar::new(),
            schema_grammar: None,
            post_processor: Db2Processor::new(),
        };
        connection.use_default_query_grammar();
        connection.use_default_post_processor();

        Ok(connection)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    pub fn default_schema(&self) -> &str {
        self.session.default_schema()
    }

    /// The schema the server last accepted through `SET SCHEMA`.
    pub fn current_schema(&self) -> &str {
        self.session.current_schema()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn with_table_prefix<G: Grammar>(&self, mut grammar: G) -> G {
        grammar.set_table_prefix(&self.table_prefix);
        grammar
    }

    pub fn query_grammar(&self) -> &Db2QueryGrammar {
        &self.query_grammar
    }

    pub fn set_query_grammar(&mut self, grammar: Db2QueryGrammar) {
        self.query_grammar = grammar;
    }

    pub fn use_default_query_grammar(&mut self) {
        self.query_grammar = self.default_query_grammar();
    }

    pub fn schema_grammar(&self) -> Option<&Db2SchemaGrammar> {
        self.schema_grammar.as_ref()
    }

    pub fn set_schema_grammar(&mut self, grammar: Db2SchemaGrammar) {
        self.schema_grammar = Some(grammar);
    }

    pub fn use_default_schema_grammar(&mut self) {
        self.schema_grammar = Some(self.default_schema_grammar());
    }

    pub fn post_processor(&self) -> &Db2Processor {
        &self.post_processor
    }

    pub fn set_post_processor(&mut self, processor: Db2Processor) {
        self.post_processor = processor;
    }

    pub fn use_default_post_processor(&mut self) {
        self.post_processor = self.default_post_processor();
    }

    pub(crate) fn ensure_schema_grammar(&mut self) -> &Db2SchemaGrammar {
        let grammar = match self.schema_grammar.take() {
            Some(grammar) => grammar,
            None => self.default_schema_grammar(),
        };
        self.schema_grammar.insert(grammar)
    }
}

impl<E: StatementExecutor> IseriesConnection<E> {
    pub fn switch_namespace(&mut self, name: &str) -> Result<(), SQLError> {
        self.session.switch_namespace(&mut self.executor, name)
    }

    pub fn reset_to_default(&mut self) -> Result<(), SQLError> {
        self.session.reset_to_default(&mut self.executor)
    }

    /// Builder for DDL on this connection. Installs the default schema grammar
    /// the first time, and keeps whatever grammar is set afterwards.
    pub fn schema_builder(&mut self) -> Builder<'_, E> {
        self.ensure_schema_grammar();
        Builder::new(self)
    }

    /// Render `statement` with the grammar responsible for it.
    pub fn compile(&mut self, statement: Statement) -> Result<String, SQLError> {
        if is_schema_statement(&statement) {
            self.ensure_schema_grammar().compile(statement)
        } else {
            self.query_grammar.compile(statement)
        }
    }

    pub fn select(&mut self, sql: &str, bindings: &[Datum]) -> Result<ResultSet, SQLError> {
        self.select_statement(parse_sql(sql)?, bindings)
    }

    pub fn select_statement(
        &mut self,
        statement: Statement,
        bindings: &[Datum],
    ) -> Result<ResultSet, SQLError> {
        let sql = self.compile(statement)?;
        let result = self.executor.select(&sql, bindings)?;
        debug!("{} returned {} rows", sql, result.rows.len());
        Ok(self.post_processor.process_select(result))
    }

    pub fn statement(&mut self, sql: &str, bindings: &[Datum]) -> Result<(), SQLError> {
        self.run_statement(parse_sql(sql)?, bindings)
    }

    pub fn run_statement(
        &mut self,
        statement: Statement,
        bindings: &[Datum],
    ) -> Result<(), SQLError> {
        let sql = self.compile(statement)?;
        self.executor.statement(&sql, bindings)
    }

    pub fn insert_get_id(&mut self, sql: &str, bindings: &[Datum]) -> Result<i64, SQLError> {
        let sql = self.compile(parse_sql(sql)?)?;
        self.post_processor
            .process_insert_get_id(&mut self.executor, &sql, bindings)
    }

    /// Run an already-compiled catalog query.
    pub(crate) fn select_raw(
        &mut self,
        sql: &str,
        bindings: &[Datum],
    ) -> Result<ResultSet, SQLError> {
        self.executor.select(sql, bindings)
    }
}
