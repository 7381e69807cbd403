use crate::{
    connection::{executor::StatementExecutor, IseriesConnection},
    core::{Datum, SQLError},
    sql::{grammar::Grammar, parser::parse_sql},
};

/// Schema (DDL) operations bound to one connection.
pub struct Builder<'a, E> {
    conn: &'a mut IseriesConnection<E>,
}

impl<'a, E: StatementExecutor> Builder<'a, E> {
    pub fn new(conn: &'a mut IseriesConnection<E>) -> Self {
        Self { conn }
    }

    /// Split `table` into (schema, prefixed table name).
    ///
    /// `LIB.TABLE` and `RDB.LIB.TABLE` name their schema explicitly; an
    /// unqualified name lives in the session's current schema.
    pub fn resolve_table(&mut self, table: &str) -> (String, String) {
        let prefix = self.conn.ensure_schema_grammar().table_prefix().to_string();
        let mut parts = table.rsplitn(3, '.');
        let name = parts.next().unwrap_or_default();
        let schema = match parts.next() {
            Some(schema) => schema.to_string(),
            None => self.conn.current_schema().to_string(),
        };
        (schema, format!("{}{}", prefix, name))
    }

    pub fn has_table(&mut self, table: &str) -> Result<bool, SQLError> {
        let (schema, table) = self.resolve_table(table);
        let sql = self.conn.ensure_schema_grammar().compile_table_exists();

        let result = self
            .conn
            .select_raw(sql, &[Datum::String(schema), Datum::String(table)])?;
        Ok(!result.rows.is_empty())
    }

    /// Column names of `table`, lower-cased.
    pub fn get_column_listing(&mut self, table: &str) -> Result<Vec<String>, SQLError> {
        let (schema, table) = self.resolve_table(table);
        let sql = self.conn.ensure_schema_grammar().compile_column_listing();

        let result = self
            .conn
            .select_raw(sql, &[Datum::String(schema), Datum::String(table)])?;
        Ok(self.conn.post_processor().process_column_listing(&result))
    }

    pub fn has_column(&mut self, table: &str, column: &str) -> Result<bool, SQLError> {
        let column = column.to_lowercase();
        Ok(self
            .get_column_listing(table)?
            .iter()
            .any(|name| *name == column))
    }

    /// Run a DDL statement through the schema grammar.
    pub fn create(&mut self, sql: &str) -> Result<(), SQLError> {
        let sql = self.conn.ensure_schema_grammar().compile(parse_sql(sql)?)?;
        self.conn.executor_mut().statement(&sql, &[])
    }

    pub fn drop(&mut self, table: &str) -> Result<(), SQLError> {
        self.create(&format!("DROP TABLE {}", table))
    }

    pub fn drop_if_exists(&mut self, table: &str) -> Result<(), SQLError> {
        if self.has_table(table)? {
            self.drop(table)?;
        }
        Ok(())
    }
}
