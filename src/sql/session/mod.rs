pub mod context;

use log::info;
use sqlparser::ast::Statement;

use super::parser::{parse_set_schema, parse_sql, SchemaCommand};
use crate::{
    connection::{executor::StatementExecutor, IseriesConnection},
    core::{Datum, SQLError, Tuple},
};

/// Kind of SQL statement, used for Postgres protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SQLKind {
    Query,
    Execute,
}

#[derive(Debug)]
pub struct QueryResult {
    pub fields: Vec<String>,
    pub data: Vec<Tuple>,
    pub kind: SQLKind,
}

impl QueryResult {
    fn executed() -> Self {
        Self {
            fields: vec![],
            data: vec![],
            kind: SQLKind::Execute,
        }
    }
}

/// Runs SQL text typed by a client against one connection.
pub struct Session<E> {
    conn: IseriesConnection<E>,
}

impl<E: StatementExecutor> Session<E> {
    pub fn new(conn: IseriesConnection<E>) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &IseriesConnection<E> {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut IseriesConnection<E> {
        &mut self.conn
    }

    pub fn execute(&mut self, sql_text: &str) -> Result<QueryResult, SQLError> {
        info!("Executing SQL: {}", sql_text);

        if let Some(command) = parse_set_schema(sql_text)? {
            match command {
                SchemaCommand::Switch(name) => self.conn.switch_namespace(&name)?,
                SchemaCommand::Reset => self.conn.reset_to_default()?,
            }
            return Ok(QueryResult::executed());
        }

        match parse_sql(sql_text)? {
            // Show the DB2 text instead of running it
            Statement::Explain { statement, .. } => {
                let sql = self.conn.compile(*statement)?;
                Ok(QueryResult {
                    fields: vec!["sql".to_string()],
                    data: vec![Tuple::new(vec![Datum::String(sql)])],
                    kind: SQLKind::Query,
                })
            }
            statement @ Statement::Query(_) => {
                let result = self.conn.select_statement(statement, &[])?;
                Ok(QueryResult {
                    fields: result.columns,
                    data: result.rows,
                    kind: SQLKind::Query,
                })
            }
            statement => {
                self.conn.run_statement(statement, &[])?;
                Ok(QueryResult::executed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ConnectionConfig,
        connection::executor::{testing::ScriptedExecutor, ResultSet},
        core::ErrorKind,
        sql::session::context::{SessionState, SET_SCHEMA_SQL},
    };

    fn session(executor: ScriptedExecutor) -> Session<ScriptedExecutor> {
        let config = ConnectionConfig::new().with_schema("qgpl");
        Session::new(IseriesConnection::new(executor, config).unwrap())
    }

    #[test]
    fn test_set_schema() {
        let mut session = session(ScriptedExecutor::default());

        let result = session.execute("SET SCHEMA reporting").unwrap();
        assert_eq!(result.kind, SQLKind::Execute);
        assert_eq!(session.connection().current_schema(), "REPORTING");

        session.execute("SET SCHEMA DEFAULT").unwrap();
        assert_eq!(session.connection().session_state(), SessionState::AtDefault);

        let executed = &session.connection().executor().executed;
        assert_eq!(executed.len(), 2);
        assert_eq!(executed[0].sql, SET_SCHEMA_SQL);
        assert_eq!(executed[0].bindings, vec![Datum::from("REPORTING")]);
        assert_eq!(executed[1].bindings, vec![Datum::from("QGPL")]);
    }

    #[test]
    fn test_set_schema_rejects_bad_name() {
        let mut session = session(ScriptedExecutor::default());
        let err = session.execute("SET SCHEMA '1bad'").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNamespaceError);

        let err = session.execute("SET SCHEMA \"lower\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNamespaceError);
        assert_eq!(session.connection().current_schema(), "QGPL");
        assert!(session.connection().executor().executed.is_empty());
    }

    #[test]
    fn test_explain_shows_db2_sql() {
        let mut session = session(ScriptedExecutor::default());

        let result = session
            .execute("EXPLAIN SELECT * FROM orders LIMIT 3")
            .unwrap();

        assert_eq!(result.kind, SQLKind::Query);
        assert_eq!(
            result.data,
            vec![Tuple::new(vec![Datum::from(
                "SELECT * FROM orders FETCH FIRST 3 ROWS ONLY"
            )])]
        );
        assert!(session.connection().executor().executed.is_empty());
    }

    #[test]
    fn test_query_and_statement() {
        let rows = ResultSet::new(
            vec!["ID".to_string()],
            vec![Tuple::new(vec![Datum::Int(1)])],
        );
        let mut session = session(ScriptedExecutor::default().with_result(rows));

        let result = session.execute("SELECT id FROM orders").unwrap();
        assert_eq!(result.kind, SQLKind::Query);
        assert_eq!(result.fields, vec!["id"]);
        assert_eq!(result.data.len(), 1);

        let result = session.execute("DELETE FROM orders WHERE id = 1").unwrap();
        assert_eq!(result.kind, SQLKind::Execute);
        assert_eq!(
            session.connection().executor().sql(),
            vec!["SELECT id FROM orders", "DELETE FROM orders WHERE id = 1"]
        );
    }
}
