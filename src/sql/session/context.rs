use log::{info, warn};

use crate::{
    config::ConnectionConfig,
    connection::executor::StatementExecutor,
    core::{Datum, SQLError},
    sql::parser::normalize_namespace,
};

pub const SET_SCHEMA_SQL: &str = "SET SCHEMA ?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The server was last told to use the default schema, or nothing was
    /// sent yet.
    AtDefault,
    Switched,
}

/// Tracks the schema a single connection resolves unqualified names against.
///
/// The server is the source of truth: every switch sends `SET SCHEMA ?`, even
/// when the requested schema is the one last sent. `current_schema` only
/// records the last switch the server accepted.
#[derive(Debug, Clone)]
pub struct SessionContext {
    default_schema: String,
    current_schema: String,
}

impl SessionContext {
    /// Read the default schema from `config`. Nothing is sent to the server.
    pub fn new(config: &ConnectionConfig) -> Result<Self, SQLError> {
        let schema = config.normalized_schema()?;
        Ok(Self {
            current_schema: schema.clone(),
            default_schema: schema,
        })
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    pub fn current_schema(&self) -> &str {
        &self.current_schema
    }

    pub fn state(&self) -> SessionState {
        if self.current_schema == self.default_schema {
            SessionState::AtDefault
        } else {
            SessionState::Switched
        }
    }

    pub fn switch_namespace<E: StatementExecutor>(
        &mut self,
        executor: &mut E,
        name: &str,
    ) -> Result<(), SQLError> {
        let schema = normalize_namespace(name)?;
        self.send_schema(executor, schema)
    }

    /// Send the configured default, which was validated at construction.
    pub fn reset_to_default<E: StatementExecutor>(
        &mut self,
        executor: &mut E,
    ) -> Result<(), SQLError> {
        let default_schema = self.default_schema.clone();
        self.send_schema(executor, default_schema)
    }

    fn send_schema<E: StatementExecutor>(
        &mut self,
        executor: &mut E,
        schema: String,
    ) -> Result<(), SQLError> {
        info!("Setting current schema to {}", schema);

        if let Err(e) = executor.statement(SET_SCHEMA_SQL, &[Datum::String(schema.clone())]) {
            warn!("SET SCHEMA {} failed: {}", schema, e);
            return Err(e);
        }

        self.current_schema = schema;
        Ok(())
    }
}
