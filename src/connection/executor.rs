use log::info;

use crate::core::{Datum, SQLError, Tuple};

/// Rows returned by a query, with the column names the driver reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Tuple>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Tuple>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }
}

/// The physical connection to the database server.
///
/// Implementations report server-side failures (unknown schema, missing
/// authority, lost connection) as `ErrorKind::StatementExecutionError`.
/// Callers propagate those errors unchanged.
pub trait StatementExecutor {
    /// Execute a statement that returns no rows.
    fn statement(&mut self, sql: &str, bindings: &[Datum]) -> Result<(), SQLError>;

    /// Run a query and collect its rows.
    fn select(&mut self, sql: &str, bindings: &[Datum]) -> Result<ResultSet, SQLError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub bindings: Vec<Datum>,
}

/// Executor that logs statements instead of sending them.
///
/// Queries return an empty result set. Statements are only kept in memory
/// when the executor is built with `recording`.
#[derive(Debug, Clone, Default)]
pub struct DryRunExecutor {
    record: bool,
    executed: Vec<ExecutedStatement>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep every statement for later inspection through `executed`.
    pub fn recording() -> Self {
        Self {
            record: true,
            executed: vec![],
        }
    }

    pub fn executed(&self) -> &[ExecutedStatement] {
        &self.executed
    }

    fn record(&mut self, sql: &str, bindings: &[Datum]) {
        info!("{} {:?}", sql, bindings);
        if self.record {
            self.executed.push(ExecutedStatement {
                sql: sql.to_string(),
                bindings: bindings.to_vec(),
            });
        }
    }
}

impl StatementExecutor for DryRunExecutor {
    fn statement(&mut self, sql: &str, bindings: &[Datum]) -> Result<(), SQLError> {
        self.record(sql, bindings);
        Ok(())
    }

    fn select(&mut self, sql: &str, bindings: &[Datum]) -> Result<ResultSet, SQLError> {
        self.record(sql, bindings);
        Ok(ResultSet::default())
    }
}


#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::{ExecutedStatement, ResultSet, StatementExecutor};
    use crate::core::{Datum, ErrorKind, SQLError};

    /// Records statements and replays canned results and failures in order.
    #[derive(Debug, Default)]
    pub struct ScriptedExecutor {
        pub executed: Vec<ExecutedStatement>,
        results: VecDeque<ResultSet>,
        failures: VecDeque<String>,
    }

    impl ScriptedExecutor {
        pub fn with_result(mut self, result: ResultSet) -> Self {
            self.results.push_back(result);
            self
        }

        /// Fail the next statement with a server-style message.
        pub fn fail_next(&mut self, message: &str) {
            self.failures.push_back(message.to_string());
        }

        pub fn sql(&self) -> Vec<&str> {
            self.executed.iter().map(|s| s.sql.as_str()).collect()
        }

        fn record(&mut self, sql: &str, bindings: &[Datum]) -> Result<(), SQLError> {
            if let Some(message) = self.failures.pop_front() {
                return Err(SQLError::new(ErrorKind::StatementExecutionError, message));
            }
            self.executed.push(ExecutedStatement {
                sql: sql.to_string(),
                bindings: bindings.to_vec(),
            });
            Ok(())
        }
    }

    impl StatementExecutor for ScriptedExecutor {
        fn statement(&mut self, sql: &str, bindings: &[Datum]) -> Result<(), SQLError> {
            self.record(sql, bindings)
        }

        fn select(&mut self, sql: &str, bindings: &[Datum]) -> Result<ResultSet, SQLError> {
            self.record(sql, bindings)?;
            Ok(self.results.pop_front().unwrap_or_default())
        }
    }
}
