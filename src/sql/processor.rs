use crate::{
    connection::executor::{ResultSet, StatementExecutor},
    core::{Datum, ErrorKind, SQLError},
};

pub const IDENTITY_SQL: &str = "SELECT IDENTITY_VAL_LOCAL() AS ID FROM SYSIBM.SYSDUMMY1";

/// Reshapes DB2 result sets into what callers expect: lower-case column names,
/// and optionally string values without trailing blanks.
///
/// Trailing-blank trimming is off by default. The result set carries no
/// column types, so trimming would also strip blanks stored in `VARCHAR` and
/// `CLOB` values; enable it only for tables read through fixed-width `CHAR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Db2Processor {
    trim_char_padding: bool,
}

impl Db2Processor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_char_trimming(mut self, enabled: bool) -> Self {
        self.trim_char_padding = enabled;
        self
    }

    pub fn trims_char_padding(&self) -> bool {
        self.trim_char_padding
    }

    pub fn process_select(&self, result: ResultSet) -> ResultSet {
        let columns = result
            .columns
            .into_iter()
            .map(|column| column.to_lowercase())
            .collect();

        if !self.trim_char_padding {
            return ResultSet::new(columns, result.rows);
        }

        let rows = result
            .rows
            .into_iter()
            .map(|row| {
                row.map_values(|value| match value {
                    Datum::String(v) => Datum::String(v.trim_end().to_string()),
                    other => other,
                })
            })
            .collect();

        ResultSet::new(columns, rows)
    }

    pub fn process_column_listing(&self, result: &ResultSet) -> Vec<String> {
        let index = result.column_index("COLUMN_NAME").unwrap_or(0);
        result
            .rows
            .iter()
            .filter_map(|row| row.get(index).and_then(Datum::as_string))
            .map(|name| name.trim_end().to_lowercase())
            .collect()
    }

    /// Run `sql` and read back the identity value it generated on this
    /// connection.
    pub fn process_insert_get_id<E: StatementExecutor>(
        &self,
        executor: &mut E,
        sql: &str,
        bindings: &[Datum],
    ) -> Result<i64, SQLError> {
        executor.statement(sql, bindings)?;

        let result = executor.select(IDENTITY_SQL, &[])?;
        result
            .rows
            .first()
            .and_then(|row| row.get(0))
            .and_then(Datum::to_i64)
            .ok_or_else(|| {
                SQLError::new(
                    ErrorKind::StatementExecutionError,
                    "insert did not generate an identity value",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connection::executor::testing::ScriptedExecutor, core::Tuple};

    #[test]
    fn test_process_select_keeps_string_values() {
        let result = ResultSet::new(
            vec!["ID".to_string(), "NOTE".to_string()],
            vec![Tuple::new(vec![Datum::Int(1), Datum::from("  indented   ")])],
        );

        let result = Db2Processor::new().process_select(result);

        assert_eq!(result.columns, vec!["id", "note"]);
        assert_eq!(
            result.rows,
            vec![Tuple::new(vec![Datum::Int(1), Datum::from("  indented   ")])]
        );
    }

    #[test]
    fn test_process_select_trims_char_padding() {
        let result = ResultSet::new(
            vec!["ID".to_string(), "NAME".to_string()],
            vec![Tuple::new(vec![Datum::Int(1), Datum::from("ALICE     ")])],
        );

        let processor = Db2Processor::new().with_char_trimming(true);
        let result = processor.process_select(result);

        assert_eq!(result.columns, vec!["id", "name"]);
        assert_eq!(
            result.rows,
            vec![Tuple::new(vec![Datum::Int(1), Datum::from("ALICE")])]
        );
    }

    #[test]
    fn test_process_column_listing() {
        let result = ResultSet::new(
            vec!["COLUMN_NAME".to_string()],
            vec![
                Tuple::new(vec![Datum::from("ID")]),
                Tuple::new(vec![Datum::from("EMAIL     ")]),
            ],
        );

        assert_eq!(Db2Processor::new().process_column_listing(&result), vec!["id", "email"]);
    }

    #[test]
    fn test_process_insert_get_id() {
        let mut executor = ScriptedExecutor::default().with_result(ResultSet::new(
            vec!["ID".to_string()],
            vec![Tuple::new(vec![Datum::from("17")])],
        ));

        let id = Db2Processor::new()
            .process_insert_get_id(&mut executor, "INSERT INTO t (a) VALUES (?)", &[Datum::Int(1)])
            .unwrap();

        assert_eq!(id, 17);
        assert_eq!(
            executor.sql(),
            vec!["INSERT INTO t (a) VALUES (?)", IDENTITY_SQL]
        );
    }

    #[test]
    fn test_process_insert_get_id_without_identity() {
        let mut executor = ScriptedExecutor::default();
        let err = Db2Processor::new()
            .process_insert_get_id(&mut executor, "INSERT INTO t (a) VALUES (1)", &[])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StatementExecutionError);
    }
}
