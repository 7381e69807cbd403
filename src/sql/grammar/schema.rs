use log::debug;
use sqlparser::ast::{DataType, ObjectType, Statement};

use super::Grammar;
use crate::core::{ErrorKind, SQLError};

/// Renders DDL in the DB2 for i dialect and the catalog queries the schema
/// builder runs against the `QSYS2` system views.
#[derive(Debug, Clone, Default)]
pub struct Db2SchemaGrammar {
    table_prefix: String,
}

impl Grammar for Db2SchemaGrammar {
    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }
}

impl Db2SchemaGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings: schema, table.
    pub fn compile_table_exists(&self) -> &'static str {
        "SELECT * FROM QSYS2.SYSTABLES WHERE TABLE_SCHEMA = UPPER(?) AND TABLE_NAME = UPPER(?)"
    }

    /// Bindings: schema, table.
    pub fn compile_column_listing(&self) -> &'static str {
        "SELECT COLUMN_NAME FROM QSYS2.SYSCOLUMNS WHERE TABLE_SCHEMA = UPPER(?) AND TABLE_NAME = UPPER(?)"
    }

    pub fn compile(&self, mut statement: Statement) -> Result<String, SQLError> {
        match &mut statement {
            Statement::CreateTable { name, columns, .. } => {
                self.wrap_table(name);
                for column in columns.iter_mut() {
                    column.data_type = db2_type(&column.data_type);
                }
            }
            Statement::AlterTable { name, .. } | Statement::Truncate { table_name: name, .. } => {
                self.wrap_table(name)
            }
            Statement::CreateIndex { table_name, .. } => self.wrap_table(table_name),
            Statement::Drop {
                object_type,
                if_exists,
                names,
                ..
            } => {
                if *if_exists {
                    return Err(SQLError::new(
                        ErrorKind::GrammarError,
                        "DROP ... IF EXISTS is not supported, check the catalog first",
                    ));
                }
                if matches!(object_type, ObjectType::Table | ObjectType::View) {
                    names.iter_mut().for_each(|name| self.wrap_table(name));
                }
            }
            Statement::CreateSchema { .. } => {}
            other => {
                return Err(SQLError::new(
                    ErrorKind::GrammarError,
                    format!("not a schema statement: {}", other),
                ))
            }
        }

        let sql = statement.to_string();
        debug!("Compiled schema statement: {}", sql);
        Ok(sql)
    }
}

fn db2_type(data_type: &DataType) -> DataType {
    match data_type {
        DataType::Text => DataType::Clob(None),
        // BOOLEAN columns only exist from IBM i 7.5 on.
        DataType::Boolean => DataType::SmallInt(None),
        other => other.clone(),
    }
}
