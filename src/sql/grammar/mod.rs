use sqlparser::ast::{ObjectName, Statement};

pub mod query;
pub mod schema;

pub use query::Db2QueryGrammar;
pub use schema::Db2SchemaGrammar;

/// Grammar state shared by query and schema grammars.
pub trait Grammar {
    fn table_prefix(&self) -> &str;

    fn set_table_prefix(&mut self, prefix: &str);

    /// Prepend the table prefix to the object part of `name`, leaving any
    /// schema qualifier alone.
    fn wrap_table(&self, name: &mut ObjectName) {
        let prefix = self.table_prefix();
        if prefix.is_empty() {
            return;
        }
        if let Some(table) = name.0.last_mut() {
            table.value = format!("{}{}", prefix, table.value);
        }
    }
}

/// Whether `statement` is DDL, rendered by the schema grammar.
pub fn is_schema_statement(statement: &Statement) -> bool {
    matches!(
        statement,
        Statement::CreateTable { .. }
            | Statement::AlterTable { .. }
            | Statement::Drop { .. }
            | Statement::CreateIndex { .. }
            | Statement::CreateSchema { .. }
            | Statement::Truncate { .. }
    )
}
