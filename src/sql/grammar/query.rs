use std::ops::ControlFlow;

use log::debug;
use sqlparser::ast::{visit_relations_mut, Fetch, Ident, OffsetRows, Query, Statement};

use super::Grammar;
use crate::core::{ErrorKind, SQLError};

/// Renders queries and DML in the DB2 for i dialect.
#[derive(Debug, Clone, Default)]
pub struct Db2QueryGrammar {
    table_prefix: String,
}

impl Grammar for Db2QueryGrammar {
    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }
}

impl Db2QueryGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&self, mut statement: Statement) -> Result<String, SQLError> {
        let mut ctes = vec![];
        match &statement {
            Statement::Query(query) => collect_cte_names(query, &mut ctes),
            Statement::Insert { source, .. } => collect_cte_names(source, &mut ctes),
            _ => {}
        }

        match &mut statement {
            Statement::Query(query) => compile_limit(query)?,
            Statement::Insert { source, .. } => compile_limit(source)?,
            Statement::Update { .. } | Statement::Delete { .. } => {}
            other => {
                return Err(SQLError::new(
                    ErrorKind::GrammarError,
                    format!("not a query or DML statement: {}", other),
                ))
            }
        }

        let flow = visit_relations_mut(&mut statement, |name| {
            // CTE references are not tables
            let is_cte = match name.0.as_slice() {
                [single] => ctes
                    .iter()
                    .any(|cte| cte.value.eq_ignore_ascii_case(&single.value)),
                _ => false,
            };
            if !is_cte {
                self.wrap_table(name);
            }
            ControlFlow::<()>::Continue(())
        });
        if flow.is_break() {
            return Err(SQLError::new(
                ErrorKind::GrammarError,
                "table name rewrite stopped early",
            ));
        }

        let sql = statement.to_string();
        debug!("Compiled query: {}", sql);
        Ok(sql)
    }
}

fn collect_cte_names(query: &Query, names: &mut Vec<Ident>) {
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            names.push(cte.alias.name.clone());
            collect_cte_names(&cte.query, names);
        }
    }
}

/// DB2 for i has no `LIMIT`; row limits are written `FETCH FIRST n ROWS ONLY`
/// after `OFFSET m ROWS`.
fn compile_limit(query: &mut Query) -> Result<(), SQLError> {
    if let Some(limit) = query.limit.take() {
        if query.fetch.is_some() {
            return Err(SQLError::new(
                ErrorKind::GrammarError,
                "query has both LIMIT and FETCH FIRST",
            ));
        }
        query.fetch = Some(Fetch {
            with_ties: false,
            percent: false,
            quantity: Some(limit),
        });
    }

    if let Some(offset) = query.offset.as_mut() {
        offset.rows = OffsetRows::Rows;
    }

    Ok(())
}
