//! Connection configuration.

use std::env;

use crate::{
    core::{ErrorKind, SQLError},
    sql::parser::normalize_namespace,
};

pub const DEFAULT_GATEWAY_ADDR: &str = "127.0.0.1:5432";

/// Settings an iSeries connection is constructed from.
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    /// Relational database (RDB) name
    pub database: String,
    /// Prefix prepended to every table name the grammars render
    pub table_prefix: String,
    /// Default schema (library). Required.
    pub schema: Option<String>,
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    pub fn with_table_prefix(mut self, prefix: &str) -> Self {
        self.table_prefix = prefix.to_string();
        self
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    /// Create configuration from environment variables.
    ///
    /// - ISERIES_SCHEMA: default schema (required when the connection is built)
    /// - ISERIES_DATABASE: database name (default: empty)
    /// - ISERIES_TABLE_PREFIX: table prefix (default: empty)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database: lookup("ISERIES_DATABASE").unwrap_or_default(),
            table_prefix: lookup("ISERIES_TABLE_PREFIX").unwrap_or_default(),
            schema: lookup("ISERIES_SCHEMA"),
        }
    }

    /// The configured schema, upper-cased. It must be an ordinary identifier
    /// so that a later reset can send it back unchanged.
    pub fn normalized_schema(&self) -> Result<String, SQLError> {
        match self.schema.as_deref() {
            Some(schema) if !schema.is_empty() => normalize_namespace(schema).map_err(|e| {
                SQLError::new(
                    ErrorKind::ConfigurationError,
                    format!("the \"schema\" setting is not usable: {}", e.message),
                )
            }),
            Some(_) => Err(SQLError::new(
                ErrorKind::ConfigurationError,
                "the \"schema\" setting must not be empty",
            )),
            None => Err(SQLError::new(
                ErrorKind::ConfigurationError,
                "missing required \"schema\" setting",
            )),
        }
    }
}

/// Listen address of the dialect gateway, from ISERIES_GATEWAY_ADDR.
pub fn gateway_addr() -> String {
    env::var("ISERIES_GATEWAY_ADDR").unwrap_or_else(|_| DEFAULT_GATEWAY_ADDR.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::ConnectionConfig;
    use crate::core::ErrorKind;

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("ISERIES_SCHEMA", "payroll"),
            ("ISERIES_TABLE_PREFIX", "pr_"),
        ]
        .into_iter()
        .collect();

        let config = ConnectionConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.schema.as_deref(), Some("payroll"));
        assert_eq!(config.table_prefix, "pr_");
        assert_eq!(config.database, "");
        assert_eq!(config.normalized_schema().unwrap(), "PAYROLL");
    }

    #[test]
    fn test_missing_or_empty_schema() {
        let err = ConnectionConfig::new().normalized_schema().unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigurationError);

        let err = ConnectionConfig::new()
            .with_schema("")
            .normalized_schema()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigurationError);
    }

    #[test]
    fn test_schema_must_be_identifier() {
        for schema in ["my-lib", "1lib", "lib name", "\"lib\""] {
            let err = ConnectionConfig::new()
                .with_schema(schema)
                .normalized_schema()
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::ConfigurationError, "{:?}", schema);
        }

        let schema = ConnectionConfig::new()
            .with_schema("#pay_01")
            .normalized_schema()
            .unwrap();
        assert_eq!(schema, "#PAY_01");
    }
}
