//! DB2 for i (iSeries) dialect support for a relational connection layer:
//! per-connection current schema state, query and schema grammars, and
//! result post-processing.

pub mod cli;
pub mod config;
pub mod connection;
pub mod core;
pub mod schema;
pub mod server;
pub mod sql;
pub mod util;

pub use config::ConnectionConfig;
pub use connection::{
    executor::{DryRunExecutor, ResultSet, StatementExecutor},
    DatabaseDialect, IseriesConnection,
};
pub use crate::core::{Datum, ErrorKind, SQLError, Tuple};
pub use sql::Session;
