pub mod grammar;
pub mod parser;
pub mod processor;
pub mod session;

pub use session::Session;
