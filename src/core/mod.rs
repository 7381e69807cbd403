pub mod datum;
pub mod error;
pub mod tuple;

pub use datum::*;
pub use error::*;
pub use tuple::*;
