pub mod error;
pub mod macros;

pub use error::{Error, Result};
