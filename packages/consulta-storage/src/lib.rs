pub mod error;
pub mod lexical;
pub mod models;
pub mod qdrant;

pub use error::{Error, Result};
