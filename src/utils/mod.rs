pub mod error;
pub mod table;

pub use error::{FetchError, Result};
