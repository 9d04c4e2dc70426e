pub mod config;
pub mod error;
pub mod types;

pub use error::{SealboxError, SealboxResult};
pub use types::{FailureRecord, Stage};
