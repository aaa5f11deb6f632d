/// Shared kernel - error types, result alias and file-safety helpers
pub mod error;
mod result;
pub mod security;

pub use result::Result;
