//! Shared error types and helpers

pub mod error;

pub use error::{CoreError, CoreResult};
