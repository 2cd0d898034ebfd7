//! The `utils` module provides shared definitions used across the `pubwire`
//! client: the crate-wide error type and the tracing bootstrap.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
