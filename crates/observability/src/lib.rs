//! Tracing setup shared by the storefront binaries.

/// Subscriber initialization (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, UnknownLogFormat, init, init_with};
