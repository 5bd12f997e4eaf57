//! Log output setup for the `symbol-watch` binary.

pub mod tracing;

pub use crate::tracing::{init_tracing, TracingConfig, TracingError};
