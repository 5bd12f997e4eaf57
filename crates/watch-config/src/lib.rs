//! Configuration for symbol-watch.
//!
//! Configuration is an explicit value handed to each operation, so several
//! nodes or networks can be watched side by side in one process.

pub mod loader;
pub mod types;

pub use loader::{load_config, ConfigLoader};
pub use types::*;
