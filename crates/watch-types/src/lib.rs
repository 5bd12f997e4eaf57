//! Shared types for the symbol-watch workspace.
//!
//! Everything that crosses a crate boundary lives here: the transaction
//! status data model, the retry policy, the error taxonomy and the traits
//! that status sources implement.

pub mod decode;
pub mod errors;
pub mod events;
pub mod hash;
pub mod request;
pub mod source;
pub mod status;

pub use decode::*;
pub use errors::*;
pub use events::*;
pub use hash::*;
pub use request::*;
pub use source::*;
pub use status::*;
