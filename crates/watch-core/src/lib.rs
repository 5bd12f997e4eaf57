//! Transaction status watching.
//!
//! [`StatusWatcher`] resolves a [`WatchRequest`](watch_types::WatchRequest)
//! against either a polled [`StatusSource`](watch_types::StatusSource) or a
//! pushed [`StatusEventStream`](watch_types::StatusEventStream).
//! [`announce_and_watch`] pairs that with submitting the transaction.

pub mod announce;
pub mod cancel;
pub mod state;
pub mod watcher;

pub use announce::{announce_and_watch, WatchMode};
pub use cancel::{cancellation, CancelHandle, CancelSignal};
pub use state::WatchState;
pub use watcher::StatusWatcher;
