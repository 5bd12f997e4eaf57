//! Status source capabilities.
//!
//! A watcher is driven either by a request/response source it polls, or by a
//! subscription that pushes lifecycle notifications as they happen.

use crate::{ChannelCategory, SourceError, StatusEvent, StatusRecord, TransactionHash};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of push notifications. Ends when the underlying channel closes.
pub type StatusEventStream = Pin<Box<dyn Stream<Item = Result<StatusEvent, SourceError>> + Send>>;

/// Request/response status lookup.
#[async_trait]
pub trait StatusSource: Send + Sync {
	fn name(&self) -> &str;

	/// Current status of a hash.
	///
	/// A hash the node does not know yet is reported as a
	/// [`TransactionGroup::NotFound`](crate::TransactionGroup::NotFound)
	/// record, not as an error.
	async fn fetch_status(&self, hash: &TransactionHash) -> Result<StatusRecord, SourceError>;
}

/// Push notification subscription.
#[async_trait]
pub trait StatusSubscriber: Send + Sync {
	fn name(&self) -> &str;

	/// Opens a subscription for an account's lifecycle channels.
	///
	/// Returns once the node has acknowledged the connection and the
	/// subscribe messages are sent, so anything announced afterwards is
	/// observed. Dropping the stream releases the connection.
	async fn subscribe(
		&self,
		address: &str,
		categories: &[ChannelCategory],
	) -> Result<StatusEventStream, SourceError>;
}
