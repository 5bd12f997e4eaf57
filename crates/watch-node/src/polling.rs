//! Request/response status source backed by the REST API.

use crate::NodeClient;
use async_trait::async_trait;
use watch_types::{SourceError, StatusRecord, StatusSource, TransactionHash};

/// Polls `GET /transactionStatus/{hash}`.
#[derive(Debug, Clone)]
pub struct PollingSource {
	client: NodeClient,
}

impl PollingSource {
	pub fn new(client: NodeClient) -> Self {
		Self { client }
	}
}

#[async_trait]
impl StatusSource for PollingSource {
	fn name(&self) -> &str {
		"rest"
	}

	async fn fetch_status(&self, hash: &TransactionHash) -> Result<StatusRecord, SourceError> {
		self.client.transaction_status(hash).await
	}
}
