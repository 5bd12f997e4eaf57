//! Announce a signed transaction and watch it to its target group.

use crate::cancel::CancelSignal;
use crate::watcher::StatusWatcher;
use tracing::info;
use watch_node::{AnnounceKind, NodeClient};
use watch_types::{
	ChannelCategory, Result, StatusRecord, StatusSource, StatusSubscriber, WatchError,
	WatchRequest,
};

/// How the announced transaction is observed.
#[derive(Clone, Copy)]
pub enum WatchMode<'a> {
	Poll(&'a dyn StatusSource),
	Push {
		subscriber: &'a dyn StatusSubscriber,
		address: &'a str,
	},
}

/// Announces `payload` and waits for `request.hash` to reach its target.
///
/// In push mode the subscription is opened before the announce so that no
/// notification is missed. A failed announce ends the watch with
/// [`WatchError::Transport`].
pub async fn announce_and_watch(
	client: &NodeClient,
	payload: &str,
	kind: AnnounceKind,
	mode: WatchMode<'_>,
	request: &WatchRequest,
	cancel: CancelSignal,
) -> Result<StatusRecord> {
	info!(
		tx_hash = %request.hash.short(),
		kind = %kind,
		explorer = %client.explorer_url(&request.hash),
		"Announcing and watching transaction"
	);

	match mode {
		WatchMode::Poll(source) => {
			client.announce(payload, kind).await?;
			StatusWatcher::poll(source, request, cancel).await
		}
		WatchMode::Push {
			subscriber,
			address,
		} => {
			let categories = ChannelCategory::for_target(request.target);
			let events = subscriber.subscribe(address, &categories).await?;

			let announce = async {
				client
					.announce(payload, kind)
					.await
					.map_err(WatchError::Transport)
			};
			let (_, record) =
				tokio::try_join!(announce, StatusWatcher::listen(events, request, cancel))?;
			Ok(record)
		}
	}
}
