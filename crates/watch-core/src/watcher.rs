//! Drives a transaction hash to a terminal status.

use crate::cancel::CancelSignal;
use crate::state::WatchState;
use futures::StreamExt;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use watch_types::{
	decode_hex_fields, ChannelCategory, Result, SourceError, StatusEventStream, StatusRecord,
	StatusSource, StatusSubscriber, TransportErrorPolicy, WatchError, WatchRequest,
};

/// Transaction status watcher.
///
/// Observes only; nothing here changes ledger state.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusWatcher;

impl StatusWatcher {
	/// Polls `source` until the request's target group is reached.
	///
	/// The first query is sent immediately; `interval` separates the following
	/// ones. Each query spends one attempt whatever its outcome.
	pub async fn poll(
		source: &dyn StatusSource,
		request: &WatchRequest,
		mut cancel: CancelSignal,
	) -> Result<StatusRecord> {
		let hash = request.hash;
		let policy = &request.policy;
		let started = Instant::now();
		let mut state = WatchState::default();
		let mut attempts = 0u32;

		info!(
			tx_hash = %hash.short(),
			target = %request.target,
			source = source.name(),
			max_attempts = policy.max_attempts,
			"Waiting for transaction status"
		);

		let deadline = until_deadline(policy.deadline.map(|d| started + d));
		tokio::pin!(deadline);

		while attempts < policy.max_attempts {
			if attempts > 0 {
				tokio::select! {
					_ = cancel.cancelled() => return Err(cancelled(request)),
					_ = &mut deadline => break,
					_ = tokio::time::sleep(policy.interval) => {}
				}
			}

			attempts += 1;
			let fetched = tokio::select! {
				_ = cancel.cancelled() => return Err(cancelled(request)),
				_ = &mut deadline => break,
				fetched = source.fetch_status(&hash) => fetched,
			};

			match fetched {
				Ok(record) => {
					let previous = state.last_group();
					state = state.observe(request.target, record);
					if let Some(result) = resolve(&state, request) {
						return result;
					}
					if previous != state.last_group() {
						debug!(
							tx_hash = %hash.short(),
							attempt = attempts,
							group = ?state.last_group(),
							"Transaction status changed"
						);
					}
				}
				Err(e) => handle_source_error(e, request, attempts)?,
			}
		}

		warn!(
			tx_hash = %hash.short(),
			attempts,
			last_group = ?state.last_group(),
			"Transaction status not resolved within budget"
		);
		Err(WatchError::Timeout {
			hash,
			attempts,
			elapsed: started.elapsed(),
		})
	}

	/// Consumes push notifications until one resolves the request.
	///
	/// Notifications for other hashes are ignored. The watch is bounded by
	/// [`RetryPolicy::push_deadline`](watch_types::RetryPolicy::push_deadline).
	/// The stream, and the connection behind it, is dropped on return.
	pub async fn listen(
		mut events: StatusEventStream,
		request: &WatchRequest,
		mut cancel: CancelSignal,
	) -> Result<StatusRecord> {
		let hash = request.hash;
		let started = Instant::now();
		let deadline = tokio::time::sleep(request.policy.push_deadline());
		tokio::pin!(deadline);

		let mut state = WatchState::default();
		let mut observed = 0u32;

		info!(
			tx_hash = %hash.short(),
			target = %request.target,
			"Listening for transaction notifications"
		);

		loop {
			let next = tokio::select! {
				_ = cancel.cancelled() => return Err(cancelled(request)),
				_ = &mut deadline => {
					warn!(tx_hash = %hash.short(), observed, "No terminal notification before deadline");
					return Err(WatchError::Timeout {
						hash,
						attempts: observed,
						elapsed: started.elapsed(),
					});
				}
				next = events.next() => next,
			};

			let event = match next {
				Some(Ok(event)) => event,
				Some(Err(e)) => {
					handle_source_error(e, request, observed)?;
					continue;
				}
				None => {
					warn!(tx_hash = %hash.short(), "Notification stream closed");
					return Err(WatchError::StreamClosed { hash });
				}
			};

			if event.hash != hash {
				debug!(
					category = %event.category,
					other = %event.hash.short(),
					"Ignoring notification for another transaction"
				);
				continue;
			}

			observed += 1;
			debug!(
				tx_hash = %hash.short(),
				category = %event.category,
				payload = %decode_hex_fields(event.data.clone()),
				"Notification received"
			);
			state = state.observe(request.target, event.to_record());
			if let Some(result) = resolve(&state, request) {
				return result;
			}
		}
	}

	/// Subscribes to `address`'s channels and listens for the request.
	pub async fn watch_push(
		subscriber: &dyn StatusSubscriber,
		address: &str,
		request: &WatchRequest,
		cancel: CancelSignal,
	) -> Result<StatusRecord> {
		let categories = ChannelCategory::for_target(request.target);
		let events = subscriber.subscribe(address, &categories).await?;
		Self::listen(events, request, cancel).await
	}
}

fn resolve(state: &WatchState, request: &WatchRequest) -> Option<Result<StatusRecord>> {
	match state {
		WatchState::Succeeded(record) => {
			info!(
				tx_hash = %record.hash.short(),
				group = %record.group,
				code = %record.code,
				height = ?record.height,
				"Transaction reached {}",
				request.target
			);
			Some(Ok(record.clone()))
		}
		WatchState::Rejected(record) => {
			warn!(
				tx_hash = %record.hash.short(),
				code = %record.code,
				"Transaction rejected by node"
			);
			Some(Err(WatchError::Rejected {
				hash: record.hash,
				code: record.code.clone(),
			}))
		}
		WatchState::Waiting { .. } => None,
	}
}

/// Resolves at `at`, or never when there is no deadline.
async fn until_deadline(at: Option<Instant>) {
	match at {
		Some(at) => tokio::time::sleep_until(at).await,
		None => std::future::pending().await,
	}
}

fn handle_source_error(e: SourceError, request: &WatchRequest, attempt: u32) -> Result<()> {
	if request.policy.transport_errors == TransportErrorPolicy::Retry && e.is_retryable() {
		warn!(
			tx_hash = %request.hash.short(),
			attempt,
			error = %e,
			"Status query failed, retrying"
		);
		Ok(())
	} else {
		Err(WatchError::Transport(e))
	}
}

fn cancelled(request: &WatchRequest) -> WatchError {
	info!(tx_hash = %request.hash.short(), "Watch cancelled");
	WatchError::Cancelled
}
