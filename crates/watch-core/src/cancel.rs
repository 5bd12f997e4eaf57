//! Caller-side cancellation for in-flight watches.

use std::sync::Arc;
use tokio::sync::watch;

/// Fires the paired [`CancelSignal`]s.
#[derive(Debug, Clone)]
pub struct CancelHandle {
	tx: Arc<watch::Sender<bool>>,
}

/// Resolves once the paired [`CancelHandle`] fires.
#[derive(Debug, Clone)]
pub struct CancelSignal {
	rx: Option<watch::Receiver<bool>>,
}

/// Creates a connected handle/signal pair.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
	let (tx, rx) = watch::channel(false);
	(
		CancelHandle { tx: Arc::new(tx) },
		CancelSignal { rx: Some(rx) },
	)
}

impl CancelHandle {
	pub fn cancel(&self) {
		self.tx.send_replace(true);
	}
}

impl CancelSignal {
	/// A signal that never fires.
	pub fn never() -> Self {
		Self { rx: None }
	}

	pub fn is_cancelled(&self) -> bool {
		self.rx.as_ref().is_some_and(|rx| *rx.borrow())
	}

	/// Waits for cancellation.
	///
	/// Pends forever if the handle is dropped without cancelling.
	pub async fn cancelled(&mut self) {
		if let Some(rx) = self.rx.as_mut() {
			let handle_dropped = rx.wait_for(|cancelled| *cancelled).await.is_err();
			if !handle_dropped {
				return;
			}
		}
		std::future::pending::<()>().await
	}
}

impl Default for CancelSignal {
	fn default() -> Self {
		Self::never()
	}
}
