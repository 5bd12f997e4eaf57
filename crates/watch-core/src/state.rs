//! Status reconciliation state machine.
//!
//! ```text
//! Waiting --(not_found | unconfirmed | partial)--> Waiting
//! Waiting --(group reaches target)---------------> Succeeded
//! Waiting --(failed)-----------------------------> Rejected
//! ```
//!
//! Terminal states absorb every further input. Running out of budget is the
//! watcher's call, not an observation.

use watch_types::{StatusRecord, TargetGroup, TransactionGroup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchState {
	Waiting { last: Option<TransactionGroup> },
	Succeeded(StatusRecord),
	Rejected(StatusRecord),
}

impl Default for WatchState {
	fn default() -> Self {
		Self::Waiting { last: None }
	}
}

impl WatchState {
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::Waiting { .. })
	}

	/// Last group seen while still waiting.
	pub fn last_group(&self) -> Option<TransactionGroup> {
		match self {
			Self::Waiting { last } => *last,
			Self::Succeeded(record) | Self::Rejected(record) => Some(record.group),
		}
	}

	pub fn observe(self, target: TargetGroup, record: StatusRecord) -> Self {
		if self.is_terminal() {
			return self;
		}

		if record.group == TransactionGroup::Failed {
			Self::Rejected(record)
		} else if target.is_reached_by(record.group) {
			Self::Succeeded(record)
		} else {
			Self::Waiting {
				last: Some(record.group),
			}
		}
	}
}
