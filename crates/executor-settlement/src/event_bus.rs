//! Settlement event bus.
//!
//! Settlement records are broadcast to any number of subscribers; the
//! record stream is append-only and the bus never blocks the settlement
//! path. Publishing with no subscribers is a no-op.

use executor_types::SettlementRecord;
use tokio::sync::broadcast;

/// Broadcast channel for settlement records.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<SettlementRecord>,
}

impl EventBus {
	/// Creates a bus retaining up to `capacity` undelivered records per
	/// subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Subscribes to settlement records emitted from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<SettlementRecord> {
		self.sender.subscribe()
	}

	/// Publishes a settlement record to all current subscribers.
	pub fn publish(&self, record: SettlementRecord) {
		// A send error only means nobody is listening right now.
		let _ = self.sender.send(record);
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(1000)
	}
}
