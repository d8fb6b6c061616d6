//! Notification delivery.

use std::sync::Arc;
use jobquest_core::ProgressEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Fire-and-forget sink for progression events.
pub trait Notifier: Send + Sync {
    /// Publish an event. Must not block and cannot fail.
    fn publish(&self, event: ProgressEvent);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn publish(&self, event: ProgressEvent) {
        (**self).publish(event)
    }
}

/// Notifier that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn publish(&self, _event: ProgressEvent) {}
}

/// Fans events out to any number of subscribers.
///
/// Slow subscribers lag and lose the oldest events; publishing never waits.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<ProgressEvent>,
}

impl BroadcastNotifier {
    /// Default per-subscriber buffer.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a notifier buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Notifier for BroadcastNotifier {
    fn publish(&self, event: ProgressEvent) {
        let name = event.name();
        // An error only means nobody is listening
        match self.tx.send(event) {
            Ok(receivers) => debug!("Published {} to {} subscribers", name, receivers),
            Err(_) => debug!("Dropped {} (no subscribers)", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let notifier = BroadcastNotifier::default();
        let mut rx = notifier.subscribe();

        notifier.publish(ProgressEvent::QuestsCompleted { quests: vec![] });
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name(), "quests_completed");
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let notifier = BroadcastNotifier::new(4);
        notifier.publish(ProgressEvent::AchievementsUnlocked { achievements: vec![] });
        NoopNotifier.publish(ProgressEvent::QuestsCompleted { quests: vec![] });
    }
}
