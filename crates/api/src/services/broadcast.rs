//! Real-time fan-out of accepted location samples.
//!
//! [`UpdateBroadcaster`] wraps a `tokio::sync::broadcast` channel: every
//! subscriber owns an independent bounded queue, publishing never blocks,
//! and a subscriber that falls behind loses its own backlog without
//! affecting the publisher or other subscribers.

use domain::models::LocationSample;
use tokio::sync::broadcast;

/// Fan-out hub for accepted location samples.
///
/// Cheap to clone; all clones publish into the same channel.
#[derive(Clone)]
pub struct UpdateBroadcaster {
    sender: broadcast::Sender<LocationSample>,
}

impl UpdateBroadcaster {
    /// Create a broadcaster whose subscribers each buffer up to `capacity`
    /// undelivered samples. A subscriber past that sees `RecvError::Lagged`
    /// and skips ahead.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an accepted sample to all current subscribers.
    ///
    /// Fire-and-forget: with zero subscribers the sample is dropped, and the
    /// send error that signals it is deliberately ignored.
    pub fn publish(&self, sample: LocationSample) {
        let _ = self.sender.send(sample);
    }

    /// Subscribe to samples accepted from this point on. There is no replay
    /// of samples published before the subscription existed.
    pub fn subscribe(&self) -> broadcast::Receiver<LocationSample> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    fn sample(id: i64) -> LocationSample {
        LocationSample {
            sample_id: id,
            device_id: "gps-1".to_string(),
            latitude: 37.0,
            longitude: -122.0,
            speed: None,
            accuracy: None,
            altitude: None,
            heading: None,
            battery_level: None,
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_sample() {
        let updates = UpdateBroadcaster::new(16);
        let mut rx = updates.subscribe();

        updates.publish(sample(1));

        let received = rx.recv().await.expect("should receive the sample");
        assert_eq!(received.sample_id, 1);
        assert_eq!(received.device_id, "gps-1");
    }

    #[tokio::test]
    async fn samples_arrive_in_publish_order() {
        let updates = UpdateBroadcaster::new(16);
        let mut rx = updates.subscribe();

        updates.publish(sample(1));
        updates.publish(sample(2));
        updates.publish(sample(3));

        assert_eq!(rx.recv().await.unwrap().sample_id, 1);
        assert_eq!(rx.recv().await.unwrap().sample_id, 2);
        assert_eq!(rx.recv().await.unwrap().sample_id, 3);
    }

    #[tokio::test]
    async fn each_subscriber_gets_every_sample() {
        let updates = UpdateBroadcaster::new(16);
        let mut rx1 = updates.subscribe();
        let mut rx2 = updates.subscribe();

        updates.publish(sample(7));

        assert_eq!(rx1.recv().await.unwrap().sample_id, 7);
        assert_eq!(rx2.recv().await.unwrap().sample_id, 7);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let updates = UpdateBroadcaster::new(16);
        updates.publish(sample(1));
    }

    #[tokio::test]
    async fn late_subscriber_gets_no_replay() {
        let updates = UpdateBroadcaster::new(16);
        updates.publish(sample(1));

        let mut rx = updates.subscribe();
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn lagged_subscriber_drops_only_its_own_backlog() {
        let updates = UpdateBroadcaster::new(2);
        let mut slow = updates.subscribe();

        for id in 1..=4 {
            updates.publish(sample(id));
        }

        // The slow subscriber lost the oldest two samples but keeps going.
        match slow.recv().await {
            Err(RecvError::Lagged(skipped)) => assert_eq!(skipped, 2),
            other => panic!("expected lagged error, got {:?}", other.map(|s| s.sample_id)),
        }
        assert_eq!(slow.recv().await.unwrap().sample_id, 3);
        assert_eq!(slow.recv().await.unwrap().sample_id, 4);
    }
}
