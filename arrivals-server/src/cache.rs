//! Latest-snapshot cache shared between the refresh loop and request handlers.
//!
//! The cache holds exactly one [`Snapshot`] behind an `Arc`. Publishing swaps
//! the whole `Arc` under a write lock and reading clones it under a read
//! lock, so a reader always gets one complete snapshot together with its
//! timestamp, never buckets from two different refreshes.
//!
//! There is one [`SnapshotPublisher`] (owned by the refresh loop) and any
//! number of cheap-to-clone [`SnapshotReader`]s.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::Snapshot;

type Shared = Arc<RwLock<Arc<Snapshot>>>;

/// Create a cache holding `initial`, returning its single writer and a reader.
pub fn snapshot_cache(initial: Snapshot) -> (SnapshotPublisher, SnapshotReader) {
    let inner: Shared = Arc::new(RwLock::new(Arc::new(initial)));
    (
        SnapshotPublisher {
            inner: inner.clone(),
        },
        SnapshotReader { inner },
    )
}

/// Write side of the cache. Not `Clone`: there is only ever one writer.
pub struct SnapshotPublisher {
    inner: Shared,
}

impl SnapshotPublisher {
    /// Replace the current snapshot.
    pub async fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.inner.write().await;
        *guard = snapshot;
    }

    /// A reader for the same cache.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            inner: self.inner.clone(),
        }
    }
}

/// Read side of the cache.
#[derive(Clone)]
pub struct SnapshotReader {
    inner: Shared,
}

impl SnapshotReader {
    /// The most recently published snapshot.
    pub async fn read(&self) -> Arc<Snapshot> {
        let guard = self.inner.read().await;
        guard.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArrivalEntry, ArrivalStatus, DirectionBucket, Line, StationLayout};
    use chrono::{DateTime, TimeZone};
    use chrono_tz::America::Chicago;
    use chrono_tz::Tz;

    fn at(minute: u32) -> DateTime<Tz> {
        Chicago.with_ymd_and_hms(2024, 3, 15, 14, minute, 0).unwrap()
    }

    fn snapshot_with(minutes_away: u32, fetched_at: DateTime<Tz>) -> Snapshot {
        let layout = StationLayout::wilson();
        let buckets = layout
            .directions()
            .iter()
            .map(|r| DirectionBucket {
                line: r.line,
                destination: r.destination.clone(),
                arrivals: vec![ArrivalEntry {
                    line: r.line,
                    destination: r.destination.clone(),
                    minutes_away,
                    status: ArrivalStatus::Tracked,
                    is_last_train: false,
                    is_holiday_train: false,
                }],
            })
            .collect();
        Snapshot::new(buckets, fetched_at)
    }

    #[tokio::test]
    async fn starts_with_initial_snapshot() {
        let (_publisher, reader) = snapshot_cache(Snapshot::empty(&StationLayout::wilson()));

        let snapshot = reader.read().await;
        assert!(snapshot.fetched_at().is_none());
        assert_eq!(snapshot.buckets().len(), 4);
    }

    #[tokio::test]
    async fn publish_replaces_snapshot() {
        let (publisher, reader) = snapshot_cache(Snapshot::empty(&StationLayout::wilson()));

        publisher.publish(snapshot_with(3, at(0))).await;
        let first = reader.read().await;
        assert_eq!(first.fetched_at(), Some(at(0)));

        publisher.publish(snapshot_with(7, at(1))).await;
        let second = reader.read().await;
        assert_eq!(second.fetched_at(), Some(at(1)));
        assert_eq!(
            second.bucket(Line::Red, "Howard").unwrap().arrivals[0].minutes_away,
            7
        );

        // Earlier readers keep the snapshot they were given
        assert_eq!(first.fetched_at(), Some(at(0)));
    }

    #[tokio::test]
    async fn readers_share_one_cache() {
        let (publisher, reader) = snapshot_cache(Snapshot::empty(&StationLayout::wilson()));
        let other = publisher.reader();

        publisher.publish(snapshot_with(5, at(2))).await;
        assert_eq!(reader.read().await, other.read().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reads_never_see_mixed_snapshots() {
        let (publisher, reader) = snapshot_cache(snapshot_with(0, at(0)));

        let mut readers = Vec::new();
        for _ in 0..4 {
            let reader = reader.clone();
            readers.push(tokio::spawn(async move {
                let mut last_seen = 0;
                for _ in 0..500 {
                    let snapshot = reader.read().await;
                    let stamp = snapshot.fetched_at().unwrap();
                    let values: Vec<u32> = snapshot
                        .buckets()
                        .iter()
                        .map(|b| b.arrivals[0].minutes_away)
                        .collect();

                    // Every bucket and the timestamp come from the same publish
                    assert!(values.iter().all(|v| *v == values[0]));
                    assert_eq!(stamp, at(values[0]));

                    // Publishes are observed in order
                    assert!(values[0] >= last_seen);
                    last_seen = values[0];
                    tokio::task::yield_now().await;
                }
            }));
        }

        for minute in 1..50 {
            publisher.publish(snapshot_with(minute, at(minute))).await;
            tokio::task::yield_now().await;
        }

        for handle in readers {
            handle.await.unwrap();
        }
    }
}
