//! Published arrival snapshots.

use chrono::DateTime;
use chrono_tz::Tz;

use super::{ArrivalEntry, Line, StationLayout};

/// Upcoming arrivals for one (line, destination) direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionBucket {
    pub line: Line,
    pub destination: String,
    /// Sorted by `minutes_away`, soonest first.
    pub arrivals: Vec<ArrivalEntry>,
}

impl DirectionBucket {
    /// An empty bucket for a direction.
    pub fn empty(line: Line, destination: impl Into<String>) -> Self {
        Self {
            line,
            destination: destination.into(),
            arrivals: Vec::new(),
        }
    }
}

/// Every direction bucket for the station, as of one refresh.
///
/// A snapshot is never modified after construction; the cache replaces it
/// wholesale. Every direction in the layout has a bucket, even when it has
/// no arrivals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    buckets: Vec<DirectionBucket>,
    fetched_at: Option<DateTime<Tz>>,
}

impl Snapshot {
    /// Create a snapshot from selected buckets and the refresh time.
    pub fn new(buckets: Vec<DirectionBucket>, fetched_at: DateTime<Tz>) -> Self {
        Self {
            buckets,
            fetched_at: Some(fetched_at),
        }
    }

    /// The state before any refresh has succeeded: every bucket empty and
    /// no timestamp.
    pub fn empty(layout: &StationLayout) -> Self {
        let buckets = layout
            .directions()
            .iter()
            .map(|r| DirectionBucket::empty(r.line, r.destination.clone()))
            .collect();

        Self {
            buckets,
            fetched_at: None,
        }
    }

    /// Buckets in layout order.
    pub fn buckets(&self) -> &[DirectionBucket] {
        &self.buckets
    }

    /// Look up one direction.
    pub fn bucket(&self, line: Line, destination: &str) -> Option<&DirectionBucket> {
        self.buckets
            .iter()
            .find(|b| b.line == line && b.destination == destination)
    }

    /// When the feed was read, or `None` if no refresh has succeeded yet.
    pub fn fetched_at(&self) -> Option<DateTime<Tz>> {
        self.fetched_at
    }

    /// Total number of arrivals across all buckets.
    pub fn arrival_count(&self) -> usize {
        self.buckets.iter().map(|b| b.arrivals.len()).sum()
    }
}
