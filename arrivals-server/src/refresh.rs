//! Background refresh loop.
//!
//! Every tick fetches the feed, normalizes and selects arrivals, and
//! publishes a new snapshot. A tick that fails at any stage leaves the cache
//! alone, so readers keep seeing the last good snapshot. Failures are logged
//! and counted but never stop the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::SnapshotPublisher;
use crate::cta::{FeedError, FeedSource, normalize};
use crate::domain::{Snapshot, StationLayout};
use crate::select::{DEFAULT_MAX_PER_DIRECTION, select};

/// Default time between refreshes.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Used in place of a zero interval.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Where the refresh loop currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshState {
    /// Waiting for the next tick.
    #[default]
    Idle,
    /// Waiting on the feed.
    Fetching,
    /// Normalizing, selecting and publishing.
    Publishing,
}

/// Counters and timestamps describing recent refreshes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshStatus {
    pub state: RefreshState,
    pub last_attempt: Option<DateTime<Tz>>,
    pub last_success: Option<DateTime<Tz>>,
    pub consecutive_failures: u32,
    pub successes: u64,
    pub failures: u64,
    pub last_error: Option<String>,
}

/// Overall freshness of the published data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No refresh has succeeded yet.
    Starting,
    /// Last success is recent.
    Fresh,
    /// Last success is older than the staleness limit.
    Stale,
}

impl Freshness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Starting => "starting",
            Freshness::Fresh => "ok",
            Freshness::Stale => "stale",
        }
    }
}

impl RefreshStatus {
    /// Classify freshness at `now`, treating data older than `stale_after`
    /// as stale.
    pub fn freshness(&self, now: DateTime<Utc>, stale_after: Duration) -> Freshness {
        let Some(last) = self.last_success else {
            return Freshness::Starting;
        };
        let age = now.signed_duration_since(last);
        match age.to_std() {
            Ok(age) if age > stale_after => Freshness::Stale,
            _ => Freshness::Fresh,
        }
    }
}

/// Shared handle to the refresh status.
#[derive(Clone, Default)]
pub struct RefreshHealth {
    inner: Arc<RwLock<RefreshStatus>>,
}

impl RefreshHealth {
    /// Current status.
    pub async fn status(&self) -> RefreshStatus {
        self.inner.read().await.clone()
    }

    async fn begin(&self, at: DateTime<Tz>) {
        let mut status = self.inner.write().await;
        status.state = RefreshState::Fetching;
        status.last_attempt = Some(at);
    }

    async fn set_state(&self, state: RefreshState) {
        self.inner.write().await.state = state;
    }

    /// Record a success, returning how many failures preceded it.
    async fn record_success(&self, at: DateTime<Tz>) -> u32 {
        let mut status = self.inner.write().await;
        let previous_failures = status.consecutive_failures;
        status.state = RefreshState::Idle;
        status.last_success = Some(at);
        status.consecutive_failures = 0;
        status.successes += 1;
        status.last_error = None;
        previous_failures
    }

    /// Record a failure, returning the new consecutive failure count.
    async fn record_failure(&self, error: &FeedError) -> u32 {
        let mut status = self.inner.write().await;
        status.state = RefreshState::Idle;
        status.consecutive_failures += 1;
        status.failures += 1;
        status.last_error = Some(error.to_string());
        status.consecutive_failures
    }
}

/// Configuration for the refresh loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    /// Time between ticks.
    pub interval: Duration,

    /// Arrivals kept per direction.
    pub max_per_direction: usize,

    /// Zone that feed times and snapshot timestamps are in.
    pub timezone: Tz,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_per_direction: DEFAULT_MAX_PER_DIRECTION,
            timezone: chrono_tz::America::Chicago,
        }
    }
}

/// Result of one tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// A new snapshot was published.
    Published {
        /// Arrivals in the published snapshot.
        arrivals: usize,
        /// Broken records dropped from the feed.
        skipped: usize,
    },
    /// The tick failed and the cache was left untouched.
    Failed(FeedError),
}

impl TickOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, TickOutcome::Published { .. })
    }
}

/// Periodically refreshes the snapshot cache from a feed source.
pub struct RefreshScheduler<S> {
    source: S,
    layout: Arc<StationLayout>,
    config: RefreshConfig,
    publisher: SnapshotPublisher,
    health: RefreshHealth,
}

impl<S: FeedSource> RefreshScheduler<S> {
    /// Create a scheduler. It owns the cache's only publisher.
    pub fn new(
        source: S,
        layout: Arc<StationLayout>,
        config: RefreshConfig,
        publisher: SnapshotPublisher,
    ) -> Self {
        Self {
            source,
            layout,
            config,
            publisher,
            health: RefreshHealth::default(),
        }
    }

    /// Handle for reading refresh status.
    pub fn health(&self) -> RefreshHealth {
        self.health.clone()
    }

    /// Run one fetch-normalize-select-publish cycle with the clock fixed
    /// at `now`.
    pub async fn tick(&self, now: DateTime<Utc>) -> TickOutcome {
        self.tick_with_clock(|| now).await
    }

    /// Run one cycle, reading `clock` once before the fetch (the attempt
    /// time) and again after it. Arrival minutes and the snapshot timestamp
    /// use the second reading.
    pub async fn tick_with_clock<C>(&self, clock: C) -> TickOutcome
    where
        C: Fn() -> DateTime<Utc>,
    {
        let tz = self.config.timezone;
        self.health.begin(clock().with_timezone(&tz)).await;

        let body = match self.source.fetch().await {
            Ok(body) => body,
            Err(e) => return self.fail(e).await,
        };

        self.health.set_state(RefreshState::Publishing).await;
        let now = clock().with_timezone(&tz);

        let normalized = match normalize(&body, &now, &self.layout) {
            Ok(normalized) => normalized,
            Err(e) => return self.fail(e).await,
        };

        let buckets = select(
            normalized.entries,
            &self.layout,
            self.config.max_per_direction,
        );
        let snapshot = Snapshot::new(buckets, now);
        let arrivals = snapshot.arrival_count();

        self.publisher.publish(snapshot).await;
        let previous_failures = self.health.record_success(now).await;

        if previous_failures > 0 {
            info!(previous_failures, "arrivals feed recovered");
        }
        debug!(
            arrivals,
            skipped = normalized.skipped,
            unrouted = normalized.unrouted,
            "published arrivals snapshot"
        );

        TickOutcome::Published {
            arrivals,
            skipped: normalized.skipped,
        }
    }

    async fn fail(&self, error: FeedError) -> TickOutcome {
        let consecutive_failures = self.health.record_failure(&error).await;
        warn!(
            error = %error,
            consecutive_failures,
            "arrivals refresh failed, keeping previous snapshot"
        );
        TickOutcome::Failed(error)
    }

    /// Tick on a fixed interval until `cancel` fires.
    ///
    /// The first tick runs immediately. A slow tick delays the next one
    /// rather than causing a burst of catch-up ticks.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            max_per_direction = self.config.max_per_direction,
            timezone = %self.config.timezone,
            "starting arrivals refresh loop"
        );

        let period = if self.config.interval.is_zero() {
            warn!(
                fallback_secs = MIN_INTERVAL.as_secs(),
                "refresh interval is zero, using fallback"
            );
            MIN_INTERVAL
        } else {
            self.config.interval
        };

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            self.tick_with_clock(Utc::now).await;
        }

        info!("arrivals refresh loop stopped");
    }
}
