//! Response bodies for the web layer.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::domain::{ArrivalEntry, Snapshot};
use crate::refresh::{Freshness, RefreshStatus};

/// One arrival as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalView {
    /// Minutes until arrival (0 = due)
    pub minutes: u32,

    /// "Scheduled" or "Tracked"
    pub status: &'static str,

    /// Last train of the day
    pub last_train: bool,

    /// Holiday train
    pub holiday_train: bool,
}

impl ArrivalView {
    pub fn from_entry(entry: &ArrivalEntry) -> Self {
        Self {
            minutes: entry.minutes_away,
            status: entry.status.as_str(),
            last_train: entry.is_last_train,
            holiday_train: entry.is_holiday_train,
        }
    }
}

/// The arrivals board: line → destination → arrivals.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub arrivals: BTreeMap<String, BTreeMap<String, Vec<ArrivalView>>>,

    /// Local wall-clock time of the last refresh, or null if none yet
    pub last_updated: Option<String>,
}

impl BoardResponse {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut arrivals: BTreeMap<String, BTreeMap<String, Vec<ArrivalView>>> = BTreeMap::new();

        for bucket in snapshot.buckets() {
            arrivals
                .entry(bucket.line.to_string())
                .or_default()
                .insert(
                    bucket.destination.clone(),
                    bucket.arrivals.iter().map(ArrivalView::from_entry).collect(),
                );
        }

        Self {
            arrivals,
            last_updated: snapshot.fetched_at().as_ref().map(format_clock),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", "stale" or "starting"
    pub status: &'static str,
    pub last_updated: Option<String>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl HealthResponse {
    pub fn new(status: &RefreshStatus, freshness: Freshness) -> Self {
        Self {
            status: freshness.as_str(),
            last_updated: status.last_success.as_ref().map(format_clock),
            consecutive_failures: status.consecutive_failures,
            last_error: status.last_error.clone(),
        }
    }
}

/// Format a timestamp as local wall-clock time.
pub fn format_clock(at: &DateTime<Tz>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Render the board as plain text, one line per arrival.
///
/// ```text
/// Red to Howard: 3 min (Tracked)
/// Red to 95th: no arrivals
/// Purple to Linden: 6 min (Scheduled) (LAST TRAIN)
/// Last updated: 14:00:00
/// ```
pub fn render_text(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    for bucket in snapshot.buckets() {
        if bucket.arrivals.is_empty() {
            let _ = writeln!(out, "{} to {}: no arrivals", bucket.line, bucket.destination);
            continue;
        }

        for entry in &bucket.arrivals {
            let _ = write!(
                out,
                "{} to {}: {} min ({})",
                entry.line, entry.destination, entry.minutes_away, entry.status
            );
            if entry.is_last_train {
                out.push_str(" (LAST TRAIN)");
            }
            if entry.is_holiday_train {
                out.push_str(" (HOLIDAY TRAIN)");
            }
            out.push('\n');
        }
    }

    match snapshot.fetched_at() {
        Some(at) => {
            let _ = writeln!(out, "Last updated: {}", format_clock(&at));
        }
        None => out.push_str("Last updated: never\n"),
    }

    out
}
