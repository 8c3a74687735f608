//! Application state for the web layer.

use std::time::Duration;

use crate::cache::SnapshotReader;
use crate::refresh::RefreshHealth;

/// Shared application state.
///
/// Handlers only ever read; the refresh loop owns the write side.
#[derive(Clone)]
pub struct AppState {
    /// Latest published arrivals
    pub cache: SnapshotReader,

    /// Refresh loop status
    pub health: RefreshHealth,

    /// Age after which data is reported as stale
    pub stale_after: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(cache: SnapshotReader, health: RefreshHealth, stale_after: Duration) -> Self {
        Self {
            cache,
            health,
            stale_after,
        }
    }
}
