//! Normalized arrival predictions.

use std::fmt;

use super::Line;

/// Whether a prediction comes from the timetable or from a live train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrivalStatus {
    /// Prediction is based on the schedule; the train is not yet tracked.
    Scheduled,
    /// Prediction is based on a train's live position.
    Tracked,
}

impl ArrivalStatus {
    /// Classify a feed `isSch` flag. Only `"1"` means scheduled.
    pub fn from_schedule_flag(flag: Option<&str>) -> Self {
        if flag == Some("1") {
            ArrivalStatus::Scheduled
        } else {
            ArrivalStatus::Tracked
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArrivalStatus::Scheduled => "Scheduled",
            ArrivalStatus::Tracked => "Tracked",
        }
    }
}

impl fmt::Display for ArrivalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One predicted train arrival at the station.
///
/// Entries only exist for records that had every required field and that
/// matched a direction of the station layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalEntry {
    /// Line the train runs on.
    pub line: Line,

    /// Destination bucket name from the station layout (e.g. "Howard").
    pub destination: String,

    /// Whole minutes until arrival. Zero means due.
    pub minutes_away: u32,

    /// Scheduled or tracked.
    pub status: ArrivalStatus,

    /// Final trip of the day on a line that reports it.
    pub is_last_train: bool,

    /// Special holiday run on a line that reports it.
    pub is_holiday_train: bool,
}
