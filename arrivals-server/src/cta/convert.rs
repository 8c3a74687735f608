//! Conversion from feed DTOs to arrival entries.
//!
//! This is where untrusted feed data becomes domain data. A broken top-level
//! shape fails the whole refresh; a broken record is logged and skipped so
//! the rest of the feed is still used.

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{trace, warn};

use crate::domain::{ArrivalEntry, ArrivalStatus, FeedTime, Line, StationLayout, minutes_until};

use super::error::{FeedError, RecordError};
use super::types::{ArrivalsResponse, EtaRecord};

/// Result of normalizing one feed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Entries in feed order.
    pub entries: Vec<ArrivalEntry>,

    /// Records dropped because they were broken.
    pub skipped: usize,

    /// Well-formed records for lines or directions the station does not show.
    pub unrouted: usize,
}

/// Normalize a raw feed body into arrival entries.
///
/// `now` must already be in the station's time zone; arrival times are
/// resolved into the same zone before the difference is taken.
pub fn normalize(
    body: &str,
    now: &DateTime<Tz>,
    layout: &StationLayout,
) -> Result<Normalized, FeedError> {
    let records = parse_records(body)?;
    let mut normalized = Normalized::default();

    for (index, raw) in records.into_iter().enumerate() {
        match normalize_record(raw, now, layout) {
            Ok(entry) => normalized.entries.push(entry),
            Err(e) if e.is_unrouted() => {
                trace!(index, reason = %e, "ignoring arrival record");
                normalized.unrouted += 1;
            }
            Err(e) => {
                warn!(index, error = %e, "skipping arrival record");
                normalized.skipped += 1;
            }
        }
    }

    Ok(normalized)
}

/// Check the response shape and pull out the raw record list.
///
/// A non-zero `errCd` is an upstream error. Otherwise the record list must be
/// present: an absent or null `eta` is malformed, and only an explicit `[]`
/// means there are no arrivals.
pub fn parse_records(body: &str) -> Result<Vec<serde_json::Value>, FeedError> {
    let response: ArrivalsResponse =
        serde_json::from_str(body).map_err(|e| FeedError::malformed(e.to_string()))?;

    let body = response
        .ctatt
        .ok_or_else(|| FeedError::malformed("missing ctatt object"))?;

    if let Some(code) = body.err_cd.as_deref().filter(|c| *c != "0") {
        return Err(FeedError::Api {
            code: code.to_string(),
            message: body.err_nm.unwrap_or_default(),
        });
    }

    body.eta
        .ok_or_else(|| FeedError::malformed("missing ctatt.eta list"))
}

/// Convert one raw record into an arrival entry.
pub fn normalize_record(
    raw: serde_json::Value,
    now: &DateTime<Tz>,
    layout: &StationLayout,
) -> Result<ArrivalEntry, RecordError> {
    let record: EtaRecord =
        serde_json::from_value(raw).map_err(|e| RecordError::Malformed(e.to_string()))?;

    let route = required(record.rt.as_deref(), "rt")?;
    let dest_text = required(record.dest_nm.as_deref(), "destNm")?;
    let arr_t = required(record.arr_t.as_deref(), "arrT")?;

    let line =
        Line::from_route_code(route).ok_or_else(|| RecordError::UnknownRoute(route.to_string()))?;

    let rule = layout
        .classify(line, dest_text)
        .ok_or_else(|| RecordError::Unrouted {
            route: route.to_string(),
            destination: dest_text.to_string(),
        })?;

    let arrival = FeedTime::parse(arr_t)
        .and_then(|t| t.resolve(now))
        .map_err(|source| RecordError::InvalidTime {
            value: arr_t.to_string(),
            source,
        })?;

    Ok(ArrivalEntry {
        line,
        destination: rule.destination.clone(),
        minutes_away: minutes_until(&arrival, now),
        status: ArrivalStatus::from_schedule_flag(record.is_sch.as_deref()),
        is_last_train: layout.is_last_train(line, flag(&record.is_flt)),
        is_holiday_train: layout.is_holiday_train(line, flag(&record.is_spcl), dest_text),
    })
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, RecordError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RecordError::MissingField(field)),
    }
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref() == Some("1")
}
