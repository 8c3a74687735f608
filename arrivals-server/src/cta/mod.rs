//! CTA Train Tracker arrivals feed.
//!
//! This module provides an HTTP client for the Train Tracker `ttarrivals`
//! endpoint and the conversion of its responses into arrival entries.
//!
//! Key characteristics of the feed:
//! - Everything is nested under a `ctatt` object; predictions are in `eta`
//! - All values are strings, including flags (`"0"` / `"1"`)
//! - Times are station-local wall-clock times with no offset
//! - Records can be incomplete, so each one is validated on its own

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{FeedClient, FeedConfig};
pub use convert::{Normalized, normalize, normalize_record, parse_records};
pub use error::{FeedError, RecordError};
pub use mock::{MockFeed, MockResponse};
pub use source::FeedSource;
pub use types::{ArrivalsBody, ArrivalsResponse, EtaRecord};
