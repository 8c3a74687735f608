//! Domain types for the arrivals board.
//!
//! These types hold validated arrival data. Anything that reaches them has
//! already been parsed out of the feed and matched to a station direction,
//! so code that receives them can trust their contents.

mod arrival;
mod layout;
mod line;
mod snapshot;
mod time;

pub use arrival::{ArrivalEntry, ArrivalStatus};
pub use layout::{DirectionRule, StationLayout};
pub use line::Line;
pub use snapshot::{DirectionBucket, Snapshot};
pub use time::{FeedTime, TimeError, minutes_until};
