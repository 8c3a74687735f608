//! Per-direction selection of the next arrivals.

use crate::domain::{ArrivalEntry, DirectionBucket, StationLayout};

/// Default number of arrivals kept per direction.
pub const DEFAULT_MAX_PER_DIRECTION: usize = 2;

/// Group entries into the layout's direction buckets, soonest first, keeping
/// at most `max_per_direction` in each.
///
/// Every direction in the layout gets a bucket, even with no entries. Sorting
/// is stable, so arrivals with equal `minutes_away` keep their feed order.
/// Entries for directions the layout does not list are dropped.
pub fn select(
    entries: Vec<ArrivalEntry>,
    layout: &StationLayout,
    max_per_direction: usize,
) -> Vec<DirectionBucket> {
    let mut buckets: Vec<DirectionBucket> = layout
        .directions()
        .iter()
        .map(|r| DirectionBucket::empty(r.line, r.destination.clone()))
        .collect();

    for entry in entries {
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.line == entry.line && b.destination == entry.destination)
        {
            bucket.arrivals.push(entry);
        }
    }

    for bucket in &mut buckets {
        bucket.arrivals.sort_by_key(|e| e.minutes_away);
        bucket.arrivals.truncate(max_per_direction);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArrivalStatus, Line};

    fn entry(line: Line, destination: &str, minutes_away: u32) -> ArrivalEntry {
        ArrivalEntry {
            line,
            destination: destination.to_string(),
            minutes_away,
            status: ArrivalStatus::Tracked,
            is_last_train: false,
            is_holiday_train: false,
        }
    }

    fn minutes(bucket: &DirectionBucket) -> Vec<u32> {
        bucket.arrivals.iter().map(|e| e.minutes_away).collect()
    }

    #[test]
    fn two_howard_trains() {
        let buckets = select(
            vec![entry(Line::Red, "Howard", 11), entry(Line::Red, "Howard", 3)],
            &StationLayout::wilson(),
            2,
        );

        let howard = &buckets[0];
        assert_eq!(howard.destination, "Howard");
        assert_eq!(minutes(howard), vec![3, 11]);
    }

    #[test]
    fn truncates_to_max() {
        let buckets = select(
            vec![
                entry(Line::Purple, "Loop", 20),
                entry(Line::Purple, "Loop", 4),
                entry(Line::Purple, "Loop", 9),
            ],
            &StationLayout::wilson(),
            2,
        );

        let loop_bucket = buckets.iter().find(|b| b.destination == "Loop").unwrap();
        assert_eq!(minutes(loop_bucket), vec![4, 9]);
    }

    #[test]
    fn ties_keep_feed_order() {
        let mut first = entry(Line::Red, "95th", 5);
        first.status = ArrivalStatus::Scheduled;
        let second = entry(Line::Red, "95th", 5);

        let buckets = select(
            vec![first.clone(), second.clone(), entry(Line::Red, "95th", 2)],
            &StationLayout::wilson(),
            3,
        );

        let bucket = &buckets[1];
        assert_eq!(bucket.arrivals[1], first);
        assert_eq!(bucket.arrivals[2], second);
    }

    #[test]
    fn empty_input_keeps_every_bucket() {
        let buckets = select(Vec::new(), &StationLayout::wilson(), 2);

        assert_eq!(buckets.len(), 4);
        assert!(buckets.iter().all(|b| b.arrivals.is_empty()));
    }

    #[test]
    fn zero_max_empties_buckets() {
        let buckets = select(
            vec![entry(Line::Red, "Howard", 1)],
            &StationLayout::wilson(),
            0,
        );
        assert!(buckets.iter().all(|b| b.arrivals.is_empty()));
    }

    #[test]
    fn unknown_direction_is_dropped() {
        let buckets = select(
            vec![entry(Line::Brown, "Kimball", 1)],
            &StationLayout::wilson(),
            2,
        );
        assert!(buckets.iter().all(|b| b.arrivals.is_empty()));
    }
}
