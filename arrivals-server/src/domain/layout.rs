//! Station layout: which (line, destination) directions a station serves.
//!
//! The arrivals feed only gives free-text destination names such as
//! `"Howard"` or `"95th/Dan Ryan"`. The layout turns those into a fixed set
//! of direction buckets with a plain lookup table, and records which lines
//! report last-train and holiday-train flags.
//!
//! Rules are checked in order and the first match wins, so a destination
//! text that mentions two termini lands in whichever direction is listed
//! first.

use super::Line;

/// Default substrings that mark a holiday train in the destination text.
const DEFAULT_HOLIDAY_MARKERS: [&str; 2] = ["Holiday", "Santa"];

/// One direction served by the station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionRule {
    /// Line the direction belongs to.
    pub line: Line,

    /// Bucket name shown to clients.
    pub destination: String,

    /// Substrings of the feed destination text that select this direction.
    pub patterns: Vec<String>,
}

impl DirectionRule {
    /// Whether a record on `line` with destination text `dest_text` belongs here.
    pub fn matches(&self, line: Line, dest_text: &str) -> bool {
        self.line == line && self.patterns.iter().any(|p| dest_text.contains(p.as_str()))
    }
}

/// The direction table for a station plus per-line flag rules.
///
/// # Examples
///
/// ```
/// use arrivals_server::domain::{Line, StationLayout};
///
/// let layout = StationLayout::wilson();
/// let rule = layout.classify(Line::Red, "Howard").unwrap();
/// assert_eq!(rule.destination, "Howard");
///
/// // Purple trains to Linden never land in a Red bucket
/// assert!(layout.classify(Line::Red, "Linden").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationLayout {
    directions: Vec<DirectionRule>,
    last_train_lines: Vec<Line>,
    holiday_lines: Vec<Line>,
    holiday_markers: Vec<String>,
}

impl StationLayout {
    /// Create an empty layout with the default holiday markers.
    pub fn new() -> Self {
        Self {
            directions: Vec::new(),
            last_train_lines: Vec::new(),
            holiday_lines: Vec::new(),
            holiday_markers: DEFAULT_HOLIDAY_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    /// Layout for Wilson (mapid 40540): Red and Purple, both directions.
    pub fn wilson() -> Self {
        Self::new()
            .with_direction(Line::Red, "Howard", &["Howard"])
            .with_direction(Line::Red, "95th", &["95th"])
            .with_direction(Line::Purple, "Linden", &["Linden"])
            .with_direction(Line::Purple, "Loop", &["Loop"])
            .with_last_train_line(Line::Purple)
            .with_holiday_line(Line::Red)
    }

    /// Add a direction. Rules are matched in the order they are added.
    pub fn with_direction(
        mut self,
        line: Line,
        destination: impl Into<String>,
        patterns: &[&str],
    ) -> Self {
        self.directions.push(DirectionRule {
            line,
            destination: destination.into(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    /// Report the feed's last-trip flag for trains on `line`.
    pub fn with_last_train_line(mut self, line: Line) -> Self {
        if !self.last_train_lines.contains(&line) {
            self.last_train_lines.push(line);
        }
        self
    }

    /// Report holiday trains on `line`.
    pub fn with_holiday_line(mut self, line: Line) -> Self {
        if !self.holiday_lines.contains(&line) {
            self.holiday_lines.push(line);
        }
        self
    }

    /// Replace the holiday marker substrings.
    pub fn with_holiday_markers(mut self, markers: &[&str]) -> Self {
        self.holiday_markers = markers.iter().map(|m| m.to_string()).collect();
        self
    }

    /// All directions, in table order.
    pub fn directions(&self) -> &[DirectionRule] {
        &self.directions
    }

    /// Find the direction for a record, or `None` if the station does not
    /// serve it.
    pub fn classify(&self, line: Line, dest_text: &str) -> Option<&DirectionRule> {
        self.directions.iter().find(|r| r.matches(line, dest_text))
    }

    /// Whether a record is a last train.
    ///
    /// True only when `line` reports last trains and the feed flag is set.
    pub fn is_last_train(&self, line: Line, last_trip_flag: bool) -> bool {
        last_trip_flag && self.last_train_lines.contains(&line)
    }

    /// Whether a record is a holiday train.
    ///
    /// True only when `line` reports holiday trains and either the feed's
    /// special-run flag is set or the destination text carries a marker.
    pub fn is_holiday_train(&self, line: Line, special_flag: bool, dest_text: &str) -> bool {
        self.holiday_lines.contains(&line)
            && (special_flag
                || self
                    .holiday_markers
                    .iter()
                    .any(|m| dest_text.contains(m.as_str())))
    }
}

impl Default for StationLayout {
    fn default() -> Self {
        Self::wilson()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wilson_directions_in_order() {
        let layout = StationLayout::wilson();
        let names: Vec<_> = layout
            .directions()
            .iter()
            .map(|r| (r.line, r.destination.as_str()))
            .collect();

        assert_eq!(
            names,
            vec![
                (Line::Red, "Howard"),
                (Line::Red, "95th"),
                (Line::Purple, "Linden"),
                (Line::Purple, "Loop"),
            ]
        );
    }

    #[test]
    fn classify_by_substring() {
        let layout = StationLayout::wilson();

        assert_eq!(
            layout.classify(Line::Red, "95th/Dan Ryan").unwrap().destination,
            "95th"
        );
        assert_eq!(
            layout.classify(Line::Purple, "Loop").unwrap().destination,
            "Loop"
        );
        assert_eq!(
            layout
                .classify(Line::Purple, "Linden")
                .unwrap()
                .destination,
            "Linden"
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let layout = StationLayout::wilson();
        let rule = layout.classify(Line::Red, "Howard, 95th/Dan Ryan").unwrap();
        assert_eq!(rule.destination, "Howard");
    }

    #[test]
    fn unknown_destination_or_line_is_unclassified() {
        let layout = StationLayout::wilson();
        assert!(layout.classify(Line::Red, "Roosevelt").is_none());
        assert!(layout.classify(Line::Brown, "Loop").is_none());
    }

    #[test]
    fn last_train_only_on_configured_lines() {
        let layout = StationLayout::wilson();
        assert!(layout.is_last_train(Line::Purple, true));
        assert!(!layout.is_last_train(Line::Purple, false));
        assert!(!layout.is_last_train(Line::Red, true));
    }

    #[test]
    fn holiday_train_from_flag_or_marker() {
        let layout = StationLayout::wilson();
        assert!(layout.is_holiday_train(Line::Red, true, "Howard"));
        assert!(layout.is_holiday_train(Line::Red, false, "Holiday Train to Howard"));
        assert!(layout.is_holiday_train(Line::Red, false, "Santa Express"));
        assert!(!layout.is_holiday_train(Line::Red, false, "Howard"));
        assert!(!layout.is_holiday_train(Line::Purple, true, "Holiday Linden"));
    }

    #[test]
    fn flags_generalize_to_other_lines() {
        let layout = StationLayout::new()
            .with_direction(Line::Brown, "Kimball", &["Kimball"])
            .with_last_train_line(Line::Brown)
            .with_holiday_line(Line::Brown)
            .with_holiday_markers(&["Jingle"]);

        assert!(layout.is_last_train(Line::Brown, true));
        assert!(layout.is_holiday_train(Line::Brown, false, "Jingle Kimball"));
        assert!(!layout.is_holiday_train(Line::Brown, false, "Santa Kimball"));
    }

    #[test]
    fn duplicate_flag_lines_are_ignored() {
        let layout = StationLayout::new()
            .with_last_train_line(Line::Purple)
            .with_last_train_line(Line::Purple);
        assert_eq!(layout.last_train_lines, vec![Line::Purple]);
    }
}
