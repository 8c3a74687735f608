//! Transit line identifiers.

use std::fmt;

use serde::Serialize;

/// A CTA rail line.
///
/// The arrivals feed identifies lines by short route codes (`"Red"`, `"P"`,
/// `"Brn"`, ...). This type maps between those codes and a fixed set of
/// variants so the rest of the system never compares raw route strings.
///
/// # Examples
///
/// ```
/// use arrivals_server::domain::Line;
///
/// assert_eq!(Line::from_route_code("P"), Some(Line::Purple));
/// assert_eq!(Line::Purple.route_code(), "P");
/// assert_eq!(Line::Purple.to_string(), "Purple");
/// assert_eq!(Line::from_route_code("Bus"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Line {
    Red,
    Blue,
    Brown,
    Green,
    Orange,
    Purple,
    Pink,
    Yellow,
}

impl Line {
    /// Every line, in the order the CTA lists them.
    pub const ALL: [Line; 8] = [
        Line::Red,
        Line::Blue,
        Line::Brown,
        Line::Green,
        Line::Orange,
        Line::Purple,
        Line::Pink,
        Line::Yellow,
    ];

    /// Look up a line by the route code used in the arrivals feed.
    ///
    /// Matching is exact; the feed always sends these codes with this casing.
    pub fn from_route_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|line| line.route_code() == code)
    }

    /// The route code the arrivals feed uses for this line.
    pub fn route_code(&self) -> &'static str {
        match self {
            Line::Red => "Red",
            Line::Blue => "Blue",
            Line::Brown => "Brn",
            Line::Green => "G",
            Line::Orange => "Org",
            Line::Purple => "P",
            Line::Pink => "Pink",
            Line::Yellow => "Y",
        }
    }

    /// Human-readable line name.
    pub fn name(&self) -> &'static str {
        match self {
            Line::Red => "Red",
            Line::Blue => "Blue",
            Line::Brown => "Brown",
            Line::Green => "Green",
            Line::Orange => "Orange",
            Line::Purple => "Purple",
            Line::Pink => "Pink",
            Line::Yellow => "Yellow",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
