use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::OutOfDomainKey;

/// Shortest poolish fermentation in the table, in hours.
pub const MIN_FERMENTATION_HOURS: u8 = 12;
/// Longest poolish fermentation in the table, in hours.
pub const MAX_FERMENTATION_HOURS: u8 = 20;

/// Yeast as % of flour, indexed by `hours - MIN_FERMENTATION_HOURS`.
/// Longer windows need less yeast; odd hours sit at the geometric mean
/// of their neighbours.
const YEAST_PERCENT: [f64; 9] = [
    0.250, // 12 h
    0.200, // 13 h
    0.160, // 14 h
    0.126, // 15 h
    0.099, // 16 h
    0.078, // 17 h
    0.062, // 18 h
    0.049, // 19 h
    0.039, // 20 h
];

/// Poolish fermentation window, restricted to the hours the yeast table
/// covers. The only way in is [`TryFrom<u8>`], so [`yeast_percent`]
/// can't miss.
///
/// [`yeast_percent`]: FermentationHours::yeast_percent
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FermentationHours(u8);

impl FermentationHours {
    /// Every valid window, shortest first.
    pub fn all() -> impl Iterator<Item = FermentationHours> {
        (MIN_FERMENTATION_HOURS..=MAX_FERMENTATION_HOURS).map(FermentationHours)
    }

    pub fn hours(self) -> u8 {
        self.0
    }

    /// Dry yeast as a baker's percentage (0.099 means 0.099 % of flour).
    pub fn yeast_percent(self) -> f64 {
        YEAST_PERCENT[usize::from(self.0 - MIN_FERMENTATION_HOURS)]
    }
}

impl Default for FermentationHours {
    fn default() -> Self {
        FermentationHours(16)
    }
}

impl TryFrom<u8> for FermentationHours {
    type Error = OutOfDomainKey;

    fn try_from(hours: u8) -> Result<Self, Self::Error> {
        if (MIN_FERMENTATION_HOURS..=MAX_FERMENTATION_HOURS).contains(&hours) {
            Ok(FermentationHours(hours))
        } else {
            Err(OutOfDomainKey { hours })
        }
    }
}

impl From<FermentationHours> for u8 {
    fn from(h: FermentationHours) -> u8 {
        h.0
    }
}

impl fmt::Display for FermentationHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} h", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_values() {
        let pct = |h: u8| FermentationHours::try_from(h).unwrap().yeast_percent();
        assert_eq!(pct(12), 0.250);
        assert_eq!(pct(14), 0.160);
        assert_eq!(pct(16), 0.099);
        assert_eq!(pct(18), 0.062);
        assert_eq!(pct(20), 0.039);
    }

    #[test]
    fn test_table_strictly_decreasing() {
        let values: Vec<f64> = FermentationHours::all().map(|h| h.yeast_percent()).collect();
        assert_eq!(values.len(), 9);
        for pair in values.windows(2) {
            assert!(pair[0] > pair[1], "{} should exceed {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_out_of_domain_keys_rejected() {
        for hours in [0, 11, 21, 24, u8::MAX] {
            assert_eq!(
                FermentationHours::try_from(hours),
                Err(OutOfDomainKey { hours })
            );
        }
    }

    #[test]
    fn test_all_is_closed_set_in_order() {
        let hours: Vec<u8> = FermentationHours::all().map(u8::from).collect();
        assert_eq!(hours, (12..=20).collect::<Vec<u8>>());
    }
}
