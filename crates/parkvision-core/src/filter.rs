// ── Spot status filter ──
//
// The lot detail screen's "show only X" selector.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::model::{Spot, SpotStatus};

/// Which spots to keep when listing a lot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SpotStatus),
}

impl StatusFilter {
    pub fn matches(self, status: SpotStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    /// Accepts `all` or any status name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if lowered == "all" {
            return Ok(Self::All);
        }
        lowered
            .parse::<SpotStatus>()
            .map(Self::Only)
            .map_err(|_| CoreError::ValidationFailed {
                message: format!(
                    "unknown status filter '{s}' (expected all, vacant, occupied, reserved or unknown)"
                ),
            })
    }
}

/// Spots matching `filter`, in their original order.
pub fn filter_spots(spots: &[Spot], filter: StatusFilter) -> Vec<&Spot> {
    spots.iter().filter(|s| filter.matches(s.status)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::SpotId;

    fn spot(id: i64, status: SpotStatus) -> Spot {
        Spot {
            id: SpotId(id),
            lot_id: None,
            label: id.to_string(),
            status,
            last_detected_at: None,
            bounds: None,
            polygon: None,
        }
    }

    fn fixture() -> Vec<Spot> {
        vec![
            spot(1, SpotStatus::Occupied),
            spot(2, SpotStatus::Vacant),
            spot(3, SpotStatus::Occupied),
            spot(4, SpotStatus::Unknown),
        ]
    }

    #[test]
    fn all_keeps_everything_in_order() {
        let spots = fixture();
        let ids: Vec<i64> = filter_spots(&spots, StatusFilter::All)
            .iter()
            .map(|s| s.id.get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn only_keeps_matching_spots() {
        let spots = fixture();
        let occupied = filter_spots(&spots, StatusFilter::Only(SpotStatus::Occupied));
        assert_eq!(occupied.len(), 2);
        assert!(occupied.iter().all(|s| s.status == SpotStatus::Occupied));

        let reserved = filter_spots(&spots, StatusFilter::Only(SpotStatus::Reserved));
        assert!(reserved.is_empty());
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            " Vacant ".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(SpotStatus::Vacant)
        );
        assert!("parked".parse::<StatusFilter>().is_err());
    }
}
