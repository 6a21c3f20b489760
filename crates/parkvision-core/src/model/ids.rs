// ── Identity types ──
//
// The backend keys lots, spots and users by integer primary keys. Distinct
// newtypes keep a spot id from being passed where a lot id is expected.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

integer_id!(
    /// Primary key of a parking lot.
    LotId
);
integer_id!(
    /// Primary key of a parking spot.
    SpotId
);
integer_id!(
    /// Primary key of a user account.
    UserId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let id: LotId = " 42 ".parse().unwrap();
        assert_eq!(id, LotId(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric() {
        assert!("north".parse::<SpotId>().is_err());
    }

    #[test]
    fn serializes_transparently() {
        assert_eq!(serde_json::to_string(&UserId(7)).unwrap(), "7");
    }
}
