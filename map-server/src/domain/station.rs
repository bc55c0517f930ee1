//! Station identity and records.

use std::fmt;

use super::LatLng;

/// Error returned when parsing an invalid station ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station ID: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A validated station identifier.
///
/// Station IDs come from the DIDOK register and are the URI suffix after
/// `stop/` or the `dcterms:identifier` of a stop. They are interpolated
/// into SPARQL queries, so this type only admits characters that cannot
/// break out of a URI or string literal: ASCII alphanumerics plus `.`,
/// `-`, `_` and `:`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Parse a station ID from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }
        for c in s.chars() {
            if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':')) {
                return Err(InvalidStationId {
                    reason: "only ASCII alphanumerics and . - _ : are allowed",
                });
            }
        }
        Ok(StationId(s.to_string()))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A public-transit station with its display name and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub pos: LatLng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(StationId::parse("8503000").is_ok());
        assert!(StationId::parse("ch:1:sloid:3000").is_ok());
        assert!(StationId::parse("stop-8503000_x.y").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(StationId::parse("").is_err());
    }

    #[test]
    fn reject_query_breaking_characters() {
        assert!(StationId::parse("8503000>").is_err());
        assert!(StationId::parse("85 03000").is_err());
        assert!(StationId::parse("id\"x").is_err());
        assert!(StationId::parse("id/../../etc").is_err());
        assert!(StationId::parse("a}b{c").is_err());
    }

    #[test]
    fn display_roundtrip() {
        let id = StationId::parse("8503000").unwrap();
        assert_eq!(id.as_str(), "8503000");
        assert_eq!(id.to_string(), "8503000");
    }

    #[test]
    fn equality_and_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(StationId::parse("8503000").unwrap());
        assert!(set.contains(&StationId::parse("8503000").unwrap()));
        assert!(!set.contains(&StationId::parse("8507000").unwrap()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any ID built from the safe alphabet parses and round-trips.
        #[test]
        fn safe_alphabet_roundtrip(s in "[A-Za-z0-9._:-]{1,40}") {
            let id = StationId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Strings containing a quote, angle bracket or space never parse.
        #[test]
        fn unsafe_characters_rejected(
            prefix in "[A-Za-z0-9]{0,10}",
            bad in proptest::sample::select(vec!['"', '<', '>', ' ', '\\', '\'']),
            suffix in "[A-Za-z0-9]{0,10}",
        ) {
            let s = format!("{prefix}{bad}{suffix}");
            prop_assert!(StationId::parse(&s).is_err());
        }
    }
}
