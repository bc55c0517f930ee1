//! Zoning plans (fare-zone groupings).

use std::fmt;

/// Error returned when parsing an invalid zoning-plan URI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid zoning plan URI: {reason}")]
pub struct InvalidPlanUri {
    reason: &'static str,
}

/// A validated zoning-plan IRI.
///
/// Plan URIs are interpolated into SPARQL queries between angle brackets,
/// so this type rejects anything that could terminate the IRI early:
/// whitespace, quotes, backslashes and angle brackets. It also requires
/// an absolute http(s) scheme since that is all the endpoint serves.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PlanUri(String);

impl PlanUri {
    /// Parse a zoning-plan URI from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidPlanUri> {
        if !(s.starts_with("http://") || s.starts_with("https://")) {
            return Err(InvalidPlanUri {
                reason: "must be an absolute http(s) IRI",
            });
        }
        for c in s.chars() {
            if c.is_whitespace() || matches!(c, '<' | '>' | '"' | '\'' | '\\' | '`' | '{' | '}') {
                return Err(InvalidPlanUri {
                    reason: "contains characters not allowed in an IRI",
                });
            }
        }
        Ok(PlanUri(s.to_string()))
    }

    /// Returns the URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlanUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlanUri({})", self.0)
    }
}

impl fmt::Display for PlanUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named zoning plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoningPlan {
    pub uri: PlanUri,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_uri() {
        let uri = "https://lod.opentransportdata.swiss/zoningplan/nova/libero";
        assert_eq!(PlanUri::parse(uri).unwrap().as_str(), uri);
    }

    #[test]
    fn reject_relative() {
        assert!(PlanUri::parse("zoningplan/libero").is_err());
        assert!(PlanUri::parse("ftp://example.org/x").is_err());
    }

    #[test]
    fn reject_iri_breaking_characters() {
        assert!(PlanUri::parse("https://example.org/a> <b").is_err());
        assert!(PlanUri::parse("https://example.org/a b").is_err());
        assert!(PlanUri::parse("https://example.org/\"a\"").is_err());
    }
}
