//! SPARQL 1.1 JSON results format.
//!
//! The endpoint returns `application/sparql-results+json`: a `head` listing
//! the SELECT variables and a `results.bindings` array where each binding
//! maps a variable name to an RDF term. Every value, including coordinates
//! and distances, arrives as a string; the typed accessors on [`Row`] do
//! the numeric parsing so callers never touch raw strings.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::LatLng;

use super::error::SparqlError;

/// Top-level SELECT response.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponse {
    pub head: Head,
    pub results: Bindings,
}

/// Header listing the projected variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub vars: Vec<String>,
}

/// The result rows.
#[derive(Debug, Clone, Deserialize)]
pub struct Bindings {
    pub bindings: Vec<Row>,
}

/// A single RDF term in a binding.
#[derive(Debug, Clone, Deserialize)]
pub struct Term {
    /// Term kind: "uri", "literal" or "bnode".
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default)]
    pub datatype: Option<String>,
}

impl Term {
    /// A plain literal term (convenient for constructing rows in tests).
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: "literal".to_string(),
            value: value.into(),
            datatype: None,
        }
    }

    /// A URI term.
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: "uri".to_string(),
            value: value.into(),
            datatype: None,
        }
    }
}

/// One result row: variable name → term.
///
/// Unbound variables are simply absent from the map.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Row(HashMap<String, Term>);

impl Row {
    /// Build a row from variable/term pairs.
    pub fn new(terms: impl IntoIterator<Item = (String, Term)>) -> Self {
        Row(terms.into_iter().collect())
    }

    /// The raw value of a variable, if bound.
    pub fn get(&self, var: &str) -> Option<&str> {
        self.0.get(var).map(|t| t.value.as_str())
    }

    /// The value of a required variable.
    pub fn str(&self, var: &str) -> Result<&str, SparqlError> {
        self.get(var).ok_or_else(|| SparqlError::MissingVar {
            var: var.to_string(),
        })
    }

    /// A required variable parsed as a float (coordinates).
    pub fn f64(&self, var: &str) -> Result<f64, SparqlError> {
        let raw = self.str(var)?;
        raw.trim()
            .parse()
            .map_err(|_| SparqlError::Malformed {
                var: var.to_string(),
                value: raw.to_string(),
                expected: "a decimal number",
            })
    }

    /// A required variable parsed as an unsigned integer (counts).
    pub fn u64(&self, var: &str) -> Result<u64, SparqlError> {
        let raw = self.str(var)?;
        raw.trim()
            .parse()
            .map_err(|_| SparqlError::Malformed {
                var: var.to_string(),
                value: raw.to_string(),
                expected: "an integer",
            })
    }

    /// A required variable parsed as a distance in whole metres.
    ///
    /// The endpoint sometimes returns `geof:distance` uncast, so a decimal
    /// value is accepted and truncated.
    pub fn distance_m(&self, var: &str) -> Result<u32, SparqlError> {
        let raw = self.str(var)?;
        let trimmed = raw.trim();
        if let Ok(v) = trimmed.parse::<u32>() {
            return Ok(v);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
            .ok_or_else(|| SparqlError::Malformed {
                var: var.to_string(),
                value: raw.to_string(),
                expected: "a non-negative number of metres",
            })
    }

    /// A required variable holding a WKT point, parsed into a coordinate.
    ///
    /// WKT stores `POINT(lng lat)` with longitude first.
    pub fn wkt_point(&self, var: &str) -> Result<LatLng, SparqlError> {
        let raw = self.str(var)?;
        parse_wkt_point(raw).ok_or_else(|| SparqlError::Malformed {
            var: var.to_string(),
            value: raw.to_string(),
            expected: "a WKT POINT",
        })
    }
}

/// Parse `POINT(lng lat)` into a coordinate.
fn parse_wkt_point(s: &str) -> Option<LatLng> {
    let body = s
        .trim()
        .strip_prefix("POINT")?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let mut parts = body.split_whitespace();
    let lng: f64 = parts.next()?.parse().ok()?;
    let lat: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(LatLng::new(lat, lng))
}
