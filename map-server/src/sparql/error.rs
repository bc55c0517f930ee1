//! SPARQL client error types.

use std::fmt;
use std::sync::Arc;

/// Errors from the SPARQL HTTP client and row typing.
#[derive(Debug)]
pub enum SparqlError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// Results JSON could not be deserialized
    Json {
        message: String,
        body: Option<String>,
    },

    /// Endpoint returned an error status code
    Endpoint { status: u16, message: String },

    /// Rate limited by the endpoint
    RateLimited,

    /// A SELECT variable expected by the caller was absent from a row
    MissingVar { var: String },

    /// A variable was present but its value had the wrong shape
    Malformed {
        var: String,
        value: String,
        expected: &'static str,
    },

    /// Error propagated from a coalesced in-flight request for the same key
    Shared(Arc<SparqlError>),
}

impl fmt::Display for SparqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SparqlError::Http(e) => write!(f, "HTTP error: {e}"),
            SparqlError::Json { message, body } => {
                write!(f, "results parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            SparqlError::Endpoint { status, message } => {
                write!(f, "endpoint error {status}: {message}")
            }
            SparqlError::RateLimited => write!(f, "rate limited by the SPARQL endpoint"),
            SparqlError::MissingVar { var } => write!(f, "variable ?{var} missing from row"),
            SparqlError::Malformed {
                var,
                value,
                expected,
            } => write!(f, "variable ?{var} has value {value:?}, expected {expected}"),
            SparqlError::Shared(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for SparqlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SparqlError::Http(e) => Some(e),
            SparqlError::Shared(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SparqlError {
    fn from(err: reqwest::Error) -> Self {
        SparqlError::Http(err)
    }
}

impl From<Arc<SparqlError>> for SparqlError {
    fn from(err: Arc<SparqlError>) -> Self {
        SparqlError::Shared(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SparqlError::Endpoint {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "endpoint error 503: Service Unavailable");

        let err = SparqlError::MissingVar { var: "lat".into() };
        assert_eq!(err.to_string(), "variable ?lat missing from row");

        let err = SparqlError::Malformed {
            var: "distance".into(),
            value: "abc".into(),
            expected: "an integer",
        };
        assert!(err.to_string().contains("?distance"));
        assert!(err.to_string().contains("an integer"));
    }

    #[test]
    fn shared_error_forwards_display() {
        let inner = Arc::new(SparqlError::RateLimited);
        let err = SparqlError::Shared(inner);
        assert_eq!(err.to_string(), "rate limited by the SPARQL endpoint");
    }
}
