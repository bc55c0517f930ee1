//! SPARQL HTTP client.
//!
//! Issues SELECT queries against a SPARQL endpoint and returns the parsed
//! result rows. A semaphore bounds concurrent requests so a burst of UI
//! actions cannot flood the public endpoint.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;

use super::error::SparqlError;
use super::results::{Row, SelectResponse};

/// Default endpoint: the LINDAS linked-data service.
pub const DEFAULT_ENDPOINT: &str = "https://lindas.admin.ch/query";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the SPARQL client.
#[derive(Debug, Clone)]
pub struct SparqlConfig {
    /// Query endpoint URL
    pub endpoint: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }
}

impl SparqlConfig {
    /// Create a config for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// SPARQL endpoint client.
#[derive(Debug, Clone)]
pub struct SparqlClient {
    http: reqwest::Client,
    endpoint: String,
    semaphore: Arc<Semaphore>,
}

impl SparqlClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SparqlConfig) -> Result<Self, SparqlError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/sparql-results+json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Execute a SELECT query and return its rows.
    ///
    /// The query is sent as a form-encoded POST, which avoids URL length
    /// limits for the larger relation queries.
    pub async fn select(&self, query: &str) -> Result<Vec<Row>, SparqlError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SparqlError::Endpoint {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SparqlError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SparqlError::Endpoint {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: SelectResponse =
            serde_json::from_str(&body).map_err(|e| SparqlError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(parsed.results.bindings)
    }
}
