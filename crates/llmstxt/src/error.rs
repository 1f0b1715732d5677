//! Error types for catalog fetching

use thiserror::Error;

/// Errors that can occur while fetching a store catalog
///
/// Generation itself never fails; every variant here comes from the
/// fetch side of a fetch-then-generate cycle.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Required configuration value is missing
    #[error("Missing required parameter: {0}")]
    MissingConfig(&'static str),

    /// Endpoint URL could not be parsed
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// Platform rejected the access token or session
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request timed out
    #[error("Request timed out: store did not respond in time")]
    Timeout,

    /// Failed to connect to the store
    #[error("Failed to connect to store")]
    ConnectError(#[source] reqwest::Error),

    /// GraphQL response carried an `errors` array
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Malformed, partial or otherwise unusable response
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Generated output could not be written
    #[error("Failed to write output: {0}")]
    Output(String),

    /// Snapshot file could not be read or parsed
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl CatalogError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_connect() {
            CatalogError::ConnectError(err)
        } else {
            CatalogError::Upstream(err.to_string())
        }
    }

    /// True when the failure is an authentication problem rather than an
    /// upstream or configuration one
    pub fn is_auth(&self) -> bool {
        matches!(self, CatalogError::Auth(_))
    }
}
