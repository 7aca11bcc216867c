//! TMDb client error types.
//!
//! Every request surfaces failures through [`TmdbError`].  The variants keep
//! credential problems, missing resources and transport failures apart so
//! that callers can pick a user-facing message without parsing strings.

/// Unified error type for the TMDb client.
#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    /// No API key was configured for the request.
    #[error("no TMDb API key configured")]
    MissingApiKey,

    /// TMDb rejected the API key (HTTP 401).
    #[error("TMDb rejected the API key: {message}")]
    InvalidApiKey { message: String },

    /// The requested resource does not exist (HTTP 404, or an empty search).
    #[error("not found: {what}")]
    NotFound { what: String },

    /// TMDb answered with a status the client does not handle.
    #[error("TMDb returned {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The request did not complete (connect failure, timeout, TLS, ...).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode TMDb response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL or a request path could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl TmdbError {
    /// Returns `true` if the failure is a credential problem.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::InvalidApiKey { .. })
    }
}

/// Convenience alias used throughout the TMDb crate.
pub type Result<T> = std::result::Result<T, TmdbError>;
