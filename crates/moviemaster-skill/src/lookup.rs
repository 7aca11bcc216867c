//! The fetch step and its user-facing failure taxonomy.
//!
//! Handlers never propagate errors to the host.  Every TMDb failure is folded
//! into a [`LookupError`] here, and [`LookupError::apology`] picks the dialog
//! the user hears.

use moviemaster_tmdb::{MovieRecord, MovieSource, Session, TmdbError};
use tracing::debug;

use crate::dialog::{DialogKey, Utterance};

/// A spoken movie title, as the user said it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub title: String,
}

impl MovieQuery {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Why a lookup produced no answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No API key is configured.
    #[error("no API key configured")]
    NoCredential,

    /// TMDb rejected the API key.
    #[error("API key rejected")]
    InvalidCredential,

    /// Nothing matched the query.
    #[error("no matching movie")]
    NotFound,

    /// Anything else: transport, decode, unexpected status.
    #[error("lookup failed: {0}")]
    Unclassified(String),
}

impl From<TmdbError> for LookupError {
    fn from(err: TmdbError) -> Self {
        match err {
            TmdbError::MissingApiKey => Self::NoCredential,
            TmdbError::InvalidApiKey { .. } => Self::InvalidCredential,
            TmdbError::NotFound { .. } => Self::NotFound,
            other => Self::Unclassified(other.to_string()),
        }
    }
}

impl LookupError {
    /// The dialog the user hears for this failure.  `subject` fills the
    /// `{movie}` slot of the not-found dialog.
    pub fn apology(&self, subject: &str) -> Utterance {
        match self {
            Self::NoCredential => Utterance::bare(DialogKey::NoApi),
            // Unclassified failures share the credential message.
            Self::InvalidCredential | Self::Unclassified(_) => Utterance::bare(DialogKey::NoValidApi),
            Self::NotFound => Utterance::dialog(DialogKey::NoInfo, [("movie", subject)]),
        }
    }
}

/// Build the per-request session, rejecting an unset key up front.
pub fn session_for(api_key: &str, language: &str) -> Result<Session, LookupError> {
    if api_key.trim().is_empty() {
        return Err(LookupError::NoCredential);
    }
    Ok(Session::new(api_key.trim(), language))
}

/// Fetch the best match for `query`.
///
/// A title with no match is `Ok(None)`, not an error: the formatter decides
/// how to speak an absent record.
pub async fn fetch_record<S>(
    source: &S,
    session: &Session,
    query: &MovieQuery,
) -> Result<Option<MovieRecord>, LookupError>
where
    S: MovieSource + ?Sized,
{
    match source.lookup_movie(session, &query.title).await {
        Ok(record) => Ok(Some(record)),
        Err(err) => match LookupError::from(err) {
            LookupError::NotFound => {
                debug!(title = %query.title, "no movie matched");
                Ok(None)
            }
            other => Err(other),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
