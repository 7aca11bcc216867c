//! Intent routing error types.

/// Unified error type for the intent crate.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// A route pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The handler name is not one of the skill's intents.
    #[error("unknown intent: {0}")]
    UnknownIntent(String),

    /// The intent needs a `movie` slot and the utterance did not provide one.
    #[error("intent `{intent}` requires a movie title")]
    MissingMovie { intent: String },

    /// The utterance did not match any route.
    #[error("no route matched: {0}")]
    Unmatched(String),
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, IntentError>;
