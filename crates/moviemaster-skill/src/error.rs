//! Skill error types.
//!
//! [`SkillError`] covers setup failures (configuration, dialog files).  The
//! per-request failures a user can hear about live in
//! [`crate::lookup::LookupError`] instead, because handlers never return
//! them as errors.

use std::path::PathBuf;

/// Unified error type for skill setup.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// A configuration or dialog file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for our schema.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configuration value is out of range or malformed.
    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting { key: String, reason: String },
}

/// Convenience alias used throughout the skill crate.
pub type Result<T> = std::result::Result<T, SkillError>;
