//! Configuration file loading.
//!
//! Reads `config/default.toml`:
//!
//! ```toml
//! [tmdb]
//! base_url = "https://api.themoviedb.org/3"
//! language = "en-US"
//! timeout_secs = 10
//!
//! [skill]
//! search_depth = 3
//! apiv3 = ""
//! date_format = "%A, %B %-d, %Y"
//! dialogs_dir = "locale/en-us"
//! ```
//!
//! Every key is optional.  Environment variables override the file:
//! `TMDB_API_KEY`, `MOVIEMASTER_SEARCH_DEPTH`, `MOVIEMASTER_LANGUAGE`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use moviemaster_tmdb::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TmdbClient};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, SkillError};
use crate::formatter::{DEFAULT_DATE_FORMAT, ResponseFormatter, is_valid_date_format};
use crate::settings::{DEFAULT_LANGUAGE, DEFAULT_SEARCH_DEPTH, SkillSettings};

/// The `[tmdb]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TmdbSection {
    pub base_url: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for TmdbSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// The `[skill]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkillSection {
    pub search_depth: usize,
    pub apiv3: String,
    pub date_format: String,
    pub dialogs_dir: Option<PathBuf>,
}

impl Default for SkillSection {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            apiv3: String::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            dialogs_dir: None,
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovieMasterConfig {
    pub tmdb: TmdbSection,
    pub skill: SkillSection,
}

impl MovieMasterConfig {
    /// Load `path`, falling back to defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SkillError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| SkillError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject values that parse as TOML but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_date_format(&self.skill.date_format) {
            return Err(SkillError::InvalidSetting {
                key: "skill.date_format".to_string(),
                reason: format!("{:?} is not a valid strftime format", self.skill.date_format),
            });
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup("TMDB_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.skill.apiv3 = key.trim().to_string();
        }

        if let Some(depth) = lookup("MOVIEMASTER_SEARCH_DEPTH") {
            self.skill.search_depth =
                depth
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| SkillError::InvalidSetting {
                        key: "MOVIEMASTER_SEARCH_DEPTH".to_string(),
                        reason: e.to_string(),
                    })?;
        }

        if let Some(language) = lookup("MOVIEMASTER_LANGUAGE").filter(|l| !l.trim().is_empty()) {
            self.tmdb.language = language.trim().to_string();
        }

        Ok(())
    }

    /// The user settings this configuration describes.
    pub fn settings(&self) -> SkillSettings {
        SkillSettings {
            search_depth: self.skill.search_depth,
            apiv3: self.skill.apiv3.clone(),
            language: self.tmdb.language.clone(),
        }
    }

    /// A TMDb client for the configured endpoint.
    pub fn client(&self) -> TmdbClient {
        TmdbClient::with_base_url(&self.tmdb.base_url, Duration::from_secs(self.tmdb.timeout_secs))
    }

    /// A formatter using the configured date format.
    pub fn formatter(&self) -> ResponseFormatter {
        ResponseFormatter::new(self.skill.date_format.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
