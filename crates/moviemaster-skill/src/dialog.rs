//! Dialog keys, utterances and template rendering.
//!
//! The skill never produces final sentences for its structured answers.  It
//! emits [`Utterance::Dialog`] values (a template key plus named values) and
//! leaves wording to [`DialogTemplates`], which ships an `en-us` table and
//! can be overridden from a directory of `<key>.dialog` files.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SkillError};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Identifier of a dialog template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DialogKey {
    #[serde(rename = "no.api")]
    NoApi,
    #[serde(rename = "no.valid.api")]
    NoValidApi,
    #[serde(rename = "no.info")]
    NoInfo,
    #[serde(rename = "movie.description")]
    Description,
    #[serde(rename = "movie.info.response")]
    InfoResponse,
    #[serde(rename = "movie.year")]
    Year,
    #[serde(rename = "movie.cast")]
    Cast,
    #[serde(rename = "movie.cast.single")]
    CastSingle,
    #[serde(rename = "movie.production.single")]
    ProductionSingle,
    #[serde(rename = "movie.production.multiple")]
    ProductionMultiple,
    #[serde(rename = "movie.genre.single")]
    GenreSingle,
    #[serde(rename = "movie.genre.multiple")]
    GenreMultiple,
    #[serde(rename = "movie.runtime")]
    Runtime,
    #[serde(rename = "movie.popular")]
    Popular,
    #[serde(rename = "movie.top")]
    Top,
}

impl DialogKey {
    pub const ALL: [DialogKey; 15] = [
        Self::NoApi,
        Self::NoValidApi,
        Self::NoInfo,
        Self::Description,
        Self::InfoResponse,
        Self::Year,
        Self::Cast,
        Self::CastSingle,
        Self::ProductionSingle,
        Self::ProductionMultiple,
        Self::GenreSingle,
        Self::GenreMultiple,
        Self::Runtime,
        Self::Popular,
        Self::Top,
    ];

    /// The template identifier, e.g. `movie.genre.multiple`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoApi => "no.api",
            Self::NoValidApi => "no.valid.api",
            Self::NoInfo => "no.info",
            Self::Description => "movie.description",
            Self::InfoResponse => "movie.info.response",
            Self::Year => "movie.year",
            Self::Cast => "movie.cast",
            Self::CastSingle => "movie.cast.single",
            Self::ProductionSingle => "movie.production.single",
            Self::ProductionMultiple => "movie.production.multiple",
            Self::GenreSingle => "movie.genre.single",
            Self::GenreMultiple => "movie.genre.multiple",
            Self::Runtime => "movie.runtime",
            Self::Popular => "movie.popular",
            Self::Top => "movie.top",
        }
    }

    /// Look a key up by its identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Built-in `en-us` wording.
    fn default_template(self) -> &'static str {
        match self {
            Self::NoApi => {
                "You need to add a TMDb API key in the skill settings before I can look up movies."
            }
            Self::NoValidApi => {
                "The Movie Database did not accept the API key. Please check your skill settings."
            }
            Self::NoInfo => "I could not find any information about {movie}.",
            Self::Description => "Here is what {movie} is about.",
            Self::InfoResponse => "{movie} was released on {year} with a budget of {budget} dollars.",
            Self::Year => "{movie} was released on {year}.",
            Self::Cast => "{movie} stars {actorlist} and {lastactor}.",
            Self::CastSingle => "{movie} stars {actor}.",
            Self::ProductionSingle => "{movie} was made by {company}.",
            Self::ProductionMultiple => "{movie} was made by {companies} and {lastcompany}.",
            Self::GenreSingle => "{movie} is a {genre} movie.",
            Self::GenreMultiple => "{movie} is considered {genrelist} and {genrelistlast}.",
            Self::Runtime => "{movie} runs for {runtime} minutes.",
            Self::Popular => "The popular movies right now are {popularlist}.",
            Self::Top => "The top rated movies are {toplist}.",
        }
    }
}

impl fmt::Display for DialogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Utterances
// ---------------------------------------------------------------------------

/// Named substitution values for a dialog template.
pub type DialogParams = BTreeMap<String, String>;

/// One thing the skill wants the host to say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Utterance {
    /// Render a dialog template.
    Dialog { key: DialogKey, params: DialogParams },
    /// Speak a sentence as-is.
    Text { text: String },
}

impl Utterance {
    /// A dialog utterance from `(name, value)` pairs.
    pub fn dialog<I, K, V>(key: DialogKey, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Dialog {
            key,
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// A dialog utterance with no values.
    pub fn bare(key: DialogKey) -> Self {
        Self::Dialog {
            key,
            params: DialogParams::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The dialog key, if this is a dialog utterance.
    pub fn key(&self) -> Option<DialogKey> {
        match self {
            Self::Dialog { key, .. } => Some(*key),
            Self::Text { .. } => None,
        }
    }

    /// A named dialog value.
    pub fn param(&self, name: &str) -> Option<&str> {
        match self {
            Self::Dialog { params, .. } => params.get(name).map(String::as_str),
            Self::Text { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// `{name}` or `{{name}}`.
fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{?\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}?\}")
            .expect("placeholder pattern is valid")
    })
}

/// Dialog template table with `{name}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct DialogTemplates {
    overrides: HashMap<DialogKey, String>,
}

impl DialogTemplates {
    /// The built-in `en-us` table.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load `<key>.dialog` files from `dir` over the built-in table.
    ///
    /// Each file uses its first line that is neither blank nor a `#`
    /// comment.  Files whose name is not a known key are ignored.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut templates = Self::builtin();

        let entries = std::fs::read_dir(dir).map_err(|source| SkillError::Read {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("dialog") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(key) = DialogKey::from_name(stem) else {
                debug!(file = %path.display(), "ignoring unknown dialog file");
                continue;
            };

            let content = std::fs::read_to_string(&path).map_err(|source| SkillError::Read {
                path: path.clone(),
                source,
            })?;

            match content
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty() && !line.starts_with('#'))
            {
                Some(line) => {
                    templates.overrides.insert(key, line.to_string());
                }
                None => warn!(file = %path.display(), "dialog file has no usable line"),
            }
        }

        debug!(dir = %dir.display(), overrides = templates.overrides.len(), "dialog templates loaded");
        Ok(templates)
    }

    /// The template text for `key`.
    pub fn template(&self, key: DialogKey) -> &str {
        self.overrides
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_template())
    }

    /// Fill `key`'s template.  Unknown placeholders render empty.
    pub fn render(&self, key: DialogKey, params: &DialogParams) -> String {
        let filled = placeholder().replace_all(self.template(key), |caps: &regex::Captures<'_>| {
            params.get(&caps[1]).cloned().unwrap_or_default()
        });
        filled.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Render any utterance to the sentence the host would speak.
    pub fn speak(&self, utterance: &Utterance) -> String {
        match utterance {
            Utterance::Dialog { key, params } => self.render(*key, params),
            Utterance::Text { text } => text.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_round_trips_through_its_name() {
        for key in DialogKey::ALL {
            assert_eq!(DialogKey::from_name(key.as_str()), Some(key));
            assert_eq!(key.to_string(), key.as_str());
        }
        assert_eq!(DialogKey::from_name("movie.unknown"), None);
    }

    #[test]
    fn key_serializes_as_template_id() {
        let json = serde_json::to_value(DialogKey::GenreMultiple).unwrap();
        assert_eq!(json, "movie.genre.multiple");
    }

    #[test]
    fn render_fills_placeholders() {
        let templates = DialogTemplates::builtin();
        let params = DialogParams::from([
            ("movie".to_string(), "Heat".to_string()),
            ("runtime".to_string(), "170".to_string()),
        ]);
        assert_eq!(
            templates.render(DialogKey::Runtime, &params),
            "Heat runs for 170 minutes."
        );
    }

    #[test]
    fn missing_placeholder_renders_empty_without_double_spaces() {
        let templates = DialogTemplates::builtin();
        let rendered = templates.render(DialogKey::NoInfo, &DialogParams::new());
        assert_eq!(rendered, "I could not find any information about .");
    }

    #[test]
    fn load_dir_overrides_known_keys_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("movie.runtime.dialog"),
            "# runtime\n\n{{movie}} is {{runtime}} minutes long\nsecond variant\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("weather.dialog"), "sunny").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let templates = DialogTemplates::load_dir(dir.path()).unwrap();
        let params = DialogParams::from([
            ("movie".to_string(), "Alien".to_string()),
            ("runtime".to_string(), "117".to_string()),
        ]);
        assert_eq!(
            templates.render(DialogKey::Runtime, &params),
            "Alien is 117 minutes long"
        );
        assert_eq!(templates.template(DialogKey::Top), DialogKey::Top.default_template());
    }

    #[test]
    fn load_dir_missing_directory_is_an_error() {
        let err = DialogTemplates::load_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, SkillError::Read { .. }));
    }

    #[test]
    fn speak_passes_text_through() {
        let templates = DialogTemplates::builtin();
        assert_eq!(templates.speak(&Utterance::text("Hello there.")), "Hello there.");
    }

    #[test]
    fn utterance_accessors() {
        let utterance = Utterance::dialog(DialogKey::Year, [("movie", "Jaws"), ("year", "1975-06-20")]);
        assert_eq!(utterance.key(), Some(DialogKey::Year));
        assert_eq!(utterance.param("year"), Some("1975-06-20"));
        assert_eq!(Utterance::text("x").key(), None);
    }
}
