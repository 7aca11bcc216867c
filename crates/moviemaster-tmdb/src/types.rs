//! Typed TMDb records.
//!
//! Only the attributes the skill actually speaks are modelled.  TMDb sends
//! `null` for many of them on obscure titles, so every field falls back to
//! its empty value instead of failing the whole decode.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Request context
// ---------------------------------------------------------------------------

/// Per-request API context.
///
/// Passed explicitly into every [`crate::MovieSource`] call so that no
/// credential or language lives in process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// TMDb v3 API key.
    pub api_key: String,
    /// ISO 639-1 language with optional region, e.g. `en-US`.
    pub language: String,
}

impl Session {
    /// Create a session for `api_key` in `language`.
    pub fn new(api_key: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            language: language.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A movie genre from the genre catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A production company credited on a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// One credited cast member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
}

impl CastMember {
    pub fn new(name: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            character: character.into(),
        }
    }
}

/// The `casts` block appended to movie details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<CastMember>,
}

/// Full movie details as returned by `GET /movie/{id}?append_to_response=casts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    /// ISO date, `YYYY-MM-DD`; empty when unknown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: u64,
    /// Minutes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub runtime: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tagline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<Company>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub casts: Casts,
}

impl MovieRecord {
    /// Billed cast in credit order.
    pub fn cast(&self) -> &[CastMember] {
        &self.casts.cast
    }
}

/// An entry of a search, popular or top-rated result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
}

impl MovieSummary {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: String::new(),
            overview: String::new(),
        }
    }
}

/// A page of movie results.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ResultPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<MovieSummary>,
}

/// Body of `GET /genre/movie/list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
}

/// TMDb's error body: `{"status_code": 7, "status_message": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StatusBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_message: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
