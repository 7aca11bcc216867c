//! The movie intent vocabulary.
//!
//! [`MovieIntent`] is the typed form of every request the skill answers.
//! [`default_router`] registers the English phrasings that map onto it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IntentError, Result};
use crate::router::{IntentRouter, RouteResult};

/// A recognized movie request with its extracted slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum MovieIntent {
    /// Speak the overview, sentence by sentence.
    Description { movie: String },
    /// Release date, budget and tagline.
    Information { movie: String },
    /// Release date only.
    Year { movie: String },
    /// Billed cast, up to the search depth.
    Cast { movie: String },
    /// Production companies, up to the search depth.
    Production { movie: String },
    /// Genres, up to the search depth.
    Genres { movie: String },
    /// Runtime in minutes.
    Runtime { movie: String },
    /// Today's popular movies.
    Popular,
    /// Top rated movies.
    TopRated,
}

impl MovieIntent {
    /// Every handler name, in registration order.
    pub const NAMES: [&'static str; 9] = [
        "movie.description",
        "movie.information",
        "movie.year",
        "movie.cast",
        "movie.production",
        "movie.genres",
        "movie.runtime",
        "movie.popular",
        "movie.top",
    ];

    /// Build an intent from a handler name and an optional `movie` slot.
    pub fn from_parts(handler: &str, movie: Option<&str>) -> Result<Self> {
        let title = || -> Result<String> {
            movie
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .ok_or_else(|| IntentError::MissingMovie {
                    intent: handler.to_string(),
                })
        };

        Ok(match handler {
            "movie.description" => Self::Description { movie: title()? },
            "movie.information" => Self::Information { movie: title()? },
            "movie.year" => Self::Year { movie: title()? },
            "movie.cast" => Self::Cast { movie: title()? },
            "movie.production" => Self::Production { movie: title()? },
            "movie.genres" => Self::Genres { movie: title()? },
            "movie.runtime" => Self::Runtime { movie: title()? },
            "movie.popular" => Self::Popular,
            "movie.top" => Self::TopRated,
            other => return Err(IntentError::UnknownIntent(other.to_string())),
        })
    }

    /// Convert a router outcome into an intent.
    pub fn from_route(route: &RouteResult) -> Result<Self> {
        match route {
            RouteResult::Unmatched { utterance } => Err(IntentError::Unmatched(utterance.clone())),
            matched => Self::from_parts(matched.handler(), matched.capture("movie")),
        }
    }

    /// The handler name this intent is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Description { .. } => "movie.description",
            Self::Information { .. } => "movie.information",
            Self::Year { .. } => "movie.year",
            Self::Cast { .. } => "movie.cast",
            Self::Production { .. } => "movie.production",
            Self::Genres { .. } => "movie.genres",
            Self::Runtime { .. } => "movie.runtime",
            Self::Popular => "movie.popular",
            Self::TopRated => "movie.top",
        }
    }

    /// The `movie` slot, if this intent has one.
    pub fn movie(&self) -> Option<&str> {
        match self {
            Self::Description { movie }
            | Self::Information { movie }
            | Self::Year { movie }
            | Self::Cast { movie }
            | Self::Production { movie }
            | Self::Genres { movie }
            | Self::Runtime { movie } => Some(movie),
            Self::Popular | Self::TopRated => None,
        }
    }
}

impl fmt::Display for MovieIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.movie() {
            Some(movie) => write!(f, "{} ({movie})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

const EXACT_PHRASES: &[(&str, &str)] = &[
    ("popular movies", "movie.popular"),
    ("popular films", "movie.popular"),
    ("what's popular", "movie.popular"),
    ("top rated movies", "movie.top"),
    ("top rated films", "movie.top"),
    ("top movies", "movie.top"),
    ("best movies", "movie.top"),
];

// `movie` is optional in the grammar so that an utterance without a title
// still routes and fails with `MissingMovie` instead of `Unmatched`.
const PATTERNS: &[(&str, &str)] = &[
    (r"(?:describe|what is the plot of|what's the plot of|what happens in)(?: the (?:movie|film))? ?(?P<movie>.*)", "movie.description"),
    (r"(?:tell me about|information (?:about|on)|info (?:about|on)|what do you know about)(?: the (?:movie|film))? ?(?P<movie>.*)", "movie.information"),
    (r"(?:when (?:was|did) (?P<movie>.+?) (?:come out|released|release|premiere)|what year (?:was|did) (?P<movie2>.+?) (?:come out|released|release))", "movie.year"),
    (r"(?:who (?:stars|starred|acts|acted|plays|played) in|who is in|what is the cast of|what's the cast of|cast of)(?: the (?:movie|film))? ?(?P<movie>.*)", "movie.cast"),
    (r"(?:who (?:made|produced)|what companies (?:made|produced)|production companies (?:of|for)|who is the studio behind)(?: the (?:movie|film))? ?(?P<movie>.*)", "movie.production"),
    (r"(?:what (?:genre|genres|kind of movie|type of movie) is|genres? of)(?: the (?:movie|film))? ?(?P<movie>.*)", "movie.genres"),
    (r"(?:how long is|what is the runtime of|what's the runtime of|runtime of|length of)(?: the (?:movie|film))? ?(?P<movie>.*)", "movie.runtime"),
];

/// Build a router loaded with the English movie vocabulary.
pub fn default_router() -> Result<IntentRouter> {
    let mut router = IntentRouter::new();
    for (phrase, handler) in EXACT_PHRASES {
        router.add_exact(*phrase, *handler);
    }
    for (pattern, handler) in PATTERNS {
        router.add_pattern(*pattern, *handler)?;
    }
    Ok(router)
}

/// Route `utterance` through `router` and convert the result.
pub fn recognize(router: &mut IntentRouter, utterance: &str) -> Result<MovieIntent> {
    let route = router.route(utterance);
    match &route {
        // The year pattern has two alternatives; fold the second slot in.
        RouteResult::PatternMatch { handler, captures } if captures.contains_key("movie2") => {
            MovieIntent::from_parts(handler, captures.get("movie2").map(String::as_str))
        }
        _ => MovieIntent::from_route(&route),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_requires_movie_for_title_intents() {
        let err = MovieIntent::from_parts("movie.cast", None).unwrap_err();
        assert!(matches!(err, IntentError::MissingMovie { .. }));

        let err = MovieIntent::from_parts("movie.runtime", Some("   ")).unwrap_err();
        assert!(matches!(err, IntentError::MissingMovie { .. }));
    }

    #[test]
    fn from_parts_ignores_movie_for_lists() {
        assert_eq!(
            MovieIntent::from_parts("movie.top", Some("ignored")).unwrap(),
            MovieIntent::TopRated
        );
    }

    #[test]
    fn unknown_handler_is_rejected() {
        let err = MovieIntent::from_parts("weather.today", None).unwrap_err();
        assert!(matches!(err, IntentError::UnknownIntent(name) if name == "weather.today"));
    }

    #[test]
    fn name_round_trips_through_from_parts() {
        for name in MovieIntent::NAMES {
            let intent = MovieIntent::from_parts(name, Some("Heat")).unwrap();
            assert_eq!(intent.name(), name);
        }
    }

    #[test]
    fn display_includes_title() {
        let intent = MovieIntent::Cast { movie: "Heat".into() };
        assert_eq!(intent.to_string(), "movie.cast (Heat)");
        assert_eq!(MovieIntent::Popular.to_string(), "movie.popular");
    }

    #[test]
    fn serializes_with_intent_tag() {
        let json = serde_json::to_value(MovieIntent::Year { movie: "Alien".into() }).unwrap();
        assert_eq!(json["intent"], "year");
        assert_eq!(json["movie"], "Alien");
    }
}
