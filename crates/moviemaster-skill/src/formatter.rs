//! Turns fetched movie records into dialog parameters.
//!
//! [`ResponseFormatter::format`] is pure: the same record, field and depth
//! always produce the same [`Formatted`] value, so a response can be
//! rebuilt (or replayed) without another fetch.

use std::fmt::Write as _;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use moviemaster_tmdb::MovieRecord;
use tracing::warn;

use crate::dialog::{DialogKey, DialogParams, Utterance};
use crate::list::{ListSummary, Phrasing};
use crate::lookup::MovieQuery;

/// Long date form used for `movie.info.response`, e.g.
/// `Tuesday, March 30, 1999`.
pub const DEFAULT_DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// Which aspect of a movie the user asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    Information,
    Year,
    Cast,
    Production,
    Genres,
    Runtime,
}

/// Which ranked list the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    Popular,
    TopRated,
}

impl Ranking {
    /// What to call the list in a not-found apology.
    pub fn subject(self) -> &'static str {
        match self {
            Self::Popular => "popular movies",
            Self::TopRated => "top rated movies",
        }
    }
}

/// A filled dialog plus any free sentences spoken after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub dialog: DialogKey,
    pub params: DialogParams,
    /// Spoken in order after the dialog.
    pub follow_up: Vec<String>,
}

impl Response {
    fn new(dialog: DialogKey, params: DialogParams) -> Self {
        Self {
            dialog,
            params,
            follow_up: Vec::new(),
        }
    }

    /// Flatten into the utterance sequence handed to the host.
    pub fn into_utterances(self) -> Vec<Utterance> {
        let mut utterances = Vec::with_capacity(1 + self.follow_up.len());
        utterances.push(Utterance::Dialog {
            key: self.dialog,
            params: self.params,
        });
        utterances.extend(self.follow_up.into_iter().map(Utterance::text));
        utterances
    }
}

/// Outcome of formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    Response(Response),
    /// Nothing worth saying; the caller speaks the no-information dialog.
    NotFound,
}

/// Builds dialog parameters from movie records.
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    date_format: String,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl ResponseFormatter {
    /// A formatter that renders release dates with a `chrono` format string.
    ///
    /// An invalid format string falls back to [`DEFAULT_DATE_FORMAT`].
    pub fn new(date_format: impl Into<String>) -> Self {
        let date_format = date_format.into();
        if !is_valid_date_format(&date_format) {
            warn!(date_format = %date_format, "invalid date format, using the default");
            return Self {
                date_format: DEFAULT_DATE_FORMAT.to_string(),
            };
        }
        Self { date_format }
    }

    /// The `chrono` format used for long dates.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Format `field` of `record` for `query`, mentioning at most `depth`
    /// list items.
    pub fn format(
        &self,
        query: &MovieQuery,
        record: Option<&MovieRecord>,
        field: Field,
        depth: usize,
    ) -> Formatted {
        let Some(record) = record else {
            return Formatted::NotFound;
        };
        let movie = query.title.as_str();

        match field {
            Field::Description => describe(movie, &record.overview),
            Field::Information => {
                let mut response = Response::new(
                    DialogKey::InfoResponse,
                    params([
                        ("movie", record.title.clone()),
                        ("year", self.long_date(&record.release_date)),
                        ("budget", record.budget.to_string()),
                    ]),
                );
                if !record.tagline.trim().is_empty() {
                    response.follow_up.push(record.tagline.clone());
                }
                Formatted::Response(response)
            }
            Field::Year => Formatted::Response(Response::new(
                DialogKey::Year,
                params([
                    ("movie", record.title.clone()),
                    ("year", record.release_date.clone()),
                ]),
            )),
            Field::Cast => {
                let billed = ListSummary::new(
                    record
                        .cast()
                        .iter()
                        .map(|member| format!("{} as {}", member.name, member.character)),
                    depth,
                );
                match billed.phrasing() {
                    None => Formatted::NotFound,
                    Some(Phrasing::Single(actor)) => Formatted::Response(Response::new(
                        DialogKey::CastSingle,
                        params([("movie", movie.to_string()), ("actor", actor)]),
                    )),
                    Some(Phrasing::Multiple { rest, last }) => Formatted::Response(Response::new(
                        DialogKey::Cast,
                        params([
                            ("movie", movie.to_string()),
                            ("actorlist", rest),
                            ("lastactor", last),
                        ]),
                    )),
                }
            }
            Field::Production => {
                let companies = ListSummary::new(
                    record.production_companies.iter().map(|c| c.name.clone()),
                    depth,
                );
                match companies.phrasing() {
                    None => Formatted::NotFound,
                    Some(Phrasing::Single(company)) => Formatted::Response(Response::new(
                        DialogKey::ProductionSingle,
                        params([("movie", movie.to_string()), ("company", company)]),
                    )),
                    Some(Phrasing::Multiple { rest, last }) => Formatted::Response(Response::new(
                        DialogKey::ProductionMultiple,
                        params([
                            ("movie", movie.to_string()),
                            ("companies", rest),
                            ("lastcompany", last),
                        ]),
                    )),
                }
            }
            Field::Genres => {
                let genres = ListSummary::new(record.genres.iter().map(|g| g.name.clone()), depth);
                match genres.phrasing() {
                    None => Formatted::NotFound,
                    Some(Phrasing::Single(genre)) => Formatted::Response(Response::new(
                        DialogKey::GenreSingle,
                        params([("movie", movie.to_string()), ("genre", genre)]),
                    )),
                    Some(Phrasing::Multiple { rest, last }) => Formatted::Response(Response::new(
                        DialogKey::GenreMultiple,
                        params([
                            ("movie", movie.to_string()),
                            ("genrelist", rest),
                            ("genrelistlast", last),
                        ]),
                    )),
                }
            }
            Field::Runtime => Formatted::Response(Response::new(
                DialogKey::Runtime,
                params([
                    ("movie", movie.to_string()),
                    ("runtime", record.runtime.to_string()),
                ]),
            )),
        }
    }

    /// Format a ranked list of titles.
    pub fn format_ranking<I, S>(&self, ranking: Ranking, titles: I, depth: usize) -> Formatted
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(phrasing) = ListSummary::new(titles, depth).phrasing() else {
            return Formatted::NotFound;
        };
        let (key, slot) = match ranking {
            Ranking::Popular => (DialogKey::Popular, "popularlist"),
            Ranking::TopRated => (DialogKey::Top, "toplist"),
        };
        Formatted::Response(Response::new(key, params([(slot, phrasing.sentence())])))
    }

    /// `1999-03-30` in the configured long form.  Dates TMDb does not know
    /// (or sends malformed) pass through unchanged.
    fn long_date(&self, release_date: &str) -> String {
        match NaiveDate::parse_from_str(release_date, "%Y-%m-%d") {
            Ok(date) => {
                let mut long = String::new();
                match write!(long, "{}", date.format(&self.date_format)) {
                    Ok(()) => long,
                    Err(_) => {
                        warn!(date_format = %self.date_format, "date format failed");
                        release_date.to_string()
                    }
                }
            }
            Err(e) => {
                if !release_date.is_empty() {
                    warn!(release_date = release_date, error = %e, "unparseable release date");
                }
                release_date.to_string()
            }
        }
    }
}

/// Whether `format` parses as a `chrono` strftime string.
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Overview split into spoken sentences on `". "`.
fn describe(movie: &str, overview: &str) -> Formatted {
    if overview.trim().is_empty() {
        return Formatted::NotFound;
    }
    let mut response = Response::new(
        DialogKey::Description,
        params([("movie", movie.to_string())]),
    );
    response.follow_up = overview
        .split(". ")
        .filter(|sentence| !sentence.trim().is_empty())
        .map(str::to_string)
        .collect();
    Formatted::Response(response)
}

fn params<const N: usize>(pairs: [(&str, String); N]) -> DialogParams {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use moviemaster_tmdb::{CastMember, Casts, Company, Genre};

    use super::*;

    fn record() -> MovieRecord {
        MovieRecord {
            id: 603,
            title: "The Matrix".into(),
            overview: "Scene one. Scene two.".into(),
            release_date: "1999-03-30".into(),
            budget: 63_000_000,
            runtime: 136,
            tagline: "Welcome to the Real World.".into(),
            genres: vec![
                Genre { id: 28, name: "Action".into() },
                Genre { id: 878, name: "Science Fiction".into() },
            ],
            production_companies: vec![
                Company { name: "Village Roadshow Pictures".into() },
                Company { name: "Groucho II Film Partnership".into() },
                Company { name: "Silver Pictures".into() },
            ],
            casts: Casts {
                cast: vec![
                    CastMember::new("A", "X"),
                    CastMember::new("B", "Y"),
                    CastMember::new("C", "Z"),
                ],
            },
        }
    }

    fn query() -> MovieQuery {
        MovieQuery::new("the matrix")
    }

    fn response(formatted: Formatted) -> Response {
        match formatted {
            Formatted::Response(response) => response,
            Formatted::NotFound => panic!("expected a response, got NotFound"),
        }
    }

    #[test]
    fn absent_record_is_not_found_for_every_field() {
        let formatter = ResponseFormatter::default();
        for field in [
            Field::Description,
            Field::Information,
            Field::Year,
            Field::Cast,
            Field::Production,
            Field::Genres,
            Field::Runtime,
        ] {
            assert_eq!(formatter.format(&query(), None, field, 3), Formatted::NotFound);
        }
    }

    #[test]
    fn description_splits_overview_into_sentences() {
        let formatter = ResponseFormatter::default();
        let response = response(formatter.format(&query(), Some(&record()), Field::Description, 3));
        assert_eq!(response.dialog, DialogKey::Description);
        assert_eq!(response.params["movie"], "the matrix");
        assert_eq!(response.follow_up, ["Scene one", "Scene two."]);
    }

    #[test]
    fn empty_overview_is_not_found() {
        let formatter = ResponseFormatter::default();
        let mut record = record();
        record.overview = String::new();
        assert_eq!(
            formatter.format(&query(), Some(&record), Field::Description, 3),
            Formatted::NotFound
        );
    }

    #[test]
    fn information_uses_long_date_budget_and_tagline() {
        let formatter = ResponseFormatter::default();
        let response = response(formatter.format(&query(), Some(&record()), Field::Information, 3));
        assert_eq!(response.dialog, DialogKey::InfoResponse);
        assert_eq!(response.params["movie"], "The Matrix");
        assert_eq!(response.params["year"], "Tuesday, March 30, 1999");
        assert_eq!(response.params["budget"], "63000000");
        assert_eq!(response.follow_up, ["Welcome to the Real World."]);
    }

    #[test]
    fn information_without_tagline_or_valid_date() {
        let formatter = ResponseFormatter::default();
        let mut record = record();
        record.tagline = String::new();
        record.release_date = "1999".into();
        let response = response(formatter.format(&query(), Some(&record), Field::Information, 3));
        assert_eq!(response.params["year"], "1999");
        assert!(response.follow_up.is_empty());
    }

    #[test]
    fn custom_date_format() {
        let formatter = ResponseFormatter::new("%d/%m/%Y");
        let response = response(formatter.format(&query(), Some(&record()), Field::Information, 3));
        assert_eq!(response.params["year"], "30/03/1999");
    }

    #[test]
    fn invalid_date_format_falls_back_to_default() {
        assert!(!is_valid_date_format("%Q"));
        assert!(is_valid_date_format(DEFAULT_DATE_FORMAT));

        let formatter = ResponseFormatter::new("%Q");
        assert_eq!(formatter.date_format(), DEFAULT_DATE_FORMAT);
        let response = response(formatter.format(&query(), Some(&record()), Field::Information, 3));
        assert_eq!(response.params["year"], "Tuesday, March 30, 1999");
    }

    #[test]
    fn year_passes_release_date_through() {
        let formatter = ResponseFormatter::default();
        let response = response(formatter.format(&query(), Some(&record()), Field::Year, 3));
        assert_eq!(response.dialog, DialogKey::Year);
        assert_eq!(response.params["year"], "1999-03-30");
    }

    #[test]
    fn cast_depth_two_excludes_third_member() {
        let formatter = ResponseFormatter::default();
        let response = response(formatter.format(&query(), Some(&record()), Field::Cast, 2));
        assert_eq!(response.dialog, DialogKey::Cast);
        assert_eq!(response.params["actorlist"], "A as X");
        assert_eq!(response.params["lastactor"], "B as Y");
        assert!(!response.params.values().any(|v| v.contains("C as Z")));
    }

    #[test]
    fn cast_depth_past_length_mentions_everyone_once() {
        let formatter = ResponseFormatter::default();
        let response = response(formatter.format(&query(), Some(&record()), Field::Cast, 10));
        assert_eq!(response.params["actorlist"], "A as X, B as Y");
        assert_eq!(response.params["lastactor"], "C as Z");
    }

    #[test]
    fn cast_depth_one_is_single() {
        let formatter = ResponseFormatter::default();
        let response = response(formatter.format(&query(), Some(&record()), Field::Cast, 1));
        assert_eq!(response.dialog, DialogKey::CastSingle);
        assert_eq!(response.params["actor"], "A as X");
    }

    #[test]
    fn depth_zero_lists_are_not_found() {
        let formatter = ResponseFormatter::default();
        for field in [Field::Cast, Field::Production, Field::Genres] {
            assert_eq!(
                formatter.format(&query(), Some(&record()), field, 0),
                Formatted::NotFound
            );
        }
    }

    #[test]
    fn production_single_and_multiple() {
        let formatter = ResponseFormatter::default();

        let single = response(formatter.format(&query(), Some(&record()), Field::Production, 1));
        assert_eq!(single.dialog, DialogKey::ProductionSingle);
        assert_eq!(single.params["company"], "Village Roadshow Pictures");

        let multiple = response(formatter.format(&query(), Some(&record()), Field::Production, 3));
        assert_eq!(multiple.dialog, DialogKey::ProductionMultiple);
        assert_eq!(
            multiple.params["companies"],
            "Village Roadshow Pictures, Groucho II Film Partnership"
        );
        assert_eq!(multiple.params["lastcompany"], "Silver Pictures");
    }

    #[test]
    fn genres_single_and_multiple() {
        let formatter = ResponseFormatter::default();

        let single = response(formatter.format(&query(), Some(&record()), Field::Genres, 1));
        assert_eq!(single.dialog, DialogKey::GenreSingle);
        assert_eq!(single.params["genre"], "Action");

        let multiple = response(formatter.format(&query(), Some(&record()), Field::Genres, 5));
        assert_eq!(multiple.dialog, DialogKey::GenreMultiple);
        assert_eq!(multiple.params["genrelist"], "Action");
        assert_eq!(multiple.params["genrelistlast"], "Science Fiction");
    }

    #[test]
    fn runtime_passes_minutes_through() {
        let formatter = ResponseFormatter::default();
        let response = response(formatter.format(&query(), Some(&record()), Field::Runtime, 3));
        assert_eq!(response.params["runtime"], "136");
        assert_eq!(response.params["movie"], "the matrix");
    }

    #[test]
    fn ranking_joins_titles() {
        let formatter = ResponseFormatter::default();
        let titles = ["Alpha", "Beta", "Gamma", "Delta"];

        let top = response(formatter.format_ranking(Ranking::TopRated, titles, 3));
        assert_eq!(top.dialog, DialogKey::Top);
        assert_eq!(top.params["toplist"], "Alpha, Beta and Gamma");

        let popular = response(formatter.format_ranking(Ranking::Popular, titles, 1));
        assert_eq!(popular.dialog, DialogKey::Popular);
        assert_eq!(popular.params["popularlist"], "Alpha");

        assert_eq!(
            formatter.format_ranking(Ranking::Popular, Vec::<String>::new(), 3),
            Formatted::NotFound
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let formatter = ResponseFormatter::default();
        let record = record();
        for field in [Field::Description, Field::Information, Field::Cast, Field::Genres] {
            let first = formatter.format(&query(), Some(&record), field, 2);
            let second = formatter.format(&query(), Some(&record), field, 2);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn into_utterances_puts_dialog_first() {
        let formatter = ResponseFormatter::default();
        let utterances =
            response(formatter.format(&query(), Some(&record()), Field::Description, 3))
                .into_utterances();
        assert_eq!(utterances.len(), 3);
        assert_eq!(utterances[0].key(), Some(DialogKey::Description));
        assert_eq!(utterances[2], Utterance::text("Scene two."));
    }
}
