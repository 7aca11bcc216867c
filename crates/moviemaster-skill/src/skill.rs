//! The MovieMaster skill: one handler per movie intent.
//!
//! Each handler performs its TMDb calls one after another, formats the
//! result, and turns every failure into a spoken apology.  Handlers return
//! the utterances to speak and never an error.

use moviemaster_intent::MovieIntent;
use moviemaster_tmdb::{Genre, MovieSource, Session};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::dialog::Utterance;
use crate::formatter::{Field, Formatted, Ranking, ResponseFormatter};
use crate::lookup::{LookupError, MovieQuery, fetch_record, session_for};
use crate::settings::SkillSettings;

/// A movie lookup skill backed by any [`MovieSource`].
pub struct MovieMasterSkill<S> {
    source: S,
    settings: watch::Receiver<SkillSettings>,
    formatter: ResponseFormatter,
    /// Refreshed whenever the credential is (re)validated.
    genres: Vec<Genre>,
}

impl<S: MovieSource> MovieMasterSkill<S> {
    /// Create a skill reading its settings from `settings`.
    pub fn new(source: S, settings: watch::Receiver<SkillSettings>) -> Self {
        Self {
            source,
            settings,
            formatter: ResponseFormatter::default(),
            genres: Vec::new(),
        }
    }

    /// Use `formatter` instead of the default one.
    pub fn with_formatter(mut self, formatter: ResponseFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// The movie genre catalog fetched at the last credential check.
    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// A snapshot of the settings in effect.
    pub fn settings(&self) -> SkillSettings {
        self.settings.borrow().clone()
    }

    /// Validate the credential by fetching the genre catalog.
    ///
    /// Returns the apology to speak when the key is unset or rejected, and
    /// nothing on success.
    pub async fn initialize(&mut self) -> Vec<Utterance> {
        match self.refresh_genres().await {
            Ok(count) => {
                info!(genres = count, "MovieMaster initialized");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "MovieMaster could not validate its API key");
                // A missing genre catalog means a bad endpoint, not a missing movie.
                let err = match err {
                    LookupError::NotFound => LookupError::InvalidCredential,
                    other => other,
                };
                vec![err.apology("")]
            }
        }
    }

    /// React to new settings: re-validate the credential.
    ///
    /// Any rejection is reported with the `no.api` dialog.
    pub async fn on_settings_changed(&mut self) -> Vec<Utterance> {
        self.settings.borrow_and_update();
        match self.refresh_genres().await {
            Ok(_) => {
                info!("api key accepted");
                Vec::new()
            }
            Err(err) => {
                info!(error = %err, "not a valid api key");
                vec![LookupError::NoCredential.apology("")]
            }
        }
    }

    /// Answer one intent.
    #[instrument(skip(self, intent), fields(id = %Uuid::now_v7(), intent = intent.name()))]
    pub async fn handle(&mut self, intent: &MovieIntent) -> Vec<Utterance> {
        let mut utterances = Vec::new();
        if self.settings.has_changed().unwrap_or(false) {
            utterances.extend(self.on_settings_changed().await);
        }

        let answer = match intent {
            MovieIntent::Description { movie } => self.answer_movie(movie, Field::Description).await,
            MovieIntent::Information { movie } => self.answer_movie(movie, Field::Information).await,
            MovieIntent::Year { movie } => self.answer_movie(movie, Field::Year).await,
            MovieIntent::Cast { movie } => self.answer_movie(movie, Field::Cast).await,
            MovieIntent::Production { movie } => self.answer_movie(movie, Field::Production).await,
            MovieIntent::Genres { movie } => self.answer_movie(movie, Field::Genres).await,
            MovieIntent::Runtime { movie } => self.answer_movie(movie, Field::Runtime).await,
            MovieIntent::Popular => self.answer_ranking(Ranking::Popular).await,
            MovieIntent::TopRated => self.answer_ranking(Ranking::TopRated).await,
        };
        utterances.extend(answer);

        debug!(count = utterances.len(), "intent answered");
        utterances
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    async fn answer_movie(&self, movie: &str, field: Field) -> Vec<Utterance> {
        let query = MovieQuery::new(movie);
        let settings = self.settings();

        let record = match self.current_session(&settings) {
            Ok(session) => fetch_record(&self.source, &session, &query).await,
            Err(err) => Err(err),
        };

        match record {
            Ok(record) => {
                match self
                    .formatter
                    .format(&query, record.as_ref(), field, settings.search_depth)
                {
                    Formatted::Response(response) => response.into_utterances(),
                    Formatted::NotFound => vec![LookupError::NotFound.apology(&query.title)],
                }
            }
            Err(err) => {
                warn!(title = %query.title, error = %err, "movie lookup failed");
                vec![err.apology(&query.title)]
            }
        }
    }

    async fn answer_ranking(&self, ranking: Ranking) -> Vec<Utterance> {
        let settings = self.settings();

        let titles = match self.current_session(&settings) {
            Ok(session) => {
                let movies = match ranking {
                    Ranking::Popular => self.source.popular(&session).await,
                    Ranking::TopRated => self.source.top_rated(&session).await,
                };
                movies
                    .map(|movies| movies.into_iter().map(|m| m.title).collect::<Vec<_>>())
                    .map_err(LookupError::from)
            }
            Err(err) => Err(err),
        };

        match titles {
            Ok(titles) => {
                match self
                    .formatter
                    .format_ranking(ranking, titles, settings.search_depth)
                {
                    Formatted::Response(response) => response.into_utterances(),
                    Formatted::NotFound => vec![LookupError::NotFound.apology(ranking.subject())],
                }
            }
            Err(err) => {
                warn!(list = ranking.subject(), error = %err, "list lookup failed");
                vec![err.apology(ranking.subject())]
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn current_session(&self, settings: &SkillSettings) -> Result<Session, LookupError> {
        session_for(&settings.apiv3, &settings.language)
    }

    async fn refresh_genres(&mut self) -> Result<usize, LookupError> {
        let settings = self.settings();
        let session = self.current_session(&settings)?;
        let genres = self.source.genre_list(&session).await?;
        self.genres = genres;
        Ok(self.genres.len())
    }
}
