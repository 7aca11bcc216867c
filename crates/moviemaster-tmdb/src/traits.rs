//! The movie lookup seam.
//!
//! The skill never talks to HTTP directly; it depends on [`MovieSource`],
//! which [`crate::TmdbClient`] implements against the live API and tests
//! implement in memory.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, TmdbError};
use crate::types::{Genre, MovieRecord, MovieSummary, Session};

/// Read-only access to a movie database.
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Return the movie genre catalog.
    async fn genre_list(&self, session: &Session) -> Result<Vec<Genre>>;

    /// Search movies by title, best match first.
    async fn search_movies(&self, session: &Session, title: &str) -> Result<Vec<MovieSummary>>;

    /// Fetch full details, including the billed cast, for a movie id.
    async fn movie_details(&self, session: &Session, id: u64) -> Result<MovieRecord>;

    /// Return today's popular movies.
    async fn popular(&self, session: &Session) -> Result<Vec<MovieSummary>>;

    /// Return the top rated movies.
    async fn top_rated(&self, session: &Session) -> Result<Vec<MovieSummary>>;

    /// Resolve a spoken title to the details of its best match.
    ///
    /// Returns [`TmdbError::NotFound`] when the search has no hits.
    async fn lookup_movie(&self, session: &Session, title: &str) -> Result<MovieRecord> {
        let hits = self.search_movies(session, title).await?;
        let best = hits.first().ok_or_else(|| TmdbError::NotFound {
            what: format!("movie titled `{title}`"),
        })?;
        debug!(title = title, id = best.id, matched = %best.title, "resolved movie title");
        self.movie_details(session, best.id).await
    }
}
