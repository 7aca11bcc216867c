//! TMDb REST API v3 client.
//!
//! Implements [`MovieSource`] over HTTP.  The base URL is configurable so the
//! client can be pointed at a mirror or a local mock server.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Result, TmdbError};
use crate::traits::MovieSource;
use crate::types::{Genre, GenreList, MovieRecord, MovieSummary, ResultPage, Session, StatusBody};

/// Default TMDb API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// TMDb REST API v3 client.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client for making requests.
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a client for the public TMDb API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client for a custom base URL.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("MovieMaster/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // URL construction helpers
    // -----------------------------------------------------------------------

    /// Build a full API URL for `path` carrying the session's credentials
    /// plus any extra query pairs.
    fn api_url(&self, path: &str, session: &Session, extra: &[(&str, &str)]) -> Result<Url> {
        if session.api_key.trim().is_empty() {
            return Err(TmdbError::MissingApiKey);
        }

        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", session.api_key.trim());
            if !session.language.is_empty() {
                query.append_pair("language", &session.language);
            }
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    /// Send a GET request and decode the JSON body into `T`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        // Never log the key itself.
        debug!(path = url.path(), what = what, "TMDb request");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<StatusBody>(&body_text)
                .map(|b| b.status_message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(body_text);

            return Err(match status.as_u16() {
                401 => TmdbError::InvalidApiKey { message },
                404 => TmdbError::NotFound {
                    what: what.to_string(),
                },
                code => {
                    warn!(status = code, what = what, "unexpected TMDb status");
                    TmdbError::UnexpectedStatus {
                        status: code,
                        message,
                    }
                }
            });
        }

        Ok(serde_json::from_str(&body_text)?)
    }
}

impl Default for TmdbClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn genre_list(&self, session: &Session) -> Result<Vec<Genre>> {
        let url = self.api_url("/genre/movie/list", session, &[])?;
        let list: GenreList = self.get_json(url, "genre list").await?;
        Ok(list.genres)
    }

    async fn search_movies(&self, session: &Session, title: &str) -> Result<Vec<MovieSummary>> {
        let url = self.api_url("/search/movie", session, &[("query", title)])?;
        let page: ResultPage = self.get_json(url, "movie search").await?;
        debug!(title = title, hits = page.results.len(), "movie search finished");
        Ok(page.results)
    }

    async fn movie_details(&self, session: &Session, id: u64) -> Result<MovieRecord> {
        let url = self.api_url(
            &format!("/movie/{id}"),
            session,
            &[("append_to_response", "casts")],
        )?;
        self.get_json(url, &format!("movie {id}")).await
    }

    async fn popular(&self, session: &Session) -> Result<Vec<MovieSummary>> {
        let url = self.api_url("/movie/popular", session, &[])?;
        let page: ResultPage = self.get_json(url, "popular movies").await?;
        Ok(page.results)
    }

    async fn top_rated(&self, session: &Session) -> Result<Vec<MovieSummary>> {
        let url = self.api_url("/movie/top_rated", session, &[])?;
        let page: ResultPage = self.get_json(url, "top rated movies").await?;
        Ok(page.results)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("abc123", "en-US")
    }

    #[test]
    fn new_uses_public_api() {
        let client = TmdbClient::new();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn with_base_url_strips_trailing_slash() {
        let client = TmdbClient::with_base_url("http://localhost:8080/3/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://localhost:8080/3");
    }

    #[test]
    fn api_url_carries_key_language_and_extras() {
        let client = TmdbClient::new();
        let url = client
            .api_url("/search/movie", &session(), &[("query", "the matrix")])
            .unwrap();
        assert_eq!(url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("api_key".into(), "abc123".into())));
        assert!(pairs.contains(&("language".into(), "en-US".into())));
        assert!(pairs.contains(&("query".into(), "the matrix".into())));
    }

    #[test]
    fn api_url_rejects_blank_key() {
        let client = TmdbClient::new();
        let err = client
            .api_url("/movie/popular", &Session::new("  ", "en-US"), &[])
            .unwrap_err();
        assert!(matches!(err, TmdbError::MissingApiKey));
        assert!(err.is_credential_error());
    }

    #[test]
    fn api_url_omits_empty_language() {
        let client = TmdbClient::new();
        let url = client
            .api_url("/movie/popular", &Session::new("k", ""), &[])
            .unwrap();
        assert!(!url.query_pairs().any(|(k, _)| k == "language"));
    }
}
