//! The Movie Database (TMDb) v3 client for MovieMaster.
//!
//! - [`client`] -- [`TmdbClient`], the HTTP implementation.
//! - [`traits`] -- [`MovieSource`], the lookup seam the skill depends on.
//! - [`types`] -- typed records (movies, cast, genres) and the per-request
//!   [`Session`].
//! - [`error`] -- [`TmdbError`] via [`thiserror`].

pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TmdbClient};
pub use error::{Result, TmdbError};
pub use traits::MovieSource;
pub use types::{CastMember, Casts, Company, Genre, MovieRecord, MovieSummary, Session};
