//! Utterance routing for MovieMaster.
//!
//! - **[`router`]** -- two-level router: exact phrases via
//!   [`aho_corasick`], then anchored case-insensitive [`regex`] patterns
//!   with named captures.
//! - **[`intents`]** -- the typed [`MovieIntent`] vocabulary and the
//!   English [`default_router`].
//! - **[`error`]** -- [`IntentError`] via [`thiserror`].

pub mod error;
pub mod intents;
pub mod router;

pub use error::{IntentError, Result};
pub use intents::{MovieIntent, default_router, recognize};
pub use router::{IntentRouter, RouteResult};
