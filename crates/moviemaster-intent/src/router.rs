//! Two-level utterance router.
//!
//! Resolves a spoken utterance to a handler name:
//!
//! | Level | Technique |
//! |-------|-----------|
//! | 1 | Anchored, case-insensitive [`regex`] pattern with named captures |
//! | 2 | Exact phrase anywhere in the utterance via [`aho_corasick`], longest match wins |
//!
//! Patterns run first because they must match the whole utterance, while a
//! phrase may sit inside a captured title.  Anything else is [`RouteResult::Unmatched`].  Captures keep the casing
//! the user typed, so a captured title can be spoken back verbatim.
//!
//! # Example
//!
//! ```rust
//! # use moviemaster_intent::router::{IntentRouter, RouteResult};
//! let mut router = IntentRouter::new();
//!
//! router.add_exact("popular movies", "movie.popular");
//! router
//!     .add_pattern(r"how long is (?P<movie>.+)", "movie.runtime")
//!     .unwrap();
//!
//! let result = router.route("How long is Alien?");
//! assert_eq!(result.handler(), "movie.runtime");
//! assert_eq!(result.capture("movie"), Some("Alien"));
//! ```

use std::collections::HashMap;

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{IntentError, Result};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The outcome of routing an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteResult {
    /// Level 1: the utterance contained a registered phrase.
    ExactMatch {
        /// The handler associated with the matched phrase.
        handler: String,
        /// The phrase that matched (lowercased).
        matched_phrase: String,
    },

    /// Level 2: the utterance matched a regex pattern.
    PatternMatch {
        /// The handler associated with the matched pattern.
        handler: String,
        /// Named captures, trimmed.
        captures: HashMap<String, String>,
    },

    /// No route matched.
    Unmatched {
        /// The normalized utterance.
        utterance: String,
    },
}

impl RouteResult {
    /// Return the handler for a match, or `""` when unmatched.
    pub fn handler(&self) -> &str {
        match self {
            Self::ExactMatch { handler, .. } | Self::PatternMatch { handler, .. } => handler,
            Self::Unmatched { .. } => "",
        }
    }

    /// Return a named capture, if the route produced one.
    pub fn capture(&self, name: &str) -> Option<&str> {
        match self {
            Self::PatternMatch { captures, .. } => captures.get(name).map(String::as_str),
            _ => None,
        }
    }
}

/// A regex-based route.
#[derive(Debug, Clone)]
pub struct PatternRoute {
    /// The handler to invoke on match.
    pub handler: String,
    /// The original pattern string.
    pub pattern: String,
    compiled: Regex,
}

// ---------------------------------------------------------------------------
// IntentRouter
// ---------------------------------------------------------------------------

/// Tiered utterance router.
///
/// Not `Clone`: it owns a compiled automaton.  Wrap in `Arc` to share.
pub struct IntentRouter {
    /// Exact phrases (lowercased) and their handlers.
    exact_phrases: Vec<(String, String)>,

    /// Rebuilt lazily after new phrases are added.
    automaton: Option<AhoCorasick>,
    automaton_dirty: bool,

    /// Evaluated in registration order.
    patterns: Vec<PatternRoute>,
}

impl IntentRouter {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exact_phrases: Vec::new(),
            automaton: None,
            automaton_dirty: false,
            patterns: Vec::new(),
        }
    }

    /// Register an exact phrase.  Matching is case-insensitive.
    pub fn add_exact(&mut self, phrase: impl Into<String>, handler: impl Into<String>) {
        let phrase = phrase.into().to_lowercase();
        let handler = handler.into();
        tracing::debug!(phrase = %phrase, handler = %handler, "exact route added");
        self.exact_phrases.push((phrase, handler));
        self.automaton_dirty = true;
    }

    /// Register a regex pattern route.
    ///
    /// The pattern is anchored to the whole utterance and compiled
    /// case-insensitively.  Returns an error if it fails to compile.
    pub fn add_pattern(
        &mut self,
        pattern: impl Into<String>,
        handler: impl Into<String>,
    ) -> Result<()> {
        let pattern = pattern.into();
        let handler = handler.into();

        let compiled = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(true)
            .build()
            .map_err(|e| IntentError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(pattern = %pattern, handler = %handler, "pattern route added");

        self.patterns.push(PatternRoute {
            handler,
            pattern,
            compiled,
        });
        Ok(())
    }

    /// Route an utterance: whole-utterance patterns first, then phrases.
    pub fn route(&mut self, utterance: &str) -> RouteResult {
        let normalized = normalize(utterance);

        if let Some(result) = self.try_pattern_match(&normalized) {
            tracing::debug!(utterance = %normalized, handler = %result.handler(), "pattern match");
            return result;
        }

        if let Some(result) = self.try_exact_match(&normalized.to_lowercase()) {
            tracing::debug!(utterance = %normalized, handler = %result.handler(), "exact match");
            return result;
        }

        tracing::debug!(utterance = %normalized, "no route");
        RouteResult::Unmatched {
            utterance: normalized,
        }
    }

    /// Return the number of registered exact phrases.
    pub fn exact_count(&self) -> usize {
        self.exact_phrases.len()
    }

    /// Return the number of registered pattern routes.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    // -- Private helpers ----------------------------------------------------

    fn ensure_automaton(&mut self) {
        if !self.automaton_dirty && self.automaton.is_some() {
            return;
        }

        if self.exact_phrases.is_empty() {
            self.automaton = None;
            self.automaton_dirty = false;
            return;
        }

        let phrases: Vec<&str> = self.exact_phrases.iter().map(|(p, _)| p.as_str()).collect();

        match AhoCorasick::new(&phrases) {
            Ok(ac) => {
                self.automaton = Some(ac);
                tracing::trace!(count = phrases.len(), "aho-corasick automaton rebuilt");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to build aho-corasick automaton");
                self.automaton = None;
            }
        }
        self.automaton_dirty = false;
    }

    fn try_exact_match(&mut self, lowered: &str) -> Option<RouteResult> {
        self.ensure_automaton();

        let ac = self.automaton.as_ref()?;

        // Longest overlapping match, so "top rated movies" beats "top movies"
        // style prefixes registered alongside it.
        let mut best: Option<(usize, usize)> = None;
        for mat in ac.find_overlapping_iter(lowered) {
            let len = mat.end() - mat.start();
            if best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((mat.pattern().as_usize(), len));
            }
        }

        let (idx, _) = best?;
        let (phrase, handler) = &self.exact_phrases[idx];

        Some(RouteResult::ExactMatch {
            handler: handler.clone(),
            matched_phrase: phrase.clone(),
        })
    }

    fn try_pattern_match(&self, text: &str) -> Option<RouteResult> {
        self.patterns.iter().find_map(|route| {
            let caps = route.compiled.captures(text)?;
            let captures = route
                .compiled
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.to_string(), m.as_str().trim().to_string()))
                })
                .filter(|(_, value)| !value.is_empty())
                .collect();

            Some(RouteResult::PatternMatch {
                handler: route.handler.clone(),
                captures,
            })
        })
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse whitespace and drop trailing sentence punctuation.
fn normalize(utterance: &str) -> String {
    let collapsed = utterance.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['?', '.', '!'])
        .trim_end()
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_case_insensitive() {
        let mut router = IntentRouter::new();
        router.add_exact("Popular Movies", "movie.popular");

        match router.route("what are the POPULAR movies") {
            RouteResult::ExactMatch { handler, matched_phrase } => {
                assert_eq!(handler, "movie.popular");
                assert_eq!(matched_phrase, "popular movies");
            }
            other => panic!("expected ExactMatch, got {other:?}"),
        }
    }

    #[test]
    fn longest_exact_phrase_wins() {
        let mut router = IntentRouter::new();
        router.add_exact("top movies", "short");
        router.add_exact("the top movies of all time", "long");

        assert_eq!(router.route("list the top movies of all time").handler(), "long");
    }

    #[test]
    fn pattern_capture_keeps_user_casing() {
        let mut router = IntentRouter::new();
        router
            .add_pattern(r"who (?:stars|acts) in (?P<movie>.+)", "movie.cast")
            .unwrap();

        let result = router.route("Who stars in The Big Lebowski?");
        assert_eq!(result.handler(), "movie.cast");
        assert_eq!(result.capture("movie"), Some("The Big Lebowski"));
    }

    #[test]
    fn patterns_are_anchored() {
        let mut router = IntentRouter::new();
        router
            .add_pattern(r"how long is (?P<movie>.+)", "movie.runtime")
            .unwrap();

        assert!(matches!(
            router.route("tell me how long is alien"),
            RouteResult::Unmatched { .. }
        ));
    }

    #[test]
    fn first_registered_pattern_wins() {
        let mut router = IntentRouter::new();
        router.add_pattern(r"when was (?P<movie>.+) released", "movie.year").unwrap();
        router.add_pattern(r"when was (?P<movie>.+)", "generic").unwrap();

        assert_eq!(router.route("when was Heat released").handler(), "movie.year");
    }

    #[test]
    fn phrase_inside_a_title_keeps_the_pattern_intent() {
        let mut router = IntentRouter::new();
        router.add_exact("best movies", "movie.top");
        router.add_pattern(r"how long is (?P<movie>.+)", "movie.runtime").unwrap();

        let result = router.route("how long is The Best Movies of All Time");
        assert_eq!(result.handler(), "movie.runtime");
        assert_eq!(result.capture("movie"), Some("The Best Movies of All Time"));

        assert_eq!(router.route("show me the best movies").handler(), "movie.top");
    }

    #[test]
    fn unmatched_returns_normalized_text() {
        let mut router = IntentRouter::new();
        router.add_exact("popular movies", "movie.popular");

        match router.route("  what   time is it?  ") {
            RouteResult::Unmatched { utterance } => assert_eq!(utterance, "what time is it"),
            other => panic!("expected Unmatched, got {other:?}"),
        }
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let mut router = IntentRouter::new();
        assert!(router.add_pattern("[invalid(", "handler").is_err());
    }

    #[test]
    fn add_routes_at_runtime() {
        let mut router = IntentRouter::new();
        assert_eq!(router.exact_count(), 0);

        router.add_exact("hello", "greet");
        assert!(matches!(router.route("hello"), RouteResult::ExactMatch { .. }));

        router.add_exact("goodbye", "farewell");
        assert_eq!(router.exact_count(), 2);
        assert_eq!(router.route("goodbye").handler(), "farewell");
    }
}
