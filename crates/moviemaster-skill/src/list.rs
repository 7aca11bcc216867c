//! Depth-limited list summaries.
//!
//! Every list the skill speaks (cast, companies, genres, popular and top
//! rated titles) goes through [`ListSummary`]: truncate to the search depth,
//! then phrase as nothing, a single item, or `"A, B and C"`.

/// Display names truncated to a search depth, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSummary {
    items: Vec<String>,
}

/// How a truncated list should be spoken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phrasing {
    /// Exactly one item.
    Single(String),
    /// Two or more items: everything but the last joined with `", "`, and
    /// the last one kept apart for the `"and X"` tail.
    Multiple { rest: String, last: String },
}

impl ListSummary {
    /// Keep the first `depth` items of `items`.
    pub fn new<I, S>(items: I, depth: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().take(depth).map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// The final item after truncation.
    pub fn last(&self) -> Option<&str> {
        self.items.last().map(String::as_str)
    }

    /// Every item except the last.
    pub fn rest(&self) -> &[String] {
        match self.items.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Phrase the summary, or `None` when there is nothing to say.
    pub fn phrasing(&self) -> Option<Phrasing> {
        match self.items.as_slice() {
            [] => None,
            [only] => Some(Phrasing::Single(only.clone())),
            [rest @ .., last] => Some(Phrasing::Multiple {
                rest: rest.join(", "),
                last: last.clone(),
            }),
        }
    }
}

impl Phrasing {
    /// The whole list as one phrase: `"A"` or `"A, B and C"`.
    pub fn sentence(&self) -> String {
        match self {
            Self::Single(item) => item.clone(),
            Self::Multiple { rest, last } => format!("{rest} and {last}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const GENRES: [&str; 3] = ["Action", "Comedy", "Drama"];

    #[test]
    fn depth_zero_says_nothing() {
        let summary = ListSummary::new(GENRES, 0);
        assert!(summary.is_empty());
        assert_eq!(summary.phrasing(), None);
        assert_eq!(summary.last(), None);
        assert!(summary.rest().is_empty());
    }

    #[test]
    fn depth_one_is_single() {
        let summary = ListSummary::new(GENRES, 1);
        assert_eq!(summary.phrasing(), Some(Phrasing::Single("Action".into())));
        assert_eq!(summary.phrasing().unwrap().sentence(), "Action");
    }

    #[test]
    fn truncated_last_is_the_nth_item() {
        let summary = ListSummary::new(GENRES, 2);
        assert_eq!(summary.last(), Some("Comedy"));
        assert_eq!(
            summary.phrasing(),
            Some(Phrasing::Multiple {
                rest: "Action".into(),
                last: "Comedy".into(),
            })
        );
    }

    #[test]
    fn depth_past_length_keeps_every_item_once() {
        let summary = ListSummary::new(GENRES, 10);
        assert_eq!(summary.items(), &["Action", "Comedy", "Drama"]);
        assert_eq!(summary.rest(), &["Action", "Comedy"]);
        assert_eq!(summary.phrasing().unwrap().sentence(), "Action, Comedy and Drama");
    }

    #[test]
    fn empty_source_says_nothing_at_any_depth() {
        let summary = ListSummary::new(Vec::<String>::new(), 5);
        assert_eq!(summary.phrasing(), None);
    }
}
