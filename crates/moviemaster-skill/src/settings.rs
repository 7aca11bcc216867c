//! User settings and change notification.
//!
//! The host owns the settings and may change them at any time.  The skill
//! holds the receiving half of a [`tokio::sync::watch`] channel and checks it
//! at the start of every request, so a new key or depth applies to the very
//! next utterance.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

/// Default number of list items mentioned per answer.
pub const DEFAULT_SEARCH_DEPTH: usize = 3;

/// Default TMDb response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Per-user skill settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSettings {
    /// Maximum list items to mention.
    pub search_depth: usize,
    /// TMDb v3 API key; empty when unset.
    pub apiv3: String,
    /// TMDb response language.
    pub language: String,
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            apiv3: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl SkillSettings {
    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.apiv3.trim().is_empty()
    }

    /// The API key with all but its last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let key = self.apiv3.trim();
        if key.is_empty() {
            return "(unset)".to_string();
        }
        let chars: Vec<char> = key.chars().collect();
        let visible = chars.len().min(4);
        let hidden = chars.len() - visible;
        let tail: String = chars[hidden..].iter().collect();
        format!("{}{tail}", "*".repeat(hidden))
    }
}

/// Host-side handle for publishing settings changes.
#[derive(Debug)]
pub struct SettingsHandle {
    tx: watch::Sender<SkillSettings>,
}

impl SettingsHandle {
    /// Create a handle and the receiver the skill subscribes with.
    pub fn new(initial: SkillSettings) -> (Self, watch::Receiver<SkillSettings>) {
        let (tx, rx) = watch::channel(initial);
        (Self { tx }, rx)
    }

    /// Replace the settings wholesale and notify the skill.
    pub fn replace(&self, settings: SkillSettings) {
        info!(search_depth = settings.search_depth, "settings replaced");
        self.tx.send_replace(settings);
    }

    /// Edit the settings in place and notify the skill.
    pub fn update(&self, edit: impl FnOnce(&mut SkillSettings)) {
        self.tx.send_modify(edit);
        info!("settings updated");
    }

    /// A snapshot of the current settings.
    pub fn current(&self) -> SkillSettings {
        self.tx.borrow().clone()
    }

    /// Another receiver for the same settings.
    pub fn subscribe(&self) -> watch::Receiver<SkillSettings> {
        self.tx.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = SkillSettings::default();
        assert_eq!(settings.search_depth, 3);
        assert_eq!(settings.language, "en-US");
        assert!(!settings.has_api_key());
        assert_eq!(settings.masked_api_key(), "(unset)");
    }

    #[test]
    fn masked_key_shows_last_four() {
        let settings = SkillSettings {
            apiv3: "0123456789abcdef".into(),
            ..SkillSettings::default()
        };
        assert_eq!(settings.masked_api_key(), "************cdef");

        let short = SkillSettings {
            apiv3: "abc".into(),
            ..SkillSettings::default()
        };
        assert_eq!(short.masked_api_key(), "abc");
    }

    #[test]
    fn receiver_sees_updates() {
        let (handle, mut rx) = SettingsHandle::new(SkillSettings::default());
        assert!(!rx.has_changed().unwrap());

        handle.update(|s| s.search_depth = 7);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().search_depth, 7);
        assert!(!rx.has_changed().unwrap());

        handle.replace(SkillSettings {
            apiv3: "key".into(),
            ..SkillSettings::default()
        });
        assert!(rx.has_changed().unwrap());
        assert_eq!(handle.current().apiv3, "key");
    }
}
