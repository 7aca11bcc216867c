//! MovieMaster: a voice-assistant skill answering movie questions from TMDb.
//!
//! - **[`skill`]** -- [`MovieMasterSkill`], one handler per
//!   [`moviemaster_intent::MovieIntent`].
//! - **[`formatter`]** -- [`ResponseFormatter`], record → dialog parameters.
//! - **[`list`]** -- depth-limited [`ListSummary`] phrasing.
//! - **[`lookup`]** -- the fetch step and the [`LookupError`] taxonomy.
//! - **[`dialog`]** -- dialog keys, [`Utterance`]s and template rendering.
//! - **[`settings`]** -- [`SkillSettings`] and change notification.
//! - **[`config`]** -- `config/default.toml` plus environment overrides.
//! - **[`error`]** -- [`SkillError`] via [`thiserror`].

pub mod config;
pub mod dialog;
pub mod error;
pub mod formatter;
pub mod list;
pub mod lookup;
pub mod settings;
pub mod skill;

pub use config::MovieMasterConfig;
pub use dialog::{DialogKey, DialogParams, DialogTemplates, Utterance};
pub use error::{Result, SkillError};
pub use formatter::{Field, Formatted, Ranking, Response, ResponseFormatter};
pub use list::{ListSummary, Phrasing};
pub use lookup::{LookupError, MovieQuery, fetch_record, session_for};
pub use settings::{SettingsHandle, SkillSettings};
pub use skill::MovieMasterSkill;
