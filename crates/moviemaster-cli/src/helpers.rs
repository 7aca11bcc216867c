//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization, configuration and dialog loading, and
//! printing what the skill says.

use anyhow::{Context, Result};
use moviemaster_intent::{IntentRouter, recognize};
use moviemaster_skill::{DialogTemplates, MovieMasterConfig, MovieMasterSkill, Utterance};
use moviemaster_tmdb::TmdbClient;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// The skill as the CLI runs it: against the live TMDb API.
pub type Skill = MovieMasterSkill<TmdbClient>;

/// Spoken when no intent matches the input.
pub const NOT_UNDERSTOOD: &str = "Sorry, I don't know how to answer that.";

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// Logs go to stderr so `--json` output on stdout stays machine-readable.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Load the configuration file, then apply environment and flag overrides.
pub fn load_config(cli: &Cli) -> Result<MovieMasterConfig> {
    let mut config = MovieMasterConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    config
        .apply_env()
        .context("invalid environment override")?;
    if let Some(depth) = cli.depth {
        config.skill.search_depth = depth;
    }
    Ok(config)
}

/// Dialog wording from `--dialogs`, else the configured directory, else the
/// built-in table.
pub fn load_templates(cli: &Cli, config: &MovieMasterConfig) -> Result<DialogTemplates> {
    match cli.dialogs.as_deref().or(config.skill.dialogs_dir.as_deref()) {
        Some(dir) => DialogTemplates::load_dir(dir)
            .with_context(|| format!("failed to load dialogs from {}", dir.display())),
        None => Ok(DialogTemplates::builtin()),
    }
}

// ---------------------------------------------------------------------------
// Answering
// ---------------------------------------------------------------------------

/// Route one line of input and let the skill answer it.
pub async fn answer(skill: &mut Skill, router: &mut IntentRouter, line: &str) -> Vec<Utterance> {
    match recognize(router, line) {
        Ok(intent) => {
            debug!(intent = %intent, "recognized intent");
            skill.handle(&intent).await
        }
        Err(e) => {
            warn!(input = line, error = %e, "no intent matched");
            vec![Utterance::text(NOT_UNDERSTOOD)]
        }
    }
}

/// Prints utterances as rendered sentences or as JSON.
pub struct Output {
    templates: DialogTemplates,
    json: bool,
}

impl Output {
    pub fn new(templates: DialogTemplates, json: bool) -> Self {
        Self { templates, json }
    }

    pub fn json(&self) -> bool {
        self.json
    }

    /// Render `utterances` to the lines that would be spoken.
    pub fn lines(&self, utterances: &[Utterance]) -> Vec<String> {
        utterances.iter().map(|u| self.templates.speak(u)).collect()
    }

    /// Print `utterances` to stdout.
    pub fn say(&self, utterances: &[Utterance]) -> Result<()> {
        if self.json {
            let encoded =
                serde_json::to_string(utterances).context("failed to encode utterances")?;
            println!("{encoded}");
        } else {
            for line in self.lines(utterances) {
                println!("  {line}");
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
