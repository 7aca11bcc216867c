//! Subcommand: `moviemaster run` -- interactive REPL.
//!
//! Each line is routed and answered.  Lines starting with `:` change a
//! setting instead; the skill picks the change up on the next question.

use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use moviemaster_intent::default_router;
use moviemaster_skill::SettingsHandle;
use tracing::info;

use crate::helpers::{Output, Skill, answer};

/// Run the interactive REPL.
pub async fn cmd_run(skill: &mut Skill, settings: &SettingsHandle, output: &Output) -> Result<()> {
    let mut router = default_router().context("failed to build intent router")?;

    println!();
    println!("  MovieMaster v{}", env!("CARGO_PKG_VERSION"));
    println!("  Ask about a movie, change a setting with :depth, :key or :language,");
    println!("  or type 'quit' to exit.");
    println!();

    output.say(&skill.initialize().await)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if trimmed == "quit" || trimmed == "exit" {
            info!("user requested exit");
            break;
        }

        if let Some(command) = trimmed.strip_prefix(':') {
            match apply_setting(settings, command) {
                Ok(message) => println!("  {message}"),
                Err(e) => println!("  {e:#}"),
            }
            continue;
        }

        let said = answer(skill, &mut router, trimmed).await;
        output.say(&said)?;
    }

    info!("shutting down");
    Ok(())
}

/// Apply a `depth <n>`, `key <apikey>` or `language <tag>` command.
fn apply_setting(settings: &SettingsHandle, command: &str) -> Result<String> {
    let command = command.trim();
    let (name, value) = match command.split_once(char::is_whitespace) {
        Some((name, value)) => (name, value.trim()),
        None => (command, ""),
    };

    match name {
        "depth" => {
            let depth: usize = value
                .parse()
                .with_context(|| format!("search depth must be a number, got {value:?}"))?;
            settings.update(|s| s.search_depth = depth);
            Ok(format!("search depth set to {depth}"))
        }
        "key" => {
            let key = value.to_string();
            settings.update(|s| s.apiv3 = key);
            Ok(format!("API key set to {}", settings.current().masked_api_key()))
        }
        "language" => {
            if value.is_empty() {
                bail!("language needs a tag such as en-US");
            }
            let language = value.to_string();
            settings.update(|s| s.language = language);
            Ok(format!("language set to {value}"))
        }
        other => bail!("unknown setting {other:?}; try depth, key or language"),
    }
}

#[cfg(test)]
mod tests {
    use moviemaster_skill::SkillSettings;

    use super::*;

    #[test]
    fn depth_command_updates_settings() {
        let (handle, mut rx) = SettingsHandle::new(SkillSettings::default());
        assert_eq!(apply_setting(&handle, "depth 5").unwrap(), "search depth set to 5");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().search_depth, 5);
    }

    #[test]
    fn key_command_masks_the_key() {
        let (handle, _rx) = SettingsHandle::new(SkillSettings::default());
        let message = apply_setting(&handle, "key   abcdef123456").unwrap();
        assert_eq!(message, "API key set to ********3456");
        assert_eq!(handle.current().apiv3, "abcdef123456");
    }

    #[test]
    fn bad_commands_leave_settings_alone() {
        let (handle, rx) = SettingsHandle::new(SkillSettings::default());
        assert!(apply_setting(&handle, "depth many").is_err());
        assert!(apply_setting(&handle, "language").is_err());
        assert!(apply_setting(&handle, "volume 11").is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(handle.current(), SkillSettings::default());
    }
}
