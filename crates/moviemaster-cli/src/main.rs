//! CLI entry point for MovieMaster.
//!
//! This binary provides the `moviemaster` command: it loads configuration,
//! builds the skill around a live TMDb client, and prints what the skill
//! would say.

mod cli;
mod helpers;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use moviemaster_intent::{MovieIntent, default_router};
use moviemaster_skill::{MovieMasterConfig, MovieMasterSkill, SettingsHandle};
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::helpers::{Output, Skill, answer, init_tracing, load_config, load_templates};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `.env` values count as environment overrides, `RUST_LOG` included.
    dotenvy::dotenv().ok();
    init_tracing(if cli.verbose { "debug" } else { "info" });

    let config = load_config(&cli)?;
    let output = Output::new(load_templates(&cli, &config)?, cli.json);
    let (settings, rx) = SettingsHandle::new(config.settings());
    let mut skill = MovieMasterSkill::new(config.client(), rx).with_formatter(config.formatter());
    info!(
        base_url = %config.tmdb.base_url,
        search_depth = config.skill.search_depth,
        "MovieMaster ready"
    );

    match cli.command {
        Commands::Ask { utterance } => cmd_ask(&mut skill, &output, &utterance.join(" ")).await,
        Commands::Run => repl::cmd_run(&mut skill, &settings, &output).await,
        Commands::Popular => cmd_list(&mut skill, &output, MovieIntent::Popular).await,
        Commands::Top => cmd_list(&mut skill, &output, MovieIntent::TopRated).await,
        Commands::Genres => cmd_genres(&mut skill, &output).await,
        Commands::Status => cmd_status(&cli, &config, &settings, &mut skill, &output).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommand: ask
// ---------------------------------------------------------------------------

async fn cmd_ask(skill: &mut Skill, output: &Output, utterance: &str) -> Result<()> {
    let mut router = default_router().context("failed to build intent router")?;
    let said = answer(skill, &mut router, utterance).await;
    output.say(&said)
}

// ---------------------------------------------------------------------------
// Subcommands: popular, top
// ---------------------------------------------------------------------------

async fn cmd_list(skill: &mut Skill, output: &Output, intent: MovieIntent) -> Result<()> {
    let said = skill.handle(&intent).await;
    output.say(&said)
}

// ---------------------------------------------------------------------------
// Subcommand: genres
// ---------------------------------------------------------------------------

async fn cmd_genres(skill: &mut Skill, output: &Output) -> Result<()> {
    let apology = skill.initialize().await;
    if !apology.is_empty() {
        return output.say(&apology);
    }

    if output.json() {
        let encoded = serde_json::to_string(skill.genres()).context("failed to encode genres")?;
        println!("{encoded}");
    } else {
        for genre in skill.genres() {
            println!("  {:>6}  {}", genre.id, genre.name);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

async fn cmd_status(
    cli: &Cli,
    config: &MovieMasterConfig,
    settings: &SettingsHandle,
    skill: &mut Skill,
    output: &Output,
) -> Result<()> {
    let current = settings.current();

    println!();
    println!("  MovieMaster Status");
    println!("  ==================");
    println!();

    if cli.config.exists() {
        println!("  Config file:      {}", cli.config.display());
    } else {
        println!("  Config file:      MISSING ({}), using defaults", cli.config.display());
    }
    println!("  TMDb endpoint:    {}", config.tmdb.base_url);
    println!("  Language:         {}", current.language);
    println!("  Search depth:     {}", current.search_depth);
    println!("  API key:          {}", current.masked_api_key());

    let apology = skill.initialize().await;
    match output.lines(&apology).first() {
        None => println!("  Credential:       OK ({} genres)", skill.genres().len()),
        Some(reason) => println!("  Credential:       FAILED ({reason})"),
    }

    println!();
    Ok(())
}
