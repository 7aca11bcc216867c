//! CLI argument definitions for MovieMaster.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// MovieMaster -- ask about movies, answered from The Movie Database.
#[derive(Debug, Parser)]
#[command(
    name = "moviemaster",
    version,
    about = "MovieMaster -- movie answers from The Movie Database",
    long_about = "Answers spoken-style questions about movies (plot, release year, cast, \
                  studios, genres, runtime, popular and top rated lists) using the TMDb v3 API."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Override how many list items are mentioned per answer.
    #[arg(long, global = true)]
    pub depth: Option<usize>,

    /// Directory of `<key>.dialog` files overriding the built-in wording.
    #[arg(long, global = true)]
    pub dialogs: Option<PathBuf>,

    /// Print utterances as JSON instead of rendered sentences.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer a single question.
    Ask {
        /// The question, e.g. `who stars in the matrix`.
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
    },

    /// Answer questions read from stdin until `quit`.
    Run,

    /// List today's popular movies.
    Popular,

    /// List the top rated movies.
    Top,

    /// Print the TMDb movie genre catalog.
    Genres,

    /// Show the effective settings and check the API key.
    Status,
}
