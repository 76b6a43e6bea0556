use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Run the bot's slash commands from a terminal
#[derive(Parser)]
#[command(name = "watchbot")]
#[command(about = "Look up a movie or show and find where to stream it", long_about = None)]
pub struct Cli {
    /// Config file (defaults to watchbot.toml in the platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the reply payload as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the bot is alive
    Ping,
    /// Search for a movie or series
    Watch {
        /// Title to search for
        title: Vec<String>,
    },
}

impl Commands {
    pub fn into_command(self) -> watchbot::Command {
        match self {
            Commands::Ping => watchbot::Command::Ping,
            Commands::Watch { title } => {
                let t = title.join(" ");
                watchbot::Command::Watch { title: Some(t).filter(|s| !s.trim().is_empty()) }
            }
        }
    }
}
