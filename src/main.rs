mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use watchbot::config::BotConfig;
use watchbot::reply::{self, ReplyPayload};
use watchbot::WatchBot;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("watchbot=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let reply = match cli.command {
        // ping needs no upstream, so it works without a config
        Commands::Ping => ReplyPayload::text(reply::PONG),
        cmd => {
            let cfg = BotConfig::load(cli.config.as_deref())?;
            let bot = WatchBot::from_config(&cfg)?;
            bot.handle(cmd.into_command()).await
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply);
    }
    Ok(())
}
