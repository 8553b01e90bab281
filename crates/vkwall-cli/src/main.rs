mod collect;
mod settings;
mod token;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::collect::CollectArgs;
use crate::token::TokenCommands;

#[derive(Debug, Parser)]
#[command(name = "vkwall")]
#[command(about = "Collect VK community wall posts into a spreadsheet report")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect posts from one or more communities over a date range
    Collect(CollectArgs),
    /// Validate or manage the access token
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
    /// Show remembered settings
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = vkwall_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Collect(args)) => collect::run_collect(&config, args).await?,
        Some(Commands::Token {
            command: TokenCommands::Check { token, remember },
        }) => token::run_token_check(&config, token, remember).await?,
        Some(Commands::Token {
            command: TokenCommands::Clear,
        }) => token::run_token_clear(&config)?,
        Some(Commands::Settings) => settings::run_settings_show(&config),
        None => {
            println!("vkwall: nothing to do; see `vkwall --help`");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
