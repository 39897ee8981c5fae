mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use stakeout_core::LedgerError;
use stakeout_game::GameError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stakeout")]
#[command(about = "Stakeout - bet on AI agents finding the impostor")]
#[command(version)]
struct Cli {
    /// Data directory for the config file
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a bet and play a game
    Play(commands::PlayArgs),

    /// Show the ledger balance of an address
    Balance {
        /// Address to look up (defaults to the configured player address)
        address: Option<String>,
    },

    /// List the agent personas
    Personas,

    /// Configuration commands
    #[command(subcommand)]
    Config(commands::ConfigCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "stakeout={},stakeout_game={},stakeout_core={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(config::default_data_dir);
    let mut config = CliConfig::load(&data_dir)?;
    config.apply_env();

    let result = match cli.command {
        Commands::Play(args) => commands::handle_play(args, config).await,
        Commands::Balance { address } => commands::handle_balance(address, &config).await,
        Commands::Personas => {
            commands::handle_personas();
            Ok(())
        }
        Commands::Config(cmd) => commands::handle_config_command(cmd, &config, &data_dir),
    };

    if let Err(e) = result {
        match e.downcast_ref::<GameError>() {
            Some(GameError::InsufficientBalance { need, available }) => {
                eprintln!("Error: Insufficient balance");
                eprintln!("Need: {} STX, Available: {} STX", need, available);
            }
            Some(GameError::Ledger(LedgerError::Network(msg))) => {
                eprintln!("Error: Ledger unreachable: {}", msg);
                eprintln!("Check ledger_url with 'stakeout config show', or use --offline");
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
