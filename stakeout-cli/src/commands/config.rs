use crate::config::{CliConfig, HOUSE_KEY_ENV, PLAYER_KEY_ENV};
use anyhow::Result;
use clap::Subcommand;
use dialoguer::Confirm;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        force: bool,
    },
    /// Print the config file location
    Path,
}

pub fn handle_config_command(cmd: ConfigCommands, config: &CliConfig, data_dir: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
            println!();
            let house_key = if config.game.house.private_key.is_empty() {
                "not set"
            } else {
                "set"
            };
            println!("House key ({}): {}", HOUSE_KEY_ENV, house_key);
            println!("Player key is read from {} or prompted for", PLAYER_KEY_ENV);
        }

        ConfigCommands::Init { force } => {
            let path = CliConfig::path(data_dir);
            if path.exists() && !force {
                let confirm = Confirm::new()
                    .with_prompt(format!("{} exists. Overwrite it?", path.display()))
                    .default(false)
                    .interact()?;
                if !confirm {
                    println!("Config left unchanged.");
                    return Ok(());
                }
            }

            let path = CliConfig::default().save(data_dir)?;
            println!("Wrote default config to {}", path.display());
        }

        ConfigCommands::Path => {
            println!("{}", CliConfig::path(data_dir).display());
        }
    }

    Ok(())
}
