use crate::config::CliConfig;
use anyhow::{anyhow, Result};
use stakeout_core::{HttpLedger, Ledger};

pub async fn handle_balance(address: Option<String>, config: &CliConfig) -> Result<()> {
    let address = address
        .or_else(|| config.player_address.clone())
        .ok_or_else(|| anyhow!("No address given and no player_address configured"))?;

    let ledger = HttpLedger::new(&config.network)?;
    let balance = ledger.get_balance(&address).await?;

    println!("Balance for {} ({}):", address, config.network.network);
    println!("  {} STX", balance);

    Ok(())
}
