use crate::config::{CliConfig, PLAYER_KEY_ENV};
use anyhow::{anyhow, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::{Password, Select};
use stakeout_core::{
    Amount, CannedResponder, HttpLedger, HttpResponder, Ledger, MemoryLedger, Responder,
};
use stakeout_game::{
    stop_channel, Account, Agent, AgentId, GameSession, LogEntry, LogKind, Pacing, RevealPolicy,
    RoundEngine, RunReport, SettlementResult, PERSONAS,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

const OFFLINE_PLAYER_ADDRESS: &str = "ST-OFFLINE-PLAYER";
const OFFLINE_PLAYER_KEY: &str = "offline-player-key";
const OFFLINE_HOUSE_KEY: &str = "offline-house-key";

#[derive(Args)]
pub struct PlayArgs {
    /// Bet amount in STX
    #[arg(short, long)]
    pub bet: Amount,

    /// Player address (defaults to the configured one)
    #[arg(short, long)]
    pub address: Option<String>,

    /// Agent to make the impostor, by number or name (prompts if omitted)
    #[arg(short, long)]
    pub impostor: Option<String>,

    /// Number of agents (4-6)
    #[arg(long)]
    pub agents: Option<usize>,

    /// Maximum number of rounds
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Seed for reproducible suspicion scores
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use an in-process ledger and canned agents
    #[arg(long)]
    pub offline: bool,

    /// Skip the pauses between statements
    #[arg(long)]
    pub fast: bool,

    /// Keep eliminated agents' roles secret until the game ends
    #[arg(long)]
    pub reveal_at_end: bool,
}

pub async fn handle_play(args: PlayArgs, mut config: CliConfig) -> Result<()> {
    if let Some(agents) = args.agents {
        config.game.roster_size = agents;
    }
    if let Some(rounds) = args.rounds {
        config.game.max_rounds = rounds;
    }
    if args.fast {
        config.game.pacing = Pacing::none();
    }
    if args.reveal_at_end {
        config.game.reveal = RevealPolicy::OnGameEnd;
    }
    let offline = args.offline || config.offline;

    let (ledger, responder, player): (Arc<dyn Ledger>, Arc<dyn Responder>, Account) = if offline {
        if config.game.house.private_key.is_empty() {
            config.game.house.private_key = OFFLINE_HOUSE_KEY.to_string();
        }
        let ledger = MemoryLedger::new()
            .with_account(OFFLINE_PLAYER_KEY, OFFLINE_PLAYER_ADDRESS, Amount::from_micro(10_000_000))
            .with_account(
                &config.game.house.private_key,
                &config.game.house.address,
                Amount::from_micro(100_000_000),
            );
        let responder = match args.seed {
            Some(seed) => CannedResponder::seeded(seed),
            None => CannedResponder::new(),
        };
        println!("Offline mode: in-process ledger and canned agents");
        (
            Arc::new(ledger),
            Arc::new(responder),
            Account::new(OFFLINE_PLAYER_ADDRESS, OFFLINE_PLAYER_KEY),
        )
    } else {
        let address = args
            .address
            .or_else(|| config.player_address.clone())
            .ok_or_else(|| anyhow!("No player address given; pass --address or set player_address in the config"))?;
        let key = match std::env::var(PLAYER_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => Password::new()
                .with_prompt("Player private key")
                .interact()?,
        };
        (
            Arc::new(HttpLedger::new(&config.network)?),
            Arc::new(HttpResponder::new(&config.network)?),
            Account::new(address, key),
        )
    };

    let mut engine = RoundEngine::new(config.game, ledger, responder)?;
    if let Some(seed) = args.seed {
        engine = engine.with_seed(seed);
    }

    let mut feed = engine.subscribe_log();
    let printer = tokio::spawn(async move {
        loop {
            match feed.recv().await {
                Ok(entry) => print_entry(&entry),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Log display fell behind, skipped {} entries", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // a bad --impostor must fail before any funds move
    let chosen = args
        .impostor
        .as_deref()
        .map(|choice| find_agent(engine.config().roster_size, choice))
        .transpose()?;

    println!("Placing bet of {} STX...", args.bet);
    engine.place_bet(&player, args.bet).await?;

    println!();
    println!("{}", roster_table(engine.session().agents(), false));

    let impostor = match chosen {
        Some(id) => id,
        None => select_impostor(engine.session().agents())?,
    };
    engine.designate_impostor(impostor)?;

    let (stop, signal) = stop_channel();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping game");
            stop.stop();
        }
    });

    let report = engine.run(signal).await?;
    interrupt.abort();

    let session_summary = summarize(engine.session());
    let standings = roster_table(engine.session().agents(), true);
    // closing the feed lets the printer drain and exit
    drop(engine);
    let _ = printer.await;

    println!();
    println!("{}", standings);
    println!("{}", session_summary);

    match report {
        RunReport::Finished {
            outcome,
            settlement,
        } => {
            println!();
            println!("{}", outcome.message());
            match settlement {
                Ok(SettlementResult::Paid { amount, txid }) => {
                    println!("You won {} STX!", amount);
                    println!("Transaction ID: {}", txid);
                }
                Ok(SettlementResult::Forfeited { amount }) => {
                    println!("You lost your bet of {} STX.", amount);
                }
                Err(e) => {
                    eprintln!("Payout failed: {}", e);
                    eprintln!("The game is settled and will not be paid again automatically.");
                }
            }
        }
        RunReport::Halted { round } => {
            println!();
            println!("Game stopped after round {}. The bet is not settled.", round);
        }
    }

    Ok(())
}

fn print_entry(entry: &LogEntry) {
    let time = entry.timestamp.format("%H:%M:%S");
    match entry.kind {
        LogKind::System => println!("[{}] {}", time, entry.text),
        LogKind::Statement => println!("[{}]   \"{}\"", time, entry.text),
        LogKind::Vote => println!("[{}]   > {}", time, entry.text),
        LogKind::Settlement => println!("[{}] $ {}", time, entry.text),
    }
}

/// Resolve a 1-based number or persona name against a roster of `roster_size`.
fn find_agent(roster_size: usize, choice: &str) -> Result<AgentId> {
    let choice = choice.trim();
    let number = choice.parse::<usize>().ok();
    PERSONAS
        .iter()
        .take(roster_size)
        .enumerate()
        .find(|(index, persona)| {
            number == Some(index + 1) || persona.name.eq_ignore_ascii_case(choice)
        })
        .map(|(index, _)| index as AgentId)
        .ok_or_else(|| anyhow!("No agent matches '{}'", choice))
}

fn select_impostor(agents: &[Agent]) -> Result<AgentId> {
    let names: Vec<&str> = agents.iter().map(|a| a.name()).collect();
    let index = Select::new()
        .with_prompt("Who is the secret impostor?")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(agents[index].id())
}

fn roster_table(agents: &[Agent], reveal: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    if reveal {
        table.set_header(vec!["#", "Agent", "Role", "Status", "Suspicion"]);
    } else {
        table.set_header(vec!["#", "Agent", "Persona", "Suspicion"]);
    }

    for agent in agents {
        let number = (agent.id() + 1).to_string();
        let suspicion = format!("{:.0}%", agent.suspicion() * 100.0);
        if reveal {
            let role = if agent.is_impostor() { "Impostor" } else { "Crew" };
            let status = if agent.is_alive() { "Alive" } else { "Voted out" };
            table.add_row(vec![
                number,
                agent.name().to_string(),
                role.to_string(),
                status.to_string(),
                suspicion,
            ]);
        } else {
            table.add_row(vec![
                number,
                agent.name().to_string(),
                agent.persona().to_string(),
                suspicion,
            ]);
        }
    }

    table
}

fn summarize(session: &GameSession) -> String {
    let info = session.get_info();
    let mut lines = vec![
        format!("Game: {}", info.id),
        format!("Rounds played: {}", info.round),
        format!("Bet: {} STX", info.bet_amount),
    ];
    if let Some(balance) = info.player_balance {
        lines.push(format!("Balance: {} STX", balance));
    }
    lines.join("\n")
}
