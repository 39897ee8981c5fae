use crate::agent::{living_counts, Agent, AgentId};
use crate::log::GameLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stakeout_core::Amount;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    ImpostorOutnumberedCrew,
    ImpostorSurvived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    PlayerWin,
    PlayerLoss(LossReason),
}

impl Outcome {
    pub fn player_wins(&self) -> bool {
        matches!(self, Outcome::PlayerWin)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::PlayerWin => "Crew wins! The impostor has been eliminated!",
            Outcome::PlayerLoss(LossReason::ImpostorOutnumberedCrew) => {
                "Impostor wins! They've eliminated enough crew members!"
            }
            Outcome::PlayerLoss(LossReason::ImpostorSurvived) => {
                "Impostor wins by surviving all rounds!"
            }
        }
    }
}

/// Lifecycle of one game. Nothing leaves `Finished`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Setup,
    /// Bet is placed and the roster is ready; waiting for the operator to
    /// designate the impostor.
    ImpostorSelected,
    Playing,
    Finished { outcome: Outcome },
}

/// Everything that belongs to a single game.
#[derive(Debug)]
pub struct GameSession {
    id: Uuid,
    pub(crate) state: GameState,
    pub(crate) round: u32,
    pub(crate) bet_amount: Amount,
    pub(crate) player_address: String,
    pub(crate) player_balance: Option<Amount>,
    pub(crate) agents: Vec<Agent>,
    pub(crate) log: GameLog,
    pub(crate) settled: bool,
    created_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(log: GameLog) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: GameState::Setup,
            round: 0,
            bet_amount: Amount::ZERO,
            player_address: String::new(),
            player_balance: None,
            agents: Vec::new(),
            log,
            settled: false,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn bet_amount(&self) -> Amount {
        self.bet_amount
    }

    pub fn player_address(&self) -> &str {
        &self.player_address
    }

    /// Locally tracked player balance, adjusted by the bet and any winnings.
    pub fn player_balance(&self) -> Option<Amount> {
        self.player_balance
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn living(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_alive())
    }

    pub fn impostor(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.is_impostor())
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            GameState::Finished { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// Living impostors and living crew.
    pub fn living_counts(&self) -> (usize, usize) {
        living_counts(&self.agents)
    }

    pub fn progress(&self, max_rounds: u32) -> f64 {
        if max_rounds == 0 {
            return 0.0;
        }
        (self.round as f64 / max_rounds as f64).min(1.0)
    }

    pub fn get_info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            state: self.state.clone(),
            round: self.round,
            bet_amount: self.bet_amount,
            player_balance: self.player_balance,
            agents: self.agents.clone(),
            settled: self.settled,
            log_entries: self.log.len(),
            created_at: self.created_at,
        }
    }
}

/// Session snapshot for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub state: GameState,
    pub round: u32,
    pub bet_amount: Amount,
    pub player_balance: Option<Amount>,
    pub agents: Vec<Agent>,
    pub settled: bool,
    pub log_entries: usize,
    pub created_at: DateTime<Utc>,
}
