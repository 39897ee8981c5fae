//! Stakeout: a social-deduction betting game played by AI agents.
//!
//! The player stakes a bet, picks which of the agents is the secret
//! impostor and then watches the crew talk and vote. If the crew votes the
//! impostor out the player is paid the bet times the configured multiplier.
//! If the impostor survives, or reaches parity with the crew, the bet is
//! forfeited.

pub mod agent;
pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod prompts;
pub mod session;
pub mod settlement;
pub mod stop;
pub mod suspicion;
pub mod voting;

pub use agent::{Agent, AgentId, Persona, PERSONAS};
pub use config::{Account, GameConfig, Pacing, RevealPolicy};
pub use engine::{RoundEngine, RunReport};
pub use error::{GameError, Result, SettlementError};
pub use log::{GameLog, LogEntry, LogKind};
pub use session::{GameSession, GameState, LossReason, Outcome, SessionInfo};
pub use settlement::{SettlementController, SettlementResult};
pub use stop::{stop_channel, StopHandle, StopSignal};
pub use suspicion::{SuspicionConfig, SuspicionModel};
pub use voting::{Ballot, VoteOutcome};
