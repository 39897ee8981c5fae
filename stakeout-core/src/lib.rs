//! Stakeout core - capabilities the game consumes from the outside world
//!
//! The game talks to two collaborators: a ledger that holds balances and
//! broadcasts token transfers on the test network, and a responder that
//! generates in-character statements for agent personas. Both are traits so
//! the engine can run against HTTP services, in-memory fakes or test doubles.

pub mod config;
pub mod error;
pub mod ledger;
pub mod responder;
pub mod types;

pub use config::{Network, NetworkConfig};
pub use error::{ConfigError, LedgerError, ResponderError, Result};
pub use ledger::{HttpLedger, Ledger, MemoryLedger};
pub use responder::{AgentConfig, AgentHandle, CannedResponder, HttpResponder, Responder};
pub use types::{Amount, TxId};
