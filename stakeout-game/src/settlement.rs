use crate::config::Account;
use crate::error::SettlementError;
use crate::log::LogKind;
use crate::session::{GameSession, GameState, Outcome};
use serde::{Deserialize, Serialize};
use stakeout_core::{Amount, Ledger, TxId};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementResult {
    Paid { amount: Amount, txid: TxId },
    Forfeited { amount: Amount },
}

/// Pays out (or records the forfeit of) a finished game's bet, once.
pub struct SettlementController {
    ledger: Arc<dyn Ledger>,
    house: Account,
    payout_bps: u32,
}

impl SettlementController {
    pub fn new(ledger: Arc<dyn Ledger>, house: Account, payout_bps: u32) -> Self {
        Self {
            ledger,
            house,
            payout_bps,
        }
    }

    pub fn payout_for(&self, bet: Amount) -> Amount {
        bet.scale_bps(self.payout_bps)
    }

    /// Settle `session` for `outcome`.
    ///
    /// The session is marked settled before the ledger is touched, so a
    /// failed payout still counts as the one attempt.
    pub async fn settle(
        &self,
        session: &mut GameSession,
        outcome: Outcome,
    ) -> Result<SettlementResult, SettlementError> {
        if session.settled {
            return Err(SettlementError::AlreadySettled(session.id()));
        }
        if !matches!(session.state, GameState::Finished { .. }) {
            return Err(SettlementError::NotFinished(session.id()));
        }
        session.settled = true;

        if !outcome.player_wins() {
            let amount = session.bet_amount;
            tracing::info!("Game {} settled: player forfeits {}", session.id(), amount);
            session.log.push(
                LogKind::Settlement,
                format!("You lost your bet of {} STX.", amount),
                None,
            );
            return Ok(SettlementResult::Forfeited { amount });
        }

        let winnings = self.payout_for(session.bet_amount);
        tracing::info!(
            "Game {} payout: {} to {}",
            session.id(),
            winnings,
            session.player_address
        );

        match self
            .ledger
            .transfer(&self.house.private_key, &session.player_address, winnings)
            .await
        {
            Ok(txid) => {
                if let Some(balance) = session.player_balance.as_mut() {
                    *balance += winnings;
                }
                session.log.push(
                    LogKind::Settlement,
                    format!(
                        "Received {} STX in winnings from game address {} (TxID: {})",
                        winnings, self.house.address, txid
                    ),
                    None,
                );
                Ok(SettlementResult::Paid {
                    amount: winnings,
                    txid,
                })
            }
            Err(source) => {
                tracing::warn!("Game {} payout failed: {}", session.id(), source);
                session
                    .log
                    .system(format!("Failed to transfer winnings: {}", source));
                Err(SettlementError::Payout {
                    amount: winnings,
                    source,
                })
            }
        }
    }
}
