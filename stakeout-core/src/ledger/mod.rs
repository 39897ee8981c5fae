pub mod http;
pub mod memory;

pub use http::HttpLedger;
pub use memory::MemoryLedger;

use crate::error::LedgerError;
use crate::types::{Amount, TxId};
use async_trait::async_trait;

/// Account and value-transfer capability consumed by the game.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Current spendable balance of `address`.
    async fn get_balance(&self, address: &str) -> Result<Amount, LedgerError>;

    /// Sign with `from_key` and broadcast a transfer of `amount` to `to_address`.
    async fn transfer(
        &self,
        from_key: &str,
        to_address: &str,
        amount: Amount,
    ) -> Result<TxId, LedgerError>;
}
