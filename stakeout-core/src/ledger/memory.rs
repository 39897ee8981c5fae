use super::Ledger;
use crate::error::LedgerError;
use crate::types::{Amount, TxId};
use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TransferRecord {
    pub txid: TxId,
    pub from_address: String,
    pub to_address: String,
    pub amount: Amount,
}

#[derive(Debug, Default)]
struct Accounts {
    addresses: HashMap<String, String>, // private key -> address
    balances: HashMap<String, Amount>,
    history: Vec<TransferRecord>,
}

/// In-process ledger for offline play and tests.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: Mutex<Accounts>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that can sign with `private_key`.
    pub fn with_account(self, private_key: &str, address: &str, balance: Amount) -> Self {
        self.add_account(private_key, address, balance);
        self
    }

    pub fn add_account(&self, private_key: &str, address: &str, balance: Amount) {
        let mut accounts = self.accounts.lock();
        accounts
            .addresses
            .insert(private_key.to_string(), address.to_string());
        accounts.balances.insert(address.to_string(), balance);
    }

    pub fn balance_of(&self, address: &str) -> Amount {
        self.accounts
            .lock()
            .balances
            .get(address)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    pub fn history(&self) -> Vec<TransferRecord> {
        self.accounts.lock().history.clone()
    }
}

fn derive_txid(from: &str, to: &str, amount: Amount, sequence: usize) -> TxId {
    let mut hasher = Sha256::new();
    hasher.update(from.as_bytes());
    hasher.update(to.as_bytes());
    hasher.update(amount.to_micro().to_be_bytes());
    hasher.update((sequence as u64).to_be_bytes());
    TxId(hex::encode(hasher.finalize()))
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_balance(&self, address: &str) -> Result<Amount, LedgerError> {
        self.accounts
            .lock()
            .balances
            .get(address)
            .copied()
            .ok_or_else(|| LedgerError::UnknownAccount(address.to_string()))
    }

    async fn transfer(
        &self,
        from_key: &str,
        to_address: &str,
        amount: Amount,
    ) -> Result<TxId, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount(
                "transfer amount must be positive".to_string(),
            ));
        }

        let mut accounts = self.accounts.lock();
        let from_address = accounts
            .addresses
            .get(from_key)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownAccount("signing key".to_string()))?;

        let available = accounts
            .balances
            .get(&from_address)
            .copied()
            .unwrap_or(Amount::ZERO);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                need: amount.to_micro(),
                available: available.to_micro(),
            })?;

        accounts.balances.insert(from_address.clone(), remaining);
        *accounts
            .balances
            .entry(to_address.to_string())
            .or_insert(Amount::ZERO) += amount;

        let txid = derive_txid(&from_address, to_address, amount, accounts.history.len());
        accounts.history.push(TransferRecord {
            txid: txid.clone(),
            from_address: from_address.clone(),
            to_address: to_address.to_string(),
            amount,
        });

        tracing::debug!(
            "Memory ledger transfer {} -> {}: {} ({})",
            from_address,
            to_address,
            amount,
            txid
        );

        Ok(txid)
    }
}
