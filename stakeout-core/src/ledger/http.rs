use super::Ledger;
use crate::config::{Network, NetworkConfig};
use crate::error::{ConfigError, LedgerError};
use crate::types::{Amount, TxId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
struct BalanceRequest<'a> {
    address: &'a str,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    success: bool,
    #[serde(default)]
    balance: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_private_key: String,
    pub to_address: String,
    pub amount: String,
    pub network: Network,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub success: bool,
    #[serde(default)]
    pub tx_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Ledger backed by the wallet HTTP service.
pub struct HttpLedger {
    client: reqwest::Client,
    base_url: String,
    network: Network,
}

impl HttpLedger {
    pub fn new(config: &NetworkConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::invalid(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.ledger_url.trim_end_matches('/').to_string(),
            network: config.network,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

const MICRO_PER_UNIT: f64 = 1_000_000.0;

/// The balance field comes back either as a decimal string or a JSON number.
fn parse_balance(value: &Value) -> Result<Amount, LedgerError> {
    match value {
        Value::String(s) => s
            .parse::<Amount>()
            .map_err(|e| LedgerError::invalid_response(e.to_string())),
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                return whole
                    .checked_mul(MICRO_PER_UNIT as u64)
                    .map(Amount::from_micro)
                    .ok_or_else(|| LedgerError::invalid_response(format!("balance overflow: {}", n)));
            }
            match n.as_f64() {
                Some(units) if units.is_finite() && units >= 0.0 => {
                    let micro = (units * MICRO_PER_UNIT).round();
                    if micro > u64::MAX as f64 {
                        return Err(LedgerError::invalid_response(format!(
                            "balance overflow: {}",
                            n
                        )));
                    }
                    Ok(Amount::from_micro(micro as u64))
                }
                _ => Err(LedgerError::invalid_response(format!(
                    "unexpected balance value: {}",
                    n
                ))),
            }
        }
        Value::Object(map) => match map.get("balance").or_else(|| map.get("stx")) {
            Some(inner) => parse_balance(inner),
            None => Err(LedgerError::invalid_response(format!(
                "unrecognised balance object: {}",
                value
            ))),
        },
        other => Err(LedgerError::invalid_response(format!(
            "unexpected balance value: {}",
            other
        ))),
    }
}

/// `success:false` is a service-side rejection; a missing field is a malformed reply.
fn balance_result(response: BalanceResponse) -> Result<Amount, LedgerError> {
    if !response.success {
        return Err(LedgerError::rejected(
            response
                .error
                .unwrap_or_else(|| "Failed to fetch balance".to_string()),
        ));
    }

    let balance = response
        .balance
        .ok_or_else(|| LedgerError::invalid_response("missing balance"))?;
    parse_balance(&balance)
}

fn transfer_result(response: TransferResponse) -> Result<TxId, LedgerError> {
    match (response.success, response.tx_id) {
        (true, Some(txid)) => Ok(TxId(txid)),
        (true, None) => Err(LedgerError::invalid_response("missing txId")),
        (false, _) => Err(LedgerError::rejected(
            response
                .error
                .unwrap_or_else(|| "Failed to transfer".to_string()),
        )),
    }
}

#[async_trait]
impl Ledger for HttpLedger {
    async fn get_balance(&self, address: &str) -> Result<Amount, LedgerError> {
        let response: BalanceResponse = self
            .client
            .post(self.url("/api/balance"))
            .json(&BalanceRequest { address })
            .send()
            .await?
            .json()
            .await?;

        balance_result(response)
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

        let request = TransferRequest {
            from_private_key: from_key.to_string(),
            to_address: to_address.to_string(),
            amount: amount.to_string(),
            network: self.network,
        };

        tracing::info!("Broadcasting transfer of {} to {}", amount, to_address);

        let response: TransferResponse = self
            .client
            .post(self.url("/api/transfer"))
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        transfer_result(response)
    }
}
