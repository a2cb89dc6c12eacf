//! HTTP implementation of [`LedgerClient`] against a running ledger node.

use async_trait::async_trait;
use parcel_types::{ChainEvent, LedgerAddress, TxHash};
use serde::Deserialize;

use crate::client::LedgerClient;
use crate::error::LedgerError;
use crate::types::{AccountRecord, IncludedTx, MortgageRecord, SubmitOutcome, TxLookup};

/// Talks JSON to a ledger node's REST endpoint.
pub struct HttpLedgerClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct AccountResponse {
    address: String,
    account_number: u64,
    sequence: u64,
}

#[derive(Deserialize)]
struct SubmitResponse {
    hash: String,
    code: u32,
    #[serde(default)]
    raw_log: String,
}

#[derive(Deserialize)]
struct TxResponse {
    code: u32,
    #[serde(default)]
    raw_log: String,
    #[serde(default)]
    events: Vec<EventResponse>,
    height: u64,
}

#[derive(Deserialize)]
struct EventResponse {
    kind: String,
    #[serde(default)]
    attributes: Vec<(String, String)>,
}

impl HttpLedgerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn get_account(&self, address: &LedgerAddress) -> Result<AccountRecord, LedgerError> {
        let resp = self
            .client
            .get(self.url(&format!("/accounts/{address}")))
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::AccountNotFound(address.to_string()));
        }
        let body: AccountResponse = resp
            .error_for_status()
            .map_err(|e| LedgerError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| LedgerError::BadResponse(e.to_string()))?;

        if !body.address.starts_with(LedgerAddress::PREFIX) {
            return Err(LedgerError::BadResponse(format!(
                "malformed account address: {}",
                body.address
            )));
        }
        Ok(AccountRecord {
            address: LedgerAddress::new(body.address),
            account_number: body.account_number,
            sequence: body.sequence,
        })
    }

    async fn check_and_submit(&self, tx_bytes: &[u8]) -> Result<SubmitOutcome, LedgerError> {
        let body: SubmitResponse = self
            .client
            .post(self.url("/txs"))
            .json(&serde_json::json!({ "tx_bytes": hex::encode(tx_bytes) }))
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| LedgerError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| LedgerError::BadResponse(e.to_string()))?;

        let hash = TxHash::from_hex(&body.hash)
            .ok_or_else(|| LedgerError::BadResponse(format!("bad tx hash: {}", body.hash)))?;

        Ok(SubmitOutcome {
            hash,
            code: body.code,
            raw_log: body.raw_log,
        })
    }

    async fn get_transaction_by_hash(&self, hash: &TxHash) -> Result<TxLookup, LedgerError> {
        let resp = self
            .client
            .get(self.url(&format!("/txs/{hash}")))
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        // Not-yet-included is a success path for the tracker, not an error.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(TxLookup::NotFound);
        }
        let body: TxResponse = resp
            .error_for_status()
            .map_err(|e| LedgerError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| LedgerError::BadResponse(e.to_string()))?;

        Ok(TxLookup::Included(IncludedTx {
            code: body.code,
            raw_log: body.raw_log,
            events: body
                .events
                .into_iter()
                .map(|e| ChainEvent {
                    kind: e.kind,
                    attributes: e.attributes,
                })
                .collect(),
            height: body.height,
        }))
    }

    async fn get_mortgage(&self, id: u64) -> Result<MortgageRecord, LedgerError> {
        let resp = self
            .client
            .get(self.url(&format!("/mortgages/{id}")))
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::MortgageNotFound(id));
        }
        resp.error_for_status()
            .map_err(|e| LedgerError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| LedgerError::BadResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_stripped() {
        let client = HttpLedgerClient::new("http://localhost:1317/");
        assert_eq!(client.url("/txs"), "http://localhost:1317/txs");
    }
}
