// src/provider.rs
//! Wallet provider boundary. The app never holds keys; everything that needs
//! an account, a signature, or chain state goes through an external wallet
//! speaking the standard injected-provider JSON-RPC surface (EIP-1193 over
//! HTTP, the way Frame and similar desktop wallets expose it).

use crate::abi::{self, Address, ReturnData};
use crate::config::{self, ChainDescriptor};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Hash of a submitted transaction. Completion is awaited through
/// [`WalletProvider::confirm_transaction`] before any dependent refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The narrow interface the rest of the app sees. Reads are side-effect
/// free; writes prompt the user in the wallet and return a pending hash.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<Address>, AppError>;
    async fn chain_id(&self) -> Result<u64, AppError>;
    async fn switch_chain(&self, chain_id: u64) -> Result<(), AppError>;
    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), AppError>;
    async fn call(&self, to: &Address, data: Vec<u8>) -> Result<ReturnData, AppError>;
    async fn send_transaction(
        &self,
        from: &Address,
        to: &Address,
        data: Vec<u8>,
    ) -> Result<TxHash, AppError>;
    async fn confirm_transaction(&self, tx: &TxHash) -> Result<(), AppError>;
}

pub struct HttpWalletProvider {
    client: Client,
    url: String,
}

impl HttpWalletProvider {
    pub fn new(url: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            url: url.map(str::to_string).unwrap_or_else(config::wallet_url),
        }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, AppError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AppError::WalletUnavailable(format!(
                        "no wallet reachable at {}: {}",
                        self.url, e
                    ))
                } else {
                    AppError::Remote(format!("wallet request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(AppError::Remote(format!(
                "wallet returned HTTP {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Remote(format!("unparseable wallet response: {}", e)))?;

        if let Some(error) = body.get("error") {
            return Err(map_rpc_error(error));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| AppError::Remote(format!("wallet response had no result: {:?}", body)))
    }
}

/// Standard injected-provider error codes (EIP-1193 / EIP-1474).
fn map_rpc_error(error: &Value) -> AppError {
    let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown wallet error")
        .to_string();
    match code {
        4001 => AppError::UserRejected,
        4902 => AppError::ChainUnknown,
        _ if message.to_ascii_lowercase().contains("revert") => AppError::Reverted(message),
        _ => AppError::Remote(format!("wallet error {}: {}", code, message)),
    }
}

fn parse_quantity(value: &Value) -> Result<u64, AppError> {
    let text = value
        .as_str()
        .ok_or_else(|| AppError::Remote(format!("expected hex quantity, got {:?}", value)))?;
    let body = text.strip_prefix("0x").unwrap_or(text);
    u64::from_str_radix(body, 16)
        .map_err(|e| AppError::Remote(format!("undecodable quantity {}: {}", text, e)))
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, AppError> {
        let result = self.request("eth_requestAccounts", json!([])).await?;
        let raw = result
            .as_array()
            .ok_or_else(|| AppError::Remote(format!("expected account list, got {:?}", result)))?;
        raw.iter()
            .map(|entry| {
                entry
                    .as_str()
                    .unwrap_or("")
                    .parse::<Address>()
                    .map_err(|e| AppError::Remote(format!("malformed wallet account: {}", e)))
            })
            .collect()
    }

    async fn chain_id(&self) -> Result<u64, AppError> {
        parse_quantity(&self.request("eth_chainId", json!([])).await?)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), AppError> {
        self.request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": config::chain_id_hex(chain_id) }]),
        )
        .await
        .map(|_| ())
    }

    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), AppError> {
        self.request("wallet_addEthereumChain", json!([descriptor]))
            .await
            .map(|_| ())
    }

    async fn call(&self, to: &Address, data: Vec<u8>) -> Result<ReturnData, AppError> {
        let result = self
            .request(
                "eth_call",
                json!([{ "to": to.to_checksum(), "data": abi::to_hex(&data) }, "latest"]),
            )
            .await?;
        let payload = result
            .as_str()
            .ok_or_else(|| AppError::Remote(format!("expected call payload, got {:?}", result)))?;
        ReturnData::parse(payload)
    }

    async fn send_transaction(
        &self,
        from: &Address,
        to: &Address,
        data: Vec<u8>,
    ) -> Result<TxHash, AppError> {
        let result = self
            .request(
                "eth_sendTransaction",
                json!([{
                    "from": from.to_checksum(),
                    "to": to.to_checksum(),
                    "data": abi::to_hex(&data),
                }]),
            )
            .await?;
        result
            .as_str()
            .map(|hash| TxHash(hash.to_string()))
            .ok_or_else(|| AppError::Remote(format!("expected transaction hash, got {:?}", result)))
    }

    /// Poll until the receipt lands. No timeout: a hung wallet prompt stalls
    /// only the action awaiting this transaction.
    async fn confirm_transaction(&self, tx: &TxHash) -> Result<(), AppError> {
        loop {
            let receipt = self
                .request("eth_getTransactionReceipt", json!([tx.0]))
                .await?;
            if receipt.is_null() {
                tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
                continue;
            }
            let status = receipt
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("0x1");
            if status == "0x0" {
                return Err(AppError::Reverted(format!(
                    "transaction {} reverted on-chain",
                    tx
                )));
            }
            return Ok(());
        }
    }
}
