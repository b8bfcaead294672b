// src/config.rs
//! Deployment constants for the target network and contracts.

use serde::Serialize;

/// BSC testnet.
pub const TARGET_CHAIN_ID: u64 = 97;

/// Staking contract deployed on BSC testnet. The token address is not a
/// constant: it is resolved from `stakeToken()` at connect time.
pub const STAKING_ADDRESS: &str = "0x4E416179c8cE226586Cfbe4c4d87bFCA2fB0ce9a";

/// Local endpoint of the external wallet (Frame-style EIP-1193 over HTTP).
pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:1248";

/// Wallet endpoint, overridable per run.
pub fn wallet_url() -> String {
    std::env::var("WALLET_URL").unwrap_or_else(|_| DEFAULT_WALLET_URL.to_string())
}

pub fn chain_id_hex(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}

/// Display names for the chains a user is likely to land on.
pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "mainnet",
        56 => "bnb",
        97 => "bnbt",
        11155111 => "sepolia",
        _ => "unknown",
    }
}

/// Parameter object for `wallet_addEthereumChain` (EIP-3085).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

pub fn bsc_testnet() -> ChainDescriptor {
    ChainDescriptor {
        chain_id: chain_id_hex(TARGET_CHAIN_ID),
        chain_name: "BSC Testnet".to_string(),
        native_currency: NativeCurrency {
            name: "tBNB".to_string(),
            symbol: "tBNB".to_string(),
            decimals: 18,
        },
        rpc_urls: vec!["https://data-seed-prebsc-1-s1.binance.org:8545/".to_string()],
        block_explorer_urls: vec!["https://testnet.bscscan.com".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_chain_hex_matches_wallet_wire_format() {
        assert_eq!(chain_id_hex(TARGET_CHAIN_ID), "0x61");
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let json = serde_json::to_value(bsc_testnet()).unwrap();
        assert_eq!(json["chainId"], "0x61");
        assert_eq!(json["chainName"], "BSC Testnet");
        assert_eq!(json["nativeCurrency"]["symbol"], "tBNB");
        assert!(json["rpcUrls"].as_array().is_some());
    }
}
