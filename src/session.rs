// src/session.rs
//! Connected-wallet session. Built by `connect()`, threaded by value into
//! every action, and replaced wholesale when the user reconnects or switches
//! network; nothing here is process-global.

use crate::abi::Address;
use crate::config;
use crate::error::AppError;
use crate::provider::{TxHash, WalletProvider};
use crate::staking::StakingContract;
use crate::token::TokenContract;
use crate::units;
use std::sync::Arc;

#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn WalletProvider>,
    pub address: Address,
    pub chain_id: u64,
    /// Fetched once at connect time and reused for every conversion in this
    /// session.
    pub token_decimals: u8,
    pub staking: StakingContract,
    pub token: TokenContract,
}

/// One parallel sweep of the dashboard read queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub balance: u128,
    pub allowance: u128,
    pub stake_count: u128,
    pub pool_balance: u128,
}

impl Session {
    /// Ask the wallet for account access and build contract handles bound to
    /// the active address.
    pub async fn connect(provider: Arc<dyn WalletProvider>) -> Result<Self, AppError> {
        let accounts = provider.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| AppError::WalletUnavailable("wallet returned no accounts".to_string()))?;
        let chain_id = provider.chain_id().await?;

        let staking = StakingContract::new(
            provider.clone(),
            config::STAKING_ADDRESS.parse()?,
        );
        let token = TokenContract::new(provider.clone(), staking.stake_token().await?);
        let token_decimals = token.decimals().await?;

        log::info!("connected {} on chain {}", address, chain_id);
        Ok(Self {
            provider,
            address,
            chain_id,
            token_decimals,
            staking,
            token,
        })
    }

    pub fn network_label(&self) -> String {
        format!(
            "{} (chainId={})",
            config::chain_name(self.chain_id),
            self.chain_id
        )
    }

    /// Non-blocking warning when the wallet sits on the wrong network.
    pub fn chain_warning(&self) -> Option<AppError> {
        if self.chain_id == config::TARGET_CHAIN_ID {
            None
        } else {
            Some(AppError::ChainMismatch {
                expected: config::TARGET_CHAIN_ID,
                actual: self.chain_id,
            })
        }
    }

    pub async fn refresh_chain(&mut self) -> Result<(), AppError> {
        self.chain_id = self.provider.chain_id().await?;
        Ok(())
    }

    /// Re-query every dashboard value. The four reads are independent, so
    /// they are dispatched together and joined before rendering.
    pub async fn dashboard(&self) -> Result<DashboardData, AppError> {
        let (balance, allowance, stake_count, pool_balance) = tokio::try_join!(
            self.token.balance_of(&self.address),
            self.token.allowance(&self.address, &self.staking.address),
            self.staking.stakes_count(&self.address),
            self.staking.contract_token_balance(),
        )?;
        Ok(DashboardData {
            balance,
            allowance,
            stake_count,
            pool_balance,
        })
    }

    pub fn parse_amount(&self, input: &str) -> Result<u128, AppError> {
        units::parse_units(input, self.token_decimals)
    }

    pub fn format_amount(&self, value: u128) -> String {
        units::format_units(value, self.token_decimals)
    }

    /// Await completion of a pending transaction.
    pub async fn confirm(&self, tx: &TxHash) -> Result<(), AppError> {
        self.provider.confirm_transaction(tx).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("token_decimals", &self.token_decimals)
            .finish_non_exhaustive()
    }
}

/// Ask the wallet to switch to the target chain; when the wallet has never
/// seen the chain id, fall back to registering it. No retry loop beyond the
/// single fallback.
pub async fn switch_to_target_chain(provider: &dyn WalletProvider) -> Result<(), AppError> {
    match provider.switch_chain(config::TARGET_CHAIN_ID).await {
        Err(AppError::ChainUnknown) => provider.add_chain(&config::bsc_testnet()).await,
        other => other,
    }
}
