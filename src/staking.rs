// src/staking.rs
//! Typed gateway to the staking contract. Reads are chain-state queries
//! decoded into plain view structs; writes submit wallet-signed transactions
//! and hand back the pending hash. All correctness guarantees (maturity,
//! fees, referral bookkeeping) live in the contract, not here.

use crate::abi::{Address, CallBuilder, ReturnData};
use crate::error::AppError;
use crate::provider::{TxHash, WalletProvider};
use std::sync::Arc;

/// Read-only projection of one on-chain stake, fetched by index per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeRecord {
    pub amount: u128,
    pub start_ts: u128,
    pub duration: u128,
    pub withdrawn: bool,
    pub active: bool,
    pub rate_bp: u128,
    pub interest_amount: u128,
}

/// Quote for a prospective deposit. Discarded after display; `valid: false`
/// means the contract would not accept the amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakePreview {
    pub valid: bool,
    pub total_fee: u128,
    pub net_amount: u128,
    pub duration: u128,
    pub total_rate_bp: u128,
    pub interest_amount: u128,
    pub payout_amount: u128,
}

#[derive(Clone)]
pub struct StakingContract {
    provider: Arc<dyn WalletProvider>,
    pub address: Address,
}

impl StakingContract {
    pub fn new(provider: Arc<dyn WalletProvider>, address: Address) -> Self {
        Self { provider, address }
    }

    async fn query(&self, data: Vec<u8>) -> Result<ReturnData, AppError> {
        self.provider.call(&self.address, data).await
    }

    /// Address of the token the contract stakes.
    pub async fn stake_token(&self) -> Result<Address, AppError> {
        let data = CallBuilder::new("stakeToken()").build();
        self.query(data).await?.address(0)
    }

    pub async fn preview_net_and_interest(
        &self,
        gross_amount: u128,
    ) -> Result<StakePreview, AppError> {
        let data = CallBuilder::new("previewNetAndInterest(uint256)")
            .uint(gross_amount)
            .build();
        let ret = self.query(data).await?;
        Ok(StakePreview {
            valid: ret.boolean(0)?,
            total_fee: ret.uint(1)?,
            net_amount: ret.uint(2)?,
            duration: ret.uint(3)?,
            total_rate_bp: ret.uint(4)?,
            interest_amount: ret.uint(5)?,
            payout_amount: ret.uint(6)?,
        })
    }

    pub async fn stakes_count(&self, user: &Address) -> Result<u128, AppError> {
        let data = CallBuilder::new("getStakesCount(address)").address(user).build();
        self.query(data).await?.uint(0)
    }

    pub async fn stake(&self, user: &Address, stake_id: u64) -> Result<StakeRecord, AppError> {
        let data = CallBuilder::new("getStake(address,uint256)")
            .address(user)
            .uint(stake_id as u128)
            .build();
        let ret = self.query(data).await?;
        Ok(StakeRecord {
            amount: ret.uint(0)?,
            start_ts: ret.uint(1)?,
            duration: ret.uint(2)?,
            withdrawn: ret.boolean(3)?,
            active: ret.boolean(4)?,
            rate_bp: ret.uint(5)?,
            interest_amount: ret.uint(6)?,
        })
    }

    /// Token balance held by the contract itself (the pool).
    pub async fn contract_token_balance(&self) -> Result<u128, AppError> {
        let data = CallBuilder::new("getContractTokenBalance()").build();
        self.query(data).await?.uint(0)
    }

    pub async fn deposit(&self, from: &Address, amount: u128) -> Result<TxHash, AppError> {
        let data = CallBuilder::new("deposit(uint256)").uint(amount).build();
        self.provider.send_transaction(from, &self.address, data).await
    }

    pub async fn deposit_with_referrer(
        &self,
        from: &Address,
        amount: u128,
        referrer: &Address,
    ) -> Result<TxHash, AppError> {
        let data = CallBuilder::new("depositWithReferrer(uint256,address)")
            .uint(amount)
            .address(referrer)
            .build();
        self.provider.send_transaction(from, &self.address, data).await
    }

    pub async fn manual_withdraw_matured(
        &self,
        from: &Address,
        stake_id: u64,
    ) -> Result<TxHash, AppError> {
        let data = CallBuilder::new("manualWithdrawMatured(uint256)")
            .uint(stake_id as u128)
            .build();
        self.provider.send_transaction(from, &self.address, data).await
    }

    /// Close `old_stake_id` and atomically open a new stake with
    /// `new_gross_amount` principal.
    pub async fn withdraw_with_press_stake(
        &self,
        from: &Address,
        old_stake_id: u64,
        new_gross_amount: u128,
    ) -> Result<TxHash, AppError> {
        let data = CallBuilder::new("withdrawWithPressStake(uint256,uint256)")
            .uint(old_stake_id as u128)
            .uint(new_gross_amount)
            .build();
        self.provider.send_transaction(from, &self.address, data).await
    }

    pub async fn claim_agent_rewards(&self, from: &Address) -> Result<TxHash, AppError> {
        let data = CallBuilder::new("claimAgentRewards()").build();
        self.provider.send_transaction(from, &self.address, data).await
    }
}
