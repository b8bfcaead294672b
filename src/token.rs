// src/token.rs
//! Gateway to the staking token, a standard fungible-token contract. The
//! token address is resolved from the staking contract at connect time, not
//! configured.

use crate::abi::{Address, CallBuilder};
use crate::error::AppError;
use crate::provider::{TxHash, WalletProvider};
use std::sync::Arc;

#[derive(Clone)]
pub struct TokenContract {
    provider: Arc<dyn WalletProvider>,
    pub address: Address,
}

impl TokenContract {
    pub fn new(provider: Arc<dyn WalletProvider>, address: Address) -> Self {
        Self { provider, address }
    }

    pub async fn decimals(&self) -> Result<u8, AppError> {
        let data = CallBuilder::new("decimals()").build();
        let value = self.provider.call(&self.address, data).await?.uint(0)?;
        u8::try_from(value)
            .map_err(|_| AppError::Remote(format!("implausible token decimals: {}", value)))
    }

    pub async fn balance_of(&self, owner: &Address) -> Result<u128, AppError> {
        let data = CallBuilder::new("balanceOf(address)").address(owner).build();
        self.provider.call(&self.address, data).await?.uint(0)
    }

    pub async fn allowance(&self, owner: &Address, spender: &Address) -> Result<u128, AppError> {
        let data = CallBuilder::new("allowance(address,address)")
            .address(owner)
            .address(spender)
            .build();
        self.provider.call(&self.address, data).await?.uint(0)
    }

    /// Grant the staking contract permission to pull `amount` base units.
    pub async fn approve(
        &self,
        from: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<TxHash, AppError> {
        let data = CallBuilder::new("approve(address,uint256)")
            .address(spender)
            .uint(amount)
            .build();
        self.provider.send_transaction(from, &self.address, data).await
    }
}
