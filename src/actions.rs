// src/actions.rs
//! One function per user-triggered action. Validation happens here, before
//! any wallet traffic; past that each action is a thin call through the
//! session's contract gateways. Writes return the pending hash so the caller
//! can log the submission, await confirmation, then refresh.

use crate::abi::Address;
use crate::error::AppError;
use crate::provider::TxHash;
use crate::session::{DashboardData, Session};
use crate::staking::{StakePreview, StakeRecord};
use crate::units;

/// Identifier for every button on the dashboard. The UI maps each to its
/// handler through a single dispatch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    SwitchNetwork,
    Refresh,
    Approve,
    Deposit,
    DepositWithReferrer,
    Preview,
    ManualWithdraw,
    PressWithdraw,
    ClaimAgent,
    QueryStake,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Connect => "connect",
            Action::SwitchNetwork => "switch network",
            Action::Refresh => "refresh",
            Action::Approve => "approve",
            Action::Deposit => "deposit",
            Action::DepositWithReferrer => "deposit with referrer",
            Action::Preview => "preview",
            Action::ManualWithdraw => "manual withdraw",
            Action::PressWithdraw => "press withdraw",
            Action::ClaimAgent => "claim agent rewards",
            Action::QueryStake => "query stake",
        }
    }
}

pub fn parse_stake_id(input: &str) -> Result<u64, AppError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidInput("stake id is empty".to_string()));
    }
    raw.parse::<u64>().map_err(|_| {
        AppError::InvalidInput(format!("stake id must be a non-negative integer: {}", raw))
    })
}

pub async fn approve(session: &Session, amount: &str) -> Result<TxHash, AppError> {
    let amount = session.parse_amount(amount)?;
    session
        .token
        .approve(&session.address, &session.staking.address, amount)
        .await
}

pub async fn deposit(session: &Session, amount: &str) -> Result<TxHash, AppError> {
    let amount = session.parse_amount(amount)?;
    session.staking.deposit(&session.address, amount).await
}

pub async fn deposit_with_referrer(
    session: &Session,
    amount: &str,
    referrer: &str,
) -> Result<TxHash, AppError> {
    let amount = session.parse_amount(amount)?;
    let referrer: Address = referrer.parse()?;
    session
        .staking
        .deposit_with_referrer(&session.address, amount, &referrer)
        .await
}

pub async fn preview(session: &Session, amount: &str) -> Result<StakePreview, AppError> {
    let amount = session.parse_amount(amount)?;
    session.staking.preview_net_and_interest(amount).await
}

pub async fn manual_withdraw(session: &Session, stake_id: &str) -> Result<TxHash, AppError> {
    let stake_id = parse_stake_id(stake_id)?;
    session
        .staking
        .manual_withdraw_matured(&session.address, stake_id)
        .await
}

pub async fn press_withdraw(
    session: &Session,
    old_stake_id: &str,
    new_amount: &str,
) -> Result<TxHash, AppError> {
    let old_stake_id = parse_stake_id(old_stake_id)?;
    let new_amount = session.parse_amount(new_amount)?;
    session
        .staking
        .withdraw_with_press_stake(&session.address, old_stake_id, new_amount)
        .await
}

pub async fn claim_agent_rewards(session: &Session) -> Result<TxHash, AppError> {
    session.staking.claim_agent_rewards(&session.address).await
}

pub async fn query_stake(session: &Session, stake_id: &str) -> Result<StakeRecord, AppError> {
    let stake_id = parse_stake_id(stake_id)?;
    session.staking.stake(&session.address, stake_id).await
}

/// Formatted dashboard values, ready for the output fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub balance: String,
    pub allowance: String,
    pub stake_count: String,
    pub pool_balance: String,
}

pub fn dashboard_view(data: &DashboardData, decimals: u8) -> DashboardView {
    DashboardView {
        balance: units::format_units(data.balance, decimals),
        allowance: units::format_units(data.allowance, decimals),
        stake_count: data.stake_count.to_string(),
        pool_balance: units::format_units(data.pool_balance, decimals),
    }
}

/// Preview breakdown as displayed. `valid` is rendered verbatim as
/// "true"/"false"; an invalid quote is shown, never submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub valid: String,
    pub total_fee: String,
    pub net_amount: String,
    pub duration: String,
    pub total_rate_bp: String,
    pub interest_amount: String,
    pub payout_amount: String,
}

pub fn preview_view(preview: &StakePreview, decimals: u8) -> PreviewView {
    PreviewView {
        valid: preview.valid.to_string(),
        total_fee: units::format_units(preview.total_fee, decimals),
        net_amount: units::format_units(preview.net_amount, decimals),
        duration: preview.duration.to_string(),
        total_rate_bp: preview.total_rate_bp.to_string(),
        interest_amount: units::format_units(preview.interest_amount, decimals),
        payout_amount: units::format_units(preview.payout_amount, decimals),
    }
}

/// Stake detail as displayed: formatted amounts, raw booleans and numerics.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeDetailView {
    pub amount: String,
    pub start_ts: String,
    pub duration: String,
    pub withdrawn: String,
    pub active: String,
    pub rate_bp: String,
    pub interest_amount: String,
}

pub fn stake_detail_view(record: &StakeRecord, decimals: u8) -> StakeDetailView {
    StakeDetailView {
        amount: units::format_units(record.amount, decimals),
        start_ts: record.start_ts.to_string(),
        duration: record.duration.to_string(),
        withdrawn: record.withdrawn.to_string(),
        active: record.active.to_string(),
        rate_bp: record.rate_bp.to_string(),
        interest_amount: units::format_units(record.interest_amount, decimals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::selector;
    use crate::provider::mock::{self, MockProvider};
    use std::sync::Arc;

    const USER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const TOKEN: &str = "0x00000000000000000000000000000000000000aa";
    const WAD: u128 = 1_000_000_000_000_000_000;

    async fn connected() -> (Arc<MockProvider>, Session) {
        let provider = MockProvider::new(USER);
        provider.respond("stakeToken()", mock::word_address(TOKEN));
        provider.respond("decimals()", mock::word_uint(18));
        let provider = Arc::new(provider);
        let session = Session::connect(provider.clone()).await.unwrap();
        (provider, session)
    }

    #[tokio::test]
    async fn empty_amount_never_reaches_the_wallet() {
        let (provider, session) = connected().await;
        let base = provider.total_calls();
        let err = deposit(&session, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(provider.total_calls(), base);
        assert_eq!(provider.sent_count(), 0);
    }

    #[tokio::test]
    async fn invalid_referrer_address_blocks_submission() {
        let (provider, session) = connected().await;
        for referrer in ["", "not-an-address", "0x1234"] {
            let err = deposit_with_referrer(&session, "10", referrer)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{:?}", referrer);
        }
        assert_eq!(provider.sent_count(), 0);
    }

    #[tokio::test]
    async fn deposit_scales_the_amount_by_cached_decimals() {
        let (provider, session) = connected().await;
        deposit(&session, "10").await.unwrap();
        let data = provider.sent_data(0);
        assert_eq!(&data[..4], &selector("deposit(uint256)"));
        assert_eq!(data[4..36], mock::word_uint(10 * WAD)[..]);
    }

    #[tokio::test]
    async fn approve_targets_the_staking_contract() {
        let (provider, session) = connected().await;
        approve(&session, "2.5").await.unwrap();
        let data = provider.sent_data(0);
        assert_eq!(&data[..4], &selector("approve(address,uint256)"));
        assert_eq!(
            data[16..36],
            session.staking.address.as_bytes()[..],
        );
        assert_eq!(data[36..68], mock::word_uint(2 * WAD + WAD / 2)[..]);
    }

    #[tokio::test]
    async fn referrer_deposit_encodes_amount_then_address() {
        let (provider, session) = connected().await;
        deposit_with_referrer(&session, "1", USER).await.unwrap();
        let data = provider.sent_data(0);
        assert_eq!(&data[..4], &selector("depositWithReferrer(uint256,address)"));
        assert_eq!(data[4..36], mock::word_uint(WAD)[..]);
        assert_eq!(data[48..68], USER.parse::<Address>().unwrap().as_bytes()[..]);
    }

    #[tokio::test]
    async fn bad_stake_ids_are_rejected_before_any_call() {
        let (provider, session) = connected().await;
        for input in ["", "abc", "-1", "1.5"] {
            let err = manual_withdraw(&session, input).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{:?}", input);
            let err = query_stake(&session, input).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{:?}", input);
        }
        assert_eq!(provider.sent_count(), 0);
        assert_eq!(provider.call_count("getStake(address,uint256)"), 0);
    }

    #[test]
    fn stake_ids_parse_as_plain_integers() {
        assert_eq!(parse_stake_id("3").unwrap(), 3);
        assert_eq!(parse_stake_id(" 0 ").unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_preview_renders_false_and_offers_no_transaction() {
        let (provider, session) = connected().await;
        provider.respond(
            "previewNetAndInterest(uint256)",
            mock::words(&[
                mock::word_bool(false),
                mock::word_uint(0),
                mock::word_uint(0),
                mock::word_uint(0),
                mock::word_uint(0),
                mock::word_uint(0),
                mock::word_uint(0),
            ]),
        );
        let quote = preview(&session, "10").await.unwrap();
        let view = preview_view(&quote, session.token_decimals);
        assert_eq!(view.valid, "false");
        assert_eq!(provider.sent_count(), 0);
    }

    #[tokio::test]
    async fn stake_detail_renders_booleans_beside_formatted_amounts() {
        let (provider, session) = connected().await;
        provider.respond(
            "getStake(address,uint256)",
            mock::words(&[
                mock::word_uint(5 * WAD),
                mock::word_uint(1_700_000_000),
                mock::word_uint(86_400),
                mock::word_bool(true),
                mock::word_bool(false),
                mock::word_uint(250),
                mock::word_uint(WAD / 10),
            ]),
        );
        let record = query_stake(&session, "3").await.unwrap();
        let view = stake_detail_view(&record, session.token_decimals);
        assert_eq!(view.withdrawn, "true");
        assert_eq!(view.active, "false");
        assert_eq!(view.amount, "5.0");
        assert_eq!(view.interest_amount, "0.1");
        assert_eq!(view.rate_bp, "250");
    }

    #[tokio::test]
    async fn claim_sends_a_bare_selector() {
        let (provider, session) = connected().await;
        claim_agent_rewards(&session).await.unwrap();
        let data = provider.sent_data(0);
        assert_eq!(data, selector("claimAgentRewards()").to_vec());
    }
}
