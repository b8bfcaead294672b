use dioxus::prelude::*;
use std::sync::Arc;

use crate::actions::{self, Action, DashboardView, PreviewView, StakeDetailView};
use crate::config;
use crate::error::AppError;
use crate::provider::{HttpWalletProvider, TxHash, WalletProvider};
use crate::session::{self, Session};

use super::log_panel::LogPanel;

/// Every signal an action handler may touch, bundled so the dispatcher can
/// hand the whole UI surface to `perform` by copy.
#[derive(Clone, Copy)]
struct UiState {
    session: Signal<Option<Session>>,
    network: Signal<String>,
    dashboard: Signal<Option<DashboardView>>,
    preview: Signal<Option<PreviewView>>,
    stake_detail: Signal<Option<StakeDetailView>>,
    amount: Signal<String>,
    referrer: Signal<String>,
    withdraw_id: Signal<String>,
    press_old_id: Signal<String>,
    press_new_amount: Signal<String>,
    query_id: Signal<String>,
    log: Signal<Vec<String>>,
}

impl UiState {
    fn push_log(&mut self, message: &str) {
        log::info!("{}", message);
        let line = format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), message);
        self.log.write().insert(0, line);
    }
}

fn require_session(ui: &UiState) -> Result<Session, AppError> {
    ui.session
        .peek()
        .clone()
        .ok_or_else(|| AppError::WalletUnavailable("connect the wallet first".to_string()))
}

async fn refresh_dashboard(session: &Session, ui: &mut UiState) -> Result<(), AppError> {
    let data = session.dashboard().await?;
    ui.dashboard
        .set(Some(actions::dashboard_view(&data, session.token_decimals)));
    Ok(())
}

/// Log the submission, await confirmation, then re-query the dashboard.
async fn settle(
    session: &Session,
    ui: &mut UiState,
    what: &str,
    tx: TxHash,
) -> Result<(), AppError> {
    ui.push_log(&format!("{} sent: {}", what, tx));
    session.confirm(&tx).await?;
    ui.push_log(&format!("{} confirmed", what));
    refresh_dashboard(session, ui).await
}

/// Runs one action to completion. Callers catch the error and log it; no
/// failure propagates past the dispatch boundary.
async fn perform(
    action: Action,
    provider: Arc<dyn WalletProvider>,
    mut ui: UiState,
) -> Result<(), AppError> {
    match action {
        Action::Connect => {
            let session = Session::connect(provider).await?;
            ui.network.set(session.network_label());
            if let Some(warning) = session.chain_warning() {
                ui.push_log(&format!("warning: {}", warning));
            }
            refresh_dashboard(&session, &mut ui).await?;
            ui.session.set(Some(session));
            ui.push_log("wallet connected");
        }
        Action::SwitchNetwork => {
            session::switch_to_target_chain(provider.as_ref()).await?;
            let connected = ui.session.peek().clone();
            if let Some(mut session) = connected {
                session.refresh_chain().await?;
                ui.network.set(session.network_label());
                if let Some(warning) = session.chain_warning() {
                    ui.push_log(&format!("warning: {}", warning));
                }
                ui.session.set(Some(session));
            }
            ui.push_log(&format!(
                "network switched to chain {}",
                config::TARGET_CHAIN_ID
            ));
        }
        Action::Refresh => {
            let session = require_session(&ui)?;
            refresh_dashboard(&session, &mut ui).await?;
        }
        Action::Approve => {
            let session = require_session(&ui)?;
            let amount = ui.amount.peek().clone();
            let tx = actions::approve(&session, &amount).await?;
            settle(&session, &mut ui, "approve", tx).await?;
        }
        Action::Deposit => {
            let session = require_session(&ui)?;
            let amount = ui.amount.peek().clone();
            let tx = actions::deposit(&session, &amount).await?;
            settle(&session, &mut ui, "deposit", tx).await?;
        }
        Action::DepositWithReferrer => {
            let session = require_session(&ui)?;
            let amount = ui.amount.peek().clone();
            let referrer = ui.referrer.peek().clone();
            let tx = actions::deposit_with_referrer(&session, &amount, &referrer).await?;
            settle(&session, &mut ui, "referred deposit", tx).await?;
        }
        Action::Preview => {
            let session = require_session(&ui)?;
            let amount = ui.amount.peek().clone();
            let quote = actions::preview(&session, &amount).await?;
            ui.preview
                .set(Some(actions::preview_view(&quote, session.token_decimals)));
        }
        Action::ManualWithdraw => {
            let session = require_session(&ui)?;
            let stake_id = ui.withdraw_id.peek().clone();
            let tx = actions::manual_withdraw(&session, &stake_id).await?;
            settle(&session, &mut ui, "manual withdraw", tx).await?;
        }
        Action::PressWithdraw => {
            let session = require_session(&ui)?;
            let old_id = ui.press_old_id.peek().clone();
            let new_amount = ui.press_new_amount.peek().clone();
            let tx = actions::press_withdraw(&session, &old_id, &new_amount).await?;
            settle(&session, &mut ui, "press withdraw", tx).await?;
        }
        Action::ClaimAgent => {
            let session = require_session(&ui)?;
            let tx = actions::claim_agent_rewards(&session).await?;
            settle(&session, &mut ui, "claim agent rewards", tx).await?;
        }
        Action::QueryStake => {
            let session = require_session(&ui)?;
            let stake_id = ui.query_id.peek().clone();
            let record = actions::query_stake(&session, &stake_id).await?;
            ui.stake_detail.set(Some(actions::stake_detail_view(
                &record,
                session.token_decimals,
            )));
        }
    }
    Ok(())
}

#[component]
pub fn Dashboard() -> Element {
    let provider = use_hook(|| {
        Arc::new(HttpWalletProvider::new(None)) as Arc<dyn WalletProvider>
    });

    let ui = UiState {
        session: use_signal(|| None),
        network: use_signal(|| "-".to_string()),
        dashboard: use_signal(|| None),
        preview: use_signal(|| None),
        stake_detail: use_signal(|| None),
        amount: use_signal(String::new),
        referrer: use_signal(String::new),
        withdraw_id: use_signal(String::new),
        press_old_id: use_signal(String::new),
        press_new_amount: use_signal(String::new),
        query_id: use_signal(String::new),
        log: use_signal(Vec::new),
    };

    // Single dispatch point: every button funnels through here, each action
    // runs in its own task, and failures stop at the log. Actions are not
    // queued or debounced.
    let run = use_callback(move |action: Action| {
        let provider = provider.clone();
        let mut ui = ui;
        spawn(async move {
            if let Err(e) = perform(action, provider, ui).await {
                ui.push_log(&format!("{} failed: {}", action.label(), e));
            }
        });
    });

    let mut amount = ui.amount;
    let mut referrer = ui.referrer;
    let mut withdraw_id = ui.withdraw_id;
    let mut press_old_id = ui.press_old_id;
    let mut press_new_amount = ui.press_new_amount;
    let mut query_id = ui.query_id;

    let wallet_text = ui
        .session
        .read()
        .as_ref()
        .map(|s| s.address.to_checksum())
        .unwrap_or_else(|| "-".to_string());
    let network_text = ui.network.read().clone();
    let dashboard_values = ui.dashboard.read().clone();
    let preview_values = ui.preview.read().clone();
    let stake_values = ui.stake_detail.read().clone();
    let log_entries = ui.log.read().clone();

    rsx! {
        div {
            class: "app",
            h1 { class: "app-title", "Token Staking Dashboard" }

            div {
                class: "panel",
                h3 { class: "panel-title", "Wallet" }
                div { class: "button-row",
                    button {
                        class: "action-button primary",
                        onclick: move |_| run.call(Action::Connect),
                        "Connect Wallet"
                    }
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::SwitchNetwork),
                        "Switch to BSC Testnet"
                    }
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::Refresh),
                        "Refresh"
                    }
                }
                div { class: "field-row",
                    span { class: "field-label", "Address:" }
                    span { class: "field-value mono", "{wallet_text}" }
                }
                div { class: "field-row",
                    span { class: "field-label", "Network:" }
                    span { class: "field-value", "{network_text}" }
                }
            }

            div {
                class: "panel",
                h3 { class: "panel-title", "My Position" }
                if let Some(values) = dashboard_values {
                    div { class: "field-row",
                        span { class: "field-label", "Token balance:" }
                        span { class: "field-value", "{values.balance}" }
                    }
                    div { class: "field-row",
                        span { class: "field-label", "Allowance:" }
                        span { class: "field-value", "{values.allowance}" }
                    }
                    div { class: "field-row",
                        span { class: "field-label", "My stakes:" }
                        span { class: "field-value", "{values.stake_count}" }
                    }
                    div { class: "field-row",
                        span { class: "field-label", "Pool balance:" }
                        span { class: "field-value", "{values.pool_balance}" }
                    }
                } else {
                    div { class: "placeholder", "Connect to load balances" }
                }
            }

            div {
                class: "panel",
                h3 { class: "panel-title", "Stake" }
                div { class: "wallet-field",
                    label { "Amount:" }
                    input {
                        value: "{amount}",
                        oninput: move |e| amount.set(e.value()),
                        placeholder: "0.0"
                    }
                }
                div { class: "wallet-field",
                    label { "Referrer address (optional flow):" }
                    input {
                        value: "{referrer}",
                        oninput: move |e| referrer.set(e.value()),
                        placeholder: "0x..."
                    }
                }
                div { class: "button-row",
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::Approve),
                        "Approve"
                    }
                    button {
                        class: "action-button primary",
                        onclick: move |_| run.call(Action::Deposit),
                        "Deposit"
                    }
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::DepositWithReferrer),
                        "Deposit with Referrer"
                    }
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::Preview),
                        "Preview"
                    }
                }
                if let Some(values) = preview_values {
                    div { class: "preview-grid",
                        div { class: "field-row",
                            span { class: "field-label", "Valid:" }
                            span { class: "field-value", "{values.valid}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Total fee:" }
                            span { class: "field-value", "{values.total_fee}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Net amount:" }
                            span { class: "field-value", "{values.net_amount}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Duration (s):" }
                            span { class: "field-value", "{values.duration}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Rate (BP):" }
                            span { class: "field-value", "{values.total_rate_bp}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Interest:" }
                            span { class: "field-value", "{values.interest_amount}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Payout:" }
                            span { class: "field-value", "{values.payout_amount}" }
                        }
                    }
                }
            }

            div {
                class: "panel",
                h3 { class: "panel-title", "Withdraw" }
                div { class: "wallet-field",
                    label { "Stake id:" }
                    input {
                        value: "{withdraw_id}",
                        oninput: move |e| withdraw_id.set(e.value()),
                        placeholder: "0"
                    }
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::ManualWithdraw),
                        "Manual Withdraw"
                    }
                }
                div { class: "wallet-field",
                    label { "Press: old stake id / new amount:" }
                    input {
                        value: "{press_old_id}",
                        oninput: move |e| press_old_id.set(e.value()),
                        placeholder: "0"
                    }
                    input {
                        value: "{press_new_amount}",
                        oninput: move |e| press_new_amount.set(e.value()),
                        placeholder: "0.0"
                    }
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::PressWithdraw),
                        "Press Withdraw"
                    }
                }
                div { class: "button-row",
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::ClaimAgent),
                        "Claim Agent Rewards"
                    }
                }
            }

            div {
                class: "panel",
                h3 { class: "panel-title", "Stake Lookup" }
                div { class: "wallet-field",
                    label { "Stake id:" }
                    input {
                        value: "{query_id}",
                        oninput: move |e| query_id.set(e.value()),
                        placeholder: "0"
                    }
                    button {
                        class: "action-button",
                        onclick: move |_| run.call(Action::QueryStake),
                        "Query"
                    }
                }
                if let Some(values) = stake_values {
                    div { class: "stake-detail",
                        div { class: "field-row",
                            span { class: "field-label", "Amount:" }
                            span { class: "field-value", "{values.amount}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Start (unix):" }
                            span { class: "field-value", "{values.start_ts}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Duration (s):" }
                            span { class: "field-value", "{values.duration}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Withdrawn:" }
                            span { class: "field-value", "{values.withdrawn}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Active:" }
                            span { class: "field-value", "{values.active}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Rate (BP):" }
                            span { class: "field-value", "{values.rate_bp}" }
                        }
                        div { class: "field-row",
                            span { class: "field-label", "Interest:" }
                            span { class: "field-value", "{values.interest_amount}" }
                        }
                    }
                }
            }

            LogPanel { entries: log_entries }
        }
    }
}
