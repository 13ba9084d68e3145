//! Mint command for the faucet CLI.

use crate::errors::CliError;
use crate::form::FaucetForm;
use crate::notify::Notification;
use crate::wallet::Session;
use faucet_core::format_units;
use faucet_core::types::{BalanceSnapshot, FaucetRequest};
use faucet_service::{BalancePoller, DispatchResult, FaucetDispatcher, PollerHandle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// How long to wait for the refreshed balance after a successful mint.
const REFRESH_WAIT: Duration = Duration::from_secs(10);

/// What a mint attempt produced.
pub struct MintReport {
    /// What to show the user
    pub notification: Notification,
    /// The transaction hash or the reason the mint failed
    pub result: DispatchResult,
    /// The new balance of the minted asset, when the recipient is the
    /// connected account
    pub balance: Option<String>,
}

/// Runs the mint command.
///
/// The form is validated first; an invalid form never reaches the
/// dispatcher. The dispatcher invalidates a poller on the connected
/// account, so a successful mint is followed by a fresh balance read.
pub async fn run(session: &Session, form: &FaucetForm) -> Result<MintReport, CliError> {
    let connected = session.account();
    let request = form.validate(connected.as_ref())?;
    info!(
        "Requesting {} {} for {}",
        request.amount, request.asset, request.recipient
    );

    let poller = BalancePoller::new(Arc::new(session.reader()))
        .interval(session.config.poll_interval())
        .account(connected)
        .spawn();

    let dispatcher = FaucetDispatcher::new(
        Arc::new(session.routing_table()?),
        session.wallet_client(),
        session.network_client(),
        Arc::new(poller.invalidator()),
    );

    let before = poller.generation();
    let result = dispatcher.dispatch(&request).await;
    let notification = Notification::from_dispatch(&result);

    let minted_to_self = poller.current_account().as_ref() == Some(&request.recipient);
    let balance = match &result {
        Ok(_) if minted_to_self => wait_for_refresh(&poller, before)
            .await
            .and_then(|snapshot| render_balance(session, &request, &snapshot)),
        _ => None,
    };

    poller.shutdown().await;
    Ok(MintReport {
        notification,
        result,
        balance,
    })
}

/// Waits for a snapshot read after the dispatcher's invalidation.
async fn wait_for_refresh(poller: &PollerHandle, before: u64) -> Option<Arc<BalanceSnapshot>> {
    match tokio::time::timeout(REFRESH_WAIT, poller.refreshed_after(before)).await {
        Ok(snapshot) => Some(snapshot),
        Err(_) => {
            debug!("No refreshed balance within {:?}", REFRESH_WAIT);
            None
        }
    }
}

/// Formats the minted asset's balance, if the snapshot belongs to the
/// recipient.
fn render_balance(
    session: &Session,
    request: &FaucetRequest,
    snapshot: &BalanceSnapshot,
) -> Option<String> {
    if snapshot.account != request.recipient {
        return None;
    }
    let asset = session.deployment.asset(request.asset.as_str())?;
    Some(format!(
        "{} {}",
        format_units(snapshot.get(asset.symbol.as_str()), asset.decimals),
        asset.symbol
    ))
}
