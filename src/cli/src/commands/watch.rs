//! Watch command for the faucet CLI.

use crate::commands::balance;
use crate::errors::CliError;
use crate::wallet::Session;
use colored::Colorize;
use faucet_service::metrics::start_metrics_server;
use faucet_service::BalancePoller;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs the watch command: polls balances and prints every new snapshot
/// until Ctrl-C.
pub async fn run(
    session: &Session,
    account: Option<&str>,
    metrics_addr: Option<SocketAddr>,
) -> Result<(), CliError> {
    let account = session.account_or_connected(account)?;

    if let Some(addr) = metrics_addr {
        if let Err(e) = start_metrics_server(addr).await {
            warn!("Metrics server not started: {}", e);
        }
    }

    let poller = BalancePoller::new(Arc::new(session.reader()))
        .interval(session.config.poll_interval())
        .account(Some(account.clone()))
        .spawn();
    let mut updates = poller.subscribe();

    println!("{} {}", "Watching".green(), account);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("Balance poller stopped unexpectedly");
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    println!();
                    for line in balance::render(&session.deployment, &snapshot) {
                        println!("{}", line);
                    }
                }
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}
