//! Balance command for the faucet CLI.

use crate::errors::CliError;
use crate::wallet::Session;
use colored::Colorize;
use faucet_core::types::BalanceSnapshot;
use faucet_core::{format_units, Deployment};
use tracing::info;

/// Renders one line per tracked asset, in deployment order.
pub fn render(deployment: &Deployment, snapshot: &BalanceSnapshot) -> Vec<String> {
    deployment
        .assets
        .iter()
        .map(|asset| {
            let symbol = asset.symbol.as_str();
            let amount = format_units(snapshot.get(symbol), asset.decimals);
            if snapshot.is_unavailable(symbol) {
                format!("{:>8} {} {}", symbol, amount, "(unavailable)".yellow())
            } else {
                format!("{:>8} {}", symbol, amount)
            }
        })
        .collect()
}

/// Runs the balance command.
pub async fn run(session: &Session, account: Option<&str>) -> Result<BalanceSnapshot, CliError> {
    let account = session.account_or_connected(account)?;
    info!("Reading balances of {}", account);

    let snapshot = session.reader().read(&account).await;
    Ok(snapshot)
}
