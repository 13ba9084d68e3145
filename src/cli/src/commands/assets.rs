//! Asset selector for the faucet CLI.

use crate::errors::CliError;
use crate::wallet::Session;
use colored::Colorize;
use faucet_core::routing::CallTarget;
use faucet_core::types::BalanceSnapshot;
use faucet_core::{format_units, Deployment, RoutingTable};

/// Renders one entry per tracked asset: balance, decimals and how to get more.
pub fn render(
    deployment: &Deployment,
    routes: &RoutingTable,
    snapshot: Option<&BalanceSnapshot>,
) -> Vec<String> {
    deployment
        .assets
        .iter()
        .map(|asset| {
            let symbol = asset.symbol.as_str();
            let balance = snapshot
                .map(|s| format_units(s.get(symbol), asset.decimals))
                .unwrap_or_else(|| "-".to_string());

            let source = match routes.resolve(symbol) {
                Ok(route) => {
                    let target = match &route.target {
                        CallTarget::EntryFunction { function } => function.to_string(),
                        CallTarget::Script { .. } => "script".to_string(),
                    };
                    match &route.max_amount {
                        Some(max) => format!("mint via {} (max {})", target, max),
                        None => format!("mint via {}", target),
                    }
                }
                Err(missing) => match missing.external_faucet {
                    Some(url) => format!("external faucet {}", url),
                    None => "not mintable".to_string(),
                },
            };

            format!(
                "{}  {:<20} decimals {:<2}  {}",
                format!("{:>8}", symbol).bold(),
                balance,
                asset.decimals,
                source
            )
        })
        .collect()
}

/// Runs the assets command. Balances are shown when an account is connected.
pub async fn run(session: &Session) -> Result<Vec<String>, CliError> {
    let routes = session.routing_table()?;
    let snapshot = match session.account() {
        Some(account) => Some(session.reader().read(&account).await),
        None => None,
    };
    Ok(render(&session.deployment, &routes, snapshot.as_ref()))
}
