//! Balance reader: one view call per tracked asset, folded into a snapshot.

use crate::errors::ReadError;
use crate::metrics::READ_FAILURE_COUNTER;
use faucet_core::deployment::{balance_view_request, FaViewLayout};
use faucet_core::types::{AccountAddress, Balance, BalanceSnapshot, TrackedAsset};
use faucet_core::{Deployment, NetworkClient};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Extracts the balance from the first result of a balance view.
///
/// The node returns u64 and u128 results as decimal strings, but plain JSON
/// numbers are accepted too.
pub fn parse_balance(values: &[serde_json::Value]) -> Result<Balance, ReadError> {
    let first = values
        .first()
        .ok_or_else(|| ReadError::Malformed("view returned no results".to_string()))?;

    match first {
        serde_json::Value::String(s) => s
            .parse::<Balance>()
            .map_err(|e| ReadError::Malformed(format!("{}: {}", s, e))),
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(Balance::from)
            .ok_or_else(|| ReadError::Malformed(format!("{} is not an unsigned integer", n))),
        other => Err(ReadError::Malformed(format!("unexpected result {}", other))),
    }
}

/// Reads the balances of a fixed set of assets.
#[derive(Clone)]
pub struct BalanceReader {
    network: Arc<dyn NetworkClient>,
    assets: Vec<TrackedAsset>,
    fa_view: FaViewLayout,
}

impl BalanceReader {
    /// Creates a reader for `assets`.
    pub fn new(network: Arc<dyn NetworkClient>, assets: Vec<TrackedAsset>, fa_view: FaViewLayout) -> Self {
        Self {
            network,
            assets,
            fa_view,
        }
    }

    /// Creates a reader for every asset of a deployment.
    pub fn from_deployment(network: Arc<dyn NetworkClient>, deployment: &Deployment) -> Self {
        Self::new(network, deployment.assets.clone(), deployment.fa_view)
    }

    /// Returns the assets this reader covers.
    pub fn assets(&self) -> &[TrackedAsset] {
        &self.assets
    }

    /// Reads one asset.
    pub async fn read_asset(
        &self,
        asset: &TrackedAsset,
        account: &AccountAddress,
    ) -> Result<Balance, ReadError> {
        let request = balance_view_request(&asset.source, self.fa_view, account)?;
        let values = self.network.view(&request).await?;
        parse_balance(&values)
    }

    /// Reads every asset concurrently. A failed read counts as zero and is
    /// listed as unavailable in the snapshot; it never fails the batch.
    pub async fn read(&self, account: &AccountAddress) -> BalanceSnapshot {
        let reads = self.assets.iter().map(|asset| async move {
            let reading = match self.read_asset(asset, account).await {
                Ok(amount) => Some(amount),
                Err(e) => {
                    warn!("Balance read for {} of {} failed: {}", asset.symbol, account, e);
                    READ_FAILURE_COUNTER
                        .with_label_values(&[asset.symbol.as_str()])
                        .inc();
                    None
                }
            };
            (asset.symbol.clone(), reading)
        });

        let readings = join_all(reads).await;
        debug!("Read {} balances for {}", readings.len(), account);
        BalanceSnapshot::from_readings(account.clone(), readings)
    }
}
