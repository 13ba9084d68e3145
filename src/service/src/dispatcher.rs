//! Faucet dispatcher: route lookup, payload construction, submission,
//! confirmation and cache invalidation, in that order.

use crate::errors::{DispatchError, DispatchResult};
use crate::metrics::{DISPATCH_COUNTER, DISPATCH_TIME};
use crate::poller::CacheInvalidator;
use faucet_core::types::FaucetRequest;
use faucet_core::{NetworkClient, RoutingTable, WalletClient};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Turns faucet requests into confirmed transactions.
///
/// There are no retries. A failure at any step ends the request and leaves
/// the balance cache alone.
#[derive(Clone)]
pub struct FaucetDispatcher {
    routes: Arc<RoutingTable>,
    wallet: Arc<dyn WalletClient>,
    network: Arc<dyn NetworkClient>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl FaucetDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        routes: Arc<RoutingTable>,
        wallet: Arc<dyn WalletClient>,
        network: Arc<dyn NetworkClient>,
        invalidator: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            routes,
            wallet,
            network,
            invalidator,
        }
    }

    /// Returns the routing table.
    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Dispatches one request and records its outcome.
    #[instrument(skip(self, request), fields(asset = %request.asset, recipient = %request.recipient, amount = %request.amount))]
    pub async fn dispatch(&self, request: &FaucetRequest) -> DispatchResult {
        let result = self.execute(request).await;
        let outcome = match &result {
            Ok(hash) => {
                info!("Faucet transaction {} confirmed", hash);
                "success"
            }
            Err(e) => {
                warn!("Faucet request failed: {}", e);
                e.outcome()
            }
        };
        DISPATCH_COUNTER.with_label_values(&[outcome]).inc();
        result
    }

    async fn execute(&self, request: &FaucetRequest) -> DispatchResult {
        let route = self
            .routes
            .resolve(request.asset.as_str())
            .map_err(|missing| DispatchError::UnsupportedAsset {
                asset: missing.symbol,
                external_faucet: missing.external_faucet,
            })?;

        let payload = route.build_payload(request)?;
        debug!("Built payload {:?}", payload);

        // only confirmed transactions are timed
        let timer = DISPATCH_TIME.start_timer();
        let pending = match self.wallet.sign_and_submit_transaction(&payload).await {
            Ok(pending) => pending,
            Err(e) => {
                timer.stop_and_discard();
                return Err(DispatchError::Submission(e));
            }
        };
        info!("Submitted faucet transaction {}", pending.hash);

        let confirmed = match self.network.wait_for_transaction(&pending.hash).await {
            Ok(confirmed) => confirmed,
            Err(source) => {
                timer.stop_and_discard();
                return Err(DispatchError::Confirmation {
                    hash: pending.hash,
                    source,
                });
            }
        };
        timer.observe_duration();

        self.invalidator.invalidate();
        Ok(confirmed.hash)
    }
}
