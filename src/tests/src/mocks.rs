//! In-memory collaborators for the integration tests.

use async_trait::async_trait;
use faucet_core::deployment::{balance_view_request, FaViewLayout};
use faucet_core::types::{
    AccountAddress, Balance, ConfirmedTransaction, PendingTransaction, TrackedAsset,
    TransactionPayload, TxHash, ViewRequest,
};
use faucet_core::{ClientError, NetworkClient, WalletClient};
use faucet_service::CacheInvalidator;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Ordered log of collaborator calls shared by the mocks.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<&'static str>>>);

impl Journal {
    pub fn record(&self, event: &'static str) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

fn view_key(request: &ViewRequest) -> String {
    serde_json::to_string(request).unwrap()
}

/// A node whose view results and confirmations are scripted per test.
#[derive(Default)]
pub struct MockNetwork {
    views: Mutex<HashMap<String, Result<Vec<serde_json::Value>, ClientError>>>,
    requests: Mutex<Vec<ViewRequest>>,
    view_delay: Mutex<Duration>,
    confirmation: Mutex<Option<ClientError>>,
    view_calls: AtomicUsize,
    confirm_calls: AtomicUsize,
    journal: Journal,
}

impl MockNetwork {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Default::default()
        }
    }

    /// Scripts the balance of `asset` for `account`.
    pub fn set_balance(
        &self,
        asset: &TrackedAsset,
        layout: FaViewLayout,
        account: &AccountAddress,
        balance: Balance,
    ) {
        self.set_view(
            asset,
            layout,
            account,
            Ok(vec![serde_json::json!(balance.to_string())]),
        );
    }

    /// Scripts the raw result of the balance view of `asset` for `account`.
    pub fn set_view(
        &self,
        asset: &TrackedAsset,
        layout: FaViewLayout,
        account: &AccountAddress,
        result: Result<Vec<serde_json::Value>, ClientError>,
    ) {
        let request = balance_view_request(&asset.source, layout, account).unwrap();
        self.views.lock().unwrap().insert(view_key(&request), result);
    }

    /// Makes every view call take `delay`.
    pub fn set_view_delay(&self, delay: Duration) {
        *self.view_delay.lock().unwrap() = delay;
    }

    /// Makes `wait_for_transaction` fail with `error`.
    pub fn fail_confirmation(&self, error: ClientError) {
        *self.confirmation.lock().unwrap() = Some(error);
    }

    pub fn view_calls(&self) -> usize {
        self.view_calls.load(Ordering::SeqCst)
    }

    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ViewRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkClient for MockNetwork {
    async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>, ClientError> {
        self.view_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        // answer from the ledger as it was when the request arrived
        let answer = self
            .views
            .lock()
            .unwrap()
            .get(&view_key(request))
            .cloned()
            .unwrap_or_else(|| Ok(vec![serde_json::json!("0")]));

        let delay = *self.view_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        answer
    }

    async fn wait_for_transaction(&self, hash: &TxHash) -> Result<ConfirmedTransaction, ClientError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        self.journal.record("confirm");

        if let Some(error) = self.confirmation.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(ConfirmedTransaction {
            hash: hash.clone(),
            version: 42,
            success: true,
            vm_status: "Executed successfully".to_string(),
        })
    }
}

/// A wallet that records what it is asked to sign.
pub struct MockWallet {
    account: Mutex<Option<AccountAddress>>,
    payloads: Mutex<Vec<TransactionPayload>>,
    failure: Mutex<Option<ClientError>>,
    calls: AtomicUsize,
    journal: Journal,
}

impl MockWallet {
    pub fn new(account: Option<AccountAddress>, journal: Journal) -> Self {
        Self {
            account: Mutex::new(account),
            payloads: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
            journal,
        }
    }

    /// Makes submission fail with `error`.
    pub fn fail_submission(&self, error: ClientError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<TransactionPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletClient for MockWallet {
    fn account(&self) -> Option<AccountAddress> {
        self.account.lock().unwrap().clone()
    }

    async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<PendingTransaction, ClientError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.record("submit");
        self.payloads.lock().unwrap().push(payload.clone());

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(PendingTransaction {
            hash: TxHash(format!("0x{:064x}", call + 1)),
        })
    }
}

/// Counts invalidations.
#[derive(Default)]
pub struct CountingInvalidator {
    count: AtomicUsize,
    journal: Journal,
}

impl CountingInvalidator {
    pub fn new(journal: Journal) -> Self {
        Self {
            count: AtomicUsize::new(0),
            journal,
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl CacheInvalidator for CountingInvalidator {
    fn invalidate(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.journal.record("invalidate");
    }
}

pub fn address(s: &str) -> AccountAddress {
    s.parse().unwrap()
}
