//! Collaborator traits for the wallet and the network.
//!
//! Signing, submission and finality live behind these traits. The service
//! crate only ever holds them as `Arc<dyn ...>` so tests can swap in mocks.

use crate::errors::ClientError;
use crate::types::{
    AccountAddress, ConfirmedTransaction, PendingTransaction, TransactionPayload, TxHash,
    ViewRequest,
};
use async_trait::async_trait;

/// Read access to the network.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Runs a read-only view function and returns its results.
    async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>, ClientError>;

    /// Waits until a submitted transaction is committed.
    ///
    /// Returns an error if waiting times out or the transaction did not
    /// execute successfully.
    async fn wait_for_transaction(&self, hash: &TxHash)
        -> Result<ConfirmedTransaction, ClientError>;
}

/// The wallet that owns the user's keys.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Returns the connected account, if any.
    fn account(&self) -> Option<AccountAddress>;

    /// Signs the payload and submits it to the network.
    async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<PendingTransaction, ClientError>;
}
