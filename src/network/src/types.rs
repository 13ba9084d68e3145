//! Wire types for the node REST API and the signer API.

use crate::errors::NetworkError;
use faucet_core::types::{AccountAddress, ConfirmedTransaction, TransactionPayload, TxHash};
use serde::{Deserialize, Serialize};

/// Transaction type the node reports while a transaction is in the mempool.
pub const PENDING_TRANSACTION: &str = "pending_transaction";

/// Error body returned by the node on non-success statuses.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Human readable message
    pub message: String,
    /// Machine readable error code
    #[serde(default)]
    pub error_code: Option<String>,
    /// Move VM error code, if the error came from execution
    #[serde(default)]
    pub vm_error_code: Option<u64>,
}

/// A transaction as returned by `GET /transactions/by_hash/{hash}`.
#[derive(Clone, Debug, Deserialize)]
pub struct TransactionResponse {
    /// `pending_transaction`, `user_transaction`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// The transaction hash
    pub hash: String,
    /// Ledger version, present once committed
    #[serde(default)]
    pub version: Option<String>,
    /// Execution result, present once committed
    #[serde(default)]
    pub success: Option<bool>,
    /// VM status message, present once committed
    #[serde(default)]
    pub vm_status: Option<String>,
}

/// Where a transaction stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Not yet known to the node, or still in the mempool
    Pending,
    /// Committed to the ledger, successfully or not
    Committed(ConfirmedTransaction),
}

impl TransactionResponse {
    /// Interprets the response.
    pub fn into_status(self) -> Result<TransactionStatus, NetworkError> {
        if self.kind == PENDING_TRANSACTION {
            return Ok(TransactionStatus::Pending);
        }

        let version = self
            .version
            .as_deref()
            .ok_or_else(|| {
                NetworkError::InvalidResponse(format!("committed transaction {} has no version", self.hash))
            })?
            .parse::<u64>()
            .map_err(|e| NetworkError::InvalidResponse(format!("invalid version: {}", e)))?;

        Ok(TransactionStatus::Committed(ConfirmedTransaction {
            hash: TxHash(self.hash),
            version,
            success: self.success.unwrap_or(false),
            vm_status: self.vm_status.unwrap_or_default(),
        }))
    }
}

/// Body of `POST /sign_and_submit` on the signer.
#[derive(Debug, Serialize)]
pub struct SignAndSubmitRequest<'a> {
    /// The account that signs
    pub sender: &'a AccountAddress,
    /// What to sign
    pub payload: &'a TransactionPayload,
}

/// Response of `POST /sign_and_submit` on the signer.
#[derive(Clone, Debug, Deserialize)]
pub struct SignAndSubmitResponse {
    /// Hash of the submitted transaction
    pub hash: String,
}

/// Response of `GET /account` on the signer.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountResponse {
    /// The connected account
    pub address: AccountAddress,
}
