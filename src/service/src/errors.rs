//! Error types for the service crate.

use faucet_core::types::{AssetSymbol, TxHash};
use faucet_core::{ClientError, CoreError};
use thiserror::Error;

/// Why a single balance read failed. Never surfaced past the reader.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The view call could not be built.
    #[error("Invalid view request: {0}")]
    Request(#[from] CoreError),

    /// The view call failed.
    #[error("View call failed: {0}")]
    View(#[from] ClientError),

    /// The view call returned something that is not a balance.
    #[error("Malformed balance: {0}")]
    Malformed(String),
}

/// Why a faucet request did not produce a confirmed transaction.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The asset has no route. No wallet or network call was made.
    #[error("Unsupported asset {asset}")]
    UnsupportedAsset {
        /// The requested asset
        asset: AssetSymbol,
        /// Where the asset can be obtained instead
        external_faucet: Option<String>,
    },

    /// The request could not be turned into a payload.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] CoreError),

    /// The wallet rejected or failed to submit the transaction.
    #[error("Submission failed: {0}")]
    Submission(ClientError),

    /// The transaction was submitted but not confirmed.
    #[error("Confirmation of {hash} failed: {source}")]
    Confirmation {
        /// The submitted transaction
        hash: TxHash,
        /// What went wrong while waiting
        source: ClientError,
    },
}

impl DispatchError {
    /// Short label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            DispatchError::UnsupportedAsset { .. } => "unsupported",
            DispatchError::InvalidRequest(_) => "invalid",
            DispatchError::Submission(_) => "submission_failed",
            DispatchError::Confirmation { .. } => "confirmation_failed",
        }
    }
}

/// The outcome of a dispatch: the confirmed transaction hash, or why not.
pub type DispatchResult = Result<TxHash, DispatchError>;
