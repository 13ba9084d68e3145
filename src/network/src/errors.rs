//! Error types for the network crate.

use faucet_core::ClientError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the network crate.
#[derive(Debug)]
pub enum NetworkError {
    /// Error when the HTTP request itself fails.
    HttpError(String),

    /// Error when the remote API answers with a non-success status.
    ApiError {
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// Error when a response body cannot be interpreted.
    InvalidResponse(String),

    /// Error when a committed transaction did not execute successfully.
    TransactionFailed(String),

    /// Error when a timeout occurs.
    Timeout(String),

    /// Error when no wallet account is connected.
    NotConnected,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            NetworkError::ApiError { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            NetworkError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            NetworkError::TransactionFailed(msg) => write!(f, "Transaction failed: {}", msg),
            NetworkError::Timeout(msg) => write!(f, "Timeout waiting for {}", msg),
            NetworkError::NotConnected => write!(f, "Wallet not connected"),
        }
    }
}

impl StdError for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            NetworkError::InvalidResponse(error.to_string())
        } else {
            NetworkError::HttpError(error.to_string())
        }
    }
}

impl From<NetworkError> for ClientError {
    fn from(error: NetworkError) -> Self {
        match error {
            NetworkError::HttpError(msg) => ClientError::Transport(msg),
            NetworkError::ApiError { status, message } => {
                ClientError::Rejected(format!("{} ({})", message, status))
            }
            NetworkError::InvalidResponse(msg) => ClientError::Malformed(msg),
            NetworkError::TransactionFailed(msg) => ClientError::Rejected(msg),
            NetworkError::Timeout(msg) => ClientError::Timeout(msg),
            NetworkError::NotConnected => ClientError::NotConnected,
        }
    }
}
