//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error when an account address is not `0x` followed by 1 to 64 hex digits.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when an amount cannot be parsed or is not strictly positive.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Error when an amount has more fractional digits than the asset allows.
    #[error("Amount {amount} has more than {scale} decimal places")]
    TooManyDecimals {
        /// The amount as entered
        amount: String,
        /// The scale of the asset
        scale: u32,
    },

    /// Error when a scaled amount does not fit the on-chain integer type.
    #[error("Amount {0} overflows the on-chain amount type")]
    AmountOverflow(String),

    /// Error when an amount exceeds the per-request maximum of a route.
    #[error("Amount {amount} exceeds the maximum of {max} per request")]
    AmountAboveMax {
        /// The amount as entered
        amount: String,
        /// The maximum accepted amount
        max: String,
    },

    /// Error when a Move function identifier is malformed.
    #[error("Invalid function id: {0}")]
    InvalidFunctionId(String),

    /// Error when the routing table fails validation.
    #[error("Invalid route for {symbol}: {reason}")]
    InvalidRoute {
        /// The asset symbol of the route
        symbol: String,
        /// Why the route was rejected
        reason: String,
    },

    /// Error when two routes or assets share a symbol.
    #[error("Duplicate asset symbol: {0}")]
    DuplicateSymbol(String),

    /// Error when a deployment preset or file cannot be loaded.
    #[error("Deployment error: {0}")]
    DeploymentError(String),
}

/// Errors reported by the wallet and network collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never reached the remote side or the connection failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote side answered with an error.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The response could not be interpreted.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Waiting for a result took longer than allowed.
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// No wallet account is connected.
    #[error("Wallet not connected")]
    NotConnected,
}
