//! Error types for the faucet CLI.

use crate::form::FormError;
use faucet_core::CoreError;
use faucet_network::NetworkError;
use faucet_service::DispatchError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the faucet CLI.
#[derive(Debug)]
pub enum CliError {
    /// Error when a file operation fails.
    FileError(std::io::Error),

    /// Error when the configuration or deployment is invalid.
    ConfigError(CoreError),

    /// Error when talking to the node or signer fails.
    NetworkError(NetworkError),

    /// Error when the form does not validate.
    FormError(FormError),

    /// Error when a faucet request fails.
    DispatchError(DispatchError),

    /// Error when no account is connected and none was given.
    NotConnected,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileError(e) => write!(f, "File error: {}", e),
            CliError::ConfigError(e) => write!(f, "Configuration error: {}", e),
            CliError::NetworkError(e) => write!(f, "Network error: {}", e),
            CliError::FormError(e) => write!(f, "{}", e),
            CliError::DispatchError(e) => write!(f, "{}", e),
            CliError::NotConnected => {
                write!(f, "No account connected: pass --account or start the signer")
            }
        }
    }
}

impl StdError for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::FileError(error)
    }
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        CliError::ConfigError(error)
    }
}

impl From<NetworkError> for CliError {
    fn from(error: NetworkError) -> Self {
        CliError::NetworkError(error)
    }
}

impl From<FormError> for CliError {
    fn from(error: FormError) -> Self {
        CliError::FormError(error)
    }
}

impl From<DispatchError> for CliError {
    fn from(error: DispatchError) -> Self {
        CliError::DispatchError(error)
    }
}
