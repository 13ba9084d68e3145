//! Command line front-end for the testnet faucet client.

pub mod commands;
pub mod config;
pub mod errors;
pub mod form;
pub mod notify;
pub mod wallet;

// Re-export commonly used types and functions
pub use commands::{assets, balance, mint, watch};
pub use config::CliConfig;
pub use errors::CliError;
pub use form::{FaucetForm, FormError};
pub use notify::Notification;
pub use wallet::Session;
