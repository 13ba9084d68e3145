//! Network layer for the testnet faucet client.
//!
//! This crate talks HTTP: `RestClient` runs view functions and waits for
//! transactions against a node's REST API, and `HttpWalletClient` hands
//! payloads to an external signer that owns the user's keys.

pub mod errors;
pub mod rest;
pub mod types;
pub mod wallet;

// Re-export commonly used types and functions
pub use errors::NetworkError;
pub use rest::RestClient;
pub use wallet::HttpWalletClient;
