//! Balance polling and faucet dispatch for the testnet faucet client.
//!
//! The three moving parts are the `BalanceReader`, which aggregates one view
//! call per asset into a snapshot, the `BalancePoller`, which keeps that
//! snapshot fresh for the connected account, and the `FaucetDispatcher`,
//! which turns a faucet request into a confirmed transaction.

pub mod dispatcher;
pub mod errors;
pub mod metrics;
pub mod poller;
pub mod reader;

// Re-export commonly used types
pub use dispatcher::FaucetDispatcher;
pub use errors::{DispatchError, DispatchResult, ReadError};
pub use poller::{BalancePoller, CacheInvalidator, Invalidator, PollerHandle, MIN_REFRESH_INTERVAL};
pub use reader::BalanceReader;
