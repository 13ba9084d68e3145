//! Core primitives for the testnet faucet client.
//!
//! This crate provides the data model shared by every other crate: account
//! addresses, balance sources and snapshots, the static routing table that maps
//! an asset symbol to an on-chain faucet call, amount scaling, the built-in
//! deployments and the collaborator traits for the wallet and the network.

pub mod amount;
pub mod client;
pub mod deployment;
pub mod errors;
pub mod routing;
pub mod types;

// Re-export commonly used types
pub use amount::{format_units, scale_amount};
pub use client::{NetworkClient, WalletClient};
pub use deployment::Deployment;
pub use errors::{ClientError, CoreError};
pub use routing::{ArgSlot, CallTarget, Route, RoutingTable};
pub use types::{
    AccountAddress, AssetDescriptor, AssetSymbol, Balance, BalanceSnapshot, FaucetRequest,
    TrackedAsset, TxHash,
};
