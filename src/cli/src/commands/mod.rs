//! Commands for the faucet CLI.

pub mod assets;
pub mod balance;
pub mod mint;
pub mod watch;
