//! Integration tests for the testnet faucet client.

pub mod mocks;

pub mod cli_tests;
pub mod dispatcher_tests;
