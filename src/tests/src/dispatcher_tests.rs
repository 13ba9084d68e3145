//! Tests for the faucet dispatcher.

use crate::mocks::{address, CountingInvalidator, Journal, MockNetwork, MockWallet};
use faucet_core::routing::{ArgSlot, CallTarget, Route};
use faucet_core::types::{AssetSymbol, FaucetRequest, MoveValue, TransactionPayload};
use faucet_core::{ClientError, CoreError, Deployment, RoutingTable};
use faucet_service::{DispatchError, FaucetDispatcher};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

struct Harness {
    journal: Journal,
    network: Arc<MockNetwork>,
    wallet: Arc<MockWallet>,
    invalidator: Arc<CountingInvalidator>,
    dispatcher: FaucetDispatcher,
}

impl Harness {
    fn new(routes: RoutingTable) -> Self {
        let journal = Journal::default();
        let network = Arc::new(MockNetwork::new(journal.clone()));
        let wallet = Arc::new(MockWallet::new(Some(address("0xa11ce")), journal.clone()));
        let invalidator = Arc::new(CountingInvalidator::new(journal.clone()));
        let dispatcher = FaucetDispatcher::new(
            Arc::new(routes),
            wallet.clone(),
            network.clone(),
            invalidator.clone(),
        );
        Self {
            journal,
            network,
            wallet,
            invalidator,
            dispatcher,
        }
    }

    fn preset(name: &str) -> Self {
        Self::new(Deployment::preset(name).unwrap().routing_table().unwrap())
    }
}

fn request(asset: &str, recipient: &str, amount: &str) -> FaucetRequest {
    FaucetRequest {
        asset: AssetSymbol::from(asset),
        recipient: address(recipient),
        amount: Decimal::from_str(amount).unwrap(),
    }
}

/// An asset without a route never reaches the wallet.
#[tokio::test]
async fn test_unsupported_asset() {
    let h = Harness::preset("asset-faucet");

    let error = h
        .dispatcher
        .dispatch(&request("USDC", "0xb0b", "1"))
        .await
        .unwrap_err();
    match error {
        DispatchError::UnsupportedAsset {
            asset,
            external_faucet,
        } => {
            assert_eq!(asset.as_str(), "USDC");
            assert_eq!(external_faucet.as_deref(), Some("https://faucet.circle.com/"));
        }
        other => panic!("unexpected error {:?}", other),
    }

    let error = h
        .dispatcher
        .dispatch(&request("DOGE", "0xb0b", "1"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        DispatchError::UnsupportedAsset {
            external_faucet: None,
            ..
        }
    ));

    assert_eq!(h.wallet.calls(), 0);
    assert_eq!(h.network.confirm_calls(), 0);
    assert_eq!(h.invalidator.count(), 0);
}

/// `(recipient, amount)` at 10^6, within the USDt cap.
#[tokio::test]
async fn test_recipient_amount_order() {
    let h = Harness::preset("asset-faucet");

    let hash = h
        .dispatcher
        .dispatch(&request("USDt", "0xb0b", "7.5"))
        .await
        .unwrap();
    assert!(hash.0.starts_with("0x"));

    let payloads = h.wallet.payloads();
    assert_eq!(payloads.len(), 1);
    match &payloads[0] {
        TransactionPayload::EntryFunction {
            function,
            type_arguments,
            arguments,
        } => {
            assert!(function.to_string().ends_with("::usdt::faucet_to_address"));
            assert!(type_arguments.is_empty());
            assert_eq!(
                arguments,
                &vec![
                    MoveValue::Address(address("0xb0b")),
                    MoveValue::U64(7_500_000),
                ]
            );
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

/// `(asset, amount, recipient)` at 10^6.
#[tokio::test]
async fn test_asset_amount_recipient_order() {
    let h = Harness::preset("asset-faucet");

    h.dispatcher
        .dispatch(&request("sUSDe", "0xb0b", "3"))
        .await
        .unwrap();

    let payloads = h.wallet.payloads();
    assert_eq!(
        payloads[0].arguments(),
        &[
            MoveValue::String("sUSDe".to_string()),
            MoveValue::U64(3_000_000),
            MoveValue::Address(address("0xb0b")),
        ]
    );
}

/// Fractional amounts scale exactly on an uncapped 10^6 route.
#[tokio::test]
async fn test_fractional_amount_scale() {
    let route = Route {
        symbol: AssetSymbol::from("USDt"),
        target: CallTarget::EntryFunction {
            function: "0xcafe::usdt::faucet_to_address".parse().unwrap(),
        },
        type_arguments: vec![],
        arguments: vec![ArgSlot::Recipient, ArgSlot::Amount],
        scale: 6,
        max_amount: None,
    };
    let h = Harness::new(RoutingTable::new(vec![route]).unwrap());

    h.dispatcher
        .dispatch(&request("USDt", "0xb0b", "10.5"))
        .await
        .unwrap();
    assert_eq!(
        h.wallet.payloads()[0].arguments(),
        &[
            MoveValue::Address(address("0xb0b")),
            MoveValue::U64(10_500_000),
        ]
    );
}

/// A native asset route at 10^8.
#[tokio::test]
async fn test_native_scale() {
    let route = Route {
        symbol: AssetSymbol::from("APT"),
        target: CallTarget::EntryFunction {
            function: "0x1::aptos_account::transfer".parse().unwrap(),
        },
        type_arguments: vec![],
        arguments: vec![ArgSlot::Recipient, ArgSlot::Amount],
        scale: 8,
        max_amount: None,
    };
    let h = Harness::new(RoutingTable::new(vec![route]).unwrap());

    h.dispatcher
        .dispatch(&request("APT", "0xb0b", "1"))
        .await
        .unwrap();
    assert_eq!(h.wallet.payloads()[0].arguments()[1], MoveValue::U64(100_000_000));
}

/// Script routes carry the bytecode instead of a function.
#[tokio::test]
async fn test_script_route() {
    let h = Harness::preset("wallet-tester");

    h.dispatcher
        .dispatch(&request("APT", "0xb0b", "0.25"))
        .await
        .unwrap();

    match &h.wallet.payloads()[0] {
        TransactionPayload::Script {
            code, arguments, ..
        } => {
            assert!(code.bytecode.starts_with("0xa11ceb0b"));
            assert_eq!(
                arguments,
                &vec![MoveValue::Address(address("0xb0b")), MoveValue::U64(250_000)]
            );
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

/// Submit, confirm and invalidate happen once each, in that order.
#[tokio::test]
async fn test_success_invalidates_once() {
    let h = Harness::preset("test-app");

    let hash = h
        .dispatcher
        .dispatch(&request("TFA", "0xa11ce", "100"))
        .await
        .unwrap();

    assert_eq!(hash.0, format!("0x{:064x}", 1));
    assert_eq!(h.invalidator.count(), 1);
    assert_eq!(h.journal.events(), vec!["submit", "confirm", "invalidate"]);
}

/// Requests the route cannot encode never reach the wallet.
#[tokio::test]
async fn test_invalid_amounts() {
    let h = Harness::preset("asset-faucet");

    for amount in ["0", "-1", "10.0000001", "11"] {
        let error = h
            .dispatcher
            .dispatch(&request("USDt", "0xb0b", amount))
            .await
            .unwrap_err();
        assert!(
            matches!(error, DispatchError::InvalidRequest(_)),
            "amount {} gave {:?}",
            amount,
            error
        );
    }

    let error = h
        .dispatcher
        .dispatch(&request("USDt", "0xb0b", "1.1234567"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        DispatchError::InvalidRequest(CoreError::TooManyDecimals { scale: 6, .. })
    ));

    assert_eq!(h.wallet.calls(), 0);
    assert_eq!(h.invalidator.count(), 0);
}

/// A rejected submission is not confirmed and does not invalidate.
#[tokio::test]
async fn test_submission_failure() {
    let h = Harness::preset("asset-faucet");
    h.wallet
        .fail_submission(ClientError::Rejected("user declined".to_string()));

    let error = h
        .dispatcher
        .dispatch(&request("USDt", "0xb0b", "1"))
        .await
        .unwrap_err();

    assert!(matches!(error, DispatchError::Submission(ClientError::Rejected(_))));
    assert_eq!(h.wallet.calls(), 1);
    assert_eq!(h.network.confirm_calls(), 0);
    assert_eq!(h.invalidator.count(), 0);
}

/// A failed confirmation keeps the hash and does not invalidate.
#[tokio::test]
async fn test_confirmation_failure() {
    let h = Harness::preset("asset-faucet");
    h.network
        .fail_confirmation(ClientError::Rejected("Move abort".to_string()));

    let error = h
        .dispatcher
        .dispatch(&request("USDe", "0xb0b", "2"))
        .await
        .unwrap_err();

    match error {
        DispatchError::Confirmation { hash, .. } => assert!(hash.0.starts_with("0x")),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(h.journal.events(), vec!["submit", "confirm"]);
    assert_eq!(h.invalidator.count(), 0);
}

/// Consecutive requests are independent.
#[tokio::test]
async fn test_sequential_requests() {
    let h = Harness::preset("test-app");

    h.dispatcher
        .dispatch(&request("TFC", "0xb0b", "1"))
        .await
        .unwrap();
    h.wallet
        .fail_submission(ClientError::Transport("signer down".to_string()));
    assert!(h
        .dispatcher
        .dispatch(&request("TFC", "0xb0b", "1"))
        .await
        .is_err());

    assert_eq!(h.wallet.calls(), 2);
    assert_eq!(h.invalidator.count(), 1);
}
