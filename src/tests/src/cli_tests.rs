//! Tests for the command line shell.

use faucet_cli::commands::{balance, mint};
use faucet_cli::{CliConfig, CliError, FaucetForm, FormError, Notification, Session};
use faucet_service::DispatchError;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::time::sleep;
use warp::Filter;

// Nothing listens on the discard port, so any request fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

// Long enough for the poller's first read to still be running when the
// mint confirms.
const READ_TIME: Duration = Duration::from_millis(200);
const MINTED: u64 = 1_000_000;

/// Serves a node and a signer on one ephemeral port.
///
/// Every balance view answers with the ledger as it was when the request
/// arrived. Submitting any transaction sets the ledger to `MINTED`, and every
/// transaction is committed as soon as it is looked up.
fn fake_chain() -> SocketAddr {
    let ledger = Arc::new(AtomicU64::new(0));

    let reads = ledger.clone();
    let view = warp::path!("v1" / "view")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |_body: serde_json::Value| {
            let balance = reads.load(Ordering::SeqCst);
            async move {
                sleep(READ_TIME).await;
                Ok::<_, warp::Rejection>(warp::reply::json(&json!([balance.to_string()])))
            }
        });
    let submit = warp::path!("v1" / "sign_and_submit")
        .and(warp::post())
        .and(warp::body::json())
        .map(move |body: serde_json::Value| {
            assert_eq!(body["sender"], "0xa11ce");
            ledger.store(MINTED, Ordering::SeqCst);
            warp::reply::json(&json!({ "hash": "0xfeed" }))
        });
    let transaction = warp::path!("v1" / "transactions" / "by_hash" / String)
        .and(warp::get())
        .map(|hash: String| {
            warp::reply::json(&json!({
                "type": "user_transaction",
                "hash": hash,
                "version": "42",
                "success": true,
                "vm_status": "Executed successfully",
            }))
        });

    let (addr, server) =
        warp::serve(view.or(submit).or(transaction)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

async fn fake_chain_session() -> Session {
    let url = format!("http://{}", fake_chain());
    let config = CliConfig {
        node: url.clone(),
        signer: url,
        account: Some("0xa11ce".to_string()),
        deployment: "test-app".to_string(),
        ..CliConfig::default()
    };
    Session::open(config).await.unwrap()
}

fn config(account: Option<&str>) -> CliConfig {
    CliConfig {
        node: UNREACHABLE.to_string(),
        signer: UNREACHABLE.to_string(),
        account: account.map(str::to_string),
        ..CliConfig::default()
    }
}

/// A configured account connects without asking the signer.
#[tokio::test]
async fn test_session_uses_configured_account() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    config(Some("0xA11CE")).to_file(&path).unwrap();

    let session = Session::open(CliConfig::from_file(&path).unwrap())
        .await
        .unwrap();
    assert_eq!(session.account().unwrap().as_str(), "0xa11ce");
    assert_eq!(session.deployment.name, "asset-faucet");
}

/// Without an account and without a signer the session is disconnected.
#[tokio::test]
async fn test_disconnected_session() {
    let session = Session::open(config(None)).await.unwrap();
    assert!(session.account().is_none());

    let error = balance::run(&session, None).await.unwrap_err();
    assert!(matches!(error, CliError::NotConnected));

    let form = FaucetForm::new("USDt", "0xb0b", "1");
    let error = mint::run(&session, &form).await.err().unwrap();
    assert!(matches!(error, CliError::FormError(FormError::NotConnected)));
}

/// Invalid forms are rejected before anything is dispatched.
#[tokio::test]
async fn test_invalid_form_is_not_dispatched() {
    let session = Session::open(config(Some("0xa11ce"))).await.unwrap();

    for (recipient, amount, expected) in [
        ("", "1", FormError::EmptyRecipient),
        ("0xb0b", "0", FormError::NonPositiveAmount),
        ("0xb0b", "-2", FormError::NonPositiveAmount),
    ] {
        let form = FaucetForm::new("USDt", recipient, amount);
        match mint::run(&session, &form).await {
            Err(CliError::FormError(e)) => assert_eq!(e, expected),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("form {:?} was dispatched", form),
        }
    }
}

/// Unsupported assets produce a notification pointing at the external faucet.
#[tokio::test]
async fn test_unsupported_asset_notification() {
    let session = Session::open(config(Some("0xa11ce"))).await.unwrap();

    let form = FaucetForm::new("APT", "0xb0b", "1");
    let report = mint::run(&session, &form).await.unwrap();

    assert!(matches!(
        report.result,
        Err(DispatchError::UnsupportedAsset { .. })
    ));
    assert!(report.balance.is_none());
    match report.notification {
        Notification::Error { link, .. } => {
            assert_eq!(link.as_deref(), Some("https://aptos.dev/en/network/faucet"))
        }
        other => panic!("unexpected notification {:?}", other),
    }
}

/// A read against an unreachable node still yields a full snapshot.
#[tokio::test]
async fn test_balance_with_unreachable_node() {
    let session = Session::open(config(Some("0xa11ce"))).await.unwrap();

    let snapshot = balance::run(&session, Some("0xb0b")).await.unwrap();
    assert_eq!(snapshot.account.as_str(), "0xb0b");
    assert_eq!(snapshot.len(), session.deployment.assets.len());
    assert!(snapshot.iter().all(|(_, amount)| amount == 0));
    assert_eq!(snapshot.unavailable().count(), snapshot.len());
}

/// Minting to the connected account reports the balance read after the
/// mint, not the one from a read that was already running.
#[tokio::test]
async fn test_mint_reports_new_balance() {
    let session = fake_chain_session().await;

    let form = FaucetForm::new("TFA", "0xa11ce", "1");
    let report = mint::run(&session, &form).await.unwrap();

    assert_eq!(report.result.unwrap().0, "0xfeed");
    assert!(!report.notification.is_error());
    // 1 TFA at 10^6 is 1_000_000 base units of an 8 decimal asset
    assert_eq!(report.balance.as_deref(), Some("0.01000000 TFA"));
}

/// Minting to another account succeeds without reporting a balance.
#[tokio::test]
async fn test_mint_to_other_account() {
    let session = fake_chain_session().await;

    let form = FaucetForm::new("TFC", "0xb0b", "2.5");
    let report = mint::run(&session, &form).await.unwrap();

    assert!(report.result.is_ok());
    assert!(matches!(report.notification, Notification::Success { .. }));
    assert!(report.balance.is_none());
}
