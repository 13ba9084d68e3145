//! Wallet collaborator backed by an external signer service.
//!
//! The signer owns the keys. This client only tells it which account to
//! use and what to sign, then relays the hash it gets back.

use crate::errors::NetworkError;
use crate::rest::{api_url, check_status};
use crate::types::{AccountResponse, SignAndSubmitRequest, SignAndSubmitResponse};
use async_trait::async_trait;
use faucet_core::types::{AccountAddress, PendingTransaction, TransactionPayload, TxHash};
use faucet_core::{ClientError, WalletClient};
use std::sync::RwLock;
use tracing::{debug, info};

/// A wallet reached over HTTP.
#[derive(Debug)]
pub struct HttpWalletClient {
    /// The HTTP client
    client: reqwest::Client,
    /// Base URL of the signer including the API version
    signer_url: String,
    /// The connected account
    account: RwLock<Option<AccountAddress>>,
}

impl HttpWalletClient {
    /// Creates a disconnected client for the signer at `signer_url`.
    pub fn new(signer_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            signer_url: api_url(signer_url),
            account: RwLock::new(None),
        }
    }

    /// Creates a client already connected to `account`.
    pub fn with_account(signer_url: &str, account: AccountAddress) -> Self {
        let wallet = Self::new(signer_url);
        wallet.set_account(Some(account));
        wallet
    }

    /// Asks the signer which account it holds and connects to it.
    pub async fn connect(&self) -> Result<AccountAddress, NetworkError> {
        let url = format!("{}/account", self.signer_url);
        let response = self.client.get(&url).send().await?;
        let response = check_status(response).await?;

        let AccountResponse { address } = response.json().await?;
        info!("Wallet connected: {}", address);
        self.set_account(Some(address.clone()));
        Ok(address)
    }

    /// Forgets the connected account.
    pub fn disconnect(&self) {
        self.set_account(None);
    }

    fn set_account(&self, account: Option<AccountAddress>) {
        let mut guard = self.account.write().unwrap_or_else(|e| e.into_inner());
        *guard = account;
    }

    /// Sends the payload to the signer for `sender`.
    pub async fn submit(
        &self,
        sender: &AccountAddress,
        payload: &TransactionPayload,
    ) -> Result<TxHash, NetworkError> {
        let url = format!("{}/sign_and_submit", self.signer_url);
        debug!("Submitting payload for {} to {}", sender, url);

        let response = self
            .client
            .post(&url)
            .json(&SignAndSubmitRequest { sender, payload })
            .send()
            .await?;
        let response = check_status(response).await?;

        let SignAndSubmitResponse { hash } = response.json().await?;
        if hash.is_empty() {
            return Err(NetworkError::InvalidResponse("signer returned an empty hash".to_string()));
        }
        Ok(TxHash(hash))
    }
}

#[async_trait]
impl WalletClient for HttpWalletClient {
    fn account(&self) -> Option<AccountAddress> {
        self.account.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<PendingTransaction, ClientError> {
        let sender = self.account().ok_or(NetworkError::NotConnected)?;
        let hash = self.submit(&sender, payload).await?;
        Ok(PendingTransaction { hash })
    }
}
