//! Client for the node REST API.

use crate::errors::NetworkError;
use crate::types::{ApiErrorBody, TransactionResponse, TransactionStatus};
use async_trait::async_trait;
use faucet_core::types::{ConfirmedTransaction, TxHash, ViewRequest};
use faucet_core::{ClientError, NetworkClient};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default delay between two confirmation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default time to wait for a transaction to be committed.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Appends the API version to a node URL unless it is already there.
pub fn api_url(node_url: &str) -> String {
    let trimmed = node_url.trim_end_matches('/');
    if trimmed.ends_with("/v1") {
        trimmed.to_string()
    } else {
        format!("{}/v1", trimmed)
    }
}

/// Turns a non-success response into an `ApiError`.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, NetworkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => body.message,
        Err(_) if text.is_empty() => status.to_string(),
        Err(_) => text,
    };

    Err(NetworkError::ApiError {
        status: status.as_u16(),
        message,
    })
}

/// A client for one node.
#[derive(Clone, Debug)]
pub struct RestClient {
    /// The HTTP client
    client: reqwest::Client,
    /// Base URL including the API version
    base_url: String,
    /// Delay between confirmation polls
    poll_interval: Duration,
    /// Time to wait for a transaction to be committed
    confirmation_timeout: Duration,
}

impl RestClient {
    /// Creates a new client for the node at `node_url`.
    pub fn new(node_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: api_url(node_url),
            poll_interval: DEFAULT_POLL_INTERVAL,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    /// Sets how often and for how long `wait_for_transaction` polls.
    pub fn with_confirmation(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.confirmation_timeout = timeout;
        self
    }

    /// Returns the base URL including the API version.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs a view function.
    pub async fn call_view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>, NetworkError> {
        let url = format!("{}/view", self.base_url);
        debug!("View {} at {}", request.function, url);

        let response = self.client.post(&url).json(request).send().await?;
        let response = check_status(response).await?;

        let values: serde_json::Value = response.json().await?;
        match values {
            serde_json::Value::Array(values) => Ok(values),
            other => Err(NetworkError::InvalidResponse(format!(
                "expected an array of results, got {}",
                other
            ))),
        }
    }

    /// Fetches a transaction by hash. A 404 means the node has not seen it yet.
    pub async fn get_transaction(&self, hash: &TxHash) -> Result<TransactionStatus, NetworkError> {
        let url = format!("{}/transactions/by_hash/{}", self.base_url, hash);

        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(TransactionStatus::Pending);
        }
        let response = check_status(response).await?;

        let transaction: TransactionResponse = response.json().await?;
        transaction.into_status()
    }

    /// Polls until the node reports the transaction as committed.
    async fn poll_until_committed(&self, hash: &TxHash) -> Result<ConfirmedTransaction, NetworkError> {
        loop {
            match self.get_transaction(hash).await? {
                TransactionStatus::Committed(transaction) => return Ok(transaction),
                TransactionStatus::Pending => {
                    debug!("Transaction {} still pending", hash);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// Polls until the transaction is committed or the timeout expires.
    pub async fn poll_transaction(&self, hash: &TxHash) -> Result<ConfirmedTransaction, NetworkError> {
        let transaction = tokio::time::timeout(self.confirmation_timeout, self.poll_until_committed(hash))
            .await
            .map_err(|_| NetworkError::Timeout(format!("transaction {}", hash)))??;

        if !transaction.success {
            warn!("Transaction {} failed: {}", hash, transaction.vm_status);
            return Err(NetworkError::TransactionFailed(format!(
                "{}: {}",
                hash, transaction.vm_status
            )));
        }

        info!("Transaction {} committed at version {}", hash, transaction.version);
        Ok(transaction)
    }
}

#[async_trait]
impl NetworkClient for RestClient {
    async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>, ClientError> {
        Ok(self.call_view(request).await?)
    }

    async fn wait_for_transaction(&self, hash: &TxHash) -> Result<ConfirmedTransaction, ClientError> {
        Ok(self.poll_transaction(hash).await?)
    }
}
