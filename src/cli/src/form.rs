//! Faucet form state and its validation.

use faucet_core::amount::parse_amount;
use faucet_core::types::{AccountAddress, AssetSymbol, FaucetRequest};
use faucet_core::CoreError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why the form cannot be submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// No wallet is connected
    #[error("Connect a wallet before requesting tokens")]
    NotConnected,

    /// The asset field is empty
    #[error("Select an asset")]
    NoAsset,

    /// The recipient field is empty
    #[error("Enter a recipient address")]
    EmptyRecipient,

    /// The recipient is not an account address
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(CoreError),

    /// The amount is not a decimal number
    #[error("Invalid amount: {0}")]
    InvalidAmount(CoreError),

    /// The amount is zero or negative
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
}

/// What the user has entered so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaucetForm {
    /// Symbol of the asset to mint
    pub asset: String,
    /// Recipient address as typed
    pub recipient: String,
    /// Amount in whole units, as typed
    pub amount: String,
}

impl FaucetForm {
    /// Creates a form from raw input.
    pub fn new(asset: &str, recipient: &str, amount: &str) -> Self {
        Self {
            asset: asset.to_string(),
            recipient: recipient.to_string(),
            amount: amount.to_string(),
        }
    }

    /// Turns the form into a request. Nothing reaches the dispatcher unless
    /// this succeeds.
    pub fn validate(&self, connected: Option<&AccountAddress>) -> Result<FaucetRequest, FormError> {
        if connected.is_none() {
            return Err(FormError::NotConnected);
        }

        let asset = self.asset.trim();
        if asset.is_empty() {
            return Err(FormError::NoAsset);
        }

        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(FormError::EmptyRecipient);
        }
        let recipient = recipient
            .parse::<AccountAddress>()
            .map_err(FormError::InvalidRecipient)?;

        let amount = parse_amount(&self.amount).map_err(FormError::InvalidAmount)?;
        if amount <= Decimal::ZERO {
            return Err(FormError::NonPositiveAmount);
        }

        Ok(FaucetRequest {
            asset: AssetSymbol::new(asset),
            recipient,
            amount,
        })
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self, connected: Option<&AccountAddress>) -> bool {
        self.validate(connected).is_ok()
    }
}
