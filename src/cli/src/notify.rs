//! User-facing notifications.

use colored::Colorize;
use faucet_service::{DispatchError, DispatchResult};
use std::fmt;

/// A message shown after an action completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// The action went through
    Success {
        /// Short headline
        title: String,
        /// Details, such as the transaction hash
        message: String,
    },
    /// The action failed
    Error {
        /// Short headline
        title: String,
        /// What went wrong
        message: String,
        /// Where the user can go instead
        link: Option<String>,
    },
}

impl Notification {
    /// Builds the notification for a dispatch outcome.
    ///
    /// Submission and confirmation failures share one generic message. The
    /// underlying cause is logged, not shown.
    pub fn from_dispatch(result: &DispatchResult) -> Self {
        match result {
            Ok(hash) => Notification::Success {
                title: "Transaction succeeded".to_string(),
                message: format!("Hash: {}", hash),
            },
            Err(DispatchError::UnsupportedAsset {
                asset,
                external_faucet,
            }) => Notification::Error {
                title: "Unsupported asset".to_string(),
                message: match external_faucet {
                    Some(_) => format!("{} cannot be minted here, use its own faucet", asset),
                    None => format!("{} cannot be minted here", asset),
                },
                link: external_faucet.clone(),
            },
            Err(DispatchError::InvalidRequest(e)) => Notification::Error {
                title: "Invalid request".to_string(),
                message: e.to_string(),
                link: None,
            },
            Err(DispatchError::Submission(_)) | Err(DispatchError::Confirmation { .. }) => {
                Notification::Error {
                    title: "Transaction failed".to_string(),
                    message: "The faucet transaction did not go through, try again".to_string(),
                    link: None,
                }
            }
        }
    }

    /// Whether this reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error { .. })
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Success { title, message } => {
                write!(f, "{} {}", format!("{}:", title).green(), message)
            }
            Notification::Error {
                title,
                message,
                link,
            } => {
                write!(f, "{} {}", format!("{}:", title).red(), message)?;
                if let Some(link) = link {
                    write!(f, "\n  {} {}", "Visit".yellow(), link)?;
                }
                Ok(())
            }
        }
    }
}
