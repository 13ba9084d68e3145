//! Wiring of the wallet, node client and deployment for one CLI run.

use crate::config::CliConfig;
use crate::errors::CliError;
use faucet_core::types::AccountAddress;
use faucet_core::{Deployment, NetworkClient, RoutingTable, WalletClient};
use faucet_network::rest::DEFAULT_POLL_INTERVAL;
use faucet_network::{HttpWalletClient, RestClient};
use faucet_service::BalanceReader;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a command needs to talk to the chain.
pub struct Session {
    /// The configuration the session was opened with
    pub config: CliConfig,
    /// Assets and faucet routes in use
    pub deployment: Deployment,
    /// Node client for view calls and confirmations
    pub network: Arc<RestClient>,
    /// Signer client, connected if an account is known
    pub wallet: Arc<HttpWalletClient>,
}

impl Session {
    /// Builds the clients and connects the wallet.
    ///
    /// A configured account is used as is. Otherwise the signer is asked for
    /// its account; if it cannot be reached the session stays disconnected.
    pub async fn open(config: CliConfig) -> Result<Self, CliError> {
        let deployment = config.load_deployment()?;
        info!("Using deployment {} on {}", deployment.name, config.node);

        let network = Arc::new(
            RestClient::new(&config.node)
                .with_confirmation(DEFAULT_POLL_INTERVAL, config.confirmation_timeout()),
        );

        let wallet = match &config.account {
            Some(account) => {
                let account: AccountAddress = account.parse()?;
                HttpWalletClient::with_account(&config.signer, account)
            }
            None => {
                let wallet = HttpWalletClient::new(&config.signer);
                if let Err(e) = wallet.connect().await {
                    warn!("Wallet not connected: {}", e);
                }
                wallet
            }
        };

        Ok(Self {
            config,
            deployment,
            network,
            wallet: Arc::new(wallet),
        })
    }

    /// Returns the connected account.
    pub fn account(&self) -> Option<AccountAddress> {
        self.wallet.account()
    }

    /// Returns `account`, or the connected account if none is given.
    pub fn account_or_connected(
        &self,
        account: Option<&str>,
    ) -> Result<AccountAddress, CliError> {
        match account {
            Some(account) => Ok(account.parse()?),
            None => self.account().ok_or(CliError::NotConnected),
        }
    }

    /// Builds a reader over every asset of the deployment.
    pub fn reader(&self) -> BalanceReader {
        BalanceReader::from_deployment(self.network_client(), &self.deployment)
    }

    /// Builds the routing table of the deployment.
    pub fn routing_table(&self) -> Result<RoutingTable, CliError> {
        Ok(self.deployment.routing_table()?)
    }

    /// The node client as a collaborator.
    pub fn network_client(&self) -> Arc<dyn NetworkClient> {
        self.network.clone()
    }

    /// The wallet as a collaborator.
    pub fn wallet_client(&self) -> Arc<dyn WalletClient> {
        self.wallet.clone()
    }
}
