//! Command line client for the testnet faucets.

use anyhow::Result;
use colored::Colorize;
use faucet_cli::commands::{assets, balance, mint, watch};
use faucet_cli::{CliConfig, CliError, FaucetForm, Session};
use std::net::SocketAddr;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the faucet client.
#[derive(Debug, StructOpt)]
#[structopt(name = "faucet", about = "Testnet faucet client")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Node REST endpoint
    #[structopt(short, long)]
    node: Option<String>,

    /// Signer service endpoint
    #[structopt(short, long)]
    signer: Option<String>,

    /// Built-in deployment to use
    #[structopt(short, long)]
    deployment: Option<String>,

    /// Deployment file to use instead of a built-in one
    #[structopt(long, parse(from_os_str))]
    deployment_file: Option<PathBuf>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the faucet client.
#[derive(Debug, StructOpt)]
enum Command {
    /// Show the balances of an account
    #[structopt(name = "balance")]
    Balance {
        /// Account to read, defaults to the connected one
        #[structopt(long)]
        account: Option<String>,
    },

    /// Keep showing balances as they change
    #[structopt(name = "watch")]
    Watch {
        /// Account to watch, defaults to the connected one
        #[structopt(long)]
        account: Option<String>,

        /// Address to serve Prometheus metrics on
        #[structopt(long)]
        metrics_addr: Option<SocketAddr>,
    },

    /// List the assets of the deployment
    #[structopt(name = "assets")]
    Assets,

    /// Request test tokens
    #[structopt(name = "mint")]
    Mint {
        /// Asset symbol
        #[structopt(long)]
        asset: String,

        /// Recipient address
        #[structopt(long)]
        to: String,

        /// Amount in whole units, e.g. 10.5
        #[structopt(long)]
        amount: String,
    },

    /// Write the effective configuration to the config file
    #[structopt(name = "init-config")]
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let config_path = opt.config.clone().unwrap_or_else(CliConfig::default_path);
    let mut config = if config_path.exists() {
        CliConfig::from_file(&config_path)?
    } else {
        debug!("No config at {}, using defaults", config_path.display());
        CliConfig::default()
    };

    // Flags override the file
    if let Some(node) = opt.node {
        config.node = node;
    }
    if let Some(signer) = opt.signer {
        config.signer = signer;
    }
    if let Some(deployment) = opt.deployment {
        config.deployment = deployment;
        config.deployment_file = None;
    }
    if let Some(path) = opt.deployment_file {
        config.deployment_file = Some(path);
    }

    let cmd = match opt.cmd {
        Command::InitConfig => {
            config.load_deployment()?;
            config.to_file(&config_path)?;
            println!("{} {}", "Config written:".green(), config_path.display());
            return Ok(());
        }
        cmd => cmd,
    };

    let session = Session::open(config).await?;

    // Run the appropriate command
    match cmd {
        Command::Balance { account } => {
            let snapshot = balance::run(&session, account.as_deref()).await?;
            println!("{} {}", "Balances of".green(), snapshot.account);
            for line in balance::render(&session.deployment, &snapshot) {
                println!("{}", line);
            }
        }
        Command::Watch {
            account,
            metrics_addr,
        } => {
            watch::run(&session, account.as_deref(), metrics_addr).await?;
        }
        Command::Assets => {
            for line in assets::run(&session).await? {
                println!("{}", line);
            }
        }
        Command::Mint { asset, to, amount } => {
            let form = FaucetForm::new(&asset, &to, &amount);
            let report = match mint::run(&session, &form).await {
                Ok(report) => report,
                Err(CliError::FormError(e)) => {
                    println!("{} {}", "Cannot submit:".red(), e);
                    return Err(CliError::FormError(e).into());
                }
                Err(e) => return Err(e.into()),
            };

            println!("{}", report.notification);
            if let Some(balance) = &report.balance {
                println!("{} {}", "New balance:".green(), balance);
            }
            if let Err(e) = report.result {
                error!("Mint failed: {}", e);
                return Err(CliError::DispatchError(e).into());
            }
        }
        Command::InitConfig => {}
    }

    Ok(())
}
