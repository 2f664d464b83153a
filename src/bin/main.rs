//! Token Transfer - Terminal User Interface
//!
//! Connects to an EVM network, loads the sending wallet and opens the
//! transfer wizard for the configured ERC-20 token.

#[cfg(feature = "tui")]
use std::{env, path::PathBuf, sync::Arc};

#[cfg(feature = "tui")]
use anyhow::{bail, Context};
#[cfg(feature = "tui")]
use clap::Parser;
#[cfg(feature = "tui")]
use token_transfer_sdk::{
    config::TokenConfig,
    init_logging, run_tui, Config, LogTarget, TokenClient, TransferNetworkConfig, TransferWallet,
    WalletSource,
};
#[cfg(feature = "tui")]
use tracing::{info, warn};

#[cfg(feature = "tui")]
const MNEMONIC_ENV: &str = "TOKEN_TRANSFER_MNEMONIC";
#[cfg(feature = "tui")]
const PRIVATE_KEY_ENV: &str = "TOKEN_TRANSFER_PRIVATE_KEY";

#[cfg(feature = "tui")]
#[derive(Parser)]
#[command(name = "token-transfer")]
#[command(about = "Transfer ERC-20 tokens from the terminal")]
#[command(version)]
struct Args {
    /// Network section of config/network.toml (e.g. sepolia, local)
    #[arg(short, long)]
    network: Option<String>,

    /// Custom RPC endpoint URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Token contract address
    #[arg(long)]
    token: Option<String>,

    /// Path to a saved configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// BIP-39 mnemonic of the sending wallet
    #[arg(long)]
    mnemonic: Option<String>,

    /// Account index used with --mnemonic
    #[arg(long, default_value = "0")]
    account_index: u32,

    /// Hex private key of the sending wallet
    #[arg(long)]
    private_key: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[cfg(feature = "tui")]
fn load_saved_config(path: Option<&PathBuf>) -> anyhow::Result<Option<Config>> {
    match path {
        Some(path) => Config::load(path)
            .map(Some)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let default_path = Config::default_path();
            if default_path.exists() {
                Ok(Some(Config::load(&default_path)?))
            } else {
                Ok(None)
            }
        }
    }
}

#[cfg(feature = "tui")]
fn resolve_network(args: &Args, saved: Option<&Config>) -> anyhow::Result<TransferNetworkConfig> {
    let mut network = match (&args.network, saved) {
        (Some(name), _) => TransferNetworkConfig::for_network(name)?,
        (None, Some(saved)) => saved.network.clone(),
        (None, None) => TransferNetworkConfig::for_network("sepolia")?,
    };

    if let Some(rpc_url) = &args.rpc_url {
        network = network.with_rpc_url(rpc_url.clone());
    }
    if let Some(token) = &args.token {
        let token = TokenConfig {
            address: token.clone(),
            ..network.token.clone()
        };
        network = network.with_token(token);
    }
    Ok(network)
}

#[cfg(feature = "tui")]
fn resolve_wallet(args: &Args, saved: Option<&Config>) -> anyhow::Result<TransferWallet> {
    let source = if let Some(key) = &args.private_key {
        WalletSource::PrivateKey { key: key.clone() }
    } else if let Some(phrase) = &args.mnemonic {
        WalletSource::Mnemonic {
            phrase: phrase.clone(),
            index: args.account_index,
        }
    } else if let Ok(key) = env::var(PRIVATE_KEY_ENV) {
        WalletSource::PrivateKey { key }
    } else if let Ok(phrase) = env::var(MNEMONIC_ENV) {
        WalletSource::Mnemonic {
            phrase,
            index: args.account_index,
        }
    } else if let Some(source) = saved.and_then(|c| c.wallet.clone()) {
        source
    } else {
        bail!(
            "No wallet configured. Pass --mnemonic or --private-key, or set {} / {}",
            MNEMONIC_ENV,
            PRIVATE_KEY_ENV
        );
    };

    Ok(TransferWallet::from_source(&source)?)
}

#[cfg(feature = "tui")]
async fn run(args: Args) -> anyhow::Result<()> {
    init_logging(LogTarget::default_file("tui.log"), args.debug)?;

    let saved = load_saved_config(args.config.as_ref())?;
    let network = resolve_network(&args, saved.as_ref())?;
    let wallet = resolve_wallet(&args, saved.as_ref())?;
    let account = wallet.address();

    let client = TokenClient::new(network.clone(), wallet)?;
    match client.chain_id().await {
        Ok(chain_id) if chain_id != network.chain_id => warn!(
            expected = network.chain_id,
            actual = chain_id,
            "RPC endpoint reports a different chain ID"
        ),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Could not read chain ID"),
    }

    info!(
        network = %network.network_name,
        token = %client.token_address(),
        account = %account,
        "Connected"
    );

    token_transfer_sdk::tui::check_terminal_support()?;
    run_tui(Arc::new(client), account, network).await?;
    Ok(())
}

#[cfg(feature = "tui")]
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Token Transfer Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn main() {
    eprintln!("TUI feature is not enabled. Please run with: cargo run --features tui");
    std::process::exit(1);
}
