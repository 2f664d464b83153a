use alloy::primitives::Address;
use config::{Config as ConfigLoader, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Directory holding `network.toml`, overridable through the environment
pub const CONFIG_DIR_ENV: &str = "TOKEN_TRANSFER_CONFIG_DIR";
/// Overrides the RPC endpoint of the loaded network
pub const RPC_URL_ENV: &str = "TOKEN_TRANSFER_RPC_URL";
/// Overrides the token contract address of the loaded network
pub const TOKEN_ADDRESS_ENV: &str = "TOKEN_TRANSFER_TOKEN_ADDRESS";

/// Network constants loaded from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConstants {
    /// Network name
    pub network_name: String,
    /// EIP-155 chain ID
    pub chain_id: u64,
    /// Default RPC endpoint
    pub default_rpc: String,
    /// ERC-20 token contract address
    pub token_address: String,
    /// Block explorer base URL
    #[serde(default)]
    pub explorer_url: Option<String>,
}

impl NetworkConstants {
    /// Load network constants from `{TOKEN_TRANSFER_CONFIG_DIR or "config"}/network.toml`
    pub fn load(network: &str) -> Result<Self, ConfigError> {
        let config_dir = env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(Path::new(&config_dir), network)
    }

    /// Load the `network` section of `network.toml` in `config_dir`.
    ///
    /// `TOKEN_TRANSFER_RPC_URL` and `TOKEN_TRANSFER_TOKEN_ADDRESS` override
    /// the file values when set.
    pub fn load_from(config_dir: &Path, network: &str) -> Result<Self, ConfigError> {
        let settings = ConfigLoader::builder()
            .add_source(File::from(config_dir.join("network")))
            .set_override_option(
                format!("{}.default_rpc", network),
                env::var(RPC_URL_ENV).ok(),
            )?
            .set_override_option(
                format!("{}.token_address", network),
                env::var(TOKEN_ADDRESS_ENV).ok(),
            )?
            .build()?;

        settings.get::<NetworkConstants>(network)
    }
}

/// Token contract settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Contract address, `0x`-prefixed
    pub address: String,
    /// Symbol to display instead of querying the contract
    #[serde(default)]
    pub symbol: Option<String>,
    /// Decimals to use instead of querying the contract
    #[serde(default)]
    pub decimals: Option<u8>,
}

impl TokenConfig {
    /// Parse the configured contract address
    pub fn contract_address(&self) -> Result<Address, Error> {
        if self.address.trim().is_empty() {
            return Err(Error::Config(format!(
                "Token contract address is not set (use {})",
                TOKEN_ADDRESS_ENV
            )));
        }
        Address::from_str(self.address.trim())
            .map_err(|e| Error::Config(format!("Invalid token address {}: {}", self.address, e)))
    }
}

/// Timings of the transfer flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferTimings {
    /// How long a balance read stays fresh
    pub balance_stale_ms: u64,
    /// Interval between gas estimate refreshes on the confirm step
    pub gas_refresh_ms: u64,
    /// Age after which a gas estimate is no longer shown
    pub gas_estimate_ttl_ms: u64,
    /// Delay between a successful submission and the success step
    pub success_advance_ms: u64,
    /// Delay before the success step closes the wizard
    pub success_auto_close_ms: u64,
}

impl Default for TransferTimings {
    fn default() -> Self {
        Self {
            balance_stale_ms: 5_000,
            gas_refresh_ms: 12_000,
            gas_estimate_ttl_ms: 30_000,
            success_advance_ms: 3_000,
            success_auto_close_ms: 3_000,
        }
    }
}

impl TransferTimings {
    pub fn balance_stale_time(&self) -> Duration {
        Duration::from_millis(self.balance_stale_ms)
    }

    pub fn gas_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.gas_refresh_ms)
    }

    pub fn gas_estimate_ttl(&self) -> Duration {
        Duration::from_millis(self.gas_estimate_ttl_ms)
    }

    pub fn success_advance_delay(&self) -> Duration {
        Duration::from_millis(self.success_advance_ms)
    }

    pub fn success_auto_close(&self) -> Duration {
        Duration::from_millis(self.success_auto_close_ms)
    }
}

/// Network configuration for token transfers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferNetworkConfig {
    /// Network name (e.g., sepolia)
    pub network_name: String,
    /// EIP-155 chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Token being transferred
    pub token: TokenConfig,
    /// Block explorer base URL
    #[serde(default)]
    pub explorer_url: Option<String>,
    /// Flow timings
    #[serde(default)]
    pub timings: TransferTimings,
}

impl TransferNetworkConfig {
    /// Create a new network config from network constants
    pub fn from_constants(constants: &NetworkConstants) -> Self {
        Self {
            network_name: constants.network_name.clone(),
            chain_id: constants.chain_id,
            rpc_url: constants.default_rpc.clone(),
            token: TokenConfig {
                address: constants.token_address.clone(),
                symbol: None,
                decimals: None,
            },
            explorer_url: constants.explorer_url.clone(),
            timings: TransferTimings::default(),
        }
    }

    /// Load constants for `network` and build a config from them
    pub fn for_network(network: &str) -> Result<Self, Error> {
        let constants = NetworkConstants::load(network)
            .map_err(|e| Error::Config(format!("Failed to load network {}: {}", network, e)))?;
        Ok(Self::from_constants(&constants))
    }

    /// Set the RPC endpoint
    pub fn with_rpc_url(mut self, rpc_url: String) -> Self {
        self.rpc_url = rpc_url;
        self
    }

    /// Set the token settings
    pub fn with_token(mut self, token: TokenConfig) -> Self {
        self.token = token;
        self
    }

    /// Set the flow timings
    pub fn with_timings(mut self, timings: TransferTimings) -> Self {
        self.timings = timings;
        self
    }
}

/// Where the signing key comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WalletSource {
    /// BIP-39 phrase, derived at `m/44'/60'/0'/0/{index}`
    Mnemonic {
        phrase: String,
        #[serde(default)]
        index: u32,
    },
    /// Hex-encoded secp256k1 private key
    PrivateKey { key: String },
}

/// Complete configuration with wallet info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active network configuration
    pub network: TransferNetworkConfig,
    /// Signing key source
    #[serde(default)]
    pub wallet: Option<WalletSource>,
}

impl Config {
    /// Create a new configuration with the specified network
    pub fn with_network(network: TransferNetworkConfig) -> Self {
        Self {
            network,
            wallet: None,
        }
    }

    /// Create a new configuration with a wallet
    pub fn with_wallet(network: TransferNetworkConfig, wallet: WalletSource) -> Self {
        Self {
            network,
            wallet: Some(wallet),
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("token-transfer");
        path.push("config.toml");
        path
    }
}
