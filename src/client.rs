use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
};
use alloy::providers::{Identity, Provider, ProviderBuilder, ReqwestProvider};
use alloy::sol;
use alloy::transports::http::{reqwest, Client, Http};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::config::TransferNetworkConfig;
use crate::error::Error;
use crate::transfer::collaborators::{BalanceReader, GasOracle, TokenMetadata, TransferSubmitter};
use crate::transfer::TransferRequest;
use crate::wallet::TransferWallet;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

/// HTTP provider with the recommended fillers and a local signing wallet
#[allow(clippy::type_complexity)]
pub type HttpWalletProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    ReqwestProvider,
    Http<Client>,
    Ethereum,
>;

/// ERC-20 token client for a single token contract
pub struct TokenClient {
    /// Bound token contract
    contract: IERC20::IERC20Instance<Http<Client>, HttpWalletProvider>,
    /// Network configuration
    config: TransferNetworkConfig,
    /// Wallet for signing transactions
    wallet: TransferWallet,
    symbol: OnceCell<String>,
    decimals: OnceCell<u8>,
}

impl TokenClient {
    /// Create a new client with the given configuration and signing wallet
    pub fn new(config: TransferNetworkConfig, wallet: TransferWallet) -> Result<Self, Error> {
        let rpc_url: reqwest::Url = config
            .rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL {}: {}", config.rpc_url, e)))?;
        let token_address = config.token.contract_address()?;

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet.ethereum_wallet())
            .on_http(rpc_url);

        debug!(
            network = %config.network_name,
            token = %token_address,
            account = %wallet.address(),
            "Token client created"
        );

        Ok(Self {
            contract: IERC20::new(token_address, provider),
            symbol: OnceCell::new_with(config.token.symbol.clone()),
            decimals: OnceCell::new_with(config.token.decimals),
            config,
            wallet,
        })
    }

    /// Get the wallet
    pub fn wallet(&self) -> &TransferWallet {
        &self.wallet
    }

    /// Address transfers are sent from
    pub fn account(&self) -> Address {
        self.wallet.address()
    }

    /// Get the network configuration
    pub fn config(&self) -> &TransferNetworkConfig {
        &self.config
    }

    /// Token contract address
    pub fn token_address(&self) -> Address {
        *self.contract.address()
    }

    /// Chain ID reported by the RPC endpoint
    pub async fn chain_id(&self) -> Result<u64, Error> {
        self.contract
            .provider()
            .get_chain_id()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get chain id: {}", e)))
    }

    fn ensure_sender(&self, from: Address) -> Result<(), Error> {
        if from != self.wallet.address() {
            return Err(Error::Wallet(format!(
                "Cannot sign for {}: wallet holds {}",
                from,
                self.wallet.address()
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TransferSubmitter for TokenClient {
    async fn submit_transfer(&self, from: Address, request: TransferRequest) -> Result<TxHash, Error> {
        self.ensure_sender(from)?;
        let TransferRequest { recipient, amount } = request;
        let call = self.contract.transfer(recipient, amount).from(from);

        debug!(%recipient, %amount, "Simulating transfer");
        let accepted = call
            .call()
            .await
            .inspect_err(|e| error!(%recipient, error = %e, "Transfer simulation failed"))
            .map_err(|e| Error::TxSimulation(format!("Transfer simulation failed: {}", e)))?
            ._0;
        if !accepted {
            return Err(Error::TxSimulation(
                "Token contract rejected the transfer".to_string(),
            ));
        }

        let pending = call
            .send()
            .await
            .map_err(|e| Error::Tx(format!("Failed to send transfer: {}", e)))?;

        let pending_tx_hash = *pending.tx_hash();
        debug!(%pending_tx_hash, "Transfer pending");

        let tx_hash = pending.watch().await.map_err(|e| {
            error!(%pending_tx_hash, error = %e, "Error watching transfer");
            Error::Tx(format!("Transfer {} was not confirmed: {}", pending_tx_hash, e))
        })?;

        info!(%tx_hash, %recipient, %amount, "Transfer confirmed");
        Ok(tx_hash)
    }
}

#[async_trait::async_trait]
impl GasOracle for TokenClient {
    async fn estimate_transfer_gas(
        &self,
        from: Address,
        request: TransferRequest,
    ) -> Result<u64, Error> {
        self.contract
            .transfer(request.recipient, request.amount)
            .from(from)
            .estimate_gas()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to estimate gas: {}", e)))
    }

    async fn gas_price(&self) -> Result<u128, Error> {
        self.contract
            .provider()
            .get_gas_price()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get gas price: {}", e)))
    }
}

#[async_trait::async_trait]
impl BalanceReader for TokenClient {
    async fn balance_of(&self, account: Address) -> Result<U256, Error> {
        let balance = self
            .contract
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get balance of {}: {}", account, e)))?
            ._0;
        debug!(%account, %balance, "Balance read");
        Ok(balance)
    }
}

#[async_trait::async_trait]
impl TokenMetadata for TokenClient {
    async fn token_symbol(&self) -> Result<String, Error> {
        self.symbol
            .get_or_try_init(|| async {
                self.contract
                    .symbol()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| Error::Rpc(format!("Failed to get token symbol: {}", e)))
            })
            .await
            .cloned()
    }

    async fn token_decimals(&self) -> Result<u8, Error> {
        self.decimals
            .get_or_try_init(|| async {
                self.contract
                    .decimals()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| Error::Rpc(format!("Failed to get token decimals: {}", e)))
            })
            .await
            .copied()
    }
}
