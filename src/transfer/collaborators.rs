//! Collaborator traits consumed by the transfer components
//!
//! The components never talk to a chain directly. A host injects
//! implementations of these traits; [`crate::client::TokenClient`] is the
//! JSON-RPC one, and tests use in-memory doubles.

use alloy::primitives::{Address, TxHash, U256};

use crate::error::Error;
use crate::transfer::TransferRequest;

/// Submits ERC-20 transfers on behalf of an account
#[async_trait::async_trait]
pub trait TransferSubmitter: Send + Sync {
    /// Simulate and then broadcast `transfer(recipient, amount)`.
    ///
    /// A failing simulation must abort before anything is broadcast.
    async fn submit_transfer(&self, from: Address, request: TransferRequest)
        -> Result<TxHash, Error>;
}

/// Estimates the cost of a transfer
#[async_trait::async_trait]
pub trait GasOracle: Send + Sync {
    /// Gas units the transfer is expected to consume
    async fn estimate_transfer_gas(
        &self,
        from: Address,
        request: TransferRequest,
    ) -> Result<u64, Error>;

    /// Current gas price in wei
    async fn gas_price(&self) -> Result<u128, Error>;
}

/// Reads token balances
#[async_trait::async_trait]
pub trait BalanceReader: Send + Sync {
    /// Raw balance in base units
    async fn balance_of(&self, account: Address) -> Result<U256, Error>;
}

/// Token metadata lookups
#[async_trait::async_trait]
pub trait TokenMetadata: Send + Sync {
    async fn token_symbol(&self) -> Result<String, Error>;

    async fn token_decimals(&self) -> Result<u8, Error>;
}

/// Everything a host needs to run the wizard against one token
pub trait TokenGateway: TransferSubmitter + GasOracle + BalanceReader + TokenMetadata {}

impl<T> TokenGateway for T where T: TransferSubmitter + GasOracle + BalanceReader + TokenMetadata {}
