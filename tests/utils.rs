use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, TxHash, B256, U256};
use token_transfer_sdk::transfer::{BalanceReader, GasOracle, TokenMetadata, TransferSubmitter};
use token_transfer_sdk::{Error, TransferRequest};

#[cfg(test)]
#[allow(dead_code)]
pub mod test_utils {
    use super::*;

    /// Anvil's well-known development mnemonic
    pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
    /// First account derived from [`TEST_MNEMONIC`]
    pub const TEST_ACCOUNT_0: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    /// Second account derived from [`TEST_MNEMONIC`]
    pub const TEST_ACCOUNT_1: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    /// Private key of [`TEST_ACCOUNT_0`]
    pub const TEST_PRIVATE_KEY_0: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    pub const RECIPIENT: &str = "0x1234567890abcdef1234567890abcdef12345678";
    pub const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    /// In-memory token with scripted failures
    pub struct MockGateway {
        pub symbol: String,
        pub decimals: u8,
        pub balance: Mutex<U256>,
        pub fail_submissions: AtomicBool,
        pub submissions: Mutex<Vec<(Address, TransferRequest)>>,
        pub gas_units: u64,
        pub gas_price: u128,
    }

    impl MockGateway {
        pub fn new(symbol: &str, decimals: u8, balance: U256) -> Self {
            Self {
                symbol: symbol.to_string(),
                decimals,
                balance: Mutex::new(balance),
                fail_submissions: AtomicBool::new(false),
                submissions: Mutex::new(Vec::new()),
                gas_units: 21_000,
                gas_price: 20_000_000_000,
            }
        }

        pub fn failing(self) -> Self {
            self.fail_submissions.store(true, Ordering::SeqCst);
            self
        }

        pub fn set_failing(&self, fail: bool) {
            self.fail_submissions.store(fail, Ordering::SeqCst);
        }

        pub fn submissions(&self) -> Vec<(Address, TransferRequest)> {
            self.submissions.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl TransferSubmitter for MockGateway {
        async fn submit_transfer(
            &self,
            from: Address,
            request: TransferRequest,
        ) -> Result<TxHash, Error> {
            if self.fail_submissions.load(Ordering::SeqCst) {
                return Err(Error::TxSimulation("execution reverted".to_string()));
            }
            let mut submissions = self.submissions.lock().unwrap();
            submissions.push((from, request));
            let mut balance = self.balance.lock().unwrap();
            *balance = balance.saturating_sub(request.amount);
            Ok(B256::with_last_byte(submissions.len() as u8))
        }
    }

    #[async_trait::async_trait]
    impl GasOracle for MockGateway {
        async fn estimate_transfer_gas(
            &self,
            _from: Address,
            _request: TransferRequest,
        ) -> Result<u64, Error> {
            Ok(self.gas_units)
        }

        async fn gas_price(&self) -> Result<u128, Error> {
            Ok(self.gas_price)
        }
    }

    #[async_trait::async_trait]
    impl BalanceReader for MockGateway {
        async fn balance_of(&self, _account: Address) -> Result<U256, Error> {
            Ok(*self.balance.lock().unwrap())
        }
    }

    #[async_trait::async_trait]
    impl TokenMetadata for MockGateway {
        async fn token_symbol(&self) -> Result<String, Error> {
            Ok(self.symbol.clone())
        }

        async fn token_decimals(&self) -> Result<u8, Error> {
            Ok(self.decimals)
        }
    }

    /// `amount` whole tokens in base units
    pub fn tokens(amount: u64, decimals: u8) -> U256 {
        U256::from(amount) * U256::from(10u64).pow(U256::from(decimals))
    }

    /// Write a `network.toml` with a `testnet` section into `dir`
    pub fn write_network_config(dir: &Path) {
        let content = format!(
            r#"[testnet]
network_name = "testnet"
chain_id = 31337
default_rpc = "http://127.0.0.1:8545"
token_address = "{}"
explorer_url = "https://explorer.example"
"#,
            TOKEN
        );
        fs::write(dir.join("network.toml"), content).expect("Failed to write network.toml");
    }
}
