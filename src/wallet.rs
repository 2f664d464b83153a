use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use bip32::DerivationPath;
use bip39::Mnemonic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::WalletSource;
use crate::error::Error;

/// HD Path prefix for Ethereum accounts (BIP-44)
const HD_PATH_PREFIX: &str = "m/44'/60'/0'/0/";

/// Local signer holding the account that sends transfers
#[derive(Clone)]
pub struct TransferWallet {
    /// The signing key
    signer: PrivateKeySigner,
    /// Derivation path, when created from a mnemonic
    derivation_path: Option<String>,
}

/// Wallet info that can be serialized safely
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    /// The EIP-55 checksummed address
    pub address: String,
    /// The derivation path, if any
    pub derivation_path: Option<String>,
}

impl fmt::Debug for TransferWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferWallet")
            .field("address", &self.address())
            .field("derivation_path", &self.derivation_path)
            .finish()
    }
}

impl TransferWallet {
    /// Create a new wallet from a mnemonic
    pub fn from_mnemonic(mnemonic: &str, account_index: u32) -> Result<Self, Error> {
        let mnemonic = Mnemonic::from_str(mnemonic.trim())
            .map_err(|e| Error::Wallet(format!("Invalid mnemonic: {}", e)))?;

        let seed = mnemonic.to_seed("");
        let seed = bip32::Seed::new(seed);

        let path = format!("{}{}", HD_PATH_PREFIX, account_index);
        let derivation = DerivationPath::from_str(&path)
            .map_err(|e| Error::Wallet(format!("Invalid derivation path: {}", e)))?;

        let derived_key = bip32::XPrv::derive_from_path(seed.as_bytes(), &derivation)
            .map_err(|e| Error::Wallet(format!("Key derivation error: {}", e)))?;

        let signer = PrivateKeySigner::from_slice(&derived_key.to_bytes())
            .map_err(|e| Error::Wallet(format!("Failed to create signer: {}", e)))?;

        Ok(Self {
            signer,
            derivation_path: Some(path),
        })
    }

    /// Create a wallet from a hex private key, with or without `0x`
    pub fn from_private_key(key: &str) -> Result<Self, Error> {
        let signer = PrivateKeySigner::from_str(key.trim())
            .map_err(|e| Error::Wallet(format!("Invalid private key: {}", e)))?;

        Ok(Self {
            signer,
            derivation_path: None,
        })
    }

    /// Create a wallet from a configured key source
    pub fn from_source(source: &WalletSource) -> Result<Self, Error> {
        match source {
            WalletSource::Mnemonic { phrase, index } => Self::from_mnemonic(phrase, *index),
            WalletSource::PrivateKey { key } => Self::from_private_key(key),
        }
    }

    /// Generate a new random wallet, returning it with its phrase
    pub fn generate() -> Result<(Self, String), Error> {
        use rand::{thread_rng, RngCore};

        // Generate 16 bytes (128 bits) of entropy for a 12-word mnemonic
        let mut entropy = [0u8; 16];
        thread_rng().fill_bytes(&mut entropy);

        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| Error::Wallet(format!("Failed to generate mnemonic: {}", e)))?;

        let phrase = mnemonic.to_string();
        let wallet = Self::from_mnemonic(&phrase, 0)?;

        Ok((wallet, phrase))
    }

    /// Get the wallet's address
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get access to the signer
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Hex-encoded private key with `0x` prefix
    pub fn export_private_key(&self) -> String {
        format!("0x{}", hex::encode(self.signer.to_bytes()))
    }

    /// Network wallet used by the provider's signing filler
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }

    /// Get wallet info
    pub fn info(&self) -> WalletInfo {
        WalletInfo {
            address: self.address().to_checksum(None),
            derivation_path: self.derivation_path.clone(),
        }
    }
}
