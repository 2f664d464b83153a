mod utils;

use token_transfer_sdk::{Error, TransferWallet, WalletSource};
use utils::test_utils::{TEST_ACCOUNT_0, TEST_ACCOUNT_1, TEST_MNEMONIC, TEST_PRIVATE_KEY_0};

#[test]
fn test_wallet_from_mnemonic_derives_standard_accounts() {
    let first = TransferWallet::from_mnemonic(TEST_MNEMONIC, 0).unwrap();
    assert_eq!(first.address().to_checksum(None), TEST_ACCOUNT_0);

    let second = TransferWallet::from_mnemonic(TEST_MNEMONIC, 1).unwrap();
    assert_eq!(second.address().to_checksum(None), TEST_ACCOUNT_1);

    let info = second.info();
    assert_eq!(info.address, TEST_ACCOUNT_1);
    assert_eq!(info.derivation_path.as_deref(), Some("m/44'/60'/0'/0/1"));
}

#[test]
fn test_wallet_from_private_key() {
    let wallet = TransferWallet::from_private_key(TEST_PRIVATE_KEY_0).unwrap();
    assert_eq!(wallet.address().to_checksum(None), TEST_ACCOUNT_0);
    assert!(wallet.info().derivation_path.is_none());
    assert_eq!(wallet.export_private_key(), TEST_PRIVATE_KEY_0);

    let unprefixed = TransferWallet::from_private_key(&TEST_PRIVATE_KEY_0[2..]).unwrap();
    assert_eq!(unprefixed.address(), wallet.address());
}

#[test]
fn test_wallet_from_source() {
    let source = WalletSource::Mnemonic {
        phrase: TEST_MNEMONIC.to_string(),
        index: 0,
    };
    let wallet = TransferWallet::from_source(&source).unwrap();
    assert_eq!(wallet.address().to_checksum(None), TEST_ACCOUNT_0);
}

#[test]
fn test_invalid_key_material_is_a_wallet_error() {
    assert!(matches!(
        TransferWallet::from_mnemonic("not a real mnemonic", 0),
        Err(Error::Wallet(_))
    ));
    assert!(matches!(
        TransferWallet::from_private_key("0xzz"),
        Err(Error::Wallet(_))
    ));
}

#[test]
fn test_wallet_generate() {
    let (wallet, phrase) = TransferWallet::generate().unwrap();
    assert_eq!(phrase.split_whitespace().count(), 12);

    let restored = TransferWallet::from_mnemonic(&phrase, 0).unwrap();
    assert_eq!(restored.address(), wallet.address());
}

#[test]
fn test_debug_output_hides_key() {
    let wallet = TransferWallet::from_private_key(TEST_PRIVATE_KEY_0).unwrap();
    let debug = format!("{:?}", wallet);
    assert!(!debug.contains(&TEST_PRIVATE_KEY_0[2..]));
}
