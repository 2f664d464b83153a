use clap::Parser;
use token_transfer_sdk::{TransferWallet, WalletSource};

/// Print the address of a wallet, or generate a new one
#[derive(Parser)]
#[command(name = "get-wallet-address")]
#[command(version)]
struct Args {
    /// BIP-39 mnemonic
    #[arg(long, conflicts_with = "private_key")]
    mnemonic: Option<String>,

    /// Account index used with --mnemonic
    #[arg(long, default_value = "0")]
    index: u32,

    /// Hex private key
    #[arg(long)]
    private_key: Option<String>,

    /// Also print the hex private key
    #[arg(long)]
    show_key: bool,

    /// Print wallet info as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let source = match (args.mnemonic, args.private_key) {
        (Some(phrase), _) => Some(WalletSource::Mnemonic {
            phrase,
            index: args.index,
        }),
        (None, Some(key)) => Some(WalletSource::PrivateKey { key }),
        (None, None) => None,
    };

    let wallet = match source {
        Some(source) => TransferWallet::from_source(&source)?,
        None => {
            let (wallet, phrase) = TransferWallet::generate()?;
            println!("Generated a new wallet. Store this mnemonic safely:");
            println!("{}", phrase);
            println!();
            wallet
        }
    };

    let info = wallet.info();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Address: {}", info.address);
    if let Some(path) = &info.derivation_path {
        println!("Derivation path: {}", path);
    }
    if args.show_key {
        println!("Private key: {}", wallet.export_private_key());
    }

    Ok(())
}
