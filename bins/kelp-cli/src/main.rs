//! kelp — developer command-line utilities for the Kelp coin-set engine.
//!
//! Converts between puzzle hashes and Bech32m addresses and generates
//! throwaway keys for local experiments. Everything ledger-shaped lives in
//! the library crates; this is display glue.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use kelp_core::address::{Address, Network};
use kelp_core::crypto::KeyPair;
use kelp_core::types::{Hash256, Program};
use kelp_wallet::{KeyStore, Seed};

/// Developer tooling for the Kelp coin-set engine.
#[derive(Parser)]
#[command(name = "kelp")]
#[command(version, about = "Developer tooling for the Kelp coin-set engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a puzzle hash as a Bech32m address.
    Encode {
        /// 32-byte puzzle hash, hex (optionally 0x-prefixed).
        puzzle_hash: String,
        /// Address prefix: "kelp" (mainnet) or "tkelp" (testnet).
        #[arg(short, long, default_value = "kelp")]
        prefix: String,
    },
    /// Decode a Bech32m address back to its puzzle hash.
    Decode {
        /// The address to decode.
        address: String,
    },
    /// Generate a keypair and print its key, puzzle hash, and address.
    Keygen {
        /// Address prefix: "kelp" (mainnet) or "tkelp" (testnet).
        #[arg(short, long, default_value = "kelp")]
        prefix: String,
        /// Derive deterministically from a hex seed instead of the OS RNG.
        #[arg(short, long)]
        seed: Option<String>,
        /// Derivation index when a seed is given.
        #[arg(short, long, default_value_t = 0)]
        index: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Encode {
            puzzle_hash,
            prefix,
        } => {
            let network = Network::from_hrp(&prefix).context("unknown address prefix")?;
            let hash = Hash256::from_hex(&puzzle_hash).context("invalid puzzle hash")?;
            println!("{}", Address::from_puzzle_hash(hash, network));
        }
        Commands::Decode { address } => {
            let addr: Address = address.parse().context("invalid address")?;
            println!("{}", addr.puzzle_hash());
        }
        Commands::Keygen {
            prefix,
            seed,
            index,
        } => {
            let network = Network::from_hrp(&prefix).context("unknown address prefix")?;
            let keypair = match seed {
                Some(seed_hex) => {
                    let bytes = hex::decode(seed_hex.trim_start_matches("0x"))
                        .context("seed must be hex")?;
                    let bytes: [u8; 32] = match bytes.try_into() {
                        Ok(b) => b,
                        Err(_) => bail!("seed must be exactly 32 bytes"),
                    };
                    let mut store = KeyStore::new(Seed::from_bytes(bytes));
                    store.derive(index).clone()
                }
                None => KeyPair::generate(),
            };
            let puzzle_hash = Program::pay_to_public_key(&keypair.public_key()).puzzle_hash();
            println!("public key:  {}", keypair.public_key());
            println!("puzzle hash: {puzzle_hash}");
            println!(
                "address:     {}",
                Address::from_puzzle_hash(puzzle_hash, network)
            );
        }
    }
    Ok(())
}
