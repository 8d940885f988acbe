//! BestBid CLI - Main entry point

use bestbid_core::Party;
use bestbid_ledger::{PartySigner, Signer};
use bestbid_rpc::config::key_env_var;
use bestbid_rpc::{commands, AppContext, NodeConfig};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bestbid")]
#[command(about = "BestBid - auction settlement ledger", long_about = None)]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory path (overrides config)
    #[arg(short, long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a new auction item
    Issue {
        /// Item ID
        item_id: String,
        /// Minimum bid
        minimum_bid: Decimal,
    },

    /// Add funds to a wallet address
    AddFunds {
        /// Wallet address
        address: String,
        /// Amount to add
        amount: Decimal,
    },

    /// Place a bid on an item
    Bid {
        /// Item ID
        item_id: String,
        /// Bidder wallet address
        address: String,
        /// Bid amount
        amount: Decimal,
    },

    /// End the auction for an item
    EndAuction {
        /// Item ID
        item_id: String,
    },

    /// Show current funds accounts
    Funds {
        /// Only this address
        address: Option<String>,
    },

    /// Show current auction items
    Items {
        /// Only this item
        item_id: Option<String>,
    },

    /// Show every version of an item
    History {
        /// Item ID
        item_id: String,
    },

    /// Audit the journal (hash chain and signatures)
    Audit,

    /// Generate a signer key for a party
    Keygen {
        /// Party name
        #[arg(long, default_value = "PartyA")]
        party: String,
        /// Output file path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    if let Commands::Keygen { party, output } = &cli.command {
        let signer = PartySigner::generate(Party::new(party.as_str()));
        let seed = signer.seed_hex();

        println!("✅ Generated signer key for {}", party);
        if let Some(output) = output {
            std::fs::write(output, &seed)?;
            println!("   Private key saved to: {}", output.display());
        }
        println!("   Public key: {}", signer.public_key_hex());
        println!();
        println!("To use: export {}={}", key_env_var(party), seed);
        return Ok(());
    }

    let mut config = NodeConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_dir = data;
    }

    let ctx = AppContext::new(config).await?;

    match cli.command {
        Commands::Issue {
            item_id,
            minimum_bid,
        } => commands::issue(&ctx, &item_id, minimum_bid).await?,

        Commands::AddFunds { address, amount } => {
            commands::add_funds(&ctx, &address, amount).await?
        }

        Commands::Bid {
            item_id,
            address,
            amount,
        } => commands::bid(&ctx, &item_id, &address, amount).await?,

        Commands::EndAuction { item_id } => commands::end_auction(&ctx, &item_id).await?,

        Commands::Funds { address } => commands::funds(&ctx, address.as_deref()).await?,

        Commands::Items { item_id } => commands::items(&ctx, item_id.as_deref()).await?,

        Commands::History { item_id } => commands::history(&ctx, &item_id).await?,

        Commands::Audit => {
            commands::audit(&ctx)?;
        }

        Commands::Keygen { .. } => {}
    }

    Ok(())
}
