//! NFT sale watcher binary
//!
//! Checks connectivity to the ledger endpoint, then polls for new blocks
//! and posts every marketplace sale on the configured contract to a chat.

use anyhow::{Context, Result};
use clap::Parser;
use salewatch::config::{
    parse_address, TrackerConfig, DEFAULT_CHAIN_ID, DEFAULT_CONTRACT, DEFAULT_RPC_URL,
};
use salewatch::message::DEFAULT_COLLECTION;
use salewatch::{Ledger, LogNotifier, Notifier, Poller, RpcClient, TelegramNotifier};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// NFT marketplace sale watcher
#[derive(Parser)]
#[command(name = "salewatch")]
#[command(about = "Watch a marketplace contract and post NFT sales to a chat")]
struct Args {
    /// JSON-RPC endpoint URL
    #[arg(long, env = "HYPEREVM_RPC", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Marketplace contract address (any letter case)
    #[arg(long, env = "CONTRACT_ADDRESS", default_value = DEFAULT_CONTRACT)]
    contract: String,

    /// Expected chain id (only checked at startup)
    #[arg(long, env = "CHAIN_ID", default_value_t = DEFAULT_CHAIN_ID)]
    chain_id: u64,

    /// Chat that receives notifications
    #[arg(long, env = "CHAT_ID", required_unless_present = "dry_run")]
    chat_id: Option<String>,

    /// Telegram bot token
    #[arg(
        long,
        env = "BOT_TOKEN",
        hide_env_values = true,
        required_unless_present = "dry_run"
    )]
    bot_token: Option<String>,

    /// Collection name at the start of each message
    #[arg(long, env = "COLLECTION_NAME", default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Seconds between poll cycles
    #[arg(long, default_value_t = 5)]
    poll_interval_secs: u64,

    /// Seconds to wait after a failed cycle
    #[arg(long, default_value_t = 15)]
    backoff_secs: u64,

    /// Upper bound for the wait after repeated failures
    #[arg(long, default_value_t = 120)]
    max_backoff_secs: u64,

    /// Timeout for each RPC and chat request
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Log messages instead of sending them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let contract = parse_address(&args.contract).context("Invalid contract address")?;
    let timeout = Duration::from_secs(args.request_timeout_secs);

    let mut config = TrackerConfig::new(
        contract,
        args.chat_id.clone().unwrap_or_else(|| "dry-run".to_string()),
    );
    config.collection = args.collection.clone();
    config.poll_interval = Duration::from_secs(args.poll_interval_secs);
    config.backoff_initial = Duration::from_secs(args.backoff_secs);
    config.backoff_max = Duration::from_secs(args.max_backoff_secs);

    info!("Initializing NFT sale watcher");
    info!("Target contract: 0x{:x}", contract);

    let rpc = RpcClient::new(args.rpc_url.clone(), timeout).context("Failed to build RPC client")?;
    verify_connection(&rpc, args.chain_id)
        .await
        .context("Cannot proceed without a ledger connection")?;

    if args.dry_run {
        info!("Dry run: notifications are logged, not sent");
        return watch(rpc, LogNotifier, config).await;
    }

    let token = args.bot_token.as_deref().context("BOT_TOKEN is required")?;
    let notifier =
        TelegramNotifier::new(token, timeout).context("Failed to build Telegram client")?;
    watch(rpc, notifier, config).await
}

/// Probe the endpoint once; failure here ends the process.
async fn verify_connection(rpc: &RpcClient, expected_chain_id: u64) -> Result<()> {
    let chain_id = rpc.chain_id().await.context("Failed to read chain id")?;
    let head = rpc
        .block_number()
        .await
        .context("Failed to read latest block")?;

    info!("Connected to {}", rpc.url());
    info!("Chain ID: {}", chain_id);
    info!("Latest block: {}", head);

    if chain_id != expected_chain_id {
        warn!(
            expected = expected_chain_id,
            actual = chain_id,
            "Endpoint reports a different chain id than configured"
        );
    }
    Ok(())
}

async fn watch<N: Notifier>(rpc: RpcClient, notifier: N, config: TrackerConfig) -> Result<()> {
    let mut poller = Poller::start(rpc, notifier, config)
        .await
        .context("Failed to read starting block")?;

    // Handle Ctrl+C; there is no state to flush.
    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    info!("Watcher stopped");
    Ok(())
}
