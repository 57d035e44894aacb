//! Tracker configuration
//!
//! Values are supplied once at startup (see `main.rs` for the command line
//! and environment surface); there is no reload.

use crate::message::DEFAULT_COLLECTION;
use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::time::Duration;

/// Marketplace contract watched by default.
pub const DEFAULT_CONTRACT: &str = "0xb6c73F6c09f850651DCb6D62a4D3A7F25e0016C4";

/// Default HyperEVM JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://rpc.hyperliquid.xyz/evm";

/// HyperEVM mainnet chain id.
pub const DEFAULT_CHAIN_ID: u64 = 999;

/// Settings the poller runs with.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Marketplace contract whose transactions are analyzed
    pub contract: Address,
    /// Collection name at the start of every message
    pub collection: String,
    /// Chat id messages are sent to
    pub destination: String,
    /// Sleep between successful cycles
    pub poll_interval: Duration,
    /// First delay after a failed cycle
    pub backoff_initial: Duration,
    /// Upper bound for the delay after repeated failures
    pub backoff_max: Duration,
}

impl TrackerConfig {
    /// Config with the default collection name and timings.
    pub fn new(contract: Address, destination: impl Into<String>) -> Self {
        Self {
            contract,
            collection: DEFAULT_COLLECTION.to_string(),
            destination: destination.into(),
            poll_interval: Duration::from_secs(5),
            backoff_initial: Duration::from_secs(15),
            backoff_max: Duration::from_secs(120),
        }
    }
}

/// Parse an address from a hex string.
///
/// Accepts addresses with or without 0x prefix, in any letter case.
pub fn parse_address(s: &str) -> Result<Address> {
    let hex_str = s.trim();
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let bytes = hex::decode(hex_str).with_context(|| format!("Invalid hex address: {}", s))?;

    if bytes.len() != 20 {
        anyhow::bail!(
            "Address must be 20 bytes (40 hex chars), got {} bytes",
            bytes.len()
        );
    }

    Ok(Address::from_slice(&bytes))
}
