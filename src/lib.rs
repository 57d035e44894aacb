//! salewatch - NFT marketplace sale notifier
//!
//! Polls an EVM chain for transactions to a marketplace contract, decodes
//! `ItemSold` and `BidAccepted` events from their receipts, and sends one
//! chat message per sale.

pub mod amount;
pub mod backoff;
pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod fee;
pub mod message;
pub mod notify;
pub mod poller;
pub mod rpc;
pub mod schema;
pub mod types;

#[cfg(test)]
mod testutil;

// Re-export the main types for convenience
pub use amount::NativeAmount;
pub use classify::classify;
pub use config::TrackerConfig;
pub use error::{DecodeError, ErrorKind, NotifyError, PollError, RpcError};
pub use event::{BidAcceptance, DomainEvent, EventKind, GenericTransfer, Party, Sale};
pub use notify::{LogNotifier, Notifier, TelegramNotifier};
pub use poller::{CycleReport, Poller};
pub use rpc::{Ledger, RpcClient};
