//! Error types
//!
//! Errors are split by how the poller reacts to them: transient ledger
//! failures are retried after a backoff, per-item failures are logged and
//! skipped, and fatal failures stop the process before the loop starts.

use alloy_primitives::B256;
use thiserror::Error;

/// Errors returned by the JSON-RPC ledger client.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport failure (connection refused, timeout, non-JSON body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Node { code: i64, message: String },

    /// Response had neither `result` nor `error`.
    #[error("RPC response missing 'result' field")]
    MissingResult,

    /// `result` did not match the expected shape.
    #[error("failed to deserialize RPC result: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// A quantity field was not valid hex.
    #[error("invalid hex quantity: {0}")]
    InvalidHex(String),
}

/// A log matched an event signature but its layout could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{event}: topic {index} missing (log has {found} topics)")]
    MissingTopic {
        event: &'static str,
        index: usize,
        found: usize,
    },

    #[error("{event}: payload has {found} words, need {needed}")]
    ShortPayload {
        event: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("{event}: layout does not provide field {field}")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },
}

/// Errors from the chat notification channel.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("message rejected ({status}): {description}")]
    Rejected { status: u16, description: String },
}

/// How the poller reacts to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Retry the whole cycle after a backoff; cursor untouched.
    Transient,
    /// Skip the block or transaction and continue with the next one.
    Item,
    /// Give up before entering the loop.
    Fatal,
}

/// Errors raised inside the poller.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("ledger unavailable: {0}")]
    Transient(#[source] RpcError),

    #[error("block {height} failed: {source}")]
    Block { height: u64, source: RpcError },

    #[error("block {height} not found")]
    MissingBlock { height: u64 },

    #[error("transaction {hash} failed: {source}")]
    Transaction { hash: B256, source: RpcError },

    #[error("receipt for {hash} not found")]
    MissingReceipt { hash: B256 },

    #[error("startup probe failed: {0}")]
    Fatal(#[source] RpcError),
}

impl PollError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transient(_) => ErrorKind::Transient,
            Self::Block { .. }
            | Self::MissingBlock { .. }
            | Self::Transaction { .. }
            | Self::MissingReceipt { .. } => ErrorKind::Item,
            Self::Fatal(_) => ErrorKind::Fatal,
        }
    }
}
