//! Block poller and catch-up loop
//!
//! Tracks the last fully processed block height, catches up to the chain
//! head each cycle, and turns qualifying transactions into notifications.
//! Blocks and transactions are handled strictly in chain order.

use crate::backoff::Backoff;
use crate::classify::classify;
use crate::config::TrackerConfig;
use crate::error::PollError;
use crate::fee::gas_cost;
use crate::message::render;
use crate::notify::Notifier;
use crate::rpc::Ledger;
use crate::types::{Block, Transaction};
use tracing::{debug, error, info, warn};

/// Outcome of one catch-up cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Cursor after the cycle
    pub cursor: u64,
    /// Blocks visited (including ones that failed)
    pub blocks: u64,
    /// Notifications delivered
    pub notifications: usize,
}

/// Polls the ledger and notifies on marketplace activity.
pub struct Poller<L, N> {
    ledger: L,
    notifier: N,
    config: TrackerConfig,
    /// Height of the last fully processed block
    cursor: u64,
    backoff: Backoff,
}

impl<L: Ledger, N: Notifier> Poller<L, N> {
    /// Create a poller whose cursor starts at the current chain head.
    ///
    /// Blocks at or below the head are never processed.
    pub async fn start(ledger: L, notifier: N, config: TrackerConfig) -> Result<Self, PollError> {
        let head = ledger.block_number().await.map_err(PollError::Fatal)?;
        info!(
            head,
            contract = %config.contract,
            "Poller starting at current head"
        );
        Ok(Self::with_cursor(ledger, notifier, config, head))
    }

    /// Create a poller with an explicit cursor.
    pub fn with_cursor(ledger: L, notifier: N, config: TrackerConfig, cursor: u64) -> Self {
        let backoff = Backoff::new(config.backoff_initial, config.backoff_max);
        Self {
            ledger,
            notifier,
            config,
            cursor,
            backoff,
        }
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run the main loop. Never returns.
    ///
    /// Successful cycles are followed by the poll interval; failed ones by
    /// the backoff delay, after which the same range is attempted again.
    pub async fn run(&mut self) {
        info!("Starting poll loop...");

        loop {
            let delay = match self.run_cycle().await {
                Ok(report) => {
                    self.backoff.reset();
                    if report.notifications > 0 {
                        info!(
                            cursor = report.cursor,
                            blocks = report.blocks,
                            notifications = report.notifications,
                            "Cycle complete"
                        );
                    }
                    self.config.poll_interval
                }
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    error!(
                        error = %e,
                        kind = ?e.kind(),
                        cursor = self.cursor,
                        retry_in_secs = delay.as_secs(),
                        "Poll cycle failed, backing off"
                    );
                    delay
                }
            };

            tokio::time::sleep(delay).await;
        }
    }

    /// Catch up from the cursor to the current head.
    ///
    /// Visits every height in `(cursor, head]` in ascending order, then sets
    /// the cursor to `head`. Only a failure to read the head is returned; a
    /// failed block or transaction is logged and skipped.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, PollError> {
        let head = self
            .ledger
            .block_number()
            .await
            .map_err(PollError::Transient)?;

        if head < self.cursor {
            warn!(
                cursor = self.cursor,
                head, "Endpoint reported a head behind the cursor, waiting"
            );
        }
        if head <= self.cursor {
            debug!(cursor = self.cursor, head, "Up to date");
            return Ok(CycleReport {
                cursor: self.cursor,
                blocks: 0,
                notifications: 0,
            });
        }

        let from = self.cursor + 1;
        debug!(from, to = head, "New blocks available");

        let mut notifications = 0;
        for height in from..=head {
            match self.process_block(height).await {
                Ok(sent) => notifications += sent,
                Err(e) => error!(block = height, error = %e, "Skipping block"),
            }
        }

        self.cursor = head;
        Ok(CycleReport {
            cursor: head,
            blocks: head - from + 1,
            notifications,
        })
    }

    /// Analyze every transaction in `height` addressed to the contract.
    ///
    /// Returns the number of notifications delivered.
    pub async fn process_block(&self, height: u64) -> Result<usize, PollError> {
        let block = self
            .ledger
            .block_with_transactions(height)
            .await
            .map_err(|source| PollError::Block { height, source })?
            .ok_or(PollError::MissingBlock { height })?;

        let mut sent = 0;
        for tx in block
            .transactions
            .iter()
            .filter(|tx| tx.is_to(self.config.contract))
        {
            match self.analyze_transaction(&block, tx).await {
                Ok(n) => sent += n,
                Err(e) => error!(
                    block = height,
                    tx = %tx.hash,
                    error = %e,
                    "Skipping transaction"
                ),
            }
        }

        Ok(sent)
    }

    /// Fetch the receipt of one contract call, classify it and notify.
    async fn analyze_transaction(&self, block: &Block, tx: &Transaction) -> Result<usize, PollError> {
        if tx.selector().is_none() {
            debug!(tx = %tx.hash, "No function selector, skipping");
            return Ok(0);
        }

        let receipt = self
            .ledger
            .transaction_receipt(tx.hash)
            .await
            .map_err(|source| PollError::Transaction {
                hash: tx.hash,
                source,
            })?
            .ok_or(PollError::MissingReceipt { hash: tx.hash })?;

        if !receipt.is_success() {
            debug!(tx = %tx.hash, "Transaction reverted, skipping");
            return Ok(0);
        }

        let events = classify(self.config.contract, tx, &receipt);
        let gas = gas_cost(tx, &receipt, block).map(|cost| cost.to_string());

        let mut sent = 0;
        for event in &events {
            let text = render(&self.config.collection, event);
            match self.notifier.send(&self.config.destination, &text).await {
                Ok(()) => {
                    sent += 1;
                    info!(
                        kind = %event.kind(),
                        token = %event.token_label(),
                        tx = %tx.hash,
                        block = block.number,
                        gas_used = %receipt.gas_used,
                        gas_cost = gas.as_deref().unwrap_or("unknown"),
                        "Sent notification"
                    );
                }
                Err(e) => error!(
                    kind = %event.kind(),
                    tx = %tx.hash,
                    error = %e,
                    "Failed to send notification"
                ),
            }
        }

        Ok(sent)
    }
}
