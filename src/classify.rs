//! Transaction classifier
//!
//! Turns the receipt of a successful call to the marketplace contract into
//! domain events. Marketplace events are decoded through their schema; bare
//! NFT `Transfer` logs from the contract only contribute token ids to a
//! generic fallback event. Logs that fail to decode are skipped.

use crate::amount::NativeAmount;
use crate::event::{DomainEvent, GenericTransfer};
use crate::schema::{decode, schema_for, TRANSFER_TOPIC};
use crate::types::{Log, Receipt, Transaction};
use alloy_primitives::{Address, U256};
use tracing::warn;

/// Topics on an ERC-721 Transfer: signature, from, to, tokenId.
const NFT_TRANSFER_TOPICS: usize = 4;

/// Token id of an ERC-721 Transfer emitted by `contract`, if `log` is one.
///
/// ERC-20 transfers carry three topics and are not matched.
pub fn nft_transfer_token_id(contract: Address, log: &Log) -> Option<U256> {
    if log.address != contract
        || log.topics.len() != NFT_TRANSFER_TOPICS
        || log.topics[0] != TRANSFER_TOPIC
    {
        return None;
    }
    Some(U256::from_be_slice(log.topics[3].as_slice()))
}

/// Classify a confirmed transaction into domain events, in log order.
///
/// Failed transactions yield nothing.
pub fn classify(contract: Address, tx: &Transaction, receipt: &Receipt) -> Vec<DomainEvent> {
    if !receipt.is_success() {
        return Vec::new();
    }

    let mut events = Vec::new();
    let mut token_ids = Vec::new();

    for (log_index, log) in receipt.logs.iter().enumerate() {
        if let Some(token_id) = nft_transfer_token_id(contract, log) {
            token_ids.push(token_id);
            continue;
        }

        let Some(schema) = log.topic0().and_then(schema_for) else {
            continue;
        };

        match decode(schema, log) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!(
                    tx = %tx.hash,
                    log_index,
                    event = schema.name(),
                    error = %e,
                    "Skipping undecodable log"
                );
            }
        }
    }

    if events.is_empty() && !token_ids.is_empty() {
        events.push(DomainEvent::GenericTransfer(GenericTransfer {
            token_ids,
            seller: tx.from.into(),
            buyer: tx.to.into(),
            price: NativeAmount::from_raw(tx.value),
        }));
    }

    events
}
