//! Fixtures shared by unit tests.

use crate::schema::{ITEM_SOLD_TOPIC, TRANSFER_TOPIC};
use crate::types::{Block, Log, Receipt, Transaction};
use alloy_primitives::{address, Address, B256, U256};

pub const CONTRACT: Address = address!("b6c73f6c09f850651dcb6d62a4d3a7f25e0016c4");
pub const BUYER: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const NFT: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
pub const SELLER: Address = address!("cccccccccccccccccccccccccccccccccccccccc");
pub const BIDDER: Address = address!("dddddddddddddddddddddddddddddddddddddddd");
pub const SENDER: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

/// A big-endian 32-byte word.
pub fn word(value: u128) -> [u8; 32] {
    U256::from(value).to_be_bytes()
}

/// An address left-padded into a topic.
pub fn address_topic(addr: Address) -> B256 {
    let mut topic = [0u8; 32];
    topic[12..].copy_from_slice(addr.as_slice());
    B256::from(topic)
}

pub fn log(address: Address, topics: Vec<B256>, words: &[[u8; 32]]) -> Log {
    Log {
        address,
        topics,
        data: words.concat(),
    }
}

/// Well-formed ItemSold log with BUYER / NFT / SELLER topics.
pub fn item_sold_log(price: u128, quantity: u128, token_id: u128) -> Log {
    log(
        CONTRACT,
        vec![
            ITEM_SOLD_TOPIC,
            address_topic(BUYER),
            address_topic(NFT),
            address_topic(SELLER),
        ],
        &[word(price), word(quantity), word(token_id)],
    )
}

/// ERC-721 Transfer of `token_id` emitted by `emitter`.
pub fn transfer_log(emitter: Address, token_id: u128) -> Log {
    log(
        emitter,
        vec![
            TRANSFER_TOPIC,
            address_topic(SELLER),
            address_topic(BUYER),
            B256::from(word(token_id)),
        ],
        &[],
    )
}

pub fn tx(seed: u8, to: Option<Address>, value: u128) -> Transaction {
    Transaction {
        hash: B256::from([seed; 32]),
        from: SENDER,
        to,
        value: U256::from(value),
        gas_price: Some(U256::from(1_000_000_000u64)),
        max_fee_per_gas: None,
        max_priority_fee_per_gas: None,
        input: vec![0x12, 0x34, 0x56, 0x78],
    }
}

pub fn receipt(status: u64, logs: Vec<Log>) -> Receipt {
    Receipt {
        status,
        gas_used: U256::from(100_000u64),
        effective_gas_price: None,
        logs,
    }
}

pub fn block(number: u64, transactions: Vec<Transaction>) -> Block {
    Block {
        number,
        hash: B256::from(word(number as u128)),
        base_fee_per_gas: None,
        transactions,
    }
}
