//! Ledger JSON-RPC types
//!
//! Type definitions for blocks, transactions, receipts and logs
//! returned from EVM JSON-RPC endpoints.

use alloy_primitives::{Address, B256, U256};
use serde::{de, Deserialize, Deserializer};

/// Size of one ABI word in a log payload.
pub const WORD: usize = 32;

/// Block with full transaction bodies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block number (hex string in JSON, parsed to u64)
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub number: u64,

    /// Block hash (hex string in JSON)
    #[serde(deserialize_with = "deserialize_hex_b256")]
    pub hash: B256,

    /// Base fee per gas (EIP-1559, hex string in JSON)
    #[serde(default, deserialize_with = "deserialize_hex_u256_opt")]
    pub base_fee_per_gas: Option<U256>,

    /// Transactions in block order
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// A transaction as returned inside a full block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_hex_b256")]
    pub hash: B256,

    #[serde(deserialize_with = "deserialize_hex_address")]
    pub from: Address,

    /// Recipient address (None for contract creation)
    #[serde(default, deserialize_with = "deserialize_hex_address_opt")]
    pub to: Option<Address>,

    /// Declared native value in the smallest unit
    #[serde(deserialize_with = "deserialize_hex_u256")]
    pub value: U256,

    #[serde(default, deserialize_with = "deserialize_hex_u256_opt")]
    pub gas_price: Option<U256>,

    #[serde(default, deserialize_with = "deserialize_hex_u256_opt")]
    pub max_fee_per_gas: Option<U256>,

    #[serde(default, deserialize_with = "deserialize_hex_u256_opt")]
    pub max_priority_fee_per_gas: Option<U256>,

    /// Call data ("0x" for plain value transfers)
    #[serde(deserialize_with = "deserialize_hex_bytes")]
    pub input: Vec<u8>,
}

impl Transaction {
    /// Whether this transaction is addressed to `contract`.
    ///
    /// Addresses compare as raw bytes, so hex casing never matters.
    pub fn is_to(&self, contract: Address) -> bool {
        self.to == Some(contract)
    }

    /// The 4-byte function selector, if the input carries one.
    pub fn selector(&self) -> Option<[u8; 4]> {
        let head = self.input.get(..4)?;
        let mut selector = [0u8; 4];
        selector.copy_from_slice(head);
        Some(selector)
    }

    /// Legacy transactions carry `gasPrice` and no `maxFeePerGas`.
    pub fn is_legacy(&self) -> bool {
        self.gas_price.is_some() && self.max_fee_per_gas.is_none()
    }

    pub fn is_eip1559(&self) -> bool {
        self.max_fee_per_gas.is_some()
    }
}

/// Log entry emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Log {
    /// Address of the contract that emitted the log
    #[serde(deserialize_with = "deserialize_hex_address")]
    pub address: Address,

    /// Indexed topics (topic0 = event signature, topics[1..] = indexed params)
    #[serde(default, deserialize_with = "deserialize_hex_b256_vec")]
    pub topics: Vec<B256>,

    /// Non-indexed event data
    #[serde(deserialize_with = "deserialize_hex_bytes")]
    pub data: Vec<u8>,
}

impl Log {
    /// The event signature hash, if the log has any topics.
    pub fn topic0(&self) -> Option<&B256> {
        self.topics.first()
    }

    /// Number of complete 32-byte words in the payload.
    pub fn word_count(&self) -> usize {
        self.data.len() / WORD
    }

    /// The `index`-th 32-byte word of the payload.
    pub fn word(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(WORD)?;
        self.data.get(start..start + WORD)
    }
}

/// Transaction receipt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Transaction status: 1 = success, 0 = failure (hex string in JSON)
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub status: u64,

    #[serde(deserialize_with = "deserialize_hex_u256")]
    pub gas_used: U256,

    /// Effective gas price (post-London)
    #[serde(default, deserialize_with = "deserialize_hex_u256_opt")]
    pub effective_gas_price: Option<U256>,

    /// Logs emitted during execution (empty for reverted txs)
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == 1
    }
}

// Hex decoding shared by the deserializers below. Quantities come back
// without leading zeros, so odd-length strings get a zero nibble prepended.

fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    }
}

fn hex_to_u256<E: de::Error>(s: &str) -> Result<U256, E> {
    let bytes = decode_hex(s).map_err(E::custom)?;
    if bytes.len() > 32 {
        return Err(E::custom("quantity exceeds 256 bits"));
    }
    Ok(U256::from_be_slice(&bytes))
}

fn hex_to_b256<E: de::Error>(s: &str, what: &str) -> Result<B256, E> {
    let bytes = decode_hex(s).map_err(E::custom)?;
    if bytes.len() != 32 {
        return Err(E::custom(format!("{what}: want 32 bytes, got {}", bytes.len())));
    }
    Ok(B256::from_slice(&bytes))
}

fn hex_to_address<E: de::Error>(s: &str) -> Result<Address, E> {
    let bytes = decode_hex(s).map_err(E::custom)?;
    if bytes.len() != 20 {
        return Err(E::custom(format!("address: want 20 bytes, got {}", bytes.len())));
    }
    Ok(Address::from_slice(&bytes))
}

/// Parse a hex quantity (e.g. `"0x1b4"`) to u64.
pub fn parse_hex_u64(s: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16)
}

fn deserialize_hex_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    parse_hex_u64(&String::deserialize(d)?).map_err(de::Error::custom)
}

fn deserialize_hex_u256<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
    hex_to_u256(&String::deserialize(d)?)
}

fn deserialize_hex_u256_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<U256>, D::Error> {
    Option::<String>::deserialize(d)?
        .map(|s| hex_to_u256(&s))
        .transpose()
}

fn deserialize_hex_b256<'de, D: Deserializer<'de>>(d: D) -> Result<B256, D::Error> {
    hex_to_b256(&String::deserialize(d)?, "hash")
}

fn deserialize_hex_b256_vec<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<B256>, D::Error> {
    Vec::<String>::deserialize(d)?
        .iter()
        .map(|s| hex_to_b256::<D::Error>(s, "topic"))
        .collect()
}

fn deserialize_hex_address<'de, D: Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
    hex_to_address(&String::deserialize(d)?)
}

/// Contract creations report `to` as null (some nodes send `"0x"`).
fn deserialize_hex_address_opt<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Address>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(s) if !s.trim_start_matches("0x").is_empty() => hex_to_address(&s).map(Some),
        _ => Ok(None),
    }
}

fn deserialize_hex_bytes<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
    decode_hex(&String::deserialize(d)?).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use serde_json::json;

    #[test]
    fn test_deserialize_block_with_transactions() {
        let raw = json!({
            "number": "0x1b4",
            "hash": "0x88e96d4537bea4d9c05d12549907b32561d3bf31f45aae734cdc119f13406cb6",
            "baseFeePerGas": "0x7",
            "transactions": [{
                "hash": "0x0000000000000000000000000000000000000000000000000000000000000abc",
                "from": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "to": "0xb6c73F6c09f850651DCb6D62a4D3A7F25e0016C4",
                "value": "0xde0b6b3a7640000",
                "gasPrice": "0x3b9aca00",
                "input": "0x12345678"
            }, {
                "hash": "0x0000000000000000000000000000000000000000000000000000000000000def",
                "from": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "to": null,
                "value": "0x0",
                "input": "0x"
            }]
        });

        let block: Block = serde_json::from_value(raw).unwrap();
        assert_eq!(block.number, 436);
        assert_eq!(block.base_fee_per_gas, Some(U256::from(7u64)));
        assert_eq!(block.transactions.len(), 2);

        let tx = &block.transactions[0];
        assert!(tx.is_to(address!("b6c73f6c09f850651dcb6d62a4d3a7f25e0016c4")));
        assert_eq!(tx.value, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(tx.selector(), Some([0x12, 0x34, 0x56, 0x78]));
        assert!(tx.is_legacy());

        let creation = &block.transactions[1];
        assert_eq!(creation.to, None);
        assert_eq!(creation.selector(), None);
        assert!(creation.gas_price.is_none());
    }

    #[test]
    fn test_deserialize_receipt_with_logs() {
        let raw = json!({
            "status": "0x1",
            "gasUsed": "0x5208",
            "logs": [{
                "address": "0xb6c73f6c09f850651dcb6d62a4d3a7f25e0016c4",
                "topics": [
                    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
                    "0x0000000000000000000000000000000000000000000000000000000000000000"
                ],
                "data": "0x000000000000000000000000000000000000000000000000000000000000002a"
            }]
        });

        let receipt: Receipt = serde_json::from_value(raw).unwrap();
        assert!(receipt.is_success());
        assert_eq!(receipt.gas_used, U256::from(21000u64));
        assert_eq!(receipt.effective_gas_price, None);

        let log = &receipt.logs[0];
        assert_eq!(log.topics.len(), 2);
        assert_eq!(log.word_count(), 1);
        assert_eq!(log.word(0).map(U256::from_be_slice), Some(U256::from(42u64)));
        assert!(log.word(1).is_none());
    }

    #[test]
    fn test_rejects_short_topic() {
        let raw = json!({
            "address": "0xb6c73f6c09f850651dcb6d62a4d3a7f25e0016c4",
            "topics": ["0xdeadbeef"],
            "data": "0x"
        });
        assert!(serde_json::from_value::<Log>(raw).is_err());
    }

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x10").unwrap(), 16);
        assert_eq!(parse_hex_u64("ff").unwrap(), 255);
        assert!(parse_hex_u64("0x").is_err());
    }
}
