//! Event schemas and the generic log decoder
//!
//! Each marketplace event is described by an [`EventSchema`]: its signature
//! hash, which fields sit in the indexed topics, and which fields sit in the
//! 32-byte words of the data payload. [`decode`] walks a schema against a
//! raw log. Adding an event takes a new table entry and a `build_*`
//! function that assembles the decoded fields into a [`DomainEvent`].

use crate::amount::NativeAmount;
use crate::error::DecodeError;
use crate::event::{BidAcceptance, DomainEvent, EventKind, Party, Sale, PAYMENT_TOKEN};
use crate::types::Log;
use alloy_primitives::{b256, Address, B256, U256};

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

/// Marketplace `BidAccepted` signature hash.
pub const BID_ACCEPTED_TOPIC: B256 =
    b256!("f6b2b7813b1815a0e2e32964b4f22ec24862322d9c9c0e0eefac425dfc455ab1");

/// Marketplace `ItemSold` signature hash.
pub const ITEM_SOLD_TOPIC: B256 =
    b256!("72d3f914473a393354e6fcd9c3cb7d2eee53924b9b856f9da274e024566292a5");

/// How a field is read out of a 32-byte word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Low 20 bytes of the word.
    Address,
    /// Whole word as a big-endian unsigned integer.
    Uint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Buyer,
    Bidder,
    Seller,
    NftAddress,
    BidType,
    PricePerItem,
    Quantity,
    TokenId,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Bidder => "bidder",
            Self::Seller => "seller",
            Self::NftAddress => "nftAddress",
            Self::BidType => "bidType",
            Self::PricePerItem => "pricePerItem",
            Self::Quantity => "quantity",
            Self::TokenId => "tokenId",
        }
    }

    pub fn ty(&self) -> FieldType {
        match self {
            Self::Buyer | Self::Bidder | Self::Seller | Self::NftAddress => FieldType::Address,
            Self::BidType | Self::PricePerItem | Self::Quantity | Self::TokenId => FieldType::Uint,
        }
    }
}

/// One 32-byte word of the data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Field(Field),
    /// Present in the payload but not reported.
    Reserved,
}

/// What to do when a log carries fewer topics than the schema indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicPolicy {
    /// The log is rejected.
    Require,
    /// Missing address topics decode as [`Party::Unknown`].
    Unknown,
}

/// Layout of one event.
pub struct EventSchema {
    pub kind: EventKind,
    pub signature: B256,
    /// Fields in topics[1..], in order.
    pub indexed: &'static [Field],
    /// Words of the data payload, in order.
    pub data: &'static [Slot],
    pub topic_policy: TopicPolicy,
    build: fn(&Fields) -> Result<DomainEvent, DecodeError>,
}

impl std::fmt::Debug for EventSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSchema")
            .field("kind", &self.kind)
            .field("signature", &self.signature)
            .field("indexed", &self.indexed)
            .field("data", &self.data)
            .field("topic_policy", &self.topic_policy)
            .finish()
    }
}

impl EventSchema {
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Minimum number of complete payload words.
    pub fn data_words(&self) -> usize {
        self.data.len()
    }
}

pub static BID_ACCEPTED: EventSchema = EventSchema {
    kind: EventKind::BidAccepted,
    signature: BID_ACCEPTED_TOPIC,
    indexed: &[Field::Bidder, Field::NftAddress, Field::Seller],
    data: &[
        Slot::Field(Field::BidType),
        Slot::Reserved,
        Slot::Field(Field::PricePerItem),
        Slot::Field(Field::Quantity),
        Slot::Reserved,
        Slot::Reserved,
        Slot::Reserved,
        Slot::Field(Field::TokenId),
    ],
    topic_policy: TopicPolicy::Require,
    build: build_bid_accepted,
};

pub static ITEM_SOLD: EventSchema = EventSchema {
    kind: EventKind::ItemSold,
    signature: ITEM_SOLD_TOPIC,
    indexed: &[Field::Buyer, Field::NftAddress, Field::Seller],
    data: &[
        Slot::Field(Field::PricePerItem),
        Slot::Field(Field::Quantity),
        Slot::Field(Field::TokenId),
    ],
    topic_policy: TopicPolicy::Unknown,
    build: build_item_sold,
};

/// Every decodable marketplace event.
pub static SCHEMAS: [&EventSchema; 2] = [&BID_ACCEPTED, &ITEM_SOLD];

/// Look up the schema for an event signature hash.
pub fn schema_for(topic0: &B256) -> Option<&'static EventSchema> {
    SCHEMAS.iter().copied().find(|schema| schema.signature == *topic0)
}

/// A decoded field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Party(Party),
    Uint(U256),
}

impl Value {
    fn read(word: &[u8], ty: FieldType) -> Self {
        match ty {
            FieldType::Address => Self::Party(Party::Known(word_address(word))),
            FieldType::Uint => Self::Uint(U256::from_be_slice(word)),
        }
    }
}

/// Field values collected while walking a schema.
#[derive(Debug)]
pub struct Fields {
    event: &'static str,
    values: Vec<(Field, Value)>,
}

impl Fields {
    fn get(&self, field: Field) -> Result<Value, DecodeError> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
            .ok_or(DecodeError::MissingField {
                event: self.event,
                field: field.name(),
            })
    }

    pub fn party(&self, field: Field) -> Result<Party, DecodeError> {
        match self.get(field)? {
            Value::Party(party) => Ok(party),
            Value::Uint(_) => Err(DecodeError::MissingField {
                event: self.event,
                field: field.name(),
            }),
        }
    }

    pub fn uint(&self, field: Field) -> Result<U256, DecodeError> {
        match self.get(field)? {
            Value::Uint(value) => Ok(value),
            Value::Party(_) => Err(DecodeError::MissingField {
                event: self.event,
                field: field.name(),
            }),
        }
    }
}

/// Address stored in the low 20 bytes of a 32-byte word.
pub fn word_address(word: &[u8]) -> Address {
    let start = word.len().saturating_sub(20);
    Address::from_slice(&word[start..])
}

/// Decode `log` according to `schema`.
///
/// The caller has already matched topic0 against `schema.signature`.
pub fn decode(schema: &EventSchema, log: &Log) -> Result<DomainEvent, DecodeError> {
    let event = schema.name();
    let mut values = Vec::with_capacity(schema.indexed.len() + schema.data.len());

    for (i, field) in schema.indexed.iter().enumerate() {
        let index = i + 1;
        let value = match (log.topics.get(index), schema.topic_policy, field.ty()) {
            (Some(topic), _, ty) => Value::read(topic.as_slice(), ty),
            (None, TopicPolicy::Unknown, FieldType::Address) => Value::Party(Party::Unknown),
            (None, _, _) => {
                return Err(DecodeError::MissingTopic {
                    event,
                    index,
                    found: log.topics.len(),
                })
            }
        };
        values.push((*field, value));
    }

    let found = log.word_count();
    if found < schema.data_words() {
        return Err(DecodeError::ShortPayload {
            event,
            needed: schema.data_words(),
            found,
        });
    }

    for (i, slot) in schema.data.iter().enumerate() {
        let Slot::Field(field) = slot else { continue };
        let word = log.word(i).ok_or(DecodeError::ShortPayload {
            event,
            needed: schema.data_words(),
            found,
        })?;
        values.push((*field, Value::read(word, field.ty())));
    }

    (schema.build)(&Fields { event, values })
}

fn build_bid_accepted(fields: &Fields) -> Result<DomainEvent, DecodeError> {
    Ok(DomainEvent::BidAccepted(BidAcceptance {
        token_id: fields.uint(Field::TokenId)?,
        bid_type: fields.uint(Field::BidType)?,
        bidder: fields.party(Field::Bidder)?,
        seller: fields.party(Field::Seller)?,
        nft_address: fields.party(Field::NftAddress)?,
        price_per_item: NativeAmount::from_raw(fields.uint(Field::PricePerItem)?),
        quantity: fields.uint(Field::Quantity)?,
        payment_token: PAYMENT_TOKEN,
    }))
}

fn build_item_sold(fields: &Fields) -> Result<DomainEvent, DecodeError> {
    Ok(DomainEvent::ItemSold(Sale {
        token_id: fields.uint(Field::TokenId)?,
        buyer: fields.party(Field::Buyer)?,
        seller: fields.party(Field::Seller)?,
        nft_address: fields.party(Field::NftAddress)?,
        price_per_item: NativeAmount::from_raw(fields.uint(Field::PricePerItem)?),
        quantity: fields.uint(Field::Quantity)?,
        payment_token: PAYMENT_TOKEN,
    }))
}
