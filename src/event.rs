//! Domain events produced from marketplace receipts.

use crate::amount::NativeAmount;
use alloy_primitives::{Address, U256};
use std::fmt;

/// Label shown for the payment token of decoded marketplace events.
///
/// No on-chain lookup is performed; every sale and bid is reported in this
/// token regardless of the payment token address in the event.
pub const PAYMENT_TOKEN: &str = "WHYPE";

/// An address taken from a log topic, or `Unknown` when the topic is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    Known(Address),
    Unknown,
}

impl From<Address> for Party {
    fn from(addr: Address) -> Self {
        Self::Known(addr)
    }
}

impl From<Option<Address>> for Party {
    fn from(addr: Option<Address>) -> Self {
        addr.map_or(Self::Unknown, Self::Known)
    }
}

/// Lowercase `0x…` hex, or `Unknown`.
impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(addr) => write!(f, "0x{:x}", addr),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Which marketplace event a schema decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ItemSold,
    BidAccepted,
    GenericTransfer,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItemSold => "ItemSold",
            Self::BidAccepted => "BidAccepted",
            Self::GenericTransfer => "GenericTransfer",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing bought at its asking price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub token_id: U256,
    pub buyer: Party,
    pub seller: Party,
    pub nft_address: Party,
    pub price_per_item: NativeAmount,
    pub quantity: U256,
    pub payment_token: &'static str,
}

/// A bid accepted by the token owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidAcceptance {
    pub token_id: U256,
    pub bid_type: U256,
    pub bidder: Party,
    pub seller: Party,
    pub nft_address: Party,
    pub price_per_item: NativeAmount,
    pub quantity: U256,
    pub payment_token: &'static str,
}

/// Fallback for a contract call that moved tokens without a marketplace event.
///
/// Built from the transaction itself: `from` sold, `to` bought, and the
/// declared value is the price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericTransfer {
    pub token_ids: Vec<U256>,
    pub seller: Party,
    pub buyer: Party,
    pub price: NativeAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    ItemSold(Sale),
    BidAccepted(BidAcceptance),
    GenericTransfer(GenericTransfer),
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ItemSold(_) => EventKind::ItemSold,
            Self::BidAccepted(_) => EventKind::BidAccepted,
            Self::GenericTransfer(_) => EventKind::GenericTransfer,
        }
    }

    /// Token id(s) as shown in a notification.
    pub fn token_label(&self) -> String {
        match self {
            Self::ItemSold(sale) => sale.token_id.to_string(),
            Self::BidAccepted(bid) => bid.token_id.to_string(),
            Self::GenericTransfer(transfer) if transfer.token_ids.is_empty() => {
                "Unknown".to_string()
            }
            Self::GenericTransfer(transfer) => transfer
                .token_ids
                .iter()
                .map(U256::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Price per item (or the transaction value for generic transfers).
    pub fn price(&self) -> NativeAmount {
        match self {
            Self::ItemSold(sale) => sale.price_per_item,
            Self::BidAccepted(bid) => bid.price_per_item,
            Self::GenericTransfer(transfer) => transfer.price,
        }
    }

    pub fn seller(&self) -> Party {
        match self {
            Self::ItemSold(sale) => sale.seller,
            Self::BidAccepted(bid) => bid.seller,
            Self::GenericTransfer(transfer) => transfer.seller,
        }
    }

    /// The buyer, or the bidder for an accepted bid.
    pub fn recipient(&self) -> Party {
        match self {
            Self::ItemSold(sale) => sale.buyer,
            Self::BidAccepted(bid) => bid.bidder,
            Self::GenericTransfer(transfer) => transfer.buyer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_party_display_is_lowercase() {
        let party = Party::from(address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"));
        assert_eq!(party.to_string(), "0x70997970c51812dc3a010c7d01b50e0d17dc79c8");
        assert_eq!(Party::from(None).to_string(), "Unknown");
    }

    #[test]
    fn test_generic_transfer_labels() {
        let event = DomainEvent::GenericTransfer(GenericTransfer {
            token_ids: vec![U256::from(7u64), U256::from(8u64)],
            seller: Party::Unknown,
            buyer: Party::Unknown,
            price: NativeAmount::ZERO,
        });
        assert_eq!(event.kind(), EventKind::GenericTransfer);
        assert_eq!(event.token_label(), "7, 8");
    }
}
