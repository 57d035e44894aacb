//! Notification text
//!
//! One plain-text message per domain event:
//!
//! ```text
//! <collection> <tokenId> was bought for <price> HYPE
//!
//! from: '<seller>'
//! to: '<buyer-or-bidder>'
//! ```

use crate::event::DomainEvent;

/// Collection name used when none is configured.
pub const DEFAULT_COLLECTION: &str = "PiP & Friends";

/// Display symbol of the native unit.
pub const NATIVE_SYMBOL: &str = "HYPE";

pub fn render(collection: &str, event: &DomainEvent) -> String {
    format!(
        "{} {} was bought for {} {}\n\nfrom: '{}'\nto: '{}'",
        collection,
        event.token_label(),
        event.price(),
        NATIVE_SYMBOL,
        event.seller(),
        event.recipient(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::NativeAmount;
    use crate::event::{BidAcceptance, GenericTransfer, Party, PAYMENT_TOKEN};
    use crate::testutil::{BIDDER, CONTRACT, NFT, SELLER, SENDER};
    use alloy_primitives::U256;

    #[test]
    fn test_render_bid_accepted() {
        let event = DomainEvent::BidAccepted(BidAcceptance {
            token_id: U256::from(1234u64),
            bid_type: U256::from(1u64),
            bidder: Party::Known(BIDDER),
            seller: Party::Known(SELLER),
            nft_address: Party::Known(NFT),
            price_per_item: NativeAmount::from_raw(U256::from(1_500_000_000_000_000_000u128)),
            quantity: U256::from(1u64),
            payment_token: PAYMENT_TOKEN,
        });

        assert_eq!(
            render(DEFAULT_COLLECTION, &event),
            "PiP & Friends 1234 was bought for 1.500000 HYPE\n\
             \n\
             from: '0xcccccccccccccccccccccccccccccccccccccccc'\n\
             to: '0xdddddddddddddddddddddddddddddddddddddddd'"
        );
    }

    #[test]
    fn test_render_generic_transfer() {
        let event = DomainEvent::GenericTransfer(GenericTransfer {
            token_ids: vec![U256::from(7u64)],
            seller: Party::Known(SENDER),
            buyer: Party::Known(CONTRACT),
            price: NativeAmount::ZERO,
        });

        let text = render("Apes", &event);
        assert!(text.starts_with("Apes 7 was bought for 0.000000 HYPE\n\n"));
        assert!(text.ends_with("to: '0xb6c73f6c09f850651dcb6d62a4d3a7f25e0016c4'"));
    }
}
