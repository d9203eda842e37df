//! Events emitted by the auction lifecycle.
//!
//! Every successful state transition produces exactly one event (a
//! buy-it-now bid produces `AuctionBid` followed by `AuctionEnded`). Events
//! are the only externally observable record of a deleted auction.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, AuctionKey, Currency};

/// An auction lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuctionEvent {
    AuctionCreated {
        key: AuctionKey,
        duration: u64,
        reserve_price: Amount,
        asset_owner: Address,
        curator: Address,
        curator_fee_percentage: u8,
        currency: Currency,
        buy_it_now_price: Option<Amount>,
    },
    AuctionApprovalUpdated {
        key: AuctionKey,
        approved: bool,
    },
    AuctionReservePriceUpdated {
        key: AuctionKey,
        reserve_price: Amount,
    },
    AuctionBid {
        key: AuctionKey,
        bidder: Address,
        amount: Amount,
        first_bid: bool,
        extended: bool,
    },
    AuctionCanceled {
        key: AuctionKey,
        asset_owner: Address,
    },
    AuctionEnded {
        key: AuctionKey,
        asset_owner: Address,
        curator: Address,
        winner: Address,
        amount: Amount,
        curator_fee: Amount,
        currency: Currency,
    },
}

impl AuctionEvent {
    /// The auction this event belongs to.
    #[must_use]
    pub fn key(&self) -> AuctionKey {
        match self {
            Self::AuctionCreated { key, .. }
            | Self::AuctionApprovalUpdated { key, .. }
            | Self::AuctionReservePriceUpdated { key, .. }
            | Self::AuctionBid { key, .. }
            | Self::AuctionCanceled { key, .. }
            | Self::AuctionEnded { key, .. } => *key,
        }
    }
}

impl std::fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AuctionCreated { .. } => "AUCTION_CREATED",
            Self::AuctionApprovalUpdated { .. } => "AUCTION_APPROVAL_UPDATED",
            Self::AuctionReservePriceUpdated { .. } => "AUCTION_RESERVE_PRICE_UPDATED",
            Self::AuctionBid { .. } => "AUCTION_BID",
            Self::AuctionCanceled { .. } => "AUCTION_CANCELED",
            Self::AuctionEnded { .. } => "AUCTION_ENDED",
        };
        write!(f, "{name}")
    }
}
