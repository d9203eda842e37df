//! The auction record and its derived lifecycle phase.
//!
//! A record lives in the registry only between creation and cancel/end;
//! both terminal operations delete it, so there is no "ended" flag.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Currency};

/// Pre-terminal lifecycle phase, derived from the record's fields.
///
/// ```text
///   Unapproved ──approve──▶ Approved ──first bid──▶ Active ──end──▶ (deleted)
///        │                     │
///        └──────cancel─────────┴──────────────────────────────────▶ (deleted)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Waiting for the curator. Bids are rejected.
    Unapproved,
    /// Open for a first bid.
    Approved,
    /// At least one bid is standing; the countdown is running.
    Active,
}

impl AuctionPhase {
    /// Both pre-bid phases count as "not yet started".
    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unapproved => write!(f, "UNAPPROVED"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

/// One running auction.
///
/// Invariant: `amount == 0 ⇔ first_bid_time.is_none() ⇔ bidder.is_none()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    /// Seconds the auction runs once the first bid lands. Grows when late
    /// bids trigger an extension.
    pub duration: u64,
    /// Minimum acceptable first bid.
    pub reserve_price: Amount,
    /// Highest bid so far.
    pub amount: Amount,
    /// Unix seconds of the first bid.
    pub first_bid_time: Option<u64>,
    /// Always `< 100`.
    pub curator_fee_percentage: u8,
    /// Holder of the asset when the auction was created.
    pub asset_owner: Address,
    /// `Address::ZERO` when the auction has no curator.
    pub curator: Address,
    pub bidder: Option<Address>,
    pub currency: Currency,
    pub approved: bool,
    pub buy_it_now_price: Option<Amount>,
}

impl Auction {
    #[must_use]
    pub fn phase(&self) -> AuctionPhase {
        if self.has_bid() {
            AuctionPhase::Active
        } else if self.approved {
            AuctionPhase::Approved
        } else {
            AuctionPhase::Unapproved
        }
    }

    #[must_use]
    pub fn has_bid(&self) -> bool {
        self.first_bid_time.is_some()
    }

    #[must_use]
    pub fn has_curator(&self) -> bool {
        !self.curator.is_zero()
    }

    /// Unix seconds at which bidding closes, once started.
    #[must_use]
    pub fn ends_at(&self) -> Option<u64> {
        self.first_bid_time
            .map(|start| start.saturating_add(self.duration))
    }

    /// Bids after `ends_at` are rejected.
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.ends_at().is_some_and(|end| now > end)
    }

    /// The auction may be ended from `ends_at` onwards.
    #[must_use]
    pub fn is_complete_at(&self, now: u64) -> bool {
        self.ends_at().is_some_and(|end| now >= end)
    }

    /// Smallest amount that outbids the standing bid.
    #[must_use]
    pub fn minimum_next_bid(&self, min_increment_percentage: u8) -> Amount {
        self.amount
            .checked_add(self.amount.percentage(min_increment_percentage))
            .unwrap_or(Amount(u128::MAX))
    }

    /// Whether the buy-it-now threshold is met by `amount`.
    #[must_use]
    pub fn triggers_buy_it_now(&self, amount: Amount) -> bool {
        self.buy_it_now_price.is_some_and(|price| amount >= price)
    }
}

/// Creator royalty for one asset, as reported by the asset collaborator.
///
/// `creator_split_percentage` applies to what remains after the curator fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyShare {
    pub creator: Address,
    pub creator_split_percentage: u8,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Auction {
    pub fn dummy(asset_owner: Address, curator: Address) -> Self {
        Self {
            duration: 24 * 60 * 60,
            reserve_price: Amount(500),
            amount: Amount::ZERO,
            first_bid_time: None,
            curator_fee_percentage: 5,
            asset_owner,
            curator,
            bidder: None,
            currency: Currency::Native,
            approved: curator.is_zero() || curator == asset_owner,
            buy_it_now_price: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_approval_and_bids() {
        let owner = Address::from_label("owner");
        let curator = Address::from_label("curator");
        let mut auction = Auction::dummy(owner, curator);
        assert_eq!(auction.phase(), AuctionPhase::Unapproved);
        assert!(!auction.phase().is_started());

        auction.approved = true;
        assert_eq!(auction.phase(), AuctionPhase::Approved);

        auction.first_bid_time = Some(100);
        auction.amount = Amount(600);
        auction.bidder = Some(Address::from_label("bidder"));
        assert_eq!(auction.phase(), AuctionPhase::Active);
        assert!(auction.phase().is_started());
    }

    #[test]
    fn dummy_auto_approves_without_curator() {
        let owner = Address::from_label("owner");
        assert!(Auction::dummy(owner, Address::ZERO).approved);
        assert!(Auction::dummy(owner, owner).approved);
        let curated = Auction::dummy(owner, Address::from_label("c"));
        assert!(curated.has_curator());
        assert!(!curated.approved);
    }

    #[test]
    fn expiry_and_completion_boundaries() {
        let mut auction = Auction::dummy(Address::from_label("owner"), Address::ZERO);
        assert_eq!(auction.ends_at(), None);
        assert!(!auction.is_expired_at(u64::MAX));
        assert!(!auction.is_complete_at(u64::MAX));

        auction.first_bid_time = Some(1_000);
        auction.duration = 100;
        assert_eq!(auction.ends_at(), Some(1_100));
        assert!(!auction.is_expired_at(1_100));
        assert!(auction.is_expired_at(1_101));
        assert!(!auction.is_complete_at(1_099));
        assert!(auction.is_complete_at(1_100));
    }

    #[test]
    fn minimum_next_bid_applies_increment() {
        let mut auction = Auction::dummy(Address::from_label("owner"), Address::ZERO);
        auction.amount = Amount(1_000);
        assert_eq!(auction.minimum_next_bid(10), Amount(1_100));
        assert_eq!(auction.minimum_next_bid(0), Amount(1_000));
    }

    #[test]
    fn buy_it_now_threshold() {
        let mut auction = Auction::dummy(Address::from_label("owner"), Address::ZERO);
        assert!(!auction.triggers_buy_it_now(Amount(u128::MAX)));
        auction.buy_it_now_price = Some(Amount(10));
        assert!(!auction.triggers_buy_it_now(Amount(9)));
        assert!(auction.triggers_buy_it_now(Amount(10)));
        assert!(auction.triggers_buy_it_now(Amount(11)));
    }
}
