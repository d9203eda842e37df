//! Division of a winning bid between curator, creator, and owner.
//!
//! ```text
//! curator_fee   = floor(amount * curator_pct / 100)     (0 without curator)
//! remainder     = amount - curator_fee
//! creator_share = floor(remainder * creator_split / 100)
//! owner_share   = remainder - creator_share
//! ```
//!
//! The three shares always sum to `amount`; the owner absorbs any rounding.

use auctionhouse_types::{Amount, constants::PERCENTAGE_SCALE};
use serde::{Deserialize, Serialize};

/// Shares of a settled auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub curator_fee: Amount,
    pub creator_share: Amount,
    pub owner_share: Amount,
}

impl FeeSplit {
    /// Split `amount`. `creator_split_percentage` is clamped to 100.
    #[must_use]
    pub fn compute(
        amount: Amount,
        curator_fee_percentage: u8,
        has_curator: bool,
        creator_split_percentage: u8,
    ) -> Self {
        let curator_fee = if has_curator {
            amount.percentage(curator_fee_percentage.min(PERCENTAGE_SCALE))
        } else {
            Amount::ZERO
        };
        let remainder = Amount(amount.0 - curator_fee.0);
        let creator_share = remainder.percentage(creator_split_percentage.min(PERCENTAGE_SCALE));
        Self {
            curator_fee,
            creator_share,
            owner_share: Amount(remainder.0 - creator_share.0),
        }
    }

    /// Sum of all shares.
    #[must_use]
    pub fn total(&self) -> Amount {
        // Shares are carved out of one u128, so the sum cannot overflow.
        Amount(self.curator_fee.0 + self.creator_share.0 + self.owner_share.0)
    }
}

/// Whether the creator split of `amount` (after the curator fee) is exact.
///
/// First bids failing this are rejected so that settlement never loses
/// value to rounding.
#[must_use]
pub fn is_splittable(
    amount: Amount,
    curator_fee_percentage: u8,
    has_curator: bool,
    creator_split_percentage: u8,
) -> bool {
    let split = FeeSplit::compute(
        amount,
        curator_fee_percentage,
        has_curator,
        creator_split_percentage,
    );
    let remainder = Amount(amount.0 - split.curator_fee.0);
    remainder.percentage_is_exact(creator_split_percentage.min(PERCENTAGE_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const ETH: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn curated_sale_with_royalty() {
        let split = FeeSplit::compute(Amount(2 * ETH), 5, true, 15);
        assert_eq!(split.curator_fee, Amount(ETH / 10));
        assert_eq!(split.creator_share, Amount(285 * ETH / 1000));
        assert_eq!(split.owner_share, Amount(1615 * ETH / 1000));
        assert_eq!(split.total(), Amount(2 * ETH));
    }

    #[test]
    fn no_curator_means_no_fee() {
        let split = FeeSplit::compute(Amount(1000), 50, false, 10);
        assert!(split.curator_fee.is_zero());
        assert_eq!(split.creator_share, Amount(100));
        assert_eq!(split.owner_share, Amount(900));
    }

    #[test]
    fn no_royalty_pays_owner_everything_left() {
        let split = FeeSplit::compute(Amount(1000), 10, true, 0);
        assert_eq!(split.curator_fee, Amount(100));
        assert!(split.creator_share.is_zero());
        assert_eq!(split.owner_share, Amount(900));
    }

    #[test]
    fn max_amount_does_not_overflow() {
        let split = FeeSplit::compute(Amount(u128::MAX), 99, true, 100);
        assert_eq!(split.total(), Amount(u128::MAX));
        assert!(split.owner_share.is_zero());
    }

    #[test]
    fn splittability() {
        // remainder 95 * 15 = 1425, not divisible by 100
        assert!(!is_splittable(Amount(100), 5, true, 15));
        // remainder 1900 * 15 = 28500
        assert!(is_splittable(Amount(2000), 5, true, 15));
        assert!(is_splittable(Amount(7), 0, false, 0));
        assert!(is_splittable(Amount(7), 0, false, 100));
    }

    #[test]
    fn random_splits_sum_exactly() {
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            let amount = Amount(rng.r#gen::<u128>());
            let curator_pct = rng.gen_range(0..100);
            let creator_pct = rng.gen_range(0..=100);
            let has_curator = rng.r#gen::<bool>();
            let split = FeeSplit::compute(amount, curator_pct, has_curator, creator_pct);
            assert_eq!(split.total(), amount);
        }
    }
}
