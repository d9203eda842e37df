//! Escrow holdings conservation check.
//!
//! Invariant enforced by [`Escrow::verify_holdings`](crate::Escrow::verify_holdings):
//! ```text
//! ∀ held currency: ledger.balance(house) == Σ(received) - Σ(paid out)
//! ```
//!
//! The house never mints or burns; if its balance drifts from its own
//! bookkeeping, funds were lost or injected outside the escrow API.

use std::collections::{BTreeSet, HashMap};

use auctionhouse_types::{Amount, AuctionError, Currency, Result};

/// Per-currency running totals of what the escrow received and paid out.
#[derive(Debug, Clone, Default)]
pub struct HoldingsTracker {
    received: HashMap<Currency, u128>,
    paid_out: HashMap<Currency, u128>,
}

impl HoldingsTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&mut self, currency: Currency, amount: Amount) {
        let total = self.received.entry(currency).or_insert(0);
        *total = total.saturating_add(amount.0);
    }

    pub fn record_paid_out(&mut self, currency: Currency, amount: Amount) {
        let total = self.paid_out.entry(currency).or_insert(0);
        *total = total.saturating_add(amount.0);
    }

    #[must_use]
    pub fn total_received(&self, currency: Currency) -> Amount {
        Amount(self.received.get(&currency).copied().unwrap_or(0))
    }

    #[must_use]
    pub fn total_paid_out(&self, currency: Currency) -> Amount {
        Amount(self.paid_out.get(&currency).copied().unwrap_or(0))
    }

    /// What the house should currently hold. `None` if more was paid out
    /// than ever received.
    #[must_use]
    pub fn expected(&self, currency: Currency) -> Option<Amount> {
        self.total_received(currency)
            .checked_sub(self.total_paid_out(currency))
    }

    /// # Errors
    /// [`AuctionError::HoldingsInvariantViolation`] if `actual` differs from
    /// the expected holdings.
    pub fn verify(&self, currency: Currency, actual: Amount) -> Result<()> {
        match self.expected(currency) {
            Some(expected) if expected == actual => Ok(()),
            expected => Err(AuctionError::HoldingsInvariantViolation {
                reason: format!(
                    "{currency}: actual holdings {actual} != expected {} \
                     (received={}, paid_out={})",
                    expected.map_or_else(|| "negative".to_string(), |e| e.to_string()),
                    self.total_received(currency),
                    self.total_paid_out(currency),
                ),
            }),
        }
    }

    /// Every currency that ever moved through the escrow.
    #[must_use]
    pub fn tracked_currencies(&self) -> Vec<Currency> {
        let set: BTreeSet<Currency> = self
            .received
            .keys()
            .chain(self.paid_out.keys())
            .copied()
            .collect();
        set.into_iter().collect()
    }
}
