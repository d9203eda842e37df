//! House-wide pause switch.
//!
//! While paused, creating auctions, curator approval, reserve updates,
//! bidding, and ending are blocked. Canceling an unbid auction stays open
//! so owners can always recover their assets.

use auctionhouse_types::{AuctionError, Result};

/// Admin-controlled pause flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct PauseSwitch {
    paused: bool,
}

impl PauseSwitch {
    #[must_use]
    pub fn new(paused: bool) -> Self {
        Self { paused }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Guard a pausable operation.
    ///
    /// # Errors
    /// [`AuctionError::Paused`] while the house is paused.
    pub fn check(&self) -> Result<()> {
        if self.paused {
            Err(AuctionError::Paused)
        } else {
            Ok(())
        }
    }
}
