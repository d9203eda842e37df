//! # auctionhouse-escrow
//!
//! **Escrow Plane**: everything the auction house holds on behalf of
//! others, and the collaborators it moves value through.
//!
//! ## Architecture
//!
//! 1. **Ledger**: fungible balances (native currency, wrapped native, tokens)
//! 2. **Escrow**: wraps native bids on deposit; pays out with a wrapped
//!    fallback for recipients that refuse native currency
//! 3. **AssetCustody**: ownership, operator approval, and transfer of
//!    non-fungible assets, plus creator royalty lookups
//! 4. **HoldingsTracker**: per-currency received/paid-out totals backing
//!    the conservation check
//!
//! ## Funds Flow
//!
//! ```text
//! bidder → Escrow.transfer_in() → (wrap) → house holdings
//!        → Escrow.pay_out() → curator / creator / owner / outbid bidder
//! ```
//!
//! At every quiescent point the house balance of each held currency equals
//! what the escrow received minus what it paid out.

pub mod custody;
pub mod escrow;
pub mod holdings;
pub mod ledger;

pub use custody::{AssetCustody, InMemoryCustody};
pub use escrow::{Escrow, Payout};
pub use holdings::HoldingsTracker;
pub use ledger::{InMemoryLedger, Ledger};
