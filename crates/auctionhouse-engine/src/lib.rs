//! # auctionhouse-engine
//!
//! **Lifecycle Plane**: the English-auction state machine and its
//! settlement.
//!
//! ## Architecture
//!
//! [`AuctionHouse`] owns the registry and drives the escrow and custody
//! collaborators:
//! 1. **AuctionRegistry**: one record per asset key, deleted on cancel/end
//! 2. **Permissions** / **PauseSwitch**: role checks and the house-wide pause
//! 3. **TimeExtension**: anti-snipe rule for late bids
//! 4. **FeeSplit**: curator fee, creator royalty, owner proceeds
//! 5. **Clock**: wall time or a manually driven clock
//!
//! ## Lifecycle
//!
//! ```text
//! create ─▶ Unapproved ─approve─▶ Approved ─first bid─▶ Active ─end─▶ Ended
//!              │                      │                           │
//!              └───────cancel─────────┘                 winner refuses
//!                         ▼                                       ▼
//!                      Canceled ◀──────────────────────── Reverted
//! ```
//!
//! Operations validate fully, commit the registry, then transfer outward.

pub mod clock;
pub mod fee_split;
pub mod lifecycle;
pub mod pause;
pub mod permissions;
pub mod registry;
pub mod time_extension;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fee_split::FeeSplit;
pub use lifecycle::{AuctionHouse, BidReceipt, NewAuction, Settlement, SettledAuction};
pub use pause::PauseSwitch;
pub use permissions::{Operation, Permissions};
pub use registry::AuctionRegistry;
pub use time_extension::Extension;
