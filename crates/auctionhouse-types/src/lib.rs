//! # auctionhouse-types
//!
//! Shared types, errors, and configuration for the **AuctionHouse**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AssetId`], [`AuctionKey`]
//! - **Money**: [`Amount`], [`Currency`]
//! - **Auction model**: [`Auction`], [`AuctionPhase`], [`RoyaltyShare`]
//! - **Events**: [`AuctionEvent`]
//! - **Configuration**: [`AuctionHouseConfig`], [`CollectionMode`]
//! - **Errors**: [`AuctionError`] with `AH_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: defaults and limits

pub mod amount;
pub mod auction;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use auctionhouse_types::{Auction, AuctionKey, Amount, ...};

pub use amount::*;
pub use auction::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `auctionhouse_types::constants::FOO`
// (not re-exported to avoid name collisions).
