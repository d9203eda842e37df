//! Auction registry: the only durable state of the house.
//!
//! One record per asset key. A key is free again as soon as its auction is
//! canceled or ended, so an asset can be re-auctioned.

use std::collections::HashMap;

use auctionhouse_types::{Auction, AuctionError, AuctionKey, Result};

/// Keyed store of running auctions.
#[derive(Debug, Clone, Default)]
pub struct AuctionRegistry {
    auctions: HashMap<AuctionKey, Auction>,
}

impl AuctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record.
    ///
    /// # Errors
    /// [`AuctionError::DuplicateAuction`] if `key` already has a record.
    pub fn create(&mut self, key: AuctionKey, auction: Auction) -> Result<AuctionKey> {
        if self.auctions.contains_key(&key) {
            return Err(AuctionError::DuplicateAuction(key));
        }
        self.auctions.insert(key, auction);
        Ok(key)
    }

    /// # Errors
    /// [`AuctionError::AuctionNotFound`] if `key` has no record.
    pub fn get(&self, key: &AuctionKey) -> Result<&Auction> {
        self.auctions
            .get(key)
            .ok_or(AuctionError::AuctionNotFound(*key))
    }

    /// Replace an existing record.
    ///
    /// # Errors
    /// [`AuctionError::AuctionNotFound`] if `key` has no record.
    pub fn update(&mut self, key: AuctionKey, auction: Auction) -> Result<()> {
        let slot = self
            .auctions
            .get_mut(&key)
            .ok_or(AuctionError::AuctionNotFound(key))?;
        *slot = auction;
        Ok(())
    }

    /// Remove and return a record.
    ///
    /// # Errors
    /// [`AuctionError::AuctionNotFound`] if `key` has no record.
    pub fn delete(&mut self, key: &AuctionKey) -> Result<Auction> {
        self.auctions
            .remove(key)
            .ok_or(AuctionError::AuctionNotFound(*key))
    }

    #[must_use]
    pub fn contains(&self, key: &AuctionKey) -> bool {
        self.auctions.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }

    /// All records, sorted by key.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&AuctionKey, &Auction)> {
        let mut entries: Vec<_> = self.auctions.iter().collect();
        entries.sort_by_key(|(key, _)| **key);
        entries.into_iter()
    }
}
