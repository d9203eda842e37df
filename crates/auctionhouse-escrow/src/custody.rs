//! Asset custody: who holds each non-fungible asset, and who may move it.
//!
//! [`AssetCustody`] is the seam to asset contracts. The engine only needs
//! ownership queries, operator authorization, one interface capability
//! check, transfers, and the creator royalty split.

use std::collections::{HashMap, HashSet};

use auctionhouse_types::{Address, AuctionError, AuctionKey, Result, RoyaltyShare};

/// Operations the auction engine needs from asset contracts.
pub trait AssetCustody {
    /// Whether `asset_contract` implements the expected asset interface.
    fn supports_asset_interface(&self, asset_contract: Address) -> bool;

    /// Current holder, or `None` if the asset does not exist.
    fn owner_of(&self, asset: &AuctionKey) -> Option<Address>;

    /// Whether `caller` may move the asset: its owner, the approved
    /// address for it, or an operator for the owner.
    fn is_authorized(&self, caller: Address, asset: &AuctionKey) -> bool;

    /// Move the asset from `from` to `to`.
    ///
    /// # Errors
    /// - `RecipientRefused` if `to` cannot or will not accept the asset
    /// - `TransferRejected` if `from` does not hold it
    fn transfer(&mut self, asset: &AuctionKey, from: Address, to: Address) -> Result<()>;

    /// Creator royalty recorded for the asset, if any.
    fn royalty(&self, asset: &AuctionKey) -> Option<RoyaltyShare>;
}

#[derive(Debug, Clone, Default)]
struct Collection {
    supports_interface: bool,
}

/// In-memory [`AssetCustody`] spanning any number of collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustody {
    collections: HashMap<Address, Collection>,
    owners: HashMap<AuctionKey, Address>,
    /// Per-asset approved address; cleared on transfer.
    approvals: HashMap<AuctionKey, Address>,
    /// (owner, operator) pairs.
    operators: HashSet<(Address, Address)>,
    royalties: HashMap<AuctionKey, RoyaltyShare>,
    /// Addresses that reject inbound assets.
    refusers: HashSet<Address>,
}

impl InMemoryCustody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset contract. Contracts registered with
    /// `supports_interface = false` model lookalikes that fail the
    /// capability check.
    pub fn register_collection(&mut self, asset_contract: Address, supports_interface: bool) {
        self.collections
            .insert(asset_contract, Collection { supports_interface });
    }

    /// Create an asset held by `owner`.
    ///
    /// # Errors
    /// `InvalidParameters` if the collection is unknown or the asset exists.
    pub fn mint(
        &mut self,
        asset: AuctionKey,
        owner: Address,
        royalty: Option<RoyaltyShare>,
    ) -> Result<()> {
        if !self.collections.contains_key(&asset.asset_contract) {
            return Err(AuctionError::InvalidParameters {
                reason: format!("unknown asset contract {}", asset.asset_contract),
            });
        }
        if self.owners.contains_key(&asset) {
            return Err(AuctionError::InvalidParameters {
                reason: format!("asset {asset} already minted"),
            });
        }
        self.owners.insert(asset, owner);
        if let Some(share) = royalty {
            self.royalties.insert(asset, share);
        }
        Ok(())
    }

    /// Approve `operator` for one asset. Only the owner may approve.
    ///
    /// # Errors
    /// `Unauthorized` if `caller` does not own the asset.
    pub fn approve(&mut self, caller: Address, asset: AuctionKey, operator: Address) -> Result<()> {
        if self.owner_of(&asset) != Some(caller) {
            return Err(AuctionError::Unauthorized {
                operation: format!("approve {asset}"),
                caller,
            });
        }
        self.approvals.insert(asset, operator);
        Ok(())
    }

    /// Allow `operator` to move every asset of `owner`.
    pub fn set_approval_for_all(&mut self, owner: Address, operator: Address, approved: bool) {
        if approved {
            self.operators.insert((owner, operator));
        } else {
            self.operators.remove(&(owner, operator));
        }
    }

    /// Make `holder` reject every inbound asset.
    pub fn refuse_assets(&mut self, holder: Address) {
        self.refusers.insert(holder);
    }

    /// Number of assets held by `holder`.
    #[must_use]
    pub fn balance_of(&self, holder: Address) -> usize {
        self.owners.values().filter(|o| **o == holder).count()
    }
}

impl AssetCustody for InMemoryCustody {
    fn supports_asset_interface(&self, asset_contract: Address) -> bool {
        self.collections
            .get(&asset_contract)
            .is_some_and(|c| c.supports_interface)
    }

    fn owner_of(&self, asset: &AuctionKey) -> Option<Address> {
        self.owners.get(asset).copied()
    }

    fn is_authorized(&self, caller: Address, asset: &AuctionKey) -> bool {
        let Some(owner) = self.owner_of(asset) else {
            return false;
        };
        caller == owner
            || self.approvals.get(asset) == Some(&caller)
            || self.operators.contains(&(owner, caller))
    }

    fn transfer(&mut self, asset: &AuctionKey, from: Address, to: Address) -> Result<()> {
        if self.owner_of(asset) != Some(from) {
            return Err(AuctionError::TransferRejected {
                reason: format!("{from} does not hold {asset}"),
            });
        }
        if self.refusers.contains(&to) {
            return Err(AuctionError::RecipientRefused(to));
        }
        self.owners.insert(*asset, to);
        self.approvals.remove(asset);
        Ok(())
    }

    fn royalty(&self, asset: &AuctionKey) -> Option<RoyaltyShare> {
        self.royalties.get(asset).copied()
    }
}
