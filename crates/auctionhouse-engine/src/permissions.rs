//! Role checks for lifecycle and admin operations.
//!
//! Asset-level authorization (owner or approved operator) is the custody
//! collaborator's business; this module covers the house's own roles:
//! curators, owners of record, admins, and the optional creator allow-list.

use std::collections::HashSet;
use std::fmt;

use auctionhouse_types::{Address, Auction, AuctionError, AuctionHouseConfig, Result};

/// An operation subject to a role check, with the auction it targets.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    CreateAuction,
    SetApproval(&'a Auction),
    SetReservePrice(&'a Auction),
    CancelAuction(&'a Auction),
    Administer,
}

impl fmt::Display for Operation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateAuction => "create auctions",
            Self::SetApproval(_) => "set auction approval",
            Self::SetReservePrice(_) => "set the reserve price",
            Self::CancelAuction(_) => "cancel the auction",
            Self::Administer => "administer the house",
        };
        f.write_str(name)
    }
}

/// The house's role table.
#[derive(Debug, Clone, Default)]
pub struct Permissions {
    admins: HashSet<Address>,
    /// `None` means anyone may create.
    auction_creators: Option<HashSet<Address>>,
}

impl Permissions {
    #[must_use]
    pub fn from_config(config: &AuctionHouseConfig) -> Self {
        Self {
            admins: config.admins.iter().copied().collect(),
            auction_creators: config
                .auction_creators
                .as_ref()
                .map(|creators| creators.iter().copied().collect()),
        }
    }

    #[must_use]
    pub fn is_admin(&self, caller: Address) -> bool {
        self.admins.contains(&caller)
    }

    #[must_use]
    pub fn may_create(&self, caller: Address) -> bool {
        self.auction_creators
            .as_ref()
            .is_none_or(|creators| creators.contains(&caller))
    }

    #[must_use]
    pub fn allows(&self, operation: Operation<'_>, caller: Address) -> bool {
        match operation {
            Operation::CreateAuction => self.may_create(caller),
            Operation::SetApproval(auction) => is_curator(auction, caller),
            Operation::SetReservePrice(auction) => {
                is_curator(auction, caller) || caller == auction.asset_owner
            }
            Operation::CancelAuction(auction) => {
                is_curator(auction, caller)
                    || caller == auction.asset_owner
                    || self.is_admin(caller)
            }
            Operation::Administer => self.is_admin(caller),
        }
    }

    /// # Errors
    /// [`AuctionError::Unauthorized`] if `caller` lacks the role.
    pub fn check(&self, operation: Operation<'_>, caller: Address) -> Result<()> {
        if self.allows(operation, caller) {
            Ok(())
        } else {
            Err(AuctionError::Unauthorized {
                operation: operation.to_string(),
                caller,
            })
        }
    }
}

fn is_curator(auction: &Auction, caller: Address) -> bool {
    auction.has_curator() && caller == auction.curator
}
