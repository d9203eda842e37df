//! The auction house: lifecycle state machine over the registry, escrow,
//! and asset custody.
//!
//! Every operation runs in three steps:
//! 1. Validate everything, including fallible inbound pulls of funds or
//!    assets, before touching the registry.
//! 2. Commit the registry change.
//! 3. Perform outward transfers (refunds, payouts, asset delivery).
//!
//! Step 3 is only reached with the escrow and custody in a state that
//! covers it, so a failure there is an invariant violation and surfaces as
//! [`AuctionError::Internal`]. The one designed failure in step 3, a winner
//! that refuses the asset, is handled as [`Settlement::Reverted`]. A bid
//! that meets the buy-it-now price settles inside the same call; if the
//! owner then refuses the returned asset too, the bid is rolled back.

use auctionhouse_escrow::{AssetCustody, Escrow, Ledger};
use auctionhouse_types::{
    Address, Amount, AssetId, Auction, AuctionError, AuctionEvent, AuctionHouseConfig, AuctionKey,
    CollectionMode, Currency, Result, constants::PERCENTAGE_SCALE,
};
use tracing::{info, warn};

use crate::{
    clock::Clock,
    fee_split::{self, FeeSplit},
    pause::PauseSwitch,
    permissions::{Operation, Permissions},
    registry::AuctionRegistry,
    time_extension,
};

/// Parameters of a new auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuction {
    pub asset_id: AssetId,
    /// Required in multi-collection mode. In single-collection mode it may
    /// be omitted or must name the bound contract.
    pub asset_contract: Option<Address>,
    pub duration: u64,
    pub reserve_price: Amount,
    /// `Address::ZERO` for an uncurated auction.
    pub curator: Address,
    pub curator_fee_percentage: u8,
    pub currency: Currency,
    pub buy_it_now_price: Option<Amount>,
}

/// A successfully settled auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledAuction {
    pub key: AuctionKey,
    pub winner: Address,
    pub amount: Amount,
    pub currency: Currency,
    pub asset_owner: Address,
    pub curator: Address,
    /// Royalty recipient, if the asset has one.
    pub creator: Option<Address>,
    pub split: FeeSplit,
}

/// Outcome of ending an auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Asset delivered, proceeds split and paid.
    Completed(SettledAuction),
    /// The winner refused the asset: it went back to the owner and the bid
    /// was refunded in escrowed form. No fees were paid.
    Reverted {
        key: AuctionKey,
        bidder: Address,
        amount: Amount,
    },
}

/// Outcome of an accepted bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidReceipt {
    pub first_bid: bool,
    pub extended: bool,
    /// Present when the bid met the buy-it-now price.
    pub settlement: Option<Settlement>,
}

/// An English-auction house.
///
/// `C` supplies time, `L` holds fungible balances, `K` holds the assets.
#[derive(Debug)]
pub struct AuctionHouse<C, L, K> {
    config: AuctionHouseConfig,
    clock: C,
    registry: AuctionRegistry,
    escrow: Escrow<L>,
    custody: K,
    permissions: Permissions,
    pause: PauseSwitch,
    events: Vec<AuctionEvent>,
}

impl<C: Clock, L: Ledger + Clone, K: AssetCustody> AuctionHouse<C, L, K> {
    /// # Errors
    /// `Configuration` if `config` is invalid.
    pub fn new(config: AuctionHouseConfig, clock: C, ledger: L, custody: K) -> Result<Self> {
        config.validate()?;
        info!(
            house = %config.house_address,
            mode = ?config.collection_mode,
            time_buffer_secs = config.time_buffer_secs,
            min_bid_increment_percentage = config.min_bid_increment_percentage,
            "auction house initialized"
        );
        Ok(Self {
            escrow: Escrow::new(ledger, config.house_address, config.wrapped_native),
            permissions: Permissions::from_config(&config),
            pause: PauseSwitch::new(config.paused),
            registry: AuctionRegistry::new(),
            events: Vec::new(),
            config,
            clock,
            custody,
        })
    }

    // ---------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------

    /// Put an asset up for auction, moving it into the house's custody.
    ///
    /// # Errors
    /// `Paused`, `InvalidParameters`, `UnsupportedAssetContract`,
    /// `Unauthorized`, `DuplicateAuction`, or a custody transfer error.
    pub fn create_auction(&mut self, caller: Address, params: NewAuction) -> Result<AuctionKey> {
        self.pause.check()?;
        let asset_contract = self.resolve_contract(params.asset_contract)?;
        if !self.custody.supports_asset_interface(asset_contract) {
            return Err(AuctionError::UnsupportedAssetContract(asset_contract));
        }
        let key = AuctionKey::new(asset_contract, params.asset_id);
        let asset_owner = self
            .custody
            .owner_of(&key)
            .ok_or_else(|| AuctionError::InvalidParameters {
                reason: format!("asset {key} does not exist"),
            })?;
        if !self.custody.is_authorized(caller, &key) {
            return Err(AuctionError::Unauthorized {
                operation: format!("auction {key}"),
                caller,
            });
        }
        self.permissions.check(Operation::CreateAuction, caller)?;
        if params.curator_fee_percentage >= PERCENTAGE_SCALE {
            return Err(AuctionError::InvalidParameters {
                reason: format!(
                    "curator fee percentage {} must be below {PERCENTAGE_SCALE}",
                    params.curator_fee_percentage
                ),
            });
        }
        if self.registry.contains(&key) {
            return Err(AuctionError::DuplicateAuction(key));
        }

        self.custody
            .transfer(&key, asset_owner, self.config.house_address)?;

        let auction = Auction {
            duration: params.duration,
            reserve_price: params.reserve_price,
            amount: Amount::ZERO,
            first_bid_time: None,
            curator_fee_percentage: params.curator_fee_percentage,
            asset_owner,
            curator: params.curator,
            bidder: None,
            currency: params.currency,
            approved: params.curator.is_zero() || params.curator == asset_owner,
            buy_it_now_price: params.buy_it_now_price,
        };
        let approved = auction.approved;
        self.registry.create(key, auction)?;

        info!(
            key = %key,
            owner = %asset_owner,
            curator = %params.curator,
            reserve = %params.reserve_price,
            currency = %params.currency,
            approved,
            "auction created"
        );
        self.events.push(AuctionEvent::AuctionCreated {
            key,
            duration: params.duration,
            reserve_price: params.reserve_price,
            asset_owner,
            curator: params.curator,
            curator_fee_percentage: params.curator_fee_percentage,
            currency: params.currency,
            buy_it_now_price: params.buy_it_now_price,
        });
        Ok(key)
    }

    /// Curator approves (or withdraws approval of) an unbid auction.
    ///
    /// # Errors
    /// `Paused`, `AuctionNotFound`, `Unauthorized`, `AlreadyStarted`.
    pub fn set_auction_approval(
        &mut self,
        caller: Address,
        key: AuctionKey,
        approved: bool,
    ) -> Result<()> {
        self.pause.check()?;
        let mut auction = self.registry.get(&key)?.clone();
        self.permissions
            .check(Operation::SetApproval(&auction), caller)?;
        if auction.has_bid() {
            return Err(AuctionError::AlreadyStarted(key));
        }

        auction.approved = approved;
        self.registry.update(key, auction)?;

        info!(key = %key, approved, "auction approval updated");
        self.events
            .push(AuctionEvent::AuctionApprovalUpdated { key, approved });
        Ok(())
    }

    /// Owner or curator changes the reserve of an unbid auction.
    ///
    /// # Errors
    /// `Paused`, `AuctionNotFound`, `Unauthorized`, `AlreadyStarted`.
    pub fn set_auction_reserve_price(
        &mut self,
        caller: Address,
        key: AuctionKey,
        reserve_price: Amount,
    ) -> Result<()> {
        self.pause.check()?;
        let mut auction = self.registry.get(&key)?.clone();
        self.permissions
            .check(Operation::SetReservePrice(&auction), caller)?;
        if auction.has_bid() {
            return Err(AuctionError::AlreadyStarted(key));
        }

        auction.reserve_price = reserve_price;
        self.registry.update(key, auction)?;

        info!(key = %key, reserve = %reserve_price, "auction reserve price updated");
        self.events.push(AuctionEvent::AuctionReservePriceUpdated {
            key,
            reserve_price,
        });
        Ok(())
    }

    /// Place a bid. `tendered_value` is the native value sent along with
    /// the call; it must equal `amount` for native auctions and be zero for
    /// token auctions.
    ///
    /// # Errors
    /// `AuctionNotFound`, `NotApproved`, `Paused`, `Expired`,
    /// `ValueMismatch`, `BelowReserve`, `ShareSplitInvalid`, `BidTooLow`,
    /// `TransferRejected`.
    pub fn create_bid(
        &mut self,
        caller: Address,
        key: AuctionKey,
        amount: Amount,
        tendered_value: Amount,
    ) -> Result<BidReceipt> {
        let now = self.clock.now();
        let mut auction = self.registry.get(&key)?.clone();
        if !auction.approved {
            return Err(AuctionError::NotApproved(key));
        }
        self.pause.check()?;
        if let Some(ended_at) = auction.ends_at().filter(|_| auction.is_expired_at(now)) {
            return Err(AuctionError::Expired { key, ended_at });
        }
        let expected_value = if auction.currency.is_native() {
            amount
        } else {
            Amount::ZERO
        };
        if tendered_value != expected_value {
            return Err(AuctionError::ValueMismatch {
                amount,
                tendered: tendered_value,
            });
        }

        let currency = auction.currency;
        let previous = auction.bidder.map(|bidder| (bidder, auction.amount));
        let first_bid = previous.is_none();
        let buy_it_now = auction.triggers_buy_it_now(amount);
        let checkpoint = buy_it_now.then(|| self.checkpoint());
        let mut extended = false;
        if let Some(first_bid_time) = auction.first_bid_time {
            let minimum = auction.minimum_next_bid(self.config.min_bid_increment_percentage);
            if amount < minimum {
                return Err(AuctionError::BidTooLow { amount, minimum });
            }
            self.escrow.transfer_in(caller, amount, currency)?;

            let ext = time_extension::extend(
                first_bid_time,
                auction.duration,
                now,
                self.config.time_buffer_secs,
            );
            auction.duration = ext.duration;
            extended = ext.extended;
        } else {
            if amount.is_zero() || amount < auction.reserve_price {
                return Err(AuctionError::BelowReserve {
                    amount,
                    reserve: auction.reserve_price,
                });
            }
            let creator_split = self.creator_split(&key);
            if !fee_split::is_splittable(
                amount,
                auction.curator_fee_percentage,
                auction.has_curator(),
                creator_split,
            ) {
                return Err(AuctionError::ShareSplitInvalid(amount));
            }
            self.escrow.transfer_in(caller, amount, currency)?;

            auction.first_bid_time = Some(now);
        }

        self.place(key, auction, caller, amount, first_bid, extended)?;

        if let Some((outbid, refund)) = previous {
            self.escrow
                .pay_out(outbid, refund, currency)
                .map_err(|e| post_commit("refund of outbid bidder", &e))?;
        }

        let settlement = match checkpoint {
            Some(checkpoint) => {
                info!(key = %key, amount = %amount, "buy-it-now price met");
                match self.settle(key) {
                    Ok(settlement) => Some(settlement),
                    Err(e @ AuctionError::Internal(_)) => return Err(e),
                    Err(e) => {
                        warn!(
                            key = %key,
                            bidder = %caller,
                            error = %e,
                            "buy-it-now settlement failed; bid rolled back"
                        );
                        self.restore(checkpoint);
                        return Err(e);
                    }
                }
            }
            None => None,
        };
        Ok(BidReceipt {
            first_bid,
            extended,
            settlement,
        })
    }

    /// Cancel an auction that has no bids, returning the asset to its owner.
    /// Allowed while paused.
    ///
    /// # Errors
    /// `AuctionNotFound`, `Unauthorized`, `AlreadyStarted`,
    /// `TransferRejected` if the owner cannot take the asset back.
    pub fn cancel_auction(&mut self, caller: Address, key: AuctionKey) -> Result<()> {
        let auction = self.registry.get(&key)?;
        self.permissions
            .check(Operation::CancelAuction(auction), caller)?;
        if auction.has_bid() {
            return Err(AuctionError::AlreadyStarted(key));
        }

        let auction = self.registry.delete(&key)?;
        let asset_owner = auction.asset_owner;
        if let Err(e) = self.return_asset(&key, asset_owner) {
            self.registry.create(key, auction)?;
            return Err(e);
        }

        info!(key = %key, caller = %caller, owner = %asset_owner, "auction canceled");
        self.events
            .push(AuctionEvent::AuctionCanceled { key, asset_owner });
        Ok(())
    }

    /// Settle a finished auction. Anyone may call this.
    ///
    /// # Errors
    /// `Paused`, `AuctionNotFound`, `NotStarted`, `NotComplete`.
    pub fn end_auction(&mut self, caller: Address, key: AuctionKey) -> Result<Settlement> {
        self.pause.check()?;
        let now = self.clock.now();
        let auction = self.registry.get(&key)?;
        let Some(ends_at) = auction.ends_at() else {
            return Err(AuctionError::NotStarted(key));
        };
        if !auction.is_complete_at(now) {
            return Err(AuctionError::NotComplete { key, ends_at, now });
        }
        info!(key = %key, caller = %caller, "ending auction");
        self.settle(key)
    }

    // ---------------------------------------------------------------
    // Administration
    // ---------------------------------------------------------------

    /// # Errors
    /// `Unauthorized` unless `caller` is an admin.
    pub fn update_paused(&mut self, caller: Address, paused: bool) -> Result<()> {
        self.permissions.check(Operation::Administer, caller)?;
        self.pause.set_paused(paused);
        self.config.paused = paused;
        info!(admin = %caller, paused, "pause flag updated");
        Ok(())
    }

    /// # Errors
    /// `Unauthorized` unless `caller` is an admin.
    pub fn update_time_buffer(&mut self, caller: Address, secs: u64) -> Result<()> {
        self.permissions.check(Operation::Administer, caller)?;
        self.config.time_buffer_secs = secs;
        info!(admin = %caller, time_buffer_secs = secs, "time buffer updated");
        Ok(())
    }

    /// # Errors
    /// `Unauthorized` unless `caller` is an admin; `InvalidParameters` for
    /// an increment above 100.
    pub fn update_min_bid_increment_percentage(&mut self, caller: Address, pct: u8) -> Result<()> {
        self.permissions.check(Operation::Administer, caller)?;
        if pct > PERCENTAGE_SCALE {
            return Err(AuctionError::InvalidParameters {
                reason: format!("min bid increment {pct} exceeds {PERCENTAGE_SCALE}"),
            });
        }
        self.config.min_bid_increment_percentage = pct;
        info!(admin = %caller, min_bid_increment_percentage = pct, "min bid increment updated");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// # Errors
    /// `AuctionNotFound` if no auction is running for `key`.
    pub fn get_auction(&self, key: &AuctionKey) -> Result<&Auction> {
        self.registry.get(key)
    }

    /// All running auctions, sorted by key.
    #[must_use]
    pub fn auctions(&self) -> Vec<(&AuctionKey, &Auction)> {
        self.registry.iter().collect()
    }

    /// Key of `asset_id` in the bound collection.
    ///
    /// # Errors
    /// `InvalidParameters` in multi-collection mode.
    pub fn key_for(&self, asset_id: AssetId) -> Result<AuctionKey> {
        match self.config.collection_mode {
            CollectionMode::Single { asset_contract } => {
                Ok(AuctionKey::new(asset_contract, asset_id))
            }
            CollectionMode::Multi => Err(AuctionError::InvalidParameters {
                reason: "multi-collection house needs an asset contract".into(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuctionHouseConfig {
        &self.config
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    #[must_use]
    pub fn escrow(&self) -> &Escrow<L> {
        &self.escrow
    }

    /// Mutable escrow access, for funding accounts in the underlying
    /// ledger.
    pub fn escrow_mut(&mut self) -> &mut Escrow<L> {
        &mut self.escrow
    }

    #[must_use]
    pub fn custody(&self) -> &K {
        &self.custody
    }

    pub fn custody_mut(&mut self) -> &mut K {
        &mut self.custody
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Events emitted since the last drain.
    #[must_use]
    pub fn events(&self) -> &[AuctionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<AuctionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Escrow conservation across every currency that ever moved.
    ///
    /// # Errors
    /// `HoldingsInvariantViolation` on drift.
    pub fn verify_holdings(&self) -> Result<()> {
        self.escrow.verify_all_holdings()
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn resolve_contract(&self, requested: Option<Address>) -> Result<Address> {
        match (self.config.collection_mode, requested) {
            (CollectionMode::Single { asset_contract }, None) => Ok(asset_contract),
            (CollectionMode::Single { asset_contract }, Some(given)) if given == asset_contract => {
                Ok(asset_contract)
            }
            (CollectionMode::Single { asset_contract }, Some(given)) => {
                Err(AuctionError::InvalidParameters {
                    reason: format!("house is bound to {asset_contract}, got {given}"),
                })
            }
            (CollectionMode::Multi, Some(given)) => Ok(given),
            (CollectionMode::Multi, None) => Err(AuctionError::InvalidParameters {
                reason: "asset contract is required".into(),
            }),
        }
    }

    fn creator_split(&self, key: &AuctionKey) -> u8 {
        self.custody
            .royalty(key)
            .map_or(0, |r| r.creator_split_percentage.min(PERCENTAGE_SCALE))
    }

    fn checkpoint(&self) -> Checkpoint<L> {
        Checkpoint {
            registry: self.registry.clone(),
            escrow: self.escrow.clone(),
            events: self.events.len(),
        }
    }

    /// Roll the registry, escrow and event log back to `checkpoint`.
    /// Custody is not captured: only transfers that failed without moving
    /// the asset lead here.
    fn restore(&mut self, checkpoint: Checkpoint<L>) {
        self.registry = checkpoint.registry;
        self.escrow = checkpoint.escrow;
        self.events.truncate(checkpoint.events);
    }

    /// Commit a validated bid and record its event.
    fn place(
        &mut self,
        key: AuctionKey,
        mut auction: Auction,
        bidder: Address,
        amount: Amount,
        first_bid: bool,
        extended: bool,
    ) -> Result<()> {
        auction.amount = amount;
        auction.bidder = Some(bidder);
        let duration = auction.duration;
        self.registry.update(key, auction)?;

        info!(
            key = %key,
            bidder = %bidder,
            amount = %amount,
            first_bid,
            extended,
            duration,
            "bid placed"
        );
        self.events.push(AuctionEvent::AuctionBid {
            key,
            bidder,
            amount,
            first_bid,
            extended,
        });
        Ok(())
    }

    fn return_asset(&mut self, key: &AuctionKey, owner: Address) -> Result<()> {
        self.custody
            .transfer(key, self.config.house_address, owner)
            .map_err(|e| AuctionError::TransferRejected {
                reason: format!("returning {key} to {owner}: {e}"),
            })
    }

    /// Delete the record and deliver the asset, then either pay out the
    /// proceeds or revert the sale.
    fn settle(&mut self, key: AuctionKey) -> Result<Settlement> {
        let auction = self.registry.delete(&key)?;
        let Some(winner) = auction.bidder else {
            return Err(AuctionError::Internal(format!(
                "settling {key} without a bidder"
            )));
        };
        let house = self.config.house_address;

        match self.custody.transfer(&key, house, winner) {
            Ok(()) => {}
            Err(AuctionError::RecipientRefused(_)) => {
                return self.revert_sale(key, auction, winner);
            }
            Err(e) => return Err(post_commit("asset delivery", &e)),
        }

        let royalty = self.custody.royalty(&key);
        let split = FeeSplit::compute(
            auction.amount,
            auction.curator_fee_percentage,
            auction.has_curator(),
            self.creator_split(&key),
        );
        let currency = auction.currency;
        if auction.has_curator() {
            self.escrow
                .pay_out(auction.curator, split.curator_fee, currency)
                .map_err(|e| post_commit("curator fee", &e))?;
        }
        if let Some(royalty) = royalty {
            self.escrow
                .pay_out(royalty.creator, split.creator_share, currency)
                .map_err(|e| post_commit("creator share", &e))?;
        }
        self.escrow
            .pay_out(auction.asset_owner, split.owner_share, currency)
            .map_err(|e| post_commit("owner share", &e))?;

        info!(
            key = %key,
            winner = %winner,
            amount = %auction.amount,
            curator_fee = %split.curator_fee,
            creator_share = %split.creator_share,
            owner_share = %split.owner_share,
            "auction ended"
        );
        self.events.push(AuctionEvent::AuctionEnded {
            key,
            asset_owner: auction.asset_owner,
            curator: auction.curator,
            winner,
            amount: auction.amount,
            curator_fee: split.curator_fee,
            currency,
        });
        Ok(Settlement::Completed(SettledAuction {
            key,
            winner,
            amount: auction.amount,
            currency,
            asset_owner: auction.asset_owner,
            curator: auction.curator,
            creator: royalty.map(|r| r.creator),
            split,
        }))
    }

    fn revert_sale(&mut self, key: AuctionKey, auction: Auction, bidder: Address) -> Result<Settlement> {
        let asset_owner = auction.asset_owner;
        let amount = auction.amount;
        let currency = auction.currency;
        if let Err(e) = self.return_asset(&key, asset_owner) {
            self.registry.create(key, auction)?;
            return Err(e);
        }
        self.escrow
            .refund_escrowed(bidder, amount, currency)
            .map_err(|e| post_commit("refund of refused winner", &e))?;

        warn!(
            key = %key,
            bidder = %bidder,
            amount = %amount,
            "winner refused the asset; sale reverted"
        );
        self.events
            .push(AuctionEvent::AuctionCanceled { key, asset_owner });
        Ok(Settlement::Reverted {
            key,
            bidder,
            amount,
        })
    }
}

/// State captured before a bid that may settle immediately.
struct Checkpoint<L> {
    registry: AuctionRegistry,
    escrow: Escrow<L>,
    events: usize,
}

fn post_commit(step: &str, cause: &AuctionError) -> AuctionError {
    AuctionError::Internal(format!("{step} failed after commit: {cause}"))
}
