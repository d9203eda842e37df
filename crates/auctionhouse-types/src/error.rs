//! Error types for the AuctionHouse engine.
//!
//! All errors use the `AH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by class:
//! - 1xx: Validation errors
//! - 2xx: Authorization errors
//! - 3xx: Lifecycle state errors
//! - 4xx: Funds errors
//! - 5xx: Transfer errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the operation that raised it with no state change.

use thiserror::Error;

use crate::{Address, Amount, AuctionKey, Currency};

/// Coarse classification of an [`AuctionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    Funds,
    Transfer,
    Internal,
}

/// Central error enum for all AuctionHouse operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// Malformed parameters (curator fee >= 100%, unknown asset, ...).
    #[error("AH_ERR_100: Invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    /// The asset contract does not implement the expected asset interface.
    #[error("AH_ERR_101: Asset contract {0} does not support the asset interface")]
    UnsupportedAssetContract(Address),

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The caller lacks the role required for the operation.
    #[error("AH_ERR_200: {caller} is not authorized to {operation}")]
    Unauthorized { operation: String, caller: Address },

    // =================================================================
    // Lifecycle State Errors (3xx)
    // =================================================================
    #[error("AH_ERR_300: Auction not found: {0}")]
    AuctionNotFound(AuctionKey),

    /// An active auction already exists for this asset.
    #[error("AH_ERR_301: Auction already exists: {0}")]
    DuplicateAuction(AuctionKey),

    /// The operation is only allowed before the first bid.
    #[error("AH_ERR_302: Auction {0} has already started")]
    AlreadyStarted(AuctionKey),

    /// The operation needs at least one bid.
    #[error("AH_ERR_303: Auction {0} has not started")]
    NotStarted(AuctionKey),

    #[error("AH_ERR_304: Auction {key} has not completed: ends at {ends_at}, now {now}")]
    NotComplete { key: AuctionKey, ends_at: u64, now: u64 },

    #[error("AH_ERR_305: Auction {0} is not approved")]
    NotApproved(AuctionKey),

    #[error("AH_ERR_306: Auction house is paused")]
    Paused,

    #[error("AH_ERR_307: Auction {key} expired at {ended_at}")]
    Expired { key: AuctionKey, ended_at: u64 },

    // =================================================================
    // Funds Errors (4xx)
    // =================================================================
    /// Tendered native value differs from the bid amount.
    #[error("AH_ERR_400: Tendered value {tendered} does not match bid amount {amount}")]
    ValueMismatch { amount: Amount, tendered: Amount },

    #[error("AH_ERR_401: Bid {amount} is below the reserve price {reserve}")]
    BelowReserve { amount: Amount, reserve: Amount },

    /// The first bid would leave a rounding remainder in the creator split.
    #[error("AH_ERR_402: Bid {0} is invalid for share splitting")]
    ShareSplitInvalid(Amount),

    #[error("AH_ERR_403: Bid {amount} is below the minimum next bid {minimum}")]
    BidTooLow { amount: Amount, minimum: Amount },

    #[error("AH_ERR_404: Insufficient {currency} balance: need {needed}, have {available}")]
    InsufficientBalance {
        currency: Currency,
        needed: Amount,
        available: Amount,
    },

    #[error("AH_ERR_405: Amount overflow")]
    AmountOverflow,

    // =================================================================
    // Transfer Errors (5xx)
    // =================================================================
    /// Pulling funds into escrow failed (allowance, balance, or short
    /// delivery).
    #[error("AH_ERR_500: Transfer rejected: {reason}")]
    TransferRejected { reason: String },

    /// A recipient refused an inbound native payment or asset. Consumed
    /// by the payout and settlement fallbacks.
    #[error("AH_ERR_501: Recipient {0} refused the transfer")]
    RecipientRefused(Address),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Escrow ledger balance diverged from recorded deposits and payouts.
    #[error("AH_ERR_900: Escrow holdings invariant violated: {reason}")]
    HoldingsInvariantViolation { reason: String },

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("AH_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Unrecoverable internal error.
    #[error("AH_ERR_902: Internal error: {0}")]
    Internal(String),
}

impl AuctionError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameters { .. } | Self::UnsupportedAssetContract(_) => {
                ErrorKind::Validation
            }
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::AuctionNotFound(_)
            | Self::DuplicateAuction(_)
            | Self::AlreadyStarted(_)
            | Self::NotStarted(_)
            | Self::NotComplete { .. }
            | Self::NotApproved(_)
            | Self::Paused
            | Self::Expired { .. } => ErrorKind::State,
            Self::ValueMismatch { .. }
            | Self::BelowReserve { .. }
            | Self::ShareSplitInvalid(_)
            | Self::BidTooLow { .. }
            | Self::InsufficientBalance { .. }
            | Self::AmountOverflow => ErrorKind::Funds,
            Self::TransferRejected { .. } | Self::RecipientRefused(_) => ErrorKind::Transfer,
            Self::HoldingsInvariantViolation { .. } | Self::Configuration(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<serde_json::Error> for AuctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
