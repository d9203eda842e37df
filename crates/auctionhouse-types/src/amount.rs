//! Monetary amounts and settlement currencies.
//!
//! All amounts are unsigned integers in the currency's smallest unit
//! (wei for the native currency). Percentage math floors, exactly like the
//! settlement arithmetic requires, and never overflows.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, AuctionError, Result, constants};

/// An amount in the smallest unit of some currency.
///
/// Serialized as a decimal string so that 128-bit values survive JSON.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// `floor(self * pct / 100)` for `pct <= 100`.
    ///
    /// Computed as `q * pct + floor(r * pct / 100)` with `self = 100q + r`,
    /// so the intermediate never exceeds `self`.
    #[must_use]
    pub fn percentage(self, pct: u8) -> Self {
        debug_assert!(pct <= 100, "percentage out of range: {pct}");
        let pct = u128::from(pct);
        let (q, r) = (self.0 / 100, self.0 % 100);
        Self(q * pct + (r * pct) / 100)
    }

    /// Whether `self * pct / 100` is an integer (no rounding loss).
    #[must_use]
    pub fn percentage_is_exact(self, pct: u8) -> bool {
        ((self.0 % 100) * u128::from(pct)) % 100 == 0
    }

    /// Convert a human-denominated value (e.g. `1.5` native units) into the
    /// smallest unit, given the currency's number of decimals.
    ///
    /// # Errors
    /// - `InvalidParameters` for negative values or excess precision
    /// - `AmountOverflow` if the result does not fit
    pub fn from_decimal(value: Decimal, decimals: u32) -> Result<Self> {
        if decimals > constants::MAX_DECIMALS {
            return Err(AuctionError::InvalidParameters {
                reason: format!("at most {} decimals supported", constants::MAX_DECIMALS),
            });
        }
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AuctionError::InvalidParameters {
                reason: format!("negative amount {value}"),
            });
        }
        let unit = Decimal::from_i128_with_scale(10i128.pow(decimals), 0);
        let mut scaled = value.checked_mul(unit).ok_or(AuctionError::AmountOverflow)?;
        if !scaled.fract().is_zero() {
            return Err(AuctionError::InvalidParameters {
                reason: format!("{value} has more than {decimals} decimal places"),
            });
        }
        scaled.rescale(0);
        u128::try_from(scaled.mantissa())
            .map(Self)
            .map_err(|_| AuctionError::AmountOverflow)
    }

    /// Human-denominated view of this amount. `None` if it exceeds the
    /// 96-bit `Decimal` mantissa.
    #[must_use]
    pub fn to_decimal(self, decimals: u32) -> Option<Decimal> {
        let units = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(units, decimals)
            .ok()
            .map(|d| d.normalize())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl FromStr for Amount {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u128>()
            .map(Self)
            .map_err(|e| AuctionError::InvalidParameters {
                reason: format!("invalid amount {s:?}: {e}"),
            })
    }
}

impl TryFrom<String> for Amount {
    type Error = AuctionError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Currency an auction settles in, and the unit of every ledger balance.
///
/// Native-currency auctions escrow their funds as the wrapped token; see
/// the escrow crate for the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// The chain's native currency.
    Native,
    /// A fungible token contract.
    Token(Address),
}

impl Currency {
    /// Entry points take a raw address where zero means native.
    #[must_use]
    pub fn from_address(address: Address) -> Self {
        if address.is_zero() {
            Self::Native
        } else {
            Self::Token(address)
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Inverse of [`Currency::from_address`].
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Native => Address::ZERO,
            Self::Token(address) => *address,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "NATIVE"),
            Self::Token(address) => write!(f, "token:{}", address.short()),
        }
    }
}
