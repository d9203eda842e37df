//! Fungible balances: the native currency and token contracts.
//!
//! [`Ledger`] is the seam to the currency collaborators (the chain's native
//! transfers, the wrapped-native token, arbitrary tokens). [`InMemoryLedger`]
//! implements it with per-(holder, currency) balances. All mutations are
//! atomic: either the full operation succeeds or no balance changes.

use std::collections::{HashMap, HashSet};

use auctionhouse_types::{Address, Amount, AuctionError, Currency, Result};

/// Currency movements the escrow relies on.
pub trait Ledger {
    /// Balance of `currency` held by `holder`.
    fn balance(&self, holder: Address, currency: Currency) -> Amount;

    /// Push `amount` from `from` to `to`.
    ///
    /// # Errors
    /// - `InsufficientBalance` if `from` holds less than `amount`
    /// - `RecipientRefused` if `to` rejects native currency
    fn transfer(
        &mut self,
        currency: Currency,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Pull `amount` of `token` from `from` to `to`, spending `spender`'s
    /// allowance.
    ///
    /// # Errors
    /// `TransferRejected` on insufficient allowance, `InsufficientBalance`
    /// on insufficient balance.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Convert `holder`'s native currency into the wrapped token.
    fn wrap(&mut self, holder: Address, amount: Amount) -> Result<()>;

    /// Convert `holder`'s wrapped tokens back into native currency.
    fn unwrap(&mut self, holder: Address, amount: Amount) -> Result<()>;
}

/// In-memory [`Ledger`].
///
/// Besides plain balances it can model hostile or quirky counterparties:
/// addresses that refuse native payments, and tokens that skim a fee on
/// every pull.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    /// The wrapped-native token contract.
    wrapped_native: Address,
    /// Per-(holder, currency) balances.
    balances: HashMap<(Address, Currency), Amount>,
    /// (owner, spender, token) → remaining allowance.
    allowances: HashMap<(Address, Address, Address), Amount>,
    /// Addresses whose native-receive hook reverts.
    native_refusers: HashSet<Address>,
    /// Tokens that deliver `amount - fee` on `transfer_from`.
    transfer_fees: HashMap<Address, u8>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new(wrapped_native: Address) -> Self {
        Self {
            wrapped_native,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            native_refusers: HashSet::new(),
            transfer_fees: HashMap::new(),
        }
    }

    #[must_use]
    pub fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    /// Mint funds to a holder.
    ///
    /// # Errors
    /// `AmountOverflow` if the balance would exceed `u128::MAX`.
    pub fn deposit(&mut self, holder: Address, currency: Currency, amount: Amount) -> Result<()> {
        self.credit(holder, currency, amount)
    }

    /// Set `spender`'s allowance over `owner`'s `token`.
    pub fn approve(&mut self, owner: Address, spender: Address, token: Address, amount: Amount) {
        self.allowances.insert((owner, spender, token), amount);
    }

    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address, token: Address) -> Amount {
        self.allowances
            .get(&(owner, spender, token))
            .copied()
            .unwrap_or_default()
    }

    /// Make `holder` revert on every inbound native payment.
    pub fn refuse_native(&mut self, holder: Address) {
        self.native_refusers.insert(holder);
    }

    /// Make `token` deliver `amount - floor(amount * pct / 100)` on pulls.
    pub fn set_transfer_fee(&mut self, token: Address, pct: u8) {
        self.transfer_fees.insert(token, pct);
    }

    /// Sum of every holder's balance of `currency`, saturating at `u128::MAX`.
    #[must_use]
    pub fn total_supply(&self, currency: Currency) -> Amount {
        Amount(
            self.balances
                .iter()
                .filter(|((_, c), _)| *c == currency)
                .fold(0u128, |total, (_, amount)| total.saturating_add(amount.0)),
        )
    }

    fn debit(&mut self, holder: Address, currency: Currency, amount: Amount) -> Result<()> {
        let available = self.balance(holder, currency);
        let remaining = available
            .checked_sub(amount)
            .ok_or(AuctionError::InsufficientBalance {
                currency,
                needed: amount,
                available,
            })?;
        self.balances.insert((holder, currency), remaining);
        Ok(())
    }

    fn credit(&mut self, holder: Address, currency: Currency, amount: Amount) -> Result<()> {
        let updated = self
            .balance(holder, currency)
            .checked_add(amount)
            .ok_or(AuctionError::AmountOverflow)?;
        self.balances.insert((holder, currency), updated);
        Ok(())
    }

    /// Debit `from` and credit `to`, validating both sides before touching
    /// either balance.
    fn mov(
        &mut self,
        from: (Address, Currency),
        to: (Address, Currency),
        debit: Amount,
        credit: Amount,
    ) -> Result<()> {
        let available = self.balance(from.0, from.1);
        if available < debit {
            return Err(AuctionError::InsufficientBalance {
                currency: from.1,
                needed: debit,
                available,
            });
        }
        // Self-transfers leave the balance unchanged apart from any burn.
        let target_after_debit = if from == to {
            available.checked_sub(debit).unwrap_or_default()
        } else {
            self.balance(to.0, to.1)
        };
        target_after_debit
            .checked_add(credit)
            .ok_or(AuctionError::AmountOverflow)?;

        self.debit(from.0, from.1, debit)?;
        self.credit(to.0, to.1, credit)
    }
}

impl Ledger for InMemoryLedger {
    fn balance(&self, holder: Address, currency: Currency) -> Amount {
        self.balances
            .get(&(holder, currency))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        currency: Currency,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        if currency.is_native() && self.native_refusers.contains(&to) {
            return Err(AuctionError::RecipientRefused(to));
        }
        self.mov((from, currency), (to, currency), amount, amount)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        let allowance = self.allowance(from, spender, token);
        if allowance < amount {
            return Err(AuctionError::TransferRejected {
                reason: format!(
                    "allowance {allowance} of {spender} over {from} is below {amount}"
                ),
            });
        }
        let fee = self
            .transfer_fees
            .get(&token)
            .map_or(Amount::ZERO, |pct| amount.percentage(*pct));
        let delivered = amount.checked_sub(fee).unwrap_or_default();
        let currency = Currency::Token(token);
        self.mov((from, currency), (to, currency), amount, delivered)?;
        self.allowances
            .insert((from, spender, token), Amount(allowance.0 - amount.0));
        Ok(())
    }

    fn wrap(&mut self, holder: Address, amount: Amount) -> Result<()> {
        let wrapped = Currency::Token(self.wrapped_native);
        self.mov((holder, Currency::Native), (holder, wrapped), amount, amount)
    }

    fn unwrap(&mut self, holder: Address, amount: Amount) -> Result<()> {
        let wrapped = Currency::Token(self.wrapped_native);
        self.mov((holder, wrapped), (holder, Currency::Native), amount, amount)
    }
}
