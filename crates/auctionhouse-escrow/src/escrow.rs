//! Escrow of bid funds.
//!
//! Native bids are wrapped on deposit, so the house only ever holds tokens.
//! Payouts unwrap and push native currency; if the recipient refuses it,
//! the payout falls back to the wrapped token.

use auctionhouse_types::{Address, Amount, AuctionError, Currency, Result};
use tracing::{debug, warn};

use crate::{holdings::HoldingsTracker, ledger::Ledger};

/// How a payout reached its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payout {
    /// Zero amount; nothing moved.
    Skipped,
    /// Unwrapped and pushed as native currency.
    Native,
    /// Recipient refused native currency and got the wrapped token.
    Wrapped,
    /// Plain token transfer.
    Token,
}

/// Holds bid funds on behalf of the house address.
#[derive(Debug, Clone)]
pub struct Escrow<L> {
    ledger: L,
    /// Address that holds escrowed funds.
    holder: Address,
    wrapped_native: Address,
    holdings: HoldingsTracker,
}

impl<L: Ledger> Escrow<L> {
    #[must_use]
    pub fn new(ledger: L, holder: Address, wrapped_native: Address) -> Self {
        Self {
            ledger,
            holder,
            wrapped_native,
            holdings: HoldingsTracker::new(),
        }
    }

    #[must_use]
    pub fn holder(&self) -> Address {
        self.holder
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access, e.g. to fund test accounts. Moving the
    /// holder's balance through it breaks [`Self::verify_holdings`].
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    #[must_use]
    pub fn holdings(&self) -> &HoldingsTracker {
        &self.holdings
    }

    /// The currency the house actually holds for an auction settled in
    /// `currency`.
    #[must_use]
    pub fn held_currency(&self, currency: Currency) -> Currency {
        match currency {
            Currency::Native => Currency::Token(self.wrapped_native),
            token @ Currency::Token(_) => token,
        }
    }

    /// Move native currency from `payer` into escrow and wrap it.
    ///
    /// # Errors
    /// `TransferRejected` if the payer cannot cover `amount`.
    pub fn deposit_native(&mut self, payer: Address, amount: Amount) -> Result<()> {
        self.ledger
            .transfer(Currency::Native, payer, self.holder, amount)
            .map_err(|e| rejected("native deposit", &e))?;
        if let Err(e) = self.ledger.wrap(self.holder, amount) {
            // Undo the deposit so the payer is made whole.
            self.ledger
                .transfer(Currency::Native, self.holder, payer, amount)?;
            return Err(rejected("wrap", &e));
        }
        self.holdings
            .record_received(Currency::Token(self.wrapped_native), amount);
        debug!(payer = %payer, amount = %amount, "native deposit wrapped into escrow");
        Ok(())
    }

    /// Pull `amount` of `currency` from `payer` into escrow.
    ///
    /// Tokens are pulled with the house's allowance. The house balance
    /// must rise by exactly `amount`; tokens that skim a fee are refused
    /// and the pull is rolled back.
    ///
    /// # Errors
    /// `TransferRejected` on insufficient allowance or balance, or when
    /// the token delivers less than `amount`.
    pub fn transfer_in(&mut self, payer: Address, amount: Amount, currency: Currency) -> Result<()>
    where
        L: Clone,
    {
        let token = match currency {
            Currency::Native => return self.deposit_native(payer, amount),
            Currency::Token(token) => token,
        };

        let before = self.ledger.balance(self.holder, currency);
        let snapshot = self.ledger.clone();
        self.ledger
            .transfer_from(token, self.holder, payer, self.holder, amount)
            .map_err(|e| rejected("token pull", &e))?;
        let after = self.ledger.balance(self.holder, currency);

        let received = after.checked_sub(before).unwrap_or_default();
        if received != amount {
            self.ledger = snapshot;
            return Err(AuctionError::TransferRejected {
                reason: format!("token {token} delivered {received} of {amount}"),
            });
        }

        self.holdings.record_received(currency, amount);
        debug!(payer = %payer, amount = %amount, currency = %currency, "token pulled into escrow");
        Ok(())
    }

    /// Pay `amount` out of escrow.
    ///
    /// Native auctions unwrap and push native currency, falling back to the
    /// wrapped token when the recipient refuses it.
    ///
    /// # Errors
    /// Ledger errors other than a native refusal; these indicate the
    /// escrow does not hold what it owes.
    pub fn pay_out(&mut self, recipient: Address, amount: Amount, currency: Currency) -> Result<Payout> {
        if amount.is_zero() {
            return Ok(Payout::Skipped);
        }
        let held = self.held_currency(currency);

        let payout = if currency.is_native() {
            self.ledger.unwrap(self.holder, amount)?;
            match self
                .ledger
                .transfer(Currency::Native, self.holder, recipient, amount)
            {
                Ok(()) => Payout::Native,
                Err(AuctionError::RecipientRefused(_)) => {
                    self.ledger.wrap(self.holder, amount)?;
                    self.ledger.transfer(held, self.holder, recipient, amount)?;
                    warn!(
                        recipient = %recipient,
                        amount = %amount,
                        "recipient refused native payout; paid in wrapped token"
                    );
                    Payout::Wrapped
                }
                Err(e) => {
                    self.ledger.wrap(self.holder, amount)?;
                    return Err(e);
                }
            }
        } else {
            self.ledger.transfer(held, self.holder, recipient, amount)?;
            Payout::Token
        };

        self.holdings.record_paid_out(held, amount);
        debug!(recipient = %recipient, amount = %amount, payout = ?payout, "escrow payout");
        Ok(payout)
    }

    /// Return `amount` in its escrowed form (wrapped for native auctions)
    /// without attempting a native push.
    ///
    /// # Errors
    /// Ledger errors; the escrow does not hold what it owes.
    pub fn refund_escrowed(&mut self, recipient: Address, amount: Amount, currency: Currency) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let held = self.held_currency(currency);
        self.ledger.transfer(held, self.holder, recipient, amount)?;
        self.holdings.record_paid_out(held, amount);
        debug!(recipient = %recipient, amount = %amount, currency = %held, "escrowed refund");
        Ok(())
    }

    /// Check the holder's balance of the held form of `currency` against
    /// the escrow's own bookkeeping.
    ///
    /// # Errors
    /// `HoldingsInvariantViolation` on any drift.
    pub fn verify_holdings(&self, currency: Currency) -> Result<()> {
        let held = self.held_currency(currency);
        self.holdings
            .verify(held, self.ledger.balance(self.holder, held))
    }

    /// [`Self::verify_holdings`] for every currency that ever moved.
    ///
    /// # Errors
    /// The first violation found.
    pub fn verify_all_holdings(&self) -> Result<()> {
        self.holdings
            .tracked_currencies()
            .into_iter()
            .try_for_each(|c| self.verify_holdings(c))
    }
}

fn rejected(step: &str, cause: &AuctionError) -> AuctionError {
    AuctionError::TransferRejected {
        reason: format!("{step} failed: {cause}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    struct Fixture {
        escrow: Escrow<InMemoryLedger>,
        house: Address,
        weth: Address,
        alice: Address,
    }

    fn setup() -> Fixture {
        let house = Address::from_label("house");
        let weth = Address::from_label("weth");
        let alice = Address::random();
        let mut ledger = InMemoryLedger::new(weth);
        ledger
            .deposit(alice, Currency::Native, Amount(1_000))
            .unwrap();
        Fixture {
            escrow: Escrow::new(ledger, house, weth),
            house,
            weth,
            alice,
        }
    }

    #[test]
    fn native_deposit_is_held_wrapped() {
        let mut f = setup();
        f.escrow.transfer_in(f.alice, Amount(400), Currency::Native).unwrap();

        let ledger = f.escrow.ledger();
        assert_eq!(ledger.balance(f.alice, Currency::Native), Amount(600));
        assert!(ledger.balance(f.house, Currency::Native).is_zero());
        assert_eq!(ledger.balance(f.house, Currency::Token(f.weth)), Amount(400));
        f.escrow.verify_holdings(Currency::Native).unwrap();
    }

    #[test]
    fn native_deposit_without_funds_is_rejected() {
        let mut f = setup();
        let err = f
            .escrow
            .deposit_native(f.alice, Amount(5_000))
            .unwrap_err();
        assert!(matches!(err, AuctionError::TransferRejected { .. }));
        assert_eq!(f.escrow.ledger().balance(f.alice, Currency::Native), Amount(1_000));
    }

    #[test]
    fn native_payout_pushes_native() {
        let mut f = setup();
        let bob = Address::random();
        f.escrow.transfer_in(f.alice, Amount(400), Currency::Native).unwrap();

        let payout = f.escrow.pay_out(bob, Amount(150), Currency::Native).unwrap();
        assert_eq!(payout, Payout::Native);
        assert_eq!(f.escrow.ledger().balance(bob, Currency::Native), Amount(150));
        f.escrow.verify_holdings(Currency::Native).unwrap();
    }

    #[test]
    fn refused_native_payout_falls_back_to_wrapped() {
        let mut f = setup();
        let hostile = Address::random();
        f.escrow.ledger_mut().refuse_native(hostile);
        f.escrow.transfer_in(f.alice, Amount(400), Currency::Native).unwrap();

        let payout = f.escrow.pay_out(hostile, Amount(400), Currency::Native).unwrap();
        assert_eq!(payout, Payout::Wrapped);
        let ledger = f.escrow.ledger();
        assert_eq!(ledger.balance(hostile, Currency::Token(f.weth)), Amount(400));
        assert!(ledger.balance(hostile, Currency::Native).is_zero());
        assert!(ledger.balance(f.house, Currency::Native).is_zero());
        f.escrow.verify_holdings(Currency::Native).unwrap();
    }

    #[test]
    fn zero_payout_is_skipped() {
        let mut f = setup();
        let payout = f
            .escrow
            .pay_out(Address::random(), Amount::ZERO, Currency::Native)
            .unwrap();
        assert_eq!(payout, Payout::Skipped);
    }

    #[test]
    fn refund_escrowed_returns_wrapped() {
        let mut f = setup();
        f.escrow.transfer_in(f.alice, Amount(400), Currency::Native).unwrap();
        f.escrow.refund_escrowed(f.alice, Amount(400), Currency::Native).unwrap();

        let ledger = f.escrow.ledger();
        assert_eq!(ledger.balance(f.alice, Currency::Token(f.weth)), Amount(400));
        assert_eq!(ledger.balance(f.alice, Currency::Native), Amount(600));
        f.escrow.verify_holdings(Currency::Native).unwrap();
    }

    #[test]
    fn token_pull_and_payout() {
        let mut f = setup();
        let usdc = Address::from_label("usdc");
        let currency = Currency::Token(usdc);
        let ledger = f.escrow.ledger_mut();
        ledger.deposit(f.alice, currency, Amount(10_000)).unwrap();
        ledger.approve(f.alice, f.house, usdc, Amount(10_000));

        f.escrow.transfer_in(f.alice, Amount(2_500), currency).unwrap();
        let payout = f.escrow.pay_out(f.alice, Amount(500), currency).unwrap();
        assert_eq!(payout, Payout::Token);
        assert_eq!(f.escrow.ledger().balance(f.house, currency), Amount(2_000));
        f.escrow.verify_all_holdings().unwrap();
    }

    #[test]
    fn token_pull_without_allowance_is_rejected() {
        let mut f = setup();
        let usdc = Address::from_label("usdc");
        let currency = Currency::Token(usdc);
        f.escrow
            .ledger_mut()
            .deposit(f.alice, currency, Amount(10_000))
            .unwrap();

        let err = f.escrow.transfer_in(f.alice, Amount(1), currency).unwrap_err();
        assert!(matches!(err, AuctionError::TransferRejected { .. }));
    }

    #[test]
    fn fee_on_transfer_token_is_rolled_back() {
        let mut f = setup();
        let skim = Address::from_label("skim");
        let currency = Currency::Token(skim);
        let ledger = f.escrow.ledger_mut();
        ledger.deposit(f.alice, currency, Amount(1_000)).unwrap();
        ledger.approve(f.alice, f.house, skim, Amount(1_000));
        ledger.set_transfer_fee(skim, 2);

        let err = f.escrow.transfer_in(f.alice, Amount(500), currency).unwrap_err();
        assert!(matches!(err, AuctionError::TransferRejected { .. }));

        let ledger = f.escrow.ledger();
        assert_eq!(ledger.balance(f.alice, currency), Amount(1_000));
        assert!(ledger.balance(f.house, currency).is_zero());
        assert_eq!(ledger.allowance(f.alice, f.house, skim), Amount(1_000));
        assert_eq!(f.escrow.holdings().total_received(currency), Amount::ZERO);
    }

    #[test]
    fn drift_is_detected() {
        let mut f = setup();
        f.escrow.transfer_in(f.alice, Amount(400), Currency::Native).unwrap();
        let weth = Currency::Token(f.weth);
        f.escrow
            .ledger_mut()
            .deposit(f.house, weth, Amount(1))
            .unwrap();

        let err = f.escrow.verify_holdings(Currency::Native).unwrap_err();
        assert!(matches!(err, AuctionError::HoldingsInvariantViolation { .. }));
    }
}
