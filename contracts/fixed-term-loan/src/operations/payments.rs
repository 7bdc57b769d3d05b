use soroban_sdk::Env;

use crate::admin::Admin;
use crate::common::error::Error;
use crate::common::events::Events;
use crate::common::ledger::Ledger;
use crate::common::math;
use crate::common::storage::Storage;
use crate::common::types::LoanStorage;

/// Payment engine: scheduled payments and early closing.
///
/// Payments follow the reconciliation discipline of the ledger: the payer
/// transfers the funds asset to the contract and then calls `make_payment`
/// or `close_loan`, which consumes the unaccounted surplus (topped up from
/// drawable funds if the surplus falls short).
pub struct Payments;

impl Payments {
    /// The next scheduled payment as `(principal_portion, interest)`,
    /// including late charges once the due date has lapsed. The final
    /// scheduled payment pays the full outstanding principal.
    pub fn next_payment_breakdown(env: &Env) -> Result<(i128, i128), Error> {
        let loan = Storage::get(env);
        if loan.next_payment_due_date == 0 {
            return Err(Error::LoanNotActive);
        }
        Self::breakdown(&loan, env.ledger().timestamp())
    }

    /// The payment settling the loan in full right now:
    /// the outstanding principal plus the flat closing fee.
    pub fn closing_payment_breakdown(env: &Env) -> Result<(i128, i128), Error> {
        let loan = Storage::get(env);
        if loan.next_payment_due_date == 0 {
            return Err(Error::LoanNotActive);
        }
        let interest = math::flat_fee(loan.principal, loan.closing_rate)?;
        Ok((loan.principal, interest))
    }

    /// Make the next scheduled payment.
    ///
    /// Consumes `principal_portion + interest` out of the unaccounted
    /// funds-asset surplus plus drawable funds, accrues the total to the
    /// lender's claimable funds, retires the principal portion and advances
    /// the schedule. The final payment deactivates the loan.
    ///
    /// # Returns
    /// * `Ok((principal_portion, interest))` - The settled breakdown
    ///
    /// # Errors
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `LoanNotActive` - The loan is not active
    /// * `InsufficientPayment` - Unaccounted surplus plus drawable funds do
    ///   not cover the payment
    pub fn make_payment(env: &Env) -> Result<(i128, i128), Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;
        if loan.next_payment_due_date == 0 {
            return Err(Error::LoanNotActive);
        }

        let (principal_portion, interest) = Self::breakdown(&loan, env.ledger().timestamp())?;
        let total = principal_portion
            .checked_add(interest)
            .ok_or(Error::Overflow)?;

        Self::settle(env, &mut loan, principal_portion, total)?;

        loan.payments_remaining = loan
            .payments_remaining
            .checked_sub(1)
            .ok_or(Error::Overflow)?;
        if loan.payments_remaining == 0 {
            loan.next_payment_due_date = 0;
        } else {
            loan.next_payment_due_date = loan
                .next_payment_due_date
                .checked_add(loan.payment_interval)
                .ok_or(Error::Overflow)?;
        }

        Storage::set(env, &loan);

        Events::payment_made(env, principal_portion, interest);

        Ok((principal_portion, interest))
    }

    /// Repay the whole loan ahead of schedule.
    ///
    /// Only possible while the current payment is not yet late; the payoff
    /// is the outstanding principal plus the flat closing fee.
    ///
    /// # Errors
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `LoanNotActive` - The loan is not active
    /// * `PaymentPastDue` - The due date has already lapsed
    /// * `InsufficientPayment` - Funds do not cover the payoff
    pub fn close_loan(env: &Env) -> Result<(i128, i128), Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;
        if loan.next_payment_due_date == 0 {
            return Err(Error::LoanNotActive);
        }
        if env.ledger().timestamp() > loan.next_payment_due_date {
            return Err(Error::PaymentPastDue);
        }

        let principal_paid = loan.principal;
        let interest = math::flat_fee(principal_paid, loan.closing_rate)?;
        let total = principal_paid.checked_add(interest).ok_or(Error::Overflow)?;

        Self::settle(env, &mut loan, principal_paid, total)?;

        loan.payments_remaining = 0;
        loan.next_payment_due_date = 0;

        Storage::set(env, &loan);

        Events::loan_closed(env, principal_paid, interest);

        Ok((principal_paid, interest))
    }

    /// Reconcile a payment of `total` (retiring `principal_portion`) against
    /// the unaccounted surplus and the drawable bucket.
    fn settle(
        env: &Env,
        loan: &mut LoanStorage,
        principal_portion: i128,
        total: i128,
    ) -> Result<(), Error> {
        let unaccounted = Ledger::unaccounted(env, loan, &loan.funds_asset)?;
        let available = loan
            .drawable_funds
            .checked_add(unaccounted)
            .ok_or(Error::Overflow)?;
        if available < total {
            return Err(Error::InsufficientPayment);
        }

        loan.drawable_funds = available - total;
        loan.claimable_funds = loan
            .claimable_funds
            .checked_add(total)
            .ok_or(Error::Overflow)?;

        if principal_portion > loan.principal {
            return Err(Error::Overflow);
        }
        loan.principal = loan
            .principal
            .checked_sub(principal_portion)
            .ok_or(Error::Overflow)?;

        Ok(())
    }

    fn breakdown(loan: &LoanStorage, now: u64) -> Result<(i128, i128), Error> {
        let (mut principal_portion, mut interest) = math::installment(
            loan.principal,
            loan.ending_principal,
            loan.interest_rate,
            loan.payment_interval,
            loan.payments_remaining,
        )?;

        // The last scheduled payment settles everything, balloon included.
        if loan.payments_remaining == 1 {
            principal_portion = loan.principal;
        }

        if now > loan.next_payment_due_date {
            let elapsed = now - loan.next_payment_due_date;
            let premium_interest = math::late_interest(
                loan.principal,
                loan.interest_rate,
                loan.late_interest_premium,
                elapsed,
            )?;
            let late_fee = math::flat_fee(loan.principal, loan.late_fee_rate)?;
            interest = interest
                .checked_add(premium_interest)
                .ok_or(Error::Overflow)?
                .checked_add(late_fee)
                .ok_or(Error::Overflow)?;
        }

        Ok((principal_portion, interest))
    }
}
