use soroban_sdk::{Address, Env, token::TokenClient};

use crate::admin::Admin;
use crate::common::error::Error;
use crate::common::events::Events;
use crate::common::ledger::Ledger;
use crate::common::math;
use crate::common::storage::Storage;
use crate::interfaces::LenderClient;

/// Funding flow: activating the loan against funds already delivered to the
/// contract, and splitting the fund-time fees.
pub struct Funding;

impl Funding {
    /// Fund the loan and bind the lender.
    ///
    /// The requested principal must already sit in the contract as
    /// unaccounted funds-asset balance; callable by anyone who delivered it.
    /// Queries the lender capability for the fee split, withholds both fees
    /// from the drawable funds, and credits any over-funding to the lender's
    /// claimable funds.
    ///
    /// Re-funding an already-active loan mutates nothing: the unaccounted
    /// surplus is rebated to the stored lender and 0 is returned.
    ///
    /// # Arguments
    /// * `env` - The contract environment
    /// * `lender` - Contract exposing the lender capability, bound as lender
    ///
    /// # Returns
    /// * `Ok(amount)` - The principal amount the loan was funded with
    /// * `Err(Error)` - Various errors (see error codes below)
    ///
    /// # Errors
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `NoPaymentsRemaining` - The payment schedule is exhausted
    /// * `InsufficientFunding` - Unaccounted funds below the requested
    ///   principal, or the fee split exceeds it
    /// * `InsufficientCollateral` - Collateralization not maintained after
    ///   the fee withholding
    /// * `Overflow` - Overflow in fee or due-date calculations
    pub fn fund_loan(env: &Env, lender: &Address) -> Result<i128, Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;

        // Re-funding an active loan only redirects the surplus.
        if loan.next_payment_due_date != 0 {
            let stored = loan.lender.clone().ok_or(Error::NotLender)?;
            let surplus = Ledger::unaccounted(env, &loan, &loan.funds_asset)?;
            if surplus > 0 {
                TokenClient::new(env, &loan.funds_asset).transfer(
                    &env.current_contract_address(),
                    &stored,
                    &surplus,
                );
            }
            return Ok(0);
        }

        if loan.payments_remaining == 0 {
            return Err(Error::NoPaymentsRemaining);
        }

        let unaccounted = Ledger::unaccounted(env, &loan, &loan.funds_asset)?;
        if unaccounted < loan.principal_requested {
            return Err(Error::InsufficientFunding);
        }

        let lender_client = LenderClient::new(env, lender);
        let treasury_fee = math::pro_rated_fee(
            loan.principal_requested,
            lender_client.treasury_fee(),
            loan.payment_interval,
            loan.payments_remaining,
        )?;
        let delegate_fee = math::pro_rated_fee(
            loan.principal_requested,
            lender_client.investor_fee(),
            loan.payment_interval,
            loan.payments_remaining,
        )?;
        let fees = treasury_fee.checked_add(delegate_fee).ok_or(Error::Overflow)?;
        if fees > loan.principal_requested {
            return Err(Error::InsufficientFunding);
        }

        loan.lender = Some(lender.clone());
        loan.principal = loan.principal_requested;
        loan.next_payment_due_date = env
            .ledger()
            .timestamp()
            .checked_add(loan.payment_interval)
            .ok_or(Error::Overflow)?;
        loan.drawable_funds = loan.principal_requested - fees;
        // Over-funding beyond the requested principal accrues to the lender.
        loan.claimable_funds = loan
            .claimable_funds
            .checked_add(unaccounted - loan.principal_requested)
            .ok_or(Error::Overflow)?;

        if !Ledger::is_collateral_maintained(&loan)? {
            return Err(Error::InsufficientCollateral);
        }

        Storage::set(env, &loan);

        let this = env.current_contract_address();
        let funds = TokenClient::new(env, &loan.funds_asset);
        if treasury_fee > 0 {
            funds.transfer(&this, &lender_client.treasury(), &treasury_fee);
        }
        if delegate_fee > 0 {
            funds.transfer(&this, &lender_client.pool_delegate(), &delegate_fee);
        }

        Events::funded(env, lender, loan.principal_requested, loan.next_payment_due_date);

        Ok(loan.principal_requested)
    }
}
