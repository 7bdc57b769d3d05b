use soroban_sdk::{Address, Env, token::TokenClient};

use crate::admin::Admin;
use crate::common::error::Error;
use crate::common::events::Events;
use crate::common::ledger::Ledger;
use crate::common::storage::Storage;

/// Default handling: the lender seizes everything the contract holds once
/// the grace period after a missed payment has lapsed.
pub struct Repossess;

impl Repossess {
    /// Repossess a defaulted loan (lender only).
    ///
    /// Requires the loan to be active and
    /// `now > next_payment_due_date + grace_period`. Zeroes every ledger
    /// bucket, unbinds the lender, and sweeps the full balance of both
    /// assets to `destination`.
    ///
    /// # Returns
    /// * `Ok((collateral_repossessed, funds_repossessed))`
    ///
    /// # Errors
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `NotLender` - No lender is bound
    /// * `LoanNotActive` - The loan is not active
    /// * `NotInDefault` - The grace period has not lapsed yet
    pub fn repossess(env: &Env, destination: &Address) -> Result<(i128, i128), Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;
        let lender = loan.lender.clone().ok_or(Error::NotLender)?;
        lender.require_auth();

        if loan.next_payment_due_date == 0 {
            return Err(Error::LoanNotActive);
        }
        let deadline = loan
            .next_payment_due_date
            .checked_add(loan.grace_period)
            .ok_or(Error::Overflow)?;
        if env.ledger().timestamp() <= deadline {
            return Err(Error::NotInDefault);
        }

        loan.drawable_funds = 0;
        loan.claimable_funds = 0;
        loan.collateral = 0;
        loan.principal = 0;
        loan.payments_remaining = 0;
        loan.next_payment_due_date = 0;
        loan.lender = None;

        Storage::set(env, &loan);

        // With the buckets zeroed, both full balances are unaccounted.
        let this = env.current_contract_address();
        let collateral_repossessed = Ledger::unaccounted(env, &loan, &loan.collateral_asset)?;
        if collateral_repossessed > 0 {
            TokenClient::new(env, &loan.collateral_asset).transfer(
                &this,
                destination,
                &collateral_repossessed,
            );
        }
        let funds_repossessed = Ledger::unaccounted(env, &loan, &loan.funds_asset)?;
        if funds_repossessed > 0 {
            TokenClient::new(env, &loan.funds_asset).transfer(
                &this,
                destination,
                &funds_repossessed,
            );
        }

        Events::repossessed(env, collateral_repossessed, funds_repossessed, destination);

        Ok((collateral_repossessed, funds_repossessed))
    }
}
