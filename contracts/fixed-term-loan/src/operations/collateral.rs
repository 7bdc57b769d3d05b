use soroban_sdk::{Address, Env, token::TokenClient};

use crate::admin::Admin;
use crate::common::error::Error;
use crate::common::events::Events;
use crate::common::ledger::Ledger;
use crate::common::storage::Storage;

/// Collateral management for the loan
pub struct Collateral;

impl Collateral {
    /// Credit every unaccounted unit of the collateral asset to the
    /// collateral bucket.
    ///
    /// The caller (anyone) is expected to have transferred collateral tokens
    /// to the contract beforehand; this attributes them.
    ///
    /// # Returns
    /// * `Ok(amount)` - The amount of collateral newly accounted for
    pub fn post_collateral(env: &Env) -> Result<i128, Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;

        let amount = Ledger::unaccounted(env, &loan, &loan.collateral_asset)?;
        loan.collateral = loan.collateral.checked_add(amount).ok_or(Error::Overflow)?;
        Storage::set(env, &loan);

        Events::collateral_posted(env, amount);

        Ok(amount)
    }

    /// Withdraw posted collateral (borrower only).
    ///
    /// The withdrawal is only permitted if the remaining collateral still
    /// secures the outstanding principal per the collateralization formula.
    ///
    /// # Arguments
    /// * `amount` - Collateral to withdraw, > 0 and <= posted collateral
    /// * `destination` - Account receiving the tokens
    ///
    /// # Errors
    /// * `InvalidInput` - Amount is <= 0
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `InsufficientCollateral` - Amount exceeds posted collateral, or the
    ///   remainder would no longer maintain collateralization
    pub fn remove_collateral(
        env: &Env,
        amount: i128,
        destination: &Address,
    ) -> Result<(), Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;
        loan.borrower.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidInput);
        }
        if amount > loan.collateral {
            return Err(Error::InsufficientCollateral);
        }

        loan.collateral = loan
            .collateral
            .checked_sub(amount)
            .ok_or(Error::Overflow)?;
        if !Ledger::is_collateral_maintained(&loan)? {
            return Err(Error::InsufficientCollateral);
        }
        Storage::set(env, &loan);

        TokenClient::new(env, &loan.collateral_asset).transfer(
            &env.current_contract_address(),
            destination,
            &amount,
        );

        Events::collateral_removed(env, amount, destination);

        Ok(())
    }
}
