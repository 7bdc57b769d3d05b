use soroban_sdk::{Address, Env, token::TokenClient};

use crate::admin::Admin;
use crate::common::error::Error;
use crate::common::events::Events;
use crate::common::ledger::Ledger;
use crate::common::storage::Storage;

/// Funds-asset movements outside the payment flow: drawdowns, returns,
/// lender claims, and skimming of stray tokens.
pub struct Funds;

impl Funds {
    /// Withdraw drawable funds (borrower only).
    ///
    /// # Arguments
    /// * `amount` - Funds to withdraw, > 0 and <= drawable funds
    /// * `destination` - Account receiving the tokens
    ///
    /// # Errors
    /// * `InvalidInput` - Amount is <= 0
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `InsufficientDrawableFunds` - Amount exceeds drawable funds
    /// * `InsufficientCollateral` - The drawdown would leave the outstanding
    ///   principal under-collateralized
    pub fn drawdown_funds(env: &Env, amount: i128, destination: &Address) -> Result<(), Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;
        loan.borrower.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidInput);
        }
        if amount > loan.drawable_funds {
            return Err(Error::InsufficientDrawableFunds);
        }

        loan.drawable_funds = loan
            .drawable_funds
            .checked_sub(amount)
            .ok_or(Error::Overflow)?;
        if !Ledger::is_collateral_maintained(&loan)? {
            return Err(Error::InsufficientCollateral);
        }
        Storage::set(env, &loan);

        TokenClient::new(env, &loan.funds_asset).transfer(
            &env.current_contract_address(),
            destination,
            &amount,
        );

        Events::funds_drawn_down(env, amount, destination);

        Ok(())
    }

    /// Credit every unaccounted unit of the funds asset back to the
    /// drawable bucket. The inverse of a drawdown: the caller (anyone)
    /// transfers funds to the contract first, then attributes them here.
    ///
    /// # Returns
    /// * `Ok(amount)` - The amount newly accounted as drawable
    pub fn return_funds(env: &Env) -> Result<i128, Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;

        let amount = Ledger::unaccounted(env, &loan, &loan.funds_asset)?;
        loan.drawable_funds = loan
            .drawable_funds
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        Storage::set(env, &loan);

        Events::funds_returned(env, amount);

        Ok(amount)
    }

    /// Withdraw accumulated payments (lender only).
    ///
    /// # Arguments
    /// * `amount` - Funds to claim, > 0 and <= claimable funds
    /// * `destination` - Account receiving the tokens
    ///
    /// # Errors
    /// * `InvalidInput` - Amount is <= 0
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `NotLender` - No lender is bound
    /// * `InsufficientClaimableFunds` - Amount exceeds claimable funds
    pub fn claim_funds(env: &Env, amount: i128, destination: &Address) -> Result<(), Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;
        let lender = loan.lender.clone().ok_or(Error::NotLender)?;
        lender.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidInput);
        }
        if amount > loan.claimable_funds {
            return Err(Error::InsufficientClaimableFunds);
        }

        loan.claimable_funds = loan
            .claimable_funds
            .checked_sub(amount)
            .ok_or(Error::Overflow)?;
        Storage::set(env, &loan);

        TokenClient::new(env, &loan.funds_asset).transfer(
            &env.current_contract_address(),
            destination,
            &amount,
        );

        Events::funds_claimed(env, amount, destination);

        Ok(())
    }

    /// Sweep the full balance of a token the loan does not account for
    /// (borrower or lender only).
    ///
    /// # Arguments
    /// * `caller` - Must be the borrower or the bound lender, authorizes
    /// * `token` - Token to sweep; neither loan asset is allowed
    /// * `destination` - Account receiving the tokens
    ///
    /// # Errors
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `Unauthorized` - Caller is neither borrower nor lender
    /// * `RestrictedToken` - Token is one of the loan's own assets
    pub fn skim(
        env: &Env,
        caller: &Address,
        token: &Address,
        destination: &Address,
    ) -> Result<i128, Error> {
        let loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;

        let is_borrower = *caller == loan.borrower;
        let is_lender = loan.lender.as_ref() == Some(caller);
        if !is_borrower && !is_lender {
            return Err(Error::Unauthorized);
        }
        caller.require_auth();

        if *token == loan.funds_asset || *token == loan.collateral_asset {
            return Err(Error::RestrictedToken);
        }

        let client = TokenClient::new(env, token);
        let amount = client.balance(&env.current_contract_address());
        if amount > 0 {
            client.transfer(&env.current_contract_address(), destination, &amount);
        }

        Events::skimmed(env, token, amount, destination);

        Ok(amount)
    }
}
