//! Balance reconciliation between the token balances the contract actually
//! holds and the internal accounting buckets that claim them. The ledger
//! never initiates asset movement: operations consult `unaccounted` before
//! touching buckets so that any surplus sitting in the contract is
//! attributed to the current call.

use soroban_sdk::{Address, Env, token::TokenClient};

use crate::common::error::Error;
use crate::common::types::LoanStorage;

pub struct Ledger;

impl Ledger {
    /// External balance of `asset` minus the buckets the loan claims in it:
    /// `collateral` for the collateral asset, `drawable + claimable` for the
    /// funds asset, nothing for any other token. Clamped at zero if the
    /// buckets somehow exceed the balance.
    pub fn unaccounted(env: &Env, loan: &LoanStorage, asset: &Address) -> Result<i128, Error> {
        let balance = TokenClient::new(env, asset).balance(&env.current_contract_address());

        let claimed = if *asset == loan.collateral_asset {
            loan.collateral
        } else if *asset == loan.funds_asset {
            loan.drawable_funds
                .checked_add(loan.claimable_funds)
                .ok_or(Error::Overflow)?
        } else {
            0
        };

        if balance > claimed {
            Ok(balance - claimed)
        } else {
            Ok(0)
        }
    }

    /// Collateral needed to secure the principal not covered by drawable
    /// funds: `collateral_required * max(0, principal - drawable) /
    /// principal_requested`, truncating.
    pub fn required_collateral_for(
        collateral_required: i128,
        principal: i128,
        drawable_funds: i128,
        principal_requested: i128,
    ) -> Result<i128, Error> {
        let outstanding = if principal > drawable_funds {
            principal - drawable_funds
        } else {
            0
        };

        collateral_required
            .checked_mul(outstanding)
            .ok_or(Error::Overflow)?
            .checked_div(principal_requested)
            .ok_or(Error::DivisionByZero)
    }

    /// Collateral-sufficiency predicate over the current buckets
    pub fn is_collateral_maintained(loan: &LoanStorage) -> Result<bool, Error> {
        let required = Self::required_collateral_for(
            loan.collateral_required,
            loan.principal,
            loan.drawable_funds,
            loan.principal_requested,
        )?;
        Ok(loan.collateral >= required)
    }
}
