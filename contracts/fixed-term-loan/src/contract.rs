use soroban_sdk::{Address, BytesN, Env, Vec, contract, contractimpl};

use crate::admin::Admin;
use crate::common::error::Error;
use crate::common::ledger::Ledger;
use crate::common::storage::Storage;
use crate::common::types::{
    AmountConfig, AssetConfig, RateConfig, RefinanceCall, TermConfig,
};
use crate::operations::collateral::Collateral;
use crate::operations::funding::Funding;
use crate::operations::funds::Funds;
use crate::operations::payments::Payments;
use crate::operations::refinance::Refinance;
use crate::operations::repossess::Repossess;

#[contract]
pub struct LoanContract;

#[contractimpl]
impl LoanContract {
    // ========== Initialization ==========

    /// Initialize the loan (factory only, once)
    pub fn initialize(
        env: Env,
        factory: Address,
        globals: Address,
        borrower: Address,
        assets: AssetConfig,
        terms: TermConfig,
        amounts: AmountConfig,
        rates: RateConfig,
    ) {
        Admin::initialize(
            &env, &factory, &globals, &borrower, &assets, &terms, &amounts, &rates,
        );
    }

    /// Upgrade the contract WASM (factory only)
    pub fn upgrade(env: Env, new_wasm_hash: BytesN<32>) -> Result<(), Error> {
        Admin::upgrade(&env, &new_wasm_hash)
    }

    // ========== Role Management ==========

    /// Reassign the borrower role (borrower only)
    pub fn set_borrower(env: Env, new_borrower: Address) -> Result<(), Error> {
        Admin::set_borrower(&env, &new_borrower)
    }

    /// Reassign the lender role (lender only)
    pub fn set_lender(env: Env, new_lender: Address) -> Result<(), Error> {
        Admin::set_lender(&env, &new_lender)
    }

    // ========== Lifecycle Operations ==========

    /// Fund the loan against delivered funds and bind the lender
    pub fn fund_loan(env: Env, lender: Address) -> Result<i128, Error> {
        Funding::fund_loan(&env, &lender)
    }

    /// Attribute delivered collateral-asset tokens to the collateral bucket
    pub fn post_collateral(env: Env) -> Result<i128, Error> {
        Collateral::post_collateral(&env)
    }

    /// Withdraw posted collateral (borrower only)
    pub fn remove_collateral(
        env: Env,
        amount: i128,
        destination: Address,
    ) -> Result<(), Error> {
        Collateral::remove_collateral(&env, amount, &destination)
    }

    /// Withdraw drawable funds (borrower only)
    pub fn drawdown_funds(env: Env, amount: i128, destination: Address) -> Result<(), Error> {
        Funds::drawdown_funds(&env, amount, &destination)
    }

    /// Attribute delivered funds-asset tokens back to the drawable bucket
    pub fn return_funds(env: Env) -> Result<i128, Error> {
        Funds::return_funds(&env)
    }

    /// Make the next scheduled payment out of delivered funds
    pub fn make_payment(env: Env) -> Result<(i128, i128), Error> {
        Payments::make_payment(&env)
    }

    /// Repay the whole loan ahead of schedule
    pub fn close_loan(env: Env) -> Result<(i128, i128), Error> {
        Payments::close_loan(&env)
    }

    /// Withdraw accumulated payments (lender only)
    pub fn claim_funds(env: Env, amount: i128, destination: Address) -> Result<(), Error> {
        Funds::claim_funds(&env, amount, &destination)
    }

    /// Seize everything after a default (lender only)
    pub fn repossess(env: Env, destination: Address) -> Result<(i128, i128), Error> {
        Repossess::repossess(&env, &destination)
    }

    /// Sweep a stray token (borrower or lender)
    pub fn skim(
        env: Env,
        caller: Address,
        token: Address,
        destination: Address,
    ) -> Result<i128, Error> {
        Funds::skim(&env, &caller, &token, &destination)
    }

    // ========== Refinancing ==========

    /// Propose new terms under a commitment (borrower only)
    pub fn propose_new_terms(
        env: Env,
        refinancer: Address,
        calls: Vec<RefinanceCall>,
    ) -> Result<Option<BytesN<32>>, Error> {
        Refinance::propose_new_terms(&env, &refinancer, &calls)
    }

    /// Accept proposed terms by replaying them (lender only)
    pub fn accept_new_terms(
        env: Env,
        refinancer: Address,
        calls: Vec<RefinanceCall>,
    ) -> Result<(), Error> {
        Refinance::accept_new_terms(&env, &refinancer, &calls)
    }

    // ========== Payment Views ==========

    /// Breakdown of the next scheduled payment, late charges included
    pub fn next_payment_breakdown(env: Env) -> Result<(i128, i128), Error> {
        Payments::next_payment_breakdown(&env)
    }

    /// Breakdown of an immediate early payoff
    pub fn closing_payment_breakdown(env: Env) -> Result<(i128, i128), Error> {
        Payments::closing_payment_breakdown(&env)
    }

    // ========== Ledger Views ==========

    /// Balance of `asset` not claimed by any accounting bucket
    pub fn unaccounted_amount(env: Env, asset: Address) -> Result<i128, Error> {
        let loan = Storage::get(&env);
        Ledger::unaccounted(&env, &loan, &asset)
    }

    /// Whether posted collateral still secures the outstanding principal
    pub fn is_collateral_maintained(env: Env) -> Result<bool, Error> {
        let loan = Storage::get(&env);
        Ledger::is_collateral_maintained(&loan)
    }

    /// Collateral that must be posted on top of the current amount before
    /// `drawdown` more funds can be drawn
    pub fn additional_collateral_for(env: Env, drawdown: i128) -> Result<i128, Error> {
        let loan = Storage::get(&env);
        if drawdown < 0 || drawdown > loan.drawable_funds {
            return Err(Error::InvalidInput);
        }
        let required = Ledger::required_collateral_for(
            loan.collateral_required,
            loan.principal,
            loan.drawable_funds - drawdown,
            loan.principal_requested,
        )?;
        if required > loan.collateral {
            Ok(required - loan.collateral)
        } else {
            Ok(0)
        }
    }

    /// Collateral posted above the current requirement
    pub fn excess_collateral(env: Env) -> Result<i128, Error> {
        let loan = Storage::get(&env);
        let required = Ledger::required_collateral_for(
            loan.collateral_required,
            loan.principal,
            loan.drawable_funds,
            loan.principal_requested,
        )?;
        if loan.collateral > required {
            Ok(loan.collateral - required)
        } else {
            Ok(0)
        }
    }

    // ========== State Views ==========

    pub fn factory(env: Env) -> Address {
        Storage::get(&env).factory
    }

    pub fn globals(env: Env) -> Address {
        Storage::get(&env).globals
    }

    pub fn borrower(env: Env) -> Address {
        Storage::get(&env).borrower
    }

    pub fn lender(env: Env) -> Option<Address> {
        Storage::get(&env).lender
    }

    pub fn collateral_asset(env: Env) -> Address {
        Storage::get(&env).collateral_asset
    }

    pub fn funds_asset(env: Env) -> Address {
        Storage::get(&env).funds_asset
    }

    pub fn grace_period(env: Env) -> u64 {
        Storage::get(&env).grace_period
    }

    pub fn payment_interval(env: Env) -> u64 {
        Storage::get(&env).payment_interval
    }

    pub fn interest_rate(env: Env) -> i128 {
        Storage::get(&env).interest_rate
    }

    pub fn late_fee_rate(env: Env) -> i128 {
        Storage::get(&env).late_fee_rate
    }

    pub fn late_interest_premium(env: Env) -> i128 {
        Storage::get(&env).late_interest_premium
    }

    pub fn closing_rate(env: Env) -> i128 {
        Storage::get(&env).closing_rate
    }

    pub fn collateral_required(env: Env) -> i128 {
        Storage::get(&env).collateral_required
    }

    pub fn principal_requested(env: Env) -> i128 {
        Storage::get(&env).principal_requested
    }

    pub fn ending_principal(env: Env) -> i128 {
        Storage::get(&env).ending_principal
    }

    pub fn drawable_funds(env: Env) -> i128 {
        Storage::get(&env).drawable_funds
    }

    pub fn claimable_funds(env: Env) -> i128 {
        Storage::get(&env).claimable_funds
    }

    pub fn collateral(env: Env) -> i128 {
        Storage::get(&env).collateral
    }

    pub fn principal(env: Env) -> i128 {
        Storage::get(&env).principal
    }

    pub fn next_payment_due_date(env: Env) -> u64 {
        Storage::get(&env).next_payment_due_date
    }

    pub fn payments_remaining(env: Env) -> u32 {
        Storage::get(&env).payments_remaining
    }

    pub fn refinance_commitment(env: Env) -> Option<BytesN<32>> {
        Storage::get(&env).refinance_commitment
    }
}
