use soroban_sdk::{Address, BytesN, Env, panic_with_error};

use crate::common::error::Error;
use crate::common::events::Events;
use crate::common::storage::Storage;
use crate::common::types::{AmountConfig, AssetConfig, LoanStorage, RateConfig, TermConfig};
use crate::interfaces::GlobalsClient;

/// Administrative functions for the loan contract
pub struct Admin;

impl Admin {
    /// Initialize the loan
    ///
    /// Binds the capability addresses, the borrower, the two assets and the
    /// immutable terms. Authorized by the factory deploying the instance;
    /// can only be called once.
    ///
    /// # Arguments
    /// * `env` - Contract environment
    /// * `factory` - Upgrade capability, the only account allowed to upgrade
    /// * `globals` - Pause capability queried before every mutation
    /// * `borrower` - The borrowing party
    /// * `assets` - Collateral and funds token contracts (must differ)
    /// * `terms` - Grace period, payment interval and schedule length
    /// * `amounts` - Collateral requirement, requested and ending principal
    /// * `rates` - Interest, closing, late-fee and late-premium rates
    pub fn initialize(
        env: &Env,
        factory: &Address,
        globals: &Address,
        borrower: &Address,
        assets: &AssetConfig,
        terms: &TermConfig,
        amounts: &AmountConfig,
        rates: &RateConfig,
    ) {
        if Storage::is_initialized(env) {
            panic_with_error!(env, Error::AlreadyInitialized);
        }

        factory.require_auth();

        if amounts.principal_requested <= 0
            || amounts.ending_principal < 0
            || amounts.collateral_required < 0
        {
            panic_with_error!(env, Error::InvalidInput);
        }
        if amounts.ending_principal > amounts.principal_requested {
            panic_with_error!(env, Error::InvalidInput);
        }
        if terms.payment_interval == 0 || terms.payments == 0 {
            panic_with_error!(env, Error::InvalidInput);
        }
        if assets.collateral_asset == assets.funds_asset {
            panic_with_error!(env, Error::InvalidInput);
        }
        if rates.interest_rate < 0
            || rates.closing_rate < 0
            || rates.late_fee_rate < 0
            || rates.late_interest_premium < 0
        {
            panic_with_error!(env, Error::InvalidInput);
        }

        let loan = LoanStorage {
            factory: factory.clone(),
            globals: globals.clone(),
            borrower: borrower.clone(),
            lender: None,
            collateral_asset: assets.collateral_asset.clone(),
            funds_asset: assets.funds_asset.clone(),
            grace_period: terms.grace_period,
            payment_interval: terms.payment_interval,
            interest_rate: rates.interest_rate,
            late_fee_rate: rates.late_fee_rate,
            late_interest_premium: rates.late_interest_premium,
            closing_rate: rates.closing_rate,
            collateral_required: amounts.collateral_required,
            principal_requested: amounts.principal_requested,
            ending_principal: amounts.ending_principal,
            drawable_funds: 0,
            claimable_funds: 0,
            collateral: 0,
            principal: 0,
            next_payment_due_date: 0,
            payments_remaining: terms.payments,
            refinance_commitment: None,
        };

        Storage::set(env, &loan);

        Events::initialized(env, borrower, assets, terms, amounts, rates);
    }

    /// Fail with `ProtocolPaused` when the globals capability reports the
    /// protocol as paused. Consulted by every mutating operation; views are
    /// never gated.
    pub fn require_not_paused(env: &Env, loan: &LoanStorage) -> Result<(), Error> {
        if GlobalsClient::new(env, &loan.globals).protocol_paused() {
            return Err(Error::ProtocolPaused);
        }
        Ok(())
    }

    /// Reassign the borrower role (current borrower only)
    pub fn set_borrower(env: &Env, new_borrower: &Address) -> Result<(), Error> {
        let mut loan = Storage::get(env);
        Self::require_not_paused(env, &loan)?;
        loan.borrower.require_auth();

        loan.borrower = new_borrower.clone();
        Storage::set(env, &loan);

        Events::borrower_set(env, new_borrower);
        Ok(())
    }

    /// Reassign the lender role (current lender only)
    pub fn set_lender(env: &Env, new_lender: &Address) -> Result<(), Error> {
        let mut loan = Storage::get(env);
        Self::require_not_paused(env, &loan)?;
        let lender = loan.lender.clone().ok_or(Error::NotLender)?;
        lender.require_auth();

        loan.lender = Some(new_lender.clone());
        Storage::set(env, &loan);

        Events::lender_set(env, new_lender);
        Ok(())
    }

    /// Upgrade the contract to a new WASM hash (factory only)
    pub fn upgrade(env: &Env, new_wasm_hash: &BytesN<32>) -> Result<(), Error> {
        let loan = Storage::get(env);
        Self::require_not_paused(env, &loan)?;
        loan.factory.require_auth();
        env.deployer()
            .update_current_contract_wasm(new_wasm_hash.clone());
        Ok(())
    }
}
