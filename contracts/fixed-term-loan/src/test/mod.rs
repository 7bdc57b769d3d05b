#![cfg(test)]
extern crate std;


use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Env, contract, contractimpl, symbol_short};

use crate::common::types::{AmountConfig, AssetConfig, RateConfig, TermConfig};
use crate::{LoanContract, LoanContractClient};

pub const START_TIME: u64 = 1_700_000_000;
pub const PAYMENT_INTERVAL: u64 = 30 * 86400;
pub const GRACE_PERIOD: u64 = 10 * 86400;
pub const PRINCIPAL_REQUESTED: i128 = 1_000_000_000; // 1000 units, 6 decimals
pub const INTEREST_RATE: i128 = 120_000_000_000_000_000; // 12% annualized
pub const CLOSING_RATE: i128 = 10_000_000_000_000_000; // 1% flat
pub const LATE_FEE_RATE: i128 = 10_000_000_000_000_000; // 1% flat
pub const LATE_PREMIUM: i128 = 50_000_000_000_000_000; // 5% annualized

// ========== Capability Mocks ==========

#[contract]
pub struct MockGlobals;

#[contractimpl]
impl MockGlobals {
    pub fn set_paused(env: Env, paused: bool) {
        env.storage().instance().set(&symbol_short!("paused"), &paused);
    }

    pub fn protocol_paused(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&symbol_short!("paused"))
            .unwrap_or(false)
    }
}

#[contract]
pub struct MockLender;

#[contractimpl]
impl MockLender {
    pub fn init(
        env: Env,
        treasury: Address,
        pool_delegate: Address,
        treasury_fee: u32,
        investor_fee: u32,
    ) {
        env.storage().instance().set(&symbol_short!("treasury"), &treasury);
        env.storage()
            .instance()
            .set(&symbol_short!("delegate"), &pool_delegate);
        env.storage().instance().set(&symbol_short!("t_fee"), &treasury_fee);
        env.storage().instance().set(&symbol_short!("i_fee"), &investor_fee);
    }

    pub fn treasury_fee(env: Env) -> u32 {
        env.storage().instance().get(&symbol_short!("t_fee")).unwrap()
    }

    pub fn investor_fee(env: Env) -> u32 {
        env.storage().instance().get(&symbol_short!("i_fee")).unwrap()
    }

    pub fn treasury(env: Env) -> Address {
        env.storage().instance().get(&symbol_short!("treasury")).unwrap()
    }

    pub fn pool_delegate(env: Env) -> Address {
        env.storage().instance().get(&symbol_short!("delegate")).unwrap()
    }
}

// ========== Fixture ==========

pub fn default_amounts() -> AmountConfig {
    AmountConfig {
        collateral_required: 0,
        principal_requested: PRINCIPAL_REQUESTED,
        ending_principal: 0,
    }
}

pub fn default_terms() -> TermConfig {
    TermConfig {
        grace_period: GRACE_PERIOD,
        payment_interval: PAYMENT_INTERVAL,
        payments: 12,
    }
}

pub fn default_rates() -> RateConfig {
    RateConfig {
        interest_rate: INTEREST_RATE,
        closing_rate: CLOSING_RATE,
        late_fee_rate: LATE_FEE_RATE,
        late_interest_premium: LATE_PREMIUM,
    }
}

pub struct TestFixture<'a> {
    pub env: Env,
    pub factory: Address,
    pub globals_id: Address,
    pub globals: MockGlobalsClient<'a>,
    pub borrower: Address,
    pub lender: Address,
    pub treasury: Address,
    pub pool_delegate: Address,
    pub collateral_token: TokenClient<'a>,
    pub collateral_minter: StellarAssetClient<'a>,
    pub funds_token: TokenClient<'a>,
    pub funds_minter: StellarAssetClient<'a>,
    pub loan_id: Address,
    pub loan: LoanContractClient<'a>,
}

impl TestFixture<'static> {
    pub fn setup() -> Self {
        Self::setup_with(default_amounts(), default_terms(), default_rates(), 0, 0)
    }

    pub fn setup_with(
        amounts: AmountConfig,
        terms: TermConfig,
        rates: RateConfig,
        treasury_fee: u32,
        investor_fee: u32,
    ) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().with_mut(|li| li.timestamp = START_TIME);

        let factory = Address::generate(&env);
        let borrower = Address::generate(&env);
        let treasury = Address::generate(&env);
        let pool_delegate = Address::generate(&env);

        let token_admin = Address::generate(&env);
        let collateral_sac = env.register_stellar_asset_contract_v2(token_admin.clone());
        let funds_sac = env.register_stellar_asset_contract_v2(token_admin.clone());

        let globals_id = env.register(MockGlobals, ());
        let globals = MockGlobalsClient::new(&env, &globals_id);

        let lender = env.register(MockLender, ());
        MockLenderClient::new(&env, &lender).init(
            &treasury,
            &pool_delegate,
            &treasury_fee,
            &investor_fee,
        );

        let loan_id = env.register(LoanContract, ());
        let loan = LoanContractClient::new(&env, &loan_id);

        loan.initialize(
            &factory,
            &globals_id,
            &borrower,
            &AssetConfig {
                collateral_asset: collateral_sac.address(),
                funds_asset: funds_sac.address(),
            },
            &terms,
            &amounts,
            &rates,
        );

        TestFixture {
            collateral_token: TokenClient::new(&env, &collateral_sac.address()),
            collateral_minter: StellarAssetClient::new(&env, &collateral_sac.address()),
            funds_token: TokenClient::new(&env, &funds_sac.address()),
            funds_minter: StellarAssetClient::new(&env, &funds_sac.address()),
            env,
            factory,
            globals_id,
            globals,
            borrower,
            lender,
            treasury,
            pool_delegate,
            loan_id,
            loan,
        }
    }

    /// Deliver the requested principal and fund the loan
    pub fn fund(&self) {
        self.funds_minter
            .mint(&self.loan_id, &self.loan.principal_requested());
        self.loan.fund_loan(&self.lender);
    }

    pub fn jump_to(&self, timestamp: u64) {
        self.env.ledger().with_mut(|li| li.timestamp = timestamp);
    }

    /// Deliver exactly the next scheduled payment and settle it
    pub fn pay_next(&self) -> (i128, i128) {
        let (principal, interest) = self.loan.next_payment_breakdown();
        self.funds_minter.mint(&self.loan_id, &(principal + interest));
        self.loan.make_payment()
    }
}

// ========== Initialization ==========

#[test]
fn test_initialization() {
    let fixture = TestFixture::setup();
    let loan = &fixture.loan;

    assert_eq!(loan.factory(), fixture.factory);
    assert_eq!(loan.globals(), fixture.globals_id);
    assert_eq!(loan.borrower(), fixture.borrower);
    assert_eq!(loan.lender(), None);
    assert_eq!(loan.grace_period(), GRACE_PERIOD);
    assert_eq!(loan.payment_interval(), PAYMENT_INTERVAL);
    assert_eq!(loan.interest_rate(), INTEREST_RATE);
    assert_eq!(loan.closing_rate(), CLOSING_RATE);
    assert_eq!(loan.late_fee_rate(), LATE_FEE_RATE);
    assert_eq!(loan.late_interest_premium(), LATE_PREMIUM);
    assert_eq!(loan.collateral_required(), 0);
    assert_eq!(loan.principal_requested(), PRINCIPAL_REQUESTED);
    assert_eq!(loan.ending_principal(), 0);
    assert_eq!(loan.payments_remaining(), 12);

    // Not active until funded
    assert_eq!(loan.next_payment_due_date(), 0);
    assert_eq!(loan.principal(), 0);
    assert_eq!(loan.drawable_funds(), 0);
    assert_eq!(loan.claimable_funds(), 0);
    assert_eq!(loan.collateral(), 0);
    assert_eq!(loan.refinance_commitment(), None);
}

#[test]
#[should_panic(expected = "Error(Contract, #21)")]
fn test_double_initialization() {
    let fixture = TestFixture::setup();

    fixture.loan.initialize(
        &fixture.factory,
        &fixture.globals_id,
        &fixture.borrower,
        &AssetConfig {
            collateral_asset: fixture.collateral_token.address.clone(),
            funds_asset: fixture.funds_token.address.clone(),
        },
        &default_terms(),
        &default_amounts(),
        &default_rates(),
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #60)")]
fn test_initialize_rejects_zero_principal() {
    let mut amounts = default_amounts();
    amounts.principal_requested = 0;
    TestFixture::setup_with(amounts, default_terms(), default_rates(), 0, 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #60)")]
fn test_initialize_rejects_ending_above_requested() {
    let mut amounts = default_amounts();
    amounts.ending_principal = PRINCIPAL_REQUESTED + 1;
    TestFixture::setup_with(amounts, default_terms(), default_rates(), 0, 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #60)")]
fn test_initialize_rejects_zero_interval() {
    let mut terms = default_terms();
    terms.payment_interval = 0;
    TestFixture::setup_with(default_amounts(), terms, default_rates(), 0, 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #60)")]
fn test_initialize_rejects_zero_payments() {
    let mut terms = default_terms();
    terms.payments = 0;
    TestFixture::setup_with(default_amounts(), terms, default_rates(), 0, 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #60)")]
fn test_initialize_rejects_negative_rate() {
    let mut rates = default_rates();
    rates.interest_rate = -1;
    TestFixture::setup_with(default_amounts(), default_terms(), rates, 0, 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #60)")]
fn test_initialize_rejects_matching_assets() {
    let env = Env::default();
    env.mock_all_auths();

    let factory = Address::generate(&env);
    let globals = env.register(MockGlobals, ());
    let borrower = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let asset = env
        .register_stellar_asset_contract_v2(token_admin)
        .address();

    let loan_id = env.register(LoanContract, ());
    let loan = LoanContractClient::new(&env, &loan_id);

    loan.initialize(
        &factory,
        &globals,
        &borrower,
        &AssetConfig {
            collateral_asset: asset.clone(),
            funds_asset: asset,
        },
        &default_terms(),
        &default_amounts(),
        &default_rates(),
    );
}

// ========== Role Management ==========

#[test]
fn test_set_borrower() {
    let fixture = TestFixture::setup();
    let new_borrower = Address::generate(&fixture.env);

    fixture.loan.set_borrower(&new_borrower);

    assert_eq!(fixture.loan.borrower(), new_borrower);
}

#[test]
#[should_panic(expected = "Error(Contract, #2)")]
fn test_set_lender_before_funding() {
    let fixture = TestFixture::setup();
    let new_lender = Address::generate(&fixture.env);

    fixture.loan.set_lender(&new_lender);
}

#[test]
fn test_set_lender_after_funding() {
    let fixture = TestFixture::setup();
    fixture.fund();

    let new_lender = Address::generate(&fixture.env);
    fixture.loan.set_lender(&new_lender);

    assert_eq!(fixture.loan.lender(), Some(new_lender));
}

// ========== Pause Gate ==========

#[test]
#[should_panic(expected = "Error(Contract, #10)")]
fn test_pause_blocks_mutations() {
    let fixture = TestFixture::setup();
    fixture.globals.set_paused(&true);

    fixture.loan.post_collateral();
}

#[test]
fn test_views_ignore_pause() {
    let fixture = TestFixture::setup();
    fixture.fund();
    fixture.globals.set_paused(&true);

    // Views stay readable while mutations are gated
    assert_eq!(fixture.loan.principal(), PRINCIPAL_REQUESTED);
    let (principal, interest) = fixture.loan.next_payment_breakdown();
    assert!(principal > 0 && interest > 0);
}

// ========== Ledger Views ==========

#[test]
fn test_unaccounted_amount() {
    let fixture = TestFixture::setup();

    assert_eq!(fixture.loan.unaccounted_amount(&fixture.funds_token.address), 0);

    fixture.funds_minter.mint(&fixture.loan_id, &250_000_000);
    assert_eq!(
        fixture.loan.unaccounted_amount(&fixture.funds_token.address),
        250_000_000
    );

    fixture.collateral_minter.mint(&fixture.loan_id, &40_000_000);
    assert_eq!(
        fixture
            .loan
            .unaccounted_amount(&fixture.collateral_token.address),
        40_000_000
    );

    // Posting attributes the collateral surplus to the bucket
    fixture.loan.post_collateral();
    assert_eq!(
        fixture
            .loan
            .unaccounted_amount(&fixture.collateral_token.address),
        0
    );
    assert_eq!(fixture.loan.collateral(), 40_000_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #22)")]
fn test_breakdown_before_funding() {
    let fixture = TestFixture::setup();
    fixture.loan.next_payment_breakdown();
}

#[test]
fn test_excess_collateral() {
    let fixture = TestFixture::setup();
    fixture.fund();

    fixture.collateral_minter.mint(&fixture.loan_id, &75_000_000);
    fixture.loan.post_collateral();

    // Nothing drawn and no collateral requirement: everything is excess
    assert_eq!(fixture.loan.excess_collateral(), 75_000_000);
    assert!(fixture.loan.is_collateral_maintained());
}
