use soroban_sdk::{Address, BytesN, Symbol, contracttype, symbol_short};

/// 18 decimals - fixed-point scale for all rates
/// Example: 12% annualized = 120_000_000_000_000_000_000 / 1000
pub const ONE: i128 = 1_000_000_000_000_000_000;

/// Basis-point denominator for the fund-time fee split
pub const BASIS_POINTS: i128 = 10_000;

/// Seconds per year (365 days) for annualized rate conversions
pub const SECONDS_PER_YEAR: i128 = 31_536_000;

/// Ledgers per day (~5 seconds per ledger on Stellar)
pub const ONE_DAY_LEDGERS: u32 = 17280;

/// Instance storage TTL (loan state, roles, terms) - 30 days
pub const INSTANCE_TTL: u32 = ONE_DAY_LEDGERS * 30;
pub const INSTANCE_BUMP: u32 = ONE_DAY_LEDGERS * 31;

/// Instance storage key for the loan state
pub const STORAGE: Symbol = symbol_short!("LOAN");

/// The two asset identifiers a loan holds balances of.
/// `collateral_asset` and `funds_asset` must be distinct token contracts.
#[contracttype]
#[derive(Clone, Debug)]
pub struct AssetConfig {
    pub collateral_asset: Address,
    pub funds_asset: Address,
}

/// Scheduling terms fixed at initialization (mutable only via refinance)
#[contracttype]
#[derive(Clone, Debug)]
pub struct TermConfig {
    /// Seconds past a missed due date before repossession becomes legal
    pub grace_period: u64,
    /// Seconds between scheduled payments, > 0
    pub payment_interval: u64,
    /// Number of scheduled payments, > 0
    pub payments: u32,
}

/// Notional amounts fixed at initialization (mutable only via refinance)
#[contracttype]
#[derive(Clone, Debug)]
pub struct AmountConfig {
    /// Collateral securing the full requested principal
    pub collateral_required: i128,
    /// Principal delivered at funding, > 0
    pub principal_requested: i128,
    /// Principal left unamortized at the end of the schedule (balloon),
    /// <= principal_requested
    pub ending_principal: i128,
}

/// Rates fixed at initialization (mutable only via refinance).
/// `interest_rate` and `late_interest_premium` are annualized fractions;
/// `closing_rate` and `late_fee_rate` are flat fractions of outstanding
/// principal. All are scaled by ONE.
#[contracttype]
#[derive(Clone, Debug)]
pub struct RateConfig {
    pub interest_rate: i128,
    pub closing_rate: i128,
    pub late_fee_rate: i128,
    pub late_interest_premium: i128,
}

/// Full loan state, one instance per contract
#[contracttype]
#[derive(Clone, Debug)]
pub struct LoanStorage {
    // Capabilities
    pub factory: Address,
    pub globals: Address,

    // Parties
    pub borrower: Address,
    pub lender: Option<Address>, // None until funded, cleared on repossess

    // Assets
    pub collateral_asset: Address,
    pub funds_asset: Address,

    // Terms
    pub grace_period: u64,
    pub payment_interval: u64,
    pub interest_rate: i128,
    pub late_fee_rate: i128,
    pub late_interest_premium: i128,
    pub closing_rate: i128,
    pub collateral_required: i128,
    pub principal_requested: i128,
    pub ending_principal: i128,

    // Ledger state
    pub drawable_funds: i128,
    pub claimable_funds: i128,
    pub collateral: i128,
    pub principal: i128,
    pub next_payment_due_date: u64, // 0 = not active
    pub payments_remaining: u32,

    // Refinance state
    pub refinance_commitment: Option<BytesN<32>>, // None = no pending proposal
}

/// Term mutations a refinance proposal may carry. Applied in order by
/// `accept_new_terms`; the first failing call aborts the whole acceptance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RefinanceCall {
    /// Retire principal out of drawable funds, shrinking the requested
    /// principal by the same amount
    DecreasePrincipal(i128),
    /// Grow principal out of the unaccounted funds-asset surplus sitting in
    /// the contract, growing the requested principal by the same amount
    IncreasePrincipal(i128),
    SetClosingRate(i128),
    SetCollateralRequired(i128),
    /// New balloon, must not exceed current principal
    SetEndingPrincipal(i128),
    SetGracePeriod(u64),
    SetInterestRate(i128),
    SetLateFeeRate(i128),
    SetLateInterestPremium(i128),
    /// Must be > 0
    SetPaymentInterval(u64),
    /// Must be > 0
    SetPaymentsRemaining(u32),
}
