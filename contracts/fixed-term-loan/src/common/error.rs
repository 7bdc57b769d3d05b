use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Authorization errors
    Unauthorized = 1,
    NotLender = 2, // lender-gated operation before a lender is bound

    // Protocol state errors
    ProtocolPaused = 10,

    // Lifecycle state errors
    NotInitialized = 20,
    AlreadyInitialized = 21,
    LoanNotActive = 22,
    NoPaymentsRemaining = 23, // funding a loan whose schedule is exhausted
    PaymentPastDue = 24,      // closing after the due date has lapsed
    NotInDefault = 25,        // repossessing inside the grace window

    // Invariant errors
    InsufficientCollateral = 30,
    InsufficientDrawableFunds = 31,
    InsufficientClaimableFunds = 32,
    InsufficientFunding = 33, // unaccounted funds below what the operation consumes
    InsufficientPayment = 34, // payment reconciliation would underflow drawable
    EndingPrincipalTooHigh = 35,

    // Arithmetic errors
    Overflow = 40,
    DivisionByZero = 41,

    // External errors
    RefinanceMismatch = 50, // acceptance does not match the pending commitment
    RestrictedToken = 51,   // skimming one of the loan's own assets

    // General errors
    InvalidInput = 60,
}
