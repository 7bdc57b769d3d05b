//! Client interfaces of the capabilities a loan consumes. The contracts
//! behind these addresses are out of scope; the loan only ever calls them.

use soroban_sdk::{Address, Env, contractclient};

/// Protocol-wide capability resolved at initialization. When paused, every
/// mutating loan operation fails.
#[contractclient(name = "GlobalsClient")]
pub trait Globals {
    fn protocol_paused(env: Env) -> bool;
}

/// Capability the bound lender exposes at fund time: the fee split and the
/// accounts receiving it.
#[contractclient(name = "LenderClient")]
pub trait Lender {
    /// Treasury fee in basis points
    fn treasury_fee(env: Env) -> u32;

    /// Delegate fee in basis points
    fn investor_fee(env: Env) -> u32;

    fn treasury(env: Env) -> Address;

    fn pool_delegate(env: Env) -> Address;
}
