use soroban_sdk::{Address, BytesN, Vec, contractevent};

use crate::common::types::{AmountConfig, AssetConfig, RateConfig, RefinanceCall, TermConfig};

/// Events emitted by the loan contract. Every event is published after the
/// ledger mutations and asset transfers of its operation have been issued.
#[contractevent]
pub struct InitializedEvent {
    pub borrower: Address,
    pub assets: AssetConfig,
    pub terms: TermConfig,
    pub amounts: AmountConfig,
    pub rates: RateConfig,
}

#[contractevent]
pub struct BorrowerSetEvent {
    pub borrower: Address,
}

#[contractevent]
pub struct LenderSetEvent {
    pub lender: Address,
}

#[contractevent]
pub struct FundedEvent {
    pub lender: Address,
    pub amount: i128,
    pub next_payment_due_date: u64,
}

#[contractevent]
pub struct CollateralPostedEvent {
    pub amount: i128,
}

#[contractevent]
pub struct CollateralRemovedEvent {
    pub amount: i128,
    pub destination: Address,
}

#[contractevent]
pub struct FundsDrawnDownEvent {
    pub amount: i128,
    pub destination: Address,
}

#[contractevent]
pub struct FundsReturnedEvent {
    pub amount: i128,
}

#[contractevent]
pub struct FundsClaimedEvent {
    pub amount: i128,
    pub destination: Address,
}

#[contractevent]
pub struct PaymentMadeEvent {
    pub principal_paid: i128,
    pub interest_paid: i128,
}

#[contractevent]
pub struct LoanClosedEvent {
    pub principal_paid: i128,
    pub interest_paid: i128,
}

#[contractevent]
pub struct NewTermsProposedEvent {
    pub commitment: Option<BytesN<32>>,
    pub refinancer: Address,
    pub calls: Vec<RefinanceCall>,
}

#[contractevent]
pub struct NewTermsAcceptedEvent {
    pub commitment: BytesN<32>,
    pub refinancer: Address,
    pub calls: Vec<RefinanceCall>,
}

#[contractevent]
pub struct RepossessedEvent {
    pub collateral_repossessed: i128,
    pub funds_repossessed: i128,
    pub destination: Address,
}

#[contractevent]
pub struct SkimmedEvent {
    pub token: Address,
    pub amount: i128,
    pub destination: Address,
}

/// Helper struct for publishing events
pub struct Events;

impl Events {
    pub fn initialized(
        env: &soroban_sdk::Env,
        borrower: &Address,
        assets: &AssetConfig,
        terms: &TermConfig,
        amounts: &AmountConfig,
        rates: &RateConfig,
    ) {
        InitializedEvent {
            borrower: borrower.clone(),
            assets: assets.clone(),
            terms: terms.clone(),
            amounts: amounts.clone(),
            rates: rates.clone(),
        }
        .publish(env);
    }

    pub fn borrower_set(env: &soroban_sdk::Env, borrower: &Address) {
        BorrowerSetEvent {
            borrower: borrower.clone(),
        }
        .publish(env);
    }

    pub fn lender_set(env: &soroban_sdk::Env, lender: &Address) {
        LenderSetEvent {
            lender: lender.clone(),
        }
        .publish(env);
    }

    pub fn funded(
        env: &soroban_sdk::Env,
        lender: &Address,
        amount: i128,
        next_payment_due_date: u64,
    ) {
        FundedEvent {
            lender: lender.clone(),
            amount,
            next_payment_due_date,
        }
        .publish(env);
    }

    pub fn collateral_posted(env: &soroban_sdk::Env, amount: i128) {
        CollateralPostedEvent { amount }.publish(env);
    }

    pub fn collateral_removed(env: &soroban_sdk::Env, amount: i128, destination: &Address) {
        CollateralRemovedEvent {
            amount,
            destination: destination.clone(),
        }
        .publish(env);
    }

    pub fn funds_drawn_down(env: &soroban_sdk::Env, amount: i128, destination: &Address) {
        FundsDrawnDownEvent {
            amount,
            destination: destination.clone(),
        }
        .publish(env);
    }

    pub fn funds_returned(env: &soroban_sdk::Env, amount: i128) {
        FundsReturnedEvent { amount }.publish(env);
    }

    pub fn funds_claimed(env: &soroban_sdk::Env, amount: i128, destination: &Address) {
        FundsClaimedEvent {
            amount,
            destination: destination.clone(),
        }
        .publish(env);
    }

    pub fn payment_made(env: &soroban_sdk::Env, principal_paid: i128, interest_paid: i128) {
        PaymentMadeEvent {
            principal_paid,
            interest_paid,
        }
        .publish(env);
    }

    pub fn loan_closed(env: &soroban_sdk::Env, principal_paid: i128, interest_paid: i128) {
        LoanClosedEvent {
            principal_paid,
            interest_paid,
        }
        .publish(env);
    }

    pub fn new_terms_proposed(
        env: &soroban_sdk::Env,
        commitment: &Option<BytesN<32>>,
        refinancer: &Address,
        calls: &Vec<RefinanceCall>,
    ) {
        NewTermsProposedEvent {
            commitment: commitment.clone(),
            refinancer: refinancer.clone(),
            calls: calls.clone(),
        }
        .publish(env);
    }

    pub fn new_terms_accepted(
        env: &soroban_sdk::Env,
        commitment: &BytesN<32>,
        refinancer: &Address,
        calls: &Vec<RefinanceCall>,
    ) {
        NewTermsAcceptedEvent {
            commitment: commitment.clone(),
            refinancer: refinancer.clone(),
            calls: calls.clone(),
        }
        .publish(env);
    }

    pub fn repossessed(
        env: &soroban_sdk::Env,
        collateral_repossessed: i128,
        funds_repossessed: i128,
        destination: &Address,
    ) {
        RepossessedEvent {
            collateral_repossessed,
            funds_repossessed,
            destination: destination.clone(),
        }
        .publish(env);
    }

    pub fn skimmed(env: &soroban_sdk::Env, token: &Address, amount: i128, destination: &Address) {
        SkimmedEvent {
            token: token.clone(),
            amount,
            destination: destination.clone(),
        }
        .publish(env);
    }
}
