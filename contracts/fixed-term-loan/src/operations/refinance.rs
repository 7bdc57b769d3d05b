use soroban_sdk::{Address, Bytes, BytesN, Env, Vec, xdr::ToXdr};

use crate::admin::Admin;
use crate::common::error::Error;
use crate::common::events::Events;
use crate::common::ledger::Ledger;
use crate::common::storage::Storage;
use crate::common::types::{LoanStorage, RefinanceCall};

/// Two-phase refinancing: the borrower proposes a set of term mutations
/// bound by a commitment digest, the lender accepts by replaying the exact
/// same set. Acceptance is atomic and re-checks collateralization.
pub struct Refinance;

impl Refinance {
    /// Propose new terms (borrower only).
    ///
    /// Stores `keccak256(refinancer || calls)` as the pending commitment.
    /// Proposing an empty call set withdraws any pending proposal.
    ///
    /// # Returns
    /// * `Ok(commitment)` - The stored commitment, `None` when withdrawn
    pub fn propose_new_terms(
        env: &Env,
        refinancer: &Address,
        calls: &Vec<RefinanceCall>,
    ) -> Result<Option<BytesN<32>>, Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;
        loan.borrower.require_auth();

        let commitment = if calls.is_empty() {
            None
        } else {
            Some(Self::commitment(env, refinancer, calls))
        };

        loan.refinance_commitment = commitment.clone();
        Storage::set(env, &loan);

        Events::new_terms_proposed(env, &commitment, refinancer, calls);

        Ok(commitment)
    }

    /// Accept proposed terms (lender only).
    ///
    /// The digest of `(refinancer, calls)` must match the pending
    /// commitment. Calls are applied in order; the first failing call aborts
    /// the whole acceptance. Collateralization must still hold afterwards,
    /// and the commitment is cleared.
    ///
    /// # Errors
    /// * `ProtocolPaused` - Protocol operations are paused
    /// * `NotLender` - No lender is bound
    /// * `RefinanceMismatch` - No pending proposal, or the replay differs
    /// * `InsufficientCollateral` - Collateralization lost under the new
    ///   terms
    /// * Any error a mutator raises (see `RefinanceCall`)
    pub fn accept_new_terms(
        env: &Env,
        refinancer: &Address,
        calls: &Vec<RefinanceCall>,
    ) -> Result<(), Error> {
        let mut loan = Storage::get(env);
        Admin::require_not_paused(env, &loan)?;
        let lender = loan.lender.clone().ok_or(Error::NotLender)?;
        lender.require_auth();

        let digest = Self::commitment(env, refinancer, calls);
        match &loan.refinance_commitment {
            Some(pending) if *pending == digest => {}
            _ => return Err(Error::RefinanceMismatch),
        }

        for call in calls.iter() {
            Self::apply_call(env, &mut loan, &call)?;
        }

        if !Ledger::is_collateral_maintained(&loan)? {
            return Err(Error::InsufficientCollateral);
        }

        loan.refinance_commitment = None;
        Storage::set(env, &loan);

        Events::new_terms_accepted(env, &digest, refinancer, calls);

        Ok(())
    }

    /// Commitment digest over the canonical XDR encoding of the proposal
    pub fn commitment(env: &Env, refinancer: &Address, calls: &Vec<RefinanceCall>) -> BytesN<32> {
        let mut preimage = Bytes::new(env);
        preimage.append(&refinancer.clone().to_xdr(env));
        preimage.append(&calls.clone().to_xdr(env));
        env.crypto().keccak256(&preimage).to_bytes()
    }

    fn apply_call(env: &Env, loan: &mut LoanStorage, call: &RefinanceCall) -> Result<(), Error> {
        match call {
            RefinanceCall::DecreasePrincipal(amount) => {
                let amount = *amount;
                if amount < 0 {
                    return Err(Error::InvalidInput);
                }
                if amount > loan.drawable_funds {
                    return Err(Error::InsufficientDrawableFunds);
                }
                if amount > loan.principal {
                    return Err(Error::InvalidInput);
                }
                // The requested principal must stay positive.
                if amount >= loan.principal_requested {
                    return Err(Error::InvalidInput);
                }
                loan.principal = loan.principal.checked_sub(amount).ok_or(Error::Overflow)?;
                loan.principal_requested = loan
                    .principal_requested
                    .checked_sub(amount)
                    .ok_or(Error::Overflow)?;
                loan.drawable_funds = loan
                    .drawable_funds
                    .checked_sub(amount)
                    .ok_or(Error::Overflow)?;
                if loan.principal < loan.ending_principal {
                    return Err(Error::EndingPrincipalTooHigh);
                }
            }
            RefinanceCall::IncreasePrincipal(amount) => {
                let amount = *amount;
                if amount < 0 {
                    return Err(Error::InvalidInput);
                }
                // The increase is funded by surplus already in the contract.
                if Ledger::unaccounted(env, loan, &loan.funds_asset)? < amount {
                    return Err(Error::InsufficientFunding);
                }
                loan.principal = loan.principal.checked_add(amount).ok_or(Error::Overflow)?;
                loan.principal_requested = loan
                    .principal_requested
                    .checked_add(amount)
                    .ok_or(Error::Overflow)?;
                loan.drawable_funds = loan
                    .drawable_funds
                    .checked_add(amount)
                    .ok_or(Error::Overflow)?;
            }
            RefinanceCall::SetClosingRate(rate) => {
                if *rate < 0 {
                    return Err(Error::InvalidInput);
                }
                loan.closing_rate = *rate;
            }
            RefinanceCall::SetCollateralRequired(amount) => {
                if *amount < 0 {
                    return Err(Error::InvalidInput);
                }
                loan.collateral_required = *amount;
            }
            RefinanceCall::SetEndingPrincipal(amount) => {
                if *amount < 0 {
                    return Err(Error::InvalidInput);
                }
                if *amount > loan.principal {
                    return Err(Error::EndingPrincipalTooHigh);
                }
                loan.ending_principal = *amount;
            }
            RefinanceCall::SetGracePeriod(seconds) => {
                loan.grace_period = *seconds;
            }
            RefinanceCall::SetInterestRate(rate) => {
                if *rate < 0 {
                    return Err(Error::InvalidInput);
                }
                loan.interest_rate = *rate;
            }
            RefinanceCall::SetLateFeeRate(rate) => {
                if *rate < 0 {
                    return Err(Error::InvalidInput);
                }
                loan.late_fee_rate = *rate;
            }
            RefinanceCall::SetLateInterestPremium(rate) => {
                if *rate < 0 {
                    return Err(Error::InvalidInput);
                }
                loan.late_interest_premium = *rate;
            }
            RefinanceCall::SetPaymentInterval(seconds) => {
                if *seconds == 0 {
                    return Err(Error::InvalidInput);
                }
                loan.payment_interval = *seconds;
            }
            RefinanceCall::SetPaymentsRemaining(payments) => {
                if *payments == 0 {
                    return Err(Error::InvalidInput);
                }
                loan.payments_remaining = *payments;
            }
        }
        Ok(())
    }
}
