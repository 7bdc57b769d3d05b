//! Fixed-point amortization kernel.
//!
//! All rates are non-negative integers scaled by `ONE` (10^18). No floats:
//! the installment formula is evaluated in closed form with a
//! square-and-multiply scaled exponentiation, so results are identical
//! across implementations.

use crate::common::error::Error;
use crate::common::types::{BASIS_POINTS, ONE, SECONDS_PER_YEAR};

/// Convert an annualized rate into the rate of one payment interval.
///
/// `annual_rate * interval / (365 days)`, truncating.
pub fn periodic_rate(annual_rate: i128, interval: u64) -> Result<i128, Error> {
    annual_rate
        .checked_mul(interval as i128)
        .ok_or(Error::Overflow)?
        .checked_div(SECONDS_PER_YEAR)
        .ok_or(Error::DivisionByZero)
}

/// Compute `(base / one)^exponent * one` by square-and-multiply.
///
/// Intermediate products stay bounded by `base * base`, which for any rate a
/// loan would carry is far below the i128 range; pathological inputs fail
/// with `Overflow` instead of wrapping.
pub fn scaled_exponent(mut base: i128, mut exponent: u32, one: i128) -> Result<i128, Error> {
    let mut result = if exponent & 1 != 0 { base } else { one };

    exponent >>= 1;
    while exponent != 0 {
        base = base
            .checked_mul(base)
            .ok_or(Error::Overflow)?
            .checked_div(one)
            .ok_or(Error::DivisionByZero)?;
        if exponent & 1 != 0 {
            result = result
                .checked_mul(base)
                .ok_or(Error::Overflow)?
                .checked_div(one)
                .ok_or(Error::DivisionByZero)?;
        }
        exponent >>= 1;
    }

    Ok(result)
}

/// Break one scheduled payment into `(principal_portion, interest_portion)`.
///
/// Uses the closed-form annuity installment
///
/// `A = (principal * (1+r)^n - ending_principal) * r / ((1+r)^n - 1)`
///
/// where `r` is the periodic rate. When the compounded factor truncates to
/// `ONE` or below (effectively zero rate), falls back to straight-line
/// amortization with zero interest.
///
/// # Arguments
/// * `principal` - Outstanding principal
/// * `ending_principal` - Balloon left unamortized at schedule end
/// * `annual_rate` - Annualized interest rate, ONE-scaled
/// * `interval` - Payment interval in seconds
/// * `total_payments` - Payments left in the schedule, > 0
pub fn installment(
    principal: i128,
    ending_principal: i128,
    annual_rate: i128,
    interval: u64,
    total_payments: u32,
) -> Result<(i128, i128), Error> {
    if total_payments == 0 {
        return Err(Error::DivisionByZero);
    }
    if ending_principal > principal {
        return Err(Error::EndingPrincipalTooHigh);
    }

    let rate = periodic_rate(annual_rate, interval)?;
    let raised = scaled_exponent(
        ONE.checked_add(rate).ok_or(Error::Overflow)?,
        total_payments,
        ONE,
    )?;

    if raised <= ONE {
        let portion = (principal - ending_principal)
            .checked_div(total_payments as i128)
            .ok_or(Error::DivisionByZero)?;
        return Ok((portion, 0));
    }

    let grown = principal
        .checked_mul(raised)
        .ok_or(Error::Overflow)?
        .checked_div(ONE)
        .ok_or(Error::DivisionByZero)?;
    let total = grown
        .checked_sub(ending_principal)
        .ok_or(Error::Overflow)?
        .checked_mul(rate)
        .ok_or(Error::Overflow)?
        .checked_div(raised - ONE)
        .ok_or(Error::DivisionByZero)?;
    let interest = principal
        .checked_mul(rate)
        .ok_or(Error::Overflow)?
        .checked_div(ONE)
        .ok_or(Error::DivisionByZero)?;

    let principal_portion = if total >= interest { total - interest } else { 0 };

    Ok((principal_portion, interest))
}

/// Interest accrued past the due date:
/// `principal * (annual_rate + premium) * elapsed / (365 days * ONE)`.
pub fn late_interest(
    principal: i128,
    annual_rate: i128,
    premium: i128,
    elapsed: u64,
) -> Result<i128, Error> {
    let rate = annual_rate.checked_add(premium).ok_or(Error::Overflow)?;
    principal
        .checked_mul(rate)
        .ok_or(Error::Overflow)?
        .checked_mul(elapsed as i128)
        .ok_or(Error::Overflow)?
        .checked_div(SECONDS_PER_YEAR * ONE)
        .ok_or(Error::DivisionByZero)
}

/// Flat fraction of an amount: `amount * rate / ONE`.
pub fn flat_fee(amount: i128, rate: i128) -> Result<i128, Error> {
    amount
        .checked_mul(rate)
        .ok_or(Error::Overflow)?
        .checked_div(ONE)
        .ok_or(Error::DivisionByZero)
}

/// Fund-time fee pro-rated over the whole schedule:
/// `principal * bps * interval * payments / (365 days * 10_000)`.
pub fn pro_rated_fee(
    principal: i128,
    bps: u32,
    interval: u64,
    payments: u32,
) -> Result<i128, Error> {
    principal
        .checked_mul(bps as i128)
        .ok_or(Error::Overflow)?
        .checked_mul(interval as i128)
        .ok_or(Error::Overflow)?
        .checked_mul(payments as i128)
        .ok_or(Error::Overflow)?
        .checked_div(SECONDS_PER_YEAR * BASIS_POINTS)
        .ok_or(Error::DivisionByZero)
}
