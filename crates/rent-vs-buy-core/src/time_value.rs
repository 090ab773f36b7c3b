use rust_decimal::Decimal;

use crate::error::RentBuyError;
use crate::types::{Money, Rate};
use crate::RentBuyResult;

/// Multiply two decimals, reporting overflow instead of panicking.
pub fn checked_mul(a: Decimal, b: Decimal, context: &str) -> RentBuyResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| RentBuyError::Overflow {
        context: context.to_string(),
    })
}

/// Add two decimals, reporting overflow instead of panicking.
pub fn checked_add(a: Decimal, b: Decimal, context: &str) -> RentBuyResult<Decimal> {
    a.checked_add(b).ok_or_else(|| RentBuyError::Overflow {
        context: context.to_string(),
    })
}

/// Subtract `b` from `a`, reporting overflow instead of panicking.
pub fn checked_sub(a: Decimal, b: Decimal, context: &str) -> RentBuyResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| RentBuyError::Overflow {
        context: context.to_string(),
    })
}

fn checked_div(a: Decimal, b: Decimal, context: &str) -> RentBuyResult<Decimal> {
    a.checked_div(b).ok_or_else(|| RentBuyError::Overflow {
        context: context.to_string(),
    })
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> RentBuyResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| RentBuyError::Overflow {
                context: format!("compound factor (1 + {rate})^{n}"),
            })?;
    }
    Ok(result)
}

/// One period of growth: value * (1 + r).
pub fn grow(value: Money, rate: Rate) -> RentBuyResult<Money> {
    checked_mul(value, Decimal::ONE + rate, "single-period growth")
}

/// True when the annuity formulas degenerate (zero rate, or a rate so small
/// that (1 + r)^n rounds to exactly one) and straight-line repayment applies.
fn is_straight_line(rate: Rate, factor: Decimal) -> bool {
    rate.is_zero() || factor == Decimal::ONE
}

/// Level payment that retires `principal` over `n` periods at `rate`:
/// P * r(1+r)^n / ((1+r)^n - 1), or P / n when the rate is zero.
pub fn level_payment(principal: Money, rate: Rate, n: u32) -> RentBuyResult<Money> {
    if n == 0 {
        return Err(RentBuyError::invalid(
            "amortization_period_years",
            "Number of periods must be > 0",
        ));
    }

    let factor = compound(rate, n)?;
    if is_straight_line(rate, factor) {
        return checked_div(principal, Decimal::from(n), "straight-line payment");
    }

    let scaled = checked_mul(principal, rate, "payment numerator")?;
    let numerator = checked_mul(scaled, factor, "payment numerator")?;
    checked_div(numerator, factor - Decimal::ONE, "level payment")
}

/// Principal still owed after `t` level payments:
/// P * ((1+r)^n - (1+r)^t) / ((1+r)^n - 1), or P * (1 - t/n) at a zero rate.
///
/// Pinned to exactly `principal` at t = 0 and exactly zero for t >= n.
pub fn remaining_principal(principal: Money, rate: Rate, n: u32, t: u32) -> RentBuyResult<Money> {
    if n == 0 {
        return Err(RentBuyError::invalid(
            "amortization_period_years",
            "Number of periods must be > 0",
        ));
    }
    if t == 0 {
        return Ok(principal);
    }
    if t >= n {
        return Ok(Decimal::ZERO);
    }

    let factor_n = compound(rate, n)?;
    if is_straight_line(rate, factor_n) {
        // Fraction first: it is below one, so only the product can overflow
        let outstanding = Decimal::from(n - t) / Decimal::from(n);
        return checked_mul(principal, outstanding, "straight-line balance");
    }

    let factor_t = compound(rate, t)?;
    let numerator = checked_mul(principal, factor_n - factor_t, "remaining balance numerator")?;
    checked_div(numerator, factor_n - Decimal::ONE, "remaining balance")
}
