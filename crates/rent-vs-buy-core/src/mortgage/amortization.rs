//! Fixed-rate mortgage amortization with annual level payments.
//!
//! The closed-form balance is used rather than walking the schedule, so the
//! balance at any year can be read without accumulating rounding. A zero
//! rate falls back to straight-line repayment instead of dividing by zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::simulation::params::SimulationParameters;
use crate::time_value::{checked_add, checked_mul, level_payment, remaining_principal};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RentBuyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One year of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub year: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Derived loan figures for a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageSchedule {
    pub down_payment: Money,
    pub loan_principal: Money,
    pub annual_rate: Rate,
    pub amortization_period_years: u32,
    pub annual_payment: Money,
    /// Remaining balance for t = 0..=amortization_period_years
    pub balances: Vec<Money>,
}

impl MortgageSchedule {
    /// Derive the schedule from a purchase price, down payment rate, annual
    /// mortgage rate (decimal) and term in years.
    pub fn new(
        purchase_price: Money,
        down_payment_rate: Rate,
        annual_rate: Rate,
        term_years: u32,
    ) -> RentBuyResult<Self> {
        let down_payment = checked_mul(purchase_price, down_payment_rate, "down payment")?;
        let loan_principal = purchase_price - down_payment;
        let annual_payment = level_payment(loan_principal, annual_rate, term_years)?;

        let balances = (0..=term_years)
            .map(|t| remaining_principal(loan_principal, annual_rate, term_years, t))
            .collect::<RentBuyResult<Vec<_>>>()?;

        Ok(Self {
            down_payment,
            loan_principal,
            annual_rate,
            amortization_period_years: term_years,
            annual_payment,
            balances,
        })
    }

    pub fn from_parameters(params: &SimulationParameters) -> RentBuyResult<Self> {
        let rates = params.rates();
        Self::new(
            params.purchase_price,
            rates.down_payment,
            rates.mortgage,
            params.amortization_period_years,
        )
    }

    /// Balance owed after `year` annual payments; zero once the term is over.
    pub fn remaining_balance(&self, year: u32) -> Money {
        self.balances
            .get(year as usize)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Payment made during `year` (1-based). No payment is due after payoff.
    pub fn payment_in_year(&self, year: u32) -> Money {
        if year >= 1 && year <= self.amortization_period_years {
            self.annual_payment
        } else {
            Decimal::ZERO
        }
    }

    /// Interest paid during `year`: the part of the payment that did not
    /// reduce principal.
    pub fn interest_in_year(&self, year: u32) -> Money {
        if year == 0 {
            return Decimal::ZERO;
        }
        let principal_paid = self.remaining_balance(year - 1) - self.remaining_balance(year);
        self.payment_in_year(year) - principal_paid
    }

    pub fn rows(&self) -> Vec<AmortizationRow> {
        (1..=self.amortization_period_years)
            .map(|year| {
                let interest = self.interest_in_year(year);
                let payment = self.payment_in_year(year);
                AmortizationRow {
                    year,
                    payment,
                    interest,
                    principal: payment - interest,
                    closing_balance: self.remaining_balance(year),
                }
            })
            .collect()
    }
}

/// Full schedule output for display: loan figures plus per-year rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub down_payment: Money,
    pub loan_principal: Money,
    pub annual_payment: Money,
    pub total_interest: Money,
    pub rows: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the amortization schedule for the mortgage implied by `params`.
pub fn build_schedule(
    params: &SimulationParameters,
) -> RentBuyResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    params.validate()?;
    let schedule = MortgageSchedule::from_parameters(params)?;

    if schedule.annual_rate.is_zero() {
        warnings.push("Zero mortgage rate: straight-line amortization applied".into());
    }

    let rows = schedule.rows();
    let total_interest = rows.iter().try_fold(Decimal::ZERO, |acc, r| {
        checked_add(acc, r.interest, "total interest")
    })?;

    let output = ScheduleOutput {
        down_payment: schedule.down_payment,
        loan_principal: schedule.loan_principal,
        annual_payment: schedule.annual_payment,
        total_interest,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Mortgage Amortization (annual level payment)",
        params,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reference_schedule() -> MortgageSchedule {
        MortgageSchedule::new(dec!(650000), dec!(0.20), dec!(0.02), 25).unwrap()
    }

    #[test]
    fn test_principal_and_down_payment() {
        let s = reference_schedule();
        assert_eq!(s.down_payment, dec!(130000));
        assert_eq!(s.loan_principal, dec!(520000));
    }

    #[test]
    fn test_annual_payment_reference() {
        // 520000 * 0.02 * 1.02^25 / (1.02^25 - 1); 1.02^25 ≈ 1.640606
        // => 10400 * 1.640606 / 0.640606 ≈ 26,634.6
        let s = reference_schedule();
        assert!(
            (s.annual_payment - dec!(26634.6)).abs() < dec!(1),
            "got {}",
            s.annual_payment
        );
    }

    #[test]
    fn test_balance_endpoints() {
        let s = reference_schedule();
        assert_eq!(s.balances.len(), 26);
        assert_eq!(s.remaining_balance(0), dec!(520000));
        assert_eq!(s.remaining_balance(25), Decimal::ZERO);
        assert_eq!(s.remaining_balance(40), Decimal::ZERO);
    }

    #[test]
    fn test_balance_strictly_decreasing() {
        let s = reference_schedule();
        for w in s.balances.windows(2) {
            assert!(w[1] < w[0]);
        }
    }

    #[test]
    fn test_interest_plus_principal_equals_payment() {
        let s = reference_schedule();
        let mut cumulative_interest = Decimal::ZERO;
        for year in 1..=25u32 {
            cumulative_interest += s.interest_in_year(year);
            let principal_repaid = s.loan_principal - s.remaining_balance(year);
            let paid = s.annual_payment * Decimal::from(year);
            assert!(
                (cumulative_interest + principal_repaid - paid).abs() < dec!(0.000001),
                "year {year}"
            );
        }
    }

    #[test]
    fn test_first_year_interest_is_rate_times_principal() {
        // Annual payments in arrears: the first year's interest is P * r.
        let s = reference_schedule();
        assert!((s.interest_in_year(1) - dec!(10400)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_no_payment_after_payoff() {
        let s = reference_schedule();
        assert_eq!(s.payment_in_year(26), Decimal::ZERO);
        assert_eq!(s.interest_in_year(26), Decimal::ZERO);
        assert_eq!(s.payment_in_year(0), Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_linear() {
        let s = MortgageSchedule::new(dec!(650000), dec!(0.20), Decimal::ZERO, 25).unwrap();
        assert_eq!(s.annual_payment, dec!(20800));
        for year in 1..=25u32 {
            assert_eq!(
                s.remaining_balance(year),
                dec!(520000) - dec!(20800) * Decimal::from(year)
            );
            assert_eq!(s.interest_in_year(year), Decimal::ZERO);
        }
    }

    #[test]
    fn test_full_down_payment_means_no_loan() {
        let s = MortgageSchedule::new(dec!(500000), Decimal::ONE, dec!(0.05), 10).unwrap();
        assert_eq!(s.loan_principal, Decimal::ZERO);
        assert_eq!(s.annual_payment, Decimal::ZERO);
        assert!(s.balances.iter().all(|b| b.is_zero()));
    }

    #[test]
    fn test_zero_term_rejected() {
        assert!(MortgageSchedule::new(dec!(1000), dec!(0.2), dec!(0.05), 0).is_err());
    }

    #[test]
    fn test_build_schedule_rows() {
        let params = SimulationParameters::default();
        let out = build_schedule(&params).unwrap();
        let res = &out.result;
        assert_eq!(res.rows.len(), 25);
        assert_eq!(res.rows[24].closing_balance, Decimal::ZERO);
        let principal_sum: Decimal = res.rows.iter().map(|r| r.principal).sum();
        assert!((principal_sum - res.loan_principal).abs() < dec!(0.000001));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_build_schedule_zero_rate_warns() {
        let mut params = SimulationParameters::default();
        params.mortgage_rate_annual_percent = Decimal::ZERO;
        let out = build_schedule(&params).unwrap();
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }
}
