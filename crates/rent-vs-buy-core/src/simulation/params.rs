use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RentBuyError;
use crate::types::{percent_to_rate, Money, Percent, Rate};
use crate::RentBuyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything one rent-versus-buy run needs. Percentages are whole numbers
/// (20 = 20%); see [`SimulationParameters::rates`] for the decimal view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Purchase price of the home
    pub purchase_price: Money,
    /// Down payment as a percent of the purchase price
    pub down_payment_percent: Percent,
    /// Amortization period of the mortgage, in years
    pub amortization_period_years: u32,
    /// Fixed annual mortgage rate, percent
    pub mortgage_rate_annual_percent: Percent,
    pub annual_property_taxes: Money,
    pub monthly_strata_fees: Money,
    pub annual_maintenance: Money,
    /// Annual home price appreciation, percent
    pub annual_home_growth_rate_percent: Percent,
    /// Selling commission, percent of the sale price
    pub realtor_commission_percent: Percent,
    /// Annual return of the alternative investment, percent
    pub investment_return_percent: Percent,
    /// Monthly rent of a comparable home
    pub comparable_monthly_rent: Money,
    /// Annual rent increase, percent (0 keeps rent flat)
    pub annual_rent_increase_percent: Percent,
    /// Horizon; years 1..years_to_run are projected
    pub years_to_run: u32,
    /// Starting resale haircuts to stress-test, percent
    pub drawdown_percentages: Vec<Percent>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            purchase_price: dec!(650000),
            down_payment_percent: dec!(20),
            amortization_period_years: 25,
            mortgage_rate_annual_percent: dec!(2),
            annual_property_taxes: dec!(2000),
            monthly_strata_fees: dec!(750),
            annual_maintenance: dec!(1000),
            annual_home_growth_rate_percent: Decimal::ZERO,
            realtor_commission_percent: dec!(6),
            investment_return_percent: dec!(5),
            comparable_monthly_rent: dec!(2400),
            annual_rent_increase_percent: Decimal::ZERO,
            years_to_run: 20,
            drawdown_percentages: vec![dec!(0), dec!(5), dec!(10), dec!(20), dec!(30)],
        }
    }
}

/// Percent inputs converted to decimal rates, computed once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub down_payment: Rate,
    pub mortgage: Rate,
    pub home_growth: Rate,
    pub realtor_commission: Rate,
    pub investment_return: Rate,
    pub rent_increase: Rate,
}

impl SimulationParameters {
    pub fn rates(&self) -> Rates {
        Rates {
            down_payment: percent_to_rate(self.down_payment_percent),
            mortgage: percent_to_rate(self.mortgage_rate_annual_percent),
            home_growth: percent_to_rate(self.annual_home_growth_rate_percent),
            realtor_commission: percent_to_rate(self.realtor_commission_percent),
            investment_return: percent_to_rate(self.investment_return_percent),
            rent_increase: percent_to_rate(self.annual_rent_increase_percent),
        }
    }

    /// Drawdowns in ascending order with duplicates removed.
    pub fn unique_drawdowns(&self) -> Vec<Percent> {
        let mut drawdowns = self.drawdown_percentages.clone();
        drawdowns.sort();
        drawdowns.dedup();
        drawdowns
    }

    /// Check the engine's preconditions. Fails on the first violation.
    pub fn validate(&self) -> RentBuyResult<()> {
        if self.amortization_period_years == 0 {
            return Err(RentBuyError::invalid(
                "amortization_period_years",
                "Amortization period must be at least 1 year",
            ));
        }
        if self.years_to_run < 1 {
            return Err(RentBuyError::invalid(
                "years_to_run",
                "Years to run must be at least 1",
            ));
        }

        for (field, value) in [
            ("purchase_price", self.purchase_price),
            ("annual_property_taxes", self.annual_property_taxes),
            ("monthly_strata_fees", self.monthly_strata_fees),
            ("annual_maintenance", self.annual_maintenance),
            ("comparable_monthly_rent", self.comparable_monthly_rent),
        ] {
            if value < Decimal::ZERO {
                return Err(RentBuyError::invalid(field, "Must not be negative"));
            }
        }

        for (field, value) in [
            ("down_payment_percent", self.down_payment_percent),
            ("realtor_commission_percent", self.realtor_commission_percent),
        ] {
            if value < Decimal::ZERO || value > dec!(100) {
                return Err(RentBuyError::invalid(field, "Must be between 0 and 100"));
            }
        }

        if self.mortgage_rate_annual_percent < Decimal::ZERO {
            return Err(RentBuyError::invalid(
                "mortgage_rate_annual_percent",
                "Mortgage rate must not be negative",
            ));
        }

        for (field, value) in [
            (
                "annual_home_growth_rate_percent",
                self.annual_home_growth_rate_percent,
            ),
            ("investment_return_percent", self.investment_return_percent),
            (
                "annual_rent_increase_percent",
                self.annual_rent_increase_percent,
            ),
        ] {
            if value <= dec!(-100) {
                return Err(RentBuyError::invalid(
                    field,
                    "Rate must be greater than -100%",
                ));
            }
        }

        if self.drawdown_percentages.is_empty() {
            return Err(RentBuyError::invalid(
                "drawdown_percentages",
                "At least one drawdown percentage is required",
            ));
        }
        if let Some(bad) = self
            .drawdown_percentages
            .iter()
            .find(|d| **d < Decimal::ZERO || **d > dec!(100))
        {
            return Err(RentBuyError::invalid(
                "drawdown_percentages",
                format!("Drawdown {bad}% is outside 0..=100"),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
