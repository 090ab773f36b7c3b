use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::mortgage::amortization::MortgageSchedule;
use crate::simulation::params::SimulationParameters;
use crate::time_value::{checked_add, checked_mul, checked_sub, compound};
use crate::types::{Money, Rate};
use crate::RentBuyResult;

/// Owning-versus-renting cash difference for one projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCashFlow {
    pub year: u32,
    pub annual_rent: Money,
    /// Strata, maintenance and property taxes
    pub recurring_costs: Money,
    pub mortgage_payment: Money,
    /// recurring_costs + mortgage_payment
    pub annual_house_expense: Money,
    /// annual_house_expense - annual_rent. Positive: owning costs more and
    /// the renter invests the excess. Negative: the renter withdraws.
    pub investment_delta: Money,
}

/// Per-year cash flows of owning against renting. Scenario independent:
/// drawdowns never change what is paid, only what the home resells for.
#[derive(Debug, Clone)]
pub struct CashFlowModel<'a> {
    schedule: &'a MortgageSchedule,
    base_annual_rent: Money,
    rent_increase_rate: Rate,
    recurring_costs: Money,
}

impl<'a> CashFlowModel<'a> {
    pub fn new(
        params: &SimulationParameters,
        schedule: &'a MortgageSchedule,
    ) -> RentBuyResult<Self> {
        let strata = checked_mul(dec!(12), params.monthly_strata_fees, "annual strata fees")?;
        let recurring_costs = checked_add(
            checked_add(strata, params.annual_maintenance, "recurring costs")?,
            params.annual_property_taxes,
            "recurring costs",
        )?;
        Ok(Self {
            schedule,
            base_annual_rent: checked_mul(dec!(12), params.comparable_monthly_rent, "annual rent")?,
            rent_increase_rate: params.rates().rent_increase,
            recurring_costs,
        })
    }

    /// Twelve months of the rent entered, before any increase.
    pub fn base_annual_rent(&self) -> Money {
        self.base_annual_rent
    }

    /// Recurring cost of owning, excluding the mortgage payment.
    pub fn recurring_costs(&self) -> Money {
        self.recurring_costs
    }

    /// Rent for `year`: base * (1 + g)^year.
    pub fn annual_rent(&self, year: u32) -> RentBuyResult<Money> {
        if self.rent_increase_rate.is_zero() {
            return Ok(self.base_annual_rent);
        }
        let factor = compound(self.rent_increase_rate, year)?;
        checked_mul(self.base_annual_rent, factor, "annual rent")
    }

    pub fn annual_house_expense(&self, year: u32) -> RentBuyResult<Money> {
        checked_add(
            self.recurring_costs,
            self.schedule.payment_in_year(year),
            "annual house expense",
        )
    }

    pub fn year(&self, year: u32) -> RentBuyResult<YearCashFlow> {
        let annual_rent = self.annual_rent(year)?;
        let mortgage_payment = self.schedule.payment_in_year(year);
        let annual_house_expense = self.annual_house_expense(year)?;
        Ok(YearCashFlow {
            year,
            annual_rent,
            recurring_costs: self.recurring_costs,
            mortgage_payment,
            annual_house_expense,
            investment_delta: checked_sub(annual_house_expense, annual_rent, "investment delta")?,
        })
    }

    /// Cash flows for years 1..years_to_run.
    pub fn project(&self, years_to_run: u32) -> RentBuyResult<Vec<YearCashFlow>> {
        (1..years_to_run).map(|year| self.year(year)).collect()
    }
}
