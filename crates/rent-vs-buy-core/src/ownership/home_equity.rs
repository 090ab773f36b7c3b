use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::mortgage::amortization::MortgageSchedule;
use crate::ownership::cash_flow::YearCashFlow;
use crate::simulation::params::SimulationParameters;
use crate::time_value::{checked_add, checked_mul, checked_sub, grow};
use crate::types::{percent_to_rate, Money, Percent, Rate};
use crate::RentBuyResult;

/// The owner's position at the end of one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeYear {
    pub home_market_value: Money,
    pub remaining_balance: Money,
    pub current_year_interest_paid: Money,
    pub cumulative_interest_paid: Money,
    pub cumulative_holding_costs: Money,
    /// Market value less the loan and the commission of an immediate sale
    pub home_net_equity: Money,
}

/// Tracks market value and resale equity of the home under one drawdown.
///
/// The drawdown only haircuts the starting market value; the loan is always
/// sized on the full purchase price.
#[derive(Debug, Clone)]
pub struct HomeEquityTracker<'a> {
    schedule: &'a MortgageSchedule,
    growth_rate: Rate,
    commission_rate: Rate,
    home_price: Money,
    cumulative_interest_paid: Money,
    cumulative_holding_costs: Money,
}

impl<'a> HomeEquityTracker<'a> {
    pub fn new(
        params: &SimulationParameters,
        schedule: &'a MortgageSchedule,
        drawdown_percent: Percent,
    ) -> RentBuyResult<Self> {
        let rates = params.rates();
        let haircut = Decimal::ONE - percent_to_rate(drawdown_percent);
        Ok(Self {
            schedule,
            growth_rate: rates.home_growth,
            commission_rate: rates.realtor_commission,
            home_price: checked_mul(params.purchase_price, haircut, "starting home value")?,
            cumulative_interest_paid: Decimal::ZERO,
            cumulative_holding_costs: Decimal::ZERO,
        })
    }

    /// Market value before any projected year has elapsed.
    pub fn home_price(&self) -> Money {
        self.home_price
    }

    /// Roll the home forward through `flow.year`.
    pub fn advance(&mut self, flow: &YearCashFlow) -> RentBuyResult<HomeYear> {
        self.home_price = grow(self.home_price, self.growth_rate)?;

        let remaining_balance = self.schedule.remaining_balance(flow.year);
        let current_year_interest_paid = self.schedule.interest_in_year(flow.year);
        self.cumulative_interest_paid = checked_add(
            self.cumulative_interest_paid,
            current_year_interest_paid,
            "cumulative interest",
        )?;
        self.cumulative_holding_costs = checked_add(
            self.cumulative_holding_costs,
            flow.recurring_costs,
            "cumulative holding costs",
        )?;

        let commission = checked_mul(self.home_price, self.commission_rate, "sale commission")?;
        let home_net_equity = checked_sub(
            checked_sub(self.home_price, remaining_balance, "home net equity")?,
            commission,
            "home net equity",
        )?;

        Ok(HomeYear {
            home_market_value: self.home_price,
            remaining_balance,
            current_year_interest_paid,
            cumulative_interest_paid: self.cumulative_interest_paid,
            cumulative_holding_costs: self.cumulative_holding_costs,
            home_net_equity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ownership::cash_flow::CashFlowModel;
    use rust_decimal_macros::dec;

    fn run(params: &SimulationParameters, drawdown: Decimal) -> Vec<HomeYear> {
        let schedule = MortgageSchedule::from_parameters(params).unwrap();
        let model = CashFlowModel::new(params, &schedule).unwrap();
        let mut tracker = HomeEquityTracker::new(params, &schedule, drawdown).unwrap();
        model
            .project(params.years_to_run)
            .unwrap()
            .iter()
            .map(|f| tracker.advance(f).unwrap())
            .collect()
    }

    #[test]
    fn test_drawdown_haircuts_starting_value() {
        let params = SimulationParameters::default();
        let schedule = MortgageSchedule::from_parameters(&params).unwrap();
        let tracker = HomeEquityTracker::new(&params, &schedule, dec!(20)).unwrap();
        assert_eq!(tracker.home_price(), dec!(520000));
    }

    #[test]
    fn test_net_equity_formula_no_growth() {
        let params = SimulationParameters::default();
        let years = run(&params, Decimal::ZERO);
        let y1 = &years[0];

        // No growth: value stays 650,000; commission 6% = 39,000
        assert_eq!(y1.home_market_value, dec!(650000));
        assert_eq!(
            y1.home_net_equity,
            dec!(650000) - y1.remaining_balance - dec!(39000)
        );
    }

    #[test]
    fn test_growth_compounds_yearly() {
        let mut params = SimulationParameters::default();
        params.annual_home_growth_rate_percent = dec!(3);
        let years = run(&params, Decimal::ZERO);
        assert_eq!(years[0].home_market_value, dec!(669500));
        assert_eq!(years[1].home_market_value, dec!(689585));
    }

    #[test]
    fn test_holding_costs_exclude_mortgage() {
        let params = SimulationParameters::default();
        let years = run(&params, Decimal::ZERO);
        for (i, y) in years.iter().enumerate() {
            assert_eq!(y.cumulative_holding_costs, dec!(12000) * Decimal::from(i as u32 + 1));
        }
    }

    #[test]
    fn test_cumulative_interest_accumulates() {
        let params = SimulationParameters::default();
        let years = run(&params, Decimal::ZERO);
        let mut sum = Decimal::ZERO;
        for y in &years {
            sum += y.current_year_interest_paid;
            assert_eq!(y.cumulative_interest_paid, sum);
        }
        // Interest falls as principal is repaid
        assert!(years[0].current_year_interest_paid > years[1].current_year_interest_paid);
    }

    #[test]
    fn test_drawdown_does_not_change_loan_side() {
        let params = SimulationParameters::default();
        let base = run(&params, Decimal::ZERO);
        let stressed = run(&params, dec!(30));
        for (a, b) in base.iter().zip(&stressed) {
            assert_eq!(a.remaining_balance, b.remaining_balance);
            assert_eq!(a.cumulative_interest_paid, b.cumulative_interest_paid);
            assert_eq!(a.cumulative_holding_costs, b.cumulative_holding_costs);
            assert!(b.home_market_value < a.home_market_value);
        }
    }

    #[test]
    fn test_holding_cost_overflow_is_an_error() {
        let params = SimulationParameters::default();
        let schedule = MortgageSchedule::from_parameters(&params).unwrap();
        let mut tracker = HomeEquityTracker::new(&params, &schedule, Decimal::ZERO).unwrap();
        let flow = |year: u32| YearCashFlow {
            year,
            annual_rent: Decimal::ZERO,
            recurring_costs: dec!(50000000000000000000000000000),
            mortgage_payment: schedule.annual_payment,
            annual_house_expense: dec!(50000000000000000000000000000),
            investment_delta: Decimal::ZERO,
        };
        assert!(tracker.advance(&flow(1)).is_ok());
        assert!(matches!(
            tracker.advance(&flow(2)),
            Err(crate::error::RentBuyError::Overflow { .. })
        ));
    }
}
