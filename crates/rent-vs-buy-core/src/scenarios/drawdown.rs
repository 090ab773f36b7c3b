//! Drawdown sweep: one independent projection per starting resale haircut.
//!
//! Every scenario shares the mortgage schedule and the cash-flow series
//! read-only and owns its accumulators, so scenarios can run in any order
//! or in parallel (feature `parallel`) with identical results.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::investment::compounding::InvestmentAccount;
use crate::mortgage::amortization::MortgageSchedule;
use crate::ownership::cash_flow::YearCashFlow;
use crate::ownership::home_equity::HomeEquityTracker;
use crate::simulation::params::SimulationParameters;
use crate::types::{Money, Percent};
use crate::RentBuyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One projected year of one scenario, both paths side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year_index: u32,
    /// Renter's investment account balance
    pub investment_net_equity: Money,
    /// Owner's equity net of loan and sale commission
    pub home_net_equity: Money,
    pub current_year_interest_paid: Money,
    pub cumulative_interest_paid: Money,
    pub home_market_value: Money,
    pub remaining_balance: Money,
    /// Recurring ownership costs to date, mortgage excluded
    pub cumulative_holding_costs: Money,
    pub cumulative_investment_contributions: Money,
    pub cumulative_investment_interest: Money,
    pub current_year_investment_interest: Money,
    pub annual_rent: Money,
    pub annual_house_expense: Money,
    pub investment_delta: Money,
}

/// Raw year series for one drawdown, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRun {
    pub drawdown_percent: Percent,
    pub starting_home_value: Money,
    pub years: Vec<YearRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project both paths for a single drawdown.
pub fn run_scenario(
    params: &SimulationParameters,
    schedule: &MortgageSchedule,
    flows: &[YearCashFlow],
    drawdown_percent: Percent,
) -> RentBuyResult<ScenarioRun> {
    let rates = params.rates();
    let mut account = InvestmentAccount::new(schedule.down_payment, rates.investment_return);
    let mut home = HomeEquityTracker::new(params, schedule, drawdown_percent)?;
    let starting_home_value = home.home_price();

    let mut years = Vec::with_capacity(flows.len());
    for flow in flows {
        let invested = account.contribute_and_grow(flow.investment_delta)?;
        let owned = home.advance(flow)?;

        years.push(YearRecord {
            year_index: flow.year,
            investment_net_equity: invested.closing_equity,
            home_net_equity: owned.home_net_equity,
            current_year_interest_paid: owned.current_year_interest_paid,
            cumulative_interest_paid: owned.cumulative_interest_paid,
            home_market_value: owned.home_market_value,
            remaining_balance: owned.remaining_balance,
            cumulative_holding_costs: owned.cumulative_holding_costs,
            cumulative_investment_contributions: account.cumulative_contributions(),
            cumulative_investment_interest: account.cumulative_interest(),
            current_year_investment_interest: invested.interest,
            annual_rent: flow.annual_rent,
            annual_house_expense: flow.annual_house_expense,
            investment_delta: flow.investment_delta,
        });
    }

    tracing::debug!(
        drawdown = %drawdown_percent,
        years = years.len(),
        "scenario projected"
    );

    Ok(ScenarioRun {
        drawdown_percent,
        starting_home_value,
        years,
    })
}

/// Run every drawdown. Output order follows `drawdowns`.
pub fn sweep_drawdowns(
    params: &SimulationParameters,
    schedule: &MortgageSchedule,
    flows: &[YearCashFlow],
    drawdowns: &[Percent],
) -> RentBuyResult<Vec<ScenarioRun>> {
    #[cfg(feature = "parallel")]
    let runs = drawdowns
        .par_iter()
        .map(|d| run_scenario(params, schedule, flows, *d))
        .collect::<RentBuyResult<Vec<_>>>();

    #[cfg(not(feature = "parallel"))]
    let runs = drawdowns
        .iter()
        .map(|d| run_scenario(params, schedule, flows, *d))
        .collect::<RentBuyResult<Vec<_>>>();

    runs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ownership::cash_flow::CashFlowModel;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sweep(params: &SimulationParameters) -> Vec<ScenarioRun> {
        let schedule = MortgageSchedule::from_parameters(params).unwrap();
        let flows = CashFlowModel::new(params, &schedule)
            .unwrap()
            .project(params.years_to_run)
            .unwrap();
        sweep_drawdowns(params, &schedule, &flows, &params.unique_drawdowns()).unwrap()
    }

    #[test]
    fn test_one_run_per_drawdown_in_order() {
        let params = SimulationParameters::default();
        let runs = sweep(&params);
        let drawdowns: Vec<Decimal> = runs.iter().map(|r| r.drawdown_percent).collect();
        assert_eq!(drawdowns, vec![dec!(0), dec!(5), dec!(10), dec!(20), dec!(30)]);
        assert!(runs.iter().all(|r| r.years.len() == 19));
    }

    #[test]
    fn test_year_indices_are_calendar_order() {
        let runs = sweep(&SimulationParameters::default());
        let idx: Vec<u32> = runs[0].years.iter().map(|y| y.year_index).collect();
        assert_eq!(idx, (1..20).collect::<Vec<u32>>());
    }

    #[test]
    fn test_investment_side_identical_across_drawdowns() {
        let runs = sweep(&SimulationParameters::default());
        let base = &runs[0];
        for other in &runs[1..] {
            for (a, b) in base.years.iter().zip(&other.years) {
                assert_eq!(a.investment_net_equity, b.investment_net_equity);
                assert_eq!(a.cumulative_interest_paid, b.cumulative_interest_paid);
                assert_eq!(a.cumulative_holding_costs, b.cumulative_holding_costs);
                assert!(b.home_net_equity < a.home_net_equity);
            }
        }
    }

    #[test]
    fn test_starting_value_haircut() {
        let runs = sweep(&SimulationParameters::default());
        assert_eq!(runs[0].starting_home_value, dec!(650000));
        assert_eq!(runs[4].starting_home_value, dec!(455000));
    }

    #[test]
    fn test_investment_starts_from_down_payment() {
        let params = SimulationParameters::default();
        let runs = sweep(&params);
        let y1 = &runs[0].years[0];
        // (130,000 + delta) * 1.05
        let expected = (dec!(130000) + y1.investment_delta) * dec!(1.05);
        assert!((y1.investment_net_equity - expected).abs() < dec!(0.0000001));
        assert_eq!(y1.cumulative_investment_contributions, y1.investment_delta);
    }

    #[test]
    fn test_single_year_yields_empty_series() {
        let mut params = SimulationParameters::default();
        params.years_to_run = 1;
        let runs = sweep(&params);
        assert_eq!(runs.len(), 5);
        assert!(runs.iter().all(|r| r.years.is_empty()));
    }
}
