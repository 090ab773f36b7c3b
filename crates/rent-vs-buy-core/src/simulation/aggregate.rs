use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::mortgage::amortization::MortgageSchedule;
use crate::ownership::cash_flow::YearCashFlow;
use crate::scenarios::drawdown::{ScenarioRun, YearRecord};
use crate::time_value::checked_sub;
use crate::types::{Money, Percent};
use crate::RentBuyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Year-1 figures shown above the per-scenario charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub down_payment: Money,
    pub loan_principal: Money,
    pub annual_mortgage_payment: Money,
    pub annual_house_expense: Money,
    /// Year-1 rent, i.e. after one annual rent increase
    pub annual_rent: Money,
    /// Twelve months of the rent entered, before any increase
    pub base_annual_rent: Money,
    pub investment_delta: Money,
}

/// Headline figures for one scenario, taken from its last projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub final_year: u32,
    pub home_net_equity: Money,
    pub investment_net_equity: Money,
    /// home_net_equity - investment_net_equity; positive favours buying
    pub ownership_advantage: Money,
    /// First year in which owning is at least as good as renting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossover_year: Option<u32>,
    pub total_interest_paid: Money,
    pub total_holding_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub drawdown_percent: Percent,
    pub starting_home_value: Money,
    pub years: Vec<YearRecord>,
    /// Absent when the horizon projects no years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScenarioSummary>,
}

/// Everything a renderer needs: baseline figures plus one result per
/// distinct drawdown, ascending by drawdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub baseline: BaselineSummary,
    pub scenarios: Vec<ScenarioResult>,
}

impl SimulationOutput {
    pub fn scenario(&self, drawdown_percent: Percent) -> Option<&ScenarioResult> {
        self.scenarios
            .iter()
            .find(|s| s.drawdown_percent == drawdown_percent)
    }

    pub fn drawdowns(&self) -> Vec<Percent> {
        self.scenarios.iter().map(|s| s.drawdown_percent).collect()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

pub fn baseline_summary(
    schedule: &MortgageSchedule,
    first_year: &YearCashFlow,
    base_annual_rent: Money,
) -> BaselineSummary {
    BaselineSummary {
        down_payment: schedule.down_payment,
        loan_principal: schedule.loan_principal,
        annual_mortgage_payment: schedule.annual_payment,
        annual_house_expense: first_year.annual_house_expense,
        annual_rent: first_year.annual_rent,
        base_annual_rent,
        investment_delta: first_year.investment_delta,
    }
}

pub fn summarize_scenario(years: &[YearRecord]) -> RentBuyResult<Option<ScenarioSummary>> {
    let Some(last) = years.last() else {
        return Ok(None);
    };
    let crossover_year = years
        .iter()
        .find(|y| y.home_net_equity >= y.investment_net_equity)
        .map(|y| y.year_index);

    Ok(Some(ScenarioSummary {
        final_year: last.year_index,
        home_net_equity: last.home_net_equity,
        investment_net_equity: last.investment_net_equity,
        ownership_advantage: checked_sub(
            last.home_net_equity,
            last.investment_net_equity,
            "ownership advantage",
        )?,
        crossover_year,
        total_interest_paid: last.cumulative_interest_paid,
        total_holding_costs: last.cumulative_holding_costs,
    }))
}

/// Assemble the final output. No rounding or unit scaling is applied.
pub fn aggregate(
    baseline: BaselineSummary,
    runs: Vec<ScenarioRun>,
) -> RentBuyResult<SimulationOutput> {
    let scenarios = runs
        .into_iter()
        .map(|run| {
            let summary = summarize_scenario(&run.years)?;
            Ok(ScenarioResult {
                drawdown_percent: run.drawdown_percent,
                starting_home_value: run.starting_home_value,
                years: run.years,
                summary,
            })
        })
        .collect::<RentBuyResult<Vec<_>>>()?;

    Ok(SimulationOutput {
        baseline,
        scenarios,
    })
}

/// Final-year ownership advantage for `drawdown_percent`, or zero when the
/// horizon projects no years.
pub fn final_advantage(output: &SimulationOutput, drawdown_percent: Percent) -> Option<Money> {
    let scenario = output.scenario(drawdown_percent)?;
    Some(
        scenario
            .summary
            .as_ref()
            .map(|s| s.ownership_advantage)
            .unwrap_or(Decimal::ZERO),
    )
}
