use rust_decimal::Decimal;
use std::time::Instant;

use crate::mortgage::amortization::MortgageSchedule;
use crate::ownership::cash_flow::CashFlowModel;
use crate::scenarios::drawdown::sweep_drawdowns;
use crate::simulation::aggregate::{aggregate, baseline_summary, SimulationOutput};
use crate::simulation::params::SimulationParameters;
use crate::types::{with_metadata, ComputationOutput};
use crate::RentBuyResult;

/// Run the full rent-versus-buy comparison.
///
/// Pure function of `params`: the mortgage schedule and cash-flow series are
/// derived once, then every distinct drawdown is projected independently and
/// the results are assembled at full precision.
pub fn simulate(
    params: &SimulationParameters,
) -> RentBuyResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();

    params.validate()?;
    let output = run(params)?;
    let warnings = collect_warnings(params, &output);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent vs Buy Net Equity Projection (drawdown sweep)",
        params,
        warnings,
        elapsed,
        output,
    ))
}

/// The engine proper, without validation or the metadata envelope.
pub(crate) fn run(params: &SimulationParameters) -> RentBuyResult<SimulationOutput> {
    let schedule = MortgageSchedule::from_parameters(params)?;
    let cash_flows = CashFlowModel::new(params, &schedule)?;
    let flows = cash_flows.project(params.years_to_run)?;
    let drawdowns = params.unique_drawdowns();

    tracing::debug!(
        scenarios = drawdowns.len(),
        years = flows.len(),
        annual_payment = %schedule.annual_payment,
        "running rent-vs-buy sweep"
    );

    let baseline = baseline_summary(
        &schedule,
        &cash_flows.year(1)?,
        cash_flows.base_annual_rent(),
    );
    let runs = sweep_drawdowns(params, &schedule, &flows, &drawdowns)?;
    aggregate(baseline, runs)
}

fn collect_warnings(params: &SimulationParameters, output: &SimulationOutput) -> Vec<String> {
    let mut warnings = Vec::new();

    if output.scenarios.len() < params.drawdown_percentages.len() {
        warnings.push(format!(
            "Duplicate drawdown percentages ignored: {} supplied, {} distinct",
            params.drawdown_percentages.len(),
            output.scenarios.len()
        ));
    }
    if params.years_to_run == 1 {
        warnings.push("years_to_run is 1: no years are projected beyond the baseline".into());
    }
    if params.years_to_run - 1 > params.amortization_period_years {
        warnings.push(format!(
            "Mortgage is paid off after year {}; later years carry no mortgage payment",
            params.amortization_period_years
        ));
    }
    if params.mortgage_rate_annual_percent.is_zero() {
        warnings.push("Zero mortgage rate: straight-line amortization applied".into());
    }
    if output.baseline.investment_delta < Decimal::ZERO {
        warnings.push(format!(
            "Renting costs {} more than owning in year 1; the rent path withdraws from its investments",
            -output.baseline.investment_delta
        ));
    }

    warnings
}
