use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

use crate::error::RentBuyError;
use crate::simulation::aggregate::final_advantage;
use crate::simulation::engine::run;
use crate::simulation::params::SimulationParameters;
use crate::types::*;
use crate::RentBuyResult;

/// Numeric simulation parameters that can be swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKey {
    PurchasePrice,
    DownPaymentPercent,
    AmortizationPeriodYears,
    MortgageRateAnnualPercent,
    AnnualPropertyTaxes,
    MonthlyStrataFees,
    AnnualMaintenance,
    AnnualHomeGrowthRatePercent,
    RealtorCommissionPercent,
    InvestmentReturnPercent,
    ComparableMonthlyRent,
    AnnualRentIncreasePercent,
    YearsToRun,
}

impl FromStr for ParameterKey {
    type Err = RentBuyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().replace('-', "_").as_str() {
            "purchase_price" => Self::PurchasePrice,
            "down_payment_percent" => Self::DownPaymentPercent,
            "amortization_period_years" => Self::AmortizationPeriodYears,
            "mortgage_rate_annual_percent" => Self::MortgageRateAnnualPercent,
            "annual_property_taxes" => Self::AnnualPropertyTaxes,
            "monthly_strata_fees" => Self::MonthlyStrataFees,
            "annual_maintenance" => Self::AnnualMaintenance,
            "annual_home_growth_rate_percent" => Self::AnnualHomeGrowthRatePercent,
            "realtor_commission_percent" => Self::RealtorCommissionPercent,
            "investment_return_percent" => Self::InvestmentReturnPercent,
            "comparable_monthly_rent" => Self::ComparableMonthlyRent,
            "annual_rent_increase_percent" => Self::AnnualRentIncreasePercent,
            "years_to_run" => Self::YearsToRun,
            other => {
                return Err(RentBuyError::invalid(
                    "variable",
                    format!("Unknown simulation parameter '{other}'"),
                ))
            }
        };
        Ok(key)
    }
}

impl ParameterKey {
    /// Overwrite this parameter in `params`. Year counts must be whole numbers.
    pub fn apply(self, params: &mut SimulationParameters, value: Decimal) -> RentBuyResult<()> {
        match self {
            Self::PurchasePrice => params.purchase_price = value,
            Self::DownPaymentPercent => params.down_payment_percent = value,
            Self::AmortizationPeriodYears => {
                params.amortization_period_years = whole_years("amortization_period_years", value)?
            }
            Self::MortgageRateAnnualPercent => params.mortgage_rate_annual_percent = value,
            Self::AnnualPropertyTaxes => params.annual_property_taxes = value,
            Self::MonthlyStrataFees => params.monthly_strata_fees = value,
            Self::AnnualMaintenance => params.annual_maintenance = value,
            Self::AnnualHomeGrowthRatePercent => params.annual_home_growth_rate_percent = value,
            Self::RealtorCommissionPercent => params.realtor_commission_percent = value,
            Self::InvestmentReturnPercent => params.investment_return_percent = value,
            Self::ComparableMonthlyRent => params.comparable_monthly_rent = value,
            Self::AnnualRentIncreasePercent => params.annual_rent_increase_percent = value,
            Self::YearsToRun => params.years_to_run = whole_years("years_to_run", value)?,
        }
        Ok(())
    }
}

fn whole_years(field: &str, value: Decimal) -> RentBuyResult<u32> {
    if !value.fract().is_zero() {
        return Err(RentBuyError::invalid(field, format!("{value} is not a whole number of years")));
    }
    value
        .to_u32()
        .ok_or_else(|| RentBuyError::invalid(field, format!("{value} is out of range")))
}

/// Input for a 2-way sensitivity of the final-year ownership advantage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Base case; swept fields are overwritten per grid point
    #[serde(default)]
    pub base_parameters: SimulationParameters,
    /// First variable to sweep (a `SimulationParameters` field name)
    pub variable_1: SensitivityVariable,
    /// Second variable to sweep
    pub variable_2: SensitivityVariable,
    /// Drawdown scenario whose advantage is reported
    #[serde(default)]
    pub drawdown_percent: Percent,
}

/// Output of 2-way sensitivity analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1_name: String,
    pub variable_2_name: String,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub drawdown_percent: Percent,
    pub output_metric: String,
    /// Matrix[i][j] = output when variable_1 = variable_1_values[i], variable_2 = variable_2_values[j]
    pub matrix: Vec<Vec<Decimal>>,
    /// Base case output value
    pub base_case_value: Decimal,
    /// Position of the base case in the matrix (row, col)
    pub base_case_position: (usize, usize),
}

/// Most values one sensitivity variable may take.
pub const MAX_SWEEP_POINTS: usize = 200;

/// Most grid points (full simulations) one analysis may run.
pub const MAX_GRID_POINTS: usize = 2_500;

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> RentBuyResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(RentBuyError::InvalidParameter {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(RentBuyError::InvalidParameter {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    let too_many = || RentBuyError::InvalidParameter {
        field: format!("variable:{}", var.name),
        reason: format!("Range produces more than {MAX_SWEEP_POINTS} values; increase the step"),
    };
    let steps = var
        .max
        .checked_sub(var.min)
        .and_then(|span| span.checked_div(var.step))
        .ok_or_else(too_many)?;
    if steps.ceil() >= Decimal::from(MAX_SWEEP_POINTS) {
        return Err(too_many());
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn evaluate_point(
    base: &SimulationParameters,
    keys: (ParameterKey, ParameterKey),
    values: (Decimal, Decimal),
    drawdown_percent: Percent,
) -> RentBuyResult<Decimal> {
    let mut params = base.clone();
    keys.0.apply(&mut params, values.0)?;
    keys.1.apply(&mut params, values.1)?;
    params.validate()?;

    let output = run(&params)?;
    final_advantage(&output, drawdown_percent).ok_or_else(|| {
        RentBuyError::invalid("drawdown_percent", "Drawdown scenario missing from output")
    })
}

/// Sweep two parameters and report the final-year ownership advantage
/// (home net equity minus investment net equity) at every grid point.
///
/// Grid points that fail validation become warnings and zero cells.
pub fn evaluate_sensitivity(
    input: &SensitivityInput,
) -> RentBuyResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let key_1: ParameterKey = input.variable_1.name.parse()?;
    let key_2: ParameterKey = input.variable_2.name.parse()?;
    if key_1 == key_2 {
        return Err(RentBuyError::invalid(
            "variable_2",
            "Sensitivity variables must differ",
        ));
    }
    if input.drawdown_percent < Decimal::ZERO || input.drawdown_percent > dec!(100) {
        return Err(RentBuyError::invalid(
            "drawdown_percent",
            "Drawdown must be between 0 and 100",
        ));
    }

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;
    let grid_points = v1_values.len() * v2_values.len();
    if grid_points > MAX_GRID_POINTS {
        return Err(RentBuyError::invalid(
            "variable_2",
            format!("Grid of {grid_points} points exceeds the limit of {MAX_GRID_POINTS}"),
        ));
    }

    // Only the reported drawdown needs projecting
    let mut base = input.base_parameters.clone();
    base.drawdown_percentages = vec![input.drawdown_percent];

    let mut matrix = Vec::with_capacity(v1_values.len());
    for v1 in &v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        for v2 in &v2_values {
            match evaluate_point(&base, (key_1, key_2), (*v1, *v2), input.drawdown_percent) {
                Ok(val) => row.push(val),
                Err(e) => {
                    warnings.push(format!("Evaluation failed at ({v1}, {v2}): {e}"));
                    row.push(Decimal::ZERO);
                }
            }
        }
        matrix.push(row);
    }

    let mid1 = input.variable_1.min / dec!(2) + input.variable_1.max / dec!(2);
    let mid2 = input.variable_2.min / dec!(2) + input.variable_2.max / dec!(2);
    let base_row = closest_index(&v1_values, mid1);
    let base_col = closest_index(&v2_values, mid2);
    let base_case_value = matrix[base_row][base_col];

    let output = SensitivityOutput {
        variable_1_name: input.variable_1.name.clone(),
        variable_2_name: input.variable_2.name.clone(),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        drawdown_percent: input.drawdown_percent,
        output_metric: "ownership_advantage".into(),
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Sensitivity of Final-Year Ownership Advantage",
        &serde_json::json!({
            "variable_1": input.variable_1.name,
            "variable_2": input.variable_2.name,
            "drawdown_percent": input.drawdown_percent,
            "base_parameters": input.base_parameters,
        }),
        warnings,
        elapsed,
        output,
    ))
}
