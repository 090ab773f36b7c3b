use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rent_vs_buy_core::{evaluate_sensitivity, SensitivityInput, SensitivityVariable};

use super::parameters::ParameterArgs;

/// Arguments for 2-way sensitivity of the final-year ownership advantage
#[derive(Args)]
pub struct SensitivityArgs {
    /// First sensitivity variable in format name:min:max:step
    /// (e.g. "investment_return_percent:3:7:1")
    #[arg(long)]
    pub var1: String,

    /// Second sensitivity variable in format name:min:max:step
    #[arg(long)]
    pub var2: String,

    /// Drawdown scenario to report, in percent
    #[arg(long = "at-drawdown", default_value = "0")]
    pub at_drawdown: Decimal,

    #[command(flatten)]
    pub parameters: ParameterArgs,
}

fn parse_sens_var(spec: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            spec
        )
        .into());
    }
    Ok(SensitivityVariable {
        name: parts[0].to_string(),
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = SensitivityInput {
        base_parameters: args.parameters.resolve()?,
        variable_1: parse_sens_var(&args.var1)?,
        variable_2: parse_sens_var(&args.var2)?,
        drawdown_percent: args.at_drawdown,
    };
    let result = evaluate_sensitivity(&input)?;
    Ok(serde_json::to_value(result)?)
}
