use clap::Args;
use serde_json::Value;

use rent_vs_buy_core::build_schedule;

use super::parameters::ParameterArgs;

/// Arguments for the mortgage amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub parameters: ParameterArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.parameters.resolve()?;
    let result = build_schedule(&params)?;
    Ok(serde_json::to_value(result)?)
}
