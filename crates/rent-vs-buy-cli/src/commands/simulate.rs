use clap::Args;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use rent_vs_buy_core::simulate;

use super::parameters::ParameterArgs;

/// Arguments for the rent-vs-buy simulation
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub parameters: ParameterArgs,

    /// Report money in thousands, rounded to the nearest thousand
    #[arg(long)]
    pub thousands: bool,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.parameters.resolve()?;
    let result = simulate(&params)?;
    let mut value = serde_json::to_value(result)?;

    if args.thousands {
        if let Some(result) = value.get_mut("result") {
            to_thousands(result);
        }
    }
    Ok(value)
}

/// Rewrite every money field under `value` in thousands. Percent fields and
/// integer counters are left alone.
fn to_thousands(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key.ends_with("_percent") {
                    continue;
                }
                if let Value::String(s) = val {
                    if let Ok(d) = s.parse::<Decimal>() {
                        *s = (d / Decimal::ONE_THOUSAND)
                            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                            .to_string();
                    }
                } else {
                    to_thousands(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(to_thousands),
        _ => {}
    }
}
