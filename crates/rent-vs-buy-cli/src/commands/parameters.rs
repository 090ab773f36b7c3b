use clap::Args;
use rust_decimal::Decimal;

use rent_vs_buy_core::SimulationParameters;

use crate::input;

/// Simulation parameters shared by every subcommand. Flags override the
/// values loaded from `--input` or stdin.
#[derive(Args, Debug, Default)]
#[command(allow_hyphen_values = true)]
pub struct ParameterArgs {
    /// Path to a JSON or YAML parameter file
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price of the home
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Down payment as a percent of the price (20 = 20%)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Amortization period in years
    #[arg(long)]
    pub amortization_years: Option<u32>,

    /// Annual mortgage rate in percent
    #[arg(long)]
    pub mortgage_rate: Option<Decimal>,

    /// Annual property taxes
    #[arg(long)]
    pub property_taxes: Option<Decimal>,

    /// Monthly strata (condo) fees
    #[arg(long)]
    pub strata_fees: Option<Decimal>,

    /// Annual maintenance budget
    #[arg(long)]
    pub maintenance: Option<Decimal>,

    /// Annual home price growth in percent
    #[arg(long)]
    pub home_growth: Option<Decimal>,

    /// Realtor commission on sale in percent
    #[arg(long)]
    pub commission: Option<Decimal>,

    /// Annual investment return in percent
    #[arg(long)]
    pub investment_return: Option<Decimal>,

    /// Monthly rent of a comparable home
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Annual rent increase in percent
    #[arg(long)]
    pub rent_increase: Option<Decimal>,

    /// Years to run, counting the baseline year
    #[arg(long)]
    pub years: Option<u32>,

    /// Drawdown percentages, comma separated (e.g. 0,10,20)
    #[arg(long = "drawdown", value_delimiter = ',')]
    pub drawdowns: Option<Vec<Decimal>>,
}

impl ParameterArgs {
    /// Resolve parameters: `--input` file, else piped stdin, else defaults,
    /// then apply flag overrides.
    pub fn resolve(&self) -> Result<SimulationParameters, Box<dyn std::error::Error>> {
        let base: SimulationParameters = if let Some(ref path) = self.input {
            input::file::read_input(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            SimulationParameters::default()
        };
        Ok(self.apply(base))
    }

    fn apply(&self, mut params: SimulationParameters) -> SimulationParameters {
        fn set<T: Copy>(target: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *target = v;
            }
        }

        set(&mut params.purchase_price, self.purchase_price);
        set(&mut params.down_payment_percent, self.down_payment);
        set(&mut params.amortization_period_years, self.amortization_years);
        set(&mut params.mortgage_rate_annual_percent, self.mortgage_rate);
        set(&mut params.annual_property_taxes, self.property_taxes);
        set(&mut params.monthly_strata_fees, self.strata_fees);
        set(&mut params.annual_maintenance, self.maintenance);
        set(&mut params.annual_home_growth_rate_percent, self.home_growth);
        set(&mut params.realtor_commission_percent, self.commission);
        set(&mut params.investment_return_percent, self.investment_return);
        set(&mut params.comparable_monthly_rent, self.rent);
        set(&mut params.annual_rent_increase_percent, self.rent_increase);
        set(&mut params.years_to_run, self.years);
        if let Some(ref drawdowns) = self.drawdowns {
            params.drawdown_percentages = drawdowns.clone();
        }

        tracing::debug!(?params, "resolved simulation parameters");
        params
    }
}
