use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_value::{checked_add, checked_mul};
use crate::types::{Money, Rate};
use crate::RentBuyResult;

/// What happened to the account in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentYear {
    pub contribution: Money,
    pub interest: Money,
    pub closing_equity: Money,
}

/// The renter's alternative investment account. Starts with the capital
/// that would otherwise have gone into the down payment.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentAccount {
    equity: Money,
    return_rate: Rate,
    cumulative_contributions: Money,
    cumulative_interest: Money,
}

impl InvestmentAccount {
    pub fn new(initial_equity: Money, return_rate: Rate) -> Self {
        Self {
            equity: initial_equity,
            return_rate,
            cumulative_contributions: Decimal::ZERO,
            cumulative_interest: Decimal::ZERO,
        }
    }

    /// Add the year's contribution (negative = withdrawal), then earn a full
    /// year of return on the new total.
    pub fn contribute_and_grow(&mut self, contribution: Money) -> RentBuyResult<InvestmentYear> {
        let invested = checked_add(self.equity, contribution, "investment balance")?;
        let interest = checked_mul(invested, self.return_rate, "investment interest")?;
        self.equity = checked_add(invested, interest, "investment balance")?;
        self.cumulative_contributions = checked_add(
            self.cumulative_contributions,
            contribution,
            "cumulative contributions",
        )?;
        self.cumulative_interest =
            checked_add(self.cumulative_interest, interest, "cumulative investment interest")?;

        Ok(InvestmentYear {
            contribution,
            interest,
            closing_equity: self.equity,
        })
    }

    pub fn equity(&self) -> Money {
        self.equity
    }

    pub fn cumulative_contributions(&self) -> Money {
        self.cumulative_contributions
    }

    pub fn cumulative_interest(&self) -> Money {
        self.cumulative_interest
    }
}
