pub mod error;
pub mod time_value;
pub mod types;

pub mod investment;
pub mod mortgage;
pub mod ownership;
pub mod scenarios;
pub mod simulation;

pub use error::RentBuyError;
pub use types::*;

pub use mortgage::amortization::{build_schedule, MortgageSchedule, ScheduleOutput};
pub use scenarios::sensitivity::{evaluate_sensitivity, SensitivityInput, SensitivityOutput};
pub use simulation::aggregate::{ScenarioResult, SimulationOutput};
pub use simulation::engine::simulate;
pub use simulation::params::SimulationParameters;
pub use simulation::session::{SimulationSession, Submission};

/// Standard result type for all rent-vs-buy operations
pub type RentBuyResult<T> = Result<T, RentBuyError>;
