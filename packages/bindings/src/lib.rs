use napi::Result as NapiResult;
use napi_derive::napi;

use rent_vs_buy_core::{SimulationParameters, SimulationSession, Submission};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_rent_vs_buy(input_json: String) -> NapiResult<String> {
    let input: SimulationParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rent_vs_buy_core::simulate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn mortgage_schedule(input_json: String) -> NapiResult<String> {
    let input: SimulationParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rent_vs_buy_core::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn rent_vs_buy_sensitivity(input_json: String) -> NapiResult<String> {
    let input: rent_vs_buy_core::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rent_vs_buy_core::evaluate_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Last-result-wins simulation holder for interactive front ends.
#[napi]
pub struct RentVsBuySession {
    inner: SimulationSession,
}

#[napi]
impl RentVsBuySession {
    #[napi(constructor)]
    pub fn new() -> Self {
        Self {
            inner: SimulationSession::new(),
        }
    }

    /// Recompute for `version`. Returns false when a newer version was
    /// already submitted and this one was dropped.
    #[napi]
    pub fn recompute(&mut self, version: i64, input_json: String) -> NapiResult<bool> {
        let version = u64::try_from(version)
            .map_err(|_| to_napi_error(format!("version must be non-negative, got {version}")))?;
        let input: SimulationParameters =
            serde_json::from_str(&input_json).map_err(to_napi_error)?;
        let submission = self
            .inner
            .recompute(version, &input)
            .map_err(to_napi_error)?;
        Ok(submission == Submission::Published)
    }

    /// JSON of the most recent successful output, if any.
    #[napi]
    pub fn latest(&self) -> NapiResult<Option<String>> {
        self.inner
            .latest()
            .map(|output| serde_json::to_string(output).map_err(to_napi_error))
            .transpose()
    }

    #[napi]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(|e| e.to_string())
    }
}
