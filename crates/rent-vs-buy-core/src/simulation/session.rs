//! Last-result-wins holder for interactive callers.
//!
//! The presentation layer stamps every parameter change with an increasing
//! version and calls `recompute` (or `submit`, when it computed elsewhere).
//! Results for a version older than one already seen are dropped, and a
//! failed run never replaces the last good output.

use crate::simulation::aggregate::SimulationOutput;
use crate::simulation::engine::simulate;
use crate::simulation::params::SimulationParameters;
use crate::types::ComputationOutput;
use crate::RentBuyError;
use crate::RentBuyResult;

pub type SimulationEnvelope = ComputationOutput<SimulationOutput>;

/// What happened to a submitted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Became the latest output
    Published,
    /// A newer version was already seen; the result was dropped
    Stale,
}

#[derive(Debug, Default)]
pub struct SimulationSession {
    latest: Option<(u64, SimulationEnvelope)>,
    newest_seen: Option<u64>,
    last_error: Option<(u64, RentBuyError)>,
}

impl SimulationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `version` is older than a version already submitted.
    pub fn is_stale(&self, version: u64) -> bool {
        self.newest_seen.is_some_and(|newest| version < newest)
    }

    /// Compute `params` and publish the result under `version`.
    pub fn recompute(
        &mut self,
        version: u64,
        params: &SimulationParameters,
    ) -> RentBuyResult<Submission> {
        if self.is_stale(version) {
            tracing::debug!(version, "skipping stale recompute");
            return Ok(Submission::Stale);
        }
        self.submit(version, simulate(params))
    }

    /// Offer a result computed elsewhere (e.g. on a worker thread).
    ///
    /// Errors are returned to the caller and remembered, but the previous
    /// output stays in place.
    pub fn submit(
        &mut self,
        version: u64,
        result: RentBuyResult<SimulationEnvelope>,
    ) -> RentBuyResult<Submission> {
        if self.is_stale(version) {
            tracing::debug!(version, newest = ?self.newest_seen, "dropping stale result");
            return Ok(Submission::Stale);
        }
        self.newest_seen = Some(version);

        match result {
            Ok(output) => {
                self.latest = Some((version, output));
                self.last_error = None;
                Ok(Submission::Published)
            }
            Err(e) => {
                tracing::warn!(version, error = %e, "recompute failed; keeping previous output");
                self.last_error = Some((version, e.clone()));
                Err(e)
            }
        }
    }

    /// The most recent successful output.
    pub fn latest(&self) -> Option<&SimulationEnvelope> {
        self.latest.as_ref().map(|(_, output)| output)
    }

    /// Version of the most recent successful output.
    pub fn latest_version(&self) -> Option<u64> {
        self.latest.as_ref().map(|(version, _)| *version)
    }

    /// Error from the newest submission, if it failed.
    pub fn last_error(&self) -> Option<&RentBuyError> {
        self.last_error.as_ref().map(|(_, e)| e)
    }
}
