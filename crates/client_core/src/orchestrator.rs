//! Sequences validation, the computation call and the history refresh.
//!
//! `Idle -> Running -> (Succeeded | Failed) -> Idle`. The terminal state of
//! the last run is kept as [`RunOutcome`]; the orchestrator itself is back to
//! [`RunState::Idle`] as soon as the run has been reported, or as soon as the
//! run future is dropped.

use std::sync::{Mutex as StateLock, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use shared::{
    domain::{ComputationResult, HistoryEntry, ParameterField, ParameterSet},
    error::{RequestError, ValidationError},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{computation_client::ComputeService, history_client::HistoryService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", busy_message(.state))]
    Busy { state: RunState },
    #[error("computation failed: {0}")]
    Computation(RequestError),
    /// The run was recorded by the service but the local history is stale.
    #[error("computation succeeded but the history could not be refreshed: {source}")]
    HistoryRefresh {
        result: ComputationResult,
        source: RequestError,
    },
    #[error("history could not be loaded: {0}")]
    HistoryFetch(RequestError),
}

fn busy_message(state: &RunState) -> &'static str {
    match state {
        RunState::Refreshing => "history refresh in progress; try again when it finishes",
        _ => "a run is already in progress",
    }
}

impl RunError {
    /// True when the service has stored a result despite the error.
    pub fn result_was_recorded(&self) -> bool {
        matches!(self, RunError::HistoryRefresh { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub params: ParameterSet,
    pub result: ComputationResult,
    pub history_len: usize,
}

/// What the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorSnapshot {
    pub state: RunState,
    pub history: Vec<HistoryEntry>,
    pub last_result: Option<ComputationResult>,
    pub last_outcome: Option<RunOutcome>,
    pub synced_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    history: Vec<HistoryEntry>,
    last_result: Option<ComputationResult>,
    last_outcome: Option<RunOutcome>,
    synced_at: Option<DateTime<Utc>>,
}

pub struct Orchestrator<C, H> {
    compute: C,
    history: H,
    state: StateLock<RunState>,
    inner: Mutex<Inner>,
}

/// Holds the orchestrator out of `Idle`. Dropping it, including when the
/// owning future is cancelled, puts the state back to `Idle`.
struct BusyGuard<'a> {
    state: &'a StateLock<RunState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        debug!(from = ?*state, "orchestrator transition to idle");
        *state = RunState::Idle;
    }
}

fn lock_state(state: &StateLock<RunState>) -> MutexGuard<'_, RunState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<C, H> Orchestrator<C, H>
where
    C: ComputeService,
    H: HistoryService,
{
    pub fn new(compute: C, history: H) -> Self {
        Self {
            compute,
            history,
            state: StateLock::new(RunState::Idle),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub async fn snapshot(&self) -> OrchestratorSnapshot {
        let inner = self.inner.lock().await;
        OrchestratorSnapshot {
            state: *lock_state(&self.state),
            history: inner.history.clone(),
            last_result: inner.last_result,
            last_outcome: inner.last_outcome,
            synced_at: inner.synced_at,
        }
    }

    pub async fn state(&self) -> RunState {
        *lock_state(&self.state)
    }

    /// Runs one computation for `params` and then re-synchronizes history.
    ///
    /// `params` is a copy of the parameter model taken at trigger time; the
    /// model itself is never written here.
    pub async fn run(&self, params: Option<ParameterSet>) -> Result<RunReport, RunError> {
        let params = validate(params)?;
        let _busy = self.begin(RunState::Running)?;
        info!(a1 = params.a1, b1 = params.b1, "run started");

        let result = match self.compute.run(&params).await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "run failed; history left untouched");
                self.finish(RunOutcome::Failed, None, None).await;
                return Err(RunError::Computation(err));
            }
        };

        match self.history.fetch().await {
            Ok(entries) => {
                let history_len = entries.len();
                self.finish(RunOutcome::Succeeded, Some(result), Some(entries))
                    .await;
                info!(history_len, "run succeeded");
                Ok(RunReport {
                    params,
                    result,
                    history_len,
                })
            }
            Err(err) => {
                warn!(error = %err, "run recorded but history refresh failed");
                self.finish(RunOutcome::Failed, Some(result), None).await;
                Err(RunError::HistoryRefresh {
                    result,
                    source: err,
                })
            }
        }
    }

    /// Full re-fetch outside of a run (startup, manual refresh).
    pub async fn refresh_history(&self) -> Result<usize, RunError> {
        let _busy = self.begin(RunState::Refreshing)?;
        let fetched = self.history.fetch().await;

        let mut inner = self.inner.lock().await;
        match fetched {
            Ok(entries) => {
                let len = entries.len();
                inner.history = entries;
                inner.synced_at = Some(Utc::now());
                debug!(len, "history refreshed");
                Ok(len)
            }
            Err(err) => {
                warn!(error = %err, "history refresh failed; keeping previous list");
                Err(RunError::HistoryFetch(err))
            }
        }
    }

    fn begin(&self, next: RunState) -> Result<BusyGuard<'_>, RunError> {
        let mut state = lock_state(&self.state);
        if *state != RunState::Idle {
            warn!(current = ?*state, requested = ?next, "rejecting request while busy");
            return Err(RunError::Busy { state: *state });
        }
        debug!(to = ?next, "orchestrator transition");
        *state = next;
        Ok(BusyGuard { state: &self.state })
    }

    async fn finish(
        &self,
        outcome: RunOutcome,
        result: Option<ComputationResult>,
        entries: Option<Vec<HistoryEntry>>,
    ) {
        let mut inner = self.inner.lock().await;
        if let Some(result) = result {
            inner.last_result = Some(result);
        }
        if let Some(entries) = entries {
            inner.history = entries;
            inner.synced_at = Some(Utc::now());
        }
        inner.last_outcome = Some(outcome);
        debug!(?outcome, "run finished");
    }
}

fn validate(params: Option<ParameterSet>) -> Result<ParameterSet, ValidationError> {
    let params = params.ok_or(ValidationError::MissingParameters)?;
    for field in ParameterField::ALL {
        if !params.get(field).is_finite() {
            return Err(ValidationError::NonFinite { field });
        }
    }
    Ok(params)
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
