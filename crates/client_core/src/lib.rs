//! Parameter intake and history synchronization for the computation service.
//!
//! Two adapters write one [`ParameterModel`]; the [`Orchestrator`] takes a
//! copy of it on run, calls the computation service and then re-fetches the
//! full history.

pub mod adapters;
pub mod computation_client;
pub mod config;
pub mod history_client;
pub mod history_export;
pub mod model;
pub mod orchestrator;
pub mod transport;

pub use adapters::{ControlAdapter, DroppedFile, FileAdapter, ImportedParameters};
pub use computation_client::{ComputationClient, ComputeService};
pub use config::{load_settings, FileRangePolicy, Settings};
pub use history_client::{HistoryClient, HistoryService};
pub use history_export::export_history;
pub use model::{ParameterModel, ParameterPatch};
pub use orchestrator::{
    Orchestrator, OrchestratorSnapshot, RunError, RunOutcome, RunReport, RunState,
};
pub use transport::HttpTransport;

/// Orchestrator wired to the real HTTP clients.
pub type ServiceOrchestrator = Orchestrator<ComputationClient, HistoryClient>;

pub fn connect(settings: &Settings) -> anyhow::Result<ServiceOrchestrator> {
    let transport = HttpTransport::from_settings(settings)?;
    tracing::info!(base_url = transport.base_url(), "using computation service");
    Ok(Orchestrator::new(
        ComputationClient::new(transport.clone()),
        HistoryClient::new(transport),
    ))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
