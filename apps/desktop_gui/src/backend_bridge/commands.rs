//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use client_core::DroppedFile;
use shared::domain::{HistoryEntry, ParameterSet};

pub enum BackendCommand {
    /// `params` is the model copy taken when the user pressed Run.
    Run {
        params: Option<ParameterSet>,
    },
    RefreshHistory,
    ImportFile {
        files: Vec<DroppedFile>,
    },
    SaveParameters {
        path: PathBuf,
        params: ParameterSet,
    },
    /// `entries` is the table as currently shown.
    ExportHistory {
        path: PathBuf,
        entries: Vec<HistoryEntry>,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Run { .. } => "run",
            BackendCommand::RefreshHistory => "refresh_history",
            BackendCommand::ImportFile { .. } => "import_file",
            BackendCommand::SaveParameters { .. } => "save_parameters",
            BackendCommand::ExportHistory { .. } => "export_history",
        }
    }
}
