//! UI/backend events and error modeling for the desktop GUI controller.

use std::path::PathBuf;

use client_core::{ImportedParameters, OrchestratorSnapshot, RunError, RunReport};
use shared::error::{RequestError, ValidationError};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    ParametersImported(ImportedParameters),
    ParametersSaved(PathBuf),
    HistoryExported(PathBuf),
    RunStarted,
    RunSucceeded(RunReport),
    /// Orchestrator state after any run or refresh, successful or not.
    Synced(OrchestratorSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    /// The service stored the run but the table could not be refreshed.
    Partial,
    Busy,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Import,
    Save,
    Export,
    Run,
    Refresh,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn from_validation(context: UiErrorContext, err: &ValidationError) -> Self {
        Self::new(UiErrorCategory::Validation, context, err.to_string())
    }

    pub fn from_request(context: UiErrorContext, err: &RequestError) -> Self {
        Self::new(UiErrorCategory::Transport, context, describe_request_error(err))
    }

    pub fn from_run(context: UiErrorContext, err: &RunError) -> Self {
        match err {
            RunError::Validation(err) => Self::from_validation(context, err),
            RunError::Busy { .. } => Self::new(UiErrorCategory::Busy, context, err.to_string()),
            RunError::Computation(source) | RunError::HistoryFetch(source) => {
                Self::from_request(context, source)
            }
            RunError::HistoryRefresh { result, source } => Self::new(
                UiErrorCategory::Partial,
                context,
                format!(
                    "Run recorded (RES1={}, RES2={}, RES3={}) but the history table could not be refreshed: {}",
                    result.res1,
                    result.res2,
                    result.res3,
                    describe_request_error(source)
                ),
            ),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn describe_request_error(err: &RequestError) -> String {
    match err {
        RequestError::Transport { .. } | RequestError::Timeout { .. } => format!(
            "Computation service unreachable; check the base URL and that the service is running ({err})"
        ),
        RequestError::Status { .. } | RequestError::Decode { .. } => {
            format!("Computation service error: {err}")
        }
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::Transport => "Service",
        UiErrorCategory::Partial => "Partial",
        UiErrorCategory::Busy => "Busy",
        UiErrorCategory::Unknown => "Error",
    }
}
