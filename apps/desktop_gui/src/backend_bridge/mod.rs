//! Backend worker: owns the tokio runtime and the orchestrator.

pub mod commands;
pub mod runtime;
