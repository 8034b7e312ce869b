//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::ParameterSet;

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            false
        }
    }
}

/// Queues a run unless one is already in flight. Missing parameters are still
/// sent so the orchestrator reports them through the usual error path.
pub fn request_run(
    cmd_tx: &Sender<BackendCommand>,
    params: Option<ParameterSet>,
    running: &mut bool,
    status: &mut String,
) -> bool {
    if *running {
        *status = "A run is already in progress".to_string();
        return false;
    }
    let queued = dispatch_backend_command(cmd_tx, BackendCommand::Run { params }, status);
    if queued {
        *running = true;
    }
    queued
}
