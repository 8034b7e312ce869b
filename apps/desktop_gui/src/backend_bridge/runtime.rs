//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{FileAdapter, ServiceOrchestrator, Settings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};

/// Sends events to the UI thread and wakes it up.
#[derive(Clone)]
struct UiSink {
    tx: Sender<UiEvent>,
    ctx: egui::Context,
}

impl UiSink {
    fn send(&self, event: UiEvent) {
        if self.tx.try_send(event).is_err() {
            tracing::warn!("dropping ui event: queue full or ui gone");
        }
        self.ctx.request_repaint();
    }
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    ctx: egui::Context,
    settings: Settings,
) {
    let sink = UiSink { tx: ui_tx, ctx };
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                sink.send(UiEvent::Error(UiError::new(
                    UiErrorCategory::Unknown,
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let orchestrator = match client_core::connect(&settings) {
                Ok(orchestrator) => Arc::new(orchestrator),
                Err(err) => {
                    tracing::error!("failed to build service clients: {err:#}");
                    sink.send(UiEvent::Error(UiError::new(
                        UiErrorCategory::Unknown,
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )));
                    return;
                }
            };
            let files = FileAdapter::new(settings.file_range_policy);
            sink.send(UiEvent::Info(format!(
                "Connected to {}",
                settings.base_url
            )));

            // Commands run as separate tasks so the orchestrator, not the
            // queue, decides what happens to overlapping requests.
            while let Ok(cmd) = cmd_rx.recv() {
                let orchestrator = orchestrator.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    handle_command(cmd, &orchestrator, files, &sink).await;
                });
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

async fn handle_command(
    cmd: BackendCommand,
    orchestrator: &ServiceOrchestrator,
    files: FileAdapter,
    sink: &UiSink,
) {
    match cmd {
        BackendCommand::Run { params } => {
            sink.send(UiEvent::RunStarted);
            match orchestrator.run(params).await {
                Ok(report) => sink.send(UiEvent::RunSucceeded(report)),
                Err(err) => sink.send(UiEvent::Error(UiError::from_run(
                    UiErrorContext::Run,
                    &err,
                ))),
            }
            sink.send(UiEvent::Synced(orchestrator.snapshot().await));
        }
        BackendCommand::RefreshHistory => {
            if let Err(err) = orchestrator.refresh_history().await {
                sink.send(UiEvent::Error(UiError::from_run(
                    UiErrorContext::Refresh,
                    &err,
                )));
            }
            sink.send(UiEvent::Synced(orchestrator.snapshot().await));
        }
        BackendCommand::ImportFile { files: dropped } => match files.load(&dropped).await {
            Ok(Some(imported)) => sink.send(UiEvent::ParametersImported(imported)),
            Ok(None) => {}
            Err(err) => sink.send(UiEvent::Error(UiError::from_validation(
                UiErrorContext::Import,
                &err,
            ))),
        },
        BackendCommand::SaveParameters { path, params } => {
            match FileAdapter::save(&path, &params).await {
                Ok(()) => sink.send(UiEvent::ParametersSaved(path)),
                Err(err) => sink.send(UiEvent::Error(UiError::new(
                    UiErrorCategory::Unknown,
                    UiErrorContext::Save,
                    format!("{err:#}"),
                ))),
            }
        }
        BackendCommand::ExportHistory { path, entries } => {
            match client_core::export_history(&path, &entries).await {
                Ok(()) => sink.send(UiEvent::HistoryExported(path)),
                Err(err) => sink.send(UiEvent::Error(UiError::new(
                    UiErrorCategory::Unknown,
                    UiErrorContext::Export,
                    format!("{err:#}"),
                ))),
            }
        }
    }
}
