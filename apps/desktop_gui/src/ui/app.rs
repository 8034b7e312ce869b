use client_core::{
    ControlAdapter, DroppedFile, FileAdapter, OrchestratorSnapshot, ParameterModel, RunOutcome,
    RunState,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{ComputationResult, HistoryEntry, ParameterField, ParameterSource};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorCategory, UiEvent};
use crate::controller::orchestration::{dispatch_backend_command, request_run};

pub struct CalcApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    model: ParameterModel,
    controls: ControlAdapter,
    files: FileAdapter,
    history: Vec<HistoryEntry>,
    last_result: Option<ComputationResult>,
    last_outcome: Option<RunOutcome>,
    synced_at: Option<chrono::DateTime<chrono::Utc>>,
    running: bool,
    importing: bool,
    status: String,
    status_banner: Option<UiError>,
}

impl CalcApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        files: FileAdapter,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            model: ParameterModel::with_defaults(),
            controls: ControlAdapter::new(),
            files,
            history: Vec::new(),
            last_result: None,
            last_outcome: None,
            synced_at: None,
            running: false,
            importing: false,
            status: "Loading history...".to_string(),
            status_banner: None,
        };
        dispatch_backend_command(
            &app.cmd_tx,
            BackendCommand::RefreshHistory,
            &mut app.status,
        );
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => {
                    if err.category() == UiErrorCategory::Validation {
                        self.importing = false;
                    }
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status_banner = Some(err);
                }
                UiEvent::ParametersImported(imported) => {
                    self.importing = false;
                    self.status = format!("Loaded parameters from {}", imported.filename);
                    self.status_banner = None;
                    self.files.apply(&mut self.model, imported);
                }
                UiEvent::ParametersSaved(path) => {
                    self.status = format!("Saved parameters to {}", path.display());
                }
                UiEvent::HistoryExported(path) => {
                    self.status = format!("Exported history to {}", path.display());
                }
                UiEvent::RunStarted => {
                    self.running = true;
                    self.status = "Computing...".to_string();
                }
                UiEvent::RunSucceeded(report) => {
                    self.status = format!(
                        "Run finished: RES1={} RES2={} RES3={}",
                        report.result.res1, report.result.res2, report.result.res3
                    );
                    self.status_banner = None;
                }
                UiEvent::Synced(snapshot) => self.apply_snapshot(snapshot),
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: OrchestratorSnapshot) {
        self.history = snapshot.history;
        self.last_result = snapshot.last_result;
        self.last_outcome = snapshot.last_outcome;
        self.synced_at = snapshot.synced_at;
        self.running = snapshot.state == RunState::Running;
        if self.status == "Loading history..." || self.status == "Computing..." {
            self.status = format!("{} runs in history", self.history.len());
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let files = dropped
            .into_iter()
            .map(|file| DroppedFile {
                name: file.name,
                path: file.path,
                bytes: file.bytes,
            })
            .collect();
        self.queue_import(files);
    }

    fn queue_import(&mut self, files: Vec<DroppedFile>) {
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::ImportFile { files },
            &mut self.status,
        ) {
            self.importing = true;
            self.status = "Reading parameter file...".to_string();
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let fill = match banner.category() {
                UiErrorCategory::Partial | UiErrorCategory::Busy => {
                    egui::Color32::from_rgb(120, 90, 30)
                }
                _ => egui::Color32::from_rgb(111, 53, 53),
            };
            egui::Frame::NONE
                .fill(fill)
                .corner_radius(6.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "[{}] {}",
                                err_label(banner.category()),
                                banner.message()
                            ))
                            .color(egui::Color32::WHITE),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
        }
    }

    fn show_parameter_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Parameters");
        for field in ParameterField::ALL {
            let bounds = self.controls.bounds(field);
            let mut value = self.controls.position(&self.model, field);
            let response = ui.add(
                egui::Slider::new(&mut value, bounds.min..=bounds.max)
                    .step_by(bounds.step)
                    .fixed_decimals(1)
                    .text(field.key()),
            );
            if response.changed() {
                self.controls.on_change(&mut self.model, field, value);
            }
        }

        match (self.model.get(), self.model.source()) {
            (Some(params), ParameterSource::File { name }) => {
                ui.label(format!("a1 = {}, b1 = {} (from {name})", params.a1, params.b1));
            }
            (Some(params), ParameterSource::Controls) => {
                ui.label(format!("a1 = {}, b1 = {}", params.a1, params.b1));
            }
            (None, _) => {
                ui.weak("No parameters set");
            }
        }

        ui.add_space(8.0);
        let drop_hint = if self.importing {
            "Reading file..."
        } else {
            "Drop a .txt parameter file here"
        };
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(drop_hint);
                ui.small(r#"{"a1": 5, "b1": 10}"#);
            });
        });

        ui.horizontal(|ui| {
            if ui.button("Browse...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Parameter file", &["txt"])
                    .pick_file()
                {
                    self.queue_import(vec![DroppedFile::from_path(path)]);
                }
            }
            let can_save = self.model.get().is_some();
            if ui
                .add_enabled(can_save, egui::Button::new("Save parameters..."))
                .clicked()
            {
                if let (Some(params), Some(path)) = (
                    self.model.get(),
                    rfd::FileDialog::new()
                        .add_filter("Parameter file", &["txt"])
                        .set_file_name("params.txt")
                        .save_file(),
                ) {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::SaveParameters { path, params },
                        &mut self.status,
                    );
                }
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let run_label = if self.running { "Running..." } else { "Run" };
            if ui
                .add_enabled(!self.running, egui::Button::new(run_label))
                .clicked()
            {
                request_run(
                    &self.cmd_tx,
                    self.model.get(),
                    &mut self.running,
                    &mut self.status,
                );
            }
            if self.running {
                ui.spinner();
            }
        });

        if let Some(result) = self.last_result {
            let suffix = match self.last_outcome {
                Some(RunOutcome::Failed) => " (history not refreshed)",
                _ => "",
            };
            ui.label(format!(
                "Last result: RES1={} RES2={} RES3={}{suffix}",
                result.res1, result.res2, result.res3
            ));
        }
    }

    fn show_history_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("History");
            if ui
                .add_enabled(!self.running, egui::Button::new("Refresh"))
                .clicked()
            {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::RefreshHistory,
                    &mut self.status,
                );
            }
            if ui
                .add_enabled(!self.history.is_empty(), egui::Button::new("Export history..."))
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .set_file_name("history.csv")
                    .save_file()
                {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::ExportHistory {
                            path,
                            entries: self.history.clone(),
                        },
                        &mut self.status,
                    );
                }
            }
            if let Some(synced_at) = self.synced_at {
                ui.weak(format!(
                    "synced {}",
                    synced_at.with_timezone(&chrono::Local).format("%H:%M:%S")
                ));
            }
        });

        if self.history.is_empty() {
            ui.weak("No runs recorded yet");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("history_table")
                .striped(true)
                .num_columns(5)
                .show(ui, |ui| {
                    for header in ["A1", "B1", "RES1", "RES2", "RES3"] {
                        ui.strong(header);
                    }
                    ui.end_row();
                    for entry in &self.history {
                        for value in [entry.a1, entry.b1, entry.res1, entry.res2, entry.res3] {
                            ui.label(value.to_string());
                        }
                        ui.end_row();
                    }
                });
        });
    }
}

impl eframe::App for CalcApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(egui::RichText::new(&self.status).weak());
        });
        egui::SidePanel::left("parameters")
            .resizable(false)
            .min_width(300.0)
            .show(ctx, |ui| {
                self.show_status_banner(ui);
                self.show_parameter_panel(ui);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_history_panel(ui);
        });
    }
}
