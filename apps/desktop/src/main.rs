use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    export_history, load_settings, ControlAdapter, DroppedFile, FileAdapter, ParameterModel,
    RunError,
};
use shared::domain::{HistoryEntry, ParameterField, ParameterSource};
use tracing_subscriber::EnvFilter;

/// Submit parameters to the computation service and print the run history.
#[derive(Parser, Debug)]
struct Args {
    /// Address of the computation service (overrides settings and env).
    #[arg(long)]
    base_url: Option<String>,
    /// Settings file; defaults to ./calc.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Parameter file (.txt containing {"a1": .., "b1": ..}).
    #[arg(long)]
    file: Option<PathBuf>,
    /// Applied after --file, clamped to [0, 50].
    #[arg(long, allow_negative_numbers = true)]
    a1: Option<f64>,
    /// Applied after --file, clamped to [0, 60].
    #[arg(long, allow_negative_numbers = true)]
    b1: Option<f64>,
    /// Write the resulting parameters to this file before running.
    #[arg(long)]
    save: Option<PathBuf>,
    /// Only fetch and print history.
    #[arg(long)]
    history_only: bool,
    /// Write the synchronized history table to this CSV file.
    #[arg(long)]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = &args.base_url {
        settings = settings.with_base_url(base_url)?;
    }
    tracing::debug!(?settings, "settings loaded");
    let orchestrator = client_core::connect(&settings)?;

    if args.history_only {
        orchestrator.refresh_history().await?;
        let history = orchestrator.snapshot().await.history;
        print_history(&history);
        return export_if_requested(args.export.as_deref(), &history).await;
    }

    let mut model = ParameterModel::new();
    if let Some(path) = &args.file {
        FileAdapter::new(settings.file_range_policy)
            .drop_files(&mut model, &[DroppedFile::from_path(path)])
            .await?;
    }
    let imported_from = match model.source() {
        ParameterSource::File { name } => Some(name.clone()),
        ParameterSource::Controls => None,
    };
    let controls = ControlAdapter::new();
    let mut overridden = Vec::new();
    for (field, value) in [(ParameterField::A1, args.a1), (ParameterField::B1, args.b1)] {
        if let Some(raw) = value {
            if let Some(applied) = controls.on_change(&mut model, field, raw) {
                overridden.push(field);
                if applied != raw {
                    println!("{field} adjusted to {applied} (control range and 0.1 step)");
                }
            }
        }
    }

    if let Some(path) = &args.save {
        let params = model
            .get()
            .context("nothing to save: pass --file or --a1/--b1")?;
        FileAdapter::save(path, &params).await?;
    }

    if let Some(params) = model.get() {
        let origin = parameter_origin(model.source(), imported_from.as_deref(), &overridden);
        println!("parameters: a1={} b1={} (from {origin})", params.a1, params.b1);
    }

    match orchestrator.run(model.get()).await {
        Ok(report) => {
            println!(
                "result: RES1={} RES2={} RES3={}",
                report.result.res1, report.result.res2, report.result.res3
            );
            let history = orchestrator.snapshot().await.history;
            print_history(&history);
            export_if_requested(args.export.as_deref(), &history).await
        }
        Err(RunError::HistoryRefresh { result, source }) => {
            println!(
                "result: RES1={} RES2={} RES3={} (recorded by the service)",
                result.res1, result.res2, result.res3
            );
            if args.export.is_some() {
                println!("history not exported: the table could not be refreshed");
            }
            Err(source).context("run recorded, but the history could not be re-synchronized")
        }
        Err(err) => Err(err.into()),
    }
}

/// Where the printed parameters came from. Flags applied on top of a file
/// only replace the fields they name.
fn parameter_origin(
    source: &ParameterSource,
    imported_from: Option<&str>,
    overridden: &[ParameterField],
) -> String {
    match (source, imported_from) {
        (ParameterSource::File { name }, _) => name.clone(),
        (ParameterSource::Controls, Some(file)) if overridden.len() < ParameterField::ALL.len() => {
            let fields: Vec<_> = overridden.iter().map(|field| field.key()).collect();
            format!("{file}, {} from flags", fields.join(", "))
        }
        (ParameterSource::Controls, _) => "flags".to_string(),
    }
}

async fn export_if_requested(path: Option<&Path>, history: &[HistoryEntry]) -> Result<()> {
    if let Some(path) = path {
        export_history(path, history).await?;
        println!("history exported to {}", path.display());
    }
    Ok(())
}

fn print_history(entries: &[HistoryEntry]) {
    println!("{:>4} {:>10} {:>10} {:>10} {:>10} {:>10}", "#", "A1", "B1", "RES1", "RES2", "RES3");
    for (idx, entry) in entries.iter().enumerate() {
        println!(
            "{:>4} {:>10} {:>10} {:>10} {:>10} {:>10}",
            idx + 1,
            entry.a1,
            entry.b1,
            entry.res1,
            entry.res2,
            entry.res3
        );
    }
    if entries.is_empty() {
        println!("(no runs recorded yet)");
    }
}
