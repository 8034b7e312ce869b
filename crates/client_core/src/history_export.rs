//! CSV export of the synchronized history table.
//!
//! Columns follow the service's history names. Every cell is a number, so no
//! quoting is needed.

use std::path::Path;

use anyhow::{bail, Context};
use shared::domain::HistoryEntry;
use tracing::info;

pub const CSV_HEADER: &str = "A1,B1,RES1,RES2,RES3";

pub fn to_csv(entries: &[HistoryEntry]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + entries.len() * 32);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            entry.a1, entry.b1, entry.res1, entry.res2, entry.res3
        ));
    }
    out
}

/// Reads back a file written by [`to_csv`].
pub fn parse_csv(text: &str) -> anyhow::Result<Vec<HistoryEntry>> {
    let mut lines = text
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    match lines.next() {
        Some(header) if header.eq_ignore_ascii_case(CSV_HEADER) => {}
        Some(other) => bail!("unexpected history header '{other}' (expected '{CSV_HEADER}')"),
        None => bail!("history file is empty"),
    }

    lines
        .enumerate()
        .map(|(idx, line)| {
            let row = idx + 2;
            let cells = line
                .split(',')
                .map(|cell| {
                    cell.trim()
                        .parse::<f64>()
                        .with_context(|| format!("row {row}: '{cell}' is not a number"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let [a1, b1, res1, res2, res3] = cells[..] else {
                bail!("row {row}: expected 5 columns, found {}", cells.len());
            };
            Ok(HistoryEntry {
                a1,
                b1,
                res1,
                res2,
                res3,
            })
        })
        .collect()
}

pub async fn export_history(path: &Path, entries: &[HistoryEntry]) -> anyhow::Result<()> {
    tokio::fs::write(path, to_csv(entries))
        .await
        .with_context(|| format!("failed to write history file '{}'", path.display()))?;
    info!(path = %path.display(), rows = entries.len(), "history exported");
    Ok(())
}

#[cfg(test)]
#[path = "tests/history_export_tests.rs"]
mod tests;
