use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "calc.toml";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// How the file importer treats values outside the control ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRangePolicy {
    #[default]
    Reject,
    Accept,
}

impl std::str::FromStr for FileRangePolicy {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "accept" => Ok(Self::Accept),
            other => bail!("unknown file range policy '{other}' (expected 'reject' or 'accept')"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub file_range_policy: FileRangePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            file_range_policy: FileRangePolicy::Reject,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn with_base_url(mut self, raw: &str) -> anyhow::Result<Self> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    file_range_policy: Option<FileRangePolicy>,
}

/// Defaults, then `calc.toml` (or `path`), then environment overrides.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file = match path {
        Some(path) => Some(read_settings_file(path)?),
        None => {
            let default_path = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                Some(read_settings_file(&default_path)?)
            } else {
                None
            }
        }
    };
    if let Some(file) = file {
        apply_file(&mut settings, file)?;
    }

    apply_env(&mut settings, |name| std::env::var(name).ok())?;
    settings.base_url = normalize_base_url(&settings.base_url)?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid settings file '{}'", path.display()))
}

fn apply_file(settings: &mut Settings, file: FileSettings) -> anyhow::Result<()> {
    if let Some(v) = file.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file.request_timeout_ms {
        settings.request_timeout_ms = nonzero_timeout(v, "request_timeout_ms")?;
    }
    if let Some(v) = file.file_range_policy {
        settings.file_range_policy = v;
    }
    Ok(())
}

pub(crate) fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("CALC_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_MS") {
        let ms = v
            .trim()
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_MS must be an integer, got '{v}'"))?;
        settings.request_timeout_ms = nonzero_timeout(ms, "APP__REQUEST_TIMEOUT_MS")?;
    }

    if let Some(v) = lookup("APP__FILE_RANGE_POLICY") {
        settings.file_range_policy = v.parse()?;
    }

    Ok(())
}

fn nonzero_timeout(ms: u64, name: &str) -> anyhow::Result<u64> {
    if ms == 0 {
        bail!("{name} must be greater than zero");
    }
    Ok(ms)
}

pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_BASE_URL.to_string());
    }

    let parsed = Url::parse(raw).with_context(|| format!("invalid base url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("base url '{raw}' must use http or https");
    }
    if parsed.host_str().is_none() {
        bail!("base url '{raw}' has no host");
    }
    // Endpoint paths are appended to the base url as plain text.
    if parsed.query().is_some() || parsed.fragment().is_some() {
        bail!("base url '{raw}' must not carry a query or fragment");
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
