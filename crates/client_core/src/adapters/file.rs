use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use shared::{
    domain::{ParameterField, ParameterSet, ParameterSource},
    error::ValidationError,
};
use tracing::{info, warn};

use crate::{config::FileRangePolicy, model::ParameterModel};

const ACCEPTED_SUFFIX: &str = ".txt";

/// A file handed over by a drop or a file picker. Native drops carry a path,
/// web drops carry the bytes.
#[derive(Debug, Clone, Default)]
pub struct DroppedFile {
    pub name: String,
    pub path: Option<PathBuf>,
    pub bytes: Option<Arc<[u8]>>,
}

impl DroppedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            name: String::new(),
            path: Some(path.into()),
            bytes: None,
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            path: None,
            bytes: Some(bytes.into()),
        }
    }

    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A parsed, validated parameter file that has not been applied yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedParameters {
    pub filename: String,
    pub params: ParameterSet,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileAdapter {
    policy: FileRangePolicy,
}

impl FileAdapter {
    pub fn new(policy: FileRangePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FileRangePolicy {
        self.policy
    }

    /// Reads and validates the first dropped file. `Ok(None)` when the drop
    /// carried no files.
    pub async fn load(
        &self,
        files: &[DroppedFile],
    ) -> Result<Option<ImportedParameters>, ValidationError> {
        let Some(file) = files.first() else {
            return Ok(None);
        };
        if files.len() > 1 {
            info!(ignored = files.len() - 1, "only the first dropped file is read");
        }

        let filename = file.display_name();
        if !has_accepted_extension(&filename) {
            warn!(%filename, "rejected parameter file with unsupported extension");
            return Err(ValidationError::UnsupportedExtension { filename });
        }

        let bytes = read_bytes(file, &filename).await?;
        let text = String::from_utf8(bytes).map_err(|_| ValidationError::Unreadable {
            filename: filename.clone(),
            reason: "file is not valid UTF-8 text".to_string(),
        })?;

        let params = self.parse(&filename, &text)?;
        Ok(Some(ImportedParameters { filename, params }))
    }

    pub fn parse(&self, filename: &str, text: &str) -> Result<ParameterSet, ValidationError> {
        let text = text.trim_start_matches('\u{feff}');
        let malformed = |reason: String| ValidationError::MalformedJson {
            filename: filename.to_string(),
            reason,
        };
        // Derived struct visitors also take sequences, so `[5, 10]` would
        // otherwise pass as a parameter set.
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|err| malformed(err.to_string()))?;
        if !value.is_object() {
            return Err(malformed(
                "expected an object with numeric a1 and b1".to_string(),
            ));
        }
        let params: ParameterSet =
            serde_json::from_value(value).map_err(|err| malformed(err.to_string()))?;

        for field in ParameterField::ALL {
            let value = params.get(field);
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field });
            }
            let bounds = field.bounds();
            if self.policy == FileRangePolicy::Reject && !bounds.contains(value) {
                return Err(ValidationError::OutOfRange {
                    field,
                    value,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }

        Ok(params)
    }

    /// Replaces the whole parameter set and records the file name.
    pub fn apply(&self, model: &mut ParameterModel, imported: ImportedParameters) {
        info!(filename = %imported.filename, "parameters imported from file");
        model.replace(
            imported.params,
            ParameterSource::File {
                name: imported.filename,
            },
        );
    }

    /// [`load`](Self::load) followed by [`apply`](Self::apply). On error the
    /// model is left exactly as it was.
    pub async fn drop_files(
        &self,
        model: &mut ParameterModel,
        files: &[DroppedFile],
    ) -> Result<Option<ParameterSet>, ValidationError> {
        let Some(imported) = self.load(files).await? else {
            return Ok(None);
        };
        let params = imported.params;
        self.apply(model, imported);
        Ok(Some(params))
    }

    /// Writes `params` in the canonical casing so the file can be dropped back in.
    pub async fn save(path: &Path, params: &ParameterSet) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(params)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write parameter file '{}'", path.display()))?;
        info!(path = %path.display(), "parameters saved");
        Ok(())
    }
}

fn has_accepted_extension(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(ACCEPTED_SUFFIX)
}

async fn read_bytes(file: &DroppedFile, filename: &str) -> Result<Vec<u8>, ValidationError> {
    if let Some(bytes) = &file.bytes {
        return Ok(bytes.to_vec());
    }
    let Some(path) = &file.path else {
        return Err(ValidationError::Unreadable {
            filename: filename.to_string(),
            reason: "drop carried neither a path nor file contents".to_string(),
        });
    };
    tokio::fs::read(path)
        .await
        .map_err(|err| ValidationError::Unreadable {
            filename: filename.to_string(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
#[path = "../tests/file_adapter_tests.rs"]
mod tests;
