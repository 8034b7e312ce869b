use thiserror::Error;

use crate::domain::ParameterField;

/// Input problems caught before anything is sent to the service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing parameters: set them with the controls or drop a parameter file")]
    MissingParameters,
    #[error("unsupported file '{filename}': only .txt parameter files are accepted")]
    UnsupportedExtension { filename: String },
    #[error("could not read '{filename}': {reason}")]
    Unreadable { filename: String, reason: String },
    #[error("malformed parameter file '{filename}': {reason}; expected JSON like {{\"a1\": 1, \"b1\": 2}}")]
    MalformedJson { filename: String, reason: String },
    #[error("invalid {field}: value must be a finite number")]
    NonFinite { field: ParameterField },
    #[error("invalid {field}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: ParameterField,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Failures talking to the computation service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("{endpoint}: connection failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("{endpoint}: request timed out")]
    Timeout { endpoint: String },
    #[error("{endpoint}: server responded with status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("{endpoint}: unexpected response body: {message}")]
    Decode { endpoint: String, message: String },
}

impl RequestError {
    pub fn endpoint(&self) -> &str {
        match self {
            RequestError::Transport { endpoint, .. }
            | RequestError::Timeout { endpoint }
            | RequestError::Status { endpoint, .. }
            | RequestError::Decode { endpoint, .. } => endpoint,
        }
    }
}
