//! The single current parameter set shared by both input adapters.

use shared::domain::{ParameterField, ParameterSet, ParameterSource};
use tracing::debug;

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterPatch {
    pub a1: Option<f64>,
    pub b1: Option<f64>,
}

impl ParameterPatch {
    pub fn field(field: ParameterField, value: f64) -> Self {
        match field {
            ParameterField::A1 => Self {
                a1: Some(value),
                b1: None,
            },
            ParameterField::B1 => Self {
                a1: None,
                b1: Some(value),
            },
        }
    }
}

/// Structural container only. Validation belongs to the adapters and the
/// orchestrator; whatever is written here is stored as-is.
#[derive(Debug, Clone, Default)]
pub struct ParameterModel {
    current: Option<ParameterSet>,
    source: ParameterSource,
}

impl ParameterModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model that starts at `a1 = 0, b1 = 0`, as the controls do.
    pub fn with_defaults() -> Self {
        Self {
            current: Some(ParameterSet::default()),
            source: ParameterSource::Controls,
        }
    }

    pub fn get(&self) -> Option<ParameterSet> {
        self.current
    }

    pub fn source(&self) -> &ParameterSource {
        &self.source
    }

    /// Merges the provided fields. Partial writes come from the controls, so
    /// the source switches back to [`ParameterSource::Controls`].
    pub fn set(&mut self, patch: ParameterPatch) {
        let mut next = self.current.unwrap_or_default();
        if let Some(a1) = patch.a1 {
            next.a1 = a1;
        }
        if let Some(b1) = patch.b1 {
            next.b1 = b1;
        }
        debug!(a1 = next.a1, b1 = next.b1, "parameter model merged");
        self.current = Some(next);
        self.source = ParameterSource::Controls;
    }

    pub fn replace(&mut self, params: ParameterSet, source: ParameterSource) {
        debug!(a1 = params.a1, b1 = params.b1, ?source, "parameter model replaced");
        self.current = Some(params);
        self.source = source;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.source = ParameterSource::Controls;
    }
}
