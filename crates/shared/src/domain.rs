use std::fmt;

use serde::{Deserialize, Serialize};

/// The two inputs of a computation.
///
/// Canonical wire casing is lowercase (`a1`, `b1`); the uppercase spelling used
/// by older parameter files is accepted on input only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(alias = "A1")]
    pub a1: f64,
    #[serde(alias = "B1")]
    pub b1: f64,
}

impl ParameterSet {
    pub fn new(a1: f64, b1: f64) -> Self {
        Self { a1, b1 }
    }

    pub fn get(&self, field: ParameterField) -> f64 {
        match field {
            ParameterField::A1 => self.a1,
            ParameterField::B1 => self.b1,
        }
    }

    pub fn with(mut self, field: ParameterField, value: f64) -> Self {
        match field {
            ParameterField::A1 => self.a1 = value,
            ParameterField::B1 => self.b1 = value,
        }
        self
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self { a1: 0.0, b1: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    A1,
    B1,
}

impl ParameterField {
    pub const ALL: [ParameterField; 2] = [ParameterField::A1, ParameterField::B1];

    pub fn key(self) -> &'static str {
        match self {
            ParameterField::A1 => "a1",
            ParameterField::B1 => "b1",
        }
    }

    /// Range and granularity of the interactive control for this field.
    pub fn bounds(self) -> ParameterBounds {
        match self {
            ParameterField::A1 => ParameterBounds::new(0.0, 50.0, 0.1),
            ParameterField::B1 => ParameterBounds::new(0.0, 60.0, 0.1),
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterBounds {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Snaps `value` onto the step grid anchored at `min`, then clamps.
    pub fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // Strip float noise such as 0.30000000000000004.
        let decimals = decimal_places(self.step);
        let scale = 10f64.powi(decimals);
        ((snapped * scale).round() / scale).clamp(self.min, self.max)
    }
}

fn decimal_places(step: f64) -> i32 {
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < 9 && (scaled - scaled.round()).abs() > 1e-9 {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

/// Where the current parameters were last written from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParameterSource {
    #[default]
    Controls,
    File {
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    #[serde(rename = "RES1")]
    pub res1: f64,
    #[serde(rename = "RES2")]
    pub res2: f64,
    #[serde(rename = "RES3")]
    pub res3: f64,
}

/// One stored run: the parameters joined with their result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "A1")]
    pub a1: f64,
    #[serde(rename = "B1")]
    pub b1: f64,
    #[serde(rename = "RES1")]
    pub res1: f64,
    #[serde(rename = "RES2")]
    pub res2: f64,
    #[serde(rename = "RES3")]
    pub res3: f64,
}

impl HistoryEntry {
    pub fn parameters(&self) -> ParameterSet {
        ParameterSet::new(self.a1, self.b1)
    }

    pub fn result(&self) -> ComputationResult {
        ComputationResult {
            res1: self.res1,
            res2: self.res2,
            res3: self.res3,
        }
    }
}
