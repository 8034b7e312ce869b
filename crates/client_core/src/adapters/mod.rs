//! Producers of parameter model updates: bounded controls and file import.

mod control;
mod file;

pub use control::ControlAdapter;
pub use file::{DroppedFile, FileAdapter, ImportedParameters};
