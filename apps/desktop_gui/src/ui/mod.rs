//! UI layer: the single-window app shell.

pub mod app;

pub use app::CalcApp;
