//! Wire shapes of the computation service.
//!
//! `POST /run` takes a [`ParameterSet`] as its body and answers with
//! [`RunResponse`]. `GET /history` answers with a JSON array of
//! [`HistoryEntry`] in storage order.

use serde::{Deserialize, Serialize};

use crate::domain::{ComputationResult, HistoryEntry, ParameterSet};

pub const RUN_PATH: &str = "/run";
pub const HISTORY_PATH: &str = "/history";

pub type RunRequest = ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub result: ComputationResult,
}

pub type HistoryResponse = Vec<HistoryEntry>;
