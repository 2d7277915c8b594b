//! History domain types

use serde::{Deserialize, Serialize};

/// A history: the service-side workspace holding datasets and jobs.
///
/// One history is created per pipeline run and referenced by id throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    /// Number of datasets in the history, when the service reports it.
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub update_time: Option<chrono::NaiveDateTime>,
}

/// One dataset as listed in a history's contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub history_id: Option<String>,
    /// Datatype extension (e.g. "fastqsanger", "fasta", "tabular").
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Ordinal position within the history.
    #[serde(default)]
    pub hid: Option<u64>,
}

fn default_visible() -> bool {
    true
}
