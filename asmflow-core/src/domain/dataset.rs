//! Dataset domain types

use serde::{Deserialize, Serialize};

/// Full dataset record as returned by the dataset endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub history_id: Option<String>,
}

/// Source kind of a dataset reference.
///
/// `Hda` is a history dataset, `Hdca` a history dataset collection, `Ldda` a
/// library dataset. The wire values are part of the service's addressing
/// scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSource {
    Hda,
    Hdca,
    Ldda,
}

/// Reference to a dataset by source kind and opaque id.
///
/// This is the value threaded between pipeline steps: tool inputs take it,
/// job outputs yield it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    pub src: DatasetSource,
    pub id: String,
}

impl DatasetRef {
    /// Reference to a plain history dataset, the common case.
    pub fn hda(id: impl Into<String>) -> Self {
        Self {
            src: DatasetSource::Hda,
            id: id.into(),
        }
    }
}
