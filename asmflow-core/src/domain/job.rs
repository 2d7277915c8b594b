//! Job domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::dataset::DatasetRef;

/// One invocation of a tool on the execution service.
///
/// The `outputs` map is only populated when the job is fetched with full
/// details; it maps the tool's declared output names to dataset references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub tool_id: Option<String>,
    pub state: JobState,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub create_time: Option<chrono::NaiveDateTime>,
    #[serde(default)]
    pub update_time: Option<chrono::NaiveDateTime>,
    #[serde(default)]
    pub outputs: HashMap<String, DatasetRef>,
}

impl Job {
    /// Looks up a named output, if the service reported it.
    pub fn output(&self, name: &str) -> Option<&DatasetRef> {
        self.outputs.get(name)
    }
}

/// Job lifecycle state as reported by the execution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    New,
    Upload,
    Waiting,
    Queued,
    Running,
    Ok,
    Error,
    Paused,
    Deleted,
}

impl JobState {
    /// True exactly for the two states the service never leaves.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Ok | JobState::Error)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::New => "new",
            JobState::Upload => "upload",
            JobState::Waiting => "waiting",
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Ok => "ok",
            JobState::Error => "error",
            JobState::Paused => "paused",
            JobState::Deleted => "deleted",
        };
        f.write_str(s)
    }
}
