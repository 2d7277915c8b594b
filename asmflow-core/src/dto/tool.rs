//! Tool DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobState;

/// Request to invoke a tool against a history.
///
/// `inputs` is the service's nested parameter map; conditional parameters use
/// the `section|name` key syntax. Callers build it through the typed tool
/// parameter structs rather than by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunToolRequest {
    pub tool_id: String,
    pub history_id: String,
    pub inputs: serde_json::Value,
}

/// Response to a tool submission.
///
/// The service answers immediately with the queued jobs and preliminary
/// output datasets; outputs only become usable once the producing job reaches
/// a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRunResponse {
    #[serde(default)]
    pub outputs: Vec<OutputSummary>,
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

/// Preliminary output dataset in a tool submission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub output_name: Option<String>,
}

/// Queued job in a tool submission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub state: JobState,
}

/// Declared parameter schema of a tool, fetched from the tool endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub inputs: Vec<ToolInput>,
}

/// One declared tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub name: String,
    #[serde(rename = "type", default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl ToolSchema {
    /// Declared top-level parameter names.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|i| i.name.as_str())
    }
}
