//! Tool-related API endpoints

use std::path::Path;

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::GalaxyClient;
use crate::error::{ClientError, Result};
use asmflow_core::dto::tool::{RunToolRequest, ToolRunResponse, ToolSchema};

/// Tool id of the built-in upload tool.
const UPLOAD_TOOL_ID: &str = "upload1";

impl GalaxyClient {
    // =============================================================================
    // Tool Invocation
    // =============================================================================

    /// Invoke a tool against a history
    ///
    /// # Arguments
    /// * `history_id` - History the job runs in
    /// * `tool_id` - Versioned tool id (the service's addressing scheme)
    /// * `inputs` - Nested parameter map as the service expects it
    ///
    /// # Returns
    /// The queued jobs and preliminary outputs; outputs are only usable once
    /// the producing job reaches a terminal state.
    pub async fn run_tool(
        &self,
        history_id: &str,
        tool_id: &str,
        inputs: serde_json::Value,
    ) -> Result<ToolRunResponse> {
        debug!(tool_id, history_id, "submitting tool invocation");

        let url = format!("{}/api/tools", self.base_url);
        let response = self
            .post(&url)
            .json(&RunToolRequest {
                tool_id: tool_id.to_string(),
                history_id: history_id.to_string(),
                inputs,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Upload a local file into a history
    ///
    /// Submits the built-in upload tool as a multipart form, the same
    /// mechanism the service's own UI uses.
    ///
    /// # Arguments
    /// * `path` - Local file to upload
    /// * `history_id` - Destination history
    /// * `file_name` - Name the dataset gets inside the history
    pub async fn upload_file(
        &self,
        path: &Path,
        history_id: &str,
        file_name: &str,
    ) -> Result<ToolRunResponse> {
        debug!(?path, history_id, "uploading file");

        let bytes = tokio::fs::read(path).await?;

        let inputs = serde_json::json!({
            "files_0|NAME": file_name,
            "files_0|type": "upload_dataset",
            "dbkey": "?",
            "file_type": "auto",
        });

        let form = Form::new()
            .text("tool_id", UPLOAD_TOOL_ID)
            .text("history_id", history_id.to_string())
            .text("inputs", inputs.to_string())
            .part(
                "files_0|file_data",
                Part::bytes(bytes).file_name(file_name.to_string()),
            );

        let url = format!("{}/api/tools", self.base_url);
        let response = self.post(&url).multipart(form).send().await?;

        let upload: ToolRunResponse = self.handle_response(response).await?;
        if upload.outputs.is_empty() {
            return Err(ClientError::ParseError(format!(
                "upload of {} produced no output dataset",
                file_name
            )));
        }

        Ok(upload)
    }

    /// Fetch a tool's declared parameter schema
    ///
    /// # Arguments
    /// * `tool_id` - Versioned tool id
    pub async fn show_tool(&self, tool_id: &str) -> Result<ToolSchema> {
        let url = format!("{}/api/tools/{}?io_details=true", self.base_url, tool_id);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }
}
