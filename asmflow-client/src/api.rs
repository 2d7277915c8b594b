//! Trait seam over the execution-service API
//!
//! The pipeline layer depends on this trait rather than on [`GalaxyClient`]
//! directly, so tests can substitute a scripted in-memory service.

use std::path::Path;

use async_trait::async_trait;

use crate::GalaxyClient;
use crate::error::Result;
use asmflow_core::domain::dataset::Dataset;
use asmflow_core::domain::history::{History, HistoryItem};
use asmflow_core::domain::job::Job;
use asmflow_core::domain::user::User;
use asmflow_core::dto::tool::{ToolRunResponse, ToolSchema};

/// Operations the pipeline consumes from the execution service.
///
/// Mirrors the service's workspace/tool/job/dataset API one method per
/// endpoint; [`GalaxyClient`] is the HTTP implementation.
#[async_trait]
pub trait GalaxyApi: Send + Sync {
    /// Creates a new history (workspace).
    async fn create_history(&self, name: &str) -> Result<History>;

    /// Lists all histories owned by the account.
    async fn get_histories(&self) -> Result<Vec<History>>;

    /// Lists the datasets contained in a history.
    async fn show_history_contents(&self, history_id: &str) -> Result<Vec<HistoryItem>>;

    /// Uploads a local file into a history.
    async fn upload_file(
        &self,
        path: &Path,
        history_id: &str,
        file_name: &str,
    ) -> Result<ToolRunResponse>;

    /// Invokes a tool with a nested parameter map.
    async fn run_tool(
        &self,
        history_id: &str,
        tool_id: &str,
        inputs: serde_json::Value,
    ) -> Result<ToolRunResponse>;

    /// Fetches a job with full details, including its named output map.
    async fn show_job(&self, job_id: &str) -> Result<Job>;

    /// Lists the jobs that ran in a history.
    async fn get_history_jobs(&self, history_id: &str) -> Result<Vec<Job>>;

    /// Fetches a dataset record.
    async fn show_dataset(&self, dataset_id: &str) -> Result<Dataset>;

    /// Downloads a dataset's content to a local file, returning bytes written.
    async fn download_dataset(&self, dataset_id: &str, dest: &Path) -> Result<u64>;

    /// Fetches a tool's declared parameter schema.
    async fn show_tool(&self, tool_id: &str) -> Result<ToolSchema>;

    /// Fetches the user owning the configured API key.
    async fn get_current_user(&self) -> Result<User>;
}

#[async_trait]
impl GalaxyApi for GalaxyClient {
    async fn create_history(&self, name: &str) -> Result<History> {
        GalaxyClient::create_history(self, name).await
    }

    async fn get_histories(&self) -> Result<Vec<History>> {
        GalaxyClient::get_histories(self).await
    }

    async fn show_history_contents(&self, history_id: &str) -> Result<Vec<HistoryItem>> {
        GalaxyClient::show_history_contents(self, history_id).await
    }

    async fn upload_file(
        &self,
        path: &Path,
        history_id: &str,
        file_name: &str,
    ) -> Result<ToolRunResponse> {
        GalaxyClient::upload_file(self, path, history_id, file_name).await
    }

    async fn run_tool(
        &self,
        history_id: &str,
        tool_id: &str,
        inputs: serde_json::Value,
    ) -> Result<ToolRunResponse> {
        GalaxyClient::run_tool(self, history_id, tool_id, inputs).await
    }

    async fn show_job(&self, job_id: &str) -> Result<Job> {
        GalaxyClient::show_job(self, job_id).await
    }

    async fn get_history_jobs(&self, history_id: &str) -> Result<Vec<Job>> {
        GalaxyClient::get_history_jobs(self, history_id).await
    }

    async fn show_dataset(&self, dataset_id: &str) -> Result<Dataset> {
        GalaxyClient::show_dataset(self, dataset_id).await
    }

    async fn download_dataset(&self, dataset_id: &str, dest: &Path) -> Result<u64> {
        GalaxyClient::download_dataset(self, dataset_id, dest).await
    }

    async fn show_tool(&self, tool_id: &str) -> Result<ToolSchema> {
        GalaxyClient::show_tool(self, tool_id).await
    }

    async fn get_current_user(&self) -> Result<User> {
        GalaxyClient::get_current_user(self).await
    }
}
