//! Job-related API endpoints

use crate::GalaxyClient;
use crate::error::Result;
use asmflow_core::domain::job::Job;

impl GalaxyClient {
    // =============================================================================
    // Job Inspection
    // =============================================================================

    /// Get a job with full details, including its named output map
    ///
    /// # Arguments
    /// * `job_id` - The job id
    pub async fn show_job(&self, job_id: &str) -> Result<Job> {
        let url = format!("{}/api/jobs/{}?full=true", self.base_url, job_id);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List the jobs that ran in a history
    ///
    /// # Arguments
    /// * `history_id` - The history id
    pub async fn get_history_jobs(&self, history_id: &str) -> Result<Vec<Job>> {
        let url = format!("{}/api/jobs?history_id={}", self.base_url, history_id);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }
}
