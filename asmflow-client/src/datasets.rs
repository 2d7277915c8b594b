//! Dataset-related API endpoints

use std::path::Path;

use tracing::debug;

use crate::GalaxyClient;
use crate::error::Result;
use asmflow_core::domain::dataset::Dataset;

impl GalaxyClient {
    // =============================================================================
    // Dataset Inspection & Download
    // =============================================================================

    /// Get a dataset record
    ///
    /// # Arguments
    /// * `dataset_id` - The dataset id
    pub async fn show_dataset(&self, dataset_id: &str) -> Result<Dataset> {
        let url = format!("{}/api/datasets/{}", self.base_url, dataset_id);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Download a dataset's content to a local file
    ///
    /// # Arguments
    /// * `dataset_id` - The dataset id
    /// * `dest` - Local path the content is written to
    ///
    /// # Returns
    /// Number of bytes written
    pub async fn download_dataset(&self, dataset_id: &str, dest: &Path) -> Result<u64> {
        let url = format!("{}/api/datasets/{}/display", self.base_url, dataset_id);
        let response = self.get(&url).send().await?;

        let body = self.handle_bytes_response(response).await?;
        tokio::fs::write(dest, &body).await?;

        debug!(dataset_id, ?dest, bytes = body.len(), "downloaded dataset");

        Ok(body.len() as u64)
    }
}
