//! History-related API endpoints

use crate::GalaxyClient;
use crate::error::Result;
use asmflow_core::domain::history::{History, HistoryItem};
use asmflow_core::dto::history::CreateHistoryRequest;

impl GalaxyClient {
    // =============================================================================
    // History Management
    // =============================================================================

    /// Create a new history
    ///
    /// # Arguments
    /// * `name` - Display name for the new history
    ///
    /// # Returns
    /// The created history
    pub async fn create_history(&self, name: &str) -> Result<History> {
        let url = format!("{}/api/histories", self.base_url);
        let response = self
            .post(&url)
            .json(&CreateHistoryRequest {
                name: name.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List all histories owned by the account
    ///
    /// # Returns
    /// A list of histories, most recently updated first
    pub async fn get_histories(&self) -> Result<Vec<History>> {
        let url = format!("{}/api/histories", self.base_url);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List the datasets contained in a history
    ///
    /// # Arguments
    /// * `history_id` - The history id
    ///
    /// # Returns
    /// The history's datasets in hid order
    pub async fn show_history_contents(&self, history_id: &str) -> Result<Vec<HistoryItem>> {
        let url = format!("{}/api/histories/{}/contents", self.base_url, history_id);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }
}
