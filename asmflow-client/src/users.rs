//! User-related API endpoints

use crate::GalaxyClient;
use crate::error::Result;
use asmflow_core::domain::user::User;

impl GalaxyClient {
    /// Get the user owning the configured API key
    pub async fn get_current_user(&self) -> Result<User> {
        let url = format!("{}/api/users/current", self.base_url);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Check whether the configured API key is accepted by the service
    ///
    /// Any failure (transport, auth, parse) counts as invalid.
    pub async fn validate_api_key(&self) -> bool {
        self.get_current_user().await.is_ok()
    }
}
