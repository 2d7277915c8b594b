//! User domain types

use serde::{Deserialize, Serialize};

/// The user owning the API key, as reported by the current-user endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}
