//! History DTOs

use serde::{Deserialize, Serialize};

/// Request to create a new history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHistoryRequest {
    pub name: String,
}
