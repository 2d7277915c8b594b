//! Configuration module
//!
//! CLI configuration: the execution service coordinates shared by every
//! subcommand.

use asmflow_client::GalaxyClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the execution service
    pub galaxy_url: String,
    /// API key for the execution service
    pub api_key: String,
}

impl Config {
    /// Builds a client for the configured service.
    pub fn client(&self) -> GalaxyClient {
        GalaxyClient::new(&self.galaxy_url, &self.api_key)
    }
}
