//! Pipeline configuration
//!
//! An explicit configuration object handed to the orchestrator's constructor;
//! nothing reads service coordinates from globals.

use std::time::Duration;

use crate::selector::SelectionPolicy;

/// Pipeline configuration
///
/// Intervals and the deadline are configurable to allow tuning for different
/// service deployments (a local instance answers in seconds, a public one can
/// queue jobs for hours).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL of the execution service (e.g. "https://usegalaxy.org")
    pub galaxy_url: String,

    /// API key identifying the account on the service
    pub api_key: String,

    /// How often to poll a job's state while waiting for it to finish
    pub poll_interval: Duration,

    /// Maximum time to wait for any single job to reach a terminal state
    pub job_timeout: Duration,

    /// How the winner assembly is picked from the two candidates
    pub selection_policy: SelectionPolicy,

    /// Check rendered tool parameters against the tool's declared schema
    /// before submission
    pub validate_tool_inputs: bool,
}

impl PipelineConfig {
    /// Creates a configuration with defaults for everything but the
    /// service coordinates
    pub fn new(galaxy_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            galaxy_url: galaxy_url.into(),
            api_key: api_key.into(),
            poll_interval: Duration::from_secs(10),
            job_timeout: Duration::from_secs(3600),
            selection_policy: SelectionPolicy::default(),
            validate_tool_inputs: true,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - GALAXY_URL (required)
    /// - GALAXY_API_KEY (required)
    /// - POLL_INTERVAL (optional, seconds, default: 10)
    /// - JOB_TIMEOUT (optional, seconds, default: 3600)
    pub fn from_env() -> anyhow::Result<Self> {
        let galaxy_url = std::env::var("GALAXY_URL")
            .map_err(|_| anyhow::anyhow!("GALAXY_URL environment variable not set"))?;

        let api_key = std::env::var("GALAXY_API_KEY")
            .map_err(|_| anyhow::anyhow!("GALAXY_API_KEY environment variable not set"))?;

        let poll_interval = std::env::var("POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let job_timeout = std::env::var("JOB_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(3600));

        Ok(Self {
            galaxy_url,
            api_key,
            poll_interval,
            job_timeout,
            selection_policy: SelectionPolicy::default(),
            validate_tool_inputs: true,
        })
    }

    /// Sets the selection policy
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.galaxy_url.is_empty() {
            anyhow::bail!("galaxy_url cannot be empty");
        }

        if !self.galaxy_url.starts_with("http://") && !self.galaxy_url.starts_with("https://") {
            anyhow::bail!("galaxy_url must start with http:// or https://");
        }

        if self.api_key.is_empty() {
            anyhow::bail!("api_key cannot be empty");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.job_timeout < self.poll_interval {
            anyhow::bail!("job_timeout must be at least one poll_interval");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intervals() {
        let config = PipelineConfig::new("http://localhost:8080", "key");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.job_timeout, Duration::from_secs(3600));
        assert!(config.validate_tool_inputs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PipelineConfig::new("http://localhost:8080", "key");
        assert!(config.validate().is_ok());

        config.api_key = String::new();
        assert!(config.validate().is_err());
        config.api_key = "key".to_string();

        config.galaxy_url = "not-a-url".to_string();
        assert!(config.validate().is_err());
        config.galaxy_url = "https://usegalaxy.org".to_string();

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.poll_interval = Duration::from_secs(10);

        config.job_timeout = Duration::from_secs(5);
        assert!(config.validate().is_err());

        config.job_timeout = Duration::from_secs(10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_selection_policy() {
        let config = PipelineConfig::new("http://localhost:8080", "key")
            .with_selection_policy(SelectionPolicy::N50ThenLowerL50);
        assert_eq!(config.selection_policy, SelectionPolicy::N50ThenLowerL50);
    }
}
