//! Job-completion waiter
//!
//! Polls a job's state at a fixed interval until the service reports a
//! terminal state. Every blocking point is an `.await`, so callers cancel a
//! wait by dropping the future.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, info};

use asmflow_client::GalaxyApi;
use asmflow_core::domain::job::JobState;

use crate::error::{PipelineError, Result};

/// Waits for jobs on the execution service to finish
///
/// The wait is bounded by a deadline; a job the service never finishes
/// surfaces as a timeout error instead of blocking the caller forever.
pub struct JobWaiter {
    client: Arc<dyn GalaxyApi>,
    poll_interval: Duration,
    job_timeout: Duration,
}

impl JobWaiter {
    /// Creates a waiter polling at `poll_interval` with a per-job deadline of
    /// `job_timeout`
    pub fn new(client: Arc<dyn GalaxyApi>, poll_interval: Duration, job_timeout: Duration) -> Self {
        Self {
            client,
            poll_interval,
            job_timeout,
        }
    }

    /// Polls the job until it reaches a terminal state and returns that state
    ///
    /// Returns only on `Ok` or `Error`; every other reported state re-polls
    /// after one interval. The caller re-fetches full job details afterwards
    /// to read outputs.
    pub async fn wait(&self, job_id: &str) -> Result<JobState> {
        let deadline = Instant::now() + self.job_timeout;
        let mut interval = time::interval(self.poll_interval);

        loop {
            interval.tick().await;

            let job = self.client.show_job(job_id).await?;

            if job.state.is_terminal() {
                info!(job_id, state = %job.state, "job finished");
                return Ok(job.state);
            }

            debug!(job_id, state = %job.state, "job still pending");

            if Instant::now() >= deadline {
                return Err(PipelineError::JobTimeout {
                    job_id: job_id.to_string(),
                    timeout: self.job_timeout,
                });
            }
        }
    }
}
