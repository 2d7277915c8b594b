//! Error types for pipeline execution

use std::time::Duration;

use asmflow_client::ClientError;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the assembly pipeline
///
/// Service failures are scoped to the step that issued the call, so an
/// aborted run names where it stopped. Completed work on the service side is
/// never rolled back.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required run input was not provided; raised before any service call
    #[error("required input missing: {name}")]
    MissingInput { name: &'static str },

    /// A service call failed outside any named step (e.g. while polling)
    #[error("execution service error: {0}")]
    Client(#[from] ClientError),

    /// A service call issued by a named step failed
    #[error("step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: ClientError,
    },

    /// A tool submission was accepted but queued no job
    #[error("step '{step}': submission returned no job")]
    NoJobQueued { step: String },

    /// A job reached the error state
    #[error("step '{step}': job {job_id} ended in error state")]
    JobFailed { step: String, job_id: String },

    /// A job did not reach a terminal state before the deadline
    #[error("job {job_id} did not reach a terminal state within {timeout:?}")]
    JobTimeout { job_id: String, timeout: Duration },

    /// A finished job's result map lacks an output the step requires
    #[error("step '{step}': job {job_id} is missing expected output '{name}'")]
    MissingOutput {
        step: String,
        job_id: String,
        name: String,
    },

    /// A step consumed an output its producing step never registered
    #[error("step '{producer}' did not produce required output '{name}'")]
    MissingUpstream { producer: String, name: String },

    /// A rendered parameter does not appear in the tool's declared schema
    #[error("tool {tool_id}: parameter '{name}' is not declared by the tool")]
    UnknownParameter { tool_id: String, name: String },

    /// A downloaded quality report could not be interpreted
    #[error("malformed quality report: {0}")]
    MalformedReport(String),

    /// Reading a downloaded report from disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Scopes an unattributed service error to the named step.
    ///
    /// Errors that already carry context pass through unchanged.
    pub fn with_step(self, step: &str) -> Self {
        match self {
            PipelineError::Client(source) => PipelineError::Step {
                step: step.to_string(),
                source,
            },
            other => other,
        }
    }
}
