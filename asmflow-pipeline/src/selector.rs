//! Assembly quality selector
//!
//! Runs the assembly-evaluation tool on the two candidate assemblies,
//! extracts their contiguity metrics and picks the winner under an explicit,
//! configurable policy.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use asmflow_client::GalaxyApi;
use asmflow_core::domain::dataset::DatasetRef;
use asmflow_core::domain::job::JobState;
use asmflow_core::domain::metrics::AssemblyMetrics;

use crate::error::{PipelineError, Result};
use crate::report::parse_quast_report;
use crate::tools::{QuastParams, ids, outputs};
use crate::waiter::JobWaiter;

/// How the winner assembly is picked from two candidates.
///
/// The rule is an explicit policy rather than an implicit comparison so the
/// tie behavior is visible and pinned by tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// The historical rule: the first candidate wins exactly when its N50 is
    /// strictly greater; every tie or inversion selects the second candidate.
    /// L50 never changes the outcome under this policy.
    #[default]
    PreferGreaterN50,
    /// Strictly greater N50 wins; an N50 tie falls back to strictly lower
    /// L50; a full tie selects the second candidate.
    N50ThenLowerL50,
}

/// Which of the two candidates a policy selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Choice {
    First,
    Second,
}

impl SelectionPolicy {
    /// Compares two candidates' metrics in argument order.
    pub fn select(self, first: &AssemblyMetrics, second: &AssemblyMetrics) -> Choice {
        match self {
            SelectionPolicy::PreferGreaterN50 => {
                if first.n50 > second.n50 {
                    Choice::First
                } else {
                    Choice::Second
                }
            }
            SelectionPolicy::N50ThenLowerL50 => {
                if first.n50 > second.n50 {
                    Choice::First
                } else if second.n50 > first.n50 {
                    Choice::Second
                } else if first.l50 < second.l50 {
                    Choice::First
                } else {
                    Choice::Second
                }
            }
        }
    }
}

/// A contig dataset awaiting evaluation.
#[derive(Debug, Clone)]
pub struct ContigCandidate {
    /// Short label naming the assembler variant (e.g. "spades")
    pub label: String,
    pub contigs: DatasetRef,
}

/// A candidate with its evaluation job and extracted metrics.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluatedCandidate {
    pub label: String,
    pub contigs: DatasetRef,
    pub evaluation_job: String,
    pub metrics: AssemblyMetrics,
}

/// Result of evaluating and comparing the two candidates.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub first: EvaluatedCandidate,
    pub second: EvaluatedCandidate,
    pub choice: Choice,
}

impl SelectionOutcome {
    pub fn winner(&self) -> &EvaluatedCandidate {
        match self.choice {
            Choice::First => &self.first,
            Choice::Second => &self.second,
        }
    }

    pub fn loser(&self) -> &EvaluatedCandidate {
        match self.choice {
            Choice::First => &self.second,
            Choice::Second => &self.first,
        }
    }
}

/// Evaluates candidate assemblies and picks the winner
pub struct AssemblySelector {
    client: Arc<dyn GalaxyApi>,
    waiter: JobWaiter,
    policy: SelectionPolicy,
}

impl AssemblySelector {
    pub fn new(client: Arc<dyn GalaxyApi>, waiter: JobWaiter, policy: SelectionPolicy) -> Self {
        Self {
            client,
            waiter,
            policy,
        }
    }

    /// Evaluates both candidates and applies the selection policy
    ///
    /// Candidate order matters: ties select the second candidate under every
    /// policy.
    pub async fn select(
        &self,
        history_id: &str,
        first: ContigCandidate,
        second: ContigCandidate,
    ) -> Result<SelectionOutcome> {
        let first = self.evaluate(history_id, first).await?;
        let second = self.evaluate(history_id, second).await?;

        let choice = self.policy.select(&first.metrics, &second.metrics);
        let outcome = SelectionOutcome {
            first,
            second,
            choice,
        };

        info!(
            winner = %outcome.winner().label,
            n50 = outcome.winner().metrics.n50,
            l50 = outcome.winner().metrics.l50,
            "selected winning assembly"
        );

        Ok(outcome)
    }

    /// Runs the evaluation tool on one candidate and parses its report.
    async fn evaluate(
        &self,
        history_id: &str,
        candidate: ContigCandidate,
    ) -> Result<EvaluatedCandidate> {
        let step = format!("evaluate:{}", candidate.label);

        let inputs = QuastParams::for_assembly(candidate.contigs.clone()).into_inputs();
        let response = self
            .client
            .run_tool(history_id, ids::QUAST, inputs)
            .await
            .map_err(|e| PipelineError::from(e).with_step(&step))?;

        let job_id = response
            .jobs
            .first()
            .map(|j| j.id.clone())
            .ok_or_else(|| PipelineError::NoJobQueued { step: step.clone() })?;

        let state = self
            .waiter
            .wait(&job_id)
            .await
            .map_err(|e| e.with_step(&step))?;
        if state == JobState::Error {
            return Err(PipelineError::JobFailed { step, job_id });
        }

        let job = self
            .client
            .show_job(&job_id)
            .await
            .map_err(|e| PipelineError::from(e).with_step(&step))?;

        let report = job
            .output(outputs::QUAST_REPORT_TABULAR)
            .cloned()
            .ok_or_else(|| PipelineError::MissingOutput {
                step: step.clone(),
                job_id: job_id.clone(),
                name: outputs::QUAST_REPORT_TABULAR.to_string(),
            })?;

        // One temp dir per evaluation; concurrent runs never share a path.
        let dir = tempfile::tempdir()?;
        let report_path = dir.path().join(format!("quast_{}.tsv", report.id));
        self.client
            .download_dataset(&report.id, &report_path)
            .await
            .map_err(|e| PipelineError::from(e).with_step(&step))?;

        let text = tokio::fs::read_to_string(&report_path).await?;
        let metrics = parse_quast_report(&text)?;

        Ok(EvaluatedCandidate {
            label: candidate.label,
            contigs: candidate.contigs,
            evaluation_job: job_id,
            metrics,
        })
    }
}
