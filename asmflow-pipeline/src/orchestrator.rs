//! Pipeline orchestrator
//!
//! Drives the fixed assembly pipeline against the execution service:
//! upload, raw quality control, alignment, trimming of the unaligned reads,
//! trimmed quality control, two assembler variants, winner selection and
//! gene prediction.
//!
//! The tool steps are a declarative table (tool id, input binding, expected
//! output names) interpreted by one runner, so pipeline variants are data
//! rather than duplicated control flow. Every submission blocks on the
//! [`JobWaiter`](crate::waiter::JobWaiter) before its outputs are read.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use asmflow_client::{ClientError, GalaxyApi};
use asmflow_core::domain::dataset::DatasetRef;
use asmflow_core::domain::job::JobState;
use asmflow_core::dto::tool::ToolSchema;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::selector::{AssemblySelector, ContigCandidate, SelectionOutcome};
use crate::tools::{
    self, Bowtie2Params, FastqcParams, ProkkaParams, SpadesParams, TrimmomaticParams, VelvetParams,
    ids, outputs,
};
use crate::waiter::JobWaiter;

/// Inputs of one pipeline run.
///
/// All three datasets are required; validation happens before the first
/// service call so an incomplete request never creates remote state.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Display name for the history; generated from the run id when absent
    pub name: Option<String>,
    /// Forward reads (R1)
    pub r1: Option<PathBuf>,
    /// Reverse reads (R2)
    pub r2: Option<PathBuf>,
    /// Reference genome to deplete against
    pub reference: Option<PathBuf>,
}

struct ValidatedRun {
    name: Option<String>,
    r1: PathBuf,
    r2: PathBuf,
    reference: PathBuf,
}

impl RunRequest {
    fn validated(self) -> Result<ValidatedRun> {
        let r1 = self.r1.ok_or(PipelineError::MissingInput { name: "r1" })?;
        let r2 = self.r2.ok_or(PipelineError::MissingInput { name: "r2" })?;
        let reference = self
            .reference
            .ok_or(PipelineError::MissingInput { name: "reference" })?;

        Ok(ValidatedRun {
            name: self.name,
            r1,
            r2,
            reference,
        })
    }
}

/// One completed step in the run report.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    pub job_id: String,
    pub outputs: HashMap<String, DatasetRef>,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub history_id: String,
    pub steps: Vec<StepReport>,
    pub selection: SelectionOutcome,
    pub annotation: StepReport,
}

impl RunReport {
    /// The contig dataset the annotation step ran on.
    pub fn winning_contigs(&self) -> &DatasetRef {
        &self.selection.winner().contigs
    }
}

/// Job id and extracted outputs of a finished step.
#[derive(Debug, Clone)]
struct CompletedStep {
    job_id: String,
    outputs: HashMap<String, DatasetRef>,
}

/// Dataset references visible to step input binders.
struct StepContext {
    r1: DatasetRef,
    r2: DatasetRef,
    reference: DatasetRef,
    completed: HashMap<&'static str, CompletedStep>,
}

impl StepContext {
    fn output(&self, producer: &'static str, name: &str) -> Result<DatasetRef> {
        let step = self
            .completed
            .get(producer)
            .ok_or_else(|| PipelineError::MissingUpstream {
                producer: producer.to_string(),
                name: name.to_string(),
            })?;

        step.outputs
            .get(name)
            .cloned()
            .ok_or_else(|| PipelineError::MissingOutput {
                step: producer.to_string(),
                job_id: step.job_id.clone(),
                name: name.to_string(),
            })
    }
}

/// One entry of the declarative step table.
struct StepSpec {
    key: &'static str,
    tool_id: &'static str,
    expect: &'static [&'static str],
    build: fn(&StepContext) -> Result<serde_json::Value>,
}

const QC_RAW_R1: StepSpec = StepSpec {
    key: "qc-raw-r1",
    tool_id: ids::FASTQC,
    expect: &[outputs::FASTQC_HTML, outputs::FASTQC_TEXT],
    build: |ctx| {
        Ok(FastqcParams {
            input: ctx.r1.clone(),
        }
        .into_inputs())
    },
};

const QC_RAW_R2: StepSpec = StepSpec {
    key: "qc-raw-r2",
    tool_id: ids::FASTQC,
    expect: &[outputs::FASTQC_HTML, outputs::FASTQC_TEXT],
    build: |ctx| {
        Ok(FastqcParams {
            input: ctx.r2.clone(),
        }
        .into_inputs())
    },
};

const ALIGN: StepSpec = StepSpec {
    key: "align",
    tool_id: ids::BOWTIE2,
    expect: &[outputs::BOWTIE2_UNALIGNED_L, outputs::BOWTIE2_UNALIGNED_R],
    build: |ctx| {
        Ok(Bowtie2Params {
            r1: ctx.r1.clone(),
            r2: ctx.r2.clone(),
            reference: ctx.reference.clone(),
        }
        .into_inputs())
    },
};

const TRIM: StepSpec = StepSpec {
    key: "trim",
    tool_id: ids::TRIMMOMATIC,
    expect: &[
        outputs::TRIMMOMATIC_R1_PAIRED,
        outputs::TRIMMOMATIC_R2_PAIRED,
    ],
    build: |ctx| {
        let unaligned_l = ctx.output(ALIGN.key, outputs::BOWTIE2_UNALIGNED_L)?;
        let unaligned_r = ctx.output(ALIGN.key, outputs::BOWTIE2_UNALIGNED_R)?;
        Ok(TrimmomaticParams::paired(unaligned_l, unaligned_r).into_inputs())
    },
};

const QC_TRIMMED_R1: StepSpec = StepSpec {
    key: "qc-trimmed-r1",
    tool_id: ids::FASTQC,
    expect: &[outputs::FASTQC_HTML, outputs::FASTQC_TEXT],
    build: |ctx| {
        let input = ctx.output(TRIM.key, outputs::TRIMMOMATIC_R1_PAIRED)?;
        Ok(FastqcParams { input }.into_inputs())
    },
};

const QC_TRIMMED_R2: StepSpec = StepSpec {
    key: "qc-trimmed-r2",
    tool_id: ids::FASTQC,
    expect: &[outputs::FASTQC_HTML, outputs::FASTQC_TEXT],
    build: |ctx| {
        let input = ctx.output(TRIM.key, outputs::TRIMMOMATIC_R2_PAIRED)?;
        Ok(FastqcParams { input }.into_inputs())
    },
};

const ASSEMBLE_SPADES: StepSpec = StepSpec {
    key: "assemble-spades",
    tool_id: ids::SPADES,
    expect: &[outputs::SPADES_CONTIGS],
    build: |ctx| {
        let r1 = ctx.output(TRIM.key, outputs::TRIMMOMATIC_R1_PAIRED)?;
        let r2 = ctx.output(TRIM.key, outputs::TRIMMOMATIC_R2_PAIRED)?;
        Ok(SpadesParams::paired(r1, r2).into_inputs())
    },
};

const ASSEMBLE_VELVET: StepSpec = StepSpec {
    key: "assemble-velvet",
    tool_id: ids::VELVET,
    expect: &[outputs::VELVET_CONTIGS],
    build: |ctx| {
        let r1 = ctx.output(TRIM.key, outputs::TRIMMOMATIC_R1_PAIRED)?;
        let r2 = ctx.output(TRIM.key, outputs::TRIMMOMATIC_R2_PAIRED)?;
        Ok(VelvetParams::paired(r1, r2).into_inputs())
    },
};

/// Drives the fixed assembly pipeline
pub struct AssemblyPipeline {
    client: Arc<dyn GalaxyApi>,
    config: PipelineConfig,
    waiter: JobWaiter,
    selector: AssemblySelector,
    schemas: Mutex<HashMap<String, ToolSchema>>,
}

impl AssemblyPipeline {
    /// Creates a pipeline bound to one service client and configuration
    pub fn new(client: Arc<dyn GalaxyApi>, config: PipelineConfig) -> Self {
        let waiter = JobWaiter::new(
            Arc::clone(&client),
            config.poll_interval,
            config.job_timeout,
        );
        let selector = AssemblySelector::new(
            Arc::clone(&client),
            JobWaiter::new(
                Arc::clone(&client),
                config.poll_interval,
                config.job_timeout,
            ),
            config.selection_policy,
        );

        Self {
            client,
            config,
            waiter,
            selector,
            schemas: Mutex::new(HashMap::new()),
        }
    }

    /// Executes the full pipeline and returns the run report
    ///
    /// Aborts on the first failing step; work already completed on the
    /// service is left as-is.
    pub async fn run(&self, request: RunRequest) -> Result<RunReport> {
        let run = request.validated()?;

        let run_id = Uuid::new_v4();
        let name = run
            .name
            .clone()
            .unwrap_or_else(|| format!("assembly-run-{run_id}"));

        info!(%run_id, %name, "starting assembly pipeline");

        let history = self
            .client
            .create_history(&name)
            .await
            .map_err(|e| PipelineError::from(e).with_step("create-history"))?;
        let history_id = history.id;

        let mut steps = Vec::new();

        let (r1, up1) = self.upload_input(&history_id, &run.r1, "r1").await?;
        let (r2, up2) = self.upload_input(&history_id, &run.r2, "r2").await?;
        let (reference, up3) = self
            .upload_input(&history_id, &run.reference, "reference")
            .await?;
        steps.extend([up1, up2, up3]);

        let mut ctx = StepContext {
            r1,
            r2,
            reference,
            completed: HashMap::new(),
        };

        // The raw QC pair has no data dependency; run it concurrently and
        // await both before anything downstream.
        let (qc_r1, qc_r2) = tokio::join!(
            self.run_spec(&QC_RAW_R1, &history_id, &ctx),
            self.run_spec(&QC_RAW_R2, &history_id, &ctx),
        );
        record(&mut ctx, &mut steps, &QC_RAW_R1, qc_r1?);
        record(&mut ctx, &mut steps, &QC_RAW_R2, qc_r2?);

        for spec in [&ALIGN, &TRIM] {
            let done = self.run_spec(spec, &history_id, &ctx).await?;
            record(&mut ctx, &mut steps, spec, done);
        }

        let (qc_t1, qc_t2) = tokio::join!(
            self.run_spec(&QC_TRIMMED_R1, &history_id, &ctx),
            self.run_spec(&QC_TRIMMED_R2, &history_id, &ctx),
        );
        record(&mut ctx, &mut steps, &QC_TRIMMED_R1, qc_t1?);
        record(&mut ctx, &mut steps, &QC_TRIMMED_R2, qc_t2?);

        for spec in [&ASSEMBLE_SPADES, &ASSEMBLE_VELVET] {
            let done = self.run_spec(spec, &history_id, &ctx).await?;
            record(&mut ctx, &mut steps, spec, done);
        }

        let spades = ContigCandidate {
            label: "spades".to_string(),
            contigs: ctx.output(ASSEMBLE_SPADES.key, outputs::SPADES_CONTIGS)?,
        };
        let velvet = ContigCandidate {
            label: "velvet".to_string(),
            contigs: ctx.output(ASSEMBLE_VELVET.key, outputs::VELVET_CONTIGS)?,
        };

        let selection = self.selector.select(&history_id, spades, velvet).await?;

        let annotation = self
            .run_tool_step(
                "annotate",
                ids::PROKKA,
                ProkkaParams::bacterial(selection.winner().contigs.clone()).into_inputs(),
                &history_id,
                &[outputs::PROKKA_GFF, outputs::PROKKA_FNA, outputs::PROKKA_FAA],
            )
            .await?;
        let annotation = StepReport {
            step: "annotate".to_string(),
            job_id: annotation.job_id,
            outputs: annotation.outputs,
        };

        info!(%run_id, %history_id, winner = %selection.winner().label, "pipeline finished");

        Ok(RunReport {
            run_id,
            history_id,
            steps,
            selection,
            annotation,
        })
    }

    /// Uploads one input file and waits for its upload job to finish.
    async fn upload_input(
        &self,
        history_id: &str,
        path: &Path,
        role: &'static str,
    ) -> Result<(DatasetRef, StepReport)> {
        let step = format!("upload:{role}");
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| role.to_string());

        info!(%step, file = %path.display(), "uploading input");

        let response = self
            .client
            .upload_file(path, history_id, &file_name)
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

        let output = response
            .outputs
            .first()
            .map(|o| DatasetRef::hda(o.id.clone()))
            .ok_or_else(|| PipelineError::Step {
                step: step.clone(),
                source: ClientError::ParseError("upload returned no output dataset".to_string()),
            })?;

        let report = StepReport {
            step,
            job_id,
            outputs: HashMap::from([("output".to_string(), output.clone())]),
        };

        Ok((output, report))
    }

    /// Binds a table entry's inputs from the context and runs it.
    async fn run_spec(
        &self,
        spec: &StepSpec,
        history_id: &str,
        ctx: &StepContext,
    ) -> Result<CompletedStep> {
        let inputs = (spec.build)(ctx)?;
        self.run_tool_step(spec.key, spec.tool_id, inputs, history_id, spec.expect)
            .await
    }

    /// Submits one tool invocation, waits for it and extracts its outputs.
    async fn run_tool_step(
        &self,
        step: &str,
        tool_id: &str,
        inputs: serde_json::Value,
        history_id: &str,
        expect: &[&str],
    ) -> Result<CompletedStep> {
        if self.config.validate_tool_inputs {
            let schema = self
                .tool_schema(tool_id)
                .await
                .map_err(|e| PipelineError::from(e).with_step(step))?;
            tools::validate_inputs(tool_id, &inputs, &schema)?;
        }

        info!(step, tool_id, "submitting step");

        let response = self
            .client
            .run_tool(history_id, tool_id, inputs)
            .await
            .map_err(|e| PipelineError::from(e).with_step(step))?;

        let job_id = response
            .jobs
            .first()
            .map(|j| j.id.clone())
            .ok_or_else(|| PipelineError::NoJobQueued {
                step: step.to_string(),
            })?;

        let state = self
            .waiter
            .wait(&job_id)
            .await
            .map_err(|e| e.with_step(step))?;
        if state == JobState::Error {
            return Err(PipelineError::JobFailed {
                step: step.to_string(),
                job_id,
            });
        }

        let job = self
            .client
            .show_job(&job_id)
            .await
            .map_err(|e| PipelineError::from(e).with_step(step))?;

        let mut extracted = HashMap::new();
        for name in expect {
            let output = job
                .output(name)
                .cloned()
                .ok_or_else(|| PipelineError::MissingOutput {
                    step: step.to_string(),
                    job_id: job_id.clone(),
                    name: name.to_string(),
                })?;
            extracted.insert(name.to_string(), output);
        }

        info!(step, %job_id, "step finished");

        Ok(CompletedStep {
            job_id,
            outputs: extracted,
        })
    }

    /// Fetches a tool's schema once and caches it for the run.
    async fn tool_schema(&self, tool_id: &str) -> std::result::Result<ToolSchema, ClientError> {
        let cached = self
            .schemas
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(tool_id)
            .cloned();
        if let Some(schema) = cached {
            return Ok(schema);
        }

        let schema = self.client.show_tool(tool_id).await?;
        self.schemas
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(tool_id.to_string(), schema.clone());

        Ok(schema)
    }
}

fn record(
    ctx: &mut StepContext,
    steps: &mut Vec<StepReport>,
    spec: &StepSpec,
    done: CompletedStep,
) {
    steps.push(StepReport {
        step: spec.key.to_string(),
        job_id: done.job_id.clone(),
        outputs: done.outputs.clone(),
    });
    ctx.completed.insert(spec.key, done);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_request_requires_reference() {
        let request = RunRequest {
            r1: Some(PathBuf::from("r1.fastq")),
            r2: Some(PathBuf::from("r2.fastq")),
            ..Default::default()
        };

        match request.validated() {
            Err(PipelineError::MissingInput { name }) => assert_eq!(name, "reference"),
            other => panic!("expected missing-input error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_run_request_reports_first_missing_input() {
        match RunRequest::default().validated() {
            Err(PipelineError::MissingInput { name }) => assert_eq!(name, "r1"),
            other => panic!("expected missing-input error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_trim_binds_alignment_outputs() {
        let mut ctx = StepContext {
            r1: DatasetRef::hda("u1"),
            r2: DatasetRef::hda("u2"),
            reference: DatasetRef::hda("u3"),
            completed: HashMap::new(),
        };
        ctx.completed.insert(
            ALIGN.key,
            CompletedStep {
                job_id: "j-align".to_string(),
                outputs: HashMap::from([
                    (
                        outputs::BOWTIE2_UNALIGNED_L.to_string(),
                        DatasetRef::hda("ul"),
                    ),
                    (
                        outputs::BOWTIE2_UNALIGNED_R.to_string(),
                        DatasetRef::hda("ur"),
                    ),
                ]),
            },
        );

        let inputs = (TRIM.build)(&ctx).unwrap();
        assert_eq!(inputs["readtype|fastq_r1_in"]["id"], "ul");
        assert_eq!(inputs["readtype|fastq_r2_in"]["id"], "ur");
    }

    #[test]
    fn test_trim_without_alignment_is_an_error() {
        let ctx = StepContext {
            r1: DatasetRef::hda("u1"),
            r2: DatasetRef::hda("u2"),
            reference: DatasetRef::hda("u3"),
            completed: HashMap::new(),
        };

        match (TRIM.build)(&ctx) {
            Err(PipelineError::MissingUpstream { producer, .. }) => assert_eq!(producer, "align"),
            other => panic!("expected missing-upstream error, got {:?}", other.map(|_| ())),
        }
    }
}
