//! End-to-end pipeline tests against a scripted in-memory execution service.
//!
//! The fake implements `GalaxyApi` and answers every call from local state:
//! jobs reach a configurable terminal state after a configurable number of
//! non-terminal polls, and evaluation reports are generated from per-assembly
//! metrics, so the whole pipeline runs without a network.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use asmflow_client::error::{ClientError, Result as ClientResult};
use asmflow_client::GalaxyApi;
use asmflow_core::domain::dataset::{Dataset, DatasetRef};
use asmflow_core::domain::history::{History, HistoryItem};
use asmflow_core::domain::job::{Job, JobState};
use asmflow_core::domain::user::User;
use asmflow_core::dto::tool::{JobSummary, OutputSummary, ToolRunResponse, ToolSchema};
use asmflow_pipeline::tools::{ids, outputs};
use asmflow_pipeline::{
    AssemblyPipeline, JobWaiter, PipelineConfig, PipelineError, RunRequest, SelectionPolicy,
};

struct FakeJob {
    tool_id: String,
    terminal_state: JobState,
    polls_remaining: u32,
    outputs: HashMap<String, DatasetRef>,
}

#[derive(Default)]
struct FakeState {
    counter: u64,
    /// Chronological log: "submit:<tool_id>", "terminal:<job_id>", ...
    log: Vec<String>,
    jobs: HashMap<String, FakeJob>,
    /// Dataset id -> downloadable content
    downloads: HashMap<String, String>,
    /// Every tool submission: (tool_id, inputs)
    submissions: Vec<(String, serde_json::Value)>,
}

struct FakeGalaxy {
    state: Mutex<FakeState>,
    /// Assembly metrics by contig dataset id, served through evaluation reports
    metrics: HashMap<String, (u64, u64)>,
    /// Number of non-terminal polls every job reports before finishing
    polls_before_terminal: u32,
    /// Jobs of this tool end in the error state
    fail_tool: Option<&'static str>,
    /// Suppress one declared output: (tool id, output name)
    drop_output: Option<(&'static str, &'static str)>,
}

impl FakeGalaxy {
    fn new() -> Self {
        Self::with_metrics((500, 10), (300, 20))
    }

    fn with_metrics(spades: (u64, u64), velvet: (u64, u64)) -> Self {
        let mut metrics = HashMap::new();
        metrics.insert("ds-contigs-spades".to_string(), spades);
        metrics.insert("ds-contigs-velvet".to_string(), velvet);
        Self {
            state: Mutex::new(FakeState::default()),
            metrics,
            polls_before_terminal: 0,
            fail_tool: None,
            drop_output: None,
        }
    }

    fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    fn submissions(&self) -> Vec<(String, serde_json::Value)> {
        self.state.lock().unwrap().submissions.clone()
    }

    fn job_for_tool(&self, tool_id: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .jobs
            .iter()
            .find(|(_, job)| job.tool_id == tool_id)
            .map(|(id, _)| id.clone())
    }

    /// Registers a job directly, for waiter-only tests.
    fn script_job(&self, job_id: &str, terminal_state: JobState, polls_before_terminal: u32) {
        let mut state = self.state.lock().unwrap();
        state.jobs.insert(
            job_id.to_string(),
            FakeJob {
                tool_id: "scripted".to_string(),
                terminal_state,
                polls_remaining: polls_before_terminal,
                outputs: HashMap::new(),
            },
        );
    }

    fn show_job_calls(&self, job_id: &str) -> usize {
        let needle = format!("poll:{job_id}");
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|entry| **entry == needle)
            .count()
    }

    fn queue_job(
        &self,
        state: &mut FakeState,
        tool_id: &str,
        outputs: HashMap<String, DatasetRef>,
    ) -> String {
        state.counter += 1;
        let job_id = format!("job-{}", state.counter);

        let terminal_state = if self.fail_tool == Some(tool_id) {
            JobState::Error
        } else {
            JobState::Ok
        };

        state.jobs.insert(
            job_id.clone(),
            FakeJob {
                tool_id: tool_id.to_string(),
                terminal_state,
                polls_remaining: self.polls_before_terminal,
                outputs,
            },
        );

        job_id
    }

    fn dataset(state: &mut FakeState) -> DatasetRef {
        state.counter += 1;
        DatasetRef::hda(format!("ds-{}", state.counter))
    }

    fn tool_outputs(
        &self,
        state: &mut FakeState,
        tool_id: &str,
        inputs: &serde_json::Value,
    ) -> ClientResult<HashMap<String, DatasetRef>> {
        let mut map = HashMap::new();

        match tool_id {
            ids::FASTQC => {
                map.insert(outputs::FASTQC_HTML.to_string(), Self::dataset(state));
                map.insert(outputs::FASTQC_TEXT.to_string(), Self::dataset(state));
            }
            ids::BOWTIE2 => {
                map.insert(
                    outputs::BOWTIE2_UNALIGNED_L.to_string(),
                    DatasetRef::hda("ds-unaligned-l"),
                );
                map.insert(
                    outputs::BOWTIE2_UNALIGNED_R.to_string(),
                    DatasetRef::hda("ds-unaligned-r"),
                );
            }
            ids::TRIMMOMATIC => {
                map.insert(
                    outputs::TRIMMOMATIC_R1_PAIRED.to_string(),
                    DatasetRef::hda("ds-trim-r1"),
                );
                map.insert(
                    outputs::TRIMMOMATIC_R2_PAIRED.to_string(),
                    DatasetRef::hda("ds-trim-r2"),
                );
            }
            ids::SPADES => {
                map.insert(
                    outputs::SPADES_CONTIGS.to_string(),
                    DatasetRef::hda("ds-contigs-spades"),
                );
            }
            ids::VELVET => {
                map.insert(
                    outputs::VELVET_CONTIGS.to_string(),
                    DatasetRef::hda("ds-contigs-velvet"),
                );
            }
            ids::QUAST => {
                let contig_id = inputs["in|inputs"][0]["id"]
                    .as_str()
                    .ok_or_else(|| ClientError::InvalidRequest("no assembly input".into()))?
                    .to_string();
                let (n50, l50) = self
                    .metrics
                    .get(&contig_id)
                    .copied()
                    .ok_or_else(|| ClientError::api_error(404, "unknown assembly"))?;

                let report_id = format!("ds-quast-{contig_id}");
                state.downloads.insert(
                    report_id.clone(),
                    format!("Assembly\tcontigs\nN50\t{n50}\nL50\t{l50}\nGC (%)\t50.1\n"),
                );
                map.insert(
                    outputs::QUAST_REPORT_TABULAR.to_string(),
                    DatasetRef::hda(report_id),
                );
            }
            ids::PROKKA => {
                map.insert(outputs::PROKKA_GFF.to_string(), Self::dataset(state));
                map.insert(outputs::PROKKA_FNA.to_string(), Self::dataset(state));
                map.insert(outputs::PROKKA_FAA.to_string(), Self::dataset(state));
            }
            other => {
                return Err(ClientError::api_error(404, format!("unknown tool {other}")));
            }
        }

        if let Some((tool, name)) = self.drop_output
            && tool == tool_id
        {
            map.remove(name);
        }

        Ok(map)
    }
}

#[async_trait]
impl GalaxyApi for FakeGalaxy {
    async fn create_history(&self, name: &str) -> ClientResult<History> {
        let mut state = self.state.lock().unwrap();
        state.log.push("create-history".to_string());
        Ok(History {
            id: "hist-1".to_string(),
            name: name.to_string(),
            deleted: false,
            count: None,
            update_time: None,
        })
    }

    async fn get_histories(&self) -> ClientResult<Vec<History>> {
        Ok(vec![])
    }

    async fn show_history_contents(&self, _history_id: &str) -> ClientResult<Vec<HistoryItem>> {
        Ok(vec![])
    }

    async fn upload_file(
        &self,
        _path: &Path,
        _history_id: &str,
        file_name: &str,
    ) -> ClientResult<ToolRunResponse> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("upload:{file_name}"));

        state.counter += 1;
        let dataset_id = format!("ds-upload-{file_name}");
        let job_id = self.queue_job(&mut state, "upload1", HashMap::new());

        Ok(ToolRunResponse {
            outputs: vec![OutputSummary {
                id: dataset_id,
                name: Some(file_name.to_string()),
                output_name: None,
            }],
            jobs: vec![JobSummary {
                id: job_id,
                state: JobState::Queued,
            }],
        })
    }

    async fn run_tool(
        &self,
        _history_id: &str,
        tool_id: &str,
        inputs: serde_json::Value,
    ) -> ClientResult<ToolRunResponse> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("submit:{tool_id}"));

        let job_outputs = self.tool_outputs(&mut state, tool_id, &inputs)?;
        state
            .submissions
            .push((tool_id.to_string(), inputs.clone()));
        let job_id = self.queue_job(&mut state, tool_id, job_outputs);

        Ok(ToolRunResponse {
            outputs: vec![],
            jobs: vec![JobSummary {
                id: job_id,
                state: JobState::Queued,
            }],
        })
    }

    async fn show_job(&self, job_id: &str) -> ClientResult<Job> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("poll:{job_id}"));

        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| ClientError::api_error(404, "unknown job"))?;

        let (job_state, job_outputs) = if job.polls_remaining > 0 {
            job.polls_remaining -= 1;
            (JobState::Running, HashMap::new())
        } else {
            (job.terminal_state, job.outputs.clone())
        };
        let tool_id = job.tool_id.clone();

        if job_state.is_terminal() {
            state.log.push(format!("terminal:{job_id}"));
        }

        Ok(Job {
            id: job_id.to_string(),
            tool_id: Some(tool_id),
            state: job_state,
            exit_code: None,
            create_time: None,
            update_time: None,
            outputs: job_outputs,
        })
    }

    async fn get_history_jobs(&self, _history_id: &str) -> ClientResult<Vec<Job>> {
        Ok(vec![])
    }

    async fn show_dataset(&self, dataset_id: &str) -> ClientResult<Dataset> {
        Ok(Dataset {
            id: dataset_id.to_string(),
            name: dataset_id.to_string(),
            state: Some("ok".to_string()),
            extension: None,
            file_size: None,
            history_id: None,
        })
    }

    async fn download_dataset(&self, dataset_id: &str, dest: &Path) -> ClientResult<u64> {
        let content = {
            let state = self.state.lock().unwrap();
            state
                .downloads
                .get(dataset_id)
                .cloned()
                .ok_or_else(|| ClientError::api_error(404, "no content for dataset"))?
        };
        tokio::fs::write(dest, &content).await?;
        Ok(content.len() as u64)
    }

    async fn show_tool(&self, tool_id: &str) -> ClientResult<ToolSchema> {
        Ok(ToolSchema {
            id: tool_id.to_string(),
            name: None,
            version: None,
            inputs: vec![],
        })
    }

    async fn get_current_user(&self) -> ClientResult<User> {
        Ok(User {
            id: "user-1".to_string(),
            email: None,
            username: None,
        })
    }
}

fn test_config() -> PipelineConfig {
    PipelineConfig::new("http://fake", "key")
}

fn full_request() -> RunRequest {
    RunRequest {
        name: Some("test run".to_string()),
        r1: Some(PathBuf::from("reads_R1.fastq.gz")),
        r2: Some(PathBuf::from("reads_R2.fastq.gz")),
        reference: Some(PathBuf::from("reference.fasta")),
    }
}

fn pipeline(fake: std::sync::Arc<FakeGalaxy>) -> AssemblyPipeline {
    AssemblyPipeline::new(fake, test_config())
}

#[tokio::test(start_paused = true)]
async fn full_run_annotates_the_spades_assembly_when_it_scores_better() {
    let fake = std::sync::Arc::new(FakeGalaxy::new());
    let report = pipeline(fake.clone()).run(full_request()).await.unwrap();

    assert_eq!(report.history_id, "hist-1");
    assert_eq!(report.selection.winner().label, "spades");
    assert_eq!(report.winning_contigs().id, "ds-contigs-spades");
    assert_eq!(report.selection.winner().metrics.n50, 500);
    assert_eq!(report.selection.loser().metrics.l50, 20);

    // Exactly one gene-prediction job, keyed to the winning contig dataset.
    let prokka: Vec<_> = fake
        .submissions()
        .into_iter()
        .filter(|(tool, _)| tool == ids::PROKKA)
        .collect();
    assert_eq!(prokka.len(), 1);
    assert_eq!(prokka[0].1["input"]["id"], "ds-contigs-spades");

    assert!(report.annotation.outputs.contains_key(outputs::PROKKA_GFF));
}

#[tokio::test(start_paused = true)]
async fn n50_tie_selects_the_second_assembler() {
    // Same N50; the first candidate even has the better L50. The policy
    // still selects the second candidate.
    let fake = std::sync::Arc::new(FakeGalaxy::with_metrics((400, 5), (400, 50)));
    let report = pipeline(fake.clone()).run(full_request()).await.unwrap();

    assert_eq!(report.selection.winner().label, "velvet");
    let prokka: Vec<_> = fake
        .submissions()
        .into_iter()
        .filter(|(tool, _)| tool == ids::PROKKA)
        .collect();
    assert_eq!(prokka[0].1["input"]["id"], "ds-contigs-velvet");
}

#[tokio::test(start_paused = true)]
async fn l50_tiebreak_policy_can_flip_the_tie() {
    let fake = std::sync::Arc::new(FakeGalaxy::with_metrics((400, 5), (400, 50)));
    let config = test_config().with_selection_policy(SelectionPolicy::N50ThenLowerL50);
    let report = AssemblyPipeline::new(fake, config)
        .run(full_request())
        .await
        .unwrap();

    assert_eq!(report.selection.winner().label, "spades");
}

#[tokio::test(start_paused = true)]
async fn trimming_starts_after_alignment_terminates_and_consumes_unaligned_outputs() {
    let mut fake = FakeGalaxy::new();
    fake.polls_before_terminal = 2;
    let fake = std::sync::Arc::new(fake);

    pipeline(fake.clone()).run(full_request()).await.unwrap();

    let align_job = fake.job_for_tool(ids::BOWTIE2).unwrap();
    let log = fake.log();
    let terminal_idx = log
        .iter()
        .position(|e| *e == format!("terminal:{align_job}"))
        .unwrap();
    let trim_idx = log
        .iter()
        .position(|e| *e == format!("submit:{}", ids::TRIMMOMATIC))
        .unwrap();
    assert!(
        terminal_idx < trim_idx,
        "trimming was submitted before alignment terminated"
    );

    let (_, trim_inputs) = fake
        .submissions()
        .into_iter()
        .find(|(tool, _)| tool == ids::TRIMMOMATIC)
        .unwrap();
    assert_eq!(trim_inputs["readtype|fastq_r1_in"]["id"], "ds-unaligned-l");
    assert_eq!(trim_inputs["readtype|fastq_r2_in"]["id"], "ds-unaligned-r");
}

#[tokio::test(start_paused = true)]
async fn missing_reference_short_circuits_before_any_service_call() {
    let fake = std::sync::Arc::new(FakeGalaxy::new());
    let request = RunRequest {
        reference: None,
        ..full_request()
    };

    let err = pipeline(fake.clone()).run(request).await.unwrap_err();

    match err {
        PipelineError::MissingInput { name } => assert_eq!(name, "reference"),
        other => panic!("expected missing-input error, got {other:?}"),
    }
    assert!(fake.log().is_empty(), "service was called before validation");
}

#[tokio::test(start_paused = true)]
async fn failing_job_aborts_with_a_step_scoped_error() {
    let mut fake = FakeGalaxy::new();
    fake.fail_tool = Some(ids::TRIMMOMATIC);
    let fake = std::sync::Arc::new(fake);

    let err = pipeline(fake.clone()).run(full_request()).await.unwrap_err();

    match err {
        PipelineError::JobFailed { step, .. } => assert_eq!(step, "trim"),
        other => panic!("expected job-failed error, got {other:?}"),
    }

    // Nothing downstream of the failed step was submitted.
    let log = fake.log();
    assert!(!log.contains(&format!("submit:{}", ids::SPADES)));
    assert!(!log.contains(&format!("submit:{}", ids::PROKKA)));
}

#[tokio::test(start_paused = true)]
async fn missing_expected_output_is_a_typed_error() {
    let mut fake = FakeGalaxy::new();
    fake.drop_output = Some((ids::BOWTIE2, outputs::BOWTIE2_UNALIGNED_R));
    let fake = std::sync::Arc::new(fake);

    let err = pipeline(fake.clone()).run(full_request()).await.unwrap_err();

    match err {
        PipelineError::MissingOutput { step, name, .. } => {
            assert_eq!(step, "align");
            assert_eq!(name, outputs::BOWTIE2_UNALIGNED_R);
        }
        other => panic!("expected missing-output error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn waiter_repolls_until_terminal_state() {
    let fake = std::sync::Arc::new(FakeGalaxy::new());
    fake.script_job("job-w", JobState::Ok, 5);

    let waiter = JobWaiter::new(
        fake.clone(),
        Duration::from_secs(10),
        Duration::from_secs(3600),
    );
    let state = waiter.wait("job-w").await.unwrap();

    assert_eq!(state, JobState::Ok);
    // Five non-terminal polls, then the terminal one.
    assert_eq!(fake.show_job_calls("job-w"), 6);
}

#[tokio::test(start_paused = true)]
async fn waiter_times_out_on_a_stuck_job() {
    let fake = std::sync::Arc::new(FakeGalaxy::new());
    fake.script_job("job-stuck", JobState::Ok, u32::MAX);

    let waiter = JobWaiter::new(
        fake.clone(),
        Duration::from_secs(10),
        Duration::from_secs(60),
    );
    let err = waiter.wait("job-stuck").await.unwrap_err();

    match err {
        PipelineError::JobTimeout { job_id, .. } => assert_eq!(job_id, "job-stuck"),
        other => panic!("expected timeout error, got {other:?}"),
    }
}
