//! Full pipeline run command

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::*;

use asmflow_pipeline::{
    AssemblyPipeline, PipelineConfig, RunReport, RunRequest, SelectionPolicy, StepReport,
};

use crate::config::Config;

/// Arguments of the `run` subcommand
#[derive(Args)]
pub struct RunArgs {
    /// Forward reads (R1)
    #[arg(long)]
    r1: PathBuf,

    /// Reverse reads (R2)
    #[arg(long)]
    r2: PathBuf,

    /// Reference genome to deplete against
    #[arg(long)]
    reference: PathBuf,

    /// Display name for the history created for this run
    #[arg(long)]
    name: Option<String>,

    /// Seconds between job status polls
    #[arg(long, default_value_t = 10)]
    poll_interval: u64,

    /// Seconds to wait for any single job before giving up
    #[arg(long, default_value_t = 3600)]
    job_timeout: u64,

    /// How the winner assembly is picked
    #[arg(long, value_enum, default_value = "prefer-greater-n50")]
    policy: PolicyArg,
}

/// Selection policy CLI values
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Strictly greater N50 wins; ties select the second candidate
    PreferGreaterN50,
    /// Greater N50 wins, lower L50 breaks N50 ties
    N50ThenLowerL50,
}

impl From<PolicyArg> for SelectionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PreferGreaterN50 => SelectionPolicy::PreferGreaterN50,
            PolicyArg::N50ThenLowerL50 => SelectionPolicy::N50ThenLowerL50,
        }
    }
}

/// Run the full assembly pipeline and print the report
pub async fn run_pipeline(args: RunArgs, config: &Config) -> Result<()> {
    let mut pipeline_config = PipelineConfig::new(&config.galaxy_url, &config.api_key)
        .with_selection_policy(args.policy.into());
    pipeline_config.poll_interval = Duration::from_secs(args.poll_interval);
    pipeline_config.job_timeout = Duration::from_secs(args.job_timeout);
    pipeline_config.validate()?;

    let client = config.client();
    if !client.validate_api_key().await {
        anyhow::bail!("the configured API key was rejected by the execution service");
    }

    let pipeline = AssemblyPipeline::new(Arc::new(client), pipeline_config);

    let request = RunRequest {
        name: args.name,
        r1: Some(args.r1),
        r2: Some(args.r2),
        reference: Some(args.reference),
    };

    let report = pipeline.run(request).await?;
    print_report(&report);

    Ok(())
}

/// Print the run report
fn print_report(report: &RunReport) {
    println!();
    println!("{}", "Pipeline finished.".green().bold());
    println!("  Run id:  {}", report.run_id.to_string().dimmed());
    println!("  History: {}", report.history_id.cyan());

    println!("\n{}", "Steps:".bold());
    for step in &report.steps {
        print_step(step);
    }

    println!("\n{}", "Assemblies:".bold());
    for candidate in [&report.selection.first, &report.selection.second] {
        let marker = if candidate.label == report.selection.winner().label {
            "★".green()
        } else {
            " ".normal()
        };
        println!(
            "  {} {:<8} N50 {:>8}  L50 {:>4}  contigs {}",
            marker,
            candidate.label,
            candidate.metrics.n50,
            candidate.metrics.l50,
            candidate.contigs.id.dimmed()
        );
    }
    println!(
        "  Winner: {}",
        report.selection.winner().label.green().bold()
    );

    println!("\n{}", "Annotation:".bold());
    print_step(&report.annotation);
}

fn print_step(step: &StepReport) {
    println!(
        "  {} {:<16} job {}",
        "▸".cyan(),
        step.step,
        step.job_id.dimmed()
    );
    let mut outputs: Vec<_> = step.outputs.iter().collect();
    outputs.sort_by(|a, b| a.0.cmp(b.0));
    for (name, output) in outputs {
        println!("      {} = {}", name.cyan(), output.id);
    }
}
