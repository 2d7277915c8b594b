//! Asmflow Pipeline
//!
//! The fixed bacterial-assembly pipeline over a Galaxy-compatible execution
//! service: job-completion waiting, declarative step orchestration, assembly
//! quality selection and report parsing.
//!
//! The orchestrator depends on the [`GalaxyApi`](asmflow_client::GalaxyApi)
//! trait, not on the HTTP client, so every stage can be driven against a
//! scripted fake in tests.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod selector;
pub mod tools;
pub mod waiter;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use orchestrator::{AssemblyPipeline, RunReport, RunRequest, StepReport};
pub use selector::{Choice, SelectionOutcome, SelectionPolicy};
pub use waiter::JobWaiter;
