//! DRAFTHORSE — concurrent multi-agent R&D proposal drafting engine.
//!
//! Six specialist LLM calls fan out concurrently for one project topic,
//! tolerate individual failures, and their aggregated output feeds a single
//! synthesis call whose result is persisted as a report file.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod fanout;
pub mod glm;
pub mod job;
pub mod orchestrator;
pub mod report;
pub mod specialist;
pub mod synthesis;
pub mod ui;

pub use aggregate::{aggregate, BatchHealth};
pub use fanout::{FanOutCoordinator, SchedulingError};
pub use glm::{GenerationCapability, GlmClient, GlmError};
pub use job::{FinalStatus, JobResult, JobState, Stage};
pub use orchestrator::JobPipeline;
pub use report::{FileReportSink, ReportSink, SinkError};
pub use specialist::{
    FailureReason, Specialist, SpecialistInvoker, TaskOutcome, TaskResult, DEFAULT_CALL_TIMEOUT,
};
pub use synthesis::SynthesisStage;
