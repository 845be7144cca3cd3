//! Top-level pipeline driving one drafting job through fan-out, aggregation,
//! synthesis and persistence.
//!
//! Specialist failures are never fatal here: they flow into aggregation as a
//! partially failed batch and at worst downgrade the result to
//! `partial_success`. A scheduling, synthesis or persistence failure ends the
//! job with `error`. Nothing is retried; retry policy belongs to the caller.

use std::sync::Arc;
use std::time::Duration;

use crate::aggregate::{aggregate, failed_specialists, BatchHealth};
use crate::fanout::FanOutCoordinator;
use crate::glm::GenerationCapability;
use crate::job::{FinalStatus, JobResult, JobState, Stage};
use crate::report::ReportSink;
use crate::specialist::{Specialist, SpecialistInvoker, TaskResult};
use crate::synthesis::SynthesisStage;

pub struct JobPipeline {
    fanout: FanOutCoordinator,
    synthesis: SynthesisStage,
    sink: Arc<dyn ReportSink>,
}

impl JobPipeline {
    pub fn new(
        capability: Arc<dyn GenerationCapability>,
        sink: Arc<dyn ReportSink>,
        call_timeout: Duration,
        job_deadline: Option<Duration>,
    ) -> Self {
        let invoker = SpecialistInvoker::new(capability.clone());
        Self {
            fanout: FanOutCoordinator::new(invoker, call_timeout)
                .with_job_deadline(job_deadline),
            synthesis: SynthesisStage::new(capability, call_timeout),
            sink,
        }
    }

    /// Run one job end to end and return its tri-state result.
    ///
    /// Never returns an error: every failure mode is folded into a
    /// `JobResult` with `status = error` and a message naming the failing
    /// stage.
    pub async fn run(&self, topic: &str) -> JobResult {
        let topic = topic.trim();
        if topic.is_empty() {
            return JobResult::error(topic, "topic must not be empty");
        }

        let mut job = JobState::new(topic);

        // FAN_OUT: all six specialists, concurrently.
        job.advance(Stage::FanOut);
        let outcomes = match self.fanout.run_all(topic, &Specialist::ALL).await {
            Ok(outcomes) => outcomes,
            Err(err) => {
                job.advance(Stage::Done);
                return JobResult::error(topic, format!("{} stage failed: {err}", Stage::FanOut));
            }
        };
        job.outcomes = outcomes;

        // AGGREGATE: pure fan-in, one section per identity.
        job.advance(Stage::Aggregate);
        let (sections, health) = aggregate(&job.outcomes);
        job.batch_health = Some(health);

        // SYNTHESIZE: one combined PI call; a failure here is always fatal.
        job.advance(Stage::Synthesize);
        let synthesis = self.synthesis.synthesize(topic, &sections).await;
        job.synthesis = Some(synthesis.clone());
        let proposal = match synthesis {
            TaskResult::Success(text) => text,
            TaskResult::Failure(reason) => {
                job.advance(Stage::Done);
                return JobResult::error(
                    topic,
                    format!("{} stage failed: {reason}", Stage::Synthesize),
                );
            }
        };

        // PERSIST: save the artifact; failing here is operationally distinct
        // from a synthesis failure and the message must say so.
        job.advance(Stage::Persist);
        let path = match self.sink.save(topic, &proposal) {
            Ok(path) => path,
            Err(err) => {
                job.advance(Stage::Done);
                return JobResult::error(
                    topic,
                    format!("synthesis succeeded but the report could not be saved: {err}"),
                );
            }
        };
        job.artifact_path = Some(path.clone());
        job.advance(Stage::Done);

        let (status, message) = match health {
            BatchHealth::AllSucceeded => (
                FinalStatus::Success,
                format!("proposal synthesized and saved to {}", path.display()),
            ),
            BatchHealth::PartiallyFailed => {
                let failed: Vec<String> = failed_specialists(&job.outcomes)
                    .into_iter()
                    .map(|(identity, reason)| format!("{identity} ({reason})"))
                    .collect();
                (
                    FinalStatus::PartialSuccess,
                    format!(
                        "proposal synthesized with gaps; failed specialists: {}; saved to {}",
                        failed.join(", "),
                        path.display()
                    ),
                )
            }
        };

        JobResult {
            status,
            message,
            artifact_path: Some(path),
            topic: topic.to_string(),
        }
    }
}
