//! Specialist identities, task outcomes and the invoker that runs one
//! specialist call against the generation capability.
//!
//! The invoker is the single place where provider errors are classified.
//! It always returns a [`TaskOutcome`]; no failure mode escapes as an error,
//! which is what makes fan-out isolation possible.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::glm::{GenerationCapability, GlmError};

/// Process-wide default timeout for a single generation call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(300);

/// The six specialist identities that draft one proposal section each.
///
/// Execution order is insignificant; the enum order fixes the section order
/// of the assembled report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialist {
    Background,
    Technical,
    Market,
    Budget,
    Planner,
    Impact,
}

impl Specialist {
    /// All identities, in report section order.
    pub const ALL: [Specialist; 6] = [
        Specialist::Background,
        Specialist::Technical,
        Specialist::Market,
        Specialist::Budget,
        Specialist::Planner,
        Specialist::Impact,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Specialist::Background => "background",
            Specialist::Technical => "technical",
            Specialist::Market => "market",
            Specialist::Budget => "budget",
            Specialist::Planner => "planner",
            Specialist::Impact => "impact",
        }
    }

    /// Section heading used in the synthesized report.
    pub fn section_title(&self) -> &'static str {
        match self {
            Specialist::Background => "Background Research",
            Specialist::Technical => "Technical Framework",
            Specialist::Market => "Market & Competitor Analysis",
            Specialist::Budget => "Budget (Seed Format)",
            Specialist::Planner => "Timeline, Milestones, KPIs, Risks",
            Specialist::Impact => "Impact & Significance",
        }
    }

    /// Identity-specific drafting instruction with the topic as the only
    /// free variable.
    pub fn prompt(&self, topic: &str) -> String {
        match self {
            Specialist::Background => format!(
                "Conduct detailed background research for this project idea: \"{topic}\"\n\
                 Focus on: problem statement, alignment with strategic goals (use placeholders \
                 like [Relevant National Strategy], [Your Institution Name]), and the market gap."
            ),
            Specialist::Technical => format!(
                "Describe the technical framework for a project based on this idea: \"{topic}\"\n\
                 Focus on: core technology, architecture, key innovations, and rationale \
                 (versus alternatives, why these specific technology choices)."
            ),
            Specialist::Market => format!(
                "Conduct a market and competitor analysis for this project idea: \"{topic}\"\n\
                 Focus on: target applications and industries, competitive landscape, \
                 and commercialization potential (realistic revenue models and partners)."
            ),
            Specialist::Budget => format!(
                "Estimate a generic one-year budget for \"{topic}\", suitable for seed R&D \
                 funding (range $50k-$100k USD).\n\
                 Break down into EOM (student/staff), Equipment (prototyping hardware), and \
                 OOE (consumables, cloud/API, 10-15% contingency). Use placeholders like \
                 [Stipend Rate] and present the result clearly."
            ),
            Specialist::Planner => format!(
                "Propose a generic one-year project plan for \"{topic}\" (seed phase).\n\
                 Include: timeline and milestones (Q1-Q4), example KPIs grouped by technology \
                 advancement, knowledge creation, talent development and collaboration, and a \
                 risk assessment with mitigations."
            ),
            Specialist::Impact => format!(
                "Assess the broader impacts and significance of \"{topic}\"\n\
                 Focus on: technological impact, societal relevance, institutional benefit \
                 (use placeholder [Your Institution Name]), and ESG considerations. \
                 Use a formal tone."
            ),
        }
    }
}

impl std::fmt::Display for Specialist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Structured cause of a failed generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The call did not finish within its timeout.
    Timeout,
    /// The provider or transport reported an error.
    UpstreamError(String),
    /// A response arrived but carried no textual content.
    EmptyResponse,
    /// The response body could not be decoded.
    MalformedResponse(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Timeout => write!(f, "timed out"),
            FailureReason::UpstreamError(msg) => write!(f, "upstream error: {msg}"),
            FailureReason::EmptyResponse => write!(f, "empty response"),
            FailureReason::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

/// The result of executing one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskResult {
    Success(String),
    Failure(FailureReason),
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success(_))
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            TaskResult::Success(_) => None,
            TaskResult::Failure(reason) => Some(reason),
        }
    }
}

/// Result of executing one specialist task, tagged with its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub identity: Specialist,
    pub result: TaskResult,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Executes one named unit of specialist work and classifies its outcome.
#[derive(Clone)]
pub struct SpecialistInvoker {
    capability: Arc<dyn GenerationCapability>,
}

impl SpecialistInvoker {
    pub fn new(capability: Arc<dyn GenerationCapability>) -> Self {
        Self { capability }
    }

    /// Run one specialist call bounded by `timeout`.
    ///
    /// Always returns a `TaskOutcome`; every failure mode is folded into the
    /// `Failure` variant so callers need no error handling of their own.
    pub async fn invoke(
        &self,
        identity: Specialist,
        topic: &str,
        timeout: Duration,
    ) -> TaskOutcome {
        let prompt = identity.prompt(topic);
        let result = run_classified(self.capability.as_ref(), &prompt, timeout).await;
        TaskOutcome { identity, result }
    }
}

/// Run one bounded generation call and classify the outcome.
///
/// Shared by the specialist invoker and the synthesis stage so both apply
/// identical classification rules.
pub(crate) async fn run_classified(
    capability: &dyn GenerationCapability,
    prompt: &str,
    timeout: Duration,
) -> TaskResult {
    match tokio::time::timeout(timeout, capability.generate(prompt)).await {
        Err(_) => TaskResult::Failure(FailureReason::Timeout),
        Ok(Err(err)) => TaskResult::Failure(classify_provider_error(err)),
        Ok(Ok(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                TaskResult::Failure(FailureReason::EmptyResponse)
            } else {
                TaskResult::Success(trimmed.to_string())
            }
        }
    }
}

fn classify_provider_error(err: GlmError) -> FailureReason {
    match err {
        GlmError::NetworkError(e) if e.is_timeout() => FailureReason::Timeout,
        GlmError::NetworkError(e) if e.is_decode() => FailureReason::MalformedResponse(e.to_string()),
        other => FailureReason::UpstreamError(other.to_string()),
    }
}
