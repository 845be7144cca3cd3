//! Job state, pipeline stages and the final result type.
//!
//! One `JobState` exists per end-to-end request. It moves monotonically
//! through the stages: START → FAN_OUT → AGGREGATE → SYNTHESIZE → PERSIST →
//! DONE, with no backward transitions, and is discarded once the result is
//! returned. Only the produced report file outlives the job.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::BatchHealth;
use crate::specialist::{TaskOutcome, TaskResult};

/// The six stages of the drafting pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Start,
    FanOut,
    Aggregate,
    Synthesize,
    Persist,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Start => write!(f, "START"),
            Stage::FanOut => write!(f, "FAN_OUT"),
            Stage::Aggregate => write!(f, "AGGREGATE"),
            Stage::Synthesize => write!(f, "SYNTHESIZE"),
            Stage::Persist => write!(f, "PERSIST"),
            Stage::Done => write!(f, "DONE"),
        }
    }
}

/// Tri-state outcome of one drafting job, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    Success,
    PartialSuccess,
    Error,
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalStatus::Success => write!(f, "success"),
            FinalStatus::PartialSuccess => write!(f, "partial_success"),
            FinalStatus::Error => write!(f, "error"),
        }
    }
}

/// Aggregate state of one end-to-end drafting request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobState {
    pub id: String,
    pub topic: String,
    pub stage: Stage,
    pub stage_history: Vec<Stage>,
    pub outcomes: Vec<TaskOutcome>,
    pub batch_health: Option<BatchHealth>,
    pub synthesis: Option<TaskResult>,
    pub artifact_path: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
}

impl JobState {
    pub fn new(topic: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            stage: Stage::Start,
            stage_history: Vec::new(),
            outcomes: Vec::new(),
            batch_health: None,
            synthesis: None,
            artifact_path: None,
            created_at: Utc::now(),
        }
    }

    /// Advance to `next`, recording the stage being left.
    ///
    /// Transitions are forward-only; `next` must be strictly later than the
    /// current stage.
    pub fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "backward transition {} → {next}", self.stage);
        self.stage_history.push(self.stage);
        self.stage = next;
    }
}

/// Final result returned to the caller of `JobPipeline::run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub status: FinalStatus,
    pub message: String,
    pub artifact_path: Option<PathBuf>,
    pub topic: String,
}

impl JobResult {
    /// Terminal error result with no artifact.
    pub fn error(topic: &str, message: impl Into<String>) -> Self {
        Self {
            status: FinalStatus::Error,
            message: message.into(),
            artifact_path: None,
            topic: topic.to_string(),
        }
    }
}
