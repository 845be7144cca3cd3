//! Fan-in: reduce per-task outcomes into named section texts plus an overall
//! batch health classification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::specialist::{FailureReason, Specialist, TaskOutcome, TaskResult};

/// Overall health of a fan-out batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchHealth {
    AllSucceeded,
    PartiallyFailed,
}

impl std::fmt::Display for BatchHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchHealth::AllSucceeded => write!(f, "all_succeeded"),
            BatchHealth::PartiallyFailed => write!(f, "partially_failed"),
        }
    }
}

/// Reduce a batch of outcomes into `{identity → section text}` plus batch
/// health.
///
/// Pure and total: every input outcome yields exactly one map entry. Failed
/// tasks get a placeholder naming the reason, so synthesis can note the gap
/// instead of silently dropping a section.
pub fn aggregate(outcomes: &[TaskOutcome]) -> (BTreeMap<Specialist, String>, BatchHealth) {
    let mut sections = BTreeMap::new();
    let mut health = BatchHealth::AllSucceeded;

    for outcome in outcomes {
        let text = match &outcome.result {
            TaskResult::Success(payload) => payload.clone(),
            TaskResult::Failure(reason) => {
                health = BatchHealth::PartiallyFailed;
                placeholder(outcome.identity, reason)
            }
        };
        sections.insert(outcome.identity, text);
    }

    (sections, health)
}

fn placeholder(identity: Specialist, reason: &FailureReason) -> String {
    format!(
        "Error: the {} section could not be drafted ({reason}). Note this gap in the proposal.",
        identity.name()
    )
}

/// Failed identities with their reasons, in outcome order. Used to build
/// user-facing result messages.
pub fn failed_specialists(outcomes: &[TaskOutcome]) -> Vec<(Specialist, &FailureReason)> {
    outcomes
        .iter()
        .filter_map(|o| o.result.failure_reason().map(|r| (o.identity, r)))
        .collect()
}
