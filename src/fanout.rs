//! Concurrent fan-out of specialist tasks.
//!
//! All tasks are spawned up front on the tokio runtime and collected into
//! index-stable slots, so the returned sequence preserves input order no
//! matter which task finishes first. A failing or timed-out task never
//! affects its siblings; only a scheduling-substrate failure (a task panic)
//! fails the batch as a whole.

use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::specialist::{FailureReason, Specialist, SpecialistInvoker, TaskOutcome, TaskResult};

/// Catastrophic failure of the concurrent-execution substrate.
///
/// Raised when a spawned task cannot be joined (e.g. it panicked). Individual
/// generation failures are never reported this way; they surface as
/// `Failure` outcomes instead.
#[derive(Debug, Error)]
#[error("fan-out scheduling failed: {0}")]
pub struct SchedulingError(pub String);

/// Launches a fixed set of specialist calls concurrently and collects their
/// outcomes.
pub struct FanOutCoordinator {
    invoker: SpecialistInvoker,
    call_timeout: Duration,
    job_deadline: Option<Duration>,
}

impl FanOutCoordinator {
    pub fn new(invoker: SpecialistInvoker, call_timeout: Duration) -> Self {
        Self {
            invoker,
            call_timeout,
            job_deadline: None,
        }
    }

    /// Configure an overall deadline for the whole batch. When it elapses,
    /// still-pending tasks are cancelled together and recorded as timeouts.
    pub fn with_job_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.job_deadline = deadline;
        self
    }

    /// Run every identity concurrently and return one outcome per identity,
    /// in input order.
    ///
    /// Returns only once every task has reached a terminal state. An empty
    /// identity slice is a no-op, not an error.
    pub async fn run_all(
        &self,
        topic: &str,
        identities: &[Specialist],
    ) -> Result<Vec<TaskOutcome>, SchedulingError> {
        if identities.is_empty() {
            return Ok(Vec::new());
        }

        let deadline = self.job_deadline.map(|d| Instant::now() + d);
        let mut set = JoinSet::new();
        for (idx, &identity) in identities.iter().enumerate() {
            let invoker = self.invoker.clone();
            let topic = topic.to_string();
            let timeout = self.call_timeout;
            set.spawn(async move { (idx, invoker.invoke(identity, &topic, timeout).await) });
        }

        // Each task writes only its own slot; unfilled slots after the
        // deadline become timeouts below.
        let mut slots: Vec<Option<TaskOutcome>> = identities.iter().map(|_| None).collect();
        loop {
            let joined = match deadline {
                Some(at) => match tokio::time::timeout_at(at, set.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        set.abort_all();
                        // Tasks that finished just before the deadline may not
                        // have been joined yet; drain them so their true
                        // outcomes are kept. Aborted tasks surface as
                        // cancellations and fall through to the timeout fill.
                        while let Some(joined) = set.join_next().await {
                            match joined {
                                Ok((idx, outcome)) => slots[idx] = Some(outcome),
                                Err(err) if err.is_cancelled() => {}
                                Err(err) => return Err(SchedulingError(err.to_string())),
                            }
                        }
                        break;
                    }
                },
                None => set.join_next().await,
            };
            match joined {
                None => break,
                Some(Ok((idx, outcome))) => slots[idx] = Some(outcome),
                Some(Err(err)) => {
                    set.abort_all();
                    return Err(SchedulingError(err.to_string()));
                }
            }
        }

        Ok(identities
            .iter()
            .zip(slots)
            .map(|(&identity, slot)| {
                slot.unwrap_or(TaskOutcome {
                    identity,
                    result: TaskResult::Failure(FailureReason::Timeout),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::glm::{GenerationCapability, GlmError};
    use crate::specialist::DEFAULT_CALL_TIMEOUT;

    const TOPIC: &str = "autonomous greenhouse control";

    /// Per-identity scripted behavior, resolved by matching the incoming
    /// prompt back to the specialist that produced it.
    #[derive(Clone)]
    enum Behavior {
        Reply(&'static str),
        ReplyAfter(Duration, &'static str),
        Fail(u16),
        Hang,
    }

    struct ScriptedCapability {
        behaviors: HashMap<Specialist, Behavior>,
        default: Behavior,
    }

    impl ScriptedCapability {
        fn new(default: Behavior) -> Self {
            Self {
                behaviors: HashMap::new(),
                default,
            }
        }

        fn with(mut self, identity: Specialist, behavior: Behavior) -> Self {
            self.behaviors.insert(identity, behavior);
            self
        }

        fn identity_of(prompt: &str) -> Option<Specialist> {
            Specialist::ALL
                .into_iter()
                .find(|s| prompt == s.prompt(TOPIC))
        }
    }

    #[async_trait]
    impl GenerationCapability for ScriptedCapability {
        async fn generate(&self, prompt: &str) -> Result<String, GlmError> {
            let behavior = Self::identity_of(prompt)
                .and_then(|id| self.behaviors.get(&id))
                .unwrap_or(&self.default);
            match behavior {
                Behavior::Reply(text) => Ok(text.to_string()),
                Behavior::ReplyAfter(delay, text) => {
                    tokio::time::sleep(*delay).await;
                    Ok(text.to_string())
                }
                Behavior::Fail(status) => Err(GlmError::ApiError {
                    status: *status,
                    message: "scripted failure".into(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok("never".into())
                }
            }
        }
    }

    fn coordinator(capability: ScriptedCapability, call_timeout: Duration) -> FanOutCoordinator {
        FanOutCoordinator::new(SpecialistInvoker::new(Arc::new(capability)), call_timeout)
    }

    #[tokio::test]
    async fn results_preserve_input_order_despite_varied_latency() {
        // Earlier identities finish last; output order must not change.
        let capability = ScriptedCapability::new(Behavior::Reply("fast"))
            .with(
                Specialist::Background,
                Behavior::ReplyAfter(Duration::from_millis(80), "slowest"),
            )
            .with(
                Specialist::Technical,
                Behavior::ReplyAfter(Duration::from_millis(40), "slower"),
            );
        let coord = coordinator(capability, DEFAULT_CALL_TIMEOUT);

        let outcomes = coord.run_all(TOPIC, &Specialist::ALL).await.unwrap();

        assert_eq!(outcomes.len(), 6);
        let order: Vec<Specialist> = outcomes.iter().map(|o| o.identity).collect();
        assert_eq!(order, Specialist::ALL.to_vec());
        assert_eq!(outcomes[0].result, TaskResult::Success("slowest".into()));
        assert_eq!(outcomes[1].result, TaskResult::Success("slower".into()));
        assert_eq!(outcomes[2].result, TaskResult::Success("fast".into()));
    }

    #[tokio::test]
    async fn one_failing_task_does_not_affect_siblings() {
        let capability = ScriptedCapability::new(Behavior::Reply("section"))
            .with(Specialist::Market, Behavior::Fail(503));
        let coord = coordinator(capability, DEFAULT_CALL_TIMEOUT);

        let outcomes = coord.run_all(TOPIC, &Specialist::ALL).await.unwrap();

        for outcome in &outcomes {
            if outcome.identity == Specialist::Market {
                assert!(matches!(
                    outcome.result,
                    TaskResult::Failure(FailureReason::UpstreamError(_))
                ));
            } else {
                assert_eq!(outcome.result, TaskResult::Success("section".into()));
            }
        }
    }

    #[tokio::test]
    async fn one_timeout_does_not_affect_siblings() {
        let capability = ScriptedCapability::new(Behavior::Reply("section"))
            .with(Specialist::Budget, Behavior::Hang);
        let coord = coordinator(capability, Duration::from_millis(30));

        let outcomes = coord.run_all(TOPIC, &Specialist::ALL).await.unwrap();

        for outcome in &outcomes {
            if outcome.identity == Specialist::Budget {
                assert_eq!(outcome.result, TaskResult::Failure(FailureReason::Timeout));
            } else {
                assert_eq!(outcome.result, TaskResult::Success("section".into()));
            }
        }
    }

    #[tokio::test]
    async fn empty_identity_list_is_a_noop() {
        let coord = coordinator(
            ScriptedCapability::new(Behavior::Reply("unused")),
            DEFAULT_CALL_TIMEOUT,
        );
        let outcomes = coord.run_all(TOPIC, &[]).await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn job_deadline_times_out_pending_tasks_only() {
        // Two identities hang past the job deadline; the other four finish.
        let capability = ScriptedCapability::new(Behavior::Reply("done"))
            .with(Specialist::Planner, Behavior::Hang)
            .with(Specialist::Impact, Behavior::Hang);
        let coord = coordinator(capability, DEFAULT_CALL_TIMEOUT)
            .with_job_deadline(Some(Duration::from_millis(60)));

        let outcomes = coord.run_all(TOPIC, &Specialist::ALL).await.unwrap();

        assert_eq!(outcomes.len(), 6);
        for outcome in &outcomes {
            match outcome.identity {
                Specialist::Planner | Specialist::Impact => {
                    assert_eq!(outcome.result, TaskResult::Failure(FailureReason::Timeout))
                }
                _ => assert_eq!(outcome.result, TaskResult::Success("done".into())),
            }
        }
    }

    #[tokio::test]
    async fn deadline_keeps_outcomes_that_finished_before_it() {
        // One identity finishes shortly before the deadline, one hangs past
        // it; the finished outcome must survive, the hung one times out.
        let capability = ScriptedCapability::new(Behavior::Reply("quick"))
            .with(
                Specialist::Market,
                Behavior::ReplyAfter(Duration::from_millis(40), "late but done"),
            )
            .with(Specialist::Impact, Behavior::Hang);
        let coord = coordinator(capability, DEFAULT_CALL_TIMEOUT)
            .with_job_deadline(Some(Duration::from_millis(100)));

        let outcomes = coord.run_all(TOPIC, &Specialist::ALL).await.unwrap();

        assert_eq!(
            outcomes[2].result,
            TaskResult::Success("late but done".into())
        );
        assert_eq!(
            outcomes[5].result,
            TaskResult::Failure(FailureReason::Timeout)
        );
    }

    #[tokio::test]
    async fn task_panic_fails_the_whole_batch() {
        struct PanickingCapability;

        #[async_trait]
        impl GenerationCapability for PanickingCapability {
            async fn generate(&self, _prompt: &str) -> Result<String, GlmError> {
                panic!("capability blew up");
            }
        }

        let coord = FanOutCoordinator::new(
            SpecialistInvoker::new(Arc::new(PanickingCapability)),
            DEFAULT_CALL_TIMEOUT,
        );

        let err = coord.run_all(TOPIC, &Specialist::ALL).await.unwrap_err();
        assert!(err.to_string().contains("fan-out scheduling failed"));
    }

    #[tokio::test]
    async fn subset_of_identities_runs_only_that_subset() {
        let coord = coordinator(
            ScriptedCapability::new(Behavior::Reply("ok")),
            DEFAULT_CALL_TIMEOUT,
        );
        let subset = [Specialist::Market, Specialist::Background];
        let outcomes = coord.run_all(TOPIC, &subset).await.unwrap();

        let order: Vec<Specialist> = outcomes.iter().map(|o| o.identity).collect();
        assert_eq!(order, subset.to_vec());
    }
}
