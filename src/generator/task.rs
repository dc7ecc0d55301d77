//! Background evaluation runs with observable status

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{EvaluationError, Result};
use crate::generator::workflow::{EvaluationOptions, EvaluationOrchestrator};
use crate::types::{BusinessConcept, EvaluationResult};

/// Lifecycle of one submitted evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    Pending,
    Running,
    Completed(Arc<EvaluationResult>),
    Failed(EvaluationError),
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed(_) | TaskState::Failed(_))
    }

    pub fn status(&self) -> TaskStatus {
        match self {
            TaskState::Pending => TaskStatus::Pending,
            TaskState::Running => TaskStatus::Running,
            TaskState::Completed(_) => TaskStatus::Completed,
            TaskState::Failed(_) => TaskStatus::Failed,
        }
    }
}

/// Payload-free view of [`TaskState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Handle to an evaluation running on the tokio runtime
pub struct EvaluationTask {
    id: Uuid,
    created_at: DateTime<Utc>,
    state: watch::Receiver<TaskState>,
}

impl EvaluationTask {
    /// Start evaluating `concept` in the background.
    pub fn spawn(
        orchestrator: Arc<EvaluationOrchestrator>,
        concept: BusinessConcept,
        options: EvaluationOptions,
    ) -> Self {
        let id = Uuid::new_v4();
        let (sender, receiver) = watch::channel(TaskState::Pending);

        tokio::spawn(async move {
            sender.send_replace(TaskState::Running);
            info!(task = %id, "evaluation task started");

            // Run on its own task so a panic still ends in `Failed`.
            let run = tokio::spawn(async move {
                orchestrator.evaluate_business_concept(&concept, options).await
            });
            let state = match run.await {
                Ok(Ok(result)) => TaskState::Completed(Arc::new(result)),
                Ok(Err(e)) => {
                    warn!(task = %id, error = %e, "evaluation task failed");
                    TaskState::Failed(e)
                }
                Err(e) => {
                    error!(task = %id, error = %e, "evaluation task aborted");
                    TaskState::Failed(EvaluationError::generation(format!(
                        "evaluation task aborted: {}",
                        e
                    )))
                }
            };
            sender.send_replace(state);
        });

        Self {
            id,
            created_at: Utc::now(),
            state: receiver,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> TaskStatus {
        self.state.borrow().status()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> TaskState {
        self.state.borrow().clone()
    }

    /// Wait for the run to finish and return its outcome.
    pub async fn wait(&self) -> Result<Arc<EvaluationResult>> {
        let mut receiver = self.state.clone();
        let state = receiver
            .wait_for(TaskState::is_terminal)
            .await
            .map_err(|_| EvaluationError::generation("evaluation task stopped unexpectedly"))?
            .clone();

        match state {
            TaskState::Completed(result) => Ok(result),
            TaskState::Failed(e) => Err(e),
            TaskState::Pending | TaskState::Running => Err(EvaluationError::generation(
                "evaluation task ended without a result",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::generator::testing::{ScriptedClient, sample_concept};
    use crate::llm::{GenerationClient, GenerationOptions};
    use async_trait::async_trait;

    struct PanickingClient;

    #[async_trait]
    impl GenerationClient for PanickingClient {
        async fn generate_text(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
            panic!("backend bug")
        }

        async fn analyze_image(
            &self,
            _image: &[u8],
            _prompt: &str,
            _model: Option<&str>,
        ) -> Result<String> {
            panic!("backend bug")
        }

        fn is_available(&self) -> bool {
            true
        }

        fn available_models(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn orchestrator(client: ScriptedClient) -> Arc<EvaluationOrchestrator> {
        Arc::new(EvaluationOrchestrator::new(Arc::new(client), Config::default()))
    }

    #[tokio::test]
    async fn test_task_completes_with_result() {
        let task = EvaluationTask::spawn(
            orchestrator(ScriptedClient::new().otherwise("70")),
            sample_concept(),
            EvaluationOptions::default(),
        );

        let result = task.wait().await.unwrap();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(result.business_concept.concept_description, "Coffee subscription for busy professionals");
        assert!(task.created_at() <= Utc::now());
    }

    #[tokio::test]
    async fn test_fatal_error_fails_task() {
        let task = EvaluationTask::spawn(
            orchestrator(ScriptedClient::new().offline()),
            sample_concept(),
            EvaluationOptions::default(),
        );

        let outcome = task.wait().await;
        assert!(matches!(outcome, Err(EvaluationError::ServiceUnavailable(_))));
        assert_eq!(task.status(), TaskStatus::Failed);
        assert!(task.state().is_terminal());
    }

    #[tokio::test]
    async fn test_panicking_run_is_reported_failed() {
        let orchestrator = Arc::new(EvaluationOrchestrator::new(
            Arc::new(PanickingClient),
            Config::default(),
        ));
        let task = EvaluationTask::spawn(orchestrator, sample_concept(), EvaluationOptions::default());

        let outcome = task.wait().await;
        assert!(matches!(outcome, Err(EvaluationError::Generation(_))));
        assert_eq!(task.status(), TaskStatus::Failed);
    }

    #[tokio::test]
    async fn test_tasks_get_distinct_ids() {
        let orchestrator = orchestrator(ScriptedClient::new().otherwise("60"));
        let first = EvaluationTask::spawn(
            orchestrator.clone(),
            sample_concept(),
            EvaluationOptions::default(),
        );
        let second = EvaluationTask::spawn(orchestrator, sample_concept(), EvaluationOptions::default());

        assert_ne!(first.id(), second.id());
        let (a, b) = futures::join!(first.wait(), second.wait());
        assert!(a.is_ok() && b.is_ok());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TaskState::Running.status().to_string(), "running");
        assert!(!TaskState::Pending.is_terminal());
    }
}
