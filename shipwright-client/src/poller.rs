//! Completion poller
//!
//! Waits for a dispatched build to finish by scanning the repository's recent
//! workflow runs for the build workflow, then each candidate run's artifacts
//! for the build's artifact name. Strictly sequential: one fetch at a time,
//! no cancellation other than dropping the future.

use shipwright_core::domain::workflow::{RunConclusion, RunStatus};
use std::sync::Arc;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::runs::WorkflowApi;

/// Display name of the build workflow, as reported in the run list
pub const BUILD_WORKFLOW_NAME: &str = "Build Customized WebView APK";

/// Poller timing and matching configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Run name to match in the run list
    pub workflow_name: String,

    /// Delay before the first check, giving GitHub time to register the run
    pub warmup: Duration,

    /// Delay between checks
    pub poll_interval: Duration,

    /// Give up after this long. `None` waits indefinitely.
    pub max_wait: Option<Duration>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            workflow_name: BUILD_WORKFLOW_NAME.to_string(),
            warmup: Duration::from_secs(10),
            poll_interval: Duration::from_secs(30),
            max_wait: None,
        }
    }
}

/// Terminal state of a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The run completed successfully; the artifact can be downloaded
    Succeeded { download_url: String },
    /// The run completed without success
    Failed { conclusion: Option<RunConclusion> },
    /// A run-list or artifact-list fetch failed
    NotFound,
    /// `max_wait` elapsed before the run completed
    TimedOut,
}

impl PollOutcome {
    pub fn download_url(&self) -> Option<&str> {
        match self {
            PollOutcome::Succeeded { download_url } => Some(download_url),
            _ => None,
        }
    }
}

/// Result of scanning one run-list snapshot
enum Check {
    Done(PollOutcome),
    Running(RunStatus),
    Missing,
}

pub struct CompletionPoller {
    api: Arc<dyn WorkflowApi>,
    config: PollerConfig,
}

impl CompletionPoller {
    pub fn new(api: Arc<dyn WorkflowApi>, config: PollerConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Block until the artifact named `artifact_name` is ready, its run fails,
    /// a fetch fails, or `max_wait` elapses
    pub async fn wait_for_artifact(&self, artifact_name: &str) -> PollOutcome {
        let started = Instant::now();

        info!("Waiting for workflow to complete (artifact {})", artifact_name);
        time::sleep(self.config.warmup).await;

        loop {
            if let Some(max_wait) = self.config.max_wait {
                if started.elapsed() >= max_wait {
                    warn!(
                        "Gave up waiting for artifact {} after {:?}",
                        artifact_name, max_wait
                    );
                    return PollOutcome::TimedOut;
                }
            }

            match self.check_once(artifact_name).await {
                Check::Done(outcome) => return outcome,
                Check::Running(status) => {
                    info!("Workflow still running... Status: {:?}", status);
                }
                Check::Missing => {
                    debug!("No matching run for artifact {} yet", artifact_name);
                }
            }

            time::sleep(self.config.poll_interval).await;
        }
    }

    /// Scan one snapshot of the run list
    ///
    /// Stops at the first run carrying the artifact, whatever its state.
    async fn check_once(&self, artifact_name: &str) -> Check {
        let runs = match self.api.list_workflow_runs().await {
            Ok(runs) => runs,
            Err(e) => {
                error!("Error checking workflow status: {}", e);
                return Check::Done(PollOutcome::NotFound);
            }
        };

        let candidates = runs.iter().filter(|run| {
            run.name.as_deref() == Some(self.config.workflow_name.as_str())
                && run.updated_at.is_some()
                && !run.artifacts_url.is_empty()
        });

        for run in candidates {
            let artifacts = match self.api.list_artifacts(&run.artifacts_url).await {
                Ok(artifacts) => artifacts,
                Err(e) => {
                    error!("Error listing artifacts of run {}: {}", run.id, e);
                    return Check::Done(PollOutcome::NotFound);
                }
            };

            let Some(artifact) = artifacts.into_iter().find(|a| a.name == artifact_name) else {
                continue;
            };

            if !run.is_completed() {
                return Check::Running(run.status);
            }

            if run.succeeded() {
                info!("Workflow run {} completed successfully", run.id);
                return Check::Done(PollOutcome::Succeeded {
                    download_url: artifact.archive_download_url,
                });
            }

            warn!(
                "Workflow run {} failed with conclusion: {}",
                run.id,
                run.conclusion
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            return Check::Done(PollOutcome::Failed {
                conclusion: run.conclusion,
            });
        }

        Check::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, Result};
    use async_trait::async_trait;
    use chrono::Utc;
    use shipwright_core::domain::workflow::{Artifact, WorkflowRun};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ARTIFACT: &str = "user123_001";

    /// Replays a fixed sequence of run-list snapshots
    #[derive(Default)]
    struct ScriptedApi {
        snapshots: Mutex<VecDeque<Result<Vec<WorkflowRun>>>>,
        artifacts: HashMap<String, Vec<Artifact>>,
        failing_artifacts_url: Option<String>,
        run_fetches: AtomicUsize,
        artifact_fetches: AtomicUsize,
    }

    impl ScriptedApi {
        fn new(snapshots: Vec<Result<Vec<WorkflowRun>>>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots.into()),
                ..Default::default()
            }
        }

        fn with_artifacts(mut self, url: &str, names: &[&str]) -> Self {
            let artifacts = names
                .iter()
                .map(|name| Artifact {
                    name: name.to_string(),
                    archive_download_url: format!("{}/{}/zip", url, name),
                })
                .collect();
            self.artifacts.insert(url.to_string(), artifacts);
            self
        }

        fn run_fetches(&self) -> usize {
            self.run_fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WorkflowApi for ScriptedApi {
        async fn list_workflow_runs(&self) -> Result<Vec<WorkflowRun>> {
            self.run_fetches.fetch_add(1, Ordering::SeqCst);
            self.snapshots
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn list_artifacts(&self, artifacts_url: &str) -> Result<Vec<Artifact>> {
            self.artifact_fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing_artifacts_url.as_deref() == Some(artifacts_url) {
                return Err(ClientError::api_error(500, "boom"));
            }
            Ok(self.artifacts.get(artifacts_url).cloned().unwrap_or_default())
        }
    }

    fn run(
        name: &str,
        status: RunStatus,
        conclusion: Option<RunConclusion>,
        artifacts_url: &str,
    ) -> WorkflowRun {
        WorkflowRun {
            id: 1,
            name: Some(name.to_string()),
            status,
            conclusion,
            updated_at: Some(Utc::now()),
            artifacts_url: artifacts_url.to_string(),
        }
    }

    fn poller(api: Arc<ScriptedApi>) -> CompletionPoller {
        CompletionPoller::new(api, PollerConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_run_succeeds() {
        let api = Arc::new(
            ScriptedApi::new(vec![
                Ok(vec![]),
                Ok(vec![run(BUILD_WORKFLOW_NAME, RunStatus::InProgress, None, "a/1")]),
                Ok(vec![run(
                    BUILD_WORKFLOW_NAME,
                    RunStatus::Completed,
                    Some(RunConclusion::Success),
                    "a/1",
                )]),
                Ok(vec![]),
            ])
            .with_artifacts("a/1", &[ARTIFACT]),
        );

        let started = Instant::now();
        let outcome = poller(api.clone()).wait_for_artifact(ARTIFACT).await;

        assert_eq!(
            outcome,
            PollOutcome::Succeeded {
                download_url: format!("a/1/{}/zip", ARTIFACT)
            }
        );
        assert_eq!(api.run_fetches(), 3);
        // warm-up plus two poll intervals
        assert_eq!(started.elapsed().as_secs(), 70);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_stops_polling() {
        let api = Arc::new(
            ScriptedApi::new(vec![Ok(vec![run(
                BUILD_WORKFLOW_NAME,
                RunStatus::Completed,
                Some(RunConclusion::Failure),
                "a/1",
            )])])
            .with_artifacts("a/1", &[ARTIFACT]),
        );

        let outcome = poller(api.clone()).wait_for_artifact(ARTIFACT).await;

        assert_eq!(
            outcome,
            PollOutcome::Failed {
                conclusion: Some(RunConclusion::Failure)
            }
        );
        assert_eq!(api.run_fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignores_other_workflows_and_artifacts() {
        let api = Arc::new(
            ScriptedApi::new(vec![
                Ok(vec![
                    run(
                        "Lint",
                        RunStatus::Completed,
                        Some(RunConclusion::Success),
                        "lint/1",
                    ),
                    run(
                        BUILD_WORKFLOW_NAME,
                        RunStatus::Completed,
                        Some(RunConclusion::Success),
                        "a/2",
                    ),
                ]),
                Ok(vec![run(
                    BUILD_WORKFLOW_NAME,
                    RunStatus::Completed,
                    Some(RunConclusion::Success),
                    "a/1",
                )]),
            ])
            .with_artifacts("lint/1", &[ARTIFACT])
            .with_artifacts("a/2", &["someone_else_002"])
            .with_artifacts("a/1", &["someone_else_002", ARTIFACT]),
        );

        let outcome = poller(api.clone()).wait_for_artifact(ARTIFACT).await;

        assert_eq!(outcome.download_url(), Some("a/1/user123_001/zip"));
        assert_eq!(api.run_fetches(), 2);
        // The lint run's artifacts are never fetched
        assert_eq!(api.artifact_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_match_ends_the_snapshot_scan() {
        let api = Arc::new(
            ScriptedApi::new(vec![
                Ok(vec![
                    run(BUILD_WORKFLOW_NAME, RunStatus::InProgress, None, "a/1"),
                    run(
                        BUILD_WORKFLOW_NAME,
                        RunStatus::Completed,
                        Some(RunConclusion::Success),
                        "a/2",
                    ),
                ]),
                Ok(vec![run(
                    BUILD_WORKFLOW_NAME,
                    RunStatus::Completed,
                    Some(RunConclusion::Success),
                    "a/2",
                )]),
            ])
            .with_artifacts("a/1", &[ARTIFACT])
            .with_artifacts("a/2", &[ARTIFACT]),
        );

        let started = Instant::now();
        let outcome = poller(api.clone()).wait_for_artifact(ARTIFACT).await;

        assert_eq!(outcome.download_url(), Some("a/2/user123_001/zip"));
        // The completed run in the first snapshot is only seen after a refetch
        assert_eq!(api.run_fetches(), 2);
        // One artifact fetch per snapshot
        assert_eq!(api.artifact_fetches.load(Ordering::SeqCst), 2);
        // warm-up plus one poll interval
        assert_eq!(started.elapsed().as_secs(), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_without_artifacts_url_are_skipped() {
        let config = PollerConfig {
            max_wait: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        let api = Arc::new(ScriptedApi::new(vec![Ok(vec![run(
            BUILD_WORKFLOW_NAME,
            RunStatus::Completed,
            Some(RunConclusion::Success),
            "",
        )])]));

        let outcome = CompletionPoller::new(api.clone(), config)
            .wait_for_artifact(ARTIFACT)
            .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(api.artifact_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_without_updated_at_are_skipped() {
        let mut stale = run(
            BUILD_WORKFLOW_NAME,
            RunStatus::Completed,
            Some(RunConclusion::Success),
            "a/1",
        );
        stale.updated_at = None;

        let config = PollerConfig {
            max_wait: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        let api = Arc::new(ScriptedApi::new(vec![Ok(vec![stale])]).with_artifacts("a/1", &[ARTIFACT]));

        let outcome = CompletionPoller::new(api.clone(), config)
            .wait_for_artifact(ARTIFACT)
            .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(api.artifact_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_list_error_aborts_with_not_found() {
        let api = Arc::new(ScriptedApi::new(vec![
            Ok(vec![]),
            Err(ClientError::api_error(401, "Bad credentials")),
        ]));

        let outcome = poller(api.clone()).wait_for_artifact(ARTIFACT).await;

        assert_eq!(outcome, PollOutcome::NotFound);
        assert_eq!(api.run_fetches(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_artifact_list_error_aborts_with_not_found() {
        let mut api = ScriptedApi::new(vec![Ok(vec![run(
            BUILD_WORKFLOW_NAME,
            RunStatus::InProgress,
            None,
            "a/1",
        )])]);
        api.failing_artifacts_url = Some("a/1".to_string());
        let api = Arc::new(api);

        let outcome = poller(api.clone()).wait_for_artifact(ARTIFACT).await;

        assert_eq!(outcome, PollOutcome::NotFound);
        assert_eq!(api.run_fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_wait_bounds_a_stuck_run() {
        let snapshots = (0..10)
            .map(|_| Ok(vec![run(BUILD_WORKFLOW_NAME, RunStatus::Queued, None, "a/1")]))
            .collect();
        let api = Arc::new(ScriptedApi::new(snapshots).with_artifacts("a/1", &[ARTIFACT]));
        let config = PollerConfig {
            max_wait: Some(Duration::from_secs(100)),
            ..Default::default()
        };

        let started = Instant::now();
        let outcome = CompletionPoller::new(api.clone(), config)
            .wait_for_artifact(ARTIFACT)
            .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        // Checks at 10s, 40s, 70s; the 100s check is replaced by the timeout
        assert_eq!(api.run_fetches(), 3);
        assert_eq!(started.elapsed().as_secs(), 100);
    }
}
