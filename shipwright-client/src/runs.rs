//! Workflow run and artifact queries

use async_trait::async_trait;
use shipwright_core::domain::workflow::{Artifact, ArtifactList, WorkflowRun, WorkflowRunList};
use tracing::debug;

use crate::GithubClient;
use crate::error::Result;

/// Read access to workflow runs and their artifacts
///
/// The completion poller only depends on this trait, so it can be driven by
/// a scripted implementation in tests.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// List recent workflow runs of the repository
    async fn list_workflow_runs(&self) -> Result<Vec<WorkflowRun>>;

    /// List the artifacts of one run, given the run's `artifacts_url`
    async fn list_artifacts(&self, artifacts_url: &str) -> Result<Vec<Artifact>>;
}

#[async_trait]
impl WorkflowApi for GithubClient {
    async fn list_workflow_runs(&self) -> Result<Vec<WorkflowRun>> {
        let url = self.repo_url("actions/runs");
        let response = self.authorized(self.client.get(&url)).send().await?;

        let list: WorkflowRunList = self.handle_response(response).await?;
        debug!("Fetched {} workflow run(s)", list.workflow_runs.len());
        Ok(list.workflow_runs)
    }

    async fn list_artifacts(&self, artifacts_url: &str) -> Result<Vec<Artifact>> {
        let response = self.authorized(self.client.get(artifacts_url)).send().await?;

        let list: ArtifactList = self.handle_response(response).await?;
        debug!("Fetched {} artifact(s) from {}", list.artifacts.len(), artifacts_url);
        Ok(list.artifacts)
    }
}
