//! Workflow dispatch

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use shipwright_core::domain::build::{BuildRequest, DispatchResult};
use tracing::{error, info};

use crate::GithubClient;
use crate::error::{ClientError, Result};

/// Workflow file that builds the customized APK
pub const BUILD_WORKFLOW_FILE: &str = "build_apk.yml";

/// Branch the workflow is dispatched on
pub const DEFAULT_REF: &str = "main";

/// Body of a `workflow_dispatch` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDispatch {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub inputs: DispatchInputs,
}

/// Inputs declared by the build workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchInputs {
    pub app_name: String,
    pub url: String,
    pub primary_color: String,
    pub user_id: String,
    pub build_id: String,
}

impl From<&BuildRequest> for WorkflowDispatch {
    fn from(req: &BuildRequest) -> Self {
        Self {
            git_ref: DEFAULT_REF.to_string(),
            inputs: DispatchInputs {
                app_name: req.app_name().to_string(),
                url: req.url().to_string(),
                primary_color: req.color().to_string(),
                user_id: req.user_id().to_string(),
                build_id: req.build_id().to_string(),
            },
        }
    }
}

impl GithubClient {
    /// Ask GitHub Actions to start the build workflow for a request
    ///
    /// GitHub answers an accepted dispatch with `204 No Content`; any other
    /// status is returned as [`ClientError::DispatchRejected`] with the
    /// response body, leaving the caller to decide how fatal that is.
    pub async fn dispatch_workflow(&self, req: &BuildRequest) -> Result<DispatchResult> {
        let url = self.repo_url(&format!(
            "actions/workflows/{}/dispatches",
            BUILD_WORKFLOW_FILE
        ));
        let payload = WorkflowDispatch::from(req);

        let response = self
            .authorized(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Error triggering workflow: {}", status.as_u16());
            return Err(ClientError::DispatchRejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            "Workflow triggered for {} (build {})",
            self.repo,
            req.build_id()
        );

        Ok(DispatchResult::for_request(req))
    }
}
