use log::info;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::auth::Token;
use crate::config::Settings;
use crate::error::{CctrayError, Result};

use super::types::{
    GitHubJob, GitHubRepository, GitHubWorkflow, GitHubWorkflowRun, WorkflowJobsResponse,
    WorkflowRunsResponse, WorkflowsResponse,
};

/// GitHub REST API client scoped to one organisation.
pub struct GitHubClient {
    /// HTTP client
    client: reqwest::Client,
    /// Base URL for GitHub API, without a trailing slash
    base_url: String,
    /// Organisation owning the team and its repositories
    organisation: String,
    token: Token,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `organisation` - Organisation owning the repositories
    /// * `token` - GitHub personal access token sent as a bearer credential
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, organisation: String, token: Token) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CctrayError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            organisation,
            token,
        })
    }

    /// Build a client from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.base_url.as_str(),
            settings.organisation.clone(),
            settings.token.clone(),
        )
    }

    /// Issue an authenticated GET against `path` and decode the JSON body.
    ///
    /// Non-success statuses become [`CctrayError::Api`]; bodies that do not
    /// match `T` become [`CctrayError::Decode`].
    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let request = request.bearer_auth(self.token.as_str()).build()?;
        let url = request.url().to_string();

        info!("Requesting url: {url}");

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CctrayError::Api {
                url,
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|source| CctrayError::Decode { url, source })
    }

    /// Repositories the team has access to, in API order.
    pub async fn list_team_repositories(&self, team: &str) -> Result<Vec<GitHubRepository>> {
        self.get_json(&format!("/orgs/{}/teams/{team}/repos", self.organisation), &[])
            .await
    }

    /// Workflow definitions of a repository.
    pub async fn list_workflows(&self, repo: &str) -> Result<Vec<GitHubWorkflow>> {
        let response: WorkflowsResponse = self
            .get_json(
                &format!("/repos/{}/{repo}/actions/workflows", self.organisation),
                &[],
            )
            .await?;

        Ok(response.workflows)
    }

    /// Most recent run of a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`CctrayError::NoWorkflowRuns`] if the workflow has never run.
    pub async fn latest_workflow_run(
        &self,
        repo: &str,
        workflow_id: u64,
    ) -> Result<GitHubWorkflowRun> {
        let response: WorkflowRunsResponse = self
            .get_json(
                &format!(
                    "/repos/{}/{repo}/actions/workflows/{workflow_id}/runs",
                    self.organisation
                ),
                &[("page", "1"), ("per_page", "1")],
            )
            .await?;

        response
            .workflow_runs
            .into_iter()
            .next()
            .ok_or_else(|| CctrayError::NoWorkflowRuns {
                repo: repo.to_string(),
                workflow_id,
            })
    }

    /// Jobs of a workflow run.
    pub async fn list_run_jobs(&self, repo: &str, run_id: u64) -> Result<Vec<GitHubJob>> {
        let response: WorkflowJobsResponse = self
            .get_json(
                &format!("/repos/{}/{repo}/actions/runs/{run_id}/jobs", self.organisation),
                &[],
            )
            .await?;

        Ok(response.jobs)
    }
}
