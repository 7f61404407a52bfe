use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::dashboard::Job;

/// Repository entry from `GET /orgs/{org}/teams/{team}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
    /// Name of the repository (without the owner)
    pub name: String,
}

/// Response from `GET /repos/{owner}/{repo}/actions/workflows`.
#[derive(Debug, Deserialize)]
pub struct WorkflowsResponse {
    pub workflows: Vec<GitHubWorkflow>,
}

/// GitHub Actions workflow definition.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubWorkflow {
    /// Unique identifier for the workflow
    pub id: u64,
}

/// Response from `GET /repos/{owner}/{repo}/actions/workflows/{id}/runs`.
#[derive(Debug, Deserialize)]
pub struct WorkflowRunsResponse {
    pub workflow_runs: Vec<GitHubWorkflowRun>,
}

/// GitHub Actions workflow run.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubWorkflowRun {
    /// Unique identifier for the workflow run
    pub id: u64,
}

/// Response from `GET /repos/{owner}/{repo}/actions/runs/{run_id}/jobs`.
#[derive(Debug, Deserialize)]
pub struct WorkflowJobsResponse {
    pub jobs: Vec<GitHubJob>,
}

/// Job within a GitHub Actions workflow run.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubJob {
    /// Name of the job
    pub name: String,
    /// Status of the job
    pub status: String,
    /// Conclusion of the job, absent until it completes
    pub conclusion: Option<String>,
    /// When the job started
    pub started_at: Option<DateTime<Utc>>,
    /// When the job was queued
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Web page of the job
    pub html_url: Option<String>,
    /// SHA of the commit the job ran against
    pub head_sha: String,
}

impl From<GitHubJob> for Job {
    fn from(job: GitHubJob) -> Self {
        Self {
            name: job.name,
            conclusion: job.conclusion,
            status: job.status,
            started_at: job.started_at,
            created_at: job.created_at,
            html_url: job.html_url.unwrap_or_default(),
            head_sha: job.head_sha,
        }
    }
}
