use log::info;

use crate::config::Settings;
use crate::dashboard::{Job, Repository, RepositoryRuns, RepositoryWorkflows, WorkflowRunRef};
use crate::error::Result;

use super::client::GitHubClient;

/// Collects the latest GitHub Actions job results for every repository of a team.
///
/// Collection runs in four stages, each issuing one request per element at
/// its level and handing a new structure to the next stage:
/// repositories, then workflows, then latest runs, then jobs. Requests are
/// issued strictly one after another.
pub struct GitHubProvider {
    /// GitHub API client
    client: GitHubClient,
    /// Team slug whose repositories are collected
    team: String,
}

impl GitHubProvider {
    pub fn new(client: GitHubClient, team: String) -> Self {
        Self { client, team }
    }

    /// Create a provider from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = GitHubClient::from_settings(settings)?;
        Ok(Self::new(client, settings.team.clone()))
    }

    /// Run the whole collection pipeline.
    ///
    /// # Errors
    ///
    /// Any failed request, undecodable response or workflow without runs
    /// aborts the collection; nothing is returned for the repositories that
    /// did succeed.
    pub async fn collect_repositories(&self) -> Result<Vec<Repository>> {
        info!("Collecting GitHub Actions status for team: {}", self.team);

        let names = self.list_repositories().await?;
        let repositories = self.attach_workflows(names).await?;
        let repositories = self.resolve_latest_runs(repositories).await?;
        self.collect_jobs(repositories).await
    }

    /// Stage 1: names of the team's repositories.
    pub async fn list_repositories(&self) -> Result<Vec<String>> {
        let names: Vec<String> = self
            .client
            .list_team_repositories(&self.team)
            .await?
            .into_iter()
            .map(|repo| repo.name)
            .collect();

        info!("Found {} repositories", names.len());
        Ok(names)
    }

    /// Stage 2: attach workflow ids to each repository.
    pub async fn attach_workflows(&self, names: Vec<String>) -> Result<Vec<RepositoryWorkflows>> {
        let mut repositories = Vec::with_capacity(names.len());

        for name in names {
            let workflow_ids = self
                .client
                .list_workflows(&name)
                .await?
                .into_iter()
                .map(|workflow| workflow.id)
                .collect();
            repositories.push(RepositoryWorkflows { name, workflow_ids });
        }

        let workflow_count: usize = repositories.iter().map(|r| r.workflow_ids.len()).sum();
        info!("Found {workflow_count} workflows");
        Ok(repositories)
    }

    /// Stage 3: resolve each workflow to its most recent run.
    pub async fn resolve_latest_runs(
        &self,
        repositories: Vec<RepositoryWorkflows>,
    ) -> Result<Vec<RepositoryRuns>> {
        let mut resolved = Vec::with_capacity(repositories.len());

        for repository in repositories {
            let mut runs = Vec::with_capacity(repository.workflow_ids.len());
            for &workflow_id in &repository.workflow_ids {
                let run = self
                    .client
                    .latest_workflow_run(&repository.name, workflow_id)
                    .await?;
                runs.push(WorkflowRunRef {
                    workflow_id,
                    run_id: run.id,
                });
            }
            resolved.push(repository.with_runs(runs));
        }

        info!("Resolved latest runs for {} repositories", resolved.len());
        Ok(resolved)
    }

    /// Stage 4: fetch the jobs of every resolved run.
    pub async fn collect_jobs(&self, repositories: Vec<RepositoryRuns>) -> Result<Vec<Repository>> {
        let mut collected = Vec::with_capacity(repositories.len());
        let mut job_count = 0;

        for repository in repositories {
            let mut workflows = Vec::with_capacity(repository.workflows.len());
            for run in &repository.workflows {
                let jobs: Vec<Job> = self
                    .client
                    .list_run_jobs(&repository.name, run.run_id)
                    .await?
                    .into_iter()
                    .map(Job::from)
                    .collect();
                job_count += jobs.len();
                workflows.push(run.with_jobs(jobs));
            }
            collected.push(repository.with_workflows(workflows));
        }

        info!("Collected {job_count} jobs");
        Ok(collected)
    }
}
