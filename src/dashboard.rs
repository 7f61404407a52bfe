//! Aggregated view of a team's most recent GitHub Actions activity.
//!
//! The collection pipeline builds these structures stage by stage: each stage
//! consumes the previous shape and produces a richer one, preserving the
//! order in which GitHub returned repositories, workflows and jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository together with the ids of its workflow definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryWorkflows {
    pub name: String,
    pub workflow_ids: Vec<u64>,
}

/// A workflow paired with the id of its most recent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowRunRef {
    pub workflow_id: u64,
    pub run_id: u64,
}

/// A repository whose workflows have been resolved to their latest runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRuns {
    pub name: String,
    pub workflows: Vec<WorkflowRunRef>,
}

/// A fully collected repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub workflows: Vec<Workflow>,
}

/// A workflow, its most recent run, and the jobs of that run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub workflow_id: u64,
    pub run_id: u64,
    pub jobs: Vec<Job>,
}

/// The fields of a GitHub Actions job needed to render a dashboard entry.
///
/// Values are kept in GitHub's vocabulary; translation into CCTray terms
/// happens when the feed is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    /// `success`, `failure`, `cancelled`, ... or `None` while still running
    pub conclusion: Option<String>,
    /// `queued`, `in_progress`, `completed`, ...
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub html_url: String,
    pub head_sha: String,
}

impl Job {
    /// Time the job last built: when it started, or when it was queued if it
    /// has not started yet.
    pub fn last_build_time(&self) -> Option<DateTime<Utc>> {
        self.started_at.or(self.created_at)
    }
}

impl RepositoryWorkflows {
    pub fn with_runs(self, workflows: Vec<WorkflowRunRef>) -> RepositoryRuns {
        RepositoryRuns {
            name: self.name,
            workflows,
        }
    }
}

impl RepositoryRuns {
    pub fn with_workflows(self, workflows: Vec<Workflow>) -> Repository {
        Repository {
            name: self.name,
            workflows,
        }
    }
}

impl WorkflowRunRef {
    pub fn with_jobs(self, jobs: Vec<Job>) -> Workflow {
        Workflow {
            workflow_id: self.workflow_id,
            run_id: self.run_id,
            jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn job(started_at: Option<DateTime<Utc>>, created_at: Option<DateTime<Utc>>) -> Job {
        Job {
            name: "build".to_string(),
            conclusion: None,
            status: "queued".to_string(),
            started_at,
            created_at,
            html_url: "https://github.com/acme/api/actions/runs/1/job/2".to_string(),
            head_sha: "abcdef1234567".to_string(),
        }
    }

    #[test]
    fn test_last_build_time_prefers_start() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 59, 0).unwrap();
        let started = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(
            job(Some(started), Some(created)).last_build_time(),
            Some(started)
        );
    }

    #[test]
    fn test_last_build_time_falls_back_to_creation() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 59, 0).unwrap();
        assert_eq!(job(None, Some(created)).last_build_time(), Some(created));
        assert_eq!(job(None, None).last_build_time(), None);
    }

    #[test]
    fn test_stage_transitions_keep_name_and_order() {
        let repo = RepositoryWorkflows {
            name: "api".to_string(),
            workflow_ids: vec![11, 12],
        };
        let runs = repo.with_runs(vec![
            WorkflowRunRef {
                workflow_id: 11,
                run_id: 101,
            },
            WorkflowRunRef {
                workflow_id: 12,
                run_id: 102,
            },
        ]);
        let workflows = runs
            .workflows
            .iter()
            .map(|run| run.with_jobs(vec![]))
            .collect();
        let repository = runs.with_workflows(workflows);

        assert_eq!(repository.name, "api");
        let ids: Vec<_> = repository
            .workflows
            .iter()
            .map(|w| (w.workflow_id, w.run_id))
            .collect();
        assert_eq!(ids, vec![(11, 101), (12, 102)]);
    }
}
