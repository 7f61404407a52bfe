//! CCTray feed model and XML rendering.
//!
//! CCTray is the de facto XML format consumed by CI dashboards (CCMenu,
//! Nevergreen, BuildNotify, ...): a `Projects` root holding one `Project`
//! element per monitored build.

use std::fmt;
use std::io::Cursor;

use chrono::SecondsFormat;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::Serialize;

use crate::dashboard::{Job, Repository};
use crate::error::Result;

/// Number of leading commit SHA characters used as the build label.
pub const LABEL_LENGTH: usize = 6;

/// CCTray `lastBuildStatus` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildStatus {
    Success,
    Failure,
    Unknown,
}

impl BuildStatus {
    /// Map a GitHub Actions job conclusion.
    ///
    /// Anything other than `success` or `failure` (cancelled, skipped, a job
    /// still running, ...) is reported as `Unknown`.
    pub fn from_conclusion(conclusion: Option<&str>) -> Self {
        match conclusion {
            Some("success") => Self::Success,
            Some("failure") => Self::Failure,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CCTray `activity` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activity {
    Sleeping,
    Building,
    CheckingModifications,
    Unknown,
}

impl Activity {
    /// Map a GitHub Actions job status.
    pub fn from_status(status: &str) -> Self {
        match status {
            "completed" => Self::Sleeping,
            "in_progress" => Self::Building,
            "queued" => Self::CheckingModifications,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sleeping => "Sleeping",
            Self::Building => "Building",
            Self::CheckingModifications => "CheckingModifications",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the feed: the latest result of a single job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub last_build_status: BuildStatus,
    pub last_build_time: String,
    pub activity: Activity,
    pub web_url: String,
    pub last_build_label: String,
}

impl Project {
    pub fn from_job(repository: &str, job: &Job) -> Self {
        Self {
            name: project_name(repository, &job.name),
            last_build_status: BuildStatus::from_conclusion(job.conclusion.as_deref()),
            last_build_time: job
                .last_build_time()
                .map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            activity: Activity::from_status(&job.status),
            web_url: job.html_url.clone(),
            last_build_label: build_label(&job.head_sha),
        }
    }
}

pub fn project_name(repository: &str, job: &str) -> String {
    format!("{repository} :: {job}")
}

/// Short commit label shown on dashboards.
pub fn build_label(sha: &str) -> String {
    sha.chars().take(LABEL_LENGTH).collect()
}

/// One project per job, in repository, workflow, then job order.
pub fn flatten(repositories: &[Repository]) -> Vec<Project> {
    repositories
        .iter()
        .flat_map(|repository| {
            repository
                .workflows
                .iter()
                .flat_map(|workflow| workflow.jobs.iter())
                .map(|job| Project::from_job(&repository.name, job))
        })
        .collect()
}

/// Serialize projects as a CCTray document.
///
/// `pretty` puts each `Project` on its own line, indented by two spaces.
pub fn render_xml(projects: &[Project], pretty: bool) -> Result<String> {
    let mut writer = if pretty {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2)
    } else {
        Writer::new(Cursor::new(Vec::new()))
    };

    writer.write_event(Event::Start(BytesStart::new("Projects")))?;
    for project in projects {
        let mut element = BytesStart::new("Project");
        element.push_attribute(("name", project.name.as_str()));
        element.push_attribute(("lastBuildStatus", project.last_build_status.as_str()));
        element.push_attribute(("lastBuildTime", project.last_build_time.as_str()));
        element.push_attribute(("activity", project.activity.as_str()));
        element.push_attribute(("webUrl", project.web_url.as_str()));
        element.push_attribute(("lastBuildLabel", project.last_build_label.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Projects")))?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}
