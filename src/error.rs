use thiserror::Error;

#[derive(Error, Debug)]
pub enum CctrayError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("API request to {url} failed with status {status}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Workflow {workflow_id} in repository {repo} has no runs")]
    NoWorkflowRuns { repo: String, workflow_id: u64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("XML serialization error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Rendered output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, CctrayError>;
