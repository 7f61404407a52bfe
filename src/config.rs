use anyhow::{Context, Result};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::auth::Token;
use crate::error::CctrayError;

const CONFIG_CANDIDATES: [&str; 4] = [
    "actions-cctray.toml",
    "actions-cctray.json",
    "actions-cctray.yaml",
    "actions-cctray.yml",
];

/// Configuration file structure.
///
/// Every value can also be given on the command line or through the
/// environment; those take precedence over the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// GitHub connection settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub personal access token
    pub token: Option<String>,

    /// Team slug whose repositories are monitored
    pub team: Option<String>,

    /// Organisation owning the team
    pub organisation: Option<String>,

    /// GitHub API base URL
    #[serde(default = "default_github_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Indent XML and JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CCTray XML feed
    #[default]
    Xml,
    /// JSON array of projects
    Json,
    /// Human-readable table
    Table,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            team: None,
            organisation: None,
            base_url: default_github_base_url(),
        }
    }
}

fn default_github_base_url() -> String {
    "https://api.github.com".to_string()
}

/// Values given on the command line or through environment variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub team: Option<String>,
    pub organisation: Option<String>,
    pub base_url: Option<String>,
    pub format: Option<OutputFormat>,
    pub pretty: bool,
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./actions-cctray.toml, .json, .yaml, .yml
    /// 3. `<user config dir>/actions-cctray/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let user_config = dirs::config_dir().map(|dir| dir.join("actions-cctray/config.toml"));
        let found = discover(Path::new(".")).or(user_config.filter(|path| path.exists()));

        match found {
            Some(path) => Self::load_from_path(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }

    /// Layer command line and environment values over the file values.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if overrides.token.is_some() {
            self.github.token = overrides.token;
        }
        if overrides.team.is_some() {
            self.github.team = overrides.team;
        }
        if overrides.organisation.is_some() {
            self.github.organisation = overrides.organisation;
        }
        if let Some(base_url) = overrides.base_url {
            self.github.base_url = base_url;
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        self.output.pretty |= overrides.pretty;
        self
    }
}

/// First configuration file candidate present in `dir`.
fn discover(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|path| path.exists())
}

/// Validated configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: Token,
    pub team: String,
    pub organisation: String,
    pub base_url: Url,
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Settings {
    /// Check that every required value is present.
    ///
    /// # Errors
    ///
    /// Returns [`CctrayError::Config`] naming the first missing value, or if
    /// the API base URL does not parse.
    pub fn resolve(config: Config) -> crate::error::Result<Self> {
        let github = config.github;

        let token = required(github.token, "GITHUB_TOKEN", "--token")?;
        let team = required(github.team, "GITHUB_TEAM", "--team")?;
        let organisation = required(github.organisation, "GITHUB_ORGANISATION", "--organisation")?;
        let base_url = Url::parse(&github.base_url).map_err(|e| {
            CctrayError::Config(format!("Invalid API base URL {}: {e}", github.base_url))
        })?;

        Ok(Self {
            token: Token::from(token),
            team,
            organisation,
            base_url,
            format: config.output.format,
            pretty: config.output.pretty,
        })
    }
}

fn required(value: Option<String>, env: &str, flag: &str) -> crate::error::Result<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| CctrayError::Config(format!("{env} is not set (or pass {flag})")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn complete_overrides() -> Overrides {
        Overrides {
            token: Some("ghp_test".to_string()),
            team: Some("platform".to_string()),
            organisation: Some("acme".to_string()),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.base_url, "https://api.github.com");
        assert!(config.github.token.is_none());
        assert_eq!(config.output.format, OutputFormat::Xml);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[github]
token = "ghp_file_token"
team = "platform"
organisation = "acme"
base-url = "https://github.example.com/api/v3"

[output]
format = "table"
pretty = true
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load(Some(temp_file.path())).unwrap();
        assert_eq!(config.github.token, Some("ghp_file_token".to_string()));
        assert_eq!(config.github.team, Some("platform".to_string()));
        assert_eq!(config.github.organisation, Some("acme".to_string()));
        assert_eq!(config.github.base_url, "https://github.example.com/api/v3");
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "github": {
    "team": "mobile"
  },
  "output": {
    "format": "json"
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.github.team, Some("mobile".to_string()));
        assert_eq!(config.github.base_url, "https://api.github.com");
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yml").unwrap();
        write!(temp_file, "github:\n  organisation: acme\n").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.github.organisation, Some("acme".to_string()));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = Config::load(Some(Path::new("does-not-exist.toml")));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file"));
    }

    #[test]
    fn test_discover_prefers_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(discover(temp_dir.path()).is_none());

        std::fs::write(temp_dir.path().join("actions-cctray.yaml"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("actions-cctray.toml"), "").unwrap();

        assert_eq!(
            discover(temp_dir.path()),
            Some(temp_dir.path().join("actions-cctray.toml"))
        );
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = Config::default();
        config.github.token = Some("ghp_file".to_string());
        config.github.team = Some("file-team".to_string());

        let config = config.apply(Overrides {
            token: Some("ghp_env".to_string()),
            format: Some(OutputFormat::Json),
            pretty: true,
            ..Overrides::default()
        });

        assert_eq!(config.github.token, Some("ghp_env".to_string()));
        assert_eq!(config.github.team, Some("file-team".to_string()));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_resolve_settings() {
        let settings = Settings::resolve(Config::default().apply(complete_overrides())).unwrap();

        assert_eq!(settings.token.as_str(), "ghp_test");
        assert_eq!(settings.team, "platform");
        assert_eq!(settings.organisation, "acme");
        assert_eq!(settings.base_url.as_str(), "https://api.github.com/");
        assert_eq!(settings.format, OutputFormat::Xml);
    }

    #[test]
    fn test_resolve_reports_missing_variable() {
        let overrides = Overrides {
            team: None,
            ..complete_overrides()
        };
        let err = Settings::resolve(Config::default().apply(overrides)).unwrap_err();

        assert!(matches!(err, CctrayError::Config(_)));
        assert!(err.to_string().contains("GITHUB_TEAM"));
    }

    #[test]
    fn test_resolve_treats_blank_token_as_missing() {
        let overrides = Overrides {
            token: Some("  ".to_string()),
            ..complete_overrides()
        };
        let err = Settings::resolve(Config::default().apply(overrides)).unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_resolve_rejects_invalid_base_url() {
        let overrides = Overrides {
            base_url: Some("not a url".to_string()),
            ..complete_overrides()
        };
        let err = Settings::resolve(Config::default().apply(overrides)).unwrap_err();
        assert!(err.to_string().contains("Invalid API base URL"));
    }

    #[test]
    fn test_settings_debug_hides_token() {
        let settings = Settings::resolve(Config::default().apply(complete_overrides())).unwrap();
        assert!(!format!("{settings:?}").contains("ghp_test"));
    }
}
