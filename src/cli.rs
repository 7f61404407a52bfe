use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::cctray;
use crate::config::{Config, OutputFormat, Overrides, Settings};
use crate::output::export_projects;
use crate::providers::GitHubProvider;

#[derive(Parser)]
#[command(name = "actions-cctray")]
#[command(
    author,
    version,
    about = "Renders a team's latest GitHub Actions job statuses as a CCTray XML feed",
    long_about = None
)]
pub struct Cli {
    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Team slug whose repositories are monitored
    #[arg(long, env = "GITHUB_TEAM")]
    team: Option<String>,

    /// Organisation owning the team
    #[arg(long, env = "GITHUB_ORGANISATION")]
    organisation: Option<String>,

    /// GitHub API base URL [default: https://api.github.com]
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Indent XML and JSON output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Write the feed to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            token: self.token.clone(),
            team: self.team.clone(),
            organisation: self.organisation.clone(),
            base_url: self.api_url.clone(),
            format: self.format,
            pretty: self.pretty,
        }
    }

    fn settings(&self) -> Result<Settings> {
        let config = Config::load(self.config.as_deref())?.apply(self.overrides());
        Ok(Settings::resolve(config)?)
    }

    pub async fn execute(&self) -> Result<()> {
        let settings = self.settings()?;
        info!(
            "Building feed for team {}/{} from {}",
            settings.organisation, settings.team, settings.base_url
        );

        let provider = GitHubProvider::from_settings(&settings)?;
        let repositories = provider
            .collect_repositories()
            .await
            .context("Failed to collect GitHub Actions status")?;
        let projects = cctray::flatten(&repositories);

        if let Some(output_path) = &self.output {
            let file = File::create(output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?;
            let mut writer = BufWriter::new(file);
            export_projects(&projects, settings.format, settings.pretty, &mut writer)?;
            writer.flush()?;
            info!("Feed written to: {}", output_path.display());
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            export_projects(&projects, settings.format, settings.pretty, &mut handle)?;
        }

        info!("Rendered {} projects", projects.len());
        Ok(())
    }
}
