use anyhow::Result;
use std::io::Write;

use crate::cctray::{render_xml, Project};
use crate::config::OutputFormat;

use super::tables::render_table;

/// Exports the dashboard feed in the requested format.
///
/// - XML: the CCTray document dashboards poll
/// - JSON: programmatic access to the same projects
/// - Table: human-readable terminal view
pub fn export_projects(
    projects: &[Project],
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Xml => export_xml(projects, pretty, output),
        OutputFormat::Json => export_json(projects, pretty, output),
        OutputFormat::Table => {
            writeln!(output, "{}", render_table(projects))?;
            Ok(())
        }
    }
}

fn export_xml(projects: &[Project], pretty: bool, output: &mut dyn Write) -> Result<()> {
    let xml = render_xml(projects, pretty)?;
    writeln!(output, "{xml}")?;
    Ok(())
}

fn export_json(projects: &[Project], pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(projects)?
    } else {
        serde_json::to_string(projects)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}
