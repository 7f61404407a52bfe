use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::cctray::{Activity, BuildStatus, Project};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn color_coded_status_cell(status: BuildStatus) -> Cell {
    let cell = Cell::new(status);
    match status {
        BuildStatus::Success => cell.fg(TableColor::Green),
        BuildStatus::Failure => cell.fg(TableColor::Red),
        BuildStatus::Unknown => cell.fg(TableColor::Yellow),
    }
}

pub fn color_coded_activity_cell(activity: Activity) -> Cell {
    let cell = Cell::new(activity);
    match activity {
        Activity::Building | Activity::CheckingModifications => cell.fg(TableColor::Cyan),
        Activity::Sleeping | Activity::Unknown => cell,
    }
}

/// One row per project, in feed order.
pub fn render_table(projects: &[Project]) -> Table {
    let mut table = create_table();
    table.set_header(
        ["Project", "Status", "Activity", "Last Build", "Label", "URL"]
            .iter()
            .map(|label| Cell::new(*label).fg(TableColor::Cyan)),
    );

    for project in projects {
        table.add_row(vec![
            Cell::new(&project.name),
            color_coded_status_cell(project.last_build_status),
            color_coded_activity_cell(project.activity),
            Cell::new(&project.last_build_time),
            Cell::new(&project.last_build_label),
            Cell::new(&project.web_url),
        ]);
    }

    table
}
