mod exports;
mod styling;
mod tables;

use console::Term;

pub use exports::export_projects;
use styling::{dim, magenta_bold};

/// Prints the banner to stderr.
///
/// Nothing is printed unless stderr is an attended terminal.
pub fn print_banner() {
    if !Term::stderr().features().is_attended() {
        return;
    }

    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("📡 actions-cctray"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitHub Actions to CCTray feed")
    );
}
