//! Export command implementation

use colored::Colorize;

use super::output::print_sync_report;
use super::{CommandContext, ensure_dir, resolver};
use crate::error::{CliError, Result};

/// Run the export command
///
/// Writes every component of every open document into the sync directory.
/// With `yes`, differing local files are overwritten without asking.
pub fn run_export(ctx: &CommandContext, force: bool, yes: bool) -> Result<()> {
    ensure_dir(&ctx.dir)?;
    let settings = ctx.settings()?;
    println!(
        "{} Exporting {} to {}",
        "=>".blue().bold(),
        ctx.file.display(),
        ctx.dir.display()
    );

    let mut engine = ctx.connect(&settings, resolver(yes), force)?;
    let report = engine.export_all()?;
    print_sync_report(&report);

    if !report.is_success() {
        return Err(CliError::user("Export finished with errors"));
    }
    println!("{} {} module(s) exported", "OK".green().bold(), report.written_count());
    Ok(())
}
