//! Import command implementation

use colored::Colorize;

use super::output::print_import_summary;
use super::{CommandContext, resolver};
use crate::error::{CliError, Result};

/// Run the import command
///
/// Imports every component file under the sync directory into the host.
pub fn run_import(ctx: &CommandContext, force: bool, yes: bool) -> Result<()> {
    if !ctx.dir.is_dir() {
        return Err(CliError::user(format!(
            "Input directory {} does not exist",
            ctx.dir.display()
        )));
    }
    let settings = ctx.settings()?;
    println!(
        "{} Importing {} into {}",
        "=>".blue().bold(),
        ctx.dir.display(),
        ctx.file.display()
    );

    let mut engine = ctx.connect(&settings, resolver(yes), force)?;
    let summary = engine.import_all()?;
    print_import_summary(&summary);

    if !summary.is_success() {
        return Err(CliError::user(format!(
            "{} file(s) could not be imported",
            summary.failed.len()
        )));
    }
    Ok(())
}
