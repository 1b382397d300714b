//! Edit command implementation
//!
//! Exports once, then imports every saved file until interrupted. With
//! `--bidirectional` host changes are exported back on a fixed period.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use colored::Colorize;
use signal_hook::consts::{SIGINT, SIGTERM};
use vbsync_core::{EventSink, LiveSession, SessionEvent, SessionOptions};

use super::output::{print_import, print_sync_report};
use super::{CommandContext, ensure_dir, resolver};
use crate::error::{CliError, Result};

const STOP_POLL: Duration = Duration::from_millis(200);

/// Run the edit command
pub fn run_edit(
    ctx: &CommandContext,
    force: bool,
    yes: bool,
    bidirectional: bool,
) -> Result<()> {
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

    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&stop))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&stop))?;
    let lost = Arc::new(AtomicBool::new(false));

    let options = SessionOptions {
        debounce: settings.debounce(),
        poll_interval: bidirectional.then(|| settings.poll_interval()),
    };
    let session = LiveSession::start(engine, options, sink(Arc::clone(&stop), Arc::clone(&lost)))?;

    println!();
    println!(
        "{} Watching {}{}. Press Ctrl+C to stop.",
        "=>".blue().bold(),
        ctx.dir.display(),
        if session.is_bidirectional() {
            " (bidirectional)"
        } else {
            ""
        }
    );

    while !stop.load(Ordering::SeqCst) {
        thread::sleep(STOP_POLL);
    }
    session.stop();

    if lost.load(Ordering::SeqCst) {
        return Err(CliError::user("Lost the connection to the host"));
    }
    println!("{} Session ended.", "OK".green().bold());
    Ok(())
}

/// Print session events; a fatal error ends the session.
fn sink(stop: Arc<AtomicBool>, lost: Arc<AtomicBool>) -> EventSink {
    Arc::new(move |event: SessionEvent| {
        let error = match event {
            SessionEvent::Imported(report) => {
                if report.outcome.changed_host() || !report.warnings.is_empty() {
                    println!("{} {}", "<=".blue().bold(), report.path);
                    print_import(&report);
                }
                return;
            }
            SessionEvent::Exported(report) => {
                if report.written_count() > 0 || !report.is_success() {
                    println!("{} host changed", "=>".blue().bold());
                    print_sync_report(&report);
                }
                return;
            }
            SessionEvent::ImportFailed { path, error } => {
                println!("{} {}: {}", "error:".red().bold(), path.display(), error);
                error
            }
            SessionEvent::ExportFailed(error) => {
                println!("{} {}", "error:".red().bold(), error);
                error
            }
        };
        if error.is_fatal() {
            lost.store(true, Ordering::SeqCst);
            stop.store(true, Ordering::SeqCst);
        }
    })
}
