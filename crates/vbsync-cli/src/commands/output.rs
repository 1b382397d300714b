//! Terminal rendering of pass reports

use colored::Colorize;
use vbsync_core::{
    DocumentReport, ImportOutcome, ImportReport, ImportSummary, OrphanDecision, PassStatus,
    SyncReport,
};

fn outcome_label(outcome: ImportOutcome) -> &'static str {
    match outcome {
        ImportOutcome::Created => "created",
        ImportOutcome::Replaced => "replaced",
        ImportOutcome::Rewritten => "rewritten in place",
        ImportOutcome::Unchanged => "unchanged",
        ImportOutcome::Declined => "kept host version",
        ImportOutcome::Refused => "document module, use --force",
    }
}

pub fn print_sync_report(report: &SyncReport) {
    for document in &report.documents {
        print_document(document);
    }
}

fn print_document(report: &DocumentReport) {
    match report.status {
        PassStatus::NoChange => {
            println!("{} {}: no changes in the host", "OK".green().bold(), report.document);
        }
        PassStatus::Synced => {
            let label = if report.errors.is_empty() {
                "OK".green().bold()
            } else {
                "PARTIAL".yellow().bold()
            };
            println!(
                "{} {}: {} written, {} kept local",
                label,
                report.document,
                report.written.len(),
                report.skipped.len()
            );
            for name in &report.written {
                println!("   {} {}", "+".green(), name);
            }
            for name in &report.skipped {
                println!("   {} {} {}", "=".yellow(), name, "(local edits kept)".dimmed());
            }
        }
        PassStatus::Cancelled => {
            println!("{} {}: cancelled, will ask again", "SKIP".yellow().bold(), report.document);
        }
        PassStatus::Failed => {
            println!("{} {}", "FAILED".red().bold(), report.document);
        }
    }

    for (name, decision) in &report.orphans {
        let action = match decision {
            OrphanDecision::Keep => "kept",
            OrphanDecision::Delete => "deleted",
            OrphanDecision::ImportBack => "imported back",
        };
        println!("   {} {} {}", "?".yellow(), name, format!("(orphan, {})", action).dimmed());
    }
    for import in &report.imports {
        print_import(import);
    }
    for error in &report.errors {
        println!("   {} {}", "!".red(), error);
    }
}

pub fn print_import(report: &ImportReport) {
    let marker = if report.outcome.changed_host() {
        "+".green()
    } else {
        "=".dimmed()
    };
    println!(
        "   {} {} {}",
        marker,
        report.name,
        format!("({})", outcome_label(report.outcome)).dimmed()
    );
    for warning in &report.warnings {
        println!("   {} {}", "warning:".yellow().bold(), warning);
    }
}

pub fn print_import_summary(summary: &ImportSummary) {
    for import in &summary.imports {
        print_import(import);
    }
    for (path, reason) in &summary.failed {
        println!("   {} {}: {}", "!".red(), path, reason);
    }

    let changed = summary
        .imports
        .iter()
        .filter(|r| r.outcome.changed_host())
        .count();
    if changed == 0 && summary.failed.is_empty() {
        println!("{} Nothing to import.", "OK".green().bold());
    } else {
        println!("{} {} module(s) imported", "OK".green().bold(), changed);
    }
}
