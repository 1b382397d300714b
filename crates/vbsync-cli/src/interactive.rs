//! Interactive conflict prompts
//!
//! Uses dialoguer for terminal-based selection. A prompt that cannot be shown
//! (no terminal, read error) falls back to the safe answer.

use colored::Colorize;
use dialoguer::{Confirm, Select};
use vbsync_core::{
    Change, ChangeSet, ConflictResolver, DocumentInfo, ExportDecision, Orphan, OrphanDecision,
};

const EXPORT_CHOICES: &[&str] = &[
    "Keep all local files",
    "Overwrite all with the host version",
    "Decide per file",
    "Cancel this document",
];

const ORPHAN_CHOICES: &[&str] = &[
    "Keep the file",
    "Delete the file",
    "Import it back into the host",
];

/// Asks the user on the terminal.
#[derive(Debug, Default)]
pub struct PromptResolver;

impl PromptResolver {
    pub fn new() -> Self {
        Self
    }
}

fn confirm(prompt: String) -> bool {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "prompt failed, answering no");
            false
        })
}

/// Print a unified diff with added lines green and removed lines red.
fn print_diff(change: &Change) {
    for line in change.diff().lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}

impl ConflictResolver for PromptResolver {
    fn resolve_export(&mut self, document: &DocumentInfo, changes: &ChangeSet) -> ExportDecision {
        println!();
        println!(
            "{} {} changed in the host and locally:",
            "CONFLICT".yellow().bold(),
            document.name.cyan()
        );
        for change in changes.differing() {
            println!("   {} {} ({})", "!".yellow(), change.name, change.summary());
        }

        let choice = Select::new()
            .with_prompt("What should happen to the local files?")
            .items(EXPORT_CHOICES)
            .default(0)
            .interact_opt()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "prompt failed, keeping local files");
                None
            });

        match choice {
            Some(1) => ExportDecision::OverwriteAll,
            Some(2) => {
                let mut overwrite = std::collections::HashSet::new();
                for change in changes.differing() {
                    print_diff(change);
                    if confirm(format!("Overwrite local {} with the host version?", change.name)) {
                        overwrite.insert(change.name.clone());
                    }
                }
                ExportDecision::PerItem(overwrite)
            }
            Some(3) => ExportDecision::Cancel,
            _ => ExportDecision::SkipAll,
        }
    }

    fn confirm_import(&mut self, document: &DocumentInfo, change: &Change) -> bool {
        println!();
        println!(
            "{} {} in {} ({})",
            "IMPORT".blue().bold(),
            change.name.cyan(),
            document.name,
            change.summary()
        );
        print_diff(change);
        confirm(format!("Replace {} in the host?", change.name))
    }

    fn resolve_orphan(&mut self, document: &DocumentInfo, orphan: &Orphan) -> OrphanDecision {
        println!();
        println!(
            "{} {} has no component in {}",
            "ORPHAN".yellow().bold(),
            orphan.path.as_str().cyan(),
            document.name
        );
        let choice = Select::new()
            .with_prompt("What should happen to it?")
            .items(ORPHAN_CHOICES)
            .default(0)
            .interact_opt()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "prompt failed, keeping the file");
                None
            });

        match choice {
            Some(1) => OrphanDecision::Delete,
            Some(2) => OrphanDecision::ImportBack,
            _ => OrphanDecision::Keep,
        }
    }
}
