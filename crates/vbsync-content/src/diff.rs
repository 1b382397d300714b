//! Unified diffs for conflict prompts

use similar::{ChangeTag, TextDiff};

use crate::compare::normalize;

/// Context lines shown around each change.
const CONTEXT_RADIUS: usize = 3;

/// Render a unified diff from the host's text to the local file's text.
///
/// Both sides are normalized first so that line-ending and trailing
/// whitespace noise never shows up in a prompt.
pub fn unified_diff(name: &str, external: &str, local: &str) -> String {
    let external = with_final_newline(normalize(external));
    let local = with_final_newline(normalize(local));
    TextDiff::from_lines(&external, &local)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(&format!("host/{}", name), &format!("local/{}", name))
        .to_string()
}

fn with_final_newline(mut text: String) -> String {
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// Line counts of a diff, for one-line summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub inserted: usize,
    pub deleted: usize,
}

impl DiffSummary {
    /// Count lines the local text adds and removes relative to the host text.
    pub fn compute(external: &str, local: &str) -> Self {
        let external = with_final_newline(normalize(external));
        let local = with_final_newline(normalize(local));
        let diff = TextDiff::from_lines(&external, &local);

        let mut summary = Self::default();
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => summary.inserted += 1,
                ChangeTag::Delete => summary.deleted += 1,
                ChangeTag::Equal => {}
            }
        }
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{} -{}", self.inserted, self.deleted)
    }
}
