//! Conflict resolution
//!
//! The engine never decides on its own whether local edits may be
//! overwritten. It collects the differences and asks a [`ConflictResolver`].
//! Resolvers have no access to the host; they only see texts and names.

use std::collections::{BTreeMap, HashSet, VecDeque};

use vbsync_content::{DiffSummary, unified_diff};
use vbsync_fs::{ComponentKind, NormalizedPath};

use crate::model::DocumentInfo;

/// One component whose local and host texts were compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub name: String,
    pub kind: ComponentKind,
    /// Text of the local file
    pub local_text: String,
    /// Host text with framing stripped
    pub external_text: String,
    pub differ: bool,
}

impl Change {
    /// Unified diff from the host text to the local text.
    pub fn diff(&self) -> String {
        unified_diff(&self.name, &self.external_text, &self.local_text)
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary::compute(&self.external_text, &self.local_text)
    }
}

/// Changes collected during one document's export pass, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: BTreeMap<String, Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, change: Change) {
        self.changes.insert(change.name.clone(), change);
    }

    pub fn get(&self, name: &str) -> Option<&Change> {
        self.changes.get(name)
    }

    /// Changes whose texts differ, ordered by name.
    pub fn differing(&self) -> impl Iterator<Item = &Change> {
        self.changes.values().filter(|c| c.differ)
    }

    pub fn has_conflicts(&self) -> bool {
        self.differing().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// A local file with no matching host component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub name: String,
    pub kind: ComponentKind,
    pub path: NormalizedPath,
}

/// What to do with local files that differ from the host during export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDecision {
    /// Replace every differing local file with the host text
    OverwriteAll,
    /// Keep every differing local file
    SkipAll,
    /// Replace only the named components
    PerItem(HashSet<String>),
    /// Abort this document's pass
    Cancel,
}

impl ExportDecision {
    /// Whether the differing component `name` gets the host text.
    pub fn overwrites(&self, name: &str) -> bool {
        match self {
            Self::OverwriteAll => true,
            Self::SkipAll | Self::Cancel => false,
            Self::PerItem(names) => names.contains(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanDecision {
    /// Delete the local file
    Delete,
    /// Import the local file into the host
    ImportBack,
    /// Leave the local file alone
    Keep,
}

/// Human-in-the-loop decisions.
///
/// Every implementation must default to the safe answer: keep local files,
/// decline imports, keep orphans.
pub trait ConflictResolver: Send {
    /// Decide what happens to local files that differ from the host.
    fn resolve_export(&mut self, document: &DocumentInfo, changes: &ChangeSet) -> ExportDecision;

    /// Confirm replacing a host component whose text differs from the file.
    fn confirm_import(&mut self, document: &DocumentInfo, change: &Change) -> bool;

    /// Decide what happens to a local file the host no longer has.
    fn resolve_orphan(&mut self, document: &DocumentInfo, orphan: &Orphan) -> OrphanDecision;
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for Box<R> {
    fn resolve_export(&mut self, document: &DocumentInfo, changes: &ChangeSet) -> ExportDecision {
        (**self).resolve_export(document, changes)
    }

    fn confirm_import(&mut self, document: &DocumentInfo, change: &Change) -> bool {
        (**self).confirm_import(document, change)
    }

    fn resolve_orphan(&mut self, document: &DocumentInfo, orphan: &Orphan) -> OrphanDecision {
        (**self).resolve_orphan(document, orphan)
    }
}

/// Answers yes to every overwrite and import, keeps orphans.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ConflictResolver for AssumeYes {
    fn resolve_export(&mut self, _: &DocumentInfo, _: &ChangeSet) -> ExportDecision {
        ExportDecision::OverwriteAll
    }

    fn confirm_import(&mut self, _: &DocumentInfo, _: &Change) -> bool {
        true
    }

    fn resolve_orphan(&mut self, _: &DocumentInfo, _: &Orphan) -> OrphanDecision {
        OrphanDecision::Keep
    }
}

/// Never overwrites anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepLocal;

impl ConflictResolver for KeepLocal {
    fn resolve_export(&mut self, _: &DocumentInfo, _: &ChangeSet) -> ExportDecision {
        ExportDecision::SkipAll
    }

    fn confirm_import(&mut self, _: &DocumentInfo, _: &Change) -> bool {
        false
    }

    fn resolve_orphan(&mut self, _: &DocumentInfo, _: &Orphan) -> OrphanDecision {
        OrphanDecision::Keep
    }
}

/// Replays queued answers, falling back to the safe answer once a queue
/// runs dry. Records every question it was asked.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    exports: VecDeque<ExportDecision>,
    imports: VecDeque<bool>,
    orphans: VecDeque<OrphanDecision>,
    /// Names of the components each question was about, in order
    pub asked: Vec<String>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn export(mut self, decision: ExportDecision) -> Self {
        self.exports.push_back(decision);
        self
    }

    pub fn import(mut self, confirm: bool) -> Self {
        self.imports.push_back(confirm);
        self
    }

    pub fn orphan(mut self, decision: OrphanDecision) -> Self {
        self.orphans.push_back(decision);
        self
    }
}

impl ConflictResolver for ScriptedResolver {
    fn resolve_export(&mut self, _: &DocumentInfo, changes: &ChangeSet) -> ExportDecision {
        self.asked
            .extend(changes.differing().map(|c| c.name.clone()));
        self.exports.pop_front().unwrap_or(ExportDecision::SkipAll)
    }

    fn confirm_import(&mut self, _: &DocumentInfo, change: &Change) -> bool {
        self.asked.push(change.name.clone());
        self.imports.pop_front().unwrap_or(false)
    }

    fn resolve_orphan(&mut self, _: &DocumentInfo, orphan: &Orphan) -> OrphanDecision {
        self.asked.push(orphan.name.clone());
        self.orphans.pop_front().unwrap_or(OrphanDecision::Keep)
    }
}
