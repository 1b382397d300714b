//! Report types for export passes and imports
//!
//! Non-fatal outcomes are values here, not errors: a refused import or an
//! encoding loss is something to tell the user about, not a failure.

use vbsync_fs::NormalizedPath;

use crate::resolver::OrphanDecision;

/// Something the user should know about that did not stop the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Characters the legacy code page cannot hold were replaced by `?`
    EncodingLoss { component: String, chars: Vec<char> },
    /// The file declared a different `VB_Name` than its file name
    NameRewritten { component: String, declared: String },
    /// The file uses the flat layout
    LegacyLayout { path: NormalizedPath },
    /// The local file was in the legacy code page and was rewritten as UTF-8
    ConvertedToUtf8 { path: NormalizedPath },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EncodingLoss { component, chars } => {
                let chars: String = chars.iter().collect();
                write!(
                    f,
                    "{}: characters not representable in the host encoding were replaced by '?': {}",
                    component, chars
                )
            }
            Self::NameRewritten {
                component,
                declared,
            } => write!(
                f,
                "{}: file declared VB_Name \"{}\", imported under the file name",
                component, declared
            ),
            Self::LegacyLayout { path } => {
                write!(f, "{}: flat layout, move it into a document folder", path)
            }
            Self::ConvertedToUtf8 { path } => write!(f, "{}: converted to UTF-8", path),
        }
    }
}

/// How one document's export pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// Fingerprint unchanged, only orphans were checked
    NoChange,
    /// Components were compared and written
    Synced,
    /// The user cancelled at the conflict prompt
    Cancelled,
    /// The document could not be processed
    Failed,
}

/// Outcome of one document's export pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub document: String,
    pub status: PassStatus,
    /// Components whose local file was written
    pub written: Vec<String>,
    /// Differing components the resolver chose to keep locally
    pub skipped: Vec<String>,
    /// Local files without host component, and what was done with them
    pub orphans: Vec<(String, OrphanDecision)>,
    /// Outcomes of orphans imported back into the host
    pub imports: Vec<ImportReport>,
    /// Per-component failures
    pub errors: Vec<String>,
}

impl DocumentReport {
    pub fn new(document: impl Into<String>, status: PassStatus) -> Self {
        Self {
            document: document.into(),
            status,
            written: Vec::new(),
            skipped: Vec::new(),
            orphans: Vec::new(),
            imports: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn failed(document: impl Into<String>, error: String) -> Self {
        let mut report = Self::new(document, PassStatus::Failed);
        report.errors.push(error);
        report
    }
}

/// Outcome of an export pass over every open document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub documents: Vec<DocumentReport>,
}

impl SyncReport {
    pub fn document(&self, name: &str) -> Option<&DocumentReport> {
        self.documents.iter().find(|d| d.document == name)
    }

    /// True when no document failed and no component reported an error.
    pub fn is_success(&self) -> bool {
        self.documents
            .iter()
            .all(|d| d.status != PassStatus::Failed && d.errors.is_empty())
    }

    pub fn written_count(&self) -> usize {
        self.documents.iter().map(|d| d.written.len()).sum()
    }
}

/// What an import did to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A new component was added
    Created,
    /// An existing component was removed and imported again
    Replaced,
    /// A document module's code was replaced in place
    Rewritten,
    /// File and host text are equal; nothing was done
    Unchanged,
    /// The resolver declined to replace the host text
    Declined,
    /// Document modules need `force`; nothing was done
    Refused,
}

impl ImportOutcome {
    /// True when the host was modified.
    pub fn changed_host(self) -> bool {
        matches!(self, Self::Created | Self::Replaced | Self::Rewritten)
    }
}

/// Outcome of importing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub document: String,
    pub name: String,
    pub path: NormalizedPath,
    pub outcome: ImportOutcome,
    pub warnings: Vec<Warning>,
}

/// Outcome of importing a whole sync tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imports: Vec<ImportReport>,
    /// Files that failed, with the reason
    pub failed: Vec<(NormalizedPath, String)>,
}

impl ImportSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn count(&self, outcome: ImportOutcome) -> usize {
        self.imports.iter().filter(|r| r.outcome == outcome).count()
    }
}
