//! SyncEngine implementation
//!
//! An export pass walks every open document through
//! `Hashing -> (NoChange | Comparing) -> Resolving? -> Writing`. Imports go the
//! other way, one file at a time, and never leave the host without a
//! component that existed before the import started.

use std::collections::HashSet;
use std::path::Path;

use vbsync_content::{
    LegacyCodec, TextSource, code_body, decode_local, declared_name, differ, restore_for,
    strip_for,
};
use vbsync_fs::{ComponentKind, DirectoryMapper, MappedFile, NormalizedPath, fingerprint, io};

use super::report::{
    DocumentReport, ImportOutcome, ImportReport, ImportSummary, PassStatus, SyncReport, Warning,
};
use super::state::SyncState;
use crate::host::{ComponentStore, DocumentOracle};
use crate::model::DocumentInfo;
use crate::resolver::{
    Change, ChangeSet, ConflictResolver, ExportDecision, Orphan, OrphanDecision,
};
use crate::{Error, Result};

/// Options for export and import
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Allow imports into document modules (rewrites their code in place)
    pub force: bool,
}

/// A host component read during the hashing step.
struct HostBody {
    name: String,
    kind: ComponentKind,
    raw: String,
}

/// Result of the hashing step.
struct HostRead {
    bodies: Vec<HostBody>,
    /// Lowercased names of every listed component, readable or not
    host_names: HashSet<String>,
    complete: bool,
}

/// A host component queued for the writing step.
struct Pending {
    name: String,
    path: NormalizedPath,
    external: String,
    /// Local text, `None` when the file does not exist
    local: Option<String>,
}

/// Engine that keeps the host and the sync tree in step
///
/// Owns the host connection, the layout, the conflict resolver and the
/// per-document fingerprints. Wrap it in a mutex to share it between the
/// file watcher and the reverse-export loop.
pub struct SyncEngine {
    oracle: Box<dyn DocumentOracle>,
    mapper: DirectoryMapper,
    resolver: Box<dyn ConflictResolver>,
    codec: LegacyCodec,
    options: SyncOptions,
    state: SyncState,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Arguments
    ///
    /// * `oracle` - Access to the host's documents
    /// * `mapper` - Layout of the sync tree
    /// * `resolver` - Who decides conflicts
    pub fn new(
        oracle: impl DocumentOracle + 'static,
        mapper: DirectoryMapper,
        resolver: impl ConflictResolver + 'static,
    ) -> Self {
        Self {
            oracle: Box::new(oracle),
            mapper,
            resolver: Box::new(resolver),
            codec: LegacyCodec::default(),
            options: SyncOptions::default(),
            state: SyncState::new(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_codec(mut self, codec: LegacyCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn mapper(&self) -> &DirectoryMapper {
        &self.mapper
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Attach to the host.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] or [`Error::Permission`]; both are fatal.
    pub fn connect(&mut self) -> Result<()> {
        self.oracle.connect()
    }

    pub fn list_documents(&self) -> Result<Vec<DocumentInfo>> {
        self.oracle.list_documents()
    }

    /// Export every open document.
    ///
    /// Failures are isolated per document and reported; only connection-level
    /// errors abort the pass.
    pub fn export_all(&mut self) -> Result<SyncReport> {
        let documents = self.oracle.list_documents()?;
        tracing::info!(documents = documents.len(), root = %self.mapper.root(), "export pass");

        let mut report = SyncReport::default();
        for document in &documents {
            match self.export_document(document) {
                Ok(doc_report) => report.documents.push(doc_report),
                Err(e) if e.is_fatal() => return Err(e),
                Err(Error::ConflictCancelled { document }) => {
                    tracing::info!(document = %document, "export cancelled, fingerprint kept");
                    report
                        .documents
                        .push(DocumentReport::new(document, PassStatus::Cancelled));
                }
                Err(e) => {
                    tracing::error!(document = %document, error = %e, "export failed");
                    report
                        .documents
                        .push(DocumentReport::failed(&document.name, e.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// Export one document.
    ///
    /// # Errors
    ///
    /// [`Error::ConflictCancelled`] when the resolver cancels; the document's
    /// fingerprint is left untouched so the next pass asks again.
    pub fn export_document(&mut self, document: &DocumentInfo) -> Result<DocumentReport> {
        let mut report = DocumentReport::new(&document.name, PassStatus::Synced);

        // Hashing
        let HostRead {
            bodies,
            host_names,
            complete,
        } = {
            let store = self.oracle.component_store(document)?;
            read_bodies(store.as_ref(), document, &mut report)?
        };
        let hash = fingerprint(bodies.iter().map(|b| (b.name.as_str(), b.raw.as_str())));

        if complete && self.state.last_hash(&document.name) == Some(hash.as_str()) {
            tracing::debug!(document = %document, "fingerprint unchanged");
            report.status = PassStatus::NoChange;
            self.sync_orphans(document, &host_names, &mut report)?;
            return Ok(report);
        }

        // Comparing
        let mut changes = ChangeSet::new();
        let mut pending = Vec::with_capacity(bodies.len());
        for body in bodies {
            let path = self
                .mapper
                .component_path(&document.folder_name, &body.name, body.kind);
            let external = strip_for(body.kind, &body.raw);
            let local = if path.is_file() {
                match io::read_bytes(&path) {
                    Ok(bytes) => Some(decode_local(&bytes, &self.codec).0),
                    Err(e) => {
                        tracing::error!(path = %path, error = %e, "cannot read local file");
                        report.errors.push(format!("{}: {}", body.name, e));
                        continue;
                    }
                }
            } else {
                None
            };

            if let Some(local) = &local {
                changes.insert(Change {
                    name: body.name.clone(),
                    kind: body.kind,
                    local_text: local.clone(),
                    external_text: external.clone(),
                    differ: differ(local, &external),
                });
            }
            pending.push(Pending {
                name: body.name,
                path,
                external,
                local,
            });
        }

        // Resolving
        let decision = if changes.has_conflicts() {
            let decision = self.resolver.resolve_export(document, &changes);
            if decision == ExportDecision::Cancel {
                return Err(Error::ConflictCancelled {
                    document: document.name.clone(),
                });
            }
            decision
        } else {
            ExportDecision::OverwriteAll
        };

        // Writing
        for item in pending {
            let differs = changes.get(&item.name).is_some_and(|c| c.differ);
            if item.local.is_some() && !differs {
                continue;
            }
            if differs && !decision.overwrites(&item.name) {
                tracing::debug!(component = %item.name, "keeping local edits");
                report.skipped.push(item.name);
                continue;
            }
            match io::write_text(&item.path, &item.external) {
                Ok(()) => {
                    tracing::debug!(path = %item.path, "exported");
                    report.written.push(item.name);
                }
                Err(e) => {
                    tracing::error!(path = %item.path, error = %e, "export failed");
                    report.errors.push(format!("{}: {}", item.name, e));
                }
            }
        }

        self.sync_orphans(document, &host_names, &mut report)?;

        if complete {
            self.state.record(&document.name, hash);
        }
        tracing::info!(
            document = %document,
            written = report.written.len(),
            skipped = report.skipped.len(),
            "document exported"
        );
        Ok(report)
    }

    /// Offer every local file without a host component to the resolver.
    fn sync_orphans(
        &mut self,
        document: &DocumentInfo,
        host_names: &HashSet<String>,
        report: &mut DocumentReport,
    ) -> Result<()> {
        let orphans: Vec<MappedFile> = self
            .mapper
            .scan_document(&document.folder_name)?
            .into_iter()
            .filter(|f| !host_names.contains(&f.name.to_ascii_lowercase()))
            .collect();

        for file in orphans {
            let orphan = Orphan {
                name: file.name.clone(),
                kind: file.kind,
                path: file.path.clone(),
            };
            let decision = self.resolver.resolve_orphan(document, &orphan);
            tracing::debug!(path = %file.path, ?decision, "orphaned local file");

            match decision {
                OrphanDecision::Delete => {
                    if let Err(e) = io::remove_file(&file.path) {
                        report.errors.push(format!("{}: {}", file.name, e));
                    }
                }
                OrphanDecision::ImportBack => match self.import_mapped(document, &file) {
                    Ok(import) => report.imports.push(import),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        tracing::error!(path = %file.path, error = %e, "import back failed");
                        report.errors.push(e.to_string());
                    }
                },
                OrphanDecision::Keep => {}
            }
            report.orphans.push((file.name, decision));
        }
        Ok(())
    }

    /// Import one local file into the host.
    ///
    /// # Errors
    ///
    /// - [`Error::ComponentNotFound`] when the path maps to no component
    /// - [`Error::UnknownDocument`] when its folder matches no open document
    /// - [`Error::ImportFailure`] when the host rejected the file
    pub fn import_one(&mut self, path: impl AsRef<Path>) -> Result<ImportReport> {
        let path = path.as_ref();
        let mapped = self
            .mapper
            .resolve(path)
            .ok_or_else(|| Error::ComponentNotFound {
                path: path.to_path_buf(),
            })?;
        let document = self.document_for(&mapped)?;
        self.import_mapped(&document, &mapped)
    }

    /// Import every component file under the sync root.
    ///
    /// Document folders are walked in name order, kind folders in the order
    /// Modules, Classes, Forms, VisioObjects; files of the flat layout go to
    /// the main document last. Per-file errors are collected.
    pub fn import_all(&mut self) -> Result<ImportSummary> {
        let documents = self.oracle.list_documents()?;
        let mut files = Vec::new();
        for folder in self.mapper.document_folders()? {
            if !documents
                .iter()
                .any(|d| d.folder_name.eq_ignore_ascii_case(&folder))
            {
                tracing::warn!(folder = %folder, "no open document for folder, skipping");
                continue;
            }
            files.extend(self.mapper.scan_document(&folder)?);
        }
        files.extend(self.mapper.scan_legacy()?);
        tracing::info!(files = files.len(), root = %self.mapper.root(), "import pass");

        let mut summary = ImportSummary::default();
        for file in files {
            let result = self
                .document_for(&file)
                .and_then(|document| self.import_mapped(&document, &file));
            match result {
                Ok(report) => summary.imports.push(report),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(path = %file.path, error = %e, "import failed");
                    summary.failed.push((file.path, e.to_string()));
                }
            }
        }
        Ok(summary)
    }

    fn document_for(&self, mapped: &MappedFile) -> Result<DocumentInfo> {
        match &mapped.document_folder {
            None => self.oracle.main_document(),
            Some(folder) => self
                .oracle
                .list_documents()?
                .into_iter()
                .find(|d| d.folder_name.eq_ignore_ascii_case(folder))
                .ok_or_else(|| Error::UnknownDocument {
                    folder: folder.clone(),
                }),
        }
    }

    fn import_mapped(&mut self, document: &DocumentInfo, mapped: &MappedFile) -> Result<ImportReport> {
        let mut report = ImportReport {
            document: document.name.clone(),
            name: mapped.name.clone(),
            path: mapped.path.clone(),
            outcome: ImportOutcome::Unchanged,
            warnings: Vec::new(),
        };
        if mapped.is_legacy() {
            report.warnings.push(Warning::LegacyLayout {
                path: mapped.path.clone(),
            });
        }

        let existing = {
            let store = self.oracle.component_store(document)?;
            find_component(store.as_ref(), &mapped.name)?
        };

        let is_document_module = mapped.kind.is_document_module()
            || existing.as_ref().is_some_and(|e| e.kind.is_document_module());
        if is_document_module && !self.options.force {
            tracing::warn!(path = %mapped.path, "document module import needs force, skipped");
            report.outcome = ImportOutcome::Refused;
            return Ok(report);
        }

        let bytes = io::read_bytes(&mapped.path)?;
        let (text, source) = decode_local(&bytes, &self.codec);
        let kind = existing.as_ref().map_or(mapped.kind, |e| e.kind);
        let name = existing
            .as_ref()
            .map_or_else(|| mapped.name.clone(), |e| e.name.clone());

        if let Some(declared) = declared_name(&text)
            && !declared.eq_ignore_ascii_case(&name)
        {
            report.warnings.push(Warning::NameRewritten {
                component: name.clone(),
                declared,
            });
        }

        let repaired = restore_for(kind, &text, &name);

        if let Some(existing) = &existing {
            let host_view = strip_for(kind, &existing.raw);
            let local_view = strip_for(kind, &repaired);
            if !differ(&host_view, &local_view) {
                tracing::debug!(component = %name, "host already has this text");
                return Ok(report);
            }
            let change = Change {
                name: name.clone(),
                kind,
                local_text: local_view,
                external_text: host_view,
                differ: true,
            };
            if !self.resolver.confirm_import(document, &change) {
                tracing::debug!(component = %name, "import declined");
                report.outcome = ImportOutcome::Declined;
                return Ok(report);
            }
        }

        let encoded = self.codec.encode(&repaired);
        if encoded.is_lossy() {
            let chars = encoded.lost_chars();
            tracing::warn!(component = %name, ?chars, encoding = self.codec.name(), "unmappable characters replaced");
            report.warnings.push(Warning::EncodingLoss {
                component: name.clone(),
                chars,
            });
        }

        report.outcome = if is_document_module {
            if existing.is_none() {
                return Err(Error::ImportFailure {
                    name,
                    reason: "document modules cannot be created, only rewritten".into(),
                });
            }
            let host_text = self.codec.decode(&encoded.bytes);
            let mut store = self.oracle.component_store(document)?;
            store
                .write_body(&name, &code_body(&host_text))
                .map_err(|e| import_failure(&name, e))?;
            ImportOutcome::Rewritten
        } else {
            let staging = tempfile::Builder::new().prefix("vbsync-").tempdir()?;
            let staged = staging
                .path()
                .join(format!("{}.{}", name, kind.extension()));
            io::write_atomic(&NormalizedPath::new(&staged), &encoded.bytes)?;

            let mut store = self.oracle.component_store(document)?;
            if existing.is_some() {
                store
                    .remove_component(&name)
                    .map_err(|e| import_failure(&name, e))?;
            }
            if let Err(e) = store.import_file(&staged) {
                if e.is_fatal() {
                    return Err(e);
                }
                let mut reason = e.to_string();
                if let Some(existing) = &existing
                    && let Err(rollback) =
                        rollback(store.as_mut(), staging.path(), existing, &self.codec)
                {
                    tracing::error!(component = %name, error = %rollback, "rollback failed, component is missing from the host");
                    reason = format!("{}; restoring the previous version also failed: {}", reason, rollback);
                }
                return Err(Error::ImportFailure { name, reason });
            }
            if existing.is_some() {
                ImportOutcome::Replaced
            } else {
                ImportOutcome::Created
            }
        };

        if source == TextSource::Legacy && io::write_if_changed(&mapped.path, text.as_bytes())? {
            report.warnings.push(Warning::ConvertedToUtf8 {
                path: mapped.path.clone(),
            });
        }

        tracing::info!(component = %name, document = %document, outcome = ?report.outcome, "imported");
        Ok(report)
    }
}

fn import_failure(name: &str, error: Error) -> Error {
    if error.is_fatal() {
        return error;
    }
    Error::ImportFailure {
        name: name.to_string(),
        reason: error.to_string(),
    }
}

/// Read every component's raw text.
///
/// An incomplete read must not become the document's fingerprint. Names of
/// unreadable components still count as host names, so their local files are
/// never offered as orphans.
fn read_bodies(
    store: &dyn ComponentStore,
    document: &DocumentInfo,
    report: &mut DocumentReport,
) -> Result<HostRead> {
    let mut bodies = Vec::new();
    let mut host_names = HashSet::new();
    let mut complete = true;
    for (name, kind) in store.list_components()? {
        host_names.insert(name.to_ascii_lowercase());
        match store.read_body(&name) {
            Ok(raw) => bodies.push(HostBody { name, kind, raw }),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::error!(document = %document, component = %name, error = %e, "cannot read component");
                report.errors.push(format!("{}: {}", name, e));
                complete = false;
            }
        }
    }
    Ok(HostRead {
        bodies,
        host_names,
        complete,
    })
}

fn find_component(store: &dyn ComponentStore, name: &str) -> Result<Option<HostBody>> {
    let Some((name, kind)) = store
        .list_components()?
        .into_iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
    else {
        return Ok(None);
    };
    let raw = store.read_body(&name)?;
    Ok(Some(HostBody { name, kind, raw }))
}

/// Put the previous text of a component back after a failed import.
fn rollback(
    store: &mut dyn ComponentStore,
    staging: &Path,
    previous: &HostBody,
    codec: &LegacyCodec,
) -> Result<()> {
    let dir = staging.join("previous");
    let path = dir.join(format!("{}.{}", previous.name, previous.kind.extension()));
    let text = restore_for(previous.kind, &previous.raw, &previous.name);
    io::write_atomic(&NormalizedPath::new(&path), &codec.encode(&text).bytes)?;
    store.import_file(&path)?;
    tracing::warn!(component = %previous.name, "import failed, previous version restored");
    Ok(())
}
