//! In-memory host

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use vbsync_content::{LegacyCodec, declared_name, declares_class, split_framing};
use vbsync_fs::ComponentKind;

use super::{ComponentStore, DocumentOracle};
use crate::model::{DocumentInfo, DocumentRole};
use crate::{Error, Result};

/// A component as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostComponent {
    pub name: String,
    pub kind: ComponentKind,
    /// Exported text with framing and CRLF line endings
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDocument {
    pub name: String,
    pub role: DocumentRole,
    #[serde(default)]
    pub components: Vec<HostComponent>,
}

impl HostDocument {
    fn find(&self, name: &str) -> Option<usize> {
        self.components
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Everything the host holds: its documents and whether programmatic access
/// to code projects is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProject {
    #[serde(default = "default_trusted")]
    pub trusted: bool,
    #[serde(default)]
    pub documents: Vec<HostDocument>,
}

fn default_trusted() -> bool {
    true
}

impl Default for HostProject {
    fn default() -> Self {
        Self {
            trusted: true,
            documents: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct HostState {
    project: HostProject,
    connected: bool,
    reachable: bool,
    pending_import_failures: usize,
    rejected: HashSet<String>,
    unreadable: HashSet<String>,
}

/// A host that keeps its documents in memory.
///
/// Clones share state, so a test can keep a handle for inspection while the
/// engine owns another.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    state: Arc<Mutex<HostState>>,
    codec: LegacyCodec,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::from_project(HostProject::default())
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_project(project: HostProject) -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                project,
                connected: false,
                reachable: true,
                pending_import_failures: 0,
                rejected: HashSet::new(),
                unreadable: HashSet::new(),
            })),
            codec: LegacyCodec::default(),
        }
    }

    /// Use a different code page for imported files.
    pub fn with_codec(mut self, codec: LegacyCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Open a document.
    pub fn with_document(self, name: &str, role: DocumentRole) -> Self {
        self.lock().project.documents.push(HostDocument {
            name: name.to_string(),
            role,
            components: Vec::new(),
        });
        self
    }

    /// Add or replace a component directly, bypassing import rules.
    pub fn insert_component(&self, document: &str, name: &str, kind: ComponentKind, raw: &str) {
        let mut state = self.lock();
        let Some(doc) = state
            .project
            .documents
            .iter_mut()
            .find(|d| d.name == document)
        else {
            return;
        };
        let component = HostComponent {
            name: name.to_string(),
            kind,
            raw: to_host_line_endings(raw),
        };
        match doc.find(name) {
            Some(idx) => doc.components[idx] = component,
            None => doc.components.push(component),
        }
    }

    /// Remove a component directly, bypassing import rules.
    pub fn delete_component(&self, document: &str, name: &str) {
        let mut state = self.lock();
        if let Some(doc) = state
            .project
            .documents
            .iter_mut()
            .find(|d| d.name == document)
            && let Some(idx) = doc.find(name)
        {
            doc.components.remove(idx);
        }
    }

    pub fn component(&self, document: &str, name: &str) -> Option<HostComponent> {
        let state = self.lock();
        let doc = state.project.documents.iter().find(|d| d.name == document)?;
        doc.find(name).map(|idx| doc.components[idx].clone())
    }

    pub fn component_names(&self, document: &str) -> Vec<String> {
        self.lock()
            .project
            .documents
            .iter()
            .find(|d| d.name == document)
            .map(|d| d.components.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Current host contents.
    pub fn snapshot(&self) -> HostProject {
        self.lock().project.clone()
    }

    /// Simulate the host going away (or coming back).
    pub fn set_reachable(&self, reachable: bool) {
        self.lock().reachable = reachable;
    }

    /// Toggle trusted access to code projects.
    pub fn set_trusted(&self, trusted: bool) {
        self.lock().project.trusted = trusted;
    }

    /// Make the next `count` imports fail.
    pub fn fail_next_imports(&self, count: usize) {
        self.lock().pending_import_failures = count;
    }

    /// Reject every import of the named component.
    pub fn reject_imports_of(&self, name: &str) {
        self.lock().rejected.insert(name.to_ascii_lowercase());
    }

    /// Fail every read of the named component's text.
    pub fn fail_reads_of(&self, name: &str) {
        self.lock().unreadable.insert(name.to_ascii_lowercase());
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HostState {
    fn ensure_available(&self) -> Result<()> {
        if !self.reachable {
            return Err(Error::Connection {
                message: "the host application is not running".into(),
            });
        }
        if !self.connected {
            return Err(Error::Connection {
                message: "not connected".into(),
            });
        }
        if !self.project.trusted {
            return Err(permission_refused());
        }
        Ok(())
    }

    fn document_mut(&mut self, name: &str) -> Result<&mut HostDocument> {
        self.ensure_available()?;
        self.project
            .documents
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::host(format!("document '{}' is no longer open", name)))
    }
}

fn permission_refused() -> Error {
    Error::Permission {
        message: "programmatic access to the code project is not trusted".into(),
        hint: "enable \"Trust access to the VBA project object model\" in the host's trust center"
            .into(),
    }
}

/// The host stores component text with CRLF endings.
fn to_host_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 32);
    for line in text.lines() {
        out.push_str(line.trim_end_matches('\r'));
        out.push_str("\r\n");
    }
    out
}

impl DocumentOracle for MemoryHost {
    fn connect(&mut self) -> Result<()> {
        let mut state = self.lock();
        if !state.reachable {
            return Err(Error::Connection {
                message: "the host application is not running".into(),
            });
        }
        if !state.project.trusted {
            return Err(permission_refused());
        }
        state.connected = true;
        tracing::debug!(documents = state.project.documents.len(), "connected to host");
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<DocumentInfo>> {
        let state = self.lock();
        state.ensure_available()?;
        let docs: Vec<(&str, DocumentRole)> = state
            .project
            .documents
            .iter()
            .map(|d| (d.name.as_str(), d.role))
            .collect();
        Ok(DocumentInfo::assign(&docs))
    }

    fn component_store(&self, document: &DocumentInfo) -> Result<Box<dyn ComponentStore + '_>> {
        let mut state = self.lock();
        state.document_mut(&document.name)?;
        Ok(Box::new(MemoryStore {
            host: self.clone(),
            document: document.name.clone(),
        }))
    }
}

/// Component access for one document of a [`MemoryHost`].
struct MemoryStore {
    host: MemoryHost,
    document: String,
}

impl MemoryStore {
    fn not_found(&self, name: &str) -> Error {
        Error::host(format!("component '{}' not found in {}", name, self.document))
    }
}

impl ComponentStore for MemoryStore {
    fn list_components(&self) -> Result<Vec<(String, ComponentKind)>> {
        let mut state = self.host.lock();
        let doc = state.document_mut(&self.document)?;
        Ok(doc
            .components
            .iter()
            .map(|c| (c.name.clone(), c.kind))
            .collect())
    }

    fn read_body(&self, name: &str) -> Result<String> {
        let mut state = self.host.lock();
        if state.unreadable.contains(&name.to_ascii_lowercase()) {
            return Err(Error::host(format!("cannot read '{}'", name)));
        }
        let doc = state.document_mut(&self.document)?;
        doc.find(name)
            .map(|idx| doc.components[idx].raw.clone())
            .ok_or_else(|| self.not_found(name))
    }

    fn write_body(&mut self, name: &str, text: &str) -> Result<()> {
        let mut state = self.host.lock();
        let doc = state.document_mut(&self.document)?;
        let idx = doc.find(name).ok_or_else(|| self.not_found(name))?;
        let component = &mut doc.components[idx];

        // The host keeps the framing and replaces only the code lines.
        let (header, _) = split_framing(&component.raw);
        component.raw = to_host_line_endings(&format!("{}{}", header, text));
        tracing::debug!(document = %self.document, component = name, "code replaced in place");
        Ok(())
    }

    fn remove_component(&mut self, name: &str) -> Result<()> {
        let mut state = self.host.lock();
        let doc = state.document_mut(&self.document)?;
        let idx = doc.find(name).ok_or_else(|| self.not_found(name))?;
        if doc.components[idx].kind.is_document_module() {
            return Err(Error::host(format!(
                "document module '{}' cannot be removed",
                name
            )));
        }
        doc.components.remove(idx);
        Ok(())
    }

    fn import_file(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let text = self.host.codec.decode(&bytes);

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let name = declared_name(&text).unwrap_or(stem);
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let kind = match ext.as_str() {
            "bas" => ComponentKind::Module,
            "frm" => ComponentKind::Form,
            // Without a class header the host treats a .cls as a standard module.
            "cls" if declares_class(&text) => ComponentKind::Class,
            "cls" => ComponentKind::Module,
            _ => {
                return Err(Error::host(format!(
                    "unsupported file type: {}",
                    path.display()
                )));
            }
        };

        let mut state = self.host.lock();
        if state.pending_import_failures > 0 {
            state.pending_import_failures -= 1;
            return Err(Error::host(format!("import of '{}' was rejected", name)));
        }
        if state.rejected.contains(&name.to_ascii_lowercase()) {
            return Err(Error::host(format!("import of '{}' was rejected", name)));
        }

        let doc = state.document_mut(&self.document)?;
        if doc.find(&name).is_some() {
            return Err(Error::host(format!(
                "a component named '{}' already exists",
                name
            )));
        }
        doc.components.push(HostComponent {
            name,
            kind,
            raw: to_host_line_endings(&text),
        });
        Ok(())
    }
}
