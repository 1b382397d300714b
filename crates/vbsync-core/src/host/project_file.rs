//! Host persisted as a JSON project file
//!
//! Stands in for a host document on disk: the file holds a [`HostProject`]
//! and every mutation made through a [`ComponentStore`] is written back
//! atomically.

use std::path::Path;

use vbsync_content::LegacyCodec;
use vbsync_fs::{ComponentKind, NormalizedPath, io};

use super::{ComponentStore, DocumentOracle, HostProject, MemoryHost};
use crate::model::DocumentInfo;
use crate::{Error, Result};

#[derive(Debug)]
pub struct ProjectFileHost {
    path: NormalizedPath,
    codec: LegacyCodec,
    host: Option<MemoryHost>,
}

impl ProjectFileHost {
    /// A host backed by the project file at `path`. Nothing is read until
    /// [`DocumentOracle::connect`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: NormalizedPath::new(path),
            codec: LegacyCodec::default(),
            host: None,
        }
    }

    pub fn with_codec(mut self, codec: LegacyCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Write a new project file.
    pub fn create(path: impl AsRef<Path>, project: &HostProject) -> Result<Self> {
        let host = Self::open(path);
        write_project(&host.path, project)?;
        Ok(host)
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn host(&self) -> Result<&MemoryHost> {
        self.host.as_ref().ok_or_else(|| Error::Connection {
            message: "not connected".into(),
        })
    }

    fn save(&self) -> Result<()> {
        write_project(&self.path, &self.host()?.snapshot())
    }
}

fn write_project(path: &NormalizedPath, project: &HostProject) -> Result<()> {
    let mut json = serde_json::to_vec_pretty(project)?;
    json.push(b'\n');
    io::write_atomic(path, &json)?;
    Ok(())
}

impl DocumentOracle for ProjectFileHost {
    fn connect(&mut self) -> Result<()> {
        if !self.path.is_file() {
            return Err(Error::Connection {
                message: format!("project file not found: {}", self.path),
            });
        }
        let content = io::read_text(&self.path)?;
        let project: HostProject =
            serde_json::from_str(&content).map_err(|e| Error::Connection {
                message: format!("cannot read project file {}: {}", self.path, e),
            })?;

        let mut host = MemoryHost::from_project(project).with_codec(self.codec);
        host.connect()?;
        tracing::debug!(path = %self.path, "opened project file");
        self.host = Some(host);
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<DocumentInfo>> {
        self.host()?.list_documents()
    }

    fn component_store(&self, document: &DocumentInfo) -> Result<Box<dyn ComponentStore + '_>> {
        let inner = self.host()?.component_store(document)?;
        Ok(Box::new(PersistingStore { inner, owner: self }))
    }
}

/// Writes the project file after every successful mutation.
struct PersistingStore<'a> {
    inner: Box<dyn ComponentStore + 'a>,
    owner: &'a ProjectFileHost,
}

impl ComponentStore for PersistingStore<'_> {
    fn list_components(&self) -> Result<Vec<(String, ComponentKind)>> {
        self.inner.list_components()
    }

    fn read_body(&self, name: &str) -> Result<String> {
        self.inner.read_body(name)
    }

    fn write_body(&mut self, name: &str, text: &str) -> Result<()> {
        self.inner.write_body(name, text)?;
        self.owner.save()
    }

    fn remove_component(&mut self, name: &str) -> Result<()> {
        self.inner.remove_component(name)?;
        self.owner.save()
    }

    fn import_file(&mut self, path: &Path) -> Result<()> {
        self.inner.import_file(path)?;
        self.owner.save()
    }
}
