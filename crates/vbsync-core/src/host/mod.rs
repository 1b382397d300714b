//! Host abstraction
//!
//! The scripting host is reached only through two narrow traits:
//! [`DocumentOracle`] enumerates open documents, [`ComponentStore`] reads and
//! writes the components of one document's code project. The engine never
//! holds host objects across passes.

mod memory;
mod project_file;

pub use memory::{HostComponent, HostDocument, HostProject, MemoryHost};
pub use project_file::ProjectFileHost;

use std::path::Path;

use vbsync_fs::ComponentKind;

use crate::model::DocumentInfo;
use crate::{Error, Result};

/// Access to the host application and its open documents.
pub trait DocumentOracle: Send {
    /// Attach to the running host.
    ///
    /// Fails with [`Error::Connection`] when the host is unreachable and with
    /// [`Error::Permission`] when it refuses access to code projects.
    fn connect(&mut self) -> Result<()>;

    /// Open documents in host enumeration order.
    fn list_documents(&self) -> Result<Vec<DocumentInfo>>;

    /// The document the session was started for.
    fn main_document(&self) -> Result<DocumentInfo> {
        self.list_documents()?
            .into_iter()
            .find(DocumentInfo::is_main)
            .ok_or_else(|| Error::Connection {
                message: "no main document is open".into(),
            })
    }

    /// Component access for one document.
    fn component_store(&self, document: &DocumentInfo) -> Result<Box<dyn ComponentStore + '_>>;
}

/// The code project of a single document.
///
/// Component names are matched ASCII case-insensitively, as the host does.
pub trait ComponentStore {
    /// Components in host enumeration order.
    fn list_components(&self) -> Result<Vec<(String, ComponentKind)>>;

    /// The component's text exactly as the host exports it, framing included.
    fn read_body(&self, name: &str) -> Result<String>;

    /// Replace the code of an existing component in place, keeping its
    /// framing. The only way to change a document module.
    fn write_body(&mut self, name: &str, text: &str) -> Result<()>;

    /// Remove a component. Document modules cannot be removed.
    fn remove_component(&mut self, name: &str) -> Result<()>;

    /// Import a legacy-encoded component file. The host takes the component
    /// name from the file's `Attribute VB_Name` line and the kind from its
    /// extension and header.
    fn import_file(&mut self, path: &Path) -> Result<()>;
}
