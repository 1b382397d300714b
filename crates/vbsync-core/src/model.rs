//! Documents as the engine sees them

use serde::{Deserialize, Serialize};
use vbsync_fs::assign_folder_names;

/// Whether a document is the one the session was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    /// The document named on the command line; legacy flat files import here
    Main,
    /// Any other open document (stencils, other drawings)
    Auxiliary,
}

/// An open host document and the folder its components export into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentInfo {
    pub name: String,
    /// Lowercase, collision-free folder name under the sync root
    pub folder_name: String,
    pub role: DocumentRole,
}

impl DocumentInfo {
    /// Build document infos in host enumeration order, deriving folder names
    /// so that two documents never share a folder.
    pub fn assign<S: AsRef<str>>(documents: &[(S, DocumentRole)]) -> Vec<Self> {
        let names: Vec<&str> = documents.iter().map(|(name, _)| name.as_ref()).collect();
        assign_folder_names(&names)
            .into_iter()
            .zip(documents)
            .map(|(folder_name, (name, role))| Self {
                name: name.as_ref().to_string(),
                folder_name,
                role: *role,
            })
            .collect()
    }

    pub fn is_main(&self) -> bool {
        self.role == DocumentRole::Main
    }
}

impl std::fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
