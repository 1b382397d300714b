//! Component kinds and the folder names they export into.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// File extensions (lowercase, without dot) that hold component text.
pub const WATCHED_EXTENSIONS: &[&str] = &["bas", "cls", "frm"];

/// The kind of a component in the host's code project.
///
/// The kind is fixed once the host created the component; it decides the
/// exported file extension, the folder it lands in, and the import policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Standard code module
    Module,
    /// Class module
    Class,
    /// User form with a designer block
    Form,
    /// Module bound to a host document object (`ThisDocument`)
    DocumentModule,
}

impl ComponentKind {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Module => "bas",
            Self::Class | Self::DocumentModule => "cls",
            Self::Form => "frm",
        }
    }

    /// Folder inside a document directory that holds this kind.
    pub fn folder(self) -> KindFolder {
        match self {
            Self::Module => KindFolder::Modules,
            Self::Class => KindFolder::Classes,
            Self::Form => KindFolder::Forms,
            Self::DocumentModule => KindFolder::VisioObjects,
        }
    }

    /// Kind implied by a bare file extension, as used by the legacy flat
    /// layout. A `.cls` is assumed to be a class; whether it is really a
    /// document module is only known to the host.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "bas" => Some(Self::Module),
            "cls" => Some(Self::Class),
            "frm" => Some(Self::Form),
            _ => None,
        }
    }

    /// Document modules cannot be created or removed, only rewritten.
    pub fn is_document_module(self) -> bool {
        matches!(self, Self::DocumentModule)
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Form => "form",
            Self::DocumentModule => "document module",
        };
        f.write_str(label)
    }
}

/// Per-kind folders inside a document directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindFolder {
    Modules,
    Classes,
    Forms,
    VisioObjects,
}

impl KindFolder {
    /// All folders in import order.
    pub const ALL: [KindFolder; 4] = [
        Self::Modules,
        Self::Classes,
        Self::Forms,
        Self::VisioObjects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modules => "Modules",
            Self::Classes => "Classes",
            Self::Forms => "Forms",
            Self::VisioObjects => "VisioObjects",
        }
    }

    /// Match a directory name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|folder| folder.as_str().eq_ignore_ascii_case(name))
    }

    /// The kind a file in this folder has.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Modules => ComponentKind::Module,
            Self::Classes => ComponentKind::Class,
            Self::Forms => ComponentKind::Form,
            Self::VisioObjects => ComponentKind::DocumentModule,
        }
    }
}

impl AsRef<Path> for KindFolder {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for KindFolder {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for KindFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
