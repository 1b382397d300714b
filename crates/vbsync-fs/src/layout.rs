//! Sync tree layout
//!
//! Components are exported to
//! `<root>/<document-folder>/<Modules|Classes|Forms|VisioObjects>/<name>.<ext>`.
//! The older flat layout (`<root>/<name>.<ext>`, and `<root>/<document-folder>/<name>.<ext>`)
//! is still understood when reading so existing checkouts keep importing.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::constants::{ComponentKind, KindFolder, WATCHED_EXTENSIONS};
use crate::{Error, NormalizedPath, Result};

/// A local file resolved back to the component it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedFile {
    /// Path of the file
    pub path: NormalizedPath,
    /// Document folder, or `None` for a file directly under the root
    pub document_folder: Option<String>,
    /// Kind folder, or `None` when the file uses the flat layout
    pub folder: Option<KindFolder>,
    /// Component name (the file stem)
    pub name: String,
    /// Kind implied by the location
    pub kind: ComponentKind,
}

impl MappedFile {
    /// True for files in the flat layout, where the kind is only a guess
    /// from the extension.
    pub fn is_legacy(&self) -> bool {
        self.folder.is_none()
    }
}

/// Maps host addressing (document folder, component) onto the sync tree
/// and back.
#[derive(Debug, Clone)]
pub struct DirectoryMapper {
    root: NormalizedPath,
}

impl DirectoryMapper {
    /// Create a mapper rooted at `root`.
    ///
    /// An existing root is canonicalized so paths reported by the OS file
    /// watcher resolve against it.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        Self {
            root: NormalizedPath::new(root),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn document_dir(&self, document_folder: &str) -> NormalizedPath {
        self.root.join(document_folder)
    }

    /// Path a component exports to.
    pub fn component_path(
        &self,
        document_folder: &str,
        name: &str,
        kind: ComponentKind,
    ) -> NormalizedPath {
        self.document_dir(document_folder)
            .join(kind.folder().as_str())
            .join(&format!("{}.{}", name, kind.extension()))
    }

    /// Resolve a path inside the sync tree to its component.
    ///
    /// Returns `None` for paths outside the root, unknown extensions, or
    /// directories that are not kind folders.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Option<MappedFile> {
        let path = NormalizedPath::new(path);
        let ext = path.extension()?.to_ascii_lowercase();
        if !WATCHED_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        let name = path.file_stem()?.to_string();
        let segments = path.segments_under(&self.root)?;

        let (document_folder, folder) = match segments.as_slice() {
            [_file] => (None, None),
            [doc, _file] => (Some(doc.to_string()), None),
            [doc, kind_dir, _file] => {
                (Some(doc.to_string()), Some(KindFolder::parse(kind_dir)?))
            }
            _ => return None,
        };

        let kind = match folder {
            Some(folder) => folder.kind(),
            None => ComponentKind::from_extension(&ext)?,
        };

        Some(MappedFile {
            path,
            document_folder,
            folder,
            name,
            kind,
        })
    }

    /// Sub-directories of the root, each a candidate document folder.
    pub fn document_folders(&self) -> Result<Vec<String>> {
        let native = self.root.to_native();
        if !native.is_dir() {
            return Ok(Vec::new());
        }
        let mut folders = Vec::new();
        for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
            let entry = entry.map_err(|e| Error::io(&native, e))?;
            if entry.path().is_dir()
                && let Some(name) = entry.file_name().to_str()
                && !name.starts_with('.')
            {
                folders.push(name.to_string());
            }
        }
        folders.sort();
        Ok(folders)
    }

    /// Every component file of one document, in import order
    /// (Modules, Classes, Forms, VisioObjects, then flat files).
    pub fn scan_document(&self, document_folder: &str) -> Result<Vec<MappedFile>> {
        let doc_dir = self.document_dir(document_folder);
        let mut files = Vec::new();
        for folder in KindFolder::ALL {
            files.extend(self.scan_dir(&doc_dir.join(folder.as_str()))?);
        }
        files.extend(self.scan_dir(&doc_dir)?);
        Ok(files)
    }

    /// Component files directly under the root (legacy flat layout).
    pub fn scan_legacy(&self) -> Result<Vec<MappedFile>> {
        self.scan_dir(&self.root)
    }

    fn scan_dir(&self, dir: &NormalizedPath) -> Result<Vec<MappedFile>> {
        let native = dir.to_native();
        if !native.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
            let entry = entry.map_err(|e| Error::io(&native, e))?;
            let path = entry.path();
            if path.is_file()
                && let Some(mapped) = self.resolve(&path)
            {
                files.push(mapped);
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

/// Folder name for a document: lowercase file stem, restricted to
/// `[a-z0-9_-]`.
pub fn folder_name_for(document_name: &str) -> String {
    let file_name = document_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(document_name);
    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };
    let folder: String = stem
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if folder.is_empty() {
        "document".to_string()
    } else {
        folder
    }
}

/// Assign collision-free folder names, in enumeration order.
///
/// The first document keeps the plain name; later collisions get `_2`,
/// `_3`, ... appended.
pub fn assign_folder_names<S: AsRef<str>>(document_names: &[S]) -> Vec<String> {
    let mut taken = HashSet::new();
    document_names
        .iter()
        .map(|name| {
            let base = folder_name_for(name.as_ref());
            let mut candidate = base.clone();
            let mut n = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{}_{}", base, n);
                n += 1;
            }
            candidate
        })
        .collect()
}
