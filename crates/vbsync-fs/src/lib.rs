//! Filesystem layer for vbsync
//!
//! Provides the on-disk folder layout for exported components, atomic I/O,
//! document fingerprints and format-agnostic configuration loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use checksum::fingerprint;
pub use config::ConfigStore;
pub use constants::{ComponentKind, KindFolder, WATCHED_EXTENSIONS};
pub use error::{Error, Result};
pub use layout::{DirectoryMapper, MappedFile, assign_folder_names, folder_name_for};
pub use path::NormalizedPath;
