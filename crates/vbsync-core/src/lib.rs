//! Core synchronization layer for vbsync
//!
//! This crate ties the filesystem layout (`vbsync-fs`) and the component text
//! handling (`vbsync-content`) to a scripting host, implementing:
//!
//! - **Host interfaces**: [`DocumentOracle`] and [`ComponentStore`], with an
//!   in-memory host and a host persisted as a JSON project file
//! - **SyncEngine**: export pass and import pass with conflict resolution
//! - **FileWatcher**: debounced change listener over the sync tree
//! - **LiveSession**: single-flight engine shared by the watcher and the
//!   reverse-export loop
//!
//! # Architecture
//!
//! ```text
//!                       CLI
//!                        |
//!                   vbsync-core
//!                        |
//!            +-----------+-----------+
//!            |                       |
//!        vbsync-fs             vbsync-content
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod resolver;
pub mod session;
pub mod sync;
pub mod watch;

pub use config::Settings;
pub use error::{Error, Result};
pub use host::{
    ComponentStore, DocumentOracle, HostComponent, HostDocument, HostProject, MemoryHost,
    ProjectFileHost,
};
pub use model::{DocumentInfo, DocumentRole};
pub use resolver::{
    AssumeYes, Change, ChangeSet, ConflictResolver, ExportDecision, KeepLocal, Orphan,
    OrphanDecision, ScriptedResolver,
};
pub use session::{EventSink, LiveSession, SessionEvent, SessionOptions};
pub use sync::{
    DocumentReport, ImportOutcome, ImportReport, ImportSummary, PassStatus, SyncEngine,
    SyncOptions, SyncReport, SyncState, Warning,
};
pub use watch::{Debouncer, FileWatcher};
