//! SyncEngine for moving component text between the host and the sync tree
//!
//! This module provides:
//! - **engine**: export pass (host to files) and import (files to host)
//! - **state**: per-document fingerprints from the last export pass
//! - **report**: outcomes of passes and imports

mod engine;
mod report;
mod state;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{
    DocumentReport, ImportOutcome, ImportReport, ImportSummary, PassStatus, SyncReport, Warning,
};
pub use state::SyncState;
