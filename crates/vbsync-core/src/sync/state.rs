//! Fingerprints remembered between export passes

use std::collections::HashMap;

/// The fingerprint each document had after its last completed export pass.
///
/// Held in memory only. A fresh session starts empty, so its first pass
/// always compares every component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    last_hash: HashMap<String, String>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_hash(&self, document: &str) -> Option<&str> {
        self.last_hash.get(document).map(String::as_str)
    }

    pub fn record(&mut self, document: &str, hash: String) {
        self.last_hash.insert(document.to_string(), hash);
    }

    /// Drop a document's fingerprint so the next pass compares everything.
    pub fn forget(&mut self, document: &str) {
        self.last_hash.remove(document);
    }

    pub fn len(&self) -> usize {
        self.last_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_hash.is_empty()
    }
}
