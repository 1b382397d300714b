//! Debounced file watcher over the sync tree

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use vbsync_fs::WATCHED_EXTENSIONS;

use crate::Result;

/// How often the dispatch loop checks for `stop()` while idle.
const STOP_POLL: Duration = Duration::from_millis(100);

/// Per-path trailing-edge debounce.
///
/// Every event for a path restarts its window; a path becomes due once it
/// has been quiet for `window`. A save that lands as several writes fires
/// once, after the last of them.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Record an event for `path`.
    pub fn touch(&mut self, path: &Path, now: Instant) {
        self.pending.insert(path.to_path_buf(), now);
    }

    /// Remove and return the paths quiet for a full window, sorted.
    pub fn take_due(&mut self, now: Instant) -> Vec<PathBuf> {
        let window = self.window;
        let mut due: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= window)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &due {
            self.pending.remove(path);
        }
        due.sort();
        due
    }

    /// Time until the next pending path becomes due, if any.
    pub fn next_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .values()
            .map(|last| (*last + self.window).saturating_duration_since(now))
            .min()
    }
}

/// True for files holding component text, by extension, case-insensitively.
pub fn is_watched(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WATCHED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn triggers(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

/// Watches the sync tree recursively and calls a handler for every
/// debounced change to a component file.
///
/// The handler runs on a dedicated dispatch thread, one call at a time.
pub struct FileWatcher {
    watcher: Option<RecommendedWatcher>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FileWatcher {
    pub fn start<F>(root: &Path, debounce: Duration, mut handler: F) -> Result<Self>
    where
        F: FnMut(&Path) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("vbsync-watch".into())
            .spawn(move || {
                let mut debouncer = Debouncer::new(debounce);
                while !flag.load(Ordering::SeqCst) {
                    let timeout = debouncer
                        .next_due(Instant::now())
                        .map_or(STOP_POLL, |due| due.min(STOP_POLL));
                    match rx.recv_timeout(timeout) {
                        Ok(Ok(event)) if triggers(&event.kind) => {
                            let now = Instant::now();
                            for path in event.paths.iter().filter(|p| is_watched(p)) {
                                debouncer.touch(path, now);
                            }
                        }
                        Ok(Ok(_)) | Err(RecvTimeoutError::Timeout) => {}
                        Ok(Err(e)) => tracing::warn!(error = %e, "watch error"),
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                    for path in debouncer.take_due(Instant::now()) {
                        if flag.load(Ordering::SeqCst) {
                            break;
                        }
                        tracing::debug!(path = %path.display(), "change detected");
                        handler(&path);
                    }
                }
                tracing::debug!("watch loop stopped");
            })?;

        tracing::info!(root = %root.display(), ?debounce, "watching for changes");
        Ok(Self {
            watcher: Some(watcher),
            stop,
            handle: Some(handle),
        })
    }

    /// Stop watching and wait for the dispatch thread to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        drop(self.watcher.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("watch thread panicked");
        }
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
