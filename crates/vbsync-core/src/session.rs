//! Live editing session
//!
//! One engine per host connection, shared by the file watcher (imports) and,
//! in bidirectional mode, a reverse loop that re-exports on a fixed period.
//! Both lock the same mutex, so the engine only ever runs one operation.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::Result;
use crate::sync::{ImportReport, SyncEngine, SyncReport};
use crate::watch::FileWatcher;

/// Something that happened in the background, for the front end to show.
#[derive(Debug)]
pub enum SessionEvent {
    Imported(ImportReport),
    ImportFailed { path: PathBuf, error: crate::Error },
    Exported(SyncReport),
    ExportFailed(crate::Error),
}

/// Receives session events. Called from background threads.
pub type EventSink = Arc<dyn Fn(SessionEvent) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub debounce: Duration,
    /// Reverse-export period; `None` disables bidirectional mode
    pub poll_interval: Option<Duration>,
}

struct ReverseLoop {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

pub struct LiveSession {
    engine: Arc<Mutex<SyncEngine>>,
    watcher: Option<FileWatcher>,
    reverse: Option<ReverseLoop>,
}

fn lock(engine: &Mutex<SyncEngine>) -> MutexGuard<'_, SyncEngine> {
    engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LiveSession {
    /// Start watching the engine's sync root.
    ///
    /// The engine should already be connected and have run its first export.
    pub fn start(engine: SyncEngine, options: SessionOptions, sink: EventSink) -> Result<Self> {
        let root = engine.mapper().root().to_native();
        let engine = Arc::new(Mutex::new(engine));

        let watcher = {
            let engine = Arc::clone(&engine);
            let sink = Arc::clone(&sink);
            FileWatcher::start(&root, options.debounce, move |path: &Path| {
                let result = lock(&engine).import_one(path);
                match result {
                    Ok(report) => sink(SessionEvent::Imported(report)),
                    Err(error) => sink(SessionEvent::ImportFailed {
                        path: path.to_path_buf(),
                        error,
                    }),
                }
            })?
        };

        let reverse = match options.poll_interval {
            Some(interval) => Some(spawn_reverse_loop(Arc::clone(&engine), interval, sink)?),
            None => None,
        };

        Ok(Self {
            engine,
            watcher: Some(watcher),
            reverse,
        })
    }

    /// Shared handle to the engine.
    pub fn engine(&self) -> Arc<Mutex<SyncEngine>> {
        Arc::clone(&self.engine)
    }

    pub fn is_bidirectional(&self) -> bool {
        self.reverse.is_some()
    }

    /// Stop the watcher and the reverse loop, waiting for both to finish.
    pub fn stop(mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
        if let Some(reverse) = self.reverse.take() {
            // A closed channel stops the loop too, so a failed send is fine.
            let _ = reverse.stop.send(());
            if reverse.handle.join().is_err() {
                tracing::error!("reverse export thread panicked");
            }
        }
        tracing::info!("session stopped");
    }
}

fn spawn_reverse_loop(
    engine: Arc<Mutex<SyncEngine>>,
    interval: Duration,
    sink: EventSink,
) -> Result<ReverseLoop> {
    let (stop, stopped) = mpsc::channel::<()>();
    let handle = thread::Builder::new()
        .name("vbsync-reverse".into())
        .spawn(move || {
            loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                let result = lock(&engine).export_all();
                match result {
                    Ok(report) => sink(SessionEvent::Exported(report)),
                    Err(error) => {
                        let fatal = error.is_fatal();
                        sink(SessionEvent::ExportFailed(error));
                        if fatal {
                            tracing::error!("host connection lost, reverse export stopped");
                            break;
                        }
                    }
                }
            }
        })?;
    tracing::info!(?interval, "bidirectional sync enabled");
    Ok(ReverseLoop { stop, handle })
}
