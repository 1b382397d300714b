//! Command implementations for vbsync-cli

pub mod edit;
pub mod export;
pub mod import;
mod output;

pub use edit::run_edit;
pub use export::run_export;
pub use import::run_import;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use vbsync_core::{
    AssumeYes, ConflictResolver, KeepLocal, ProjectFileHost, Settings, SyncEngine, SyncOptions,
};
use vbsync_fs::DirectoryMapper;

use crate::error::{CliError, Result};
use crate::interactive::PromptResolver;

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Host project file
    pub file: PathBuf,
    /// Sync directory
    pub dir: PathBuf,
    /// Explicit settings file
    pub config: Option<PathBuf>,
}

impl CommandContext {
    pub fn new(file: PathBuf, dir: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self {
            file,
            dir: dir.unwrap_or_else(|| PathBuf::from(".")),
            config,
        }
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(Settings::load(self.config.as_deref(), &self.dir)?)
    }

    /// Connect to the host and build an engine over the sync directory.
    pub fn connect(
        &self,
        settings: &Settings,
        resolver: impl ConflictResolver + 'static,
        force: bool,
    ) -> Result<SyncEngine> {
        let codec = settings.codec()?;
        let host = ProjectFileHost::open(&self.file).with_codec(codec);
        let mut engine = SyncEngine::new(host, DirectoryMapper::new(&self.dir), resolver)
            .with_codec(codec)
            .with_options(SyncOptions { force });
        engine.connect()?;
        Ok(engine)
    }
}

/// `--yes` answers everything; a terminal gets prompts; anything else keeps
/// local files and declines imports.
pub fn resolver(yes: bool) -> Box<dyn ConflictResolver> {
    if yes {
        Box::new(AssumeYes)
    } else if std::io::stdin().is_terminal() {
        Box::new(PromptResolver::new())
    } else {
        tracing::debug!("stdin is not a terminal, conflicts keep local files");
        Box::new(KeepLocal)
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::user(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}
