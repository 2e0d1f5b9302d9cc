//! Transient directory holding the generated program for one invocation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};
use tracing::{debug, warn};

use crate::core::program::PROGRAM_FILE;
use crate::error::ReflectError;

/// Prefix of every workspace directory name.
pub const WORKSPACE_PREFIX: &str = "mockgen_reflect_";

/// A uniquely named directory, removed when the workspace is dropped.
///
/// Removal runs exactly once: on [`Workspace::release`], on an early return
/// through `?`, or while unwinding from a panic. Cleanup failures are logged
/// and never reported to the caller.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under `root`, or the system temp dir.
    pub fn acquire(root: Option<&Path>) -> Result<Self, ReflectError> {
        let mut builder = Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let base = root.map_or_else(std::env::temp_dir, Path::to_path_buf);
        let dir = builder
            .tempdir_in(&base)
            .map_err(|source| ReflectError::Workspace {
                action: "create directory in",
                path: base,
                source,
            })?;
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "acquired workspace");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the program source file inside the workspace.
    pub fn source_path(&self) -> PathBuf {
        self.path.join(PROGRAM_FILE)
    }

    /// Write the program source, readable and writable by the owner only.
    pub fn write_source(&self, program: &str) -> Result<(), ReflectError> {
        let path = self.source_path();
        write_private(&path, program.as_bytes()).map_err(|source| ReflectError::Workspace {
            action: "write",
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = program.len(), "wrote program source");
        Ok(())
    }

    /// Remove the workspace now.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => debug!(path = %self.path.display(), "released workspace"),
            Err(e) => warn!(
                path = %self.path.display(),
                err = %e,
                "failed to remove workspace"
            ),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)?;
    file.flush()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(contents)?;
    file.flush()
}
