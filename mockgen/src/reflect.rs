//! Entry point: reflect on one interface and return its package model.
//!
//! Stages run strictly in order and each fails fast:
//! synthesize → acquire workspace and write → run toolchain → decode.
//! The workspace is dropped before the result is returned on every path.

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::core::codec;
use crate::core::program::render_program;
use crate::core::request::ReflectRequest;
use crate::error::ReflectError;
use crate::io::config::ReflectConfig;
use crate::io::toolchain::Toolchain;
use crate::io::workspace::Workspace;
use crate::model::Package;

/// Runs reflection invocations with fixed settings.
///
/// Invocations share no state: each gets its own workspace, child process
/// and output buffer, so one `Reflector` may serve several threads.
#[derive(Debug, Clone)]
pub struct Reflector {
    model_import_path: String,
    temp_root: Option<PathBuf>,
    toolchain: Toolchain,
}

impl Reflector {
    /// Build a reflector, rejecting settings that cannot work.
    pub fn new(config: &ReflectConfig) -> Result<Self, ReflectError> {
        config.validate()?;
        Ok(Self {
            model_import_path: config.model_import_path()?.to_string(),
            temp_root: config.temp_root.clone(),
            toolchain: config.toolchain(),
        })
    }

    /// Replace the toolchain, keeping the other settings.
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Create workspaces under `root` instead of the system temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    #[instrument(skip_all, fields(import_path = request.import_path(), symbol = request.symbol()))]
    pub fn reflect(&self, request: &ReflectRequest) -> Result<Package, ReflectError> {
        let source = render_program(request, &self.model_import_path)?;

        let workspace = Workspace::acquire(self.temp_root.as_deref())?;
        workspace.write_source(&source)?;

        let stdout = self.toolchain.run(&workspace)?;
        workspace.release();

        let pkg = codec::decode(&stdout)?;
        info!(
            package = %pkg.name,
            interfaces = pkg.interfaces.len(),
            "reflected interface"
        );
        Ok(pkg)
    }
}

/// Reflect on `symbol` in `import_path` with the default settings.
///
/// The model package comes from [`crate::io::config::MODEL_IMPORT_PATH_ENV`];
/// without it this returns [`ReflectError::Config`] before anything is built
/// or run.
pub fn reflect(import_path: &str, symbol: &str) -> Result<Package, ReflectError> {
    Reflector::new(&ReflectConfig::from_env())?.reflect(&ReflectRequest::new(import_path, symbol))
}
