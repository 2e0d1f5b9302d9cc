//! Reflection settings stored in a TOML file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ReflectError;
use crate::io::toolchain::Toolchain;

/// Environment variable consulted when no model package is configured.
pub const MODEL_IMPORT_PATH_ENV: &str = "MOCKGEN_MODEL_IMPORT_PATH";

/// Reflection configuration (TOML).
///
/// Missing fields take the defaults, which run `go run` with no timeout in
/// the system temp dir. There is no default model package: one must be
/// named here or through [`MODEL_IMPORT_PATH_ENV`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReflectConfig {
    /// Import path of the Go package the generated program calls. It must
    /// export `PackageFromInterfaceType(reflect.Type) (*Package, error)` and
    /// `EncodeCBOR(io.Writer, *Package) error`, the latter writing the
    /// externally tagged shape of [`crate::model::Package`].
    pub model_import_path: Option<String>,

    /// Directory in which workspaces are created. Defaults to the system
    /// temp dir.
    pub temp_root: Option<PathBuf>,

    pub toolchain: ToolchainConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Build-and-run command (e.g. `["go","run"]`); the program file is
    /// appended as the last argument.
    pub command: Vec<String>,

    /// Kill the toolchain after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            command: Toolchain::default().command,
            timeout_secs: None,
        }
    }
}

impl ReflectConfig {
    /// Defaults, with the model package taken from the environment.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg
    }

    /// Fill an unset model package from `lookup(MODEL_IMPORT_PATH_ENV)`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.model_import_path.is_none() {
            self.model_import_path = lookup(MODEL_IMPORT_PATH_ENV).filter(|v| !v.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<(), ReflectError> {
        self.model_import_path()?;
        if self.toolchain.command.is_empty() || self.toolchain.command[0].trim().is_empty() {
            return Err(ReflectError::config(
                "toolchain.command must be a non-empty array",
            ));
        }
        if self.toolchain.timeout_secs == Some(0) {
            return Err(ReflectError::config(
                "toolchain.timeout_secs must be > 0 when set",
            ));
        }
        Ok(())
    }

    /// The configured model package, or an error explaining what is needed.
    pub fn model_import_path(&self) -> Result<&str, ReflectError> {
        match self.model_import_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Ok(path),
            _ => Err(ReflectError::config(format!(
                "model_import_path is not set; name a Go package exporting \
                 PackageFromInterfaceType and EncodeCBOR, or set {MODEL_IMPORT_PATH_ENV}"
            ))),
        }
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            command: self.toolchain.command.clone(),
            timeout: self.toolchain.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Load config from a TOML file, falling back to the environment for the
/// model package.
///
/// If the file is missing, starts from `ReflectConfig::default()`. The
/// result is not validated; [`crate::Reflector::new`] does that.
pub fn load_config(path: &Path) -> Result<ReflectConfig> {
    let mut cfg = if path.exists() {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?
    } else {
        ReflectConfig::default()
    };
    cfg.apply_env(|key| std::env::var(key).ok());
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn with_model() -> ReflectConfig {
        ReflectConfig {
            model_import_path: Some("example.org/mockgen/model".to_string()),
            ..ReflectConfig::default()
        }
    }

    #[test]
    fn load_missing_returns_default_toolchain() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg.toolchain, ToolchainConfig::default());
        assert_eq!(cfg.temp_root, None);
        assert_eq!(cfg.toolchain(), Toolchain::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("mockgen.toml");
        fs::write(
            &path,
            "model_import_path = \"example.org/mockgen/model\"\n\n[toolchain]\ntimeout_secs = 90\n",
        )
        .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.model_import_path().expect("model"), "example.org/mockgen/model");
        assert_eq!(cfg.toolchain.command, vec!["go", "run"]);
        assert_eq!(cfg.toolchain().timeout, Some(Duration::from_secs(90)));
        cfg.validate().expect("valid");
    }

    #[test]
    fn serialized_config_loads_back() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("mockgen.toml");
        let cfg = ReflectConfig {
            model_import_path: Some("example.org/fork/model".to_string()),
            temp_root: Some(temp.path().to_path_buf()),
            toolchain: ToolchainConfig {
                command: vec!["go".to_string(), "run".to_string(), "-mod=mod".to_string()],
                timeout_secs: Some(120),
            },
        };
        fs::write(&path, toml::to_string_pretty(&cfg).expect("serialize")).expect("write");
        assert_eq!(load_config(&path).expect("load"), cfg);
    }

    #[test]
    fn unset_model_package_is_rejected_with_guidance() {
        let err = ReflectConfig::default().validate().expect_err("no model");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        let message = err.to_string();
        assert!(message.contains("EncodeCBOR"));
        assert!(message.contains(MODEL_IMPORT_PATH_ENV));
    }

    #[test]
    fn env_fills_unset_model_package_only() {
        let lookup = |key: &str| (key == MODEL_IMPORT_PATH_ENV).then(|| "example.org/env/model".to_string());

        let mut unset = ReflectConfig::default();
        unset.apply_env(lookup);
        assert_eq!(unset.model_import_path().expect("model"), "example.org/env/model");

        let mut configured = with_model();
        configured.apply_env(lookup);
        assert_eq!(configured.model_import_path().expect("model"), "example.org/mockgen/model");
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let mut cfg = ReflectConfig::default();
        cfg.apply_env(|_| Some("  ".to_string()));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_command() {
        let mut cfg = with_model();
        cfg.toolchain.command = vec![" ".to_string()];
        let err = cfg.validate().expect_err("empty command");
        assert!(err.to_string().contains("toolchain.command"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut cfg = with_model();
        cfg.toolchain.timeout_secs = Some(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_blank_model_import_path() {
        let mut cfg = with_model();
        cfg.model_import_path = Some(String::new());
        assert!(cfg.validate().is_err());
    }
}
