//! Error taxonomy for a reflection invocation.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Which stage of a reflection invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The settings cannot produce a working program.
    InvalidConfig,
    /// The transient workspace could not be created or written.
    WorkspaceUnavailable,
    /// The program template failed to render.
    SynthesisFailed,
    /// The toolchain could not be run, exited non-zero, or timed out.
    ExecutionFailed,
    /// The captured stdout was not a valid encoded model.
    DecodeFailed,
}

#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("invalid config: {reason}")]
    Config { reason: String },

    #[error("workspace unavailable: {action} {}", path.display())]
    Workspace {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("render reflection program")]
    Synthesis(#[source] minijinja::Error),

    #[error("run toolchain `{command}`: {action}")]
    Toolchain {
        command: String,
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("toolchain `{command}` failed with status {}", display_code(*code))]
    Execution { command: String, code: Option<i32> },

    #[error("toolchain `{command}` timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    #[error("decode reflection output: {reason}")]
    Decode { reason: String },
}

impl ReflectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::InvalidConfig,
            Self::Workspace { .. } => ErrorKind::WorkspaceUnavailable,
            Self::Synthesis(_) => ErrorKind::SynthesisFailed,
            Self::Toolchain { .. } | Self::Execution { .. } | Self::TimedOut { .. } => {
                ErrorKind::ExecutionFailed
            }
            Self::Decode { .. } => ErrorKind::DecodeFailed,
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }
}

fn display_code(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<terminated by signal>".to_string(),
    }
}
