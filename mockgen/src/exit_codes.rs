//! Stable exit codes for the mockgen CLI.

use crate::error::ErrorKind;

/// The model was produced and written.
pub const OK: i32 = 0;
/// Invalid usage or config, or failure writing the result.
pub const INVALID: i32 = 1;
/// The transient workspace could not be created or written.
pub const WORKSPACE: i32 = 2;
/// The toolchain could not run, exited non-zero, or timed out.
pub const EXECUTION: i32 = 3;
/// The program could not be rendered or its output not decoded.
pub const DECODE: i32 = 4;

pub fn for_kind(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidConfig => INVALID,
        ErrorKind::WorkspaceUnavailable => WORKSPACE,
        ErrorKind::ExecutionFailed => EXECUTION,
        ErrorKind::SynthesisFailed | ErrorKind::DecodeFailed => DECODE,
    }
}
