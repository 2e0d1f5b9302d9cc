//! Runs the Go toolchain against a workspace and captures its stdout.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::program::PROGRAM_FILE;
use crate::error::ReflectError;
use crate::io::workspace::Workspace;

/// The build-and-run command and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Program and leading arguments; the source file is appended.
    pub command: Vec<String>,
    /// `None` waits for the child indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            command: vec!["go".to_string(), "run".to_string()],
            timeout: None,
        }
    }
}

impl Toolchain {
    /// Human-readable command line, used in errors and logs.
    pub fn display_command(&self) -> String {
        let mut parts = self.command.clone();
        parts.push(PROGRAM_FILE.to_string());
        parts.join(" ")
    }

    /// Build and run the workspace program, returning its complete stdout.
    ///
    /// The child's stderr is inherited so its diagnostics reach the user
    /// unchanged. Stdout is only returned when the child exits with status 0.
    #[instrument(skip_all, fields(workspace = %workspace.path().display(), timeout = ?self.timeout))]
    pub fn run(&self, workspace: &Workspace) -> Result<Vec<u8>, ReflectError> {
        let command_line = self.display_command();
        let toolchain_err = |action: &'static str| {
            let command = command_line.clone();
            move |source: io::Error| ReflectError::Toolchain {
                command,
                action,
                source,
            }
        };

        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))
            .map_err(toolchain_err("resolve"))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .arg(PROGRAM_FILE)
            .current_dir(workspace.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        // A timed-out `go run` is killed together with the program it built,
        // which needs the whole tree in one process group.
        #[cfg(unix)]
        if self.timeout.is_some() {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        debug!(command = %command_line, "spawning toolchain");
        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                error!(err = %e, command = %command_line, "failed to spawn toolchain");
                return Err(toolchain_err("spawn")(e));
            }
        };

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout was not piped"))
            .map_err(toolchain_err("capture stdout"))?;
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        let status = match self.timeout {
            Some(timeout) => match wait_with_timeout(&mut child, timeout)
                .map_err(toolchain_err("wait"))?
            {
                Some(status) => status,
                None => {
                    // Partial output of a killed run is discarded.
                    drop(reader);
                    return Err(ReflectError::TimedOut {
                        command: command_line,
                        timeout,
                    });
                }
            },
            None => child.wait().map_err(toolchain_err("wait"))?,
        };

        let stdout = match reader.join() {
            Ok(result) => result.map_err(toolchain_err("read stdout"))?,
            Err(_) => {
                return Err(toolchain_err("read stdout")(io::Error::other(
                    "stdout reader thread panicked",
                )));
            }
        };

        if !status.success() {
            warn!(exit_code = ?status.code(), command = %command_line, "toolchain failed");
            return Err(ReflectError::Execution {
                command: command_line,
                code: status.code(),
            });
        }

        debug!(stdout_bytes = stdout.len(), "toolchain finished");
        Ok(stdout)
    }
}

/// Wait up to `timeout`, killing the child's process tree when it expires.
///
/// Returns `None` if the child had to be killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    if let Some(status) = child.wait_timeout(timeout)? {
        return Ok(Some(status));
    }
    warn!(timeout_secs = timeout.as_secs(), "toolchain timed out, killing");
    kill_tree(child)?;
    child.wait()?;
    Ok(None)
}

/// Kill the process group led by `child` (see `process_group(0)` above).
#[cfg(unix)]
fn kill_tree(child: &mut Child) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pgid = i32::try_from(child.id()).map_err(io::Error::other)?;
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        // The whole group already exited.
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) -> io::Result<()> {
    child.kill()
}
