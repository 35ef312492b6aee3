//! Utility functions for deploy-ready
//! Subprocess execution with a timeout, used by the entry point smoke test.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Result of running a command with timeout
#[derive(Debug)]
pub enum CommandResult {
    /// Command completed successfully with output
    Success(Output),
    /// Command failed with output
    Failed(Output),
    /// Command timed out and was killed
    TimedOut,
    /// Command could not be started
    SpawnError(String),
}

impl CommandResult {
    /// Get stderr as string if available
    pub fn stderr_string(&self) -> Option<String> {
        match self {
            CommandResult::Success(o) | CommandResult::Failed(o) => {
                Some(String::from_utf8_lossy(&o.stderr).to_string())
            }
            _ => None,
        }
    }
}

/// Drain a child pipe on its own thread so the child never blocks on a full pipe
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Run a program inside `cwd`, killing it once `timeout` elapses
///
/// stdout and stderr are captured while the child runs; stdin is closed so
/// the child cannot wait on the terminal.
pub fn run_command_in(
    program: &Path,
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
) -> CommandResult {
    tracing::debug!("running {} {:?} in {}", program.display(), args, cwd.display());

    let mut child = match Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            return CommandResult::SpawnError(format!(
                "Failed to start '{}': {}",
                program.display(),
                e
            ))
        }
    };

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait(); // Reap the zombie process
            // Grandchildren may still hold the pipes open; don't wait on the readers
            return CommandResult::TimedOut;
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return CommandResult::SpawnError(format!(
                "Failed to wait for '{}': {}",
                program.display(),
                e
            ));
        }
    };

    let output = Output {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    };

    if status.success() {
        CommandResult::Success(output)
    } else {
        CommandResult::Failed(output)
    }
}
