//! External command execution for data sources.
//!
//! Every source shells out to one fixed program. [`ProcessRunner`] spawns it
//! with tokio, reads stdout to completion and kills the child when the
//! source's timeout expires. The [`CommandRunner`] trait lets the collector be
//! driven by canned output in tests.

use std::fmt;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::trace;

/// Identifier of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Powermetrics,
    VmStat,
    Macmon,
}

impl SourceId {
    /// Get the name used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Powermetrics => "powermetrics",
            SourceId::VmStat => "vmstat",
            SourceId::Macmon => "macmon",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed external invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: &'static str,
    pub args: &'static [&'static str],
    /// Upper bound on how long the process may run.
    pub timeout: Duration,
}

/// Verbatim stdout of one successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    pub source: SourceId,
    pub stdout: String,
    pub exit_code: Option<i32>,
}

impl RawCapture {
    /// Build a capture from text, as if the program exited with status 0.
    pub fn from_output(source: SourceId, stdout: impl Into<String>) -> Self {
        Self {
            source,
            stdout: stdout.into(),
            exit_code: Some(0),
        }
    }
}

/// Why a source produced no capture.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read output of {program}: {source}")]
    Io {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}: {stderr}", exit_code_display(.code))]
    Exit {
        program: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout {
        program: &'static str,
        timeout: Duration,
    },

    #[error("{program} wrote non UTF-8 output")]
    InvalidOutput { program: &'static str },
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Runs the command behind a source.
pub trait CommandRunner: Send + Sync + 'static {
    /// Run `spec` once and return its stdout.
    fn run(
        &self,
        source: SourceId,
        spec: CommandSpec,
    ) -> impl Future<Output = Result<RawCapture, SourceError>> + Send;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        source: SourceId,
        spec: CommandSpec,
    ) -> impl Future<Output = Result<RawCapture, SourceError>> + Send {
        run_process(source, spec)
    }
}

async fn run_process(source: SourceId, spec: CommandSpec) -> Result<RawCapture, SourceError> {
    let program = spec.program;

    trace!(source = %source, program, args = ?spec.args, "Spawning source command");

    // kill_on_drop terminates the child if the timeout drops the wait future.
    let child = Command::new(program)
        .args(spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| SourceError::Spawn { program, source })?;

    let output = match tokio::time::timeout(spec.timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| SourceError::Io { program, source })?,
        Err(_) => {
            return Err(SourceError::Timeout {
                program,
                timeout: spec.timeout,
            });
        }
    };

    if !output.status.success() {
        return Err(SourceError::Exit {
            program,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout =
        String::from_utf8(output.stdout).map_err(|_| SourceError::InvalidOutput { program })?;

    Ok(RawCapture {
        source,
        stdout,
        exit_code: output.status.code(),
    })
}
