//! Subprocess invocation.
//!
//! Spawns the generator tool, drains both output pipes concurrently, and
//! enforces a deadline. A non-zero exit is a normal return value here, not
//! an error; callers decide what it means.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::error::GeneratorError;
use crate::resolver::{InvocationDescriptor, TOOL_PACKAGE_ID, TOOL_SUBCOMMAND};

/// Default timeout for generator execution (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the process invoker.
#[derive(Debug, Clone)]
pub struct InvokerConfig {
    /// Deadline for a single invocation.
    pub timeout: Duration,
    /// Pass `--refresh` so uvx fetches the latest tool version instead of
    /// a stale cached one.
    pub refresh: bool,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh: true,
        }
    }
}

impl InvokerConfig {
    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Enables or disables `--refresh`.
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

/// Captured outcome of one subprocess run.
#[derive(Debug)]
pub struct RawInvocation {
    /// Full standard output.
    pub stdout: String,
    /// Full standard error.
    pub stderr: String,
    /// Process exit code (-1 when terminated by signal).
    pub exit_code: i32,
}

impl RawInvocation {
    /// True when the process exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Faults of the invocation machinery itself. Distinct from the tool
/// failing: a non-zero exit comes back as a successful [`RawInvocation`].
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The process could not be started at all.
    #[error("Failed to spawn generator process: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process exceeded the deadline and was killed.
    #[error("Generator process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl InvokeError {
    /// True when the spawn failed because the command does not exist,
    /// which signals the resolver cache must be invalidated.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            InvokeError::Spawn(e) if e.kind() == std::io::ErrorKind::NotFound
        )
    }
}

impl From<InvokeError> for GeneratorError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::Timeout { timeout_secs } => {
                GeneratorError::ToolTimeout { timeout_secs }
            }
            InvokeError::Spawn(e) => {
                GeneratorError::internal(format!("failed to spawn generator process: {e}"))
            }
        }
    }
}

/// Builds the full argv for one invocation:
/// `<descriptor prefix> [--refresh] --from <package> <subcommand> <phase args>`.
pub fn build_argv(
    descriptor: &InvocationDescriptor,
    refresh: bool,
    phase_args: &[String],
) -> Vec<String> {
    let mut argv = descriptor.argv_prefix();
    if refresh {
        argv.push("--refresh".to_string());
    }
    argv.push("--from".to_string());
    argv.push(TOOL_PACKAGE_ID.to_string());
    argv.push(TOOL_SUBCOMMAND.to_string());
    argv.extend(phase_args.iter().cloned());
    argv
}

/// The process invoker.
#[derive(Debug, Clone, Default)]
pub struct Invoker {
    config: InvokerConfig,
}

impl Invoker {
    /// Creates an invoker with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an invoker with the given configuration.
    pub fn with_config(config: InvokerConfig) -> Self {
        Self { config }
    }

    /// Returns the invoker configuration.
    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Runs the given argv to completion, capturing both streams.
    ///
    /// Each pipe is drained on its own thread while the parent polls for
    /// exit. Draining only one stream would deadlock the child as soon as
    /// the other pipe's buffer fills.
    pub fn invoke(&self, argv: &[String]) -> Result<RawInvocation, InvokeError> {
        let (program, args) = match argv.split_first() {
            Some(split) => split,
            None => {
                return Err(InvokeError::Spawn(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "empty invocation argv",
                )))
            }
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(InvokeError::Spawn)?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() > self.config.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        let _ = stdout_reader.join();
                        let _ = stderr_reader.join();
                        return Err(InvokeError::Timeout {
                            timeout_secs: self.config.timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_reader.join();
                    let _ = stderr_reader.join();
                    return Err(InvokeError::Spawn(e));
                }
            }
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        Ok(RawInvocation {
            stdout,
            stderr,
            exit_code: status.code().unwrap_or(-1),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}
