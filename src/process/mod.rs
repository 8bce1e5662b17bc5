//! Bounded subprocess execution shared by the session registry and the hook
//! engine.
//!
//! [`ProcessRunner::run`] owns the timeout contract: the timer starts at
//! spawn, and on expiry the whole process group is signalled so forked
//! grandchildren do not outlive the request. [`run_program`] is the unbounded
//! variant used for short multiplexer commands.

mod types;

pub use types::{ExecOutput, ExecutionOutcome, ExecutionResult, RunRequest};

use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

/// Time between SIGTERM and SIGKILL when a timed-out command ignores SIGTERM.
const TERM_GRACE: Duration = Duration::from_millis(200);
/// How long output readers may keep draining after the process resolved.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Spawns shell commands with a wall-clock limit.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    shell: String,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl ProcessRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Run one command to completion, timeout, or spawn failure.
    ///
    /// Never returns an error: every failure mode is encoded in the result.
    pub async fn run(&self, request: RunRequest) -> ExecutionResult {
        let started = Instant::now();
        let mut cmd = Command::new(&self.shell);
        // Dropping the future (client went away) must not leak the child.
        cmd.kill_on_drop(true);
        cmd.arg("-c")
            .arg(&request.command)
            .envs(&request.env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.stdin(if request.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(command = %request.command, shell = %self.shell, "spawn failed: {e}");
                return ExecutionResult::failed(
                    &request.command,
                    format!("failed to spawn `{}`: {e}", self.shell),
                    String::new(),
                    String::new(),
                    started.elapsed(),
                );
            }
        };
        tracing::debug!(pid = ?child.id(), command = %request.command, "spawned");

        let stdout = OutputCollector::start(child.stdout.take());
        let stderr = OutputCollector::start(child.stderr.take());
        if let (Some(input), Some(mut pipe)) = (request.stdin, child.stdin.take()) {
            // Written from a task so a child that never reads stdin cannot
            // stall the timeout; a broken pipe just means it exited early.
            tokio::spawn(async move {
                let _ = pipe.write_all(input.as_bytes()).await;
                let _ = pipe.shutdown().await;
            });
        }

        match timeout(request.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                let elapsed = started.elapsed();
                let (stdout, stderr) = (stdout.finish().await, stderr.finish().await);
                match status.code() {
                    Some(code) => {
                        ExecutionResult::exited(&request.command, code, stdout, stderr, elapsed)
                    }
                    None => ExecutionResult::failed(
                        &request.command,
                        describe_abnormal_exit(status),
                        stdout,
                        stderr,
                        elapsed,
                    ),
                }
            }
            Ok(Err(e)) => {
                let elapsed = started.elapsed();
                terminate_process_tree(&mut child).await;
                ExecutionResult::failed(
                    &request.command,
                    format!("failed to wait for process: {e}"),
                    stdout.finish().await,
                    stderr.finish().await,
                    elapsed,
                )
            }
            Err(_) => {
                tracing::warn!(
                    command = %request.command,
                    "timed out after {}; killing process group",
                    format_duration(request.timeout)
                );
                terminate_process_tree(&mut child).await;
                let elapsed = started.elapsed();
                ExecutionResult::timed_out(
                    &request.command,
                    stdout.finish().await,
                    stderr.finish().await,
                    elapsed,
                )
            }
        }
    }
}

/// Accumulates one output pipe in the background.
///
/// Bytes land in a shared buffer so a reader that never sees EOF (a
/// grandchild escaped the process group and still holds the pipe) can be
/// abandoned without losing what was already read.
struct OutputCollector {
    buffer: Arc<Mutex<Vec<u8>>>,
    task: Option<JoinHandle<()>>,
}

impl OutputCollector {
    fn start<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let task = pipe.map(|mut pipe| {
            let buffer = Arc::clone(&buffer);
            tokio::spawn(async move {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            if let Ok(mut buf) = buffer.lock() {
                                buf.extend_from_slice(&chunk[..n]);
                            }
                        }
                    }
                }
            })
        });
        Self { buffer, task }
    }

    async fn finish(mut self) -> String {
        if let Some(mut task) = self.task.take() {
            if timeout(OUTPUT_DRAIN_GRACE, &mut task).await.is_err() {
                task.abort();
            }
        }
        let bytes = self
            .buffer
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// SIGTERM the process group, escalate to SIGKILL, then reap the child.
async fn terminate_process_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            let pgid = pid as libc::pid_t;
            // SAFETY: killpg only sends a signal; the group was created by
            // `process_group(0)` at spawn so pgid == pid of our child.
            unsafe {
                libc::killpg(pgid, libc::SIGTERM);
            }
            if timeout(TERM_GRACE, child.wait()).await.is_ok() {
                unsafe {
                    libc::killpg(pgid, libc::SIGKILL);
                }
                return;
            }
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
    let _ = child.start_kill();
    let _ = timeout(TERM_GRACE, child.wait()).await;
}

#[cfg(unix)]
fn describe_abnormal_exit(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => format!("terminated by signal {signal}"),
        None => format!("process exited without a status code ({status})"),
    }
}

#[cfg(not(unix))]
fn describe_abnormal_exit(status: ExitStatus) -> String {
    format!("process exited without a status code ({status})")
}

/// Spawn and wait for a program with explicit args, optionally piping stdin.
///
/// Used for multiplexer commands, which are assumed fast and carry no timeout.
pub async fn run_program(
    program: &str,
    args: &[String],
    stdin: Option<&[u8]>,
) -> Result<ExecOutput, std::io::Error> {
    let mut cmd = Command::new(program);
    cmd.kill_on_drop(true);
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = cmd.spawn()?;
    if let Some(input) = stdin {
        if let Some(mut child_stdin) = child.stdin.take() {
            child_stdin.write_all(input).await?;
        }
    }

    let output = child.wait_with_output().await?;
    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Human-oriented duration formatting used in log and CLI messages.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs == 0 {
        return format!("{millis}ms");
    }
    if millis == 0 {
        if secs % 3600 == 0 {
            return format!("{}h", secs / 3600);
        }
        if secs % 60 == 0 {
            return format!("{}m", secs / 60);
        }
        return format!("{secs}s");
    }
    format!("{secs}.{millis:03}s")
}
