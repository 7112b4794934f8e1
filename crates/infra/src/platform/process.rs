//! Bounded subprocess execution.
//!
//! Runs a program with its stdin fed from a string and both output pipes
//! captured, under a wall-clock deadline and a per-stream byte cap. The child
//! is always reaped before [`run_with_input`] returns.
//!
//! Pipes are serviced on helper threads so a child that writes more than the
//! OS pipe buffer can never deadlock against us. If the child leaves a
//! grandchild holding a pipe open, the reader for that pipe is abandoned after
//! a short drain grace instead of blocking the caller.

use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use wait_timeout::ChildExt;

/// How often the wait loop wakes up to check the output cap.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long to keep collecting output once the child is gone.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Spawn-level failures: the process could not be started, fed, waited on or
/// kept within bounds. Its `Display` text is what callers see.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The program could not be started (missing, not executable...).
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// Interpreter that was being started.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Writing the script to stdin failed for a reason other than the child
    /// closing it.
    #[error("failed to write script to {program} stdin: {source}")]
    Stdin {
        /// Interpreter being fed.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Polling the child for its exit status failed.
    #[error("failed to wait for {program}: {source}")]
    Wait {
        /// Interpreter being waited on.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The child ran past its deadline and was killed.
    #[error("{program} timed out after {timeout_ms}ms")]
    TimedOut {
        /// Interpreter that was killed.
        program: String,
        /// Deadline that was exceeded.
        timeout_ms: u128,
    },

    /// stdout or stderr grew past the cap and the child was killed.
    #[error("{program} output exceeded {limit} bytes")]
    OutputLimit {
        /// Interpreter that was killed.
        program: String,
        /// Per-stream cap in bytes.
        limit: usize,
    },
}

/// Limits applied to a single run.
#[derive(Debug, Clone, Copy)]
pub struct ProcessLimits {
    /// Wall-clock budget measured from spawn.
    pub timeout: Duration,
    /// Cap applied to stdout and stderr independently.
    pub max_output_bytes: usize,
}

/// Everything observed about one run.
#[derive(Debug, Default)]
pub struct CapturedProcess {
    /// Exit status once reaped. `None` only when the process never started or
    /// could not be reaped.
    pub status: Option<ExitStatus>,
    /// Raw stdout bytes, truncated to the cap.
    pub stdout: Vec<u8>,
    /// Raw stderr bytes, truncated to the cap.
    pub stderr: Vec<u8>,
    /// Spawn-level failure, if any. Takes priority over the exit status.
    pub failure: Option<SpawnError>,
}

impl CapturedProcess {
    fn spawn_failed(error: SpawnError) -> Self {
        Self { failure: Some(error), ..Self::default() }
    }

    /// Exited with status 0 and nothing went wrong along the way.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failure.is_none() && self.status.is_some_and(|status| status.success())
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

enum WaitOutcome {
    Exited(ExitStatus),
    TimedOut,
    OutputLimit,
    WaitFailed(io::Error),
}

/// Run `program`, writing `input` to its stdin and capturing stdout/stderr.
///
/// Never panics and never returns early without reaping the child.
#[must_use]
pub fn run_with_input(program: &str, input: &str, limits: ProcessLimits) -> CapturedProcess {
    let mut child = match Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(source) => {
            return CapturedProcess::spawn_failed(SpawnError::Spawn {
                program: program.to_string(),
                source,
            })
        }
    };

    let started = Instant::now();
    let deadline = started + limits.timeout;
    let overflow = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    let (writer_tx, writer_rx) = mpsc::channel();
    match child.stdin.take() {
        Some(stdin) => spawn_writer(stdin, input.as_bytes().to_vec(), writer_tx),
        None => drop(writer_tx),
    }
    spawn_reader(child.stdout.take(), Stream::Stdout, limits.max_output_bytes, &overflow, &tx);
    spawn_reader(child.stderr.take(), Stream::Stderr, limits.max_output_bytes, &overflow, &tx);
    drop(tx);

    let outcome = wait_for_exit(&mut child, deadline, &overflow);

    let (status, mut failure) = match outcome {
        WaitOutcome::Exited(status) => {
            tracing::trace!(
                exit_code = status.code(),
                elapsed_ms = started.elapsed().as_millis(),
                "Interpreter exited"
            );
            (Some(status), None)
        }
        WaitOutcome::TimedOut => {
            tracing::warn!(
                program = %program,
                timeout_ms = limits.timeout.as_millis(),
                "Interpreter timed out, killing process"
            );
            let status = kill_and_reap(&mut child);
            let error = SpawnError::TimedOut {
                program: program.to_string(),
                timeout_ms: limits.timeout.as_millis(),
            };
            (status, Some(error))
        }
        WaitOutcome::OutputLimit => {
            tracing::warn!(
                program = %program,
                limit = limits.max_output_bytes,
                "Interpreter output exceeded cap, killing process"
            );
            let status = kill_and_reap(&mut child);
            let error = SpawnError::OutputLimit {
                program: program.to_string(),
                limit: limits.max_output_bytes,
            };
            (status, Some(error))
        }
        WaitOutcome::WaitFailed(source) => {
            tracing::error!(error = %source, "Failed to wait for interpreter");
            let status = kill_and_reap(&mut child);
            (status, Some(SpawnError::Wait { program: program.to_string(), source }))
        }
    };

    // Normal exits get the rest of the time budget to flush their pipes.
    let drain_deadline = match failure {
        None => deadline.max(Instant::now() + DRAIN_GRACE),
        Some(_) => Instant::now() + DRAIN_GRACE,
    };

    let mut captured = CapturedProcess { status, ..CapturedProcess::default() };
    for _ in 0..2 {
        let wait = drain_deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(wait) {
            Ok((Stream::Stdout, bytes)) => captured.stdout = bytes,
            Ok((Stream::Stderr, bytes)) => captured.stderr = bytes,
            Err(_) => {
                tracing::debug!("Output pipe still open after exit, abandoning reader");
                // A clean exit whose pipes outlive the deadline still blew the budget.
                if failure.is_none() {
                    failure = Some(SpawnError::TimedOut {
                        program: program.to_string(),
                        timeout_ms: limits.timeout.as_millis(),
                    });
                }
                break;
            }
        }
    }

    if failure.is_none() && overflow.load(Ordering::SeqCst) {
        failure = Some(SpawnError::OutputLimit {
            program: program.to_string(),
            limit: limits.max_output_bytes,
        });
    }

    if failure.is_none() {
        if let Some(source) = stdin_write_error(&writer_rx, DRAIN_GRACE) {
            failure = Some(SpawnError::Stdin { program: program.to_string(), source });
        }
    }

    captured.failure = failure;
    captured
}

fn wait_for_exit(child: &mut Child, deadline: Instant, overflow: &AtomicBool) -> WaitOutcome {
    loop {
        if overflow.load(Ordering::SeqCst) {
            return WaitOutcome::OutputLimit;
        }
        let now = Instant::now();
        if now >= deadline {
            return WaitOutcome::TimedOut;
        }
        match child.wait_timeout((deadline - now).min(POLL_INTERVAL)) {
            Ok(Some(status)) => return WaitOutcome::Exited(status),
            Ok(None) => continue,
            Err(source) => return WaitOutcome::WaitFailed(source),
        }
    }
}

fn kill_and_reap(child: &mut Child) -> Option<ExitStatus> {
    // kill fails only if the child already exited; wait reaps either way
    let _ = child.kill();
    child.wait().ok()
}

/// Write the script and close stdin, reporting the outcome on `tx`. A child
/// that exits without reading all of it is not an error.
fn spawn_writer(mut stdin: ChildStdin, input: Vec<u8>, tx: Sender<io::Result<()>>) {
    thread::spawn(move || {
        let outcome = match stdin.write_all(&input) {
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        };
        drop(stdin);
        let _ = tx.send(outcome);
    });
}

/// Wait up to `grace` for the stdin writer to report. Called once the child
/// is reaped, when the pipe is closed and any pending write fails quickly.
fn stdin_write_error(rx: &Receiver<io::Result<()>>, grace: Duration) -> Option<io::Error> {
    match rx.recv_timeout(grace) {
        Ok(Err(source)) => Some(source),
        Ok(Ok(())) | Err(RecvTimeoutError::Disconnected) => None,
        Err(RecvTimeoutError::Timeout) => {
            tracing::debug!("Stdin writer still blocked after exit, abandoning it");
            None
        }
    }
}

fn spawn_reader<R>(
    pipe: Option<R>,
    stream: Stream,
    limit: usize,
    overflow: &Arc<AtomicBool>,
    tx: &Sender<(Stream, Vec<u8>)>,
) where
    R: Read + Send + 'static,
{
    let Some(pipe) = pipe else {
        let _ = tx.send((stream, Vec::new()));
        return;
    };
    let overflow = Arc::clone(overflow);
    let tx = tx.clone();

    thread::spawn(move || {
        let mut buf = Vec::new();
        // One byte past the cap is enough to know it was exceeded.
        let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
        if let Err(err) = pipe.take(cap).read_to_end(&mut buf) {
            tracing::debug!(?stream, error = %err, "Error reading interpreter output");
        }
        if buf.len() > limit {
            buf.truncate(limit);
            overflow.store(true, Ordering::SeqCst);
        }
        let _ = tx.send((stream, buf));
    });
}
