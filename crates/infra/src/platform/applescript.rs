//! AppleScript execution through `osascript`.
//!
//! Provides the process-backed [`ScriptRunner`] with:
//! - The script piped over stdin (never placed on the command line)
//! - Timeout handling using the `wait-timeout` crate
//! - A byte cap on captured output
//! - Failures reported as data in [`ScriptExecutionResult`], never as panics
//!
//! # Example
//! ```rust,no_run
//! use osabridge_core::applescript_string_literal;
//! use osabridge_infra::platform::applescript::run_applescript;
//!
//! let script = format!(
//!     "display notification {} with title \"Build\"",
//!     applescript_string_literal("All 42 tests passed")
//! );
//!
//! let result = run_applescript(&script);
//! if !result.success {
//!     eprintln!("notification failed: {}", result.error.unwrap_or_default());
//! }
//! ```

use osabridge_core::ScriptRunner;
use osabridge_domain::constants::{SCRIPT_PREVIEW_CHARS, UNKNOWN_SCRIPT_ERROR};
use osabridge_domain::{Result as DomainResult, RunnerConfig, ScriptExecutionResult};

use super::process::{run_with_input, CapturedProcess, ProcessLimits};

/// Runs scripts by piping them into an interpreter process.
///
/// One call spawns exactly one process and blocks until it exits, is killed
/// for running past the timeout, or is killed for exceeding the output cap.
#[derive(Debug, Clone, Default)]
pub struct OsascriptRunner {
    config: RunnerConfig,
}

impl OsascriptRunner {
    /// Create a runner with validated settings.
    ///
    /// # Errors
    /// Returns `OsaBridgeError::Config` if the configuration is unusable.
    pub fn new(config: RunnerConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings this runner was built with.
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute a script and report the outcome.
    ///
    /// Leading and trailing whitespace is trimmed from the script before it is
    /// submitted, and from both captured streams afterwards.
    ///
    /// On failure `error` holds, in priority order: the spawn-level error
    /// (spawn, timeout, output cap...), the interpreter's stderr, or a generic
    /// message when both are empty.
    #[must_use]
    pub fn execute(&self, script: &str) -> ScriptExecutionResult {
        let script = script.trim();

        tracing::debug!(
            interpreter = %self.config.interpreter,
            script_preview = %script.chars().take(SCRIPT_PREVIEW_CHARS).collect::<String>(),
            script_len = script.len(),
            timeout_ms = self.config.timeout_ms,
            "Executing AppleScript"
        );

        let limits = ProcessLimits {
            timeout: self.config.timeout(),
            max_output_bytes: self.config.max_output_bytes,
        };
        let captured = run_with_input(&self.config.interpreter, script, limits);

        into_execution_result(captured)
    }

    /// Execute a script and keep its output only on a non-empty success.
    ///
    /// Useful for optional lookups where a failure should not halt the
    /// caller. `context` describes what the script does, for logging.
    pub fn execute_optional(&self, script: &str, context: &str) -> Option<String> {
        let result = self.execute(script);
        match (result.success, result.error.as_deref()) {
            (true, _) if !result.output.is_empty() => {
                tracing::trace!(
                    context = %context,
                    output_len = result.output.len(),
                    "AppleScript succeeded"
                );
            }
            (true, _) => {
                tracing::trace!(context = %context, "AppleScript returned empty output");
            }
            (false, error) => {
                tracing::debug!(
                    context = %context,
                    error = error.unwrap_or_default(),
                    "AppleScript failed (optional)"
                );
            }
        }
        result.into_output()
    }
}

impl ScriptRunner for OsascriptRunner {
    fn run(&self, script: &str) -> ScriptExecutionResult {
        self.execute(script)
    }
}

/// Run a script with the default settings (`osascript`, 10s, 10 MiB).
#[must_use]
pub fn run_applescript(script: &str) -> ScriptExecutionResult {
    OsascriptRunner::default().execute(script)
}

/// Run a script with the default settings and return its output only when it
/// succeeded with something to say.
pub fn run_applescript_optional(script: &str, context: &str) -> Option<String> {
    OsascriptRunner::default().execute_optional(script, context)
}

fn into_execution_result(captured: CapturedProcess) -> ScriptExecutionResult {
    let succeeded = captured.succeeded();
    let stdout = String::from_utf8_lossy(&captured.stdout).trim().to_string();

    if succeeded {
        tracing::debug!(
            output_len = stdout.len(),
            output_preview = %stdout.chars().take(SCRIPT_PREVIEW_CHARS).collect::<String>(),
            "AppleScript executed successfully"
        );
        return ScriptExecutionResult::succeeded(stdout);
    }

    let stderr = String::from_utf8_lossy(&captured.stderr).trim().to_string();
    let message = match captured.failure {
        Some(failure) => failure.to_string(),
        None if !stderr.is_empty() => stderr,
        None => UNKNOWN_SCRIPT_ERROR.to_string(),
    };

    tracing::warn!(
        exit_code = captured.status.and_then(|status| status.code()),
        error = %message,
        "AppleScript failed"
    );

    ScriptExecutionResult::failed(stdout, message)
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::{Duration, Instant};

    use osabridge_domain::OsaBridgeError;

    use super::*;

    /// `/bin/sh` reads its program from stdin just like `osascript` does.
    fn sh_runner(timeout_ms: u64) -> OsascriptRunner {
        OsascriptRunner::new(RunnerConfig { timeout_ms, ..RunnerConfig::with_interpreter("sh") })
            .unwrap()
    }

    #[test]
    fn test_success_returns_trimmed_stdout() {
        let result = sh_runner(5_000).execute("echo ok");
        assert_eq!(result, ScriptExecutionResult::succeeded("ok"));
    }

    #[test]
    fn test_script_is_trimmed_before_submission() {
        // `wc` reports lines, words and bytes of exactly what arrived on stdin.
        let runner = OsascriptRunner::new(RunnerConfig::with_interpreter("wc")).unwrap();
        let result = runner.execute("\n\t  abc  \n\n");
        assert!(result.success);
        let counts: Vec<&str> = result.output.split_whitespace().collect();
        assert_eq!(counts, vec!["0", "1", "3"]);
    }

    #[test]
    fn test_nonzero_exit_uses_stderr() {
        let result = sh_runner(5_000).execute("echo boom >&2; exit 1");
        assert_eq!(result, ScriptExecutionResult::failed("", "boom"));
    }

    #[test]
    fn test_failure_keeps_stdout() {
        let result = sh_runner(5_000).execute("echo partial; echo '  bad  ' >&2; exit 2");
        assert!(!result.success);
        assert_eq!(result.output, "partial");
        assert_eq!(result.error.as_deref(), Some("bad"));
    }

    #[test]
    fn test_silent_failure_uses_fallback_message() {
        let result = sh_runner(5_000).execute("exit 1");
        assert_eq!(result, ScriptExecutionResult::failed("", UNKNOWN_SCRIPT_ERROR));
    }

    #[test]
    fn test_whitespace_only_stderr_uses_fallback_message() {
        let result = sh_runner(5_000).execute("printf '  \\n ' >&2; exit 1");
        assert_eq!(result.error.as_deref(), Some(UNKNOWN_SCRIPT_ERROR));
    }

    #[test]
    fn test_spawn_failure_reported() {
        let runner = OsascriptRunner::new(RunnerConfig::with_interpreter(
            "osabridge-definitely-missing-interpreter",
        ))
        .unwrap();
        let result = runner.execute("return 1");
        assert!(!result.success);
        assert_eq!(result.output, "");
        let error = result.error.unwrap();
        assert!(error.contains("failed to spawn osabridge-definitely-missing-interpreter"));
    }

    #[test]
    fn test_timeout_returns_failure_promptly() {
        let started = Instant::now();
        let result = sh_runner(300).execute("exec sleep 30");
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out after 300ms"));
    }

    #[test]
    fn test_output_cap_reported() {
        let runner = OsascriptRunner::new(RunnerConfig {
            max_output_bytes: 16,
            ..RunnerConfig::with_interpreter("sh")
        })
        .unwrap();
        let result = runner.execute("yes abc | head -c 4096");
        assert!(!result.success);
        assert!(result.error.unwrap().contains("output exceeded 16 bytes"));
        assert!(result.output.len() <= 16);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let result = sh_runner(5_000).execute("printf 'a\\377b'");
        assert!(result.success);
        assert_eq!(result.output, "a\u{FFFD}b");
    }

    #[test]
    fn test_execute_optional() {
        let runner = sh_runner(5_000);
        assert_eq!(runner.execute_optional("echo Safari", "app name"), Some("Safari".into()));
        assert_eq!(runner.execute_optional("true", "empty"), None);
        assert_eq!(runner.execute_optional("exit 1", "failing"), None);
    }

    #[test]
    fn test_config_accessor_reflects_settings() {
        let runner = sh_runner(1_234);
        assert_eq!(runner.config().interpreter, "sh");
        assert_eq!(runner.config().timeout(), Duration::from_millis(1_234));
        assert_eq!(OsascriptRunner::default().config(), &RunnerConfig::default());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = OsascriptRunner::new(RunnerConfig::with_interpreter("")).unwrap_err();
        assert!(matches!(err, OsaBridgeError::Config(_)));
    }

    #[test]
    fn test_trait_object_dispatch() {
        let runner: Box<dyn ScriptRunner> = Box::new(sh_runner(5_000));
        assert_eq!(runner.run_optional("echo hi"), Some("hi".to_string()));
    }
}
