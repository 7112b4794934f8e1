//! Port interface for script execution
//!
//! Infrastructure provides the process-backed implementation; callers that
//! only build and submit scripts depend on this trait instead.

use osabridge_domain::ScriptExecutionResult;

/// Trait for running a script body through an interpreter
pub trait ScriptRunner: Send + Sync {
    /// Run `script` once and report how it went.
    ///
    /// Blocks until the interpreter exits or the runner gives up on it.
    /// Failures are returned inside the result, never as a panic.
    fn run(&self, script: &str) -> ScriptExecutionResult;

    /// Run `script` and keep its output only if it succeeded with something
    /// to say.
    fn run_optional(&self, script: &str) -> Option<String> {
        self.run(script).into_output()
    }
}
