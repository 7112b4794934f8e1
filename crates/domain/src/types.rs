//! Result shape returned by every script run

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::errors::{OsaBridgeError, Result};

/// ScriptExecutionResult - Outcome of a single interpreter invocation
///
/// `output` is always present (empty when the interpreter printed nothing).
/// `error` is only ever set on failure; build values through
/// [`ScriptExecutionResult::succeeded`] and [`ScriptExecutionResult::failed`]
/// to keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ScriptExecutionResult {
    pub success: bool,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts-gen", ts(optional))]
    pub error: Option<String>,
}

impl ScriptExecutionResult {
    /// Successful run with the interpreter's (already trimmed) stdout.
    #[must_use]
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self { success: true, output: output.into(), error: None }
    }

    /// Failed run. `output` is whatever stdout was captured, possibly empty.
    #[must_use]
    pub fn failed(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self { success: false, output: output.into(), error: Some(error.into()) }
    }

    /// Convert into a `Result`, mapping failures to [`OsaBridgeError::Script`].
    ///
    /// # Errors
    /// Returns `OsaBridgeError::Script` carrying the failure message when the
    /// run did not succeed.
    pub fn into_result(self) -> Result<String> {
        if self.success {
            Ok(self.output)
        } else {
            Err(OsaBridgeError::Script(self.error.unwrap_or_default()))
        }
    }

    /// `Some(output)` for a successful run that printed something.
    #[must_use]
    pub fn into_output(self) -> Option<String> {
        (self.success && !self.output.is_empty()).then_some(self.output)
    }
}
