//! Runner configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::{DEFAULT_INTERPRETER, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_SCRIPT_TIMEOUT_MS};
use crate::errors::{OsaBridgeError, Result};

/// Settings for the script runner.
///
/// Every field is optional when deserializing; missing fields take the
/// defaults (`osascript`, 10 seconds, 10 MiB).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(default)]
pub struct RunnerConfig {
    /// Program the script is piped into. Resolved through `PATH`.
    pub interpreter: String,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub timeout_ms: u64,
    /// Cap applied to stdout and stderr independently.
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub max_output_bytes: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            timeout_ms: DEFAULT_SCRIPT_TIMEOUT_MS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl RunnerConfig {
    /// Default settings with a different interpreter program.
    #[must_use]
    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self { interpreter: interpreter.into(), ..Self::default() }
    }

    /// Timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check that the settings describe a runnable configuration.
    ///
    /// # Errors
    /// Returns `OsaBridgeError::Config` for a blank interpreter, a zero
    /// timeout or a zero output cap.
    pub fn validate(&self) -> Result<()> {
        if self.interpreter.trim().is_empty() {
            return Err(OsaBridgeError::Config("interpreter must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(OsaBridgeError::Config("timeout_ms must be greater than zero".to_string()));
        }
        if self.max_output_bytes == 0 {
            return Err(OsaBridgeError::Config(
                "max_output_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
