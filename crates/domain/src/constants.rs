//! Domain constants
//!
//! Centralized location for the defaults the runner and loader fall back to.

// Interpreter defaults
pub const DEFAULT_INTERPRETER: &str = "osascript";
pub const DEFAULT_SCRIPT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Message used when a failed run left nothing on either output channel.
pub const UNKNOWN_SCRIPT_ERROR: &str = "Unknown error occurred while executing AppleScript";

// Logging
pub const SCRIPT_PREVIEW_CHARS: usize = 100;

// Environment variables read by the config loader
pub const ENV_INTERPRETER: &str = "OSABRIDGE_INTERPRETER";
pub const ENV_TIMEOUT_MS: &str = "OSABRIDGE_TIMEOUT_MS";
pub const ENV_MAX_OUTPUT_BYTES: &str = "OSABRIDGE_MAX_OUTPUT_BYTES";
