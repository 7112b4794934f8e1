//! Platform integrations
//!
//! # Modules
//!
//! - [`applescript`] - Script runner backed by the `osascript` interpreter
//! - [`process`] - Bounded subprocess execution (stdin feed, capture, deadline)
//!
//! The runner itself is not gated on macOS: the interpreter is configurable,
//! and on hosts without `osascript` every run fails with a spawn error.

pub mod applescript;
pub mod process;

pub use applescript::{run_applescript, run_applescript_optional, OsascriptRunner};
