//! # osabridge Core
//!
//! Pure logic layer - no process or filesystem access.
//!
//! This crate contains:
//! - AppleScript string escaping and literal quoting
//! - The port trait script runners implement
//!
//! ## Architecture Principles
//! - Only depends on `osabridge-domain`
//! - All external effects via traits

pub mod applescript;

pub use applescript::escape::{applescript_string_literal, escape_applescript_string};
pub use applescript::ports::ScriptRunner;
