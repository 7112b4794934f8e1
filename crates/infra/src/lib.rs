//! # osabridge Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The process-backed AppleScript runner
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Implements traits defined in `osabridge-core`
//! - Contains all "impure" code (processes, filesystem, environment)

pub mod config;
pub mod platform;

// Re-export commonly used items
pub use platform::*;
