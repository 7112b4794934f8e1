//! # osabridge Domain
//!
//! Plain data shared by every osabridge crate.
//!
//! This crate contains:
//! - The script execution result shape handed back to callers
//! - Domain error types and Result definitions
//! - Runner configuration
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other osabridge crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
