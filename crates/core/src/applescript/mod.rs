//! AppleScript building blocks that never touch the interpreter.

pub mod escape;
pub mod ports;
