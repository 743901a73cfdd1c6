//! Shared utilities for the Idobata chat application.
//!
//! Cross-cutting concerns used by every binary in the workspace:
//! logging setup and time handling.

pub mod logger;
pub mod time;
