//! Unified error types for the redline library.
//!
//! This module provides a unified error type that encompasses errors from
//! the container, markup and revision layers, presenting a consistent API
//! to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
