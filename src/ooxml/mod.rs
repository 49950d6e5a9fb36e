//! Office Open XML (OOXML) format implementation.
//!
//! This module provides revision processing for Office Open XML word
//! processing documents (.docx).
//!
//! # Architecture
//!
//! The module is organized into several layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, content types)
//! 2. **Errors** (`error`): The OOXML error type wrapping the other layers
//! 3. **Format-Specific Modules**:
//!    - `docx`: Word documents
//!
//! # Example: Accepting all changes
//!
//! ```rust,no_run
//! use redline::ooxml::docx::Package;
//!
//! let pkg = Package::open("contract.docx")?;
//! let accepted = pkg.accept_revisions()?;
//! accepted.save("contract-final.docx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;

// Re-export commonly used types from OPC layer
pub use opc::{ContentTypeMap, OpcError};

// Re-export error types
pub use error::{OoxmlError, Result};
