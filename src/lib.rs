//! Redline - tracked-change processing for Word documents
//!
//! This library resolves the revisions recorded by change tracking in
//! Office Open XML word processing documents (.docx): every insertion,
//! deletion, move, paragraph-mark change, table row and cell change and
//! formatting change is either accepted or rejected, leaving a document
//! without revision markup.
//!
//! # Features
//!
//! - **Accept / Reject**: Resolve all revisions in one direction
//! - **Whole packages**: Main document, headers, footers, footnotes and
//!   endnotes, plus revisions in styles and numbering definitions
//! - **Moves across parts**: Move sources and destinations are paired over
//!   the whole package before anything is rewritten
//! - **Field integrity**: Complex fields are never left unbalanced
//! - **Validation**: Output is checked for leftover markup and broken tables
//! - **Parallel**: Parts are processed on the rayon thread pool
//!
//! # Example - Accepting all changes
//!
//! ```no_run
//! use redline::ooxml::docx::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pkg = Package::open("review.docx")?;
//! let accepted = pkg.accept_revisions()?;
//! accepted.save("final.docx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Working on a single part
//!
//! ```
//! use redline::ooxml::docx::revision;
//! use redline::ooxml::docx::tree::PartKind;
//! use redline::ooxml::docx::xml::{read_part, write_part};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = br#"<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
//!   <w:p><w:del w:id="1"><w:r><w:delText>Confidential</w:delText></w:r></w:del></w:p>
//! </w:ftr>"#;
//! let part = read_part("/word/footer1.xml", PartKind::Footer, xml)?;
//!
//! let rejected = revision::reject_part(&part)?;
//! assert!(write_part(&rejected).contains("<w:t>Confidential</w:t>"));
//! # Ok(())
//! # }
//! ```

/// Shared error type and XML helpers
pub mod common;

/// OOXML (Office Open XML) container and WordprocessingML support
///
/// This module provides the package layer and the revision processor.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use ooxml::docx::revision::{Mode, RevisionOptions};
pub use ooxml::docx::{Package, revision};
