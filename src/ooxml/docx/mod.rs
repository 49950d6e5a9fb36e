/// Word (.docx) tracked-change processing.
///
/// This module resolves the revisions recorded by change tracking in
/// Microsoft Word documents in the Office Open XML (OOXML) format (.docx
/// files).
///
/// # Architecture
///
/// The module is organized in layers:
/// - `tree`: The typed content tree of a story part
/// - `xml`: Markup binding between part XML and the tree
/// - `revision`: The accept/reject processor working on trees
/// - `Package`: The overall .docx file package
///
/// # Example
///
/// ```rust,no_run
/// use redline::ooxml::docx::Package;
/// use redline::ooxml::docx::revision::{Mode, RevisionOptions};
///
/// let package = Package::open("review.docx")?;
/// let clean = package.process(Mode::Reject, &RevisionOptions::default())?;
/// clean.save("original.docx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod package;
pub mod revision;
pub mod tree;
pub mod xml;

pub use package::Package;
pub use revision::{Mode, RevisionError, RevisionOptions};
