/// Tracked-change processing: accept or reject every revision in a document.
///
/// A WordprocessingML document with change tracking carries insertions,
/// deletions, moves, paragraph-mark changes, row and cell changes and
/// property-change records. This module rewrites a content tree so that all
/// of them are resolved in one direction, producing a document with no
/// revision markup left.
///
/// # Architecture
///
/// - [`classify`](self::classify): revision kinds and the `(kind, mode)`
///   action table
/// - [`MoveTable`]: pairing of move sources and destinations across parts
/// - [`FieldPlan`]: which complex-field markers may be removed
/// - rewriter, paragraph, table: the mode-driven tree rewrite
/// - markup: resolution of revisions inside opaque markup and auxiliary parts
/// - [`validate`]: the post-condition check
///
/// # Example
///
/// ```rust
/// use redline::ooxml::docx::revision::{self, Mode, RevisionOptions};
/// use redline::ooxml::docx::tree::{Block, Inline, Paragraph, Part, PartKind, Run};
///
/// let para = Paragraph::new()
///     .push(Inline::Run(Run::text("kept ")))
///     .push(Inline::inserted("1", vec![Inline::Run(Run::text("added"))]));
/// let part = Part::new("/word/document.xml", PartKind::MainDocument)
///     .with_content(vec![Block::Paragraph(para)]);
///
/// let accepted = revision::process_part(&part, Mode::Accept, &RevisionOptions::default())?;
/// assert_eq!(accepted.paragraphs().next().unwrap().text(), "kept added");
///
/// let rejected = revision::reject_part(&part)?;
/// assert_eq!(rejected.paragraphs().next().unwrap().text(), "kept ");
/// # Ok::<(), redline::ooxml::docx::revision::RevisionError>(())
/// ```
pub mod classify;
pub mod error;
pub mod fields;
pub mod markup;
pub mod moves;
pub mod options;
mod paragraph;
mod rewriter;
mod table;
pub mod validate;

#[cfg(test)]
mod tests;

pub use classify::{Action, Mode, RevisionKind, action};
pub use error::{Result, RevisionError};
pub use fields::FieldPlan;
pub use markup::is_revision_element;
pub use moves::MoveTable;
pub use options::RevisionOptions;
pub use validate::validate;

pub(crate) use markup::MarkupResolver;
pub(crate) use rewriter::rewrite;

use crate::ooxml::docx::Package;
use crate::ooxml::docx::tree::Part;
use tracing::debug;

/// Resolve every revision in one part.
///
/// Moves must pair up within the part; for documents whose moves span
/// several parts use the package-level entry points.
///
/// # Errors
///
/// Any [`RevisionError`]; the part is not modified on failure.
pub fn process_part(part: &Part, mode: Mode, options: &RevisionOptions) -> Result<Part> {
    // Pairing check only; the rewriter treats moves as insertions and deletions.
    let paired_moves = MoveTable::for_part(part)?.len();
    debug!(part = %part.name, %mode, moves = paired_moves, "processing revisions");

    let resolved = rewrite(part, mode)?;
    if options.validate {
        validate(&resolved)?;
    }
    Ok(resolved)
}

/// Accept every revision in one part.
#[inline]
pub fn accept_part(part: &Part) -> Result<Part> {
    process_part(part, Mode::Accept, &RevisionOptions::default())
}

/// Reject every revision in one part.
#[inline]
pub fn reject_part(part: &Part) -> Result<Part> {
    process_part(part, Mode::Reject, &RevisionOptions::default())
}

/// Accept every revision in a package, returning the processed copy.
#[inline]
pub fn accept_revisions(package: &Package) -> crate::ooxml::Result<Package> {
    package.accept_revisions()
}

/// Reject every revision in a package, returning the processed copy.
#[inline]
pub fn reject_revisions(package: &Package) -> crate::ooxml::Result<Package> {
    package.reject_revisions()
}
