/// WordprocessingML markup binding.
///
/// Converts story-part XML into the content tree ([`read_part`]) and back
/// ([`write_part`]). Markup the tree does not model is carried through as
/// opaque elements, so a part without revisions round-trips unchanged.
///
/// Auxiliary parts (`styles.xml`, `numbering.xml`) have no typed tree; they
/// are handled as plain [`Element`](crate::ooxml::docx::tree::Element)s via
/// [`parse_element`] and [`write_document`].
pub mod dom;
pub mod read;
pub mod write;

pub use dom::{XML_DECLARATION, parse as parse_element, to_document as write_document};
pub use read::{part_from_element, read_part};
pub use write::{ToXml, write_part};
