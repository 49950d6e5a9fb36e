/// Open Packaging Conventions (OPC) container access.
///
/// The subset of OPC a revision pass needs:
///
/// - ZIP-based physical packaging, read fully into memory
/// - Content type discovery from `[Content_Types].xml`
///
/// Relationships are not interpreted; story parts are found by content type
/// and every member is written back under its original name.

pub mod constants;
pub mod content_types;
pub mod error;
pub mod phys_pkg;

pub use content_types::ContentTypeMap;
pub use error::OpcError;
pub use phys_pkg::{Member, PhysPkgReader, PhysPkgWriter};
