/// Package implementation for Word documents.
use crate::ooxml::docx::revision::error::Context;
use crate::ooxml::docx::revision::{
    self, MarkupResolver, Mode, MoveTable, RevisionOptions, is_revision_element,
};
use crate::ooxml::docx::tree::{NodePath, Part, PartKind};
use crate::ooxml::docx::xml::{parse_element, read_part, write_document, write_part};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{CONTENT_TYPES_MEMBER, content_type as ct};
use crate::ooxml::opc::{ContentTypeMap, Member, PhysPkgReader, PhysPkgWriter};
use bytes::Bytes;
use memchr::memmem::Finder;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Byte patterns that only occur in parts carrying revision markup.
static REVISION_FINDERS: Lazy<Vec<Finder<'static>>> = Lazy::new(|| {
    [
        "<w:ins",
        "<w:del",
        "<w:moveFrom",
        "<w:moveTo",
        "Change",
        "<w:cellMerge",
        "<w:cellIns",
        "<w:cellDel",
        "<w:customXmlIns",
        "<w:customXmlDel",
        "<w:customXmlMove",
    ]
    .iter()
    .map(|needle| Finder::new(needle.as_bytes()).into_owned())
    .collect()
});

/// Fast check for revision markup in raw part XML.
///
/// May report markup that is not there (the word "Change" in text), never
/// the other way around.
#[inline]
pub fn has_revision_markup(xml: &[u8]) -> bool {
    REVISION_FINDERS.iter().any(|f| f.find(xml).is_some())
}

/// What a member is to the revision pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Story(PartKind),
    Auxiliary,
}

/// A Word (.docx) package.
///
/// The whole container is held in memory. Processing never modifies a
/// package in place; it returns a new one that shares every untouched
/// member with the original.
///
/// # Examples
///
/// ```rust,no_run
/// use redline::ooxml::docx::Package;
///
/// let pkg = Package::open("draft.docx")?;
/// if pkg.has_revisions() {
///     pkg.accept_revisions()?.save("final.docx")?;
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Package {
    /// Archive members in their original order
    members: Vec<Member>,
    /// Parsed `[Content_Types].xml`
    content_types: ContentTypeMap,
    /// Part name of the main document
    main: String,
}

impl Package {
    /// Open a .docx package from a file path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the .docx file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_members(PhysPkgReader::open(path)?)
    }

    /// Create a .docx package from the bytes of the archive.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_members(PhysPkgReader::from_bytes(data)?)
    }

    /// Create a .docx package from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_members(PhysPkgReader::from_reader(reader)?)
    }

    fn from_members(members: Vec<Member>) -> Result<Self> {
        let content_types = members
            .iter()
            .find(|m| m.name == CONTENT_TYPES_MEMBER)
            .ok_or_else(|| OoxmlError::PartNotFound(CONTENT_TYPES_MEMBER.to_string()))
            .and_then(|m| Ok(ContentTypeMap::from_xml(&m.data)?))?;

        // Verify it's a Word document by finding a main part content type
        let main = members
            .iter()
            .map(Member::partname)
            .find(|name| {
                content_types
                    .get(name)
                    .is_some_and(|t| ct::WML_MAIN_TYPES.contains(&t))
            })
            .ok_or_else(|| OoxmlError::InvalidContentType {
                expected: ct::WML_DOCUMENT_MAIN.to_string(),
                got: content_types
                    .get("/word/document.xml")
                    .unwrap_or("none")
                    .to_string(),
            })?;

        debug!(members = members.len(), main = %main, "package loaded");
        Ok(Self {
            members,
            content_types,
            main,
        })
    }

    /// Part name of the main document (`/word/document.xml`).
    #[inline]
    pub fn main_part_name(&self) -> &str {
        &self.main
    }

    /// Archive members in their original order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Content of a member by part name (`/word/styles.xml`).
    pub fn member(&self, partname: &str) -> Option<&Bytes> {
        let name = partname.strip_prefix('/').unwrap_or(partname);
        self.members.iter().find(|m| m.name == name).map(|m| &m.data)
    }

    fn role(&self, member: &Member) -> Option<Role> {
        let partname = member.partname();
        let content_type = self.content_types.get(&partname)?;
        if partname == self.main {
            return Some(Role::Story(PartKind::MainDocument));
        }
        match content_type {
            ct::WML_HEADER => Some(Role::Story(PartKind::Header)),
            ct::WML_FOOTER => Some(Role::Story(PartKind::Footer)),
            ct::WML_FOOTNOTES => Some(Role::Story(PartKind::Footnotes)),
            ct::WML_ENDNOTES => Some(Role::Story(PartKind::Endnotes)),
            ct::WML_STYLES | ct::WML_NUMBERING => Some(Role::Auxiliary),
            _ => None,
        }
    }

    /// Parse every story part: main document, headers, footers, notes.
    pub fn story_parts(&self) -> Result<Vec<Part>> {
        self.members
            .iter()
            .filter_map(|m| match self.role(m) {
                Some(Role::Story(kind)) => Some(read_part(&m.partname(), kind, &m.data)),
                _ => None,
            })
            .collect()
    }

    /// Whether any story or auxiliary part appears to carry revisions.
    pub fn has_revisions(&self) -> bool {
        self.members
            .iter()
            .any(|m| self.role(m).is_some() && has_revision_markup(&m.data))
    }

    /// Accept every revision with default options.
    pub fn accept_revisions(&self) -> Result<Self> {
        self.process(Mode::Accept, &RevisionOptions::default())
    }

    /// Reject every revision with default options.
    pub fn reject_revisions(&self) -> Result<Self> {
        self.process(Mode::Reject, &RevisionOptions::default())
    }

    /// Resolve every revision in the package.
    ///
    /// All story parts are parsed first so that moves can be paired across
    /// part boundaries; then each part is rewritten on its own (in parallel
    /// when `options.parallel` is set). Any failure fails the whole package.
    ///
    /// # Arguments
    ///
    /// * `mode` - Accept or reject
    /// * `options` - Validation and parallelism switches
    pub fn process(&self, mode: Mode, options: &RevisionOptions) -> Result<Self> {
        let mut stories = Vec::new();
        let mut auxiliary = Vec::new();
        for (index, member) in self.members.iter().enumerate() {
            if !has_revision_markup(&member.data) {
                continue;
            }
            match self.role(member) {
                Some(Role::Story(kind)) => stories.push((index, kind)),
                Some(Role::Auxiliary) => auxiliary.push(index),
                None => {},
            }
        }
        debug!(
            %mode,
            stories = stories.len(),
            auxiliary = auxiliary.len(),
            "processing package revisions"
        );

        let parse = |&(index, kind): &(usize, PartKind)| {
            let member = &self.members[index];
            read_part(&member.partname(), kind, &member.data).map(|part| (index, part))
        };
        let parts: Vec<(usize, Part)> = if options.parallel {
            stories.par_iter().map(parse).collect::<Result<_>>()?
        } else {
            stories.iter().map(parse).collect::<Result<_>>()?
        };

        let mut moves = MoveTable::new();
        for (_, part) in &parts {
            moves.add_part(part)?;
        }
        moves.check()?;

        let resolve = |(index, part): &(usize, Part)| -> revision::Result<(usize, Bytes)> {
            let resolved = revision::rewrite(part, mode)?;
            if options.validate {
                revision::validate(&resolved)?;
            }
            debug!(part = %part.name, kind = %part.kind, "revisions resolved");
            Ok((*index, Bytes::from(write_part(&resolved))))
        };
        let mut replaced: Vec<(usize, Bytes)> = if options.parallel {
            parts.par_iter().map(resolve).collect::<revision::Result<_>>()?
        } else {
            parts.iter().map(resolve).collect::<revision::Result<_>>()?
        };

        for index in auxiliary {
            let member = &self.members[index];
            replaced.push((index, self.auxiliary(member, mode, options)?));
        }

        let mut members = self.members.clone();
        for (index, data) in replaced {
            members[index].data = data;
        }
        Ok(Self {
            members,
            content_types: self.content_types.clone(),
            main: self.main.clone(),
        })
    }

    /// Resolve a styles or numbering part through the markup resolver.
    fn auxiliary(&self, member: &Member, mode: Mode, options: &RevisionOptions) -> Result<Bytes> {
        let name = member.partname();
        let root = parse_element(&member.data)?;
        let resolved = MarkupResolver::new(&name, mode).document(&root)?;
        if options.validate && resolved.any(&|e| is_revision_element(&e.name)) {
            return Err(Context::new(&name)
                .violation(&NodePath::root(), "revision markup left in auxiliary part")
                .into());
        }
        debug!(part = %name, "auxiliary revisions resolved");
        Ok(Bytes::from(write_document(&resolved)))
    }

    /// Serialize the package to ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PhysPkgWriter::new();
        for member in &self.members {
            writer.write(member)?;
        }
        Ok(writer.finish()?)
    }

    /// Save the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}
