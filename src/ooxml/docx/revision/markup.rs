/// Revision resolution for markup carried opaquely.
///
/// Math zones, drawings with text boxes, style definitions and anything else
/// the content tree holds as plain [`Element`]s are resolved here by element
/// name, through the same mode/action table as typed nodes. Whole auxiliary
/// parts (`styles.xml`, `numbering.xml`) go through [`MarkupResolver::document`].
///
/// Paragraph marks found here are resolved as plain markers: the marker is
/// discarded and the paragraph boundary stays.
use super::classify::{Action, Mode, RevisionKind, action};
use super::error::{Context, Result};
use crate::ooxml::docx::tree::{Element, MarkerKind, Node, NodePath};
use tracing::trace;

/// Property-change records and the element holding their snapshot.
const CHANGE_RECORDS: [&str; 8] = [
    "w:rPrChange",
    "w:pPrChange",
    "w:sectPrChange",
    "w:tblPrChange",
    "w:tblPrExChange",
    "w:trPrChange",
    "w:tcPrChange",
    "w:tblGridChange",
];

/// Revision records that carry no content and are always removed.
const RECORDS: [&str; 4] = ["w:numberingChange", "w:cellIns", "w:cellDel", "w:cellMerge"];

/// Parents in which `w:ins`/`w:del`/... are markers rather than wrappers.
const MARKER_PARENTS: [&str; 3] = ["w:rPr", "w:trPr", "w:numPr"];

/// Whether the element links a section to a header or footer part. Section
/// change snapshots never carry these, so they survive a rejected change.
#[inline]
pub(crate) fn is_section_reference(name: &str) -> bool {
    matches!(name, "w:headerReference" | "w:footerReference")
}

/// Whether the element is a property-change record.
#[inline]
pub fn is_change_record(name: &str) -> bool {
    CHANGE_RECORDS.contains(&name)
}

/// Whether the element is a range boundary that is always stripped.
pub fn is_range_boundary(name: &str) -> bool {
    let Some(local) = name.strip_prefix("w:") else {
        return false;
    };
    let Some(range) = local
        .strip_suffix("RangeStart")
        .or_else(|| local.strip_suffix("RangeEnd"))
    else {
        return false;
    };
    matches!(
        range,
        "moveFrom"
            | "moveTo"
            | "customXmlIns"
            | "customXmlDel"
            | "customXmlMoveFrom"
            | "customXmlMoveTo"
    )
}

/// Whether the element is revision markup of any kind.
pub fn is_revision_element(name: &str) -> bool {
    MarkerKind::from_element_name(name).is_some()
        || is_change_record(name)
        || is_range_boundary(name)
        || RECORDS.contains(&name)
        || matches!(name, "w:delText" | "w:delInstrText")
}

/// Resolver for opaque markup.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkupResolver<'a> {
    ctx: Context<'a>,
    mode: Mode,
}

impl<'a> MarkupResolver<'a> {
    pub fn new(part: &'a str, mode: Mode) -> Self {
        Self {
            ctx: Context::new(part),
            mode,
        }
    }

    /// Resolve the root element of an auxiliary part.
    pub fn document(&self, root: &Element) -> Result<Element> {
        let path = NodePath::root();
        Ok(Element {
            name: root.name.clone(),
            attributes: root.attributes.clone(),
            children: self.children(root, &path)?,
        })
    }

    /// Resolve one opaque element. Wrappers that are kept unwrap into their
    /// children, so the result holds zero or more elements.
    pub fn element(&self, element: &Element, path: &NodePath) -> Result<Vec<Element>> {
        let mut out = Vec::new();
        self.node(element, "", path, &mut out)?;
        Ok(out
            .into_iter()
            .filter_map(|n| match n {
                Node::Element(e) => Some(e),
                Node::Text(_) => None,
            })
            .collect())
    }

    /// Resolve a list of property elements.
    pub fn elements(&self, elements: &[Element], path: &NodePath) -> Result<Vec<Element>> {
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            out.extend(self.element(element, path)?);
        }
        Ok(out)
    }

    fn node(
        &self,
        element: &Element,
        parent: &str,
        path: &NodePath,
        out: &mut Vec<Node>,
    ) -> Result<()> {
        let name = element.name.as_str();
        if is_range_boundary(name) || RECORDS.contains(&name) || is_change_record(name) {
            // Change records are applied by their parent.
            return Ok(());
        }

        if let Some(kind) = MarkerKind::from_element_name(name) {
            if MARKER_PARENTS.contains(&parent) {
                return Ok(());
            }
            if action(RevisionKind::from(kind), self.mode) == Action::Drop {
                trace!(part = self.ctx.part, %path, element = name, "opaque wrapper dropped");
                return Ok(());
            }
            for child in &element.children {
                match child {
                    Node::Element(c) => self.node(c, parent, path, out)?,
                    Node::Text(t) => out.push(Node::Text(t.clone())),
                }
            }
            return Ok(());
        }

        if self.dropped(element, path)? {
            trace!(part = self.ctx.part, %path, element = name, "opaque node dropped");
            return Ok(());
        }

        let name = match name {
            "w:delText" => "w:t",
            "w:delInstrText" => "w:instrText",
            other => other,
        };
        out.push(Node::Element(Element {
            name: name.to_string(),
            attributes: element.attributes.clone(),
            children: self.children(element, path)?,
        }));
        Ok(())
    }

    /// Resolved children of an element, applying its change record.
    fn children(&self, element: &Element, path: &NodePath) -> Result<Vec<Node>> {
        let record = element.child_elements().find(|c| is_change_record(&c.name));

        let mut source: Vec<&Node> = Vec::new();
        match record {
            Some(record) if self.mode == Mode::Reject => {
                let snapshot = record.child_elements().next().ok_or_else(|| {
                    self.ctx.malformed(
                        path,
                        format!("<{}> without a prior snapshot", record.name),
                    )
                })?;
                trace!(part = self.ctx.part, %path, record = %record.name, "snapshot restored");
                if record.name == "w:sectPrChange" {
                    source.extend(element.children.iter().filter(|n| {
                        matches!(n, Node::Element(e) if is_section_reference(&e.name))
                    }));
                    source.extend(snapshot.children.iter().filter(|n| {
                        !matches!(n, Node::Element(e) if is_section_reference(&e.name))
                    }));
                } else {
                    source.extend(snapshot.children.iter());
                }
                if record.name == "w:pPrChange" {
                    // The snapshot holds paragraph properties proper only.
                    source.extend(element.children.iter().filter(|n| {
                        matches!(n, Node::Element(e) if e.name == "w:rPr" || e.name == "w:sectPr")
                    }));
                }
            },
            _ => source.extend(element.children.iter()),
        }

        let mut out = Vec::with_capacity(source.len());
        for node in source {
            match node {
                Node::Element(child) => self.node(child, &element.name, path, &mut out)?,
                Node::Text(t) => out.push(Node::Text(t.clone())),
            }
        }
        Ok(out)
    }

    /// Whether a row, cell or list reference disappears in this mode.
    fn dropped(&self, element: &Element, path: &NodePath) -> Result<bool> {
        let markers = |props: &str, kind_of: fn(&str) -> Option<MarkerKind>| {
            element
                .child(props)
                .into_iter()
                .flat_map(|p| p.child_elements())
                .filter_map(|m| kind_of(&m.name))
                .any(|kind| action(kind.into(), self.mode) == Action::Drop)
        };

        Ok(match element.name.as_str() {
            "w:tr" => markers("w:trPr", MarkerKind::from_element_name),
            "w:tc" => markers("w:tcPr", |name| match name {
                "w:cellIns" => Some(MarkerKind::Inserted),
                "w:cellDel" => Some(MarkerKind::Deleted),
                _ => None,
            }),
            "w:numPr" if self.mode == Mode::Reject => {
                if element.child("w:ins").is_some() {
                    return Ok(true);
                }
                match element.child("w:numberingChange") {
                    Some(change) => match change.attr("w:original") {
                        Some(original) => original.is_empty(),
                        None => {
                            return Err(self.ctx.malformed(
                                path,
                                "<w:numberingChange> without w:original",
                            ));
                        },
                    },
                    None => false,
                }
            },
            _ => false,
        })
    }
}
