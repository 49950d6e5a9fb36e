/// Property sets attached to runs, paragraphs, sections, tables, rows and cells.
use super::element::{Attribute, Element};
use super::revision::{Markers, RevisionInfo, Tracked};

/// An ordered list of property elements (`w:b`, `w:jc`, `w:tblW`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    /// Property elements in source order
    pub elements: Vec<Element>,
}

impl PropertySet {
    /// Create a property set from elements.
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Whether the set holds no properties.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Property element by qualified name.
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Remove every property with the given name.
    pub fn remove(&mut self, name: &str) {
        self.elements.retain(|e| e.name != name);
    }
}

impl FromIterator<Element> for PropertySet {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Run properties (`w:rPr`) with an optional `w:rPrChange`.
pub type RunProperties = Tracked<PropertySet>;

/// Paragraph list reference (`w:numPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingReference {
    /// `w:ilvl`, `w:numId` and anything else, in source order
    pub elements: Vec<Element>,
    /// Set when the reference itself was inserted (`w:numPr/w:ins`)
    pub inserted: Option<RevisionInfo>,
    /// Legacy numbering change record (`w:numberingChange`)
    pub change: Option<NumberingChange>,
}

impl NumberingReference {
    /// Reference to a list level.
    pub fn new(num_id: u32, level: u32) -> Self {
        Self {
            elements: vec![
                Element::new("w:ilvl").with_attr("w:val", level.to_string()),
                Element::new("w:numId").with_attr("w:val", num_id.to_string()),
            ],
            inserted: None,
            change: None,
        }
    }

    /// List level (`w:ilvl`).
    pub fn level(&self) -> Option<u32> {
        self.value_of("w:ilvl")
    }

    /// Numbering definition instance (`w:numId`).
    pub fn num_id(&self) -> Option<u32> {
        self.value_of("w:numId")
    }

    fn value_of(&self, name: &str) -> Option<u32> {
        self.elements
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.attr("w:val"))
            .and_then(|v| v.parse().ok())
    }
}

/// Prior state of a numbering reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingChange {
    /// Author/date/id
    pub info: RevisionInfo,
    /// Previous numbering value (`w:original`); empty when the paragraph was
    /// not numbered, `None` only for malformed input
    pub original: Option<String>,
}

/// One child of `w:pPr` other than the paragraph mark and section properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphProperty {
    /// List reference
    Numbering(NumberingReference),
    /// Any other property element
    Other(Element),
}

impl ParagraphProperty {
    /// Qualified element name.
    pub fn name(&self) -> &str {
        match self {
            Self::Numbering(_) => "w:numPr",
            Self::Other(e) => &e.name,
        }
    }
}

/// The paragraph mark: its run properties and revision markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphMark {
    /// Formatting of the mark (`w:pPr/w:rPr`)
    pub properties: RunProperties,
    /// `w:ins`/`w:del`/`w:moveFrom`/`w:moveTo` on the mark
    pub markers: Markers,
}

impl ParagraphMark {
    /// Whether there is anything to write into `w:pPr/w:rPr`.
    pub fn is_empty(&self) -> bool {
        self.properties.current.is_empty()
            && self.properties.change.is_none()
            && self.markers.is_empty()
    }
}

/// Section properties (`w:sectPr`) with an optional `w:sectPrChange`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionProperties {
    /// Attributes of `w:sectPr` (rsids)
    pub attributes: Vec<Attribute>,
    /// Properties and change record
    pub properties: Tracked<PropertySet>,
}

/// Paragraph properties (`w:pPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphProperties {
    /// Paragraph properties proper, with an optional `w:pPrChange` whose
    /// snapshot holds the prior items
    pub items: Tracked<Vec<ParagraphProperty>>,
    /// Paragraph mark formatting and revisions
    pub mark: ParagraphMark,
    /// Section break carried by this paragraph
    pub section: Option<SectionProperties>,
}

impl ParagraphProperties {
    /// Paragraph style id (`w:pStyle`).
    pub fn style(&self) -> Option<&str> {
        self.items.current.iter().find_map(|p| match p {
            ParagraphProperty::Other(e) if e.name == "w:pStyle" => e.attr("w:val"),
            _ => None,
        })
    }

    /// Builder: set the paragraph style.
    pub fn with_style(mut self, style: &str) -> Self {
        self.items.current.retain(|p| p.name() != "w:pStyle");
        self.items.current.insert(
            0,
            ParagraphProperty::Other(Element::new("w:pStyle").with_attr("w:val", style)),
        );
        self
    }

    /// List reference, if the paragraph is numbered.
    pub fn numbering(&self) -> Option<&NumberingReference> {
        self.items.current.iter().find_map(|p| match p {
            ParagraphProperty::Numbering(n) => Some(n),
            ParagraphProperty::Other(_) => None,
        })
    }

    /// Whether there is anything to write into `w:pPr`.
    pub fn is_empty(&self) -> bool {
        self.items.current.is_empty()
            && self.items.change.is_none()
            && self.mark.is_empty()
            && self.section.is_none()
    }
}

/// Row properties (`w:trPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowProperties {
    /// Properties and `w:trPrChange`
    pub properties: Tracked<PropertySet>,
    /// `w:ins`/`w:del` on the row
    pub markers: Markers,
}

impl RowProperties {
    /// Whether there is anything to write into `w:trPr`.
    pub fn is_empty(&self) -> bool {
        self.properties.current.is_empty()
            && self.properties.change.is_none()
            && self.markers.is_empty()
    }
}

/// Vertical merge revision record (`w:cellMerge`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMerge {
    /// Author/date/id
    pub info: RevisionInfo,
    /// Current vertical merge (`w:vMerge`: `rest` or `cont`)
    pub merge: Option<String>,
    /// Vertical merge before the change (`w:vMergeOrig`)
    pub original: Option<String>,
}

/// Cell properties (`w:tcPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellProperties {
    /// Properties and `w:tcPrChange`
    pub properties: Tracked<PropertySet>,
    /// `w:cellIns`/`w:cellDel`
    pub markers: Markers,
    /// `w:cellMerge`
    pub merge: Option<CellMerge>,
}

impl CellProperties {
    /// Whether the cell continues a vertical merge from the row above.
    pub fn is_merge_continuation(&self) -> bool {
        self.properties
            .current
            .get("w:vMerge")
            .is_some_and(|e| e.attr("w:val").is_none_or(|v| v == "continue"))
    }

    /// Whether there is anything to write into `w:tcPr`.
    pub fn is_empty(&self) -> bool {
        self.properties.current.is_empty()
            && self.properties.change.is_none()
            && self.markers.is_empty()
            && self.merge.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_reference_values() {
        let num = NumberingReference::new(4, 1);
        assert_eq!(num.num_id(), Some(4));
        assert_eq!(num.level(), Some(1));
    }

    #[test]
    fn test_paragraph_style() {
        let props = ParagraphProperties::default().with_style("Heading1");
        assert_eq!(props.style(), Some("Heading1"));
        let props = props.with_style("Title");
        assert_eq!(props.style(), Some("Title"));
        assert_eq!(props.items.current.len(), 1);
    }

    #[test]
    fn test_vertical_merge_flag() {
        let mut cell = CellProperties::default();
        assert!(!cell.is_merge_continuation());

        cell.properties.current = PropertySet::new(vec![Element::new("w:vMerge")]);
        assert!(cell.is_merge_continuation());

        cell.properties.current =
            PropertySet::new(vec![Element::new("w:vMerge").with_attr("w:val", "restart")]);
        assert!(!cell.is_merge_continuation());
    }

    #[test]
    fn test_empty_checks() {
        assert!(ParagraphProperties::default().is_empty());
        assert!(RowProperties::default().is_empty());
        assert!(CellProperties::default().is_empty());
    }
}
