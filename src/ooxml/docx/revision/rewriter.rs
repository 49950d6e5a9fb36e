/// Mode-driven rewriting of a content tree.
///
/// The rewriter borrows the source tree and builds a new one bottom-up:
/// children are resolved before their container applies its own action,
/// and a container that is dropped discards whatever its children resolved
/// to. Decisions come from the classifier's action table; paragraph marks,
/// rows and cells have their own resolvers, opaque markup goes through the
/// generic markup resolver.
///
/// # Dropped content and fields
///
/// Content under a dropped wrapper is still walked, in *dropping* mode.
/// Nothing is emitted from it except runs holding field structural markers
/// that the [`FieldPlan`] says must survive; those are reduced to their run
/// properties and markers and spliced in where the wrapper was.
use super::classify::{Action, Mode, action, classify_change};
use super::error::{Context, Result};
use super::fields::FieldPlan;
use super::markup::{MarkupResolver, is_section_reference};
use super::moves::inline_label;
use super::paragraph::{Resolved, is_zero_width, merge_paragraphs};
use crate::ooxml::docx::tree::{
    Block, BlockContentControl, Element, Inline, InlineContentControl, InlineGroup, NodePath,
    Note, Part, PropertySet, Run, RunContent, SectionProperties, Text, Tracked,
};
use tracing::trace;

/// Rewriter state for one invocation on one part.
pub(crate) struct Rewriter<'a> {
    pub(crate) ctx: Context<'a>,
    pub(crate) mode: Mode,
    pub(crate) markup: MarkupResolver<'a>,
    plan: FieldPlan,
    /// Ordinal of the next field structural marker in document order
    next_field: usize,
}

/// Rewrite a part in the given mode.
///
/// Move pairing must already be checked; this function treats moves as the
/// insertions and deletions they reduce to.
pub(crate) fn rewrite(part: &Part, mode: Mode) -> Result<Part> {
    let mut rewriter = Rewriter::new(part, mode);
    rewriter.part(part)
}

impl<'a> Rewriter<'a> {
    pub(crate) fn new(part: &'a Part, mode: Mode) -> Self {
        Self {
            ctx: Context::new(&part.name),
            mode,
            markup: MarkupResolver::new(&part.name, mode),
            plan: FieldPlan::build(part, mode),
            next_field: 0,
        }
    }

    fn part(&mut self, part: &Part) -> Result<Part> {
        let root = NodePath::root();
        let leading = self.markup.elements(&part.leading, &root)?;
        let content = self.blocks(&part.content, &root)?;
        let section = part
            .section
            .as_ref()
            .map(|s| self.section(s, &root.child("sectPr", 0)))
            .transpose()?;

        Ok(Part {
            name: part.name.clone(),
            kind: part.kind,
            root: part.root.clone(),
            leading,
            body: part.body.clone(),
            content,
            section,
        })
    }

    /// Pick the property set that survives: the current one, or the prior
    /// snapshot when a change is rejected.
    pub(crate) fn choose<'t, T>(
        &self,
        properties: &'t Tracked<T>,
        path: &NodePath,
        what: &str,
    ) -> Result<&'t T> {
        if !self.restores(properties) {
            return Ok(&properties.current);
        }
        let prior = properties
            .change
            .as_ref()
            .and_then(|record| record.prior.as_ref())
            .ok_or_else(|| {
                self.ctx
                    .malformed(path, format!("{} change without a prior snapshot", what))
            })?;
        trace!(part = self.ctx.part, %path, what, "prior snapshot restored");
        Ok(prior)
    }

    /// Whether this mode replaces the properties with their prior snapshot.
    fn restores<T>(&self, properties: &Tracked<T>) -> bool {
        let class = classify_change(properties.change.as_ref());
        action(class.kind, self.mode) == Action::ReplaceWithSnapshot
    }

    /// Resolve a property set with its change record.
    pub(crate) fn tracked(
        &self,
        properties: &Tracked<PropertySet>,
        path: &NodePath,
    ) -> Result<Tracked<PropertySet>> {
        let chosen = self.choose(properties, path, "property")?;
        Ok(Tracked::new(PropertySet::new(
            self.markup.elements(&chosen.elements, path)?,
        )))
    }

    pub(crate) fn section(
        &self,
        section: &SectionProperties,
        path: &NodePath,
    ) -> Result<SectionProperties> {
        let resolved = self.tracked(&section.properties, path)?;
        if !self.restores(&section.properties) {
            return Ok(SectionProperties {
                attributes: section.attributes.clone(),
                properties: resolved,
            });
        }

        // Header and footer references come first in w:sectPr.
        let current = &section.properties.current.elements;
        let mut elements: Vec<Element> = current
            .iter()
            .filter(|e| is_section_reference(&e.name))
            .cloned()
            .collect();
        elements.extend(
            resolved
                .current
                .elements
                .into_iter()
                .filter(|e| !is_section_reference(&e.name)),
        );
        Ok(SectionProperties {
            attributes: section.attributes.clone(),
            properties: Tracked::new(PropertySet::new(elements)),
        })
    }

    /// Resolve an optional opaque properties element (`w:sdtPr`, ...).
    fn opaque(&self, element: Option<&Element>, path: &NodePath) -> Result<Option<Element>> {
        match element {
            Some(element) => Ok(self.markup.element(element, path)?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Resolve a block container, then apply its paragraph merges.
    pub(crate) fn blocks(&mut self, blocks: &[Block], path: &NodePath) -> Result<Vec<Block>> {
        let mut resolved = Vec::with_capacity(blocks.len());

        for (i, block) in blocks.iter().enumerate() {
            match block {
                Block::Paragraph(p) => {
                    resolved.push(self.paragraph(p, &path.child("p", i))?);
                },
                Block::Table(t) => {
                    if let Some(table) = self.table(t, &path.child("tbl", i))? {
                        resolved.push(Resolved::Barrier(Block::Table(table)));
                    }
                },
                Block::ContentControl(sdt) => {
                    let path = path.child("sdt", i);
                    let content = self.blocks(&sdt.content, &path)?;
                    if !sdt.content.is_empty() && content.is_empty() {
                        trace!(part = self.ctx.part, %path, "emptied content control removed");
                        continue;
                    }
                    resolved.push(Resolved::Barrier(Block::ContentControl(
                        BlockContentControl {
                            properties: self.opaque(sdt.properties.as_ref(), &path)?,
                            end_properties: self.opaque(sdt.end_properties.as_ref(), &path)?,
                            content,
                        },
                    )));
                },
                Block::Note(note) => {
                    let content = self.blocks(&note.content, &path.child("note", i))?;
                    resolved.push(Resolved::Barrier(Block::Note(Note {
                        tag: note.tag.clone(),
                        content,
                    })));
                },
                Block::Other(element) => {
                    for element in self.markup.element(element, &path.child("other", i))? {
                        if is_zero_width(&element.name) {
                            resolved.push(Resolved::Opaque(Block::Other(element)));
                        } else {
                            resolved.push(Resolved::Barrier(Block::Other(element)));
                        }
                    }
                },
            }
        }
        Ok(merge_paragraphs(resolved))
    }

    /// Resolve inline content. In dropping mode only salvaged field runs
    /// come out.
    pub(crate) fn inlines(
        &mut self,
        inlines: &[Inline],
        path: &NodePath,
        dropping: bool,
    ) -> Result<Vec<Inline>> {
        let mut out = Vec::with_capacity(inlines.len());

        for (i, inline) in inlines.iter().enumerate() {
            let path = path.child(inline_label(inline), i);
            match inline {
                Inline::Run(run) => {
                    if let Some(run) = self.run(run, &path, dropping)? {
                        out.push(Inline::Run(run));
                    }
                },
                Inline::Tracked(tracked) => {
                    let drops = action(tracked.marker.kind.into(), self.mode) == Action::Drop;
                    if drops && !dropping {
                        trace!(
                            part = self.ctx.part,
                            %path,
                            kind = %tracked.marker.kind,
                            "revision dropped"
                        );
                    }
                    out.extend(self.inlines(&tracked.content, &path, dropping || drops)?);
                },
                Inline::ContentControl(sdt) => {
                    let content = self.inlines(&sdt.content, &path, dropping)?;
                    if dropping {
                        out.extend(content);
                    } else if !sdt.content.is_empty() && content.is_empty() {
                        trace!(part = self.ctx.part, %path, "emptied content control removed");
                    } else {
                        out.push(Inline::ContentControl(InlineContentControl {
                            properties: self.opaque(sdt.properties.as_ref(), &path)?,
                            end_properties: self.opaque(sdt.end_properties.as_ref(), &path)?,
                            content,
                        }));
                    }
                },
                Inline::Group(group) => {
                    let content = self.inlines(&group.content, &path, dropping)?;
                    if dropping {
                        out.extend(content);
                    } else if !group.content.is_empty() && content.is_empty() {
                        trace!(
                            part = self.ctx.part,
                            %path,
                            group = %group.name,
                            "emptied group removed"
                        );
                    } else {
                        out.push(Inline::Group(InlineGroup {
                            name: group.name.clone(),
                            attributes: group.attributes.clone(),
                            properties: self.opaque(group.properties.as_ref(), &path)?,
                            content,
                        }));
                    }
                },
                Inline::Other(element) => {
                    if !dropping {
                        out.extend(
                            self.markup
                                .element(element, &path)?
                                .into_iter()
                                .map(Inline::Other),
                        );
                    }
                },
            }
        }
        Ok(out)
    }

    fn take_field_ordinal(&mut self) -> usize {
        let ordinal = self.next_field;
        self.next_field += 1;
        ordinal
    }

    /// Skip content that is dropped wholesale, keeping field ordinals aligned.
    pub(crate) fn skip_fields(&mut self, blocks: &[Block]) {
        self.next_field += super::fields::count_field_chars(blocks);
    }

    fn run(&mut self, run: &Run, path: &NodePath, dropping: bool) -> Result<Option<Run>> {
        if dropping {
            return self.salvage(run, path);
        }

        let properties = run
            .properties
            .as_ref()
            .map(|p| self.tracked(p, path))
            .transpose()?;

        let mut content = Vec::with_capacity(run.content.len());
        for item in &run.content {
            match item {
                RunContent::Text(text) => content.push(RunContent::Text(undeleted(text))),
                RunContent::InstrText(text) => content.push(RunContent::InstrText(undeleted(text))),
                RunContent::FieldChar(fld) => {
                    self.take_field_ordinal();
                    content.push(RunContent::FieldChar(fld.clone()));
                },
                RunContent::Other(element) => content.extend(
                    self.markup
                        .element(element, path)?
                        .into_iter()
                        .map(RunContent::Other),
                ),
            }
        }

        Ok(Some(Run {
            attributes: run.attributes.clone(),
            properties,
            content,
        }))
    }

    /// Reduce a dropped run to the field markers that must survive.
    fn salvage(&mut self, run: &Run, path: &NodePath) -> Result<Option<Run>> {
        let mut content = Vec::new();
        for item in &run.content {
            if let RunContent::FieldChar(fld) = item {
                let ordinal = self.take_field_ordinal();
                if self.plan.survives(ordinal) {
                    content.push(RunContent::FieldChar(fld.clone()));
                }
            }
        }
        if content.is_empty() {
            return Ok(None);
        }

        trace!(part = self.ctx.part, %path, markers = content.len(), "field markers salvaged");
        let properties = match &run.properties {
            Some(p) => Some(Tracked::new(PropertySet::new(
                self.markup.elements(&p.current.elements, path)?,
            ))),
            None => None,
        };
        Ok(Some(Run {
            attributes: run.attributes.clone(),
            properties,
            content,
        }))
    }
}

/// Kept text is always written in its normal form.
fn undeleted(text: &Text) -> Text {
    Text {
        value: text.value.clone(),
        deleted: false,
        attributes: text.attributes.clone(),
    }
}
