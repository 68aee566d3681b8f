//! Document
//!
//! The document owns every element (through an arena), the sequence of root
//! records, and the pointer namespace mapping `@..@` tokens to elements. It
//! allocates pointers for new records, normalizes the header/trailer pair and
//! drives serialization back to lines.
//!
//! Serializing always goes through [`Document::serialize`], which first makes
//! sure the document starts with `HEAD` and ends with `TRLR` and re-levels
//! every root subtree, then walks each root depth-first in pre-order.

use crate::gedcom::ast::{Element, ElementRef, ElementSnapshot, NodeId};
use crate::gedcom::codec::{format_line, is_pointer, is_tag, is_value};
use crate::gedcom::error::{GedcomError, Result};
use crate::gedcom::records::{Family, Individual, Record};
use crate::gedcom::registry::{ElementKind, TagRegistry, REGISTRY};
use gedcom_config::{GedcomConfig, Loader};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    roots: Vec<NodeId>,
    pointers: HashMap<String, NodeId>,
    next_free_id: u64,
    registry: Arc<TagRegistry>,
    config: GedcomConfig,
}

impl Document {
    /// An empty document using the default registry and configuration
    pub fn new() -> Self {
        Self::with_config(GedcomConfig::default())
    }

    pub fn with_config(config: GedcomConfig) -> Self {
        Self::with_registry(Arc::clone(&REGISTRY), config)
    }

    /// An empty document configured from the embedded defaults with the
    /// TOML file at `path` layered on top
    pub fn with_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Loader::new().with_file(path).build()?;
        Ok(Self::with_config(config))
    }

    pub fn with_registry(registry: Arc<TagRegistry>, config: GedcomConfig) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            pointers: HashMap::new(),
            next_free_id: 1,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &GedcomConfig {
        &self.config
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub(crate) fn data(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    pub(crate) fn data_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.0]
    }

    pub(crate) fn insert(&mut self, element: Element) -> NodeId {
        self.nodes.push(element);
        NodeId(self.nodes.len() - 1)
    }

    /// Fails with `UnknownNode` unless `node` indexes this document's arena
    pub(crate) fn check_node(&self, node: NodeId) -> Result<()> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GedcomError::UnknownNode(node.0))
        }
    }

    /// Read handle for an element of this document.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not issued by this document; see
    /// [`Document::try_node`] for a checked lookup.
    pub fn node(&self, node: NodeId) -> ElementRef<'_> {
        ElementRef::new(self, node)
    }

    pub fn try_node(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.check_node(node).ok().map(|()| self.node(node))
    }

    /// Number of elements created in this document, attached or not
    pub fn element_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached element of whatever kind `tag` is registered as.
    ///
    /// Fails with `MalformedTag` unless `tag` matches `[_A-Z0-9]+`.
    pub fn element(&mut self, tag: &str) -> Result<NodeId> {
        if !is_tag(tag) {
            return Err(GedcomError::MalformedTag(tag.to_string()));
        }
        Ok(self.new_element(tag, None))
    }

    /// Like [`Document::element`]; the value may not contain a line break
    pub fn element_with_value(&mut self, tag: &str, value: impl Into<String>) -> Result<NodeId> {
        let value = value.into();
        if !is_value(&value) {
            return Err(GedcomError::MalformedValue(value));
        }
        let node = self.element(tag)?;
        self.data_mut(node).value = Some(value);
        Ok(node)
    }

    /// A detached `INDI` record, ready for [`Document::add_root`]
    pub fn individual(&mut self) -> NodeId {
        self.new_element("INDI", None)
    }

    /// A detached `FAM` record, ready for [`Document::add_root`]
    pub fn family(&mut self) -> NodeId {
        self.new_element("FAM", None)
    }

    // callers pass a tag known to match the grammar
    fn new_element(&mut self, tag: &str, value: Option<String>) -> NodeId {
        let kind = self.registry.resolve(tag);
        self.insert(Element::detached(kind, tag, value))
    }

    /// The element bound to `pointer`
    pub fn get(&self, pointer: &str) -> Result<ElementRef<'_>> {
        self.pointers
            .get(pointer)
            .map(|&node| self.node(node))
            .ok_or_else(|| GedcomError::UnresolvedPointer(pointer.to_string()))
    }

    pub fn contains_pointer(&self, pointer: &str) -> bool {
        self.pointers.contains_key(pointer)
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Give `node` the pointer `pointer`, replacing any pointer it had
    pub fn set_id(&mut self, node: NodeId, pointer: &str) -> Result<()> {
        self.check_node(node)?;
        if !is_pointer(pointer) {
            return Err(GedcomError::MalformedPointer(pointer.to_string()));
        }
        if let Some(&bound) = self.pointers.get(pointer) {
            if bound == node {
                return Ok(());
            }
            return Err(GedcomError::DuplicatePointer {
                pointer: pointer.to_string(),
                line_number: None,
            });
        }
        if let Some(old) = self.data_mut(node).id.take() {
            self.pointers.remove(&old);
        }
        self.bind_pointer(node, pointer.to_string(), None)
    }

    pub(crate) fn bind_pointer(
        &mut self,
        node: NodeId,
        pointer: String,
        line_number: Option<usize>,
    ) -> Result<()> {
        match self.pointers.get(&pointer) {
            Some(&bound) if bound != node => Err(GedcomError::DuplicatePointer {
                pointer,
                line_number,
            }),
            _ => {
                self.data_mut(node).id = Some(pointer.clone());
                self.pointers.insert(pointer, node);
                Ok(())
            }
        }
    }

    /// Find the next free pointer `@{prefix}{n}@`.
    ///
    /// The counter only ever moves forward, including past candidates that
    /// turned out to be taken.
    pub(crate) fn allocate_id(&mut self, prefix: &str) -> Result<String> {
        let attempts = self.config.ids.max_attempts;
        for _ in 0..attempts {
            let candidate = format!("@{prefix}{}@", self.next_free_id);
            self.next_free_id += 1;
            if !self.pointers.contains_key(&candidate) {
                tracing::debug!(pointer = %candidate, "Allocated pointer");
                return Ok(candidate);
            }
        }
        Err(GedcomError::IdSpaceExhausted {
            prefix: prefix.to_string(),
            attempts,
        })
    }

    /// Root elements in document order
    pub fn roots(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.roots.iter().map(move |&node| self.node(node))
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub(crate) fn is_root(&self, node: NodeId) -> bool {
        self.roots.contains(&node)
    }

    pub(crate) fn push_root(&mut self, node: NodeId) {
        self.roots.push(node);
    }

    pub fn individuals(&self) -> impl Iterator<Item = Individual<'_>> + '_ {
        self.roots().filter_map(Individual::cast)
    }

    pub fn families(&self) -> impl Iterator<Item = Family<'_>> + '_ {
        self.roots().filter_map(Family::cast)
    }

    /// Append a detached element to the root sequence.
    ///
    /// An element without a level is a fresh record: it must be an individual
    /// or a family, gets level 0 (propagated to its subtree) and, if it has no
    /// pointer yet, a newly allocated one.
    pub fn add_root(&mut self, node: NodeId) -> Result<()> {
        self.check_node(node)?;
        self.ensure_detached(node)?;

        match self.data(node).level {
            None => {
                let prefix = match self.data(node).kind {
                    ElementKind::Individual => self.config.ids.individual_prefix.clone(),
                    ElementKind::Family => self.config.ids.family_prefix.clone(),
                    _ => {
                        return Err(GedcomError::UnsupportedRootType(
                            self.data(node).tag.clone(),
                        ))
                    }
                };
                // allocate first so a failure leaves the element untouched
                if self.data(node).id.is_none() {
                    let pointer = self.allocate_id(&prefix)?;
                    self.bind_pointer(node, pointer, None)?;
                }
                self.data_mut(node).level = Some(0);
                self.set_levels_downward(node)?;
            }
            Some(0) => {}
            Some(_) => {
                return Err(GedcomError::InvalidLevel {
                    tag: self.data(node).tag.clone(),
                })
            }
        }

        self.roots.push(node);
        Ok(())
    }

    /// Make the document start with `HEAD` and end with `TRLR`.
    ///
    /// Only the first and last roots are inspected; a header somewhere in the
    /// middle is left where it is. Calling this twice changes nothing.
    pub fn ensure_header_trailer(&mut self) -> Result<()> {
        if self.roots.first().map(|&n| self.data(n).tag.as_str()) != Some("HEAD") {
            let head = self.build_header()?;
            self.roots.insert(0, head);
            tracing::debug!("Synthesized header");
        }
        if self.roots.last().map(|&n| self.data(n).tag.as_str()) != Some("TRLR") {
            let trailer = self.new_element("TRLR", None);
            self.data_mut(trailer).level = Some(0);
            self.roots.push(trailer);
            tracing::debug!("Synthesized trailer");
        }
        Ok(())
    }

    fn build_header(&mut self) -> Result<NodeId> {
        let header = self.config.header.clone();

        let head = self.new_element("HEAD", None);

        let source = self.new_element("SOUR", None);
        let name = self.element_with_value("NAME", header.source_name)?;
        let version = self.element_with_value("VERS", header.source_version)?;
        self.attach(source, name);
        self.attach(source, version);
        self.attach(head, source);

        let charset = self.element_with_value("CHAR", header.charset)?;
        self.attach(head, charset);

        let gedc = self.new_element("GEDC", None);
        let gedc_version = self.element_with_value("VERS", header.gedcom_version)?;
        let gedc_form = self.element_with_value("FORM", header.gedcom_form)?;
        self.attach(gedc, gedc_version);
        self.attach(gedc, gedc_form);
        self.attach(head, gedc);

        self.data_mut(head).level = Some(0);
        self.set_levels_downward(head)?;
        Ok(head)
    }

    /// Reset every root to level 0 and propagate levels downward
    pub fn ensure_levels(&mut self) -> Result<()> {
        for index in 0..self.roots.len() {
            let root = self.roots[index];
            self.data_mut(root).level = Some(0);
            self.set_levels_downward(root)?;
        }
        Ok(())
    }

    /// Normalize the document and return its lines.
    ///
    /// The returned iterator is lazy and can be cloned to restart it.
    pub fn serialize(&mut self) -> Result<Lines<'_>> {
        self.ensure_header_trailer()?;
        self.ensure_levels()?;
        Ok(Lines::new(self))
    }

    /// All serialized lines, each terminated by a newline
    pub fn to_gedcom_string(&mut self) -> Result<String> {
        let mut out = String::new();
        for line in self.serialize()? {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Write the serialized document, UTF-8, one newline after each line
    pub fn save_to_writer<W: Write>(&mut self, writer: W) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        for line in self.serialize()? {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save to a new file. An existing file at `path` is never overwritten.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(GedcomError::AlreadyExists(path.to_path_buf()));
        }
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|err| match err.kind() {
                io::ErrorKind::AlreadyExists => GedcomError::AlreadyExists(path.to_path_buf()),
                _ => GedcomError::Io(err),
            })?;
        self.save_to_writer(file)?;
        tracing::debug!(path = %path.display(), roots = self.roots.len(), "Saved document");
        Ok(())
    }

    /// Snapshots of every root, in order
    pub fn snapshot(&self) -> Vec<ElementSnapshot> {
        self.roots().map(|root| root.snapshot()).collect()
    }

    /// The tree as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy depth-first, pre-order walk over the roots, yielding formatted lines
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    doc: &'a Document,
    // (node, depth); depth equals the node's level once the document is levelled
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Lines<'a> {
    fn new(doc: &'a Document) -> Self {
        let stack = doc.roots.iter().rev().map(|&root| (root, 0)).collect();
        Self { doc, stack }
    }
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let (node, depth) = self.stack.pop()?;
        let element = self.doc.data(node);
        self.stack
            .extend(element.children.iter().rev().map(|&child| (child, depth + 1)));
        Some(format_line(&element.line_at(depth)))
    }
}
