use anyhow::{Result, anyhow, bail};
use core::mem;
use indextree::{Arena, Node, NodeId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
}

impl DomNode {
    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element { .. })
    }
}

/// A document tree with an id index.
#[derive(Debug)]
pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
    /// Id value -> elements carrying it, in insertion order.
    ids: FxHashMap<String, Vec<NodeId>>,
    native: bool,
    class_case_bug: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        Self {
            root: arena.new_node(DomNode::default()),
            arena,
            ids: FxHashMap::default(),
            native: true,
            class_case_bug: false,
        }
    }

    #[inline]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> Option<&DomNode> {
        self.arena.get(node).map(Node::get)
    }

    #[inline]
    pub(crate) const fn arena(&self) -> &Arena<DomNode> {
        &self.arena
    }

    /// Whether the native matcher is exposed to the engine.
    #[inline]
    pub const fn set_native(&mut self, enabled: bool) {
        self.native = enabled;
    }

    #[inline]
    pub const fn native_enabled(&self) -> bool {
        self.native
    }

    /// Make the class index compare ASCII-case-insensitively, like a
    /// quirks-mode document.
    #[inline]
    pub const fn set_class_case_bug(&mut self, enabled: bool) {
        self.class_case_bug = enabled;
    }

    #[inline]
    pub const fn class_case_bug(&self) -> bool {
        self.class_case_bug
    }

    fn append(&mut self, parent: NodeId, node: DomNode) -> Result<NodeId> {
        let parent_node = self
            .get(parent)
            .ok_or_else(|| anyhow!("unknown parent node {parent:?}"))?;
        if !parent_node.is_container() {
            bail!("node {parent:?} cannot have children");
        }
        let child = self.arena.new_node(node);
        parent.checked_append(child, &mut self.arena)?;
        Ok(child)
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        if tag.is_empty() {
            bail!("element tag cannot be empty");
        }
        self.append(
            parent,
            DomNode {
                kind: NodeKind::Element {
                    tag: tag.to_owned(),
                },
                attrs: SmallVec::new(),
            },
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.append(
            parent,
            DomNode {
                kind: NodeKind::Text {
                    text: text.to_owned(),
                },
                attrs: SmallVec::new(),
            },
        )
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.append(
            parent,
            DomNode {
                kind: NodeKind::Comment {
                    text: text.to_owned(),
                },
                attrs: SmallVec::new(),
            },
        )
    }

    /// Append an element and set its attributes in one go.
    pub fn element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId> {
        let node = self.append_element(parent, tag)?;
        for &(name, value) in attrs {
            self.set_attr(node, name, value)?;
        }
        Ok(node)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let entry = self
            .arena
            .get_mut(node)
            .ok_or_else(|| anyhow!("unknown node {node:?}"))?
            .get_mut();
        if !matches!(entry.kind, NodeKind::Element { .. }) {
            bail!("attributes can only be set on elements");
        }
        let previous = match entry.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => Some(mem::replace(slot, value.to_owned())),
            None => {
                entry.attrs.push((name.to_owned(), value.to_owned()));
                None
            }
        };
        if name == "id" {
            if let Some(old) = previous
                && let Some(holders) = self.ids.get_mut(&old)
            {
                holders.retain(|&holder| holder != node);
            }
            self.ids.entry(value.to_owned()).or_default().push(node);
        }
        log::trace!(target: "query_dom", "set {name}=\"{value}\" on {node:?}");
        Ok(())
    }

    /// Elements whose `id` attribute is `id`, in insertion order.
    pub fn ids_of(&self, id: &str) -> &[NodeId] {
        self.ids.get(id).map_or(&[], Vec::as_slice)
    }

    /// Serialized markup of `node`'s children.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in node.children(&self.arena) {
            self.serialize(child, &mut out);
        }
        out
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        let Some(entry) = self.get(node) else {
            return;
        };
        match &entry.kind {
            NodeKind::Document => {
                for child in node.children(&self.arena) {
                    self.serialize(child, out);
                }
            }
            NodeKind::Element { tag } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &entry.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    push_escaped(out, value, true);
                    out.push('"');
                }
                out.push('>');
                for child in node.children(&self.arena) {
                    self.serialize(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeKind::Text { text } => push_escaped(out, text, false),
            NodeKind::Comment { text } => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

fn push_escaped(out: &mut String, text: &str, attribute: bool) {
    for character in text.chars() {
        match character {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(character),
        }
    }
}
