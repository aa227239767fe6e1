//! Tree view of a [`Document`] for the query engine.

use crate::document::{Document, NodeKind};
use indextree::NodeId;
use query_engine::{NativeMatcher, NodeAdapter, traverse};

impl NodeAdapter for Document {
    type Handle = NodeId;

    #[inline]
    fn is_element(&self, node: NodeId) -> bool {
        self.get(node)
            .is_some_and(|entry| matches!(entry.kind, NodeKind::Element { .. }))
    }

    #[inline]
    fn is_document(&self, node: NodeId) -> bool {
        self.get(node)
            .is_some_and(|entry| entry.kind == NodeKind::Document)
    }

    #[inline]
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena().get(node)?.parent()
    }

    #[inline]
    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.arena().get(node)?.first_child()
    }

    #[inline]
    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena().get(node)?.next_sibling()
    }

    #[inline]
    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena().get(node)?.previous_sibling()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.get(node)?.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    #[inline]
    fn element_id(&self, node: NodeId) -> Option<&str> {
        self.get(node)?.attr("id")
    }

    #[inline]
    fn class_name(&self, node: NodeId) -> Option<&str> {
        self.get(node)?.attr("class")
    }

    #[inline]
    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.attr(name)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.get(node)?.kind {
            NodeKind::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    #[inline]
    fn inner_content(&self, node: NodeId) -> String {
        self.inner_html(node)
    }

    /// Id index lookup, restricted to `scope`'s subtree.
    fn element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        let mut found: Vec<NodeId> = self
            .ids_of(id)
            .iter()
            .copied()
            .filter(|&node| traverse::is_descendant(self, node, scope))
            .collect();
        if found.len() > 1 {
            traverse::sort_document_order(self, &mut found);
        }
        found.first().copied()
    }

    fn native(&self) -> Option<&dyn NativeMatcher<NodeId>> {
        self.native_enabled().then_some(self as &dyn NativeMatcher<NodeId>)
    }
}
