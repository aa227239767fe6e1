//! Host interfaces the engine runs against.

use crate::error::UnsupportedSelector;
use crate::traverse;
use core::fmt::Debug;
use core::hash::Hash;

/// Read-only view of a host document tree.
///
/// Handles are cheap copies; the engine never mutates the tree and never
/// stores anything on a node.
pub trait NodeAdapter {
    type Handle: Copy + Eq + Hash + Debug;

    fn is_element(&self, node: Self::Handle) -> bool;

    /// True for the document root, the only node without a parent that may
    /// be a query context covering the whole tree.
    fn is_document(&self, node: Self::Handle) -> bool;

    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn first_child(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn next_sibling(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn previous_sibling(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Tag name as the host stores it; `None` for non-elements.
    fn tag_name(&self, node: Self::Handle) -> Option<&str>;

    fn element_id(&self, node: Self::Handle) -> Option<&str>;

    /// The raw, whitespace-separated class attribute.
    fn class_name(&self, node: Self::Handle) -> Option<&str>;

    fn attr(&self, node: Self::Handle, name: &str) -> Option<&str>;

    /// Character data of a text node; `None` for every other node.
    fn text(&self, node: Self::Handle) -> Option<&str>;

    /// Serialized markup of the node's children.
    fn inner_content(&self, node: Self::Handle) -> String;

    /// First element in document order strictly inside `scope` carrying `id`.
    ///
    /// The default walks the subtree; hosts with an id index should override.
    fn element_by_id(&self, scope: Self::Handle, id: &str) -> Option<Self::Handle> {
        traverse::descendants(self, scope)
            .find(|&node| self.is_element(node) && self.element_id(node) == Some(id))
    }

    /// Bulk lookups and selector matching provided by the host, if any.
    fn native(&self) -> Option<&dyn NativeMatcher<Self::Handle>> {
        None
    }
}

/// What a host's [`NativeMatcher`] can do, read once when an engine is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `elements_by_class_name` is backed by an index.
    pub class_index: bool,
    /// The class index compares case-insensitively (quirks mode) and must
    /// not be trusted for class retrieval.
    pub class_index_case_bug: bool,
    /// `select_all` accepts selector text.
    pub selector_matching: bool,
    /// Lowercased pseudo-class names `select_all` understands.
    pub native_pseudos: Vec<String>,
}

/// Host-side bulk retrieval. Every method may refuse, in which case the
/// engine falls back to its own traversal for that call.
///
/// Returned nodes must be strict descendants of `scope`, in document order,
/// without duplicates.
pub trait NativeMatcher<H> {
    fn capabilities(&self) -> Capabilities;

    /// Elements whose class list contains every name in `classes`.
    ///
    /// # Errors
    /// [`UnsupportedSelector`] when the host cannot serve the lookup.
    fn elements_by_class_name(
        &self,
        scope: H,
        classes: &[String],
    ) -> Result<Vec<H>, UnsupportedSelector>;

    /// Elements whose tag equals `tag` ASCII-case-insensitively.
    ///
    /// # Errors
    /// [`UnsupportedSelector`] when the host cannot serve the lookup.
    fn elements_by_tag_name(&self, scope: H, tag: &str) -> Result<Vec<H>, UnsupportedSelector>;

    /// Elements matching the selector text, which may contain comma groups.
    ///
    /// # Errors
    /// [`UnsupportedSelector`] when the host cannot parse or evaluate the
    /// selector.
    fn select_all(&self, scope: H, selector: &str) -> Result<Vec<H>, UnsupportedSelector>;
}
