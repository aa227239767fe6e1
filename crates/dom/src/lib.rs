//! Arena document for the node query engine.
//!
//! [`Document`] stores nodes in an [`indextree`] arena and implements both
//! host interfaces of `query_engine`: the tree view ([`NodeAdapter`]) and a
//! deliberately limited [`NativeMatcher`] (class/tag/id/attribute-equality
//! selectors, `:first-child` and `:last-child`) so every engine fallback has
//! something real to fall back from.
//!
//! [`NodeAdapter`]: query_engine::NodeAdapter
//! [`NativeMatcher`]: query_engine::NativeMatcher

mod adapter;
mod document;
mod native;

pub use document::{Document, DomNode, NodeKind};
pub use indextree::NodeId;
