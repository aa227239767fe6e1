//! Tree walks over a [`NodeAdapter`].

use crate::adapter::NodeAdapter;
use core::iter;

/// Pre-order iterator over the strict descendants of a root.
pub struct Descendants<'host, A: NodeAdapter + ?Sized> {
    host: &'host A,
    root: A::Handle,
    next: Option<A::Handle>,
}

impl<A: NodeAdapter + ?Sized> Iterator for Descendants<'_, A> {
    type Item = A::Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.host.first_child(current).or_else(|| {
            let mut climb = current;
            loop {
                if climb == self.root {
                    return None;
                }
                if let Some(sibling) = self.host.next_sibling(climb) {
                    return Some(sibling);
                }
                climb = self.host.parent(climb)?;
            }
        });
        Some(current)
    }
}

/// Every node below `root` in document order, `root` excluded.
#[inline]
pub fn descendants<A: NodeAdapter + ?Sized>(host: &A, root: A::Handle) -> Descendants<'_, A> {
    Descendants {
        host,
        root,
        next: host.first_child(root),
    }
}

/// Element children of `node` in order.
pub fn element_children<A: NodeAdapter + ?Sized>(
    host: &A,
    node: A::Handle,
) -> impl Iterator<Item = A::Handle> {
    iter::successors(host.first_child(node), |&child| host.next_sibling(child))
        .filter(|&child| host.is_element(child))
}

pub fn next_element_sibling<A: NodeAdapter + ?Sized>(
    host: &A,
    node: A::Handle,
) -> Option<A::Handle> {
    following_element_siblings(host, node).next()
}

pub fn previous_element_sibling<A: NodeAdapter + ?Sized>(
    host: &A,
    node: A::Handle,
) -> Option<A::Handle> {
    iter::successors(host.previous_sibling(node), |&sibling| {
        host.previous_sibling(sibling)
    })
    .find(|&sibling| host.is_element(sibling))
}

pub fn following_element_siblings<A: NodeAdapter + ?Sized>(
    host: &A,
    node: A::Handle,
) -> impl Iterator<Item = A::Handle> {
    iter::successors(host.next_sibling(node), |&sibling| {
        host.next_sibling(sibling)
    })
    .filter(|&sibling| host.is_element(sibling))
}

/// 1-based position of `node` among its element siblings.
pub fn element_position<A: NodeAdapter + ?Sized>(host: &A, node: A::Handle) -> usize {
    iter::successors(previous_element_sibling(host, node), |&sibling| {
        previous_element_sibling(host, sibling)
    })
    .count()
    .saturating_add(1)
}

/// True when `ancestor` is a strict ancestor of `node`.
pub fn is_descendant<A: NodeAdapter + ?Sized>(
    host: &A,
    node: A::Handle,
    ancestor: A::Handle,
) -> bool {
    iter::successors(host.parent(node), |&parent| host.parent(parent))
        .any(|parent| parent == ancestor)
}

/// The topmost ancestor of `node` (the document for attached nodes).
pub fn tree_root<A: NodeAdapter + ?Sized>(host: &A, node: A::Handle) -> A::Handle {
    iter::successors(Some(node), |&current| host.parent(current))
        .last()
        .unwrap_or(node)
}

/// Child-index path from the tree root, which orders nodes in pre-order.
fn order_key<A: NodeAdapter + ?Sized>(host: &A, node: A::Handle) -> Vec<usize> {
    let mut path: Vec<usize> = iter::successors(Some(node), |&current| host.parent(current))
        .map(|current| {
            iter::successors(host.previous_sibling(current), |&sibling| {
                host.previous_sibling(sibling)
            })
            .count()
        })
        .collect();
    path.reverse();
    path
}

/// Sort nodes of one tree into document order.
pub fn sort_document_order<A: NodeAdapter + ?Sized>(host: &A, nodes: &mut [A::Handle]) {
    nodes.sort_by_cached_key(|&node| order_key(host, node));
}
