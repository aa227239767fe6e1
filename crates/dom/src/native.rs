//! A limited native matcher over a [`Document`].
//!
//! Supports type, universal, id and class selectors, attribute presence and
//! equality, `:first-child`, `:last-child` and all four combinators, matched
//! right to left against the whole document. Anything else is refused with
//! [`UnsupportedSelector::Syntax`].

use crate::document::Document;
use indextree::NodeId;
use query_engine::query_selectors::{AttrOp, Combinator, QueryPart, parse_strict, split_groups};
use query_engine::{Capabilities, NativeMatcher, NodeAdapter, UnsupportedSelector, traverse};

const NATIVE_PSEUDOS: [&str; 2] = ["first-child", "last-child"];

impl Document {
    fn element_descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> {
        scope
            .descendants(self.arena())
            .skip(1)
            .filter(|&node| self.is_element(node))
    }

    fn class_matches(&self, node: NodeId, wanted: &str, ignore_case: bool) -> bool {
        self.class_name(node).is_some_and(|names| {
            names.split_ascii_whitespace().any(|name| {
                if ignore_case {
                    name.eq_ignore_ascii_case(wanted)
                } else {
                    name == wanted
                }
            })
        })
    }

    fn matches_compound(&self, part: &QueryPart, node: NodeId) -> bool {
        if !self.is_element(node) {
            return false;
        }
        if let Some(tag) = part.tag()
            && self
                .tag_name(node)
                .is_none_or(|name| !name.eq_ignore_ascii_case(tag.normalized()))
        {
            return false;
        }
        if let Some(id) = part.id()
            && self.element_id(node) != Some(id)
        {
            return false;
        }
        part.classes()
            .iter()
            .all(|class| self.class_matches(node, class, false))
            && part.attrs().iter().all(|filter| {
                let value = self.attr(node, &filter.attr);
                match filter.op {
                    AttrOp::Equals => value == Some(filter.value.as_str()),
                    _ => value.is_some(),
                }
            })
            && part.pseudos().iter().all(|pseudo| match pseudo.name.as_str() {
                "first-child" => traverse::previous_element_sibling(self, node).is_none(),
                _ => traverse::next_element_sibling(self, node).is_none(),
            })
    }

    /// Right-to-left match of `parts` ending at `node`.
    fn matches_complex(&self, parts: &[QueryPart], node: NodeId) -> bool {
        let Some((last, rest)) = parts.split_last() else {
            return true;
        };
        if !self.matches_compound(last, node) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        match last.operator() {
            Combinator::Descendant => {
                let mut current = self.parent(node);
                while let Some(ancestor) = current {
                    if self.matches_complex(rest, ancestor) {
                        return true;
                    }
                    current = self.parent(ancestor);
                }
                false
            }
            Combinator::Child => self
                .parent(node)
                .is_some_and(|parent| self.matches_complex(rest, parent)),
            Combinator::NextSibling => traverse::previous_element_sibling(self, node)
                .is_some_and(|sibling| self.matches_complex(rest, sibling)),
            Combinator::FollowingSiblings => {
                let mut current = traverse::previous_element_sibling(self, node);
                while let Some(sibling) = current {
                    if self.matches_complex(rest, sibling) {
                        return true;
                    }
                    current = traverse::previous_element_sibling(self, sibling);
                }
                false
            }
        }
    }
}

fn check_supported(group: &str, parts: &[QueryPart]) -> Result<(), UnsupportedSelector> {
    if parts
        .first()
        .is_none_or(|first| first.operator() != Combinator::Descendant)
    {
        return Err(UnsupportedSelector::Syntax(format!(
            "relative selector `{group}`"
        )));
    }
    for part in parts {
        if let Some(filter) = part
            .attrs()
            .iter()
            .find(|filter| !matches!(filter.op, AttrOp::Exists | AttrOp::Equals))
        {
            return Err(UnsupportedSelector::Syntax(format!(
                "attribute operator `{}` in `{group}`",
                filter.op.as_str()
            )));
        }
        if let Some(pseudo) = part
            .pseudos()
            .iter()
            .find(|pseudo| pseudo.arg.is_some() || !NATIVE_PSEUDOS.contains(&pseudo.name.as_str()))
        {
            return Err(UnsupportedSelector::Syntax(format!(
                "pseudo-class `:{}` in `{group}`",
                pseudo.name
            )));
        }
    }
    Ok(())
}

impl NativeMatcher<NodeId> for Document {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            class_index: true,
            class_index_case_bug: self.class_case_bug(),
            selector_matching: true,
            native_pseudos: NATIVE_PSEUDOS.iter().map(|&name| name.to_owned()).collect(),
        }
    }

    fn elements_by_class_name(
        &self,
        scope: NodeId,
        classes: &[String],
    ) -> Result<Vec<NodeId>, UnsupportedSelector> {
        let ignore_case = self.class_case_bug();
        Ok(self
            .element_descendants(scope)
            .filter(|&node| {
                classes
                    .iter()
                    .all(|class| self.class_matches(node, class, ignore_case))
            })
            .collect())
    }

    fn elements_by_tag_name(
        &self,
        scope: NodeId,
        tag: &str,
    ) -> Result<Vec<NodeId>, UnsupportedSelector> {
        Ok(self
            .element_descendants(scope)
            .filter(|&node| {
                tag == "*"
                    || self
                        .tag_name(node)
                        .is_some_and(|name| name.eq_ignore_ascii_case(tag))
            })
            .collect())
    }

    fn select_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, UnsupportedSelector> {
        let mut groups = Vec::new();
        for group in split_groups(selector) {
            let parts = parse_strict(group)
                .map_err(|err| UnsupportedSelector::Syntax(err.to_string()))?;
            check_supported(group, &parts)?;
            groups.push(parts);
        }
        if groups.is_empty() {
            return Err(UnsupportedSelector::Syntax("empty selector".to_owned()));
        }
        log::trace!(target: "query_dom", "native select_all `{selector}`");
        Ok(self
            .element_descendants(scope)
            .filter(|&node| groups.iter().any(|parts| self.matches_complex(parts, node)))
            .collect())
    }
}
