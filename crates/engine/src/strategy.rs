//! Retrieval strategies and their single dispatch function.

use crate::adapter::NodeAdapter;
use crate::matcher::{Ignore, Matcher, MatcherCompiler, has_class, tag_matches};
use crate::traverse;
use query_selectors::{Combinator, QueryPart, TagName};

/// Sibling or child relation of a part to the candidates on its left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Child,
    NextSibling,
    FollowingSiblings,
}

/// How a part finds its raw candidates from one context node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetrievalStrategy {
    ById(String),
    /// Every class must be present.
    ByClassBulk(Vec<String>),
    ByTagBulk(TagName),
    BySubtreeWalk,
    ByCombinator(Relation),
}

impl RetrievalStrategy {
    /// Pick the strategy for `part` and the criteria it makes redundant.
    pub fn choose(part: &QueryPart, class_bulk: bool) -> (Self, Ignore) {
        let relation = match part.operator() {
            Combinator::Descendant => None,
            Combinator::Child => Some(Relation::Child),
            Combinator::NextSibling => Some(Relation::NextSibling),
            Combinator::FollowingSiblings => Some(Relation::FollowingSiblings),
        };
        if let Some(relation) = relation {
            return (Self::ByCombinator(relation), Ignore::ELEMENT);
        }
        if let Some(id) = part.id() {
            return (Self::ById(id.to_owned()), Ignore::ELEMENT.with(Ignore::ID));
        }
        if class_bulk && !part.classes().is_empty() {
            return (
                Self::ByClassBulk(part.classes().to_vec()),
                Ignore::ELEMENT.with(Ignore::CLASSES),
            );
        }
        match part.tag() {
            Some(tag) => (Self::ByTagBulk(tag.clone()), Ignore::ELEMENT.with(Ignore::TAG)),
            None => (Self::BySubtreeWalk, Ignore::NONE),
        }
    }
}

/// A part ready to execute: its strategy, the matcher for what the strategy
/// does not already guarantee, and the full matcher used by `filter`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledPart {
    pub strategy: RetrievalStrategy,
    pub matcher: Matcher,
    pub filter: Matcher,
    pub operator: Combinator,
}

impl CompiledPart {
    pub fn compile(part: &QueryPart, compiler: &MatcherCompiler<'_>, class_bulk: bool) -> Self {
        let (strategy, ignore) = RetrievalStrategy::choose(part, class_bulk);
        log::trace!(target: "query_engine", "part `{part}` uses {strategy:?}");
        Self {
            matcher: compiler.compile(part, ignore),
            filter: compiler.compile(part, Ignore::NONE),
            strategy,
            operator: part.operator(),
        }
    }

    /// Raw candidates of this part for one context node, already filtered.
    pub fn select<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        context: A::Handle,
        case_sensitive: bool,
    ) -> Vec<A::Handle> {
        let mut found = retrieve(host, &self.strategy, context, case_sensitive);
        if !self.matcher.is_empty() {
            found.retain(|&node| self.matcher.matches(host, node));
        }
        found
    }
}

/// Run a strategy from one context node.
///
/// Bulk strategies go through the host's native matcher when there is one
/// and walk the subtree otherwise, so the strategy's own criterion holds on
/// either path.
pub fn retrieve<A: NodeAdapter + ?Sized>(
    host: &A,
    strategy: &RetrievalStrategy,
    context: A::Handle,
    case_sensitive: bool,
) -> Vec<A::Handle> {
    match strategy {
        RetrievalStrategy::ById(id) => host.element_by_id(context, id).into_iter().collect(),
        RetrievalStrategy::ByClassBulk(classes) => {
            if let Some(native) = host.native() {
                match native.elements_by_class_name(context, classes) {
                    Ok(found) => return found,
                    Err(err) => {
                        log::debug!(
                            target: "query_engine",
                            "class lookup fell back to a walk: {err}"
                        );
                    }
                }
            }
            traverse::descendants(host, context)
                .filter(|&node| {
                    host.is_element(node)
                        && classes.iter().all(|class| has_class(host, node, class))
                })
                .collect()
        }
        RetrievalStrategy::ByTagBulk(tag) => {
            if !case_sensitive && let Some(native) = host.native() {
                match native.elements_by_tag_name(context, tag.normalized()) {
                    Ok(found) => return found,
                    Err(err) => {
                        log::debug!(
                            target: "query_engine",
                            "tag lookup fell back to a walk: {err}"
                        );
                    }
                }
            }
            traverse::descendants(host, context)
                .filter(|&node| tag_matches(host, node, tag, case_sensitive))
                .collect()
        }
        RetrievalStrategy::BySubtreeWalk => traverse::descendants(host, context).collect(),
        RetrievalStrategy::ByCombinator(Relation::Child) => {
            traverse::element_children(host, context).collect()
        }
        RetrievalStrategy::ByCombinator(Relation::NextSibling) => {
            traverse::next_element_sibling(host, context).into_iter().collect()
        }
        RetrievalStrategy::ByCombinator(Relation::FollowingSiblings) => {
            traverse::following_element_siblings(host, context).collect()
        }
    }
}
