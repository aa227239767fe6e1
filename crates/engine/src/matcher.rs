//! Compiles a query part into a single node predicate.

use crate::adapter::NodeAdapter;
use crate::pseudo::{PseudoPredicate, PseudoRegistry};
use query_selectors::{AttrFilter, AttrOp, QueryPart, TagName};

/// Criteria a retrieval strategy already guarantees and the matcher may
/// leave out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ignore(u8);

impl Ignore {
    pub const NONE: Self = Self(0);
    pub const ELEMENT: Self = Self(1);
    pub const TAG: Self = Self(1 << 1);
    pub const ID: Self = Self(1 << 2);
    pub const CLASSES: Self = Self(1 << 3);

    #[inline]
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// One test of a compiled matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Criterion {
    Element,
    /// `exact` compares the written spelling instead of ignoring ASCII case.
    Tag { name: TagName, exact: bool },
    Id(String),
    Class(String),
    Attr(AttrFilter),
    Pseudo(PseudoPredicate),
}

impl Criterion {
    pub fn test<A: NodeAdapter + ?Sized>(&self, host: &A, node: A::Handle) -> bool {
        match self {
            Self::Element => host.is_element(node),
            Self::Tag { name, exact } => tag_matches(host, node, name, *exact),
            Self::Id(id) => host.element_id(node) == Some(id.as_str()),
            Self::Class(class) => has_class(host, node, class),
            Self::Attr(filter) => attr_matches(filter, host.attr(node, &filter.attr)),
            Self::Pseudo(predicate) => predicate.test(host, node),
        }
    }
}

pub fn tag_matches<A: NodeAdapter + ?Sized>(
    host: &A,
    node: A::Handle,
    name: &TagName,
    exact: bool,
) -> bool {
    host.tag_name(node).is_some_and(|tag| {
        if exact {
            tag == name.written()
        } else {
            tag.eq_ignore_ascii_case(name.normalized())
        }
    })
}

/// Whitespace-token membership in the class attribute.
pub fn has_class<A: NodeAdapter + ?Sized>(host: &A, node: A::Handle, class: &str) -> bool {
    host.class_name(node)
        .is_some_and(|names| names.split_ascii_whitespace().any(|name| name == class))
}

fn attr_matches(filter: &AttrFilter, actual: Option<&str>) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let expected = filter.value.as_str();
    match filter.op {
        AttrOp::Exists => true,
        AttrOp::Equals => actual == expected,
        AttrOp::Substring => actual.contains(expected),
        AttrOp::Prefix => actual.starts_with(expected),
        AttrOp::Suffix => actual.ends_with(expected),
        AttrOp::Includes => actual.split_ascii_whitespace().any(|token| token == expected),
        AttrOp::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
    }
}

/// AND of criteria; an empty matcher accepts every node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matcher {
    criteria: Vec<Criterion>,
}

impl Matcher {
    #[inline]
    pub fn matches<A: NodeAdapter + ?Sized>(&self, host: &A, node: A::Handle) -> bool {
        self.criteria.iter().all(|criterion| criterion.test(host, node))
    }

    #[inline]
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// True when the matcher accepts everything.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// Turns query parts into matchers.
#[derive(Clone, Copy, Debug)]
pub struct MatcherCompiler<'reg> {
    registry: &'reg PseudoRegistry,
    case_sensitive: bool,
}

impl<'reg> MatcherCompiler<'reg> {
    #[inline]
    pub const fn new(registry: &'reg PseudoRegistry, case_sensitive: bool) -> Self {
        Self {
            registry,
            case_sensitive,
        }
    }

    /// Build the matcher for `part`, leaving out what `ignore` names.
    ///
    /// Criteria are checked in order: element, tag, classes, attributes,
    /// pseudo-classes, id.
    pub fn compile(&self, part: &QueryPart, ignore: Ignore) -> Matcher {
        let mut criteria = Vec::new();
        if !ignore.contains(Ignore::ELEMENT) {
            criteria.push(Criterion::Element);
        }
        if !ignore.contains(Ignore::TAG)
            && let Some(tag) = part.tag()
        {
            criteria.push(Criterion::Tag {
                name: tag.clone(),
                exact: self.case_sensitive,
            });
        }
        if !ignore.contains(Ignore::CLASSES) {
            criteria.extend(part.classes().iter().cloned().map(Criterion::Class));
        }
        criteria.extend(part.attrs().iter().cloned().map(Criterion::Attr));
        for pseudo in part.pseudos() {
            if let Some(predicate) = self.registry.build(pseudo, self) {
                criteria.push(Criterion::Pseudo(predicate));
            }
        }
        if !ignore.contains(Ignore::ID)
            && let Some(id) = part.id()
        {
            criteria.push(Criterion::Id(id.to_owned()));
        }
        Matcher { criteria }
    }
}
