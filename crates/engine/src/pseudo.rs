//! Pseudo-class registry.
//!
//! Each pseudo-class name maps to a factory that turns the (optional)
//! argument into a [`PseudoPredicate`]. Names the registry does not know are
//! skipped by the compiler, which makes them always true.

use crate::adapter::NodeAdapter;
use crate::matcher::{Ignore, Matcher, MatcherCompiler};
use crate::traverse;
use core::iter;
use query_selectors::{Pseudo, parse};
use rustc_hash::FxHashMap;

/// Builds a predicate from a pseudo-class argument.
pub type PseudoFactory = fn(Option<&str>, &MatcherCompiler<'_>) -> PseudoPredicate;

/// `an+b` with `step` = a and `offset` = b; `step == 0` is an exact position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NthExpr {
    step: i64,
    offset: i64,
}

impl NthExpr {
    #[inline]
    pub const fn new(step: i64, offset: i64) -> Self {
        Self { step, offset }
    }

    /// Parse `odd`, `even`, `an+b` (whitespace allowed) or a plain integer.
    pub fn parse(arg: &str) -> Option<Self> {
        let compact = arg
            .chars()
            .filter(|character| !character.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }
        let Some((coefficient, rest)) = compact.split_once('n') else {
            return compact.parse().ok().map(|position| Self::new(0, position));
        };
        let step = match coefficient {
            "" | "+" => 1,
            "-" => -1,
            digits => digits.parse().ok()?,
        };
        let offset = if rest.is_empty() {
            0
        } else if rest.starts_with(['+', '-']) {
            rest.parse().ok()?
        } else {
            return None;
        };
        Some(Self::new(step, offset))
    }

    /// True when `position` (1-based) is `step * k + offset` for some `k >= 0`.
    pub fn matches(self, position: i64) -> bool {
        let Some(distance) = position.checked_sub(self.offset) else {
            return false;
        };
        if self.step == 0 {
            return distance == 0;
        }
        distance.checked_rem(self.step) == Some(0)
            && distance
                .checked_div(self.step)
                .is_some_and(|count| count >= 0)
    }
}

/// A compiled pseudo-class test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoPredicate {
    FirstChild,
    LastChild,
    OnlyChild,
    Empty,
    /// Carries a `checked` or `selected` attribute.
    Checked,
    /// Substring of the serialized inner content.
    Contains(String),
    Not(Box<Matcher>),
    /// `None` when the argument could not be parsed; never matches.
    NthChild(Option<NthExpr>),
}

impl PseudoPredicate {
    pub fn test<A: NodeAdapter + ?Sized>(&self, host: &A, node: A::Handle) -> bool {
        match self {
            Self::FirstChild => traverse::previous_element_sibling(host, node).is_none(),
            Self::LastChild => traverse::next_element_sibling(host, node).is_none(),
            Self::OnlyChild => {
                traverse::previous_element_sibling(host, node).is_none()
                    && traverse::next_element_sibling(host, node).is_none()
            }
            Self::Empty => iter::successors(host.first_child(node), |&child| {
                host.next_sibling(child)
            })
            .all(|child| !host.is_element(child) && host.text(child).is_none_or(str::is_empty)),
            Self::Checked => {
                host.attr(node, "checked").is_some() || host.attr(node, "selected").is_some()
            }
            Self::Contains(needle) => host.inner_content(node).contains(needle.as_str()),
            Self::Not(matcher) => !matcher.matches(host, node),
            Self::NthChild(expr) => expr.is_some_and(|nth| {
                let position = traverse::element_position(host, node);
                nth.matches(i64::try_from(position).unwrap_or(i64::MAX))
            }),
        }
    }
}

/// Strip one pair of matching outer quotes.
fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    arg
}

fn first_child(_arg: Option<&str>, _compiler: &MatcherCompiler<'_>) -> PseudoPredicate {
    PseudoPredicate::FirstChild
}

fn last_child(_arg: Option<&str>, _compiler: &MatcherCompiler<'_>) -> PseudoPredicate {
    PseudoPredicate::LastChild
}

fn only_child(_arg: Option<&str>, _compiler: &MatcherCompiler<'_>) -> PseudoPredicate {
    PseudoPredicate::OnlyChild
}

fn empty(_arg: Option<&str>, _compiler: &MatcherCompiler<'_>) -> PseudoPredicate {
    PseudoPredicate::Empty
}

fn checked(_arg: Option<&str>, _compiler: &MatcherCompiler<'_>) -> PseudoPredicate {
    PseudoPredicate::Checked
}

fn contains(arg: Option<&str>, _compiler: &MatcherCompiler<'_>) -> PseudoPredicate {
    PseudoPredicate::Contains(unquote(arg.unwrap_or_default()).to_owned())
}

fn nth_child(arg: Option<&str>, _compiler: &MatcherCompiler<'_>) -> PseudoPredicate {
    let expr = arg.and_then(NthExpr::parse);
    if expr.is_none() {
        log::debug!(
            target: "query_engine",
            "unparseable :nth-child({}) never matches",
            arg.unwrap_or_default()
        );
    }
    PseudoPredicate::NthChild(expr)
}

/// The element test is already done by the matcher carrying the `:not`.
fn not(arg: Option<&str>, compiler: &MatcherCompiler<'_>) -> PseudoPredicate {
    let parts = parse(arg.unwrap_or_default());
    if parts.len() > 1 {
        log::debug!(
            target: "query_engine",
            "only the first part of :not({}) is used",
            arg.unwrap_or_default()
        );
    }
    let inner = parts.first().map_or_else(Matcher::default, |part| {
        compiler.compile(part, Ignore::ELEMENT)
    });
    PseudoPredicate::Not(Box::new(inner))
}

/// Lookup table from pseudo-class name to factory.
#[derive(Clone, Debug)]
pub struct PseudoRegistry {
    factories: FxHashMap<&'static str, PseudoFactory>,
}

impl Default for PseudoRegistry {
    #[inline]
    fn default() -> Self {
        Self::builtin()
    }
}

impl PseudoRegistry {
    /// A registry with no entries.
    pub fn empty() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// `first-child`, `last-child`, `only-child`, `empty`, `checked`,
    /// `contains`, `not` and `nth-child`.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("first-child", first_child);
        registry.register("last-child", last_child);
        registry.register("only-child", only_child);
        registry.register("empty", empty);
        registry.register("checked", checked);
        registry.register("contains", contains);
        registry.register("not", not);
        registry.register("nth-child", nth_child);
        registry
    }

    /// Add or replace the factory for a lowercase name.
    #[inline]
    pub fn register(&mut self, name: &'static str, factory: PseudoFactory) {
        self.factories.insert(name, factory);
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<PseudoFactory> {
        self.factories.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build the predicate for `pseudo`, or `None` for an unknown name.
    pub fn build(
        &self,
        pseudo: &Pseudo,
        compiler: &MatcherCompiler<'_>,
    ) -> Option<PseudoPredicate> {
        let Some(factory) = self.get(&pseudo.name) else {
            log::debug!(
                target: "query_engine",
                "ignoring unknown pseudo-class :{}",
                pseudo.name
            );
            return None;
        };
        Some(factory(pseudo.arg.as_deref(), compiler))
    }
}
