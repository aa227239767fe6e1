//! Selector syntax for the node query engine.
//!
//! A selector string is split into comma groups and each group is parsed into
//! an ordered list of [`QueryPart`]s, one per compound selector between
//! combinators:
//!
//! ```text
//! selector   := group (',' group)*
//! group      := part (combinator? WS part)*
//! part       := [tag] ('#' id)? ('.' class)* attr* pseudo*
//! attr       := '[' name (op value)? ']'
//! pseudo     := ':' name ('(' arg ')')?
//! op         := '=' | '*=' | '^=' | '$=' | '~=' | '|='
//! combinator := '>' | '~' | '+'
//! ```
//!
//! Parsing is permissive: malformed input produces a best-effort list of parts
//! and the places where the parser had to recover are reported separately, so
//! callers can opt into strictness with [`parse_strict`].

mod error;
mod groups;
mod parser;
mod serialize;
mod tokenizer;

pub use error::{ParseError, Recovery, RecoveryKind};
pub use groups::split_groups;
pub use parser::{Parsed, parse, parse_strict, parse_with_recoveries};

/// Relation of a part to the part on its left, or to the context node for
/// the first part of a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Implicit whitespace: any descendant.
    #[default]
    Descendant,
    /// `>`: direct element children.
    Child,
    /// `+`: the next element sibling.
    NextSibling,
    /// `~`: every following element sibling.
    FollowingSiblings,
}

impl Combinator {
    /// The selector character for an explicit combinator.
    #[inline]
    pub const fn symbol(self) -> Option<char> {
        match self {
            Self::Descendant => None,
            Self::Child => Some('>'),
            Self::NextSibling => Some('+'),
            Self::FollowingSiblings => Some('~'),
        }
    }
}

/// A tag name, kept both ASCII-uppercased and as written.
///
/// HTML documents compare against the normalized form; case-sensitive (XML)
/// documents compare against the written form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagName {
    /// Uppercased spelling.
    normalized: String,
    /// Spelling from the selector source, escapes removed.
    written: String,
}

impl TagName {
    /// Build a tag name from its written spelling.
    #[inline]
    pub fn new(written: &str) -> Self {
        Self {
            normalized: written.to_ascii_uppercase(),
            written: written.to_owned(),
        }
    }

    #[inline]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    #[inline]
    pub fn written(&self) -> &str {
        &self.written
    }
}

/// Attribute comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=value]`
    Equals,
    /// `[attr*=value]`
    Substring,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr~=value]`: whitespace-separated token.
    Includes,
    /// `[attr|=value]`: exact, or prefix followed by `-`.
    DashMatch,
}

impl AttrOp {
    /// Operator text as it appears inside the brackets.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "",
            Self::Equals => "=",
            Self::Substring => "*=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
        }
    }
}

/// One `[attr op value]` filter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttrFilter {
    pub attr: String,
    pub op: AttrOp,
    /// Empty for [`AttrOp::Exists`].
    pub value: String,
}

/// One `:name` or `:name(arg)` pseudo-class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pseudo {
    /// ASCII-lowercased name.
    pub name: String,
    /// Argument text between the outer parentheses, trimmed.
    pub arg: Option<String>,
}

/// One compound selector fragment between combinators, e.g.
/// `div.foo[bar]:first-child`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryPart {
    /// `None` is the wildcard.
    tag: Option<TagName>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrFilter>,
    pseudos: Vec<Pseudo>,
    operator: Combinator,
    /// Canonical source form, rebuilt from the fields above.
    raw: String,
}

impl QueryPart {
    /// Assemble a part and derive its canonical `raw` form.
    pub(crate) fn assemble(
        tag: Option<TagName>,
        id: Option<String>,
        classes: Vec<String>,
        attrs: Vec<AttrFilter>,
        pseudos: Vec<Pseudo>,
        operator: Combinator,
    ) -> Self {
        let mut part = Self {
            tag,
            id,
            classes,
            attrs,
            pseudos,
            operator,
            raw: String::new(),
        };
        part.raw = serialize::part_to_raw(&part);
        part
    }

    /// A bare `*` part with the given operator.
    #[inline]
    pub fn universal(operator: Combinator) -> Self {
        Self::assemble(None, None, Vec::new(), Vec::new(), Vec::new(), operator)
    }

    #[inline]
    pub const fn tag(&self) -> Option<&TagName> {
        self.tag.as_ref()
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[inline]
    pub fn attrs(&self) -> &[AttrFilter] {
        &self.attrs
    }

    #[inline]
    pub fn pseudos(&self) -> &[Pseudo] {
        &self.pseudos
    }

    #[inline]
    pub const fn operator(&self) -> Combinator {
        self.operator
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True when the tag is the wildcard.
    #[inline]
    pub const fn is_wildcard(&self) -> bool {
        self.tag.is_none()
    }

    /// True when the part carries class, attribute or pseudo-class criteria.
    #[inline]
    pub fn has_filters(&self) -> bool {
        !self.classes.is_empty() || !self.attrs.is_empty() || !self.pseudos.is_empty()
    }
}
