//! Recovery reports and the strict-mode parse error.

use core::fmt;

/// Why the parser had to guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecoveryKind {
    /// A character that cannot start any selector component.
    UnexpectedChar(char),
    /// `#`, `.`, `:` or `[` with no name after it.
    EmptyName,
    /// A backslash at the end of the input.
    DanglingEscape,
    /// `[` without a closing `]`.
    UnterminatedAttribute,
    /// An attribute operator outside `= *= ^= $= ~= |=`.
    UnknownAttributeOperator,
    /// A quoted value without its closing quote.
    UnterminatedString,
    /// `:name(` without the balancing `)`.
    UnterminatedPseudo,
    /// `::name`, read as a pseudo-class.
    PseudoElement,
    /// A second `#id` in one part; the last one wins.
    DuplicateId,
    /// A tag name or `*` after other components of the same part.
    MisplacedTag,
    /// Two combinators with no part between them; the last one wins.
    DoubleCombinator,
}

impl fmt::Display for RecoveryKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar(character) => {
                write!(formatter, "unexpected character `{character}`")
            }
            Self::EmptyName => formatter.write_str("missing name"),
            Self::DanglingEscape => formatter.write_str("dangling escape"),
            Self::UnterminatedAttribute => formatter.write_str("unterminated attribute selector"),
            Self::UnknownAttributeOperator => formatter.write_str("unknown attribute operator"),
            Self::UnterminatedString => formatter.write_str("unterminated quoted value"),
            Self::UnterminatedPseudo => formatter.write_str("unterminated pseudo-class argument"),
            Self::PseudoElement => formatter.write_str("pseudo-element used as pseudo-class"),
            Self::DuplicateId => formatter.write_str("duplicate id"),
            Self::MisplacedTag => formatter.write_str("tag name after other components"),
            Self::DoubleCombinator => formatter.write_str("consecutive combinators"),
        }
    }
}

/// A point in the source where the parser recovered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovery {
    pub kind: RecoveryKind,
    /// Byte offset of the token that triggered the recovery.
    pub offset: usize,
}

/// Strict-mode failure: the first recovery the permissive parser made.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {offset} in selector `{selector}`")]
pub struct ParseError {
    pub selector: String,
    pub offset: usize,
    pub kind: RecoveryKind,
}

impl ParseError {
    #[inline]
    pub(crate) fn from_recovery(selector: &str, recovery: Recovery) -> Self {
        Self {
            selector: selector.to_owned(),
            offset: recovery.offset,
            kind: recovery.kind,
        }
    }
}
