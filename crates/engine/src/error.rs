use query_selectors::ParseError;

/// A host refused a native lookup. Never surfaced to `query` callers: the
/// engine answers the call with its interpreter instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedSelector {
    #[error("host has no native matcher")]
    Unavailable,
    /// Multi-part selectors cannot be scoped to a non-document context by
    /// the host's matcher.
    #[error("multi-part selector cannot be scoped to a non-document context")]
    ScopedContext,
    #[error("native matcher rejected the selector: {0}")]
    Syntax(String),
}

/// Errors reported by [`crate::SelectorEngine::try_query`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}
