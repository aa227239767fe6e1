//! Static checks for the native fast path.

use query_selectors::{AttrOp, Combinator, QueryPart};

/// Per-group selector text to hand to the host's `select_all`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativePlan {
    groups: Vec<String>,
    /// Every group is a single part, so the host can scope it to any
    /// context node.
    single_part: bool,
}

impl NativePlan {
    /// Build the plan from the group sources. A group ending in a combinator
    /// gets an explicit ` *`.
    pub fn new<'src, I>(sources: I, single_part: bool) -> Self
    where
        I: IntoIterator<Item = &'src str>,
    {
        let groups = sources
            .into_iter()
            .map(|source| {
                let trimmed = source.trim();
                if trimmed.ends_with(['>', '+', '~']) {
                    format!("{trimmed} *")
                } else {
                    trimmed.to_owned()
                }
            })
            .collect();
        Self {
            groups,
            single_part,
        }
    }

    #[inline]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    #[inline]
    pub const fn single_part(&self) -> bool {
        self.single_part
    }
}

/// Whether the host may be asked to run `selector` natively.
///
/// Rejects: empty selectors, groups starting with a combinator (they are
/// relative to the context), pseudo-classes the host did not list, `|=`, and
/// space-free selectors containing `#`, which the id strategy serves
/// directly.
pub fn is_native_compatible(
    selector: &str,
    groups: &[Vec<QueryPart>],
    native_pseudos: &[String],
) -> bool {
    let trimmed = selector.trim();
    if trimmed.is_empty() || groups.is_empty() {
        return false;
    }
    if !trimmed.contains(char::is_whitespace) && trimmed.contains('#') {
        return false;
    }
    groups.iter().all(|parts| {
        parts
            .first()
            .is_some_and(|first| first.operator() == Combinator::Descendant)
            && parts.iter().all(|part| {
                part.attrs().iter().all(|filter| filter.op != AttrOp::DashMatch)
                    && part
                        .pseudos()
                        .iter()
                        .all(|pseudo| native_pseudos.contains(&pseudo.name))
            })
    })
}
