//! Assembles tokens into query parts.

use crate::tokenizer::{SelectorTokenizer, Tok};
use crate::{
    AttrFilter, Combinator, ParseError, Pseudo, QueryPart, Recovery, RecoveryKind, TagName,
};
use core::mem::take;

/// Parts of one group plus every recovery made while reading it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parsed {
    pub parts: Vec<QueryPart>,
    /// Sorted by byte offset.
    pub recoveries: Vec<Recovery>,
}

#[derive(Default)]
struct PartBuilder {
    tag: Option<TagName>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrFilter>,
    pseudos: Vec<Pseudo>,
    operator: Combinator,
}

impl PartBuilder {
    fn is_empty(&self) -> bool {
        !self.universal
            && self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudos.is_empty()
    }

    fn finish(self) -> QueryPart {
        QueryPart::assemble(
            self.tag,
            self.id,
            self.classes,
            self.attrs,
            self.pseudos,
            self.operator,
        )
    }
}

/// Parse one group into parts, recording recoveries instead of failing.
pub fn parse_with_recoveries(selector: &str) -> Parsed {
    let mut tokenizer = SelectorTokenizer::new(selector);
    let mut parts = Vec::new();
    let mut recoveries = Vec::new();
    let mut current = PartBuilder::default();

    loop {
        let offset = tokenizer.offset();
        let Some(token) = tokenizer.next_token() else {
            break;
        };
        match token {
            Tok::Whitespace => {
                if !current.is_empty() {
                    parts.push(take(&mut current).finish());
                }
            }
            Tok::Combinator(combinator) => {
                if !current.is_empty() {
                    parts.push(take(&mut current).finish());
                } else if current.operator != Combinator::Descendant {
                    recoveries.push(Recovery {
                        kind: RecoveryKind::DoubleCombinator,
                        offset,
                    });
                }
                current.operator = combinator;
            }
            Tok::Universal => {
                if !current.is_empty() {
                    recoveries.push(Recovery {
                        kind: RecoveryKind::MisplacedTag,
                        offset,
                    });
                }
                current.universal = true;
            }
            Tok::Tag(name) if !name.is_empty() => {
                if !current.is_empty() {
                    recoveries.push(Recovery {
                        kind: RecoveryKind::MisplacedTag,
                        offset,
                    });
                }
                if current.tag.is_none() {
                    current.tag = Some(TagName::new(&name));
                }
            }
            Tok::Id(name) if !name.is_empty() => {
                if current.id.is_some() {
                    recoveries.push(Recovery {
                        kind: RecoveryKind::DuplicateId,
                        offset,
                    });
                }
                current.id = Some(name);
            }
            Tok::Class(name) if !name.is_empty() => current.classes.push(name),
            Tok::Attr(filter) if !filter.attr.is_empty() => current.attrs.push(filter),
            Tok::Pseudo(pseudo) if !pseudo.name.is_empty() => current.pseudos.push(pseudo),
            Tok::Tag(_)
            | Tok::Id(_)
            | Tok::Class(_)
            | Tok::Attr(_)
            | Tok::Pseudo(_)
            | Tok::Stray => {}
        }
    }

    if !current.is_empty() {
        parts.push(current.finish());
    } else if current.operator != Combinator::Descendant {
        // `div >` selects every child of every div.
        parts.push(QueryPart::universal(current.operator));
    }

    recoveries.extend(tokenizer.into_recoveries());
    recoveries.sort_by_key(|recovery| recovery.offset);
    log::trace!(
        target: "query_selectors",
        "parsed `{selector}` into {} part(s) with {} recovery(ies)",
        parts.len(),
        recoveries.len()
    );
    Parsed { parts, recoveries }
}

/// Parse one group into parts, silently recovering from malformed input.
#[inline]
pub fn parse(selector: &str) -> Vec<QueryPart> {
    parse_with_recoveries(selector).parts
}

/// Parse one group, failing on the first place the parser would have had
/// to recover.
///
/// # Errors
/// Returns a [`ParseError`] naming the first recovery in source order.
pub fn parse_strict(selector: &str) -> Result<Vec<QueryPart>, ParseError> {
    let parsed = parse_with_recoveries(selector);
    match parsed.recoveries.into_iter().next() {
        Some(recovery) => Err(ParseError::from_recovery(selector, recovery)),
        None => Ok(parsed.parts),
    }
}
