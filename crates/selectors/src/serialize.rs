//! Canonical text form of a query part.

use crate::{AttrOp, QueryPart};
use core::fmt;

fn push_ident(out: &mut String, name: &str) {
    for character in name.chars() {
        if !(character.is_ascii_alphanumeric()
            || character == '-'
            || character == '_'
            || !character.is_ascii())
        {
            out.push('\\');
        }
        out.push(character);
    }
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('"');
    for character in value.chars() {
        if character == '"' || character == '\\' {
            out.push('\\');
        }
        out.push(character);
    }
    out.push('"');
}

/// Rebuild the canonical source of `part`: operator prefix, then tag (or `*`
/// when nothing else is present), id, classes, attributes, pseudo-classes.
/// Parsing the result yields an equal part.
pub fn part_to_raw(part: &QueryPart) -> String {
    let mut raw = String::new();
    if let Some(symbol) = part.operator().symbol() {
        raw.push(symbol);
        raw.push(' ');
    }
    let body_start = raw.len();
    if let Some(tag) = part.tag() {
        push_ident(&mut raw, tag.written());
    }
    if let Some(id) = part.id() {
        raw.push('#');
        push_ident(&mut raw, id);
    }
    for class in part.classes() {
        raw.push('.');
        push_ident(&mut raw, class);
    }
    for filter in part.attrs() {
        raw.push('[');
        push_ident(&mut raw, &filter.attr);
        if filter.op != AttrOp::Exists {
            raw.push_str(filter.op.as_str());
            push_quoted(&mut raw, &filter.value);
        }
        raw.push(']');
    }
    for pseudo in part.pseudos() {
        raw.push(':');
        push_ident(&mut raw, &pseudo.name);
        if let Some(arg) = &pseudo.arg {
            raw.push('(');
            raw.push_str(arg);
            raw.push(')');
        }
    }
    if raw.len() == body_start {
        raw.push('*');
    }
    raw
}

impl fmt::Display for QueryPart {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.raw())
    }
}
