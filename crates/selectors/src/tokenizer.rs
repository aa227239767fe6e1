//! Character tokenizer over a selector string.

use crate::{AttrFilter, AttrOp, Combinator, Pseudo, Recovery, RecoveryKind};
use core::iter;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Internal tokenizer token kinds.
pub enum Tok {
    /// One or more whitespace characters.
    Whitespace,
    /// An explicit `>`, `+` or `~`.
    Combinator(Combinator),
    /// `*`
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attr(AttrFilter),
    Pseudo(Pseudo),
    /// A character that was skipped after recording a recovery.
    Stray,
}

/// Characters that may appear in an unescaped tag, id, class or pseudo name.
#[inline]
fn is_ident_char(character: char) -> bool {
    character.is_ascii_alphanumeric()
        || character == '-'
        || character == '_'
        || character == '\\'
        || !character.is_ascii()
}

/// Tokenizer over a selector string.
pub struct SelectorTokenizer<'src> {
    input: &'src str,
    /// Byte cursor, always on a char boundary.
    index: usize,
    recoveries: Vec<Recovery>,
}

impl<'src> SelectorTokenizer<'src> {
    #[inline]
    pub(crate) fn new(input: &'src str) -> Self {
        Self {
            input,
            index: 0,
            recoveries: Vec::new(),
        }
    }

    /// Byte offset of the next token.
    #[inline]
    pub(crate) const fn offset(&self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) fn into_recoveries(self) -> Vec<Recovery> {
        self.recoveries
    }

    /// Return the next selector token, if any.
    pub(crate) fn next_token(&mut self) -> Option<Tok> {
        let start = self.index;
        let current = self.peek()?;
        let token = match current {
            _ if current.is_ascii_whitespace() => {
                self.skip_whitespace();
                Tok::Whitespace
            }
            '>' => {
                self.advance(current);
                Tok::Combinator(Combinator::Child)
            }
            '+' => {
                self.advance(current);
                Tok::Combinator(Combinator::NextSibling)
            }
            '~' => {
                self.advance(current);
                Tok::Combinator(Combinator::FollowingSiblings)
            }
            '*' => {
                self.advance(current);
                Tok::Universal
            }
            '#' => {
                self.advance(current);
                Tok::Id(self.consume_name(start))
            }
            '.' => {
                self.advance(current);
                Tok::Class(self.consume_name(start))
            }
            '[' => {
                self.advance(current);
                Tok::Attr(self.consume_attr(start))
            }
            ':' => {
                self.advance(current);
                Tok::Pseudo(self.consume_pseudo(start))
            }
            _ if is_ident_char(current) => Tok::Tag(self.consume_name(start)),
            _ => {
                self.advance(current);
                self.recover(RecoveryKind::UnexpectedChar(current), start);
                Tok::Stray
            }
        };
        Some(token)
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input.get(self.index..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn peek_second(&self) -> Option<char> {
        self.input.get(self.index..).and_then(|rest| rest.chars().nth(1))
    }

    #[inline]
    fn advance(&mut self, character: char) {
        self.index = self.index.saturating_add(character.len_utf8());
    }

    fn recover(&mut self, kind: RecoveryKind, offset: usize) {
        log::debug!(
            target: "query_selectors",
            "recovering from {kind} at byte {offset} in `{}`",
            self.input
        );
        self.recoveries.push(Recovery { kind, offset });
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        while let Some(current) = self.peek()
            && current.is_ascii_whitespace()
        {
            self.advance(current);
        }
    }

    /// Consume a name, dropping each escaping backslash and keeping the
    /// character after it.
    fn consume_name(&mut self, token_start: usize) -> String {
        let mut name = String::new();
        while let Some(current) = self.peek() {
            if current == '\\' {
                self.advance(current);
                if let Some(escaped) = self.peek() {
                    name.push(escaped);
                    self.advance(escaped);
                } else {
                    self.recover(RecoveryKind::DanglingEscape, token_start);
                }
            } else if is_ident_char(current) {
                name.push(current);
                self.advance(current);
            } else {
                break;
            }
        }
        if name.is_empty() {
            self.recover(RecoveryKind::EmptyName, token_start);
        }
        name
    }

    /// Parse the inside of `[...]`; the opening bracket is already consumed.
    fn consume_attr(&mut self, token_start: usize) -> AttrFilter {
        self.skip_whitespace();
        let attr = self.consume_attr_name(token_start);
        self.skip_whitespace();
        let op = match self.peek() {
            Some(']') => {
                self.advance(']');
                return exists(attr);
            }
            None => {
                self.recover(RecoveryKind::UnterminatedAttribute, token_start);
                return exists(attr);
            }
            Some('=') => {
                self.advance('=');
                AttrOp::Equals
            }
            Some(lead) => {
                let op = match lead {
                    '*' => Some(AttrOp::Substring),
                    '^' => Some(AttrOp::Prefix),
                    '$' => Some(AttrOp::Suffix),
                    '~' => Some(AttrOp::Includes),
                    '|' => Some(AttrOp::DashMatch),
                    _ => None,
                };
                match op {
                    Some(found) if self.peek_second() == Some('=') => {
                        self.advance(lead);
                        self.advance('=');
                        found
                    }
                    _ => {
                        self.recover(RecoveryKind::UnknownAttributeOperator, self.index);
                        self.skip_past_bracket();
                        return exists(attr);
                    }
                }
            }
        };
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance(quote);
                self.consume_quoted(quote, token_start)
            }
            _ => self.consume_unquoted_value(),
        };
        self.skip_whitespace();
        match self.peek() {
            Some(']') => self.advance(']'),
            Some(other) => {
                self.recover(RecoveryKind::UnexpectedChar(other), self.index);
                self.skip_past_bracket();
            }
            None => self.recover(RecoveryKind::UnterminatedAttribute, token_start),
        }
        AttrFilter { attr, op, value }
    }

    /// Attribute names run up to whitespace, `]`, `=` or an operator prefix.
    fn consume_attr_name(&mut self, token_start: usize) -> String {
        let mut name = String::new();
        while let Some(current) = self.peek() {
            let operator_lead = matches!(current, '*' | '^' | '$' | '~' | '|')
                && self.peek_second() == Some('=');
            if current.is_ascii_whitespace() || current == ']' || current == '=' || operator_lead
            {
                break;
            }
            self.advance(current);
            if current == '\\' {
                if let Some(escaped) = self.peek() {
                    name.push(escaped);
                    self.advance(escaped);
                }
            } else {
                name.push(current);
            }
        }
        if name.is_empty() {
            self.recover(RecoveryKind::EmptyName, token_start);
        }
        name
    }

    fn consume_quoted(&mut self, quote: char, token_start: usize) -> String {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    self.recover(RecoveryKind::UnterminatedString, token_start);
                    break;
                }
                Some(current) if current == quote => {
                    self.advance(current);
                    break;
                }
                Some('\\') => {
                    self.advance('\\');
                    if let Some(escaped) = self.peek() {
                        value.push(escaped);
                        self.advance(escaped);
                    }
                }
                Some(current) => {
                    value.push(current);
                    self.advance(current);
                }
            }
        }
        value
    }

    fn consume_unquoted_value(&mut self) -> String {
        let mut value = String::new();
        while let Some(current) = self.peek() {
            if current == ']' || current.is_ascii_whitespace() {
                break;
            }
            self.advance(current);
            if current == '\\' {
                if let Some(escaped) = self.peek() {
                    value.push(escaped);
                    self.advance(escaped);
                }
            } else {
                value.push(current);
            }
        }
        value
    }

    fn skip_past_bracket(&mut self) {
        while let Some(current) = self.peek() {
            self.advance(current);
            if current == ']' {
                break;
            }
        }
    }

    /// Parse `name` or `name(arg)`; the colon is already consumed.
    fn consume_pseudo(&mut self, token_start: usize) -> Pseudo {
        if self.peek() == Some(':') {
            self.advance(':');
            self.recover(RecoveryKind::PseudoElement, token_start);
        }
        let name = self.consume_name(token_start).to_ascii_lowercase();
        let arg = if self.peek() == Some('(') {
            self.advance('(');
            Some(self.consume_balanced(token_start))
        } else {
            None
        };
        Pseudo { name, arg }
    }

    /// Capture up to the `)` that balances the already consumed `(`.
    /// Parentheses inside quotes or attribute brackets do not count.
    ///
    /// An argument cut off by the end of input gets its open quote, brackets
    /// and parentheses closed, so writing it back inside `(...)` reads the
    /// same argument again.
    fn consume_balanced(&mut self, token_start: usize) -> String {
        let arg_start = self.index;
        let mut depth = 1usize;
        let mut brackets = 0usize;
        let mut quote: Option<char> = None;
        let mut dangling = false;
        while let Some(current) = self.peek() {
            let here = self.index;
            self.advance(current);
            if current == '\\' {
                match self.peek() {
                    Some(escaped) => self.advance(escaped),
                    None => dangling = true,
                }
                continue;
            }
            if let Some(open) = quote {
                if current == open {
                    quote = None;
                }
                continue;
            }
            match current {
                '"' | '\'' => quote = Some(current),
                '[' => brackets = brackets.saturating_add(1),
                ']' => brackets = brackets.saturating_sub(1),
                '(' if brackets == 0 => depth = depth.saturating_add(1),
                ')' if brackets == 0 => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return trim_argument(self.input.get(arg_start..here).unwrap_or_default())
                            .to_owned();
                    }
                }
                _ => {}
            }
        }
        self.recover(RecoveryKind::UnterminatedPseudo, token_start);
        let mut rest = self.input.get(arg_start..).unwrap_or_default();
        if dangling {
            rest = rest.strip_suffix('\\').unwrap_or(rest);
        }
        let mut arg = trim_argument(rest).to_owned();
        arg.extend(quote);
        arg.extend(iter::repeat_n(']', brackets));
        arg.extend(iter::repeat_n(')', depth.saturating_sub(1)));
        arg
    }
}

/// Trim surrounding whitespace, keeping an escaped trailing character.
fn trim_argument(text: &str) -> &str {
    let body = text.trim_start();
    let trimmed = body.trim_end();
    let escapes = trimmed
        .chars()
        .rev()
        .take_while(|&character| character == '\\')
        .count();
    if escapes % 2 == 0 {
        return trimmed;
    }
    body.get(trimmed.len()..)
        .and_then(|rest| rest.chars().next())
        .and_then(|escaped| body.get(..trimmed.len().saturating_add(escaped.len_utf8())))
        .unwrap_or(trimmed)
}

#[inline]
fn exists(attr: String) -> AttrFilter {
    AttrFilter {
        attr,
        op: AttrOp::Exists,
        value: String::new(),
    }
}
