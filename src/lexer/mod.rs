//! A longest-match tokenizer built on top of the regex engine: compile one
//! pattern per token kind, then iterate [`Spanned`] tokens out of an input
//! string.

use std::marker::PhantomData;

use thiserror::Error;

use crate::error::ParseError;
use crate::matching::Pattern;
use crate::regex::Regex;

pub mod prelude {
    pub use super::{LexError, Lexer, Spanned, Token, TokenSet};
    pub use crate::impl_tokens;
    pub use crate::matching::Pattern;
    pub use crate::regex::Regex;
}

mod token;

pub use token::{Spanned, Token};

/// Labeled patterns tried against the start of the remaining input. The
/// longest match wins; ties go to the earliest entry.
pub struct TokenSet {
    entries: Vec<(&'static str, Regex)>,
}

impl TokenSet {
    pub fn build(patterns: Vec<(&'static str, &str)>) -> Result<Self, ParseError> {
        let entries = patterns
            .into_iter()
            .map(|(label, pattern)| Regex::new(pattern).map(|regex| (label, regex)))
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }

    /// `(consumed bytes, label)` of the longest anchored match. Zero-width
    /// matches never produce a token.
    #[must_use]
    pub fn longest_match(&self, input: &str) -> Option<(usize, &'static str)> {
        let mut best: Option<(usize, &'static str)> = None;
        for (label, regex) in &self.entries {
            if let Some(m) = regex.match_start(input) {
                let consumed = m.byte_span().1;
                if consumed > 0 && best.is_none_or(|(longest, _)| consumed > longest) {
                    best = Some((consumed, label));
                }
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unrecognized token at byte {0}")]
    UnrecognizedToken(usize),
}

#[derive(Debug)]
pub struct Lexer<'input, T> {
    input: &'input str,
    consumed: usize,
    phantom: PhantomData<T>,
    /// True once the input is empty and a `T::eof()` token has been
    /// returned.
    sent_eof: bool,
    /// True once an error was hit that could not be skipped past; the
    /// iterator then only produces `None`.
    sent_error: bool,
}

impl<'input, T> Lexer<'input, T> {
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            consumed: 0,
            phantom: PhantomData,
            sent_eof: false,
            sent_error: false,
        }
    }
}

impl<T: Token> Iterator for Lexer<'_, T> {
    type Item = Result<Spanned<T>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sent_error || self.sent_eof {
            return None;
        }

        let skipped = T::skip_bytes(self.input);
        self.input = &self.input[skipped..];
        self.consumed += skipped;

        if self.input.is_empty() {
            self.sent_eof = true;
            return T::eof().map(|token| {
                Ok(Spanned {
                    start: self.consumed,
                    token,
                    end: self.consumed,
                })
            });
        }

        let token = T::next_match(self.input)
            .map(|(consumed, token)| {
                let start = self.consumed;
                self.consumed += consumed;
                self.input = &self.input[consumed..];
                Spanned {
                    start,
                    token,
                    end: self.consumed,
                }
            })
            .ok_or_else(|| {
                let at = self.consumed;
                // Skip one char and carry on; end the iterator if we can't.
                if let Some(c) = self.input.chars().next() {
                    self.input = &self.input[c.len_utf8()..];
                    self.consumed += c.len_utf8();
                } else {
                    self.sent_error = true;
                }
                LexError::UnrecognizedToken(at)
            });

        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum ExprToken {
        Var,
        Op,
        Num,
    }

    impl_tokens!(
        ExprToken,
        None,
        (Var, "var", "[A-Za-z][A-Za-z0-9]*"),
        (Op, "op", r"\+|-"),
        (Num, "num", "[0-9]+"),
    );

    #[test]
    fn lexes_a_token_stream() {
        let input = "one1+two2 - 1 +21 a20";

        let tokens = Lexer::<ExprToken>::new(input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
            .into_iter()
            .map(|Spanned { token, .. }| token)
            .collect::<Vec<_>>();

        use ExprToken::*;
        assert_eq!(tokens, vec![Var, Op, Var, Op, Num, Op, Num, Var]);
    }

    #[test]
    fn spans_are_byte_offsets() {
        let spanned: Vec<_> = Lexer::<ExprToken>::new("ab +1")
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(spanned[0].start..spanned[0].end, 0..2);
        assert_eq!(spanned[1].start..spanned[1].end, 3..4);
        assert_eq!(spanned[2].start..spanned[2].end, 4..5);
    }

    #[test]
    fn longest_match_wins() {
        // "a20" must lex as one Var, not Var + Num.
        let tokens: Vec<_> = Lexer::<ExprToken>::new("a20")
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, ExprToken::Var);
    }

    #[test]
    fn unrecognized_chars_are_reported_and_skipped() {
        let errors: Vec<_> = Lexer::<ExprToken>::new("-2 + 4 + -2 + 2 / 2 !")
            .filter_map(Result::err)
            .collect();
        assert_eq!(
            errors,
            vec![
                LexError::UnrecognizedToken(16),
                LexError::UnrecognizedToken(20),
            ]
        );
    }
}
