use crate::matching::Pattern;
use crate::regex::Regex;

use super::TokenSet;

/// A token plus the byte span it was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<T> {
    pub start: usize,
    pub token: T,
    pub end: usize,
}

/// A token alphabet recognized by a [`TokenSet`] of labeled patterns.
/// Usually implemented through [`crate::impl_tokens!`].
pub trait Token
where
    Self: Sized,
{
    /// Longest token match at the start of `input`, as
    /// `(consumed bytes, token)`.
    #[must_use]
    fn next_match(input: &str) -> Option<(usize, Self)> {
        Self::token_set()
            .longest_match(input)
            .map(|(consumed, label)| (consumed, Self::from_label(label)))
    }

    /// How many leading bytes of `input` to skip before the next token.
    #[must_use]
    fn skip_bytes(input: &str) -> usize {
        Self::skip_pattern()
            .match_start(input)
            .map_or(0, |m| m.byte_span().1)
    }

    #[must_use]
    fn skip_pattern() -> &'static Regex {
        lazy_static::lazy_static! {
            static ref SKIP: Regex = Regex::new(r"\s*").unwrap();
        }
        &SKIP
    }

    /// The token to emit once the input is exhausted, if any.
    #[must_use]
    fn eof() -> Option<Self>;

    #[must_use]
    fn token_set() -> &'static TokenSet;

    #[must_use]
    fn from_label(label: &'static str) -> Self;
}

/// Wire an enum to a static [`TokenSet`]: one `(variant, label, pattern)`
/// triple per token kind, tried longest-match with earlier entries winning
/// ties.
#[macro_export]
macro_rules! impl_tokens {
    (
        $this:ident,
        $eof:expr,
        $(($variant:expr, $label:expr, $pattern:expr)),+ $(,)?
    ) => {
        impl $crate::lexer::Token for $this {
            fn eof() -> Option<Self> {
                $eof
            }

            fn token_set() -> &'static $crate::lexer::TokenSet {
                lazy_static::lazy_static! {
                    static ref TOKEN_SET: $crate::lexer::TokenSet =
                        $crate::lexer::TokenSet::build(vec![
                            $(($label, $pattern)),+
                        ])
                        .unwrap();
                }
                &TOKEN_SET
            }

            fn from_label(label: &'static str) -> Self {
                use $this::*;
                match label {
                    $($label => $variant,)+
                    _ => unreachable!("no token for label: {label}"),
                }
            }
        }
    };
}
