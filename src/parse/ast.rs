use super::ClassSet;

/// Zero-width assertions. These test a property of the current position
/// without consuming input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// `\A`
    StartOfString,
    /// `\Z`
    EndOfString,
    /// `^`
    StartOfLine,
    /// `$`
    EndOfLine,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartOfString => r"\A".fmt(f),
            Self::EndOfString => r"\Z".fmt(f),
            Self::StartOfLine => "^".fmt(f),
            Self::EndOfLine => "$".fmt(f),
            Self::WordBoundary => r"\b".fmt(f),
            Self::NotWordBoundary => r"\B".fmt(f),
        }
    }
}

/// The parsed shape of a pattern.
///
/// Alternation and concatenation are n-ary rather than binary so the tree
/// reads like the pattern does; the NFA builder walks branches in source
/// order, which is what encodes greedy preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// Matches the empty string, e.g. one branch of `(a|)`.
    Empty,
    Literal(char),
    /// `.`
    AnyChar,
    Class(ClassSet),
    Anchor(Anchor),
    Group {
        /// `None` for a non-capturing `(?:…)` group.
        index: Option<usize>,
        inner: Box<Ast>,
    },
    Alternation(Vec<Ast>),
    Concat(Vec<Ast>),
    Repeat {
        inner: Box<Ast>,
        min: u32,
        /// `None` means unbounded.
        max: Option<u32>,
        lazy: bool,
    },
}
