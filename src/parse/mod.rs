//! Pattern surface syntax: scanning and parsing into an [`Ast`].
//!
//! Grammar, lowest to highest precedence: alternation `|`, implicit
//! concatenation, quantifiers `? * + {n,m}` (with an optional lazy `?`
//! suffix), atoms. Capturing groups are numbered zero-based in source
//! order; `(?:…)` receives no number.

use crate::error::{ParseError, ParseErrorKind};
use crate::flags::Flags;

mod ast;
mod class;
mod lexer;
mod token;

pub use ast::{Anchor, Ast};
pub use class::ClassSet;
pub use token::Token;

/// The result of compiling a pattern's surface syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub ast: Ast,
    /// API flags merged with any inline `(?ims)` prefix.
    pub flags: Flags,
    pub group_count: usize,
    pub has_lazy: bool,
}

pub fn parse(pattern: &str, flags: Flags) -> Result<Parsed, ParseError> {
    let tokens = lexer::lex(pattern)?;
    let mut parser = Parser {
        tokens,
        at: 0,
        group_count: 0,
        has_lazy: false,
    };

    let mut flags = flags;
    if let Some((_, Token::InlineFlags(inline))) = parser.tokens.first() {
        flags |= *inline;
        parser.at = 1;
    }

    let ast = parser.alternation()?;
    if let Some((pos, token)) = parser.peek() {
        let kind = match token {
            Token::CParen => ParseErrorKind::UnbalancedParen,
            _ => ParseErrorKind::UnsupportedFeature,
        };
        return Err(ParseError::new(kind, *pos));
    }

    Ok(Parsed {
        ast,
        flags,
        group_count: parser.group_count,
        has_lazy: parser.has_lazy,
    })
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    at: usize,
    group_count: usize,
    has_lazy: bool,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.at)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|(_, t)| t)
    }

    fn bump(&mut self) -> Option<(usize, Token)> {
        let spanned = self.tokens.get(self.at).cloned();
        if spanned.is_some() {
            self.at += 1;
        }
        spanned
    }

    fn alternation(&mut self) -> Result<Ast, ParseError> {
        let mut branches = vec![self.concat()?];
        while matches!(self.peek_token(), Some(Token::Pipe)) {
            self.at += 1;
            branches.push(self.concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.pop().unwrap()
        } else {
            Ast::Alternation(branches)
        })
    }

    fn concat(&mut self) -> Result<Ast, ParseError> {
        let mut parts = Vec::new();
        loop {
            match self.peek() {
                None | Some((_, Token::Pipe | Token::CParen)) => break,
                Some((pos, Token::InlineFlags(_))) => {
                    // Flags are only understood at the top of a pattern.
                    return Err(ParseError::new(ParseErrorKind::UnsupportedFeature, *pos));
                }
                Some(_) => parts.push(self.quantified()?),
            }
        }
        Ok(match parts.len() {
            0 => Ast::Empty,
            1 => parts.pop().unwrap(),
            _ => Ast::Concat(parts),
        })
    }

    fn quantified(&mut self) -> Result<Ast, ParseError> {
        let atom = self.atom()?;

        if !self.peek_token().is_some_and(Token::is_quantifier) {
            return Ok(atom);
        }
        let (pos, token) = self.bump().unwrap();

        // There is nothing to repeat in a bare assertion.
        if matches!(atom, Ast::Anchor(_)) {
            return Err(ParseError::new(ParseErrorKind::InvalidQuantifier, pos));
        }

        let (min, max) = match token {
            Token::Question => (0, Some(1)),
            Token::Star => (0, None),
            Token::Plus => (1, None),
            Token::Counted { min, max } => (min, max),
            _ => unreachable!("is_quantifier covers exactly these tokens"),
        };

        let lazy = if matches!(self.peek_token(), Some(Token::Question)) {
            self.at += 1;
            true
        } else {
            false
        };
        if lazy {
            self.has_lazy = true;
        }

        // `a**` and friends.
        if let Some((pos, token)) = self.peek() {
            if token.is_quantifier() {
                return Err(ParseError::new(ParseErrorKind::InvalidQuantifier, *pos));
            }
        }

        Ok(Ast::Repeat {
            inner: Box::new(atom),
            min,
            max,
            lazy,
        })
    }

    fn atom(&mut self) -> Result<Ast, ParseError> {
        let (pos, token) = self.bump().expect("caller checked an atom is next");

        let ast = match token {
            Token::Literal(c) => Ast::Literal(c),
            Token::Dot => Ast::AnyChar,
            Token::Class(set) => Ast::Class(set),
            Token::Anchor(anchor) => Ast::Anchor(anchor),
            Token::OParen => {
                let index = self.group_count;
                self.group_count += 1;
                let inner = self.alternation()?;
                self.expect_cparen(pos)?;
                Ast::Group {
                    index: Some(index),
                    inner: Box::new(inner),
                }
            }
            Token::OParenNc => {
                let inner = self.alternation()?;
                self.expect_cparen(pos)?;
                Ast::Group {
                    index: None,
                    inner: Box::new(inner),
                }
            }
            Token::Question | Token::Star | Token::Plus | Token::Counted { .. } => {
                return Err(ParseError::new(ParseErrorKind::InvalidQuantifier, pos));
            }
            Token::CParen | Token::Pipe | Token::InlineFlags(_) => {
                unreachable!("filtered out by concat")
            }
        };
        Ok(ast)
    }

    fn expect_cparen(&mut self, open_pos: usize) -> Result<(), ParseError> {
        match self.bump() {
            Some((_, Token::CParen)) => Ok(()),
            _ => Err(ParseError::new(ParseErrorKind::UnbalancedParen, open_pos)),
        }
    }
}
