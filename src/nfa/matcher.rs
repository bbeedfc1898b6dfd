use crate::flags::Flags;
use crate::matching::{Context, Cursor};
use crate::parse::{Anchor, ClassSet};

/// The label of a single transition: either consumes one char, or tests a
/// zero-width property, or is a pure ε-edge / capture marker.
///
/// Matching is a switch over this tag; advance semantics is data rather
/// than method override.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    Literal(char),
    /// `.`
    Any,
    Class(ClassSet),
    Anchor(Anchor),
    Epsilon,
    /// Writes the current position into capture slot `2i` when crossed.
    GroupEntry(usize),
    /// Writes the current position into capture slot `2i + 1` when crossed.
    GroupExit(usize),
}

impl Matcher {
    /// Does this transition apply at the cursor's position? Pure predicate;
    /// consuming matchers additionally require a char to be present.
    #[must_use]
    pub fn matches(&self, cursor: &Cursor, ctx: &Context<'_>) -> bool {
        let pos = cursor.position;
        match self {
            Self::Literal(l) => ctx.char_at(pos).is_some_and(|c| {
                if ctx.flags().contains(Flags::IGNORECASE) {
                    l.eq_ignore_ascii_case(&c)
                } else {
                    *l == c
                }
            }),
            Self::Any => ctx
                .char_at(pos)
                .is_some_and(|c| ctx.flags().contains(Flags::DOTALL) || c != '\n'),
            Self::Class(set) => ctx
                .char_at(pos)
                .is_some_and(|c| set.matches(c, ctx.flags().contains(Flags::IGNORECASE))),
            Self::Anchor(anchor) => Self::anchor_matches(*anchor, pos, ctx),
            Self::Epsilon | Self::GroupEntry(_) | Self::GroupExit(_) => true,
        }
    }

    fn anchor_matches(anchor: Anchor, pos: usize, ctx: &Context<'_>) -> bool {
        let multiline = ctx.flags().contains(Flags::MULTILINE);
        match anchor {
            Anchor::StartOfString => pos == 0,
            Anchor::EndOfString => pos == ctx.len(),
            Anchor::StartOfLine => {
                pos == 0 || (multiline && ctx.char_at(pos - 1) == Some('\n'))
            }
            Anchor::EndOfLine => {
                pos == ctx.len() || (multiline && ctx.char_at(pos) == Some('\n'))
            }
            Anchor::WordBoundary => {
                Self::is_word(pos.checked_sub(1).and_then(|p| ctx.char_at(p)))
                    != Self::is_word(ctx.char_at(pos))
            }
            Anchor::NotWordBoundary => {
                Self::is_word(pos.checked_sub(1).and_then(|p| ctx.char_at(p)))
                    == Self::is_word(ctx.char_at(pos))
            }
        }
    }

    fn is_word(c: Option<char>) -> bool {
        c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// The successor cursor after crossing this transition. Zero-width
    /// matchers never move `position`; group markers only write their
    /// capture slot.
    #[must_use]
    pub fn advance(&self, cursor: &Cursor) -> Cursor {
        match self {
            Self::Literal(_) | Self::Any | Self::Class(_) => Cursor {
                position: cursor.position + 1,
                groups: cursor.groups.clone(),
            },
            Self::Anchor(_) | Self::Epsilon => cursor.clone(),
            Self::GroupEntry(i) => {
                let mut groups = cursor.groups.clone();
                groups[2 * i] = cursor.position;
                Cursor {
                    position: cursor.position,
                    groups,
                }
            }
            Self::GroupExit(i) => {
                let mut groups = cursor.groups.clone();
                groups[2 * i + 1] = cursor.position;
                Cursor {
                    position: cursor.position,
                    groups,
                }
            }
        }
    }

    /// True when crossing this transition never consumes input.
    #[must_use]
    pub fn is_zero_width(&self) -> bool {
        matches!(
            self,
            Self::Anchor(_) | Self::Epsilon | Self::GroupEntry(_) | Self::GroupExit(_)
        )
    }
}

impl std::fmt::Display for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(c) => write!(f, "{}", c.escape_default()),
            Self::Any => ".".fmt(f),
            Self::Class(set) => set.fmt(f),
            Self::Anchor(anchor) => anchor.fmt(f),
            Self::Epsilon => "ε".fmt(f),
            Self::GroupEntry(i) => write!(f, "({i}"),
            Self::GroupExit(i) => write!(f, "){i}"),
        }
    }
}
