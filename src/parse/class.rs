use itertools::Itertools;

/// Highest scalar value usable as an upper range bound.
const MAX_SCALAR: u32 = char::MAX as u32;

/// A bracket expression `[...]`, or one of the predefined `\d \s \w`
/// families, reduced to a set of inclusive code-point ranges plus a
/// negation bit.
///
/// Ranges are stored as raw `u32` bounds so that complements can span the
/// surrogate gap without ever materialising an invalid `char`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassSet {
    ranges: Vec<(u32, u32)>,
    negated: bool,
}

impl ClassSet {
    /// Normalizes `ranges`: sorted by lower bound, overlapping and adjacent
    /// ranges coalesced.
    #[must_use]
    pub fn new(ranges: Vec<(u32, u32)>, negated: bool) -> Self {
        let ranges = ranges
            .into_iter()
            .sorted_unstable()
            .coalesce(|a, b| {
                if b.0 <= a.1.saturating_add(1) {
                    Ok((a.0, a.1.max(b.1)))
                } else {
                    Err((a, b))
                }
            })
            .collect();
        Self { ranges, negated }
    }

    /// `\d` / `\D`
    #[must_use]
    pub fn digit(negated: bool) -> Self {
        Self::new(vec![('0' as u32, '9' as u32)], negated)
    }

    /// `\s` / `\S` — ASCII whitespace `[ \t\n\v\f\r]`.
    #[must_use]
    pub fn space(negated: bool) -> Self {
        Self::new(vec![(0x09, 0x0D), (' ' as u32, ' ' as u32)], negated)
    }

    /// `\w` / `\W` — ASCII `[0-9A-Za-z_]`.
    #[must_use]
    pub fn word(negated: bool) -> Self {
        Self::new(
            vec![
                ('0' as u32, '9' as u32),
                ('A' as u32, 'Z' as u32),
                ('_' as u32, '_' as u32),
                ('a' as u32, 'z' as u32),
            ],
            negated,
        )
    }

    /// The complement of this set's ranges, ignoring the negation bit.
    /// Used to fold a negated family like `\D` into an enclosing bracket
    /// expression as plain ranges.
    #[must_use]
    pub fn complement_ranges(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0u32;
        for &(lo, hi) in &self.ranges {
            if lo > next {
                out.push((next, lo - 1));
            }
            next = hi.saturating_add(1);
        }
        if next <= MAX_SCALAR {
            out.push((next, MAX_SCALAR));
        }
        out
    }

    #[must_use]
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Membership test. `icase` additionally tries the opposite ASCII case
    /// before the negation bit is applied.
    #[must_use]
    pub fn matches(&self, c: char, icase: bool) -> bool {
        let mut hit = self.contains(c as u32);
        if !hit && icase && c.is_ascii_alphabetic() {
            let swapped = if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            hit = self.contains(swapped as u32);
        }
        hit != self.negated
    }

    fn contains(&self, v: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if v < lo {
                    std::cmp::Ordering::Greater
                } else if v > hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

impl std::fmt::Display for ClassSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        "[".fmt(f)?;
        if self.negated {
            "^".fmt(f)?;
        }
        for &(lo, hi) in &self.ranges {
            let write_bound = |f: &mut std::fmt::Formatter<'_>, v: u32| match char::from_u32(v) {
                Some(c) if !c.is_control() && c != ']' && c != '\\' && c != '-' => c.fmt(f),
                _ => write!(f, "\\u{{{v:x}}}"),
            };
            write_bound(f, lo)?;
            if hi > lo {
                "-".fmt(f)?;
                write_bound(f, hi)?;
            }
        }
        "]".fmt(f)
    }
}
