//! The match-time data model: [`Context`], [`Cursor`], [`Match`], and the
//! [`Pattern`] trait that turns a single `match_suffix` primitive into the
//! full `finditer` / `find` / `findall` / `sub` / `subn` surface.

use crate::flags::Flags;

/// Sentinel for a capture slot that was never written.
pub const UNSET: usize = usize::MAX;

/// Static per-match data shared by every cursor of one match call: the
/// haystack and the flags. Positions are char offsets; `byte_pos` maps them
/// back to byte offsets for slicing.
#[derive(Debug)]
pub struct Context<'t> {
    text: &'t str,
    chars: Vec<char>,
    byte_pos: Vec<usize>,
    flags: Flags,
}

impl<'t> Context<'t> {
    #[must_use]
    pub fn new(text: &'t str, flags: Flags) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut byte_pos = Vec::with_capacity(text.len() + 1);
        for (offset, c) in text.char_indices() {
            byte_pos.push(offset);
            chars.push(c);
        }
        byte_pos.push(text.len());
        Self {
            text,
            chars,
            byte_pos,
            flags,
        }
    }

    /// Length of the haystack in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[must_use]
    pub fn char_at(&self, position: usize) -> Option<char> {
        self.chars.get(position).copied()
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[must_use]
    pub fn text(&self) -> &'t str {
        self.text
    }

    pub(crate) fn byte_at(&self, position: usize) -> usize {
        self.byte_pos[position]
    }
}

/// The value threaded through a single match attempt: the current position
/// and the capture slots. Cursors are cheap immutable values; advancing
/// produces a new cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub position: usize,
    /// `2 * group_count` slots; entry `2i` holds where group `i` opened,
    /// `2i + 1` where it closed, [`UNSET`] until written.
    pub groups: Vec<usize>,
}

impl Cursor {
    #[must_use]
    pub fn start(position: usize, group_count: usize) -> Self {
        Self {
            position,
            groups: vec![UNSET; 2 * group_count],
        }
    }
}

/// A single non-overlapping match.
///
/// `start`/`end` are char offsets into the haystack; the byte variants are
/// kept alongside so group accessors can hand out `&str` slices.
#[derive(Clone, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
    byte_start: usize,
    byte_end: usize,
    /// Capture slots converted to byte offsets, [`UNSET`] when never set.
    groups: Vec<usize>,
}

impl<'t> Match<'t> {
    pub(crate) fn new(ctx: &Context<'t>, start: usize, cursor: &Cursor) -> Self {
        let groups = cursor
            .groups
            .iter()
            .map(|&slot| if slot == UNSET { UNSET } else { ctx.byte_at(slot) })
            .collect();
        Self {
            text: ctx.text(),
            start,
            end: cursor.position,
            byte_start: ctx.byte_at(start),
            byte_end: ctx.byte_at(cursor.position),
            groups,
        }
    }

    /// `(start, end)` in char offsets.
    #[must_use]
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// `(start, end)` in byte offsets, suitable for slicing the haystack.
    #[must_use]
    pub fn byte_span(&self) -> (usize, usize) {
        (self.byte_start, self.byte_end)
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The full matched text, `group(0)`.
    #[must_use]
    pub fn as_str(&self) -> &'t str {
        &self.text[self.byte_start..self.byte_end]
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len() / 2
    }

    /// Group `0` is the whole match; group `k > 0` is the `k`-th capture,
    /// `None` while either of its slots is still unset.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&'t str> {
        if index == 0 {
            return Some(self.as_str());
        }
        let from = *self.groups.get(2 * (index - 1))?;
        let to = *self.groups.get(2 * (index - 1) + 1)?;
        if from == UNSET || to == UNSET {
            return None;
        }
        Some(&self.text[from..to])
    }

    /// All captures, in group order.
    #[must_use]
    pub fn groups(&self) -> Vec<Option<&'t str>> {
        (1..=self.group_count()).map(|i| self.group(i)).collect()
    }
}

impl std::fmt::Debug for Match<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Match(span=({}, {}), text={:?})",
            self.start,
            self.end,
            self.as_str()
        )
    }
}

/// A compiled pattern. Implementors provide `match_suffix`; everything else
/// is built on top of it.
pub trait Pattern {
    /// Match this pattern against the suffix starting at `cursor.position`,
    /// returning the final cursor (end position plus capture slots), or
    /// `None` if the suffix does not match.
    fn match_suffix(&self, cursor: Cursor, ctx: &Context<'_>) -> Option<Cursor>;

    /// Number of capturing groups in the pattern.
    fn group_count(&self) -> usize;

    fn flags(&self) -> Flags;

    /// Iterate over non-overlapping matches, left to right. Zero-width
    /// matches make progress by skipping one char forward.
    fn finditer<'p, 't>(&'p self, text: &'t str) -> FindIter<'p, 't, Self>
    where
        Self: Sized,
    {
        FindIter {
            pattern: self,
            ctx: Context::new(text, self.flags()),
            at: 0,
        }
    }

    /// First match anywhere in `text`.
    fn find<'t>(&self, text: &'t str) -> Option<Match<'t>>
    where
        Self: Sized,
    {
        self.finditer(text).next()
    }

    /// Match anchored at the very start of `text`.
    fn match_start<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        let ctx = Context::new(text, self.flags());
        let cursor = Cursor::start(0, self.group_count());
        self.match_suffix(cursor, &ctx)
            .map(|result| Match::new(&ctx, 0, &result))
    }

    /// All matched texts, `group(0)` of each hit.
    fn findall<'t>(&self, text: &'t str) -> Vec<&'t str>
    where
        Self: Sized,
    {
        self.finditer(text).map(|m| m.as_str()).collect()
    }

    /// Replace up to `count` matches, returning the new string and the
    /// number of replacements made. Pass `usize::MAX` for "all".
    fn subn(&self, text: &str, mut replacer: impl Replacer, count: usize) -> (String, usize)
    where
        Self: Sized,
    {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut substitutions = 0;
        for m in self.finditer(text) {
            if substitutions == count {
                break;
            }
            let (from, to) = m.byte_span();
            out.push_str(&text[last..from]);
            replacer.replace_append(&m, &mut out);
            last = to;
            substitutions += 1;
        }
        out.push_str(&text[last..]);
        (out, substitutions)
    }

    /// Like [`Pattern::subn`] but only returns the new string.
    fn sub(&self, text: &str, replacer: impl Replacer, count: usize) -> String
    where
        Self: Sized,
    {
        self.subn(text, replacer, count).0
    }
}

/// Lazy iterator over the non-overlapping matches of one haystack.
#[derive(Debug)]
pub struct FindIter<'p, 't, P> {
    pattern: &'p P,
    ctx: Context<'t>,
    at: usize,
}

impl<'t, P: Pattern> Iterator for FindIter<'_, 't, P> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.at <= self.ctx.len() {
            let cursor = Cursor::start(self.at, self.pattern.group_count());
            if let Some(result) = self.pattern.match_suffix(cursor, &self.ctx) {
                let m = Match::new(&self.ctx, self.at, &result);
                // Force progress on zero-width matches.
                self.at = if result.position == self.at {
                    result.position + 1
                } else {
                    result.position
                };
                return Some(m);
            }
            self.at += 1;
        }
        None
    }
}

/// What to substitute for each match in [`Pattern::sub`]. A plain string is
/// inserted literally; a closure is handed the match.
pub trait Replacer {
    fn replace_append(&mut self, m: &Match<'_>, dst: &mut String);
}

impl Replacer for &str {
    fn replace_append(&mut self, _: &Match<'_>, dst: &mut String) {
        dst.push_str(self);
    }
}

impl Replacer for String {
    fn replace_append(&mut self, _: &Match<'_>, dst: &mut String) {
        dst.push_str(self);
    }
}

impl<F: FnMut(&Match<'_>) -> String> Replacer for F {
    fn replace_append(&mut self, m: &Match<'_>, dst: &mut String) {
        let replacement = self(m);
        dst.push_str(&replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    #[test]
    fn match_accessors() {
        let re = Regex::new("(a)(x)?(b)").unwrap();
        let m = re.find("zab").unwrap();
        assert_eq!(m.span(), (1, 3));
        assert_eq!(m.byte_span(), (1, 3));
        assert_eq!(m.as_str(), "ab");
        assert_eq!(m.group(0), Some("ab"));
        assert_eq!(m.group(1), Some("a"));
        assert_eq!(m.group(2), None);
        assert_eq!(m.group(3), Some("b"));
        assert_eq!(m.group(4), None);
        assert_eq!(m.groups(), vec![Some("a"), None, Some("b")]);
        assert_eq!(format!("{m:?}"), r#"Match(span=(1, 3), text="ab")"#);
    }

    #[test]
    fn spans_are_char_offsets() {
        let re = Regex::new("b+").unwrap();
        let m = re.find("åäbb").unwrap();
        assert_eq!(m.span(), (2, 4));
        assert_eq!(m.byte_span(), (4, 6));
        assert_eq!(m.as_str(), "bb");
    }

    #[test]
    fn finditer_does_not_overlap() {
        let re = Regex::new("aa").unwrap();
        let spans: Vec<_> = re.finditer("aaaaa").map(|m| m.span()).collect();
        assert_eq!(spans, vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn zero_width_matches_make_progress() {
        let re = Regex::new("a*").unwrap();
        let spans: Vec<_> = re.finditer("bbb").map(|m| m.span()).collect();
        assert_eq!(spans, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);

        // Mixed empty and non-empty matches.
        let re = Regex::new("a*").unwrap();
        let spans: Vec<_> = re.finditer("baab").map(|m| m.span()).collect();
        assert_eq!(spans, vec![(0, 0), (1, 3), (3, 3), (4, 4)]);
    }

    #[test]
    fn round_trip_covers_the_text() {
        let re = Regex::new(r"\w+").unwrap();
        let text = "one two  three";
        let mut covered = String::new();
        let mut uncovered = String::new();
        let mut last = 0;
        for m in re.finditer(text) {
            let (from, to) = m.byte_span();
            uncovered.push_str(&text[last..from]);
            covered.push_str(m.as_str());
            last = to;
        }
        uncovered.push_str(&text[last..]);
        assert_eq!(covered, "onetwothree");
        assert_eq!(uncovered, "   ");
    }

    #[test]
    fn findall_returns_full_matches() {
        let re = Regex::new(r"\d+").unwrap();
        assert_eq!(re.findall("a1b22c333"), vec!["1", "22", "333"]);
        assert!(re.findall("abc").is_empty());
    }

    #[test]
    fn sub_and_subn() {
        let re = Regex::new("a+").unwrap();
        assert_eq!(re.sub("aa b aaa", "-", usize::MAX), "- b -");
        assert_eq!(re.subn("aa b aaa", "-", usize::MAX), ("- b -".to_string(), 2));
        assert_eq!(re.subn("aa b aaa", "-", 1), ("- b aaa".to_string(), 1));
        assert_eq!(re.subn("bbb", "-", usize::MAX), ("bbb".to_string(), 0));

        // The substitution count is bounded by both the limit and the
        // number of matches.
        let re = Regex::new("x").unwrap();
        assert_eq!(re.subn("xxx", "y", 7).1, 3);
    }

    #[test]
    fn sub_with_a_closure() {
        let re = Regex::new(r"\d+").unwrap();
        let doubled = re.sub(
            "1 and 2",
            |m: &Match<'_>| {
                let n: u32 = m.as_str().parse().unwrap();
                (n * 2).to_string()
            },
            usize::MAX,
        );
        assert_eq!(doubled, "2 and 4");
    }

    #[test]
    fn match_start_is_anchored() {
        let re = Regex::new("ab").unwrap();
        assert_eq!(re.match_start("abab").unwrap().span(), (0, 2));
        assert!(re.match_start("zab").is_none());
    }
}
