//! The compiled pattern type tying the pipeline together: parse, lower to
//! an NFA, then match through one of the strategies.

use log::debug;

use crate::dfa::Dfa;
use crate::error::ParseError;
use crate::flags::Flags;
use crate::matching::{Context, Cursor, Pattern};
use crate::nfa::Nfa;
use crate::parse;

/// A compiled regular expression.
///
/// The matching strategy is fixed at compile time: patterns with capturing
/// groups run the breadth-first simulation, everything else backtracks.
/// [`Regex::to_dfa`] offers the determinized fast path for patterns
/// without captures.
#[derive(Debug)]
pub struct Regex {
    pattern: String,
    flags: Flags,
    group_count: usize,
    step_limit: Option<usize>,
    nfa: Nfa,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, ParseError> {
        Self::with_flags(pattern, Flags::empty())
    }

    pub fn with_flags(pattern: &str, flags: Flags) -> Result<Self, ParseError> {
        let parsed = parse::parse(pattern, flags)?;
        let nfa = Nfa::compile(&parsed);
        debug!(
            "compiled {pattern:?}: {} states, {} groups",
            nfa.state_count(),
            parsed.group_count
        );
        Ok(Self {
            pattern: pattern.to_owned(),
            flags: parsed.flags,
            group_count: parsed.group_count,
            step_limit: None,
            nfa,
        })
    }

    /// Bound the work a single match attempt may do. Exceeding the limit
    /// makes the attempt report "no match" rather than an error.
    #[must_use]
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// Determinize through subset construction. `None` when the pattern has
    /// capturing groups: a DFA state cannot carry per-path capture slots.
    #[must_use]
    pub fn to_dfa(&self) -> Option<Dfa> {
        (self.group_count == 0).then(|| Dfa::determinize(&self.nfa, self.flags))
    }
}

impl Pattern for Regex {
    fn match_suffix(&self, cursor: Cursor, ctx: &Context<'_>) -> Option<Cursor> {
        if self.group_count > 0 {
            self.nfa.match_suffix_bfs(cursor, ctx, self.step_limit)
        } else {
            self.nfa.match_suffix_backtrack(cursor, ctx, self.step_limit)
        }
    }

    fn group_count(&self) -> usize {
        self.group_count
    }

    fn flags(&self) -> Flags {
        self.flags
    }
}

impl std::str::FromStr for Regex {
    type Err = ParseError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Self::new(pattern)
    }
}

impl std::fmt::Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pattern.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Match;

    fn spans(pattern: &str, text: &str) -> Vec<(usize, usize)> {
        Regex::new(pattern)
            .unwrap()
            .finditer(text)
            .map(|m| m.span())
            .collect()
    }

    fn first<'t>(pattern: &str, text: &'t str) -> Option<(usize, usize)> {
        Regex::new(pattern).unwrap().find(text).map(|m| m.span())
    }

    #[test]
    fn literals_and_dot() {
        assert_eq!(spans("abc", "xabcabc"), vec![(1, 4), (4, 7)]);
        assert_eq!(spans("a.c", "abc adc a\nc"), vec![(0, 3), (4, 7)]);
        assert!(spans("abc", "ab").is_empty());
    }

    #[test]
    fn counted_repetition_takes_the_longest() {
        // One match over the whole text, with the last iteration captured.
        let regex = Regex::new("(ab){3,8}").unwrap();
        let matches: Vec<Match<'_>> = regex.finditer("abababababab").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span(), (0, 12));
        assert_eq!(matches[0].group(1), Some("ab"));

        // Below the minimum there is no match at all.
        assert!(spans("(ab){3,8}", "abab").is_empty());
        // Above the maximum the tail is left for the next match.
        assert_eq!(spans("(?:ab){1,2}", "ababab"), vec![(0, 4), (4, 6)]);
    }

    #[test]
    fn plus_with_groups() {
        let regex = Regex::new("(ab)+").unwrap();
        let matches: Vec<Match<'_>> = regex.finditer("abab").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span(), (0, 4));
        assert_eq!(matches[0].groups(), vec![Some("ab")]);
    }

    #[test]
    fn empty_group_still_participates() {
        let regex = Regex::new("s()?e").unwrap();
        let m = regex.find("anthemse").unwrap();
        assert_eq!(m.span(), (6, 8));
        assert_eq!(m.group(1), Some(""));

        // Matching is leftmost: an earlier hit wins.
        let m = regex.find("searchme").unwrap();
        assert_eq!(m.span(), (0, 2));
        assert_eq!(m.group(1), Some(""));
    }

    #[test]
    fn impossible_class_never_matches() {
        assert!(spans(r"[^\s\S]", "aaaaaaa").is_empty());
    }

    #[test]
    fn lazy_must_still_reach_the_suffix() {
        assert_eq!(first("a+?b", "aaab"), Some((0, 4)));
    }

    #[test]
    fn greedy_and_lazy_extents() {
        // Greedy takes the maximum end, lazy the minimum.
        assert_eq!(spans("a*", "aaa"), vec![(0, 3), (3, 3)]);
        assert_eq!(spans("a*?", "aaa"), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(spans("a+", "aaa"), vec![(0, 3)]);
        assert_eq!(spans("a+?", "aaa"), vec![(0, 1), (1, 2), (2, 3)]);

        assert_eq!(first("<.+>", "<a><b>"), Some((0, 6)));
        assert_eq!(spans("<.+?>", "<a><b>"), vec![(0, 3), (3, 6)]);

        assert_eq!(first("a??", "a"), Some((0, 0)));
        assert_eq!(first("a{1,3}?", "aaa"), Some((0, 1)));
    }

    #[test]
    fn alternation_prefers_the_left_branch() {
        assert_eq!(first("a|ab", "ab"), Some((0, 1)));
        assert_eq!(first("ab|a", "ab"), Some((0, 2)));
        let regex = Regex::new("(a)|(b)").unwrap();
        let m = regex.find("b").unwrap();
        assert_eq!(m.groups(), vec![None, Some("b")]);
    }

    #[test]
    fn nested_groups() {
        let regex = Regex::new("((a)(b))+").unwrap();
        let m = regex.find("abab").unwrap();
        assert_eq!(m.span(), (0, 4));
        assert_eq!(m.groups(), vec![Some("ab"), Some("a"), Some("b")]);
    }

    #[test]
    fn optional_prefix_chain() {
        let regex = Regex::new("a?a?a*b").unwrap();
        for (text, end) in [("b", 1), ("ab", 2), ("aab", 3), ("aaaab", 5)] {
            assert_eq!(regex.match_start(text).unwrap().span(), (0, end), "{text}");
        }
        assert!(regex.match_start("caab").is_none());
        assert_eq!(regex.match_start("baab").unwrap().span(), (0, 1));
    }

    #[test]
    fn line_anchors() {
        assert_eq!(spans("^a", "aba"), vec![(0, 1)]);
        assert!(spans("^a", "ba").is_empty());
        assert_eq!(spans("a$", "aba"), vec![(2, 3)]);
        assert!(spans("a$", "ab").is_empty());
        assert_eq!(spans("^$", ""), vec![(0, 0)]);

        let multiline = Regex::with_flags("^.", Flags::MULTILINE).unwrap();
        let starts: Vec<_> = multiline.finditer("ab\ncd").map(|m| m.span()).collect();
        assert_eq!(starts, vec![(0, 1), (3, 4)]);

        let ends = Regex::with_flags(r"\w$", Flags::MULTILINE).unwrap();
        let spans: Vec<_> = ends.finditer("ab\ncd").map(|m| m.span()).collect();
        assert_eq!(spans, vec![(1, 2), (4, 5)]);
    }

    #[test]
    fn string_anchors() {
        let regex = Regex::with_flags(r"\Aa", Flags::MULTILINE).unwrap();
        assert_eq!(regex.findall("a\na"), vec!["a"]);
        let regex = Regex::with_flags(r"a\Z", Flags::MULTILINE).unwrap();
        assert_eq!(regex.finditer("a\na").map(|m| m.span()).next(), Some((2, 3)));
    }

    #[test]
    fn word_boundaries() {
        assert_eq!(spans(r"\bcat\b", "cat catalog concat cat"), vec![(0, 3), (19, 22)]);
        assert_eq!(spans(r"\Bcat\b", "concat catalog cat"), vec![(3, 6)]);
    }

    #[test]
    fn flags_change_matching() {
        let regex = Regex::with_flags("abc", Flags::IGNORECASE).unwrap();
        assert_eq!(regex.findall("aBc ABC abc"), vec!["aBc", "ABC", "abc"]);

        let regex = Regex::with_flags("[a-z]+", Flags::IGNORECASE).unwrap();
        assert_eq!(regex.findall("Mixed CASE"), vec!["Mixed", "CASE"]);

        assert!(first("a.b", "a\nb").is_none());
        let regex = Regex::with_flags("a.b", Flags::DOTALL).unwrap();
        assert!(regex.find("a\nb").is_some());
    }

    #[test]
    fn inline_flags_prefix() {
        let regex = Regex::new("(?i)abc").unwrap();
        assert!(regex.flags().contains(Flags::IGNORECASE));
        assert_eq!(regex.findall("ABC"), vec!["ABC"]);
    }

    #[test]
    fn predefined_classes() {
        assert_eq!(spans(r"\d+", "a12b345"), vec![(1, 3), (4, 7)]);
        assert_eq!(spans(r"\w+", "héllo x"), vec![(0, 1), (2, 5), (6, 7)]);
        assert_eq!(spans(r"\S+", "a  b"), vec![(0, 1), (3, 4)]);
    }

    #[test]
    fn escapes_match_literally() {
        assert_eq!(spans(r"\.", "a.b"), vec![(1, 2)]);
        assert_eq!(spans(r"\\", r"a\b"), vec![(1, 2)]);
        assert_eq!(spans("\\t", "a\tb"), vec![(1, 2)]);
    }

    #[test]
    fn step_limit_degrades_to_no_match() {
        let regex = Regex::new("a+").unwrap().with_step_limit(2);
        assert!(regex.find("aaaaaaaa").is_none());

        let regex = Regex::new("a+").unwrap();
        assert!(regex.find("aaaaaaaa").is_some());

        // The simulation strategy honors the limit as well.
        let regex = Regex::new("(a+)b").unwrap().with_step_limit(2);
        assert!(regex.find("aaab").is_none());
    }

    #[test]
    fn to_dfa_requires_no_captures() {
        assert!(Regex::new("ab+").unwrap().to_dfa().is_some());
        assert!(Regex::new("(?:ab)+").unwrap().to_dfa().is_some());
        assert!(Regex::new("(ab)+").unwrap().to_dfa().is_none());
    }

    #[test]
    fn from_str_round_trip() {
        let regex: Regex = "a|b".parse().unwrap();
        assert_eq!(regex.as_str(), "a|b");
        assert_eq!(regex.to_string(), "a|b");
        assert!("a|(b".parse::<Regex>().is_err());
    }
}
