//! Subset construction: the NFA collapsed to sets of states, usable as a
//! faster matching strategy whenever the pattern has no capturing groups.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::flags::Flags;
use crate::matching::{Context, Cursor, Pattern};
use crate::nfa::{Nfa, State, Transition};
use crate::table;

/// A determinized automaton. Each state is the ε-closure of a set of NFA
/// states; per state there is at most one transition per symbol. Zero-width
/// symbols (anchors) survive determinization and are walked without
/// consuming input.
#[derive(Debug)]
pub struct Dfa {
    transitions: Vec<Vec<Transition>>,
    start: State,
    accepts: Vec<bool>,
    lazy: Vec<bool>,
    flags: Flags,
}

impl std::ops::Index<State> for Dfa {
    type Output = [Transition];

    fn index(&self, index: State) -> &Self::Output {
        &self.transitions[index.0]
    }
}

impl Dfa {
    pub(crate) fn determinize(nfa: &Nfa, flags: Flags) -> Self {
        let symbols = nfa.symbols();

        let start_set = nfa.epsilon_closure(&BTreeSet::from([nfa.start().0]));
        let mut index: HashMap<BTreeSet<usize>, usize> = HashMap::new();
        index.insert(start_set.clone(), 0);
        let mut sets = vec![start_set];
        let mut transitions: Vec<Vec<Transition>> = vec![Vec::new()];
        let mut worklist = vec![0usize];

        while let Some(id) = worklist.pop() {
            for symbol in &symbols {
                let moved = nfa.move_on(&sets[id], symbol);
                if moved.is_empty() {
                    continue;
                }
                let target = nfa.epsilon_closure(&moved);
                let end = match index.get(&target) {
                    Some(&end) => end,
                    None => {
                        let end = sets.len();
                        index.insert(target.clone(), end);
                        sets.push(target);
                        transitions.push(Vec::new());
                        worklist.push(end);
                        end
                    }
                };
                transitions[id].push(Transition {
                    matcher: symbol.clone(),
                    end: State(end),
                });
            }
        }

        let accepts = sets
            .iter()
            .map(|set| set.contains(&nfa.accept().0))
            .collect();
        let lazy = sets
            .iter()
            .map(|set| set.iter().any(|&id| nfa.is_lazy(State(id))))
            .collect();

        debug!(
            "subset construction: {} nfa states -> {} dfa states",
            nfa.state_count(),
            sets.len()
        );

        Self {
            transitions,
            start: State(0),
            accepts,
            lazy,
            flags,
        }
    }

    pub(crate) fn from_parts(
        transitions: Vec<Vec<Transition>>,
        start: State,
        accepts: Vec<bool>,
        lazy: Vec<bool>,
        flags: Flags,
    ) -> Self {
        Self {
            transitions,
            start,
            accepts,
            lazy,
            flags,
        }
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    #[must_use]
    pub fn start(&self) -> State {
        self.start
    }

    #[must_use]
    pub fn is_accepting(&self, state: State) -> bool {
        self.accepts[state.0]
    }

    #[must_use]
    pub fn is_lazy(&self, state: State) -> bool {
        self.lazy[state.0]
    }

    /// Depth-first walk keeping the accepting cursor with the maximum
    /// position; a lazy accepting state instead returns immediately with
    /// the first (shortest) one. `zw_path` breaks cycles of zero-width
    /// symbols.
    fn walk(
        &self,
        state: State,
        cursor: Cursor,
        ctx: &Context<'_>,
        zw_path: &[usize],
    ) -> Option<Cursor> {
        let mut best: Option<Cursor> = None;
        if self.accepts[state.0] {
            if self.lazy[state.0] {
                return Some(cursor);
            }
            best = Some(cursor.clone());
        }

        for t in &self.transitions[state.0] {
            if !t.matcher.matches(&cursor, ctx) {
                continue;
            }
            let result = if t.matcher.is_zero_width() {
                if zw_path.contains(&t.end.0) {
                    continue;
                }
                let mut path = zw_path.to_vec();
                path.push(t.end.0);
                self.walk(t.end, t.matcher.advance(&cursor), ctx, &path)
            } else {
                self.walk(t.end, t.matcher.advance(&cursor), ctx, &[])
            };
            if let Some(candidate) = result {
                best = Some(match best {
                    Some(best) if best.position >= candidate.position => best,
                    _ => candidate,
                });
            }
        }

        best
    }
}

impl Pattern for Dfa {
    fn match_suffix(&self, cursor: Cursor, ctx: &Context<'_>) -> Option<Cursor> {
        self.walk(self.start, cursor, ctx, &[])
    }

    fn group_count(&self) -> usize {
        0
    }

    fn flags(&self) -> Flags {
        self.flags
    }
}

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows = Vec::new();
        for (id, transitions) in self.transitions.iter().enumerate() {
            let mut marks = Vec::new();
            if State(id) == self.start {
                marks.push("start");
            }
            if self.accepts[id] {
                marks.push("accept");
            }
            if self.lazy[id] {
                marks.push("lazy");
            }
            if transitions.is_empty() {
                rows.push(vec![
                    id.to_string(),
                    marks.join(" "),
                    String::new(),
                    String::new(),
                ]);
            }
            for t in transitions {
                rows.push(vec![
                    id.to_string(),
                    marks.join(" "),
                    t.matcher.to_string(),
                    t.end.to_string(),
                ]);
            }
        }
        table::render(f, &["State", "Marks", "Symbol", "To"], &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    fn spans<P: Pattern>(pattern: &P, text: &str) -> Vec<(usize, usize)> {
        pattern.finditer(text).map(|m| m.span()).collect()
    }

    const PATTERNS: &[&str] = &[
        "a",
        "a*b",
        "a?b?",
        "[ab]{1,3}",
        "(?:ab)+",
        "ab|ba",
        "a+$",
        "^b*",
    ];

    #[test]
    fn one_transition_per_state_and_symbol() {
        for pattern in PATTERNS {
            let dfa = Regex::new(pattern).unwrap().to_dfa().unwrap();
            for id in 0..dfa.state_count() {
                let row = &dfa[State(id)];
                for (i, t) in row.iter().enumerate() {
                    assert!(
                        row[i + 1..].iter().all(|u| u.matcher != t.matcher),
                        "{pattern}: duplicate symbol out of state {id}"
                    );
                }
            }
        }
    }

    #[test]
    fn agrees_with_the_nfa_strategy() {
        let texts = ["", "a", "b", "ab", "ba", "aabb", "abab", "bbbaaa", "aababba"];
        for pattern in PATTERNS {
            let regex = Regex::new(pattern).unwrap();
            let dfa = regex.to_dfa().unwrap();
            for text in texts {
                assert_eq!(
                    spans(&regex, text),
                    spans(&dfa, text),
                    "pattern {pattern} on {text:?}"
                );
            }
        }
    }

    #[test]
    fn lazy_flag_survives_determinization() {
        let dfa = Regex::new("a+?").unwrap().to_dfa().unwrap();
        assert_eq!(spans(&dfa, "aaa"), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn anchors_survive_determinization() {
        let dfa = Regex::new("a+$").unwrap().to_dfa().unwrap();
        assert_eq!(spans(&dfa, "aa a"), vec![(3, 4)]);
        assert!(spans(&dfa, "aab").is_empty());
    }

    quickcheck::quickcheck! {
        fn prop_dfa_equals_nfa(xs: Vec<bool>) -> bool {
            let text: String = xs.iter().map(|&b| if b { 'a' } else { 'b' }).collect();
            PATTERNS.iter().all(|pattern| {
                let regex = Regex::new(pattern).unwrap();
                let dfa = regex.to_dfa().unwrap();
                spans(&regex, &text) == spans(&dfa, &text)
            })
        }
    }
}
