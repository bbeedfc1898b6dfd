//! Thompson construction and the two NFA matching strategies.
//!
//! Every AST node lowers to a fragment with exactly one start and one
//! accept state. The order of a state's outgoing transitions is the
//! priority the matcher uses to resolve greedy against lazy; lazy
//! quantifiers emit their ε-choices in the reverse order and mark their
//! states so the flag survives subset construction.
//!
//! Resources: <https://swtch.com/~rsc/regexp/regexp1.html>

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::matching::{Context, Cursor};
use crate::parse::{Ast, Parsed};
use crate::table;

use super::{Matcher, State};

/// An ordered outgoing edge: label plus target state.
#[derive(Debug, Clone)]
pub struct Transition {
    pub matcher: Matcher,
    pub end: State,
}

/// `(state, index into its transition list)` — identifies one transition
/// without borrowing it. The per-position visited sets of the BFS strategy
/// are keyed by this.
type TransitionRef = (usize, usize);

#[derive(Debug)]
pub struct Nfa {
    /// Adjacency list indexed by state id; one row per state.
    transitions: Vec<Vec<Transition>>,
    lazy: Vec<bool>,
    start: State,
    accept: State,
}

impl std::ops::Index<State> for Nfa {
    type Output = [Transition];

    fn index(&self, index: State) -> &Self::Output {
        &self.transitions[index.0]
    }
}

impl Nfa {
    #[must_use]
    pub fn compile(parsed: &Parsed) -> Self {
        let mut builder = Builder {
            transitions: Vec::new(),
            lazy: Vec::new(),
        };
        let frag = builder.fragment(&parsed.ast);
        Self {
            transitions: builder.transitions,
            lazy: builder.lazy,
            start: frag.start,
            accept: frag.accept,
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
    pub fn accept(&self) -> State {
        self.accept
    }

    #[must_use]
    pub fn is_lazy(&self, state: State) -> bool {
        self.lazy[state.0]
    }
}

#[derive(Debug, Clone, Copy)]
struct Frag {
    start: State,
    accept: State,
}

struct Builder {
    transitions: Vec<Vec<Transition>>,
    lazy: Vec<bool>,
}

impl Builder {
    fn state(&mut self) -> State {
        self.transitions.push(Vec::new());
        self.lazy.push(false);
        State(self.transitions.len() - 1)
    }

    fn edge(&mut self, from: State, matcher: Matcher, to: State) {
        self.transitions[from.0].push(Transition { matcher, end: to });
    }

    /// Two-way ε-choice. Greedy explores `take` first, lazy `skip` first.
    fn choice(&mut self, from: State, take: State, skip: State, lazy: bool) {
        if lazy {
            self.edge(from, Matcher::Epsilon, skip);
            self.edge(from, Matcher::Epsilon, take);
        } else {
            self.edge(from, Matcher::Epsilon, take);
            self.edge(from, Matcher::Epsilon, skip);
        }
    }

    fn leaf(&mut self, matcher: Matcher) -> Frag {
        let start = self.state();
        let accept = self.state();
        self.edge(start, matcher, accept);
        Frag { start, accept }
    }

    fn fragment(&mut self, ast: &Ast) -> Frag {
        match ast {
            Ast::Empty => self.leaf(Matcher::Epsilon),
            Ast::Literal(c) => self.leaf(Matcher::Literal(*c)),
            Ast::AnyChar => self.leaf(Matcher::Any),
            Ast::Class(set) => self.leaf(Matcher::Class(set.clone())),
            Ast::Anchor(anchor) => self.leaf(Matcher::Anchor(*anchor)),
            Ast::Concat(parts) => {
                let first = self.fragment(&parts[0]);
                let mut accept = first.accept;
                for part in &parts[1..] {
                    let next = self.fragment(part);
                    self.edge(accept, Matcher::Epsilon, next.start);
                    accept = next.accept;
                }
                Frag {
                    start: first.start,
                    accept,
                }
            }
            Ast::Alternation(branches) => {
                let start = self.state();
                let accept = self.state();
                for branch in branches {
                    let frag = self.fragment(branch);
                    self.edge(start, Matcher::Epsilon, frag.start);
                    self.edge(frag.accept, Matcher::Epsilon, accept);
                }
                Frag { start, accept }
            }
            Ast::Group { index, inner } => {
                let frag = self.fragment(inner);
                match index {
                    Some(i) => {
                        let start = self.state();
                        let accept = self.state();
                        self.edge(start, Matcher::GroupEntry(*i), frag.start);
                        self.edge(frag.accept, Matcher::GroupExit(*i), accept);
                        Frag { start, accept }
                    }
                    None => frag,
                }
            }
            Ast::Repeat {
                inner,
                min,
                max,
                lazy,
            } => {
                let first_new = self.transitions.len();
                let frag = self.repeat(inner, *min, *max, *lazy);
                if *lazy {
                    for id in first_new..self.transitions.len() {
                        self.lazy[id] = true;
                    }
                }
                frag
            }
        }
    }

    fn repeat(&mut self, inner: &Ast, min: u32, max: Option<u32>, lazy: bool) -> Frag {
        match max {
            // Unbounded: unroll `min` copies, the last loops on itself.
            None => {
                if min == 0 {
                    let start = self.state();
                    let accept = self.state();
                    let body = self.fragment(inner);
                    self.choice(start, body.start, accept, lazy);
                    self.edge(body.accept, Matcher::Epsilon, start);
                    Frag { start, accept }
                } else {
                    let accept = self.state();
                    let first = self.fragment(inner);
                    let mut last = first;
                    for _ in 1..min {
                        let next = self.fragment(inner);
                        self.edge(last.accept, Matcher::Epsilon, next.start);
                        last = next;
                    }
                    self.choice(last.accept, last.start, accept, lazy);
                    Frag {
                        start: first.start,
                        accept,
                    }
                }
            }
            // Bounded: `min` mandatory copies, then `max - min` optional
            // ones, each able to skip to the next.
            Some(max) => {
                if max == 0 {
                    return self.leaf(Matcher::Epsilon);
                }

                let mut start = None;
                let mut prev_accept = None;
                for _ in 0..min {
                    let frag = self.fragment(inner);
                    match prev_accept {
                        Some(accept) => self.edge(accept, Matcher::Epsilon, frag.start),
                        None => start = Some(frag.start),
                    }
                    prev_accept = Some(frag.accept);
                }

                // The optional suffix is wired back to front.
                let accept = self.state();
                let mut next = accept;
                for _ in 0..(max - min) {
                    let frag = self.fragment(inner);
                    let entry = self.state();
                    self.choice(entry, frag.start, next, lazy);
                    self.edge(frag.accept, Matcher::Epsilon, next);
                    next = entry;
                }

                match (start, prev_accept) {
                    (Some(start), Some(prev_accept)) => {
                        self.edge(prev_accept, Matcher::Epsilon, next);
                        Frag { start, accept }
                    }
                    _ => Frag {
                        start: next,
                        accept,
                    },
                }
            }
        }
    }
}

// Subset-construction support.
impl Nfa {
    /// All distinct non-ε labels, in first-seen order.
    pub(crate) fn symbols(&self) -> Vec<Matcher> {
        let mut symbols: Vec<Matcher> = Vec::new();
        for row in &self.transitions {
            for t in row {
                if !matches!(t.matcher, Matcher::Epsilon) && !symbols.contains(&t.matcher) {
                    symbols.push(t.matcher.clone());
                }
            }
        }
        symbols
    }

    /// Smallest superset of `states` closed under ε-transitions.
    pub(crate) fn epsilon_closure(&self, states: &BTreeSet<usize>) -> BTreeSet<usize> {
        let mut stack: Vec<usize> = states.iter().copied().collect();
        let mut closure = BTreeSet::new();
        while let Some(state) = stack.pop() {
            if !closure.insert(state) {
                continue;
            }
            for t in &self.transitions[state] {
                if matches!(t.matcher, Matcher::Epsilon) {
                    stack.push(t.end.0);
                }
            }
        }
        closure
    }

    /// Targets of all `symbol` transitions out of `states`.
    pub(crate) fn move_on(&self, states: &BTreeSet<usize>, symbol: &Matcher) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        for &state in states {
            for t in &self.transitions[state] {
                if &t.matcher == symbol {
                    out.insert(t.end.0);
                }
            }
        }
        out
    }
}

// The matching strategies.
impl Nfa {
    /// Collect the transitions reachable from `state` through interior
    /// ε-edges, in source priority order, keeping only those that currently
    /// apply (consuming matchers that match, anchors that hold, ε directly
    /// into the accept state).
    fn step<'n>(
        &'n self,
        state: State,
        cursor: &Cursor,
        ctx: &Context<'_>,
    ) -> Vec<&'n Transition> {
        let mut explored = HashSet::new();
        let mut out = Vec::new();
        self.step_into(state, cursor, ctx, &mut explored, &mut out);
        out
    }

    fn step_into<'n>(
        &'n self,
        state: State,
        cursor: &Cursor,
        ctx: &Context<'_>,
        explored: &mut HashSet<usize>,
        out: &mut Vec<&'n Transition>,
    ) {
        if !explored.insert(state.0) {
            return;
        }
        for t in &self.transitions[state.0] {
            if matches!(t.matcher, Matcher::Epsilon) && t.end != self.accept {
                self.step_into(t.end, cursor, ctx, explored, out);
            } else if t.matcher.matches(cursor, ctx) {
                out.push(t);
            }
        }
    }

    /// Depth-first backtracking. Transitions are pushed in reverse so the
    /// highest-priority alternative is popped first; `anchor_path` records
    /// states reached through zero-width edges since the last consumed char
    /// and breaks ε-cycles.
    pub(crate) fn match_suffix_backtrack(
        &self,
        cursor: Cursor,
        ctx: &Context<'_>,
        step_limit: Option<usize>,
    ) -> Option<Cursor> {
        let mut stack: Vec<(State, Cursor, Vec<usize>)> = vec![(self.start, cursor, Vec::new())];
        let mut steps = 0usize;

        while let Some((state, cursor, anchor_path)) = stack.pop() {
            steps += 1;
            if step_limit.is_some_and(|limit| steps > limit) {
                return None;
            }
            if state == self.accept {
                return Some(cursor);
            }

            let transitions = self.step(state, &cursor, ctx);
            for t in transitions.into_iter().rev() {
                if t.matcher.is_zero_width() {
                    if anchor_path.contains(&t.end.0) {
                        continue;
                    }
                    let mut path = anchor_path.clone();
                    path.push(t.end.0);
                    stack.push((t.end, t.matcher.advance(&cursor), path));
                } else {
                    stack.push((t.end, t.matcher.advance(&cursor), Vec::new()));
                }
            }
        }

        None
    }

    /// Expand one configuration: cross zero-width transitions (updating the
    /// cursor's capture slots as group markers are crossed) until a
    /// consuming transition, or a zero-width edge into the accept state, is
    /// reached. `explored` dedups by transition, which keeps one input
    /// position's work linear in the automaton size.
    fn expand(
        &self,
        from: State,
        cursor: Cursor,
        ctx: &Context<'_>,
        explored: &mut HashSet<TransitionRef>,
        out: &mut Vec<(TransitionRef, Cursor)>,
    ) {
        for (idx, t) in self.transitions[from.0].iter().enumerate() {
            let key = (from.0, idx);
            if !explored.insert(key) {
                continue;
            }
            if !t.matcher.is_zero_width() {
                out.push((key, cursor.clone()));
            } else if t.matcher.matches(&cursor, ctx) {
                if t.end == self.accept {
                    out.push((key, cursor.clone()));
                } else {
                    self.expand(t.end, t.matcher.advance(&cursor), ctx, explored, out);
                }
            }
        }
    }

    /// Level-synchronized breadth-first simulation; the strategy used when
    /// the pattern captures. Each level corresponds to one input position.
    /// An accepting configuration ends its level early: everything behind
    /// it in the queue has lower priority, while higher-priority frontier
    /// entries keep running and may overwrite the match with a longer one.
    pub(crate) fn match_suffix_bfs(
        &self,
        cursor: Cursor,
        ctx: &Context<'_>,
        step_limit: Option<usize>,
    ) -> Option<Cursor> {
        let mut explored = HashSet::new();
        let mut configs = Vec::new();
        self.expand(self.start, cursor, ctx, &mut explored, &mut configs);

        let mut queue: VecDeque<(TransitionRef, Cursor)> = configs.into();
        let mut best = None;
        let mut steps = 0usize;

        loop {
            let mut frontier = Vec::new();
            let mut next_explored = HashSet::new();

            while let Some((key, cursor)) = queue.pop_front() {
                steps += 1;
                if step_limit.is_some_and(|limit| steps > limit) {
                    return None;
                }

                let t = &self.transitions[key.0][key.1];
                if !t.matcher.matches(&cursor, ctx) {
                    continue;
                }
                if t.end == self.accept {
                    best = Some(t.matcher.advance(&cursor));
                    break;
                }
                self.expand(
                    t.end,
                    t.matcher.advance(&cursor),
                    ctx,
                    &mut next_explored,
                    &mut frontier,
                );
            }

            if frontier.is_empty() {
                break;
            }
            queue = frontier.into();
        }

        best
    }
}

impl std::fmt::Display for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows = Vec::new();
        for (id, transitions) in self.transitions.iter().enumerate() {
            let mut marks = Vec::new();
            if State(id) == self.start {
                marks.push("start");
            }
            if State(id) == self.accept {
                marks.push("accept");
            }
            if self.lazy[id] {
                marks.push("lazy");
            }
            if transitions.is_empty() {
                rows.push(vec![id.to_string(), marks.join(" "), String::new(), String::new()]);
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
        table::render(f, &["State", "Marks", "Matcher", "To"], &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Flags;
    use crate::parse;

    fn nfa(pattern: &str) -> Nfa {
        Nfa::compile(&parse::parse(pattern, Flags::empty()).unwrap())
    }

    fn reachable(nfa: &Nfa) -> usize {
        let mut seen = HashSet::new();
        let mut stack = vec![nfa.start()];
        while let Some(state) = stack.pop() {
            if !seen.insert(state.0) {
                continue;
            }
            for t in &nfa[state] {
                stack.push(t.end);
            }
        }
        seen.len()
    }

    #[test]
    fn every_state_is_reachable() {
        for pattern in ["", "abc", "a|b|c", "(a)(b)?", "a{2,5}", "a*?b+", "x{3}", "(?:ab)*"] {
            let nfa = nfa(pattern);
            assert_eq!(reachable(&nfa), nfa.state_count(), "{pattern}");
        }
    }

    #[test]
    fn alternation_preserves_branch_order() {
        let nfa = nfa("a|b");
        let first = &nfa[nfa.start()];
        assert_eq!(first.len(), 2);
        // Both outgoing edges are ε, and following the first one must reach
        // the `a` branch before the second reaches `b`.
        let a_target = first[0].end;
        let b_target = first[1].end;
        assert!(matches!(nfa[a_target][0].matcher, Matcher::Literal('a')));
        assert!(matches!(nfa[b_target][0].matcher, Matcher::Literal('b')));
    }

    #[test]
    fn greedy_and_lazy_choice_order() {
        // Greedy star: the "take" branch comes first.
        let greedy = nfa("a*");
        let edges = &greedy[greedy.start()];
        let take = edges[0].end;
        assert!(matches!(greedy[take][0].matcher, Matcher::Literal('a')));

        // Lazy star: the "skip" branch comes first.
        let lazy = nfa("a*?");
        let edges = &lazy[lazy.start()];
        assert_eq!(edges[0].end, lazy.accept());
    }

    #[test]
    fn lazy_marks_are_confined_to_the_quantified_fragment() {
        let nfa = nfa("a*?b");
        assert!((0..nfa.state_count()).any(|id| nfa.is_lazy(State(id))));
        // The literal `b` leaf is outside the lazy fragment.
        let b_state = (0..nfa.state_count())
            .find(|&id| {
                nfa[State(id)]
                    .iter()
                    .any(|t| matches!(t.matcher, Matcher::Literal('b')))
            })
            .unwrap();
        assert!(!nfa.is_lazy(State(b_state)));

        let greedy = super::Nfa::compile(&parse::parse("a*b", Flags::empty()).unwrap());
        assert!((0..greedy.state_count()).all(|id| !greedy.is_lazy(State(id))));
    }

    #[test]
    fn group_markers_wrap_the_body() {
        let nfa = nfa("(a)");
        assert!(matches!(
            nfa[nfa.start()][0].matcher,
            Matcher::GroupEntry(0)
        ));
        let exit = (0..nfa.state_count()).find(|&id| {
            nfa[State(id)]
                .iter()
                .any(|t| matches!(t.matcher, Matcher::GroupExit(0)))
        });
        assert!(exit.is_some());
    }

    #[test]
    fn symbols_exclude_epsilon() {
        let nfa = nfa("a(?:b|a)*");
        let symbols = nfa.symbols();
        assert_eq!(symbols.len(), 2);
        assert!(symbols.contains(&Matcher::Literal('a')));
        assert!(symbols.contains(&Matcher::Literal('b')));
    }

    #[test]
    fn epsilon_closure_reaches_through_choices() {
        let nfa = nfa("a*");
        let closure = nfa.epsilon_closure(&BTreeSet::from([nfa.start().0]));
        // From the star entry both the body start and the accept state are
        // ε-reachable.
        assert!(closure.contains(&nfa.accept().0));
        assert!(closure.len() >= 3);
    }
}
