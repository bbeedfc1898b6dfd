//! DFA minimization: mark distinguishable state pairs until a fixpoint,
//! then merge the remaining pairs with a union-find. The result accepts the
//! same language and is canonical up to state renaming.

use std::collections::HashMap;

use log::debug;

use crate::matching::Pattern;
use crate::nfa::{Matcher, State, Transition};

use super::Dfa;

/// Disjoint sets over `0..n` with path compression and union by weight.
struct UnionFind {
    parent: Vec<usize>,
    weight: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            weight: vec![1; len],
        }
    }

    fn find(&mut self, mut item: usize) -> usize {
        let mut root = item;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[item] != root {
            let next = self.parent[item];
            self.parent[item] = root;
            item = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.weight[a] < self.weight[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.weight[a] += self.weight[b];
    }
}

impl Dfa {
    /// Merge all pairs of equivalent states. Two states are equivalent iff
    /// they agree on acceptance (and laziness, which changes accepting
    /// behaviour) and, for every symbol, step into equivalent states.
    #[must_use]
    pub fn minimize(&self) -> Self {
        let n = self.state_count();
        // Index past the last state stands in for "no transition".
        let null = n;

        let mut symbols: Vec<Matcher> = Vec::new();
        for id in 0..n {
            for t in &self[State(id)] {
                if !symbols.contains(&t.matcher) {
                    symbols.push(t.matcher.clone());
                }
            }
        }
        let symbol_index: HashMap<&Matcher, usize> =
            symbols.iter().enumerate().map(|(i, m)| (m, i)).collect();

        let mut delta = vec![vec![null; symbols.len()]; n];
        for id in 0..n {
            for t in &self[State(id)] {
                delta[id][symbol_index[&t.matcher]] = t.end.0;
            }
        }

        // Distinguishability, refined to a fixpoint.
        let mut marked = vec![vec![false; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let by_accept = self.is_accepting(State(i)) != self.is_accepting(State(j));
                let by_lazy = self.is_accepting(State(i))
                    && self.is_lazy(State(i)) != self.is_lazy(State(j));
                if by_accept || by_lazy {
                    marked[i][j] = true;
                }
            }
        }
        loop {
            let mut changed = false;
            for i in 0..n {
                for j in (i + 1)..n {
                    if marked[i][j] {
                        continue;
                    }
                    for s in 0..symbols.len() {
                        let (ti, tj) = (delta[i][s], delta[j][s]);
                        if ti == tj {
                            continue;
                        }
                        if ti == null || tj == null || marked[ti.min(tj)][ti.max(tj)] {
                            marked[i][j] = true;
                            changed = true;
                            break;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let mut classes = UnionFind::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if !marked[i][j] {
                    classes.union(i, j);
                }
            }
        }

        // Renumber the merged classes in order of their lowest member,
        // which doubles as the representative.
        let mut class_of = vec![0usize; n];
        let mut reps: Vec<usize> = Vec::new();
        let mut ids: HashMap<usize, usize> = HashMap::new();
        for state in 0..n {
            let root = classes.find(state);
            let id = match ids.get(&root) {
                Some(&id) => id,
                None => {
                    let id = reps.len();
                    ids.insert(root, id);
                    reps.push(state);
                    id
                }
            };
            class_of[state] = id;
        }

        let transitions: Vec<Vec<Transition>> = reps
            .iter()
            .map(|&rep| {
                self[State(rep)]
                    .iter()
                    .map(|t| Transition {
                        matcher: t.matcher.clone(),
                        end: State(class_of[t.end.0]),
                    })
                    .collect()
            })
            .collect();
        let accepts = reps.iter().map(|&rep| self.is_accepting(State(rep))).collect();
        let mut lazy = vec![false; reps.len()];
        for state in 0..n {
            if self.is_lazy(State(state)) {
                lazy[class_of[state]] = true;
            }
        }
        let start = State(class_of[self.start().0]);

        debug!("minimized dfa: {} -> {} states", n, reps.len());

        Self::from_parts(transitions, start, accepts, lazy, self.flags())
    }
}
