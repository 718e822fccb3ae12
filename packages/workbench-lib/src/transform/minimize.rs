//! Table-filling DFA minimization.
//!
//! Runs in three phases: pruning of unreachable states, marking of
//! distinguishable pairs, and merging of the remaining equivalence classes.

use std::collections::BTreeSet;

use petgraph::visit::Bfs;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, StateId, index_map::IndexMap},
    error::Result,
    simulation::{self, FiniteIndex},
    transform::{AutomatonBuilder, subset},
};

/// Why a pair of states was marked distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinguishedPair {
    pub pair: (StateId, StateId),
    /// Round 0 separates accepting from non-accepting states.
    pub round: usize,
    /// The symbol leading to an already distinguished pair. `None` in round 0.
    pub symbol: Option<char>,
    /// The destinations on `symbol`. A missing transition is `None`.
    pub destinations: Option<(Option<StateId>, Option<StateId>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizeResult {
    pub automaton: Automaton,
    /// True if the input was not deterministic and was determinized first.
    pub determinized: bool,
    pub unreachable: Vec<StateId>,
    pub distinguished: Vec<DistinguishedPair>,
    /// Members of every output state, in output state order.
    pub classes: Vec<Vec<StateId>>,
    /// States of the (determinized) input minus states of the result. Zero if
    /// the DFA was already minimal.
    pub removed_count: usize,
}

/// Validates and minimizes `automaton`. Non-deterministic input is
/// determinized first.
pub fn minimize(automaton: &Automaton) -> Result<MinimizeResult> {
    let index = simulation::compile(automaton)?;

    if simulation::is_deterministic(&index) {
        return Ok(minimize_dfa(&index, false));
    }

    let dfa = subset::determinize(&index).automaton;
    let dfa_index = simulation::compile(&dfa)?;
    Ok(minimize_dfa(&dfa_index, true))
}

/// Union-find over state positions. Whenever the class of `preferred` takes
/// part in a union it stays the root.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    preferred: Option<usize>,
}

impl UnionFind {
    pub fn new(size: usize, preferred: Option<usize>) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            preferred,
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }

        if Some(rb) == self.preferred {
            self.parent[ra] = rb;
        } else {
            self.parent[rb] = ra;
        }
    }
}

fn minimize_dfa(index: &FiniteIndex, determinized: bool) -> MinimizeResult {
    let original_count = index.node_count();

    // reachable states in enumeration order
    let mut reachable_set = BTreeSet::new();
    if let Some(initial) = index.initial() {
        let mut bfs = Bfs::new(&index.graph, initial);
        while let Some(node) = bfs.next(&index.graph) {
            reachable_set.insert(node);
        }
    }
    let reachable = reachable_set.iter().copied().collect::<Vec<_>>();
    let unreachable = index
        .node_indices()
        .filter(|n| !reachable_set.contains(n))
        .map(|n| index.id(n).clone())
        .collect::<Vec<_>>();

    let mut position = IndexMap::new(original_count);
    for (i, &node) in reachable.iter().enumerate() {
        position.insert(node, i);
    }

    let alphabet = reachable
        .iter()
        .flat_map(|&node| index.outgoing(node))
        .filter_map(|(_, entry)| entry.entry.symbol())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    // delta[state][symbol] as positions into `reachable`
    let delta = reachable
        .iter()
        .map(|&node| {
            alphabet
                .iter()
                .map(|&symbol| {
                    index
                        .outgoing(node)
                        .find(|(_, entry)| entry.entry.matches(symbol))
                        .and_then(|(target, _)| position.get(target).copied())
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let n = reachable.len();
    let accepting = |i: usize| index.is_accepting(reachable[i]);
    let id = |i: usize| index.id(reachable[i]).clone();

    // marked[i][j] for i < j holds the round in which the pair was marked
    let mut marked: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
    let mut distinguished = vec![];

    for i in 0..n {
        for j in i + 1..n {
            if accepting(i) != accepting(j) {
                marked[i][j] = Some(0);
                distinguished.push(DistinguishedPair {
                    pair: (id(i), id(j)),
                    round: 0,
                    symbol: None,
                    destinations: None,
                });
            }
        }
    }

    let is_marked_before = |marked: &Vec<Vec<Option<usize>>>, a: usize, b: usize, round: usize| {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        marked[a][b].is_some_and(|r| r < round)
    };

    let mut round = 1;
    loop {
        let mut changed = false;

        for i in 0..n {
            for j in i + 1..n {
                if marked[i][j].is_some() {
                    continue;
                }

                let witness = alphabet.iter().enumerate().find(|&(l, _)| {
                    match (delta[i][l], delta[j][l]) {
                        (Some(a), Some(b)) => a != b && is_marked_before(&marked, a, b, round),
                        (Some(_), None) | (None, Some(_)) => true,
                        (None, None) => false,
                    }
                });

                if let Some((l, &symbol)) = witness {
                    marked[i][j] = Some(round);
                    changed = true;
                    distinguished.push(DistinguishedPair {
                        pair: (id(i), id(j)),
                        round,
                        symbol: Some(symbol),
                        destinations: Some((delta[i][l].map(id), delta[j][l].map(id))),
                    });
                }
            }
        }

        tracing::debug!(round, marked = distinguished.len(), "table filling round");

        if !changed {
            break;
        }
        round += 1;
    }

    let initial_position = index.initial().and_then(|i| position.get(i).copied());
    let mut classes = UnionFind::new(n, initial_position);
    for i in 0..n {
        for j in i + 1..n {
            if marked[i][j].is_none() {
                classes.union(i, j);
            }
        }
    }

    // output states in order of their first member
    let mut output_of = vec![0; n];
    let mut roots = vec![];
    let mut members: Vec<Vec<usize>> = vec![];
    for i in 0..n {
        let root = classes.find(i);
        match roots.iter().position(|&r| r == root) {
            Some(c) => {
                members[c].push(i);
                output_of[i] = c;
            }
            None => {
                roots.push(root);
                members.push(vec![i]);
                output_of[i] = members.len() - 1;
            }
        }
    }

    let mut builder = AutomatonBuilder::new();
    for (&root, class) in roots.iter().zip(&members) {
        let representative = index.state(reachable[root]);
        let label = if class.len() > 1 {
            let mut labels = class
                .iter()
                .map(|&i| index.state(reachable[i]).label.clone())
                .collect::<Vec<_>>();
            labels.sort();
            labels.join(",")
        } else {
            representative.label.clone()
        };

        let mut state = representative.clone();
        state.label = label;
        builder.add_state(state);
    }

    // members of a class agree on their successor classes
    for (c, class) in members.iter().enumerate() {
        for (l, target) in delta[class[0]].iter().enumerate() {
            if let Some(target) = target {
                builder.add_transition(c, output_of[*target], alphabet[l].to_string());
            }
        }
    }

    let automaton = builder.finish_keeping_layout();
    let removed_count = original_count - automaton.state_count();

    tracing::info!(
        original = original_count,
        minimized = automaton.state_count(),
        removed_count,
        "minimization done"
    );

    MinimizeResult {
        automaton,
        determinized,
        unreachable,
        distinguished,
        classes: members
            .iter()
            .map(|class| class.iter().map(|&i| id(i)).collect())
            .collect(),
        removed_count,
    }
}
