//! State elimination: finite automaton to regular expression.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, StateId},
    error::Result,
    label::PlainEntry,
    simulation::{self, FiniteIndex},
    transform::regex::Regex,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationStep {
    pub state: StateId,
    pub self_loop: Option<String>,
    /// Number of direct edges created or extended.
    pub updated_edges: usize,
    pub remaining_edges: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationResult {
    pub regex: Regex,
    /// `regex` printed; `∅` for the empty language.
    pub expression: String,
    pub steps: Vec<EliminationStep>,
}

/// Validates `automaton` and converts it to a regular expression.
pub fn fa_to_regex(automaton: &Automaton) -> Result<EliminationResult> {
    let index = simulation::compile(automaton)?;
    Ok(eliminate(&index))
}

/// A generalized automaton whose edges carry regular expressions. Nodes
/// `0..n` are the source states, `n` is the super-start and `n + 1` the
/// super-accept.
#[derive(Debug, Clone, Default)]
struct Gnfa {
    edges: BTreeMap<(usize, usize), Regex>,
}

impl Gnfa {
    fn add(&mut self, from: usize, to: usize, regex: Regex) {
        let entry = self.edges.entry((from, to)).or_insert(Regex::Empty);
        *entry = std::mem::replace(entry, Regex::Empty).union(regex);
    }

    fn eliminate(&mut self, state: usize) -> (Option<Regex>, usize) {
        let self_loop = self.edges.remove(&(state, state));

        let incoming = self
            .edges
            .iter()
            .filter(|((_, to), _)| *to == state)
            .map(|(&(from, _), r)| (from, r.clone()))
            .collect::<Vec<_>>();
        let outgoing = self
            .edges
            .iter()
            .filter(|((from, _), _)| *from == state)
            .map(|(&(_, to), r)| (to, r.clone()))
            .collect::<Vec<_>>();

        self.edges.retain(|&(from, to), _| from != state && to != state);

        let looping = self_loop.clone().map(Regex::star).unwrap_or(Regex::Epsilon);
        for (p, r_in) in &incoming {
            for (q, r_out) in &outgoing {
                let path = r_in.clone().concat(looping.clone()).concat(r_out.clone());
                self.add(*p, *q, path);
            }
        }

        (self_loop, incoming.len() * outgoing.len())
    }
}

pub fn eliminate(index: &FiniteIndex) -> EliminationResult {
    let accepting = index
        .node_indices()
        .filter(|&n| index.is_accepting(n))
        .collect::<Vec<_>>();

    let Some(initial) = index.initial().filter(|_| !accepting.is_empty()) else {
        return EliminationResult {
            regex: Regex::Empty,
            expression: Regex::Empty.to_string(),
            steps: vec![],
        };
    };

    let n = index.node_count();
    let (start, accept) = (n, n + 1);

    let mut gnfa = Gnfa::default();
    gnfa.add(start, initial.index(), Regex::Epsilon);
    for state in &accepting {
        gnfa.add(state.index(), accept, Regex::Epsilon);
    }
    for (from, to, entry) in index.transitions() {
        let regex = match entry.entry {
            PlainEntry::Symbol(c) => Regex::Symbol(c),
            PlainEntry::Epsilon => Regex::Epsilon,
        };
        gnfa.add(from.index(), to.index(), regex);
    }

    let mut steps = vec![];
    for node in index.node_indices() {
        let (self_loop, updated_edges) = gnfa.eliminate(node.index());
        tracing::debug!(state = %index.id(node), updated_edges, "eliminated state");
        steps.push(EliminationStep {
            state: index.id(node).clone(),
            self_loop: self_loop.map(|r| r.to_string()),
            updated_edges,
            remaining_edges: gnfa.edges.len(),
        });
    }

    let regex = gnfa.edges.remove(&(start, accept)).unwrap_or(Regex::Empty);
    tracing::info!(regex = %regex, "state elimination done");

    EliminationResult {
        expression: regex.to_string(),
        regex,
        steps,
    }
}
