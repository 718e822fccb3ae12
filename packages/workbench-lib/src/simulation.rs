//! Simulation core for finite automata: epsilon closure, single steps and
//! whole runs, plus the steppable session used by interactive front-ends.

use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, Language, Mode, StateId, index::AutomatonIndex},
    error::Result,
    label::PlainEntry,
};

/// The active states of a finite automaton. Ordered by node index, which is
/// the enumeration order of the snapshot.
pub type StateSet = BTreeSet<NodeIndex>;

/// A parsed DFA/NFA snapshot.
pub type FiniteIndex<'a> = AutomatonIndex<'a, PlainEntry>;

/// Validates `automaton` and parses its labels as plain symbols.
pub fn compile(automaton: &Automaton) -> Result<FiniteIndex<'_>> {
    AutomatonIndex::build(automaton)
}

/// All states reachable from `states` via epsilon transitions only,
/// including `states` themselves.
pub fn epsilon_closure(index: &FiniteIndex, states: &StateSet) -> StateSet {
    let mut closure = states.clone();
    let mut stack = states.iter().copied().collect::<Vec<_>>();

    while let Some(state) = stack.pop() {
        for (target, entry) in index.outgoing(state) {
            if entry.entry.is_epsilon() && closure.insert(target) {
                stack.push(target);
            }
        }
    }

    closure
}

/// The destinations of all transitions on `symbol` leaving `states`, without
/// taking the epsilon closure.
pub fn move_on(index: &FiniteIndex, states: &StateSet, symbol: char) -> StateSet {
    states
        .iter()
        .flat_map(|&state| index.outgoing(state))
        .filter(|(_, entry)| entry.entry.matches(symbol))
        .map(|(target, _)| target)
        .collect()
}

/// Consumes one symbol. An empty result is a dead configuration.
pub fn step(index: &FiniteIndex, active: &StateSet, symbol: char) -> StateSet {
    epsilon_closure(index, &move_on(index, active, symbol))
}

/// The active set before any input is read. DFA mode does not close over
/// epsilon transitions. Empty if there is no initial state.
pub fn initial_states(index: &FiniteIndex, mode: Mode) -> StateSet {
    let Some(initial) = index.initial() else {
        return StateSet::new();
    };

    let start = StateSet::from([initial]);
    if mode == Mode::Dfa {
        start
    } else {
        epsilon_closure(index, &start)
    }
}

pub fn contains_accepting(index: &FiniteIndex, states: &StateSet) -> bool {
    states.iter().any(|&s| index.is_accepting(s))
}

/// Runs a compiled automaton over `input`.
pub fn accepts(index: &FiniteIndex, mode: Mode, input: impl IntoIterator<Item = char>) -> bool {
    let mut active = initial_states(index, mode);

    for symbol in input {
        if active.is_empty() {
            return false;
        }
        active = step(index, &active, symbol);
    }

    contains_accepting(index, &active)
}

/// Validates and runs `automaton` over `input`.
pub fn run(automaton: &Automaton, input: &str, mode: Mode) -> Result<bool> {
    let index = compile(automaton)?;
    let accepted = accepts(&index, mode, input.chars());
    tracing::debug!(input, accepted, "finite automaton run");
    Ok(accepted)
}

/// All non-epsilon symbols appearing on any edge, in ascending order.
pub fn alphabet(index: &FiniteIndex) -> Vec<char> {
    index
        .transitions()
        .filter_map(|(_, _, entry)| entry.entry.symbol())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// True if there are no epsilon transitions and no state has two different
/// successors for the same symbol.
pub fn is_deterministic(index: &FiniteIndex) -> bool {
    index.node_indices().all(|node| {
        let mut seen = hashbrown::HashMap::new();
        index.outgoing(node).all(|(target, entry)| match entry.entry {
            PlainEntry::Epsilon => false,
            PlainEntry::Symbol(c) => *seen.entry(c).or_insert(target) == target,
        })
    })
}

pub fn ids(index: &FiniteIndex, states: &StateSet) -> Vec<StateId> {
    states.iter().map(|&s| index.id(s).clone()).collect()
}

impl Language for FiniteIndex<'_> {
    fn accepts(&self, word: &[char]) -> bool {
        accepts(self, Mode::Nfa, word.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Idle,
    Stepping,
    Accepted,
    Rejected,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Accepted | SessionStatus::Rejected)
    }
}

/// A caller-held, steppable run of a finite automaton.
///
/// `Idle → Stepping → {Accepted | Rejected}`; [NfaSession::reset] returns to
/// `Idle` from anywhere.
#[derive(Debug, Clone)]
pub struct NfaSession {
    mode: Mode,
    input: Vec<char>,
    position: usize,
    active: StateSet,
    status: SessionStatus,
    /// Active set after start and after every consumed symbol.
    history: Vec<StateSet>,
}

impl NfaSession {
    pub fn new(input: &str, mode: Mode) -> Self {
        NfaSession {
            mode,
            input: input.chars().collect(),
            position: 0,
            active: StateSet::new(),
            status: SessionStatus::Idle,
            history: vec![],
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn active(&self) -> &StateSet {
        &self.active
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn history(&self) -> &[StateSet] {
        &self.history
    }

    /// Computes the initial active set. Only has an effect when `Idle`.
    pub fn start(&mut self, index: &FiniteIndex) -> SessionStatus {
        if self.status != SessionStatus::Idle {
            return self.status;
        }

        self.active = initial_states(index, self.mode);
        self.history.push(self.active.clone());
        self.status = SessionStatus::Stepping;
        self.settle(index);
        self.status
    }

    /// Consumes the next input symbol. Only has an effect when `Stepping`.
    pub fn step(&mut self, index: &FiniteIndex) -> SessionStatus {
        if self.status != SessionStatus::Stepping {
            return self.status;
        }

        let symbol = self.input[self.position];
        self.active = step(index, &self.active, symbol);
        self.position += 1;
        self.history.push(self.active.clone());
        tracing::debug!(
            symbol = %symbol,
            active = ?ids(index, &self.active),
            "finite automaton step"
        );
        self.settle(index);
        self.status
    }

    /// Steps until a terminal status is reached.
    pub fn finish(&mut self, index: &FiniteIndex) -> SessionStatus {
        self.start(index);
        while self.status == SessionStatus::Stepping {
            self.step(index);
        }
        self.status
    }

    pub fn reset(&mut self) {
        self.position = 0;
        self.active.clear();
        self.history.clear();
        self.status = SessionStatus::Idle;
    }

    fn settle(&mut self, index: &FiniteIndex) {
        if self.active.is_empty() {
            self.status = SessionStatus::Rejected;
        } else if self.position == self.input.len() {
            self.status = if contains_accepting(index, &self.active) {
                SessionStatus::Accepted
            } else {
                SessionStatus::Rejected
            };
        }
    }
}
