//! Structural transformations between automata and regular expressions.
//!
//! Every transform is a pure function from its input to a new automaton plus
//! a trace of intermediate steps.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, Edge, EdgeId, State, StateId};

pub mod complete;
pub mod elimination;
pub mod grammar;
pub mod minimize;
pub mod product;
pub mod regex;
pub mod subset;
pub mod thompson;

/// Column count and spacing of the grid layout given to constructed automata.
pub const GRID_COLUMNS: usize = 5;
pub const GRID_SPACING: f64 = 150.0;

/// One expansion of a breadth-first construction over derived states, used by
/// subset and product construction alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionStep {
    pub from: StateId,
    pub symbol: char,
    pub to: StateId,
    /// True if `to` was discovered by this step.
    pub is_new: bool,
}

/// Accumulates the states and transitions of a constructed automaton.
/// Transitions between the same pair of states are merged onto one edge.
#[derive(Debug, Default)]
pub(crate) struct AutomatonBuilder {
    automaton: Automaton,
    ids: HashSet<StateId>,
    edges: HashMap<(usize, usize), usize>,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        AutomatonBuilder::default()
    }

    /// Adds `state`, priming its id until it is unique. Returns its position.
    pub fn add_state(&mut self, mut state: State) -> usize {
        while self.ids.contains(&state.id) {
            state.id = StateId(format!("{}'", state.id));
        }
        self.ids.insert(state.id.clone());
        self.automaton.states.push(state);
        self.automaton.states.len() - 1
    }

    pub fn id(&self, state: usize) -> &StateId {
        &self.automaton.states[state].id
    }

    /// Adds `label` to the edge `from → to`, creating the edge if needed.
    /// Labels already on the edge are not repeated.
    pub fn add_transition(&mut self, from: usize, to: usize, label: impl Into<String>) {
        let label = label.into();

        if let Some(&edge) = self.edges.get(&(from, to)) {
            let labels = &mut self.automaton.edges[edge].labels;
            if !labels.contains(&label) {
                labels.push(label);
            }
            return;
        }

        let id = EdgeId(format!("e{}", self.automaton.edges.len()));
        let (from_id, to_id) = (self.id(from).clone(), self.id(to).clone());
        self.automaton.edges.push(Edge {
            id,
            from: from_id,
            to: to_id,
            labels: vec![label],
        });
        self.edges.insert((from, to), self.automaton.edges.len() - 1);
    }

    /// The finished automaton, laid out on a grid.
    pub fn finish(mut self) -> Automaton {
        self.automaton.arrange_in_grid(GRID_COLUMNS, GRID_SPACING);
        self.automaton
    }

    /// The finished automaton with the positions its states were added with.
    pub fn finish_keeping_layout(self) -> Automaton {
        self.automaton
    }
}

#[test]
fn test_builder_merges_parallel_labels() {
    let mut builder = AutomatonBuilder::new();
    let p = builder.add_state(State::new("p").initial());
    let q = builder.add_state(State::new("p"));
    builder.add_transition(p, q, "a");
    builder.add_transition(p, q, "b");
    builder.add_transition(p, q, "a");
    builder.add_transition(q, q, "a");

    let automaton = builder.finish();
    assert_eq!(automaton.states[1].id, StateId::from("p'"));
    assert_eq!(automaton.edges.len(), 2);
    assert_eq!(automaton.edges[0].labels, vec!["a", "b"]);
}
