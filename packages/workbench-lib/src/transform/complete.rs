use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, Position, State, StateId},
    error::Result,
    simulation::{self, FiniteIndex},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub automaton: Automaton,
    /// The added trap state. `None` if the automaton was already complete.
    pub trap: Option<StateId>,
}

/// Completes `automaton` over its own alphabet.
pub fn complete(automaton: &Automaton) -> Result<CompletionResult> {
    let index = simulation::compile(automaton)?;
    let alphabet = simulation::alphabet(&index);
    Ok(complete_index(&index, &alphabet))
}

/// Completes `automaton` over `alphabet`, which may contain symbols the
/// automaton never uses.
pub fn complete_with_alphabet(automaton: &Automaton, alphabet: &[char]) -> Result<CompletionResult> {
    let index = simulation::compile(automaton)?;
    Ok(complete_index(&index, alphabet))
}

/// Adds a non-accepting trap state that receives every missing
/// `(state, symbol)` transition and loops on every symbol. Missing symbols of
/// one state share a single edge into the trap. An automaton without an
/// initial state recognizes the empty language; its trap becomes the initial
/// state so the result is still a complete DFA.
pub(crate) fn complete_index(index: &FiniteIndex, alphabet: &[char]) -> CompletionResult {
    let mut automaton = index.automaton().clone();

    let missing = index
        .node_indices()
        .map(|node| {
            let present = index
                .outgoing(node)
                .filter_map(|(_, entry)| entry.entry.symbol())
                .collect::<BTreeSet<_>>();
            let missing = alphabet
                .iter()
                .filter(|c| !present.contains(c))
                .map(|c| c.to_string())
                .collect::<Vec<_>>();
            (index.id(node).clone(), missing)
        })
        .filter(|(_, missing)| !missing.is_empty())
        .collect::<Vec<_>>();

    let without_initial = index.initial().is_none();
    if missing.is_empty() && !without_initial {
        return CompletionResult {
            automaton,
            trap: None,
        };
    }

    let mut trap_id = StateId::from("trap");
    let mut n = 1;
    while automaton.state(&trap_id).is_some() {
        trap_id = StateId(format!("trap{n}"));
        n += 1;
    }

    let right_edge = automaton
        .states
        .iter()
        .map(|s| s.position.x)
        .fold(0.0, f64::max);
    let mut trap = State::new(trap_id.as_str());
    trap.is_initial = without_initial;
    trap.position = Position {
        x: right_edge + super::GRID_SPACING,
        y: 0.0,
    };
    automaton.add_state(trap);

    for (state, labels) in missing {
        automaton.add_edge(&state, &trap_id, labels);
    }
    automaton.add_edge(&trap_id, &trap_id, alphabet.iter().map(|c| c.to_string()));

    tracing::debug!(trap = %trap_id, "completed automaton with trap state");

    CompletionResult {
        automaton,
        trap: Some(trap_id),
    }
}
