//! Subset construction: NFA to DFA.

use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, State, StateId},
    error::Result,
    simulation::{self, FiniteIndex, StateSet},
    transform::{AutomatonBuilder, ConstructionStep},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetResult {
    pub automaton: Automaton,
    /// Source states of every derived state, in derived state order.
    pub subsets: Vec<Vec<StateId>>,
    pub steps: Vec<ConstructionStep>,
}

/// Validates `automaton` and determinizes it.
pub fn subset_construction(automaton: &Automaton) -> Result<SubsetResult> {
    let index = simulation::compile(automaton)?;
    Ok(determinize(&index))
}

/// Breadth-first over subsets of source states. Empty move sets are dead
/// transitions and are left out, so the result may be partial. Without an
/// initial state the result is empty.
pub fn determinize(index: &FiniteIndex) -> SubsetResult {
    let mut builder = AutomatonBuilder::new();
    let mut subsets = vec![];
    let mut steps = vec![];

    let Some(initial) = index.initial() else {
        return SubsetResult {
            automaton: builder.finish(),
            subsets,
            steps,
        };
    };

    let alphabet = simulation::alphabet(index);
    let mut known: HashMap<StateSet, usize> = HashMap::new();
    let mut queue = VecDeque::new();

    let start = simulation::epsilon_closure(index, &StateSet::from([initial]));
    let start_state = builder.add_state(subset_state(index, &start).initial());
    subsets.push(simulation::ids(index, &start));
    known.insert(start.clone(), start_state);
    queue.push_back(start);

    while let Some(subset) = queue.pop_front() {
        let from = known[&subset];

        for &symbol in &alphabet {
            let target = simulation::step(index, &subset, symbol);
            if target.is_empty() {
                continue;
            }

            let is_new = !known.contains_key(&target);
            let to = if let Some(&to) = known.get(&target) {
                to
            } else {
                let to = builder.add_state(subset_state(index, &target));
                subsets.push(simulation::ids(index, &target));
                known.insert(target.clone(), to);
                queue.push_back(target);
                to
            };

            builder.add_transition(from, to, symbol.to_string());
            steps.push(ConstructionStep {
                from: builder.id(from).clone(),
                symbol,
                to: builder.id(to).clone(),
                is_new,
            });
        }
    }

    tracing::info!(
        source_states = index.node_count(),
        derived_states = subsets.len(),
        "subset construction done"
    );

    SubsetResult {
        automaton: builder.finish(),
        subsets,
        steps,
    }
}

/// The derived state of `subset`. The id lists member ids in source order,
/// so equal subsets always get equal ids.
fn subset_state(index: &FiniteIndex, subset: &StateSet) -> State {
    let ids = subset
        .iter()
        .map(|&s| index.id(s).as_str())
        .collect::<Vec<_>>()
        .join(",");
    let labels = subset
        .iter()
        .map(|&s| index.state(s).label.as_str())
        .collect::<Vec<_>>()
        .join(",");

    State::new(format!("{{{ids}}}"))
        .with_label(format!("{{{labels}}}"))
        .with_accepting(simulation::contains_accepting(index, subset))
}
