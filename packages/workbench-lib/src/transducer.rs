//! Deterministic Mealy and Moore machines.
//!
//! Both stop at the first input symbol without a matching transition. That is
//! reported as an incomplete run, not as an error.

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, StateId, index::AutomatonIndex},
    error::Result,
    label::{LabelCodec, MealyEntry, MooreLabel, PlainEntry},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransducerStep {
    pub from: StateId,
    pub to: StateId,
    pub input: char,
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransducerRun {
    pub output: String,
    pub steps: Vec<TransducerStep>,
    /// False if some input symbol had no transition, or there is no initial
    /// state.
    pub complete: bool,
    pub final_state: Option<StateId>,
}

/// Emits the output of every traversed transition.
pub fn run_mealy(automaton: &Automaton, input: &str) -> Result<TransducerRun> {
    let index = AutomatonIndex::<MealyEntry>::build(automaton)?;
    let Some(mut current) = index.initial() else {
        return Ok(TransducerRun::default());
    };

    let mut run = TransducerRun {
        complete: true,
        ..Default::default()
    };

    for symbol in input.chars() {
        let Some((target, entry)) = index
            .outgoing(current)
            .find(|(_, entry)| entry.entry.input == symbol)
        else {
            tracing::debug!(state = %index.id(current), symbol = %symbol, "mealy machine stuck");
            run.complete = false;
            break;
        };

        run.output.push_str(&entry.entry.output);
        run.steps.push(TransducerStep {
            from: index.id(current).clone(),
            to: index.id(target).clone(),
            input: symbol,
            output: entry.entry.output.clone(),
        });
        current = target;
    }

    run.final_state = Some(index.id(current).clone());
    Ok(run)
}

/// Emits the output of the initial state and of every state entered. Edges
/// carry plain symbols, states carry `name/output` labels.
pub fn run_moore(automaton: &Automaton, input: &str) -> Result<TransducerRun> {
    let index = AutomatonIndex::<PlainEntry>::build(automaton)?;
    let labels = automaton
        .states
        .iter()
        .map(|s| MooreLabel::parse(&s.label))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let Some(mut current) = index.initial() else {
        return Ok(TransducerRun::default());
    };

    let mut run = TransducerRun {
        output: labels[current.index()].output.clone(),
        complete: true,
        ..Default::default()
    };

    for symbol in input.chars() {
        let Some((target, _)) = index
            .outgoing(current)
            .find(|(_, entry)| entry.entry.matches(symbol))
        else {
            tracing::debug!(state = %index.id(current), symbol = %symbol, "moore machine stuck");
            run.complete = false;
            break;
        };

        let output = &labels[target.index()].output;
        run.output.push_str(output);
        run.steps.push(TransducerStep {
            from: index.id(current).clone(),
            to: index.id(target).clone(),
            input: symbol,
            output: output.clone(),
        });
        current = target;
    }

    run.final_state = Some(index.id(current).clone());
    Ok(run)
}
