//! Error values returned by the engines and transforms.
//!
//! Semantic non-findings (no initial state, dead configurations, exhausted
//! budgets) are never errors; they are reported through the result types of
//! the respective engine.

use thiserror::Error;

use crate::{
    automaton::{EdgeId, StateId},
    label::LabelError,
    transform::regex::RegexError,
};

/// Structural problems of a snapshot detected when an engine indexes it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("State id `{0}` is used by more than one state")]
    DuplicateState(StateId),

    #[error("Edge `{edge}` references unknown state `{state}`")]
    DanglingEdge { edge: EdgeId, state: StateId },

    #[error("Automaton has more than one initial state: {}", .0.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", "))]
    MultipleInitialStates(Vec<StateId>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkbenchError {
    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Regex(#[from] RegexError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, WorkbenchError>;
