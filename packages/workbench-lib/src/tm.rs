//! Single-tape deterministic Turing machine.

use std::{collections::BTreeMap, fmt::Display};

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, StateId, index::AutomatonIndex},
    config::TmConfig,
    error::Result,
    label::{Direction, TmEntry, tm::BLANK},
};

pub type TmIndex<'a> = AutomatonIndex<'a, TmEntry>;

pub fn compile(automaton: &Automaton) -> Result<TmIndex<'_>> {
    AutomatonIndex::build(automaton)
}

/// A tape infinite in both directions. Only non-blank cells are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: BTreeMap<i64, char>,
}

impl Tape {
    pub fn new() -> Self {
        Tape::default()
    }

    /// The input written from cell 0 onwards.
    pub fn from_input(input: &str) -> Self {
        let mut tape = Tape::new();
        for (i, c) in input.chars().enumerate() {
            tape.write(i as i64, c);
        }
        tape
    }

    pub fn read(&self, cell: i64) -> char {
        self.cells.get(&cell).copied().unwrap_or(BLANK)
    }

    pub fn write(&mut self, cell: i64, symbol: char) {
        if symbol == BLANK {
            self.cells.remove(&cell);
        } else {
            self.cells.insert(cell, symbol);
        }
    }

    pub fn non_blank_cells(&self) -> usize {
        self.cells.len()
    }

    /// Lowest and highest non-blank cell.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let first = self.cells.keys().next()?;
        let last = self.cells.keys().next_back()?;
        Some((*first, *last))
    }

    /// The cells from `from` to `to` inclusive.
    pub fn window(&self, from: i64, to: i64) -> String {
        (from..=to).map(|cell| self.read(cell)).collect()
    }
}

impl Display for Tape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.bounds() {
            Some((from, to)) => write!(f, "{}", self.window(from, to)),
            None => write!(f, "{BLANK}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TmStatus {
    Running,
    Accepted,
    Rejected,
    /// The step budget ran out while the machine was still running.
    Halted,
}

impl TmStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TmStatus::Running)
    }
}

impl Display for TmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TmStatus::Running => write!(f, "running"),
            TmStatus::Accepted => write!(f, "accepted"),
            TmStatus::Rejected => write!(f, "rejected"),
            TmStatus::Halted => write!(f, "halted"),
        }
    }
}

/// One executed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmAction {
    pub from: StateId,
    pub to: StateId,
    pub head: i64,
    pub read: char,
    pub write: char,
    pub direction: Direction,
}

impl Display for TmAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: read {} at {}, write {}, move {} → {}",
            self.from, self.read, self.head, self.write, self.direction, self.to
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmState {
    /// `None` only if the machine has no initial state.
    pub state: Option<NodeIndex>,
    pub tape: Tape,
    pub head: i64,
    pub status: TmStatus,
    pub steps: usize,
    pub history: Vec<TmAction>,
}

impl TmState {
    /// The machine in its initial state with `input` on the tape and the head
    /// on cell 0. Without an initial state the machine rejects immediately.
    pub fn start(index: &TmIndex, input: &str) -> Self {
        let state = index.initial();
        TmState {
            state,
            tape: Tape::from_input(input),
            head: 0,
            status: if state.is_some() {
                TmStatus::Running
            } else {
                TmStatus::Rejected
            },
            steps: 0,
            history: vec![],
        }
    }

    /// Applies the first transition, in snapshot order, whose read symbol
    /// matches the cell under the head. Returns the successor state.
    pub fn step(&self, index: &TmIndex) -> TmState {
        let mut next = self.clone();
        let Some(current) = self.state else {
            return next;
        };
        if self.status.is_terminal() {
            return next;
        }

        let symbol = self.tape.read(self.head);
        let Some((target, entry)) = index
            .outgoing(current)
            .find(|(_, entry)| entry.entry.read.matches(symbol))
        else {
            next.status = if index.is_accepting(current) {
                TmStatus::Accepted
            } else {
                TmStatus::Rejected
            };
            tracing::debug!(state = %index.id(current), symbol = %symbol, status = %next.status, "no tm transition");
            return next;
        };

        let t = entry.entry;
        let written = t.write.write_over(symbol);
        next.tape.write(self.head, written);
        next.head = self.head + t.direction.offset();
        next.state = Some(target);
        next.steps += 1;
        let action = TmAction {
            from: index.id(current).clone(),
            to: index.id(target).clone(),
            head: self.head,
            read: symbol,
            write: written,
            direction: t.direction,
        };
        tracing::debug!(action = %action, "tm step");
        next.history.push(action);

        if index.is_accepting(target) {
            next.status = TmStatus::Accepted;
        }

        next
    }

    /// Steps until the machine stops or `budget` steps were taken. A machine
    /// still running afterwards is reported as halted.
    pub fn fast_run(&self, index: &TmIndex, budget: usize) -> TmState {
        let mut current = self.clone();
        let mut taken = 0;

        while current.status == TmStatus::Running && taken < budget {
            current = current.step(index);
            taken += 1;
        }

        if current.status == TmStatus::Running {
            tracing::warn!(budget, "tm step budget exhausted");
            current.status = TmStatus::Halted;
        }

        current
    }

    pub fn state_id<'a>(&self, index: &TmIndex<'a>) -> Option<&'a StateId> {
        self.state.map(|s| index.id(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmOutcome {
    pub status: TmStatus,
    pub state: Option<StateId>,
    pub tape: String,
    pub head: i64,
    pub steps: usize,
    pub history: Vec<String>,
}

/// Validates `automaton` and fast-runs it on `input` with the configured step
/// budget.
pub fn run(automaton: &Automaton, input: &str, config: &TmConfig) -> Result<TmOutcome> {
    let index = compile(automaton)?;
    let finished = TmState::start(&index, input).fast_run(&index, config.step_budget);

    tracing::info!(status = %finished.status, steps = finished.steps, "tm run done");

    Ok(TmOutcome {
        status: finished.status,
        state: finished.state_id(&index).cloned(),
        tape: finished.tape.to_string(),
        head: finished.head,
        steps: finished.steps,
        history: finished.history.iter().map(ToString::to_string).collect(),
    })
}
