//! The graph model shared by every engine: states, labeled edges and the
//! snapshot format handed over by the editing surface.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod index;
pub mod index_map;

/// Label text of an epsilon transition.
pub const EPSILON: &str = "ε";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub String);

impl StateId {
    pub fn new(id: impl Into<String>) -> Self {
        StateId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        StateId(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        EdgeId(id.into())
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canvas coordinates. Opaque to every engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: StateId,
    /// Display label. Only interpreted in Moore mode, where it reads
    /// `name/output`.
    pub label: String,
    #[serde(default)]
    pub is_initial: bool,
    #[serde(default)]
    pub is_accepting: bool,
    #[serde(default)]
    pub position: Position,
}

impl State {
    /// A non-accepting state whose label equals its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        State {
            label: id.clone(),
            id: StateId(id),
            is_initial: false,
            is_accepting: false,
            position: Position::default(),
        }
    }

    pub fn accepting(id: impl Into<String>) -> Self {
        State::new(id).with_accepting(true)
    }

    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    pub fn with_accepting(mut self, accepting: bool) -> Self {
        self.is_accepting = accepting;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }
}

/// A visual arrow between two states. Every label is a separate transition
/// sharing the same endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: StateId,
    pub to: StateId,
    pub labels: Vec<String>,
}

/// The kind of machine a snapshot describes. Decides which label codec is
/// applied to the edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Dfa,
    #[default]
    Nfa,
    Pda,
    Tm,
    Mealy,
    Moore,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dfa" => Ok(Mode::Dfa),
            "nfa" => Ok(Mode::Nfa),
            "pda" => Ok(Mode::Pda),
            "tm" => Ok(Mode::Tm),
            "mealy" => Ok(Mode::Mealy),
            "moore" => Ok(Mode::Moore),
            _ => Err(format!("Invalid mode: {}", s)),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Dfa => write!(f, "dfa"),
            Mode::Nfa => write!(f, "nfa"),
            Mode::Pda => write!(f, "pda"),
            Mode::Tm => write!(f, "tm"),
            Mode::Mealy => write!(f, "mealy"),
            Mode::Moore => write!(f, "moore"),
        }
    }
}

/// A directed multigraph of states and edges. The order of `states` is the
/// stable enumeration order the transforms rely on for reproducible results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Automaton {
    pub states: Vec<State>,
    pub edges: Vec<Edge>,
}

impl Automaton {
    pub fn new() -> Self {
        Automaton::default()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn add_state(&mut self, state: State) -> StateId {
        let id = state.id.clone();
        self.states.push(state);
        id
    }

    /// Adds an edge with a generated id. Returns the new id.
    pub fn add_edge<L: Into<String>>(
        &mut self,
        from: &StateId,
        to: &StateId,
        labels: impl IntoIterator<Item = L>,
    ) -> EdgeId {
        let mut n = self.edges.len();
        let mut id = EdgeId(format!("e{n}"));
        while self.edges.iter().any(|e| e.id == id) {
            n += 1;
            id = EdgeId(format!("e{n}"));
        }

        self.edges.push(Edge {
            id: id.clone(),
            from: from.clone(),
            to: to.clone(),
            labels: labels.into_iter().map(Into::into).collect(),
        });
        id
    }

    pub fn state(&self, id: &StateId) -> Option<&State> {
        self.states.iter().find(|s| &s.id == id)
    }

    /// The first state flagged as initial, if any.
    pub fn initial(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = &State> {
        self.states.iter().filter(|s| s.is_accepting)
    }

    /// Places the states on a grid with `columns` states per row. Used for
    /// automata produced by the transforms, which have no layout of their own.
    pub fn arrange_in_grid(&mut self, columns: usize, spacing: f64) {
        let columns = columns.max(1);
        for (i, state) in self.states.iter_mut().enumerate() {
            state.position = Position {
                x: (i % columns) as f64 * spacing,
                y: (i / columns) as f64 * spacing,
            };
        }
    }
}

/// The basic trait for anything that defines a language over characters.
pub trait Language {
    fn accepts(&self, word: &[char]) -> bool;
}

/// What the editing surface hands to the core and what persistence stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub mode: Mode,
    #[serde(flatten)]
    pub automaton: Automaton,
}

impl Snapshot {
    pub fn new(mode: Mode, automaton: Automaton) -> Self {
        Snapshot { mode, automaton }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
