//! Thompson's construction: regular expression to NFA.

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, EPSILON, State, StateId},
    error::Result,
    transform::{AutomatonBuilder, regex::Regex},
};

/// A sub-automaton with a single entry and a single exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fragment {
    start: usize,
    end: usize,
}

/// One constructed fragment. State ids refer to the resulting automaton; a
/// state merged away by concatenation is reported as the state it was merged
/// into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThompsonStep {
    pub description: String,
    pub start: StateId,
    pub end: StateId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThompsonResult {
    pub regex: Regex,
    pub automaton: Automaton,
    pub steps: Vec<ThompsonStep>,
}

/// Parses `expression` and builds its NFA. A parse error abandons the
/// construction.
pub fn thompson(expression: &str) -> Result<ThompsonResult> {
    let regex = Regex::parse(expression)?;
    Ok(build(&regex))
}

/// Builds the NFA of an already parsed expression.
pub fn build(regex: &Regex) -> ThompsonResult {
    let mut construction = Construction::default();
    let fragment = construction.lower(regex);
    let result = construction.finish(fragment, regex.clone());

    tracing::info!(
        regex = %regex,
        states = result.automaton.state_count(),
        "thompson construction done"
    );

    result
}

#[derive(Debug, Default)]
struct Construction {
    /// For every state created, the state it was merged into, if any.
    merged_into: Vec<Option<usize>>,
    edges: Vec<(usize, usize, String)>,
    /// Fragment steps with unresolved endpoints.
    steps: Vec<(String, Fragment)>,
}

impl Construction {
    fn new_state(&mut self) -> usize {
        self.merged_into.push(None);
        self.merged_into.len() - 1
    }

    fn resolve(&self, mut state: usize) -> usize {
        while let Some(target) = self.merged_into[state] {
            state = target;
        }
        state
    }

    fn epsilon(&mut self, from: usize, to: usize) {
        self.edges.push((from, to, EPSILON.to_string()));
    }

    fn record(&mut self, description: impl Into<String>, fragment: Fragment) -> Fragment {
        self.steps.push((description.into(), fragment));
        fragment
    }

    fn single_edge(&mut self, label: Option<char>) -> Fragment {
        let start = self.new_state();
        let end = self.new_state();
        match label {
            Some(c) => self.edges.push((start, end, c.to_string())),
            None => self.epsilon(start, end),
        }
        Fragment { start, end }
    }

    /// Fuses `right.start` into `left.end`, redirecting every edge that
    /// touches it.
    fn concat(&mut self, left: Fragment, right: Fragment) -> Fragment {
        for edge in self.edges.iter_mut() {
            if edge.0 == right.start {
                edge.0 = left.end;
            }
            if edge.1 == right.start {
                edge.1 = left.end;
            }
        }
        self.merged_into[right.start] = Some(left.end);

        Fragment {
            start: left.start,
            end: right.end,
        }
    }

    fn lower(&mut self, regex: &Regex) -> Fragment {
        match regex {
            Regex::Empty => {
                let start = self.new_state();
                let end = self.new_state();
                self.record("∅", Fragment { start, end })
            }
            Regex::Epsilon => {
                let f = self.single_edge(None);
                self.record(EPSILON, f)
            }
            Regex::Symbol(c) => {
                let f = self.single_edge(Some(*c));
                self.record(format!("symbol {c}"), f)
            }
            Regex::Concat(parts) => {
                let mut fragments = parts
                    .iter()
                    .map(|p| self.lower(p))
                    .collect::<Vec<_>>()
                    .into_iter();
                // An empty concatenation matches only the empty word.
                let Some(first) = fragments.next() else {
                    let f = self.single_edge(None);
                    return self.record(EPSILON, f);
                };
                let f = fragments.fold(first, |left, right| self.concat(left, right));
                self.record(format!("concatenation {regex}"), f)
            }
            Regex::Union(parts) => {
                let fragments = parts.iter().map(|p| self.lower(p)).collect::<Vec<_>>();
                let start = self.new_state();
                let end = self.new_state();
                for f in fragments {
                    self.epsilon(start, f.start);
                    self.epsilon(f.end, end);
                }
                self.record(format!("union {regex}"), Fragment { start, end })
            }
            Regex::Star(inner) | Regex::Plus(inner) | Regex::Optional(inner) => {
                let f = self.lower(inner);
                let start = self.new_state();
                let end = self.new_state();
                self.epsilon(start, f.start);
                self.epsilon(f.end, end);

                if !matches!(regex, Regex::Optional(_)) {
                    self.epsilon(f.end, f.start);
                }
                if !matches!(regex, Regex::Plus(_)) {
                    self.epsilon(start, end);
                }

                let kind = match regex {
                    Regex::Star(_) => "star",
                    Regex::Plus(_) => "plus",
                    _ => "optional",
                };
                self.record(format!("{kind} {regex}"), Fragment { start, end })
            }
        }
    }

    /// Numbers the surviving states `q0, q1, …` in creation order.
    fn finish(self, fragment: Fragment, regex: Regex) -> ThompsonResult {
        let start = self.resolve(fragment.start);
        let end = self.resolve(fragment.end);

        let mut builder = AutomatonBuilder::new();
        let mut output = vec![0; self.merged_into.len()];
        let survivors = (0..self.merged_into.len()).filter(|&s| self.merged_into[s].is_none());

        for (n, state) in survivors.enumerate() {
            let mut s = State::new(format!("q{n}")).with_accepting(state == end);
            if state == start {
                s = s.initial();
            }
            output[state] = builder.add_state(s);
        }

        let resolve = |state: usize| output[self.resolve(state)];

        for (from, to, label) in &self.edges {
            builder.add_transition(resolve(*from), resolve(*to), label.clone());
        }

        let steps = self
            .steps
            .iter()
            .map(|(description, f)| ThompsonStep {
                description: description.clone(),
                start: builder.id(resolve(f.start)).clone(),
                end: builder.id(resolve(f.end)).clone(),
            })
            .collect();

        ThompsonResult {
            regex,
            automaton: builder.finish(),
            steps,
        }
    }
}
