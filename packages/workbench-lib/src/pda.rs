//! Nondeterministic pushdown automaton simulation as a breadth-first search
//! over configurations.
//!
//! Configurations live in an arena and reference their parent by id, which
//! lets the path to any configuration be reconstructed for display. The
//! search is bounded by a cap on the total number of configurations created,
//! so epsilon cycles that keep branching cannot run forever.

use std::fmt::Display;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, StateId, index::AutomatonIndex},
    config::PdaConfig,
    error::Result,
    label::PdaEntry,
};

pub type PdaIndex<'a> = AutomatonIndex<'a, PdaEntry>;

pub fn compile(automaton: &Automaton) -> Result<PdaIndex<'_>> {
    AutomatonIndex::build(automaton)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptanceCriterion {
    /// Input consumed and the current state is accepting.
    #[default]
    FinalState,
    /// Input consumed and the stack is empty.
    EmptyStack,
}

/// One branch of the nondeterministic execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub id: usize,
    pub state: NodeIndex,
    /// Stack contents, top first.
    pub stack: Vec<char>,
    /// Number of input symbols consumed so far.
    pub position: usize,
    pub parent: Option<usize>,
    /// Label of the transition that produced this configuration.
    pub transition: Option<String>,
}

impl Configuration {
    pub fn stack_string(&self) -> String {
        self.stack.iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdaStatus {
    Running,
    Accepted,
    Rejected,
    /// The configuration cap was hit. Not a refutation of the input.
    LimitExceeded,
}

impl Display for PdaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdaStatus::Running => write!(f, "running"),
            PdaStatus::Accepted => write!(f, "accepted"),
            PdaStatus::Rejected => write!(f, "rejected"),
            PdaStatus::LimitExceeded => write!(f, "configuration limit exceeded"),
        }
    }
}

/// The state of one configuration search. Every round consumes the value and
/// returns the successor, the automaton itself is never touched.
#[derive(Debug, Clone)]
pub struct PdaSimulation {
    config: PdaConfig,
    input: Vec<char>,
    configurations: Vec<Configuration>,
    live: Vec<usize>,
    accepted: Vec<usize>,
    rejected: Vec<usize>,
    rounds: usize,
    limit_hit: bool,
}

impl PdaSimulation {
    /// Creates the root configuration in the initial state. Without an initial
    /// state the search is immediately done and rejects.
    pub fn start(index: &PdaIndex, input: &str, config: &PdaConfig) -> Self {
        let mut simulation = PdaSimulation {
            config: config.clone(),
            input: input.chars().collect(),
            configurations: vec![],
            live: vec![],
            accepted: vec![],
            rejected: vec![],
            rounds: 0,
            limit_hit: false,
        };

        if let Some(initial) = index.initial() {
            simulation.configurations.push(Configuration {
                id: 0,
                state: initial,
                stack: config.initial_stack.chars().collect(),
                position: 0,
                parent: None,
                transition: None,
            });
            simulation.live.push(0);
        }

        simulation
    }

    /// Runs one breadth-first round over all live configurations.
    pub fn step(mut self, index: &PdaIndex) -> Self {
        if self.is_done() {
            return self;
        }

        let live = std::mem::take(&mut self.live);
        let mut next = vec![];

        for id in live {
            if self.limit_hit {
                break;
            }

            let (state, position, stack) = {
                let c = &self.configurations[id];
                (c.state, c.position, c.stack.clone())
            };

            if position == self.input.len() && self.satisfies_acceptance(index, state, &stack) {
                self.accepted.push(id);
                continue;
            }

            let lookahead = self.input.get(position).copied();
            let mut expanded = false;

            for (target, entry) in index.outgoing(state) {
                let t = &entry.entry;
                let input_matches = t.input.is_none() || t.input == lookahead;
                let pop_matches = t.pop.is_none() || t.pop.as_ref() == stack.first();
                if !input_matches || !pop_matches {
                    continue;
                }
                expanded = true;

                if self.configurations.len() >= self.config.max_configurations {
                    tracing::warn!(
                        cap = self.config.max_configurations,
                        round = self.rounds,
                        "configuration limit exceeded, halting search"
                    );
                    self.limit_hit = true;
                    break;
                }

                let popped = usize::from(t.pop.is_some());
                let mut new_stack = t.push.chars().collect::<Vec<_>>();
                new_stack.extend_from_slice(&stack[popped..]);

                let child = self.configurations.len();
                let child_position = position + usize::from(t.input.is_some());
                // Checked on creation so an accepting child survives a cap hit later this round.
                let accepting = child_position == self.input.len()
                    && self.satisfies_acceptance(index, target, &new_stack);
                self.configurations.push(Configuration {
                    id: child,
                    state: target,
                    stack: new_stack,
                    position: child_position,
                    parent: Some(id),
                    transition: Some(t.to_string()),
                });
                if accepting {
                    self.accepted.push(child);
                } else {
                    next.push(child);
                }
            }

            if !expanded {
                self.rejected.push(id);
            }
        }

        self.live = next;
        self.rounds += 1;

        tracing::debug!(
            round = self.rounds,
            live = self.live.len(),
            accepted = self.accepted.len(),
            rejected = self.rejected.len(),
            total = self.configurations.len(),
            "pda round"
        );

        if self.is_done() {
            tracing::info!(status = %self.status(), rounds = self.rounds, "pda search done");
        }

        self
    }

    /// Performs up to the configured number of rounds, stopping early once the
    /// search is done.
    pub fn fast_run(mut self, index: &PdaIndex) -> Self {
        for _ in 0..self.config.fast_run_rounds {
            if self.is_done() {
                break;
            }
            self = self.step(index);
        }
        self
    }

    /// Runs rounds until the search is done. Terminates because every round
    /// either resolves all live configurations or creates new ones, and
    /// creation is capped.
    pub fn run(mut self, index: &PdaIndex) -> Self {
        while !self.is_done() {
            self = self.step(index);
        }
        self
    }

    fn satisfies_acceptance(&self, index: &PdaIndex, state: NodeIndex, stack: &[char]) -> bool {
        match self.config.acceptance {
            AcceptanceCriterion::FinalState => index.is_accepting(state),
            AcceptanceCriterion::EmptyStack => stack.is_empty(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.live.is_empty() || self.limit_hit
    }

    /// True if at least one configuration was accepted.
    pub fn is_accepted(&self) -> bool {
        !self.accepted.is_empty()
    }

    pub fn status(&self) -> PdaStatus {
        if self.limit_hit {
            PdaStatus::LimitExceeded
        } else if !self.live.is_empty() {
            PdaStatus::Running
        } else if self.is_accepted() {
            PdaStatus::Accepted
        } else {
            PdaStatus::Rejected
        }
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn configuration(&self, id: usize) -> Option<&Configuration> {
        self.configurations.get(id)
    }

    pub fn live(&self) -> impl Iterator<Item = &Configuration> {
        self.live.iter().map(|&id| &self.configurations[id])
    }

    pub fn accepted(&self) -> impl Iterator<Item = &Configuration> {
        self.accepted.iter().map(|&id| &self.configurations[id])
    }

    pub fn rejected(&self) -> impl Iterator<Item = &Configuration> {
        self.rejected.iter().map(|&id| &self.configurations[id])
    }

    /// The configurations from the root to `id`, following parent links.
    pub fn trace(&self, id: usize) -> Vec<&Configuration> {
        let mut path = vec![];
        let mut current = self.configurations.get(id);

        while let Some(configuration) = current {
            path.push(configuration);
            current = configuration
                .parent
                .and_then(|parent| self.configurations.get(parent));
        }

        path.reverse();
        path
    }
}

/// A configuration with state ids resolved, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationView {
    pub state: StateId,
    pub stack: String,
    pub position: usize,
    pub transition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdaOutcome {
    pub accepted: bool,
    pub status: PdaStatus,
    pub rounds: usize,
    pub configurations: usize,
    /// Path to the first accepted configuration, if any.
    pub accepting_path: Option<Vec<ConfigurationView>>,
}

/// Validates `automaton` and searches until done.
pub fn run(automaton: &Automaton, input: &str, config: &PdaConfig) -> Result<PdaOutcome> {
    let index = compile(automaton)?;
    let simulation = PdaSimulation::start(&index, input, config).run(&index);

    let accepting_path = simulation.accepted().next().map(|accepted| {
        simulation
            .trace(accepted.id)
            .into_iter()
            .map(|c| ConfigurationView {
                state: index.id(c.state).clone(),
                stack: c.stack_string(),
                position: c.position,
                transition: c.transition.clone(),
            })
            .collect()
    });

    Ok(PdaOutcome {
        accepted: simulation.is_accepted(),
        status: simulation.status(),
        rounds: simulation.rounds(),
        configurations: simulation.configurations().len(),
        accepting_path,
    })
}
