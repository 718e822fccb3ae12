//! Seeded random automata for property tests.

use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::automaton::{Automaton, EPSILON, State, StateId};

#[derive(Debug, Clone, PartialEq)]
pub struct RandomOptions {
    pub seed: u64,
    pub state_count: usize,
    pub alphabet: Vec<char>,
    /// Number of symbol transitions per state.
    pub transitions_per_state: usize,
    /// Probability that a state gets an additional epsilon transition.
    pub epsilon_probability: f64,
    pub accepting_probability: f64,
}

impl Default for RandomOptions {
    fn default() -> Self {
        RandomOptions {
            seed: 1,
            state_count: 5,
            alphabet: vec!['a', 'b'],
            transitions_per_state: 2,
            epsilon_probability: 0.2,
            accepting_probability: 0.3,
        }
    }
}

impl RandomOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_state_count(mut self, state_count: usize) -> Self {
        self.state_count = state_count;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Vec<char>) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_transitions_per_state(mut self, transitions_per_state: usize) -> Self {
        self.transitions_per_state = transitions_per_state;
        self
    }

    pub fn with_epsilon_probability(mut self, epsilon_probability: f64) -> Self {
        self.epsilon_probability = epsilon_probability;
        self
    }
}

/// Generates `count` random NFAs with states `q0..` where `q0` is initial.
pub fn generate_random_nfas(options: &RandomOptions, count: usize) -> Vec<Automaton> {
    let mut r = StdRng::seed_from_u64(options.seed);

    (0..count)
        .map(|_| {
            let mut automaton = Automaton::new();

            let states = (0..options.state_count)
                .map(|i| {
                    let state = State::new(format!("q{i}"))
                        .with_accepting(r.random_bool(options.accepting_probability));
                    automaton.add_state(if i == 0 { state.initial() } else { state })
                })
                .collect::<Vec<StateId>>();

            if states.is_empty() || options.alphabet.is_empty() {
                return automaton;
            }

            for from in &states {
                for _ in 0..options.transitions_per_state {
                    let to = &states[r.random_range(0..states.len())];
                    let symbol = options.alphabet[r.random_range(0..options.alphabet.len())];
                    automaton.add_edge(from, to, [symbol.to_string()]);
                }

                if r.random_bool(options.epsilon_probability) {
                    let to = &states[r.random_range(0..states.len())];
                    automaton.add_edge(from, to, [EPSILON]);
                }
            }

            automaton
        })
        .collect()
}
