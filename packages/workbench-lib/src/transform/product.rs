//! Product construction for boolean combinations of two DFAs.

use std::{borrow::Cow, collections::VecDeque, fmt::Display, str::FromStr};

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, State},
    error::Result,
    simulation::{self, FiniteIndex},
    transform::{AutomatonBuilder, ConstructionStep, complete, subset, thompson},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOperation {
    Union,
    Intersection,
    /// Words of A that are not in B.
    Difference,
    /// Words over A's alphabet that A rejects. B is ignored.
    Complement,
}

impl BooleanOperation {
    pub fn accepts(&self, a: bool, b: bool) -> bool {
        match self {
            BooleanOperation::Union => a || b,
            BooleanOperation::Intersection => a && b,
            BooleanOperation::Difference => a && !b,
            BooleanOperation::Complement => !a,
        }
    }
}

impl FromStr for BooleanOperation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "union" => Ok(BooleanOperation::Union),
            "intersection" => Ok(BooleanOperation::Intersection),
            "difference" => Ok(BooleanOperation::Difference),
            "complement" => Ok(BooleanOperation::Complement),
            _ => Err(format!("Invalid boolean operation: {}", s)),
        }
    }
}

impl Display for BooleanOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BooleanOperation::Union => write!(f, "union"),
            BooleanOperation::Intersection => write!(f, "intersection"),
            BooleanOperation::Difference => write!(f, "difference"),
            BooleanOperation::Complement => write!(f, "complement"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResult {
    pub automaton: Automaton,
    pub operation: BooleanOperation,
    pub alphabet: Vec<char>,
    pub steps: Vec<ConstructionStep>,
}

/// Combines `a` and `b`. Non-deterministic operands are determinized and
/// both operands are completed over the union of their alphabets before the
/// pairs are explored.
pub fn combine(a: &Automaton, b: &Automaton, operation: BooleanOperation) -> Result<ProductResult> {
    let a = deterministic(a)?;
    if operation == BooleanOperation::Complement {
        return complement_deterministic(&a);
    }
    let b = deterministic(b)?;

    let mut alphabet = simulation::alphabet(&simulation::compile(&a)?);
    alphabet.extend(simulation::alphabet(&simulation::compile(&b)?));
    alphabet.sort();
    alphabet.dedup();

    let a = complete::complete_with_alphabet(&a, &alphabet)?.automaton;
    let b = complete::complete_with_alphabet(&b, &alphabet)?.automaton;
    let a_index = simulation::compile(&a)?;
    let b_index = simulation::compile(&b)?;

    Ok(explore(&a_index, Some(&b_index), &alphabet, operation))
}

/// Combines `a` with the language of a regular expression, which is turned
/// into a DFA by Thompson's and subset construction.
pub fn combine_with_regex(
    a: &Automaton,
    expression: &str,
    operation: BooleanOperation,
) -> Result<ProductResult> {
    let nfa = thompson::thompson(expression)?.automaton;
    let b = subset::subset_construction(&nfa)?.automaton;
    combine(a, &b, operation)
}

pub fn complement(a: &Automaton) -> Result<ProductResult> {
    let a = deterministic(a)?;
    complement_deterministic(&a)
}

fn complement_deterministic(a: &Automaton) -> Result<ProductResult> {
    let alphabet = simulation::alphabet(&simulation::compile(a)?);
    let a = complete::complete_with_alphabet(a, &alphabet)?.automaton;
    let a_index = simulation::compile(&a)?;
    Ok(explore(&a_index, None, &alphabet, BooleanOperation::Complement))
}

fn deterministic(automaton: &Automaton) -> Result<Cow<'_, Automaton>> {
    let index = simulation::compile(automaton)?;
    if simulation::is_deterministic(&index) {
        Ok(Cow::Borrowed(automaton))
    } else {
        tracing::debug!("determinizing product operand");
        Ok(Cow::Owned(subset::determinize(&index).automaton))
    }
}

fn successor(index: &FiniteIndex, state: NodeIndex, symbol: char) -> Option<NodeIndex> {
    index
        .outgoing(state)
        .find(|(_, entry)| entry.entry.matches(symbol))
        .map(|(target, _)| target)
}

type Pair = (NodeIndex, Option<NodeIndex>);

/// Breadth-first over reachable pairs of complete DFAs. `b` is `None` for
/// the complement, in which case the pairs degenerate to single states.
fn explore(
    a: &FiniteIndex,
    b: Option<&FiniteIndex>,
    alphabet: &[char],
    operation: BooleanOperation,
) -> ProductResult {
    let mut builder = AutomatonBuilder::new();
    let mut steps = vec![];

    let initial = match (a.initial(), b) {
        (Some(p), None) => Some((p, None)),
        (Some(p), Some(b)) => b.initial().map(|q| (p, Some(q))),
        (None, _) => None,
    };
    let Some(initial) = initial else {
        return ProductResult {
            automaton: builder.finish(),
            operation,
            alphabet: alphabet.to_vec(),
            steps,
        };
    };

    let pair_state = |(p, q): Pair| {
        let (id, label, b_accepts) = match (q, b) {
            (Some(q), Some(b)) => (
                format!("({},{})", a.id(p), b.id(q)),
                format!("({},{})", a.state(p).label, b.state(q).label),
                b.is_accepting(q),
            ),
            _ => (a.id(p).to_string(), a.state(p).label.clone(), false),
        };
        State::new(id)
            .with_label(label)
            .with_accepting(operation.accepts(a.is_accepting(p), b_accepts))
    };

    let mut known: HashMap<Pair, usize> = HashMap::new();
    let mut queue = VecDeque::new();

    let first = builder.add_state(pair_state(initial).initial());
    known.insert(initial, first);
    queue.push_back(initial);

    while let Some(pair @ (p, q)) = queue.pop_front() {
        let from = known[&pair];

        for &symbol in alphabet {
            // both operands are complete, so a missing successor cannot occur
            let Some(p_next) = successor(a, p, symbol) else {
                continue;
            };
            let q_next = match (q, b) {
                (Some(q), Some(b)) => match successor(b, q, symbol) {
                    Some(next) => Some(next),
                    None => continue,
                },
                _ => None,
            };
            let target = (p_next, q_next);

            let is_new = !known.contains_key(&target);
            let to = if let Some(&to) = known.get(&target) {
                to
            } else {
                let to = builder.add_state(pair_state(target));
                known.insert(target, to);
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

    tracing::info!(%operation, states = known.len(), "product construction done");

    ProductResult {
        automaton: builder.finish(),
        operation,
        alphabet: alphabet.to_vec(),
        steps,
    }
}
