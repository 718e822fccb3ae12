//! Conversion of a finite automaton into a right-linear grammar, the format
//! consumed by grammar tooling.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, StateId},
    error::Result,
    label::{PlainEntry, plain::EPSILON_CHAR},
    simulation,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Production {
    pub head: String,
    /// `aQ`, a unit production `Q`, or `ε`.
    pub body: String,
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.head, self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    /// `S` if the automaton has an initial state.
    pub start: Option<String>,
    /// The nonterminal of every state, in state order.
    pub nonterminals: Vec<(StateId, String)>,
    pub productions: Vec<Production>,
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for production in &self.productions {
            writeln!(f, "{production}")?;
        }
        Ok(())
    }
}

/// Names for non-initial states: `A` to `Z` without `S`, then `N0`, `N1`, ….
fn nonterminal_names() -> impl Iterator<Item = String> {
    ('A'..='Z')
        .filter(|&c| c != 'S')
        .map(String::from)
        .chain((0..).map(|i| format!("N{i}")))
}

/// Every transition `p -a-> q` becomes `P → aQ`, every epsilon transition
/// `P → Q`, and every accepting state gets `P → ε`. Productions of the start
/// symbol come first.
pub fn fa_to_grammar(automaton: &Automaton) -> Result<Grammar> {
    let index = simulation::compile(automaton)?;

    let mut names = nonterminal_names();
    let nonterminal = index
        .node_indices()
        .map(|node| {
            if Some(node) == index.initial() {
                String::from("S")
            } else {
                names.next().unwrap_or_default()
            }
        })
        .collect::<Vec<_>>();

    let order = index
        .initial()
        .into_iter()
        .chain(index.node_indices().filter(|&n| Some(n) != index.initial()));

    let mut productions = vec![];
    for node in order {
        let head = &nonterminal[node.index()];

        for (target, entry) in index.outgoing(node) {
            let target = &nonterminal[target.index()];
            let body = match entry.entry {
                PlainEntry::Symbol(c) => format!("{c}{target}"),
                PlainEntry::Epsilon => target.clone(),
            };
            let production = Production {
                head: head.clone(),
                body,
            };
            if !productions.contains(&production) {
                productions.push(production);
            }
        }

        if index.is_accepting(node) {
            productions.push(Production {
                head: head.clone(),
                body: EPSILON_CHAR.to_string(),
            });
        }
    }

    tracing::debug!(productions = productions.len(), "converted automaton to grammar");

    Ok(Grammar {
        start: index.initial().map(|_| String::from("S")),
        nonterminals: index
            .node_indices()
            .map(|node| (index.id(node).clone(), nonterminal[node.index()].clone()))
            .collect(),
        productions,
    })
}
