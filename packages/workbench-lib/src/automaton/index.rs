use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use crate::{
    automaton::{Automaton, State, StateId},
    error::{Result, ValidationError},
    label::LabelCodec,
};

/// One parsed label of an edge, stored as a petgraph edge weight.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry<E> {
    /// Position of the originating edge in [Automaton::edges].
    pub edge: usize,
    /// Position of the label within that edge.
    pub label: usize,
    pub entry: E,
}

/// A validated, parsed view of an [Automaton], built once at the entry of
/// every engine call.
///
/// Node `i` of the graph is `automaton.states[i]`, so node indices follow the
/// stable enumeration order of the snapshot and can be used directly as
/// canonical keys. Outgoing transitions are kept in edge/label order.
#[derive(Debug, Clone)]
pub struct AutomatonIndex<'a, E> {
    automaton: &'a Automaton,
    pub graph: DiGraph<(), IndexedEntry<E>>,
    outgoing: Vec<Vec<(EdgeIndex, NodeIndex)>>,
    ids: HashMap<&'a StateId, NodeIndex>,
    initial: Option<NodeIndex>,
}

impl<'a, E: LabelCodec> AutomatonIndex<'a, E> {
    /// Validates the snapshot and parses every edge label with the codec `E`.
    ///
    /// Rejects duplicate state ids, edges with unknown endpoints and more than
    /// one initial state. A missing initial state is accepted.
    pub fn build(automaton: &'a Automaton) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(automaton.state_count(), automaton.edge_count());
        let mut ids = HashMap::with_capacity(automaton.state_count());

        for state in &automaton.states {
            let node = graph.add_node(());
            if ids.insert(&state.id, node).is_some() {
                return Err(ValidationError::DuplicateState(state.id.clone()).into());
            }
        }

        let initials = automaton
            .states
            .iter()
            .filter(|s| s.is_initial)
            .map(|s| s.id.clone())
            .collect::<Vec<_>>();
        if initials.len() > 1 {
            return Err(ValidationError::MultipleInitialStates(initials).into());
        }
        let initial = automaton
            .states
            .iter()
            .position(|s| s.is_initial)
            .map(NodeIndex::new);

        let mut outgoing = vec![vec![]; automaton.state_count()];

        for (edge_index, edge) in automaton.edges.iter().enumerate() {
            let endpoint = |id: &StateId| {
                ids.get(id).copied().ok_or_else(|| ValidationError::DanglingEdge {
                    edge: edge.id.clone(),
                    state: id.clone(),
                })
            };
            let from = endpoint(&edge.from)?;
            let to = endpoint(&edge.to)?;

            for (label_index, label) in edge.labels.iter().enumerate() {
                let entry = E::parse(label)?;
                let e = graph.add_edge(
                    from,
                    to,
                    IndexedEntry {
                        edge: edge_index,
                        label: label_index,
                        entry,
                    },
                );
                outgoing[from.index()].push((e, to));
            }
        }

        Ok(AutomatonIndex {
            automaton,
            graph,
            outgoing,
            ids,
            initial,
        })
    }
}

impl<'a, E> AutomatonIndex<'a, E> {
    pub fn automaton(&self) -> &'a Automaton {
        self.automaton
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    pub fn state(&self, node: NodeIndex) -> &'a State {
        &self.automaton.states[node.index()]
    }

    pub fn id(&self, node: NodeIndex) -> &'a StateId {
        &self.state(node).id
    }

    pub fn node_of(&self, id: &StateId) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    pub fn initial(&self) -> Option<NodeIndex> {
        self.initial
    }

    pub fn is_accepting(&self, node: NodeIndex) -> bool {
        self.state(node).is_accepting
    }

    /// Outgoing transitions of `node` as `(target, entry)` in snapshot order.
    pub fn outgoing(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, &IndexedEntry<E>)> {
        self.outgoing[node.index()]
            .iter()
            .map(|&(e, target)| (target, &self.graph[e]))
    }

    /// Every transition as `(source, target, entry)`, grouped by source state.
    pub fn transitions(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &IndexedEntry<E>)> {
        self.node_indices().flat_map(move |node| {
            self.outgoing(node)
                .map(move |(target, entry)| (node, target, entry))
        })
    }
}
