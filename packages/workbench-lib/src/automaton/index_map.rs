use petgraph::graph::NodeIndex;

/// A dense map from the node indices of one automaton to some data. The index
/// space is compact (`0..len`), so a [Vec] is all that is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap<V> {
    data: Vec<Option<V>>,
}

impl<V: Clone> IndexMap<V> {
    pub fn new(len: usize) -> Self {
        IndexMap {
            data: vec![None; len],
        }
    }

    pub fn get(&self, key: NodeIndex) -> Option<&V> {
        self.data.get(key.index()).and_then(|v| v.as_ref())
    }

    pub fn insert(&mut self, key: NodeIndex, value: V) {
        self.data[key.index()] = Some(value);
    }
}
