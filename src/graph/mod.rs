//! Toy depot graph and its force-directed layout.
//!
//! The graph is decorative: a fixed depot feeding two bays, each bay feeding
//! one track. It never depends on any input.

pub mod layout;

pub use layout::{spring_layout, GraphLayout, DEFAULT_LAYOUT_SEED};

/// Undirected graph with nodes in first-seen order of the edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepotGraph {
    pub nodes: Vec<String>,
    /// Edges as index pairs into `nodes`.
    pub edges: Vec<(usize, usize)>,
}

const DEPOT_EDGES: [(&str, &str); 4] = [
    ("Depot", "Bay1"),
    ("Depot", "Bay2"),
    ("Bay1", "Track1"),
    ("Bay2", "Track2"),
];

impl DepotGraph {
    /// The fixed five-node, four-edge depot.
    pub fn toy() -> Self {
        Self::from_edges(&DEPOT_EDGES)
    }

    pub fn from_edges(edges: &[(&str, &str)]) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            edges: Vec::with_capacity(edges.len()),
        };
        for &(a, b) in edges {
            let ia = graph.node_index_or_insert(a);
            let ib = graph.node_index_or_insert(b);
            if ia != ib && !graph.has_edge(ia, ib) {
                graph.edges.push((ia, ib));
            }
        }
        graph
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edges
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    fn node_index_or_insert(&mut self, name: &str) -> usize {
        match self.nodes.iter().position(|n| n == name) {
            Some(i) => i,
            None => {
                self.nodes.push(name.to_string());
                self.nodes.len() - 1
            }
        }
    }
}
