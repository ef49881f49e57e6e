//! Weighted graph for the shortest-path engines
//!
//! Nodes carry a running `distance` estimate that starts at [`UNREACHED`].
//! Edges reference node ids and are validated on insertion, so an edge can never
//! name a node that does not exist.

use super::{Marks, NodeId, CANVAS_WIDTH};
use crate::runtime::errors::{unknown, EngineError, InvalidInput};
use rand::Rng;
use rustc_hash::FxHashMap;

/// Sentinel distance for a node no path has reached yet
pub const UNREACHED: f64 = f64::INFINITY;

/// All-pairs distance table indexed by node position
pub type DistanceMatrix = Vec<Vec<f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    pub marks: Marks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
    pub marks: Marks,
}

impl GraphEdge {
    /// Whether this edge joins `a` and `b` in either direction
    pub fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// One usable direction of an edge: `from` index, `to` index, weight, edge index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
    pub edge: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: FxHashMap<NodeId, usize>,
    directed: bool,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Graph {
            directed,
            ..Graph::default()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        let id = NodeId::fresh();
        self.index.insert(id, self.nodes.len());
        self.nodes.push(GraphNode {
            id,
            label: label.into(),
            x: 0.0,
            y: 0.0,
            distance: UNREACHED,
            marks: Marks::empty(),
        });
        id
    }

    /// Add an edge between two existing nodes and return its index
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> Result<usize, EngineError> {
        for id in [source, target] {
            if !self.index.contains_key(&id) {
                return Err(unknown(id));
            }
        }
        let duplicate = self.edges.iter().any(|e| {
            if self.directed {
                e.source == source && e.target == target
            } else {
                e.joins(source, target)
            }
        });
        if duplicate {
            return Err(InvalidInput::DuplicateKey(target).into());
        }
        self.edges.push(GraphEdge {
            source,
            target,
            weight,
            marks: Marks::empty(),
        });
        Ok(self.edges.len() - 1)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn node_at(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn node_at_mut(&mut self, index: usize) -> Option<&mut GraphNode> {
        self.nodes.get_mut(index)
    }

    pub fn edge_mut(&mut self, index: usize) -> Option<&mut GraphEdge> {
        self.edges.get_mut(index)
    }

    pub fn node_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.label == label).map(|n| n.id)
    }

    /// Every usable direction of every edge; undirected edges yield two arcs
    pub fn arcs(&self) -> Vec<Arc> {
        let mut out = Vec::with_capacity(self.edges.len() * 2);
        for (edge, e) in self.edges.iter().enumerate() {
            let (Some(a), Some(b)) = (self.index_of(e.source), self.index_of(e.target)) else {
                continue;
            };
            out.push(Arc {
                from: a,
                to: b,
                weight: e.weight,
                edge,
            });
            if !self.directed {
                out.push(Arc {
                    from: b,
                    to: a,
                    weight: e.weight,
                    edge,
                });
            }
        }
        out
    }

    /// Arcs leaving the node at `index`
    pub fn arcs_from(&self, index: usize) -> Vec<Arc> {
        self.arcs().into_iter().filter(|a| a.from == index).collect()
    }

    /// Undirected lookup of the edge joining two nodes
    pub fn find_edge(&self, a: NodeId, b: NodeId) -> Option<usize> {
        self.edges.iter().position(|e| e.joins(a, b))
    }

    pub fn reset_distances(&mut self) {
        for node in &mut self.nodes {
            node.distance = UNREACHED;
        }
    }

    pub fn settle(&mut self) {
        for node in &mut self.nodes {
            node.marks.settle();
        }
        for edge in &mut self.edges {
            edge.marks.settle();
        }
    }

    pub fn clear_marks(&mut self) {
        for node in &mut self.nodes {
            node.marks = Marks::empty();
        }
        for edge in &mut self.edges {
            edge.marks = Marks::empty();
        }
    }

    /// Place nodes evenly on a circle
    pub fn layout_circle(&mut self) {
        let n = self.nodes.len().max(1) as f64;
        let center = CANVAS_WIDTH / 2.0;
        let radius = CANVAS_WIDTH * 0.4;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            let angle = std::f64::consts::TAU * i as f64 / n;
            node.x = center + radius * angle.cos();
            node.y = center + radius * angle.sin();
        }
    }

    /// A connected random graph: a random spanning tree plus `extra` chords.
    ///
    /// When `negative` is set (directed graphs only), roughly one edge in five
    /// gets a small negative weight.
    pub fn random<R: Rng>(rng: &mut R, nodes: usize, extra: usize, directed: bool, negative: bool) -> Result<Self, EngineError> {
        let mut graph = Graph::new(directed);
        let ids: Vec<NodeId> = (0..nodes).map(|i| graph.add_node(label_for(i))).collect();
        for i in 1..ids.len() {
            let j = rng.gen_range(0..i);
            let weight = random_weight(rng, directed && negative);
            // spanning edges point away from the first node so everything is reachable
            graph.add_edge(ids[j], ids[i], weight)?;
        }
        let mut attempts = extra * 4;
        let mut added = 0;
        while added < extra && attempts > 0 && ids.len() > 1 {
            attempts -= 1;
            let a = rng.gen_range(0..ids.len());
            let b = rng.gen_range(0..ids.len());
            if a == b {
                continue;
            }
            let weight = random_weight(rng, directed && negative);
            if graph.add_edge(ids[a], ids[b], weight).is_ok() {
                added += 1;
            }
        }
        graph.layout_circle();
        Ok(graph)
    }
}

fn random_weight<R: Rng>(rng: &mut R, negative: bool) -> f64 {
    if negative && rng.gen_ratio(1, 5) {
        -(rng.gen_range(1..=3) as f64)
    } else {
        rng.gen_range(1..=20) as f64
    }
}

/// `A`, `B`, ..., `Z`, `A1`, `B1`, ...
pub fn label_for(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    match index / 26 {
        0 => letter.to_string(),
        n => format!("{}{}", letter, n),
    }
}
