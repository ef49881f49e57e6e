//! Shortest-path engines
//!
//! Three engines share one reporting path: each fills a predecessor array for
//! the source, then [`backtrack_path`] walks it from the destination back to
//! the source. Edges along the way are looked up without regard to direction.
//!
//! Distances use [`UNREACHED`] (infinity) for nodes no path has reached. The
//! relaxation loops never add to an unreached distance, so the sentinel never
//! takes part in arithmetic.

use crate::model::graph::{DistanceMatrix, Graph, UNREACHED};
use crate::model::snapshot::Snapshot;
use crate::model::{Marks, NodeId};
use crate::runtime::context::RunContext;
use crate::runtime::errors::{unknown, EngineError, Infeasibility};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, warn};

/// A reconstructed path from source to destination
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub distance: f64,
    /// Node ids from source to destination
    pub nodes: Vec<NodeId>,
    /// Edge indices in path order
    pub edges: Vec<usize>,
}

/// Not reaching the destination is an outcome, not an error
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    Found(ShortestPath),
    Unreachable,
}

impl PathOutcome {
    pub fn distance(&self) -> Option<f64> {
        match self {
            PathOutcome::Found(path) => Some(path.distance),
            PathOutcome::Unreachable => None,
        }
    }
}

/// Result of the all-pairs engine: the full table plus the requested path
#[derive(Debug, Clone, PartialEq)]
pub struct AllPairs {
    pub distances: DistanceMatrix,
    pub path: PathOutcome,
}

fn snap(graph: &Graph) -> Snapshot {
    Snapshot::Graph {
        graph: graph.clone(),
        matrix: None,
    }
}

fn endpoints(graph: &Graph, source: NodeId, target: NodeId) -> Result<(usize, usize), EngineError> {
    let s = graph.index_of(source).ok_or_else(|| unknown(source))?;
    let t = graph.index_of(target).ok_or_else(|| unknown(target))?;
    Ok((s, t))
}

fn prepare(graph: &mut Graph, source: usize) {
    graph.clear_marks();
    graph.reset_distances();
    if let Some(node) = graph.node_at_mut(source) {
        node.distance = 0.0;
        node.marks.insert(Marks::TARGET);
    }
}

fn set_distance(graph: &mut Graph, index: usize, distance: f64) {
    if let Some(node) = graph.node_at_mut(index) {
        node.distance = distance;
    }
}

fn distance_at(graph: &Graph, index: usize) -> f64 {
    graph.node_at(index).map_or(UNREACHED, |n| n.distance)
}

fn mark_node(graph: &mut Graph, index: usize, marks: Marks) {
    if let Some(node) = graph.node_at_mut(index) {
        node.marks.insert(marks);
    }
}

fn mark_edge(graph: &mut Graph, edge: usize, marks: Marks) {
    if let Some(e) = graph.edge_mut(edge) {
        e.marks.insert(marks);
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest distance first
#[derive(Debug, Clone, Copy)]
struct Entry {
    distance: f64,
    node: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-queue shortest path. Stops as soon as `target` is extracted.
///
/// Weights must be non-negative; anything else is not a supported input.
pub fn dijkstra(ctx: &mut RunContext<'_>, graph: &mut Graph, source: NodeId, target: NodeId) -> Result<PathOutcome, EngineError> {
    let (s, t) = endpoints(graph, source, target)?;
    prepare(graph, s);
    ctx.checkpoint("start", snap(graph))?;

    let n = graph.node_count();
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    heap.push(Entry { distance: 0.0, node: s });

    while let Some(Entry { distance, node }) = heap.pop() {
        if settled[node] || distance > distance_at(graph, node) {
            continue;
        }
        settled[node] = true;
        graph.settle();
        mark_node(graph, node, Marks::CURRENT);
        ctx.visited();
        ctx.checkpoint(format!("extract {}", label(graph, node)), snap(graph))?;
        if node == t {
            break;
        }

        for arc in graph.arcs_from(node) {
            if settled[arc.to] {
                continue;
            }
            mark_edge(graph, arc.edge, Marks::CANDIDATE);
            ctx.compared();
            let candidate = distance + arc.weight;
            if candidate < distance_at(graph, arc.to) {
                set_distance(graph, arc.to, candidate);
                pred[arc.to] = Some(node);
                heap.push(Entry {
                    distance: candidate,
                    node: arc.to,
                });
                mark_node(graph, arc.to, Marks::CANDIDATE);
                ctx.checkpoint(format!("relax {}", label(graph, arc.to)), snap(graph))?;
            }
            if let Some(e) = graph.edge_mut(arc.edge) {
                e.marks.remove(Marks::CANDIDATE);
            }
        }
        mark_node(graph, node, Marks::VISITED);
    }

    report(ctx, graph, &pred, s, t)
}

/// Relax every arc up to `|V| - 1` times, stopping early after a quiet pass.
/// One more pass afterwards detects a negative-weight cycle.
pub fn bellman_ford(ctx: &mut RunContext<'_>, graph: &mut Graph, source: NodeId, target: NodeId) -> Result<PathOutcome, EngineError> {
    let (s, t) = endpoints(graph, source, target)?;
    prepare(graph, s);
    ctx.checkpoint("start", snap(graph))?;

    let n = graph.node_count();
    let arcs = graph.arcs();
    let mut pred: Vec<Option<usize>> = vec![None; n];

    for pass in 1..n {
        let mut updated = false;
        for arc in &arcs {
            let from = distance_at(graph, arc.from);
            if from == UNREACHED {
                continue;
            }
            ctx.compared();
            let candidate = from + arc.weight;
            if candidate < distance_at(graph, arc.to) {
                set_distance(graph, arc.to, candidate);
                pred[arc.to] = Some(arc.from);
                updated = true;
                graph.settle();
                mark_edge(graph, arc.edge, Marks::CANDIDATE);
                mark_node(graph, arc.to, Marks::CURRENT | Marks::VISITED);
                ctx.checkpoint(format!("relax {}", label(graph, arc.to)), snap(graph))?;
            }
        }
        graph.settle();
        ctx.checkpoint(format!("pass {} complete", pass), snap(graph))?;
        if !updated {
            debug!(pass, "no update, stopping early");
            break;
        }
    }

    for arc in &arcs {
        let from = distance_at(graph, arc.from);
        if from != UNREACHED && from + arc.weight < distance_at(graph, arc.to) {
            graph.settle();
            mark_edge(graph, arc.edge, Marks::CYCLE | Marks::INVALID);
            mark_node(graph, arc.to, Marks::INVALID);
            ctx.checkpoint("negative cycle detected", snap(graph))?;
            warn!("negative-weight cycle reachable from source");
            return Err(Infeasibility::NegativeCycle.into());
        }
    }

    report(ctx, graph, &pred, s, t)
}

/// All-pairs dynamic programming over intermediate nodes.
///
/// `pred[i][j]` is the node just before `j` on the best known path from `i`.
/// A negative diagonal entry afterwards means a negative-weight cycle.
pub fn floyd_warshall(ctx: &mut RunContext<'_>, graph: &mut Graph, source: NodeId, target: NodeId) -> Result<AllPairs, EngineError> {
    let (s, t) = endpoints(graph, source, target)?;
    prepare(graph, s);

    let n = graph.node_count();
    let mut dist: DistanceMatrix = vec![vec![UNREACHED; n]; n];
    let mut pred: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for arc in graph.arcs() {
        if arc.weight < dist[arc.from][arc.to] {
            dist[arc.from][arc.to] = arc.weight;
            pred[arc.from][arc.to] = Some(arc.from);
        }
    }
    let frame = |graph: &Graph, dist: &DistanceMatrix| Snapshot::Graph {
        graph: graph.clone(),
        matrix: Some(dist.clone()),
    };
    ctx.checkpoint("initial table", frame(graph, &dist))?;

    for k in 0..n {
        graph.settle();
        mark_node(graph, k, Marks::PIVOT);
        ctx.checkpoint(format!("through {}", label(graph, k)), frame(graph, &dist))?;
        for i in 0..n {
            for j in 0..n {
                let (ik, kj) = (dist[i][k], dist[k][j]);
                if ik == UNREACHED || kj == UNREACHED {
                    continue;
                }
                ctx.compared();
                if ik + kj < dist[i][j] {
                    dist[i][j] = ik + kj;
                    pred[i][j] = pred[k][j];
                    graph.settle();
                    mark_node(graph, k, Marks::PIVOT);
                    mark_node(graph, i, Marks::CURRENT);
                    mark_node(graph, j, Marks::CURRENT);
                    ctx.checkpoint(
                        format!("{} -> {} via {}", label(graph, i), label(graph, j), label(graph, k)),
                        frame(graph, &dist),
                    )?;
                }
            }
        }
    }

    if let Some(i) = (0..n).find(|&i| dist[i][i] < 0.0) {
        graph.settle();
        mark_node(graph, i, Marks::CYCLE | Marks::INVALID);
        ctx.checkpoint("negative cycle detected", frame(graph, &dist))?;
        warn!(node = %label(graph, i), "negative-weight cycle in distance table");
        return Err(Infeasibility::NegativeCycle.into());
    }

    for (j, &d) in dist[s].iter().enumerate() {
        set_distance(graph, j, d);
    }
    let path = report(ctx, graph, &pred[s], s, t)?;
    Ok(AllPairs {
        distances: dist,
        path,
    })
}

/// Walk `pred` back from `target` to `source`.
///
/// Returns the node ids and edge indices in forward order, or `None` when the
/// chain breaks or loops before reaching the source.
pub fn backtrack_path(graph: &Graph, pred: &[Option<usize>], source: usize, target: usize) -> Option<(Vec<NodeId>, Vec<usize>)> {
    let mut nodes = vec![target];
    let mut seen = FxHashSet::default();
    seen.insert(target);
    let mut cursor = target;
    while cursor != source {
        let prev = (*pred.get(cursor)?)?;
        if !seen.insert(prev) {
            return None;
        }
        nodes.push(prev);
        cursor = prev;
    }
    nodes.reverse();

    let ids: Vec<NodeId> = nodes
        .iter()
        .map(|&i| graph.node_at(i).map(|n| n.id))
        .collect::<Option<_>>()?;
    let edges = ids
        .windows(2)
        .map(|w| graph.find_edge(w[0], w[1]))
        .collect::<Option<_>>()?;
    Some((ids, edges))
}

fn report(ctx: &mut RunContext<'_>, graph: &mut Graph, pred: &[Option<usize>], source: usize, target: usize) -> Result<PathOutcome, EngineError> {
    graph.settle();
    let distance = distance_at(graph, target);
    let path = if distance == UNREACHED {
        None
    } else {
        backtrack_path(graph, pred, source, target)
    };

    let Some((nodes, edges)) = path else {
        ctx.checkpoint(format!("{} unreachable", label(graph, target)), snap(graph))?;
        debug!(target = %label(graph, target), "destination unreachable");
        return Ok(PathOutcome::Unreachable);
    };

    for &id in &nodes {
        if let Some(i) = graph.index_of(id) {
            mark_node(graph, i, Marks::SHORTEST_PATH);
        }
    }
    for &edge in &edges {
        mark_edge(graph, edge, Marks::SHORTEST_PATH);
    }
    ctx.checkpoint(format!("shortest path {}", distance), snap(graph))?;
    debug!(distance, hops = edges.len(), "shortest path found");
    Ok(PathOutcome::Found(ShortestPath { distance, nodes, edges }))
}

fn label(graph: &Graph, index: usize) -> String {
    graph.node_at(index).map_or_else(|| format!("#{}", index), |n| n.label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::sink::RecordingSink;

    #[test]
    fn entries_pop_smallest_first() {
        let mut heap = BinaryHeap::new();
        for (distance, node) in [(3.0, 0), (1.0, 1), (2.0, 2)] {
            heap.push(Entry { distance, node });
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn source_equals_target() {
        let mut graph = Graph::new(false);
        let a = graph.add_node("A");
        let mut sink = RecordingSink::new();
        let mut ctx = RunContext::detached(&mut sink);
        let outcome = dijkstra(&mut ctx, &mut graph, a, a).unwrap();
        assert_eq!(outcome.distance(), Some(0.0));
    }

    #[test]
    fn broken_predecessor_chain_is_none() {
        let mut graph = Graph::new(true);
        graph.add_node("A");
        graph.add_node("B");
        assert_eq!(backtrack_path(&graph, &[None, None], 0, 1), None);
        // a loop in the table terminates too
        assert_eq!(backtrack_path(&graph, &[Some(1), Some(0)], 2, 1), None);
    }
}
