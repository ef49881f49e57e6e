// Integration tests for the shortest-path engines

use algoviz::engines::graph::{self, PathOutcome};
use algoviz::model::graph::{Graph, UNREACHED};
use algoviz::model::{Marks, NodeId};
use algoviz::runtime::errors::{EngineError, Infeasibility};
use algoviz::runtime::sink::RecordingSink;
use algoviz::runtime::RunContext;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn with_ctx<T>(f: impl FnOnce(&mut RunContext<'_>) -> T) -> T {
    let mut sink = RecordingSink::new();
    let mut ctx = RunContext::detached(&mut sink);
    f(&mut ctx)
}

/// A-B 4, A-C 1, C-B 2, B-D 1, C-D 5
fn diamond() -> (Graph, Vec<NodeId>) {
    let mut g = Graph::new(false);
    let ids: Vec<NodeId> = ["A", "B", "C", "D"].iter().map(|l| g.add_node(*l)).collect();
    for (a, b, w) in [(0, 1, 4.0), (0, 2, 1.0), (2, 1, 2.0), (1, 3, 1.0), (2, 3, 5.0)] {
        g.add_edge(ids[a], ids[b], w).unwrap();
    }
    (g, ids)
}

#[test]
fn test_dijkstra_shortest_path() {
    let (mut g, ids) = diamond();
    let outcome = with_ctx(|ctx| graph::dijkstra(ctx, &mut g, ids[0], ids[3])).unwrap();
    let PathOutcome::Found(path) = outcome else {
        panic!("D is reachable");
    };
    assert_eq!(path.distance, 4.0);
    assert_eq!(path.nodes, vec![ids[0], ids[2], ids[1], ids[3]]);
    assert_eq!(path.edges.len(), 3);
    for &edge in &path.edges {
        assert!(g.edges()[edge].marks.contains(Marks::SHORTEST_PATH));
    }
}

#[test]
fn test_floyd_warshall_matches_dijkstra_on_diamond() {
    let (mut g, ids) = diamond();
    let all = with_ctx(|ctx| graph::floyd_warshall(ctx, &mut g, ids[0], ids[3])).unwrap();
    assert_eq!(all.path.distance(), Some(4.0));
    assert_eq!(all.distances[0][3], 4.0);
    // undirected, so the table is symmetric
    assert_eq!(all.distances[3][0], 4.0);
    assert_eq!(all.distances[1][2], 2.0);
}

#[test]
fn test_engines_agree_on_random_graphs() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        let base = Graph::random(&mut rng, 7, 6, true, false).unwrap();
        let source = base.nodes()[0].id;
        let target = base.nodes()[6].id;

        let mut g1 = base.clone();
        let mut g2 = base.clone();
        let mut g3 = base.clone();
        let d = with_ctx(|ctx| graph::dijkstra(ctx, &mut g1, source, target)).unwrap();
        let b = with_ctx(|ctx| graph::bellman_ford(ctx, &mut g2, source, target)).unwrap();
        let f = with_ctx(|ctx| graph::floyd_warshall(ctx, &mut g3, source, target)).unwrap();
        assert_eq!(d.distance(), b.distance());
        assert_eq!(d.distance(), f.path.distance());
    }
}

#[test]
fn test_bellman_ford_with_negative_edge() {
    let mut g = Graph::new(true);
    let ids: Vec<NodeId> = ["A", "B", "C", "D"].iter().map(|l| g.add_node(*l)).collect();
    for (a, b, w) in [(0, 1, 4.0), (0, 2, 2.0), (2, 1, -1.0), (1, 3, 2.0)] {
        g.add_edge(ids[a], ids[b], w).unwrap();
    }
    let outcome = with_ctx(|ctx| graph::bellman_ford(ctx, &mut g, ids[0], ids[3])).unwrap();
    assert_eq!(outcome.distance(), Some(3.0));
}

fn negative_loop() -> (Graph, Vec<NodeId>) {
    let mut g = Graph::new(true);
    let ids: Vec<NodeId> = ["A", "B", "C"].iter().map(|l| g.add_node(*l)).collect();
    for (a, b, w) in [(0, 1, 1.0), (1, 2, -2.0), (2, 1, 1.0)] {
        g.add_edge(ids[a], ids[b], w).unwrap();
    }
    (g, ids)
}

#[test]
fn test_bellman_ford_reports_negative_cycle() {
    let (mut g, ids) = negative_loop();
    let err = with_ctx(|ctx| graph::bellman_ford(ctx, &mut g, ids[0], ids[2])).unwrap_err();
    assert_eq!(err, EngineError::Infeasible(Infeasibility::NegativeCycle));
    assert!(g.edges().iter().any(|e| e.marks.contains(Marks::CYCLE)));
}

#[test]
fn test_floyd_warshall_reports_negative_cycle() {
    let (mut g, ids) = negative_loop();
    let err = with_ctx(|ctx| graph::floyd_warshall(ctx, &mut g, ids[0], ids[2])).unwrap_err();
    assert!(err.is_infeasible());
}

#[test]
fn test_unreachable_target() {
    let mut g = Graph::new(true);
    let a = g.add_node("A");
    let b = g.add_node("B");
    let c = g.add_node("C");
    g.add_edge(a, b, 1.0).unwrap();

    let mut g1 = g.clone();
    let outcome = with_ctx(|ctx| graph::dijkstra(ctx, &mut g1, a, c)).unwrap();
    assert_eq!(outcome, PathOutcome::Unreachable);

    let mut g2 = g.clone();
    let outcome = with_ctx(|ctx| graph::bellman_ford(ctx, &mut g2, a, c)).unwrap();
    assert_eq!(outcome, PathOutcome::Unreachable);
    assert_eq!(g2.node(c).map(|n| n.distance), Some(UNREACHED));

    let mut g3 = g.clone();
    let all = with_ctx(|ctx| graph::floyd_warshall(ctx, &mut g3, a, c)).unwrap();
    assert_eq!(all.path, PathOutcome::Unreachable);
    assert_eq!(all.distances[0][2], UNREACHED);
}

#[test]
fn test_unknown_endpoint_is_invalid_input() {
    let (mut g, ids) = diamond();
    let stranger = Graph::new(false).add_node("Z");
    let err = with_ctx(|ctx| graph::dijkstra(ctx, &mut g, ids[0], stranger)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}
