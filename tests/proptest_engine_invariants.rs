//! Property-based tests for engine invariants.
//!
//! 1. **Sorting**: every engine yields an ascending permutation of its input,
//!    and every item keeps its identity.
//! 2. **Lists**: insert-then-delete at the same position restores the list;
//!    reversing twice restores the link order.
//! 3. **Trees**: balanced construction is a BST of minimal height.
//! 4. **Grids**: a BFS path only steps between adjacent open cells.
//! 5. **Graphs**: Dijkstra and Floyd-Warshall agree on non-negative weights.
//! 6. **Queens**: every returned placement is attack-free.

use algoviz::engines::backtracking;
use algoviz::engines::graph;
use algoviz::engines::grid::{self, GridPath};
use algoviz::engines::list;
use algoviz::engines::sorting::{self, SortAlgorithm};
use algoviz::engines::tree;
use algoviz::model::graph::Graph;
use algoviz::model::grid::Grid;
use algoviz::model::list::LinkedList;
use algoviz::model::sequence::Sequence;
use algoviz::runtime::sink::NullSink;
use algoviz::runtime::RunContext;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sort_strategy() -> impl Strategy<Value = SortAlgorithm> {
    prop::sample::select(SortAlgorithm::ALL.to_vec())
}

proptest! {
    #[test]
    fn sorting_yields_ascending_permutation(
        values in prop::collection::vec(-50i64..50, 0..40),
        algorithm in sort_strategy(),
    ) {
        let mut seq = Sequence::from_values(&values);
        let mut ids: Vec<_> = seq.items.iter().map(|i| (i.id, i.data)).collect();
        let mut sink = NullSink;
        let mut ctx = RunContext::detached(&mut sink);
        sorting::sort(&mut ctx, algorithm, &mut seq).unwrap();

        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(seq.values(), expected);

        let mut after: Vec<_> = seq.items.iter().map(|i| (i.id, i.data)).collect();
        ids.sort();
        after.sort();
        prop_assert_eq!(ids, after);
    }

    #[test]
    fn insert_then_delete_restores_list(
        values in prop::collection::vec(0i64..100, 0..12),
        slot in 0usize..13,
        value in 0i64..100,
    ) {
        let position = slot % (values.len() + 1) + 1;
        let mut l = LinkedList::from_values(&values);
        let mut sink = NullSink;
        let mut ctx = RunContext::detached(&mut sink);
        list::insert_at(&mut ctx, &mut l, position, value).unwrap();
        prop_assert_eq!(l.len(), values.len() + 1);
        prop_assert_eq!(l.nth(position).and_then(|id| l.value(id)), Some(value));
        let removed = list::delete_at(&mut ctx, &mut l, position).unwrap();
        prop_assert_eq!(removed, Some(value));
        prop_assert_eq!(l.values(), values);
    }

    #[test]
    fn reverse_twice_is_identity(values in prop::collection::vec(0i64..100, 0..15)) {
        let mut l = LinkedList::from_values(&values);
        let order = l.walk();
        let mut sink = NullSink;
        let mut ctx = RunContext::detached(&mut sink);
        list::reverse(&mut ctx, &mut l).unwrap();
        let mut reversed = values.clone();
        reversed.reverse();
        prop_assert_eq!(l.values(), reversed);
        list::reverse(&mut ctx, &mut l).unwrap();
        prop_assert_eq!(l.walk(), order);
    }

    #[test]
    fn balanced_tree_has_minimal_height(values in prop::collection::vec(0i64..1000, 1..40)) {
        let mut sink = NullSink;
        let mut ctx = RunContext::detached(&mut sink);
        let t = tree::build_balanced(&mut ctx, &values).unwrap();

        let mut sorted = values.clone();
        sorted.sort();
        prop_assert_eq!(t.in_order_values(), sorted);
        prop_assert!(t.check_parent_links());

        // smallest h with 2^h - 1 >= n
        let n = values.len();
        let minimal = (usize::BITS - n.leading_zeros()) as usize;
        prop_assert_eq!(t.height(), minimal);
    }

    #[test]
    fn bfs_path_is_connected(cells in prop::collection::vec(any::<bool>(), 25)) {
        let rows: Vec<String> = cells
            .chunks(5)
            .map(|row| row.iter().map(|&open| if open { '.' } else { '#' }).collect())
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let mut g = Grid::parse(&refs).unwrap();
        let mut sink = NullSink;
        let mut ctx = RunContext::detached(&mut sink);
        if let GridPath::Found(path) = grid::shortest_path(&mut ctx, &mut g).unwrap() {
            prop_assert_eq!(path.first().copied(), Some(g.start()));
            prop_assert_eq!(path.last().copied(), Some(g.goal()));
            prop_assert!(path.len() >= 9);
            for w in path.windows(2) {
                let ((r1, c1), (r2, c2)) = (w[0], w[1]);
                prop_assert_eq!(r1.abs_diff(r2) + c1.abs_diff(c2), 1);
                prop_assert!(g.is_open(r2, c2));
            }
        }
    }

    #[test]
    fn dijkstra_agrees_with_floyd_warshall(
        seed in any::<u64>(),
        nodes in 2usize..9,
        extra in 0usize..8,
        directed in any::<bool>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let base = Graph::random(&mut rng, nodes, extra, directed, false).unwrap();
        let source = base.nodes()[0].id;
        let target = base.nodes()[pick.index(nodes)].id;

        let mut sink = NullSink;
        let mut ctx = RunContext::detached(&mut sink);
        let mut g1 = base.clone();
        let mut g2 = base.clone();
        let d = graph::dijkstra(&mut ctx, &mut g1, source, target).unwrap();
        let f = graph::floyd_warshall(&mut ctx, &mut g2, source, target).unwrap();
        prop_assert_eq!(d.distance(), f.path.distance());
    }

    #[test]
    fn queens_placements_are_attack_free(n in 4usize..=8) {
        let mut sink = NullSink;
        let mut ctx = RunContext::detached(&mut sink);
        let board = backtracking::n_queens(&mut ctx, n).unwrap();
        let rows: Vec<usize> = (0..n).filter_map(|col| board.queen_in(col)).collect();
        prop_assert_eq!(rows.len(), n);
        for a in 0..n {
            for b in a + 1..n {
                prop_assert_ne!(rows[a], rows[b]);
                prop_assert_ne!(rows[a].abs_diff(rows[b]), b - a);
            }
        }
    }
}
