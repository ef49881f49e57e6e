// Integration tests for the tree engines

use algoviz::engines::tree::{self, SearchOutcome, TraversalOrder};
use algoviz::model::tree::Tree;
use algoviz::model::Marks;
use algoviz::runtime::errors::{EngineError, InvalidInput};
use algoviz::runtime::sink::RecordingSink;
use algoviz::runtime::RunContext;

fn build(values: &[i64]) -> Tree {
    let mut sink = RecordingSink::new();
    let mut ctx = RunContext::detached(&mut sink);
    tree::build_balanced(&mut ctx, values).expect("build failed")
}

fn order_values(tree: &mut Tree, order: TraversalOrder) -> Vec<i64> {
    let mut sink = RecordingSink::new();
    let mut ctx = RunContext::detached(&mut sink);
    let ids = tree::traverse(&mut ctx, tree, order).expect("traversal failed");
    ids.into_iter().filter_map(|id| tree.value(id)).collect()
}

#[test]
fn test_balanced_build_shape() {
    let tree = build(&[7, 3, 5, 1, 6, 2, 4]);
    let root = tree.root().expect("empty tree");
    assert_eq!(tree.value(root), Some(4));
    assert_eq!(tree.len(), 7);
    assert_eq!(tree.height(), 3);
    assert_eq!(tree.in_order_values(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert!(tree.check_parent_links());
}

#[test]
fn test_build_emits_one_checkpoint_per_node() {
    let mut sink = RecordingSink::new();
    {
        let mut ctx = RunContext::detached(&mut sink);
        tree::build_balanced(&mut ctx, &[1, 2, 3, 4, 5]).unwrap();
    }
    // one per insertion plus the final view
    assert_eq!(sink.checkpoints().len(), 6);
}

#[test]
fn test_empty_build() {
    let tree = build(&[]);
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
}

#[test]
fn test_traversal_orders() {
    let mut tree = build(&[1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(order_values(&mut tree, TraversalOrder::PreOrder), vec![4, 2, 1, 3, 6, 5, 7]);
    assert_eq!(order_values(&mut tree, TraversalOrder::InOrder), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(order_values(&mut tree, TraversalOrder::PostOrder), vec![1, 3, 2, 5, 7, 6, 4]);
    assert_eq!(order_values(&mut tree, TraversalOrder::LevelOrder), vec![4, 2, 6, 1, 3, 5, 7]);
}

#[test]
fn test_search_found_marks_target() {
    let mut tree = build(&[1, 2, 3, 4, 5, 6, 7]);
    let mut sink = RecordingSink::new();
    let outcome = {
        let mut ctx = RunContext::detached(&mut sink);
        tree::search(&mut ctx, &mut tree, Some(5)).unwrap()
    };
    let SearchOutcome::Found(id) = outcome else {
        panic!("5 should be found");
    };
    assert_eq!(tree.value(id), Some(5));
    let node = tree.node(id).unwrap();
    assert!(node.marks.contains(Marks::FOUND));
}

#[test]
fn test_search_missing_value() {
    let mut tree = build(&[10, 20, 30]);
    let mut sink = RecordingSink::new();
    let mut ctx = RunContext::detached(&mut sink);
    assert_eq!(tree::search(&mut ctx, &mut tree, Some(25)).unwrap(), SearchOutcome::NotFound);
}

#[test]
fn test_search_without_target_is_invalid() {
    let mut tree = build(&[1, 2, 3]);
    let mut sink = RecordingSink::new();
    let mut ctx = RunContext::detached(&mut sink);
    let err = tree::search(&mut ctx, &mut tree, None).unwrap_err();
    assert_eq!(err, EngineError::InvalidInput(InvalidInput::EmptyTarget));
}
