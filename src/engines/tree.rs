//! Binary tree engines: balanced construction, BST search, traversals
//!
//! All walks are driven by explicit stacks or queues and a visited set, so a
//! malformed tree (a child linked twice) cannot make them loop.

use crate::model::tree::{Side, Tree};
use crate::model::{Marks, NodeId};
use crate::runtime::context::RunContext;
use crate::runtime::errors::{EngineError, InvalidInput};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

/// Result of a search that may legitimately find nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(NodeId),
    NotFound,
}

impl SearchOutcome {
    pub fn is_found(self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    PreOrder,
    InOrder,
    PostOrder,
    LevelOrder,
}

impl TraversalOrder {
    pub fn name(self) -> &'static str {
        match self {
            TraversalOrder::PreOrder => "pre-order",
            TraversalOrder::InOrder => "in-order",
            TraversalOrder::PostOrder => "post-order",
            TraversalOrder::LevelOrder => "level-order",
        }
    }
}

/// Build a height-balanced BST from `values`.
///
/// Values are sorted and the middle of each sub-range (rounding down) becomes
/// the subtree root. A checkpoint follows each insertion.
pub fn build_balanced(ctx: &mut RunContext<'_>, values: &[i64]) -> Result<Tree, EngineError> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mut tree = Tree::new();
    // (lo, hi) inclusive, plus where to hang the new node
    let mut pending: Vec<(usize, usize, Option<(NodeId, Side)>)> = Vec::new();
    if !sorted.is_empty() {
        pending.push((0, sorted.len() - 1, None));
    }

    while let Some((lo, hi, slot)) = pending.pop() {
        let mid = lo + (hi - lo) / 2;
        let id = tree.add_node(Some(sorted[mid]));
        match slot {
            Some((parent, side)) => tree.attach(parent, side, id)?,
            None => tree.set_root(Some(id))?,
        }
        tree.layout();
        tree.settle();
        tree.mark(id, Marks::CURRENT | Marks::INSERTED);
        ctx.checkpoint(format!("insert {}", sorted[mid]), tree.clone())?;
        tree.unmark(id, Marks::INSERTED);

        if mid < hi {
            pending.push((mid + 1, hi, Some((id, Side::Right))));
        }
        if mid > lo {
            pending.push((lo, mid - 1, Some((id, Side::Left))));
        }
    }

    tree.clear_marks();
    ctx.checkpoint("tree built", tree.clone())?;
    debug!(nodes = tree.len(), height = tree.height(), "balanced tree built");
    Ok(tree)
}

/// Descend from the root toward `target`. Subtrees the descent rules out are
/// marked `INVALID`.
pub fn search(ctx: &mut RunContext<'_>, tree: &mut Tree, target: Option<i64>) -> Result<SearchOutcome, EngineError> {
    let target = target.ok_or(InvalidInput::EmptyTarget)?;
    tree.clear_marks();
    ctx.checkpoint(format!("search for {}", target), tree.clone())?;

    let mut seen = FxHashSet::default();
    let mut cursor = tree.root();
    while let Some(id) = cursor {
        if !seen.insert(id) {
            break;
        }
        let Some(node) = tree.node(id) else {
            break;
        };
        let (value, left, right) = (node.value, node.left, node.right);

        tree.mark(id, Marks::CURRENT);
        ctx.compared();
        ctx.checkpoint("compare", tree.clone())?;

        let Some(value) = value else {
            tree.mark(id, Marks::INVALID);
            break;
        };
        if value == target {
            tree.settle();
            tree.mark(id, Marks::FOUND | Marks::TARGET);
            ctx.checkpoint(format!("found {}", target), tree.clone())?;
            return Ok(SearchOutcome::Found(id));
        }

        let (next, ruled_out) = if target < value { (left, right) } else { (right, left) };
        if let Some(other) = ruled_out {
            for pruned in tree.subtree_ids(other) {
                tree.mark(pruned, Marks::INVALID);
            }
        }
        tree.unmark(id, Marks::CURRENT);
        tree.mark(id, Marks::VISITED);
        ctx.checkpoint(if target < value { "go left" } else { "go right" }, tree.clone())?;
        cursor = next;
    }

    tree.settle();
    ctx.checkpoint(format!("{} not found", target), tree.clone())?;
    Ok(SearchOutcome::NotFound)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Arrived,
    LeftDone,
    RightDone,
}

/// Visit every node once in `order`, returning the visit sequence.
///
/// Depth-first orders checkpoint on arrival at a node, on its visit, and on
/// each return to it from a child.
pub fn traverse(ctx: &mut RunContext<'_>, tree: &mut Tree, order: TraversalOrder) -> Result<Vec<NodeId>, EngineError> {
    tree.clear_marks();
    ctx.checkpoint(format!("start {}", order.name()), tree.clone())?;

    let visited = match order {
        TraversalOrder::LevelOrder => level_order(ctx, tree)?,
        _ => depth_first(ctx, tree, order)?,
    };

    tree.settle();
    ctx.checkpoint(format!("{} complete", order.name()), tree.clone())?;
    Ok(visited)
}

fn depth_first(ctx: &mut RunContext<'_>, tree: &mut Tree, order: TraversalOrder) -> Result<Vec<NodeId>, EngineError> {
    let mut visited = Vec::with_capacity(tree.len());
    let mut seen = FxHashSet::default();
    let mut stack: Vec<(NodeId, Stage)> = Vec::new();

    if let Some(root) = tree.root() {
        seen.insert(root);
        arrive(ctx, tree, root)?;
        if order == TraversalOrder::PreOrder {
            visit(ctx, tree, root, &mut visited)?;
        }
        stack.push((root, Stage::Arrived));
    }

    while let Some(&(id, stage)) = stack.last() {
        let Some(node) = tree.node(id) else {
            stack.pop();
            continue;
        };
        let (left, right) = (node.left, node.right);

        let child = match stage {
            Stage::Arrived => {
                set_stage(&mut stack, Stage::LeftDone);
                left
            }
            Stage::LeftDone => {
                set_stage(&mut stack, Stage::RightDone);
                if order == TraversalOrder::InOrder {
                    visit(ctx, tree, id, &mut visited)?;
                }
                right
            }
            Stage::RightDone => {
                if order == TraversalOrder::PostOrder {
                    visit(ctx, tree, id, &mut visited)?;
                }
                stack.pop();
                if let Some(&(parent, _)) = stack.last() {
                    tree.settle();
                    tree.mark(parent, Marks::CURRENT | Marks::BACKTRACK);
                    ctx.checkpoint("backtrack", tree.clone())?;
                }
                None
            }
        };

        if let Some(child) = child.filter(|c| seen.insert(*c)) {
            arrive(ctx, tree, child)?;
            if order == TraversalOrder::PreOrder {
                visit(ctx, tree, child, &mut visited)?;
            }
            stack.push((child, Stage::Arrived));
        }
    }

    Ok(visited)
}

fn set_stage(stack: &mut [(NodeId, Stage)], stage: Stage) {
    if let Some(top) = stack.last_mut() {
        top.1 = stage;
    }
}

fn arrive(ctx: &mut RunContext<'_>, tree: &mut Tree, id: NodeId) -> Result<(), EngineError> {
    tree.settle();
    tree.mark(id, Marks::CURRENT);
    ctx.checkpoint("arrive", tree.clone())
}

fn visit(ctx: &mut RunContext<'_>, tree: &mut Tree, id: NodeId, visited: &mut Vec<NodeId>) -> Result<(), EngineError> {
    tree.settle();
    tree.mark(id, Marks::CURRENT | Marks::VISITED);
    visited.push(id);
    ctx.visited();
    let label = match tree.value(id) {
        Some(v) => format!("visit {}", v),
        None => "visit".to_string(),
    };
    ctx.checkpoint(label, tree.clone())
}

fn level_order(ctx: &mut RunContext<'_>, tree: &mut Tree) -> Result<Vec<NodeId>, EngineError> {
    let mut visited = Vec::with_capacity(tree.len());
    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::new();
    if let Some(root) = tree.root() {
        seen.insert(root);
        queue.push_back(root);
    }

    while let Some(id) = queue.pop_front() {
        visit(ctx, tree, id, &mut visited)?;
        let Some(node) = tree.node(id) else {
            continue;
        };
        let children: Vec<NodeId> = [node.left, node.right].into_iter().flatten().collect();
        let mut queued = false;
        for child in children {
            if seen.insert(child) {
                tree.mark(child, Marks::CANDIDATE);
                queue.push_back(child);
                queued = true;
            }
        }
        if queued {
            ctx.checkpoint("enqueue children", tree.clone())?;
        }
    }

    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::sink::RecordingSink;

    #[test]
    fn middle_rounds_down() {
        let mut sink = RecordingSink::new();
        let mut ctx = RunContext::detached(&mut sink);
        let tree = build_balanced(&mut ctx, &[4, 1, 3, 2]).unwrap();
        let root = tree.root().unwrap();
        // sorted [1,2,3,4]: middle of 0..=3 rounds down to index 1
        assert_eq!(tree.value(root), Some(2));
        assert!(tree.check_parent_links());
    }

    #[test]
    fn empty_target_is_rejected_before_marking() {
        let mut sink = RecordingSink::new();
        let mut ctx = RunContext::detached(&mut sink);
        let mut tree = build_balanced(&mut ctx, &[1, 2, 3]).unwrap();
        let before = ctx.steps();
        assert_eq!(
            search(&mut ctx, &mut tree, None),
            Err(EngineError::InvalidInput(InvalidInput::EmptyTarget))
        );
        assert_eq!(ctx.steps(), before);
    }
}
