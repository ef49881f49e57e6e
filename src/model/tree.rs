//! Binary tree with parent links
//!
//! Nodes live in an [`Arena`] and reference each other by id. The one structural
//! invariant is that a node's `parent`, when set, names the node whose `left` or
//! `right` points back at it; [`Tree::check_parent_links`] verifies it.

use super::{Arena, Keyed, Marks, NodeId, CANVAS_WIDTH, LEVEL_HEIGHT};
use crate::runtime::errors::{unknown, EngineError};
use rustc_hash::FxHashSet;

/// Which child slot of a parent a node occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub value: Option<i64>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub cx: f64,
    pub cy: f64,
    pub marks: Marks,
}

impl TreeNode {
    pub fn new(value: Option<i64>) -> Self {
        TreeNode {
            id: NodeId::fresh(),
            value,
            left: None,
            right: None,
            parent: None,
            cx: 0.0,
            cy: 0.0,
            marks: Marks::empty(),
        }
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl Keyed for TreeNode {
    fn id(&self) -> NodeId {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Arena<TreeNode>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: Option<NodeId>) -> Result<(), EngineError> {
        if let Some(id) = id {
            let node = self.nodes.get_mut(id).ok_or_else(|| unknown(id))?;
            node.parent = None;
        }
        self.root = id;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Add a detached node and return its id
    pub fn add_node(&mut self, value: Option<i64>) -> NodeId {
        self.nodes.insert(TreeNode::new(value))
    }

    /// Link `child` under `parent` on the given side, keeping the parent link in sync
    pub fn attach(&mut self, parent: NodeId, side: Side, child: NodeId) -> Result<(), EngineError> {
        if !self.nodes.contains(child) {
            return Err(unknown(child));
        }
        let previous = {
            let p = self.nodes.get_mut(parent).ok_or_else(|| unknown(parent))?;
            let slot = match side {
                Side::Left => &mut p.left,
                Side::Right => &mut p.right,
            };
            slot.replace(child)
        };
        if let Some(old) = previous.filter(|&old| old != child) {
            if let Some(old) = self.nodes.get_mut(old) {
                old.parent = None;
            }
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    pub fn value(&self, id: NodeId) -> Option<i64> {
        self.nodes.get(id).and_then(|n| n.value)
    }

    pub fn mark(&mut self, id: NodeId, marks: Marks) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.marks.insert(marks);
        }
    }

    pub fn unmark(&mut self, id: NodeId, marks: Marks) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.marks.remove(marks);
        }
    }

    pub fn settle(&mut self) {
        for node in self.nodes.iter_mut() {
            node.marks.settle();
        }
    }

    pub fn clear_marks(&mut self) {
        for node in self.nodes.iter_mut() {
            node.marks = Marks::empty();
        }
    }

    /// Every node reachable from `start`, pre-order, each visited once
    pub fn subtree_ids(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            stack.extend(node.right);
            stack.extend(node.left);
        }
        out
    }

    /// Values in left-visit-right order
    pub fn in_order_values(&self) -> Vec<i64> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut stack = Vec::new();
        let mut cursor = self.root;
        loop {
            while let Some(id) = cursor.filter(|id| !seen.contains(id)) {
                stack.push(id);
                cursor = self.nodes.get(id).and_then(|n| n.left);
            }
            let Some(id) = stack.pop() else {
                break;
            };
            seen.insert(id);
            let Some(node) = self.nodes.get(id) else {
                break;
            };
            out.extend(node.value);
            cursor = node.right;
        }
        out
    }

    /// Number of levels (0 for an empty tree)
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut seen = FxHashSet::default();
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            max = max.max(depth);
            stack.extend(node.left.map(|c| (c, depth + 1)));
            stack.extend(node.right.map(|c| (c, depth + 1)));
        }
        max
    }

    /// Recompute `cx`/`cy` top-down: root centered, each child offset by half
    /// of its parent's offset.
    pub fn layout(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let mut seen = FxHashSet::default();
        let mut stack = vec![(root, CANVAS_WIDTH / 2.0, CANVAS_WIDTH / 4.0, 0usize)];
        while let Some((id, cx, offset, depth)) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.cx = cx;
            node.cy = LEVEL_HEIGHT / 2.0 + depth as f64 * LEVEL_HEIGHT;
            let (left, right) = (node.left, node.right);
            if let Some(l) = left {
                stack.push((l, cx - offset, offset / 2.0, depth + 1));
            }
            if let Some(r) = right {
                stack.push((r, cx + offset, offset / 2.0, depth + 1));
            }
        }
    }

    /// True when every parent link is mirrored by a child link
    pub fn check_parent_links(&self) -> bool {
        self.nodes.iter().all(|node| match node.parent {
            None => self.root == Some(node.id) || !self.is_referenced(node.id),
            Some(p) => self
                .nodes
                .get(p)
                .is_some_and(|parent| parent.left == Some(node.id) || parent.right == Some(node.id)),
        }) && self.nodes.iter().all(|node| {
            [node.left, node.right]
                .into_iter()
                .flatten()
                .all(|c| self.nodes.get(c).is_some_and(|child| child.parent == Some(node.id)))
        })
    }

    fn is_referenced(&self, id: NodeId) -> bool {
        self.nodes
            .iter()
            .any(|n| n.left == Some(id) || n.right == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_node_tree() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.add_node(Some(2));
        let left = tree.add_node(Some(1));
        let right = tree.add_node(Some(3));
        tree.set_root(Some(root)).unwrap();
        tree.attach(root, Side::Left, left).unwrap();
        tree.attach(root, Side::Right, right).unwrap();
        (tree, root, left, right)
    }

    #[test]
    fn attach_sets_parent_links() {
        let (tree, root, left, right) = three_node_tree();
        assert_eq!(tree.node(left).unwrap().parent, Some(root));
        assert_eq!(tree.node(right).unwrap().parent, Some(root));
        assert!(tree.check_parent_links());
        assert_eq!(tree.in_order_values(), vec![1, 2, 3]);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn reattach_clears_old_child_parent() {
        let (mut tree, root, left, _) = three_node_tree();
        let other = tree.add_node(Some(0));
        tree.attach(root, Side::Left, other).unwrap();
        assert_eq!(tree.node(left).unwrap().parent, None);
        assert!(tree.check_parent_links());
    }

    #[test]
    fn layout_halves_offsets() {
        let (mut tree, root, left, right) = three_node_tree();
        tree.layout();
        let r = tree.node(root).unwrap();
        assert_eq!(r.cx, CANVAS_WIDTH / 2.0);
        assert_eq!(tree.node(left).unwrap().cx, CANVAS_WIDTH / 4.0);
        assert_eq!(tree.node(right).unwrap().cx, CANVAS_WIDTH * 3.0 / 4.0);
        assert!(tree.node(left).unwrap().cy > r.cy);
    }
}
