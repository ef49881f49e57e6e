//! Singly-linked list that may contain a cycle
//!
//! A node's `next` may name an earlier node of the same list. Nothing here ever
//! follows `next` without a visited set, so every walk terminates.

use super::{Arena, Keyed, Marks, NodeId, LIST_SPACING};
use crate::runtime::errors::{unknown, EngineError, InvalidInput};
use rand::Rng;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    pub id: NodeId,
    pub value: Option<i64>,
    pub next: Option<NodeId>,
    pub cx: f64,
    pub cy: f64,
    pub marks: Marks,
}

impl ListNode {
    pub fn new(value: Option<i64>) -> Self {
        ListNode {
            id: NodeId::fresh(),
            value,
            next: None,
            cx: 0.0,
            cy: 0.0,
            marks: Marks::empty(),
        }
    }
}

impl Keyed for ListNode {
    fn id(&self) -> NodeId {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkedList {
    nodes: Arena<ListNode>,
    head: Option<NodeId>,
    /// Vertical position of this list's row on the canvas
    pub row: f64,
}

impl LinkedList {
    pub fn new() -> Self {
        LinkedList::default()
    }

    pub fn from_values(values: &[i64]) -> Self {
        let mut list = LinkedList::new();
        let mut prev: Option<NodeId> = None;
        for &v in values {
            let id = list.add_node(Some(v));
            match prev {
                Some(p) => {
                    if let Some(node) = list.nodes.get_mut(p) {
                        node.next = Some(id);
                    }
                }
                None => list.head = Some(id),
            }
            prev = Some(id);
        }
        list.layout();
        list
    }

    /// `len` random values in `1..=max`, optionally sorted ascending
    pub fn random<R: Rng>(rng: &mut R, len: usize, max: i64, sorted: bool) -> Self {
        let mut values: Vec<i64> = (0..len).map(|_| rng.gen_range(1..=max.max(1))).collect();
        if sorted {
            values.sort_unstable();
        }
        LinkedList::from_values(&values)
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn set_head(&mut self, id: Option<NodeId>) -> Result<(), EngineError> {
        if let Some(id) = id {
            if !self.nodes.contains(id) {
                return Err(unknown(id));
            }
        }
        self.head = id;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&ListNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ListNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ListNode> {
        self.nodes.iter()
    }

    /// Add a detached node
    pub fn add_node(&mut self, value: Option<i64>) -> NodeId {
        self.nodes.insert(ListNode::new(value))
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<ListNode> {
        if self.head == Some(id) {
            self.head = self.nodes.get(id).and_then(|n| n.next);
        }
        self.nodes.remove(id)
    }

    pub fn next_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.next)
    }

    pub fn set_next(&mut self, id: NodeId, next: Option<NodeId>) -> Result<(), EngineError> {
        if let Some(n) = next {
            if !self.nodes.contains(n) {
                return Err(unknown(n));
            }
        }
        let node = self.nodes.get_mut(id).ok_or_else(|| unknown(id))?;
        node.next = next;
        Ok(())
    }

    pub fn value(&self, id: NodeId) -> Option<i64> {
        self.nodes.get(id).and_then(|n| n.value)
    }

    /// Distinct nodes from head in link order; stops at the first repeat
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            if !seen.insert(id) {
                break;
            }
            let Some(node) = self.nodes.get(id) else {
                break;
            };
            out.push(id);
            cursor = node.next;
        }
        out
    }

    /// Number of distinct nodes reachable from head
    pub fn len(&self) -> usize {
        self.walk().len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn values(&self) -> Vec<i64> {
        self.walk()
            .into_iter()
            .filter_map(|id| self.value(id))
            .collect()
    }

    /// Whether following `next` from head ever revisits a node
    pub fn has_cycle(&self) -> bool {
        let walked = self.walk();
        walked
            .last()
            .and_then(|&last| self.next_of(last))
            .is_some()
    }

    /// Node at a 1-based position
    pub fn nth(&self, position: usize) -> Option<NodeId> {
        if position == 0 {
            return None;
        }
        self.walk().get(position - 1).copied()
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.walk().last().copied()
    }

    /// Point the tail's `next` back at the node at `position` (1-based)
    pub fn link_tail_to(&mut self, position: usize) -> Result<(), EngineError> {
        let walked = self.walk();
        let len = walked.len();
        if position == 0 || position > len {
            return Err(InvalidInput::PositionOutOfRange { position, len }.into());
        }
        let target = walked[position - 1];
        let tail = walked[len - 1];
        self.set_next(tail, Some(target))
    }

    /// Sorted ascending by value along the link order
    pub fn is_sorted(&self) -> bool {
        self.values().windows(2).all(|w| w[0] <= w[1])
    }

    /// Place nodes left to right in link order on this list's row
    pub fn layout(&mut self) {
        let row = self.row;
        for (i, id) in self.walk().into_iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.cx = LIST_SPACING / 2.0 + i as f64 * LIST_SPACING;
                node.cy = row;
            }
        }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_terminates_on_cycle() {
        let mut list = LinkedList::from_values(&[1, 2, 3, 4]);
        assert!(!list.has_cycle());
        list.link_tail_to(2).unwrap();
        assert!(list.has_cycle());
        assert_eq!(list.values(), vec![1, 2, 3, 4]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut list = LinkedList::from_values(&[7]);
        list.link_tail_to(1).unwrap();
        assert!(list.has_cycle());
        assert_eq!(list.values(), vec![7]);
    }

    #[test]
    fn link_tail_rejects_bad_position() {
        let mut list = LinkedList::from_values(&[1, 2]);
        assert_eq!(
            list.link_tail_to(3),
            Err(InvalidInput::PositionOutOfRange { position: 3, len: 2 }.into())
        );
    }

    #[test]
    fn layout_follows_link_order() {
        let list = LinkedList::from_values(&[5, 6, 7]);
        let xs: Vec<f64> = list.walk().iter().map(|&id| list.node(id).unwrap().cx).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }
}
