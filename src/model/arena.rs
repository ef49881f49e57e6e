//! Id-indexed node storage
//!
//! Nodes that point at each other (tree parents, list `next` links, cycles) are
//! kept in a flat table and refer to one another by [`NodeId`].

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique, immutable identity of a node record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate an id that has never been handed out before in this process
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Records that can be stored in an [`Arena`]
pub trait Keyed {
    fn id(&self) -> NodeId;
}

/// A flat table of records addressed by id.
///
/// Insertion order is preserved until a removal, which swaps the last slot
/// into the vacated one.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<T>,
    index: FxHashMap<NodeId, usize>,
}

impl<T: Keyed> Arena<T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Insert a record, replacing any record with the same id
    pub fn insert(&mut self, record: T) -> NodeId {
        let id = record.id();
        if let Some(&slot) = self.index.get(&id) {
            self.slots[slot] = record;
        } else {
            self.index.insert(id, self.slots.len());
            self.slots.push(record);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.index.get(&id).map(|&slot| &self.slots[slot])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(&slot) => Some(&mut self.slots[slot]),
            None => None,
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Remove a record and return it
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let slot = self.index.remove(&id)?;
        let removed = self.slots.swap_remove(slot);
        if let Some(moved) = self.slots.get(slot) {
            self.index.insert(moved.id(), slot);
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }
}

impl<T: Keyed> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Rec {
        id: NodeId,
        v: i32,
    }

    impl Keyed for Rec {
        fn id(&self) -> NodeId {
            self.id
        }
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut arena = Arena::new();
        let ids: Vec<NodeId> = (0..4)
            .map(|v| arena.insert(Rec { id: NodeId::fresh(), v }))
            .collect();

        let removed = arena.remove(ids[1]).unwrap();
        assert_eq!(removed.v, 1);
        assert_eq!(arena.len(), 3);
        assert!(!arena.contains(ids[1]));
        // The last record was swapped into slot 1
        assert_eq!(arena.get(ids[3]).unwrap().v, 3);
        assert_eq!(arena.get(ids[0]).unwrap().v, 0);
        assert!(arena.remove(ids[1]).is_none());
    }
}
