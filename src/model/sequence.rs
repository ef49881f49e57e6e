//! Ordered sequence of scalar items for the sorting engines

use super::{Marks, NodeId};
use rand::Rng;

/// One element of a [`Sequence`]
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: NodeId,
    pub data: i64,
    pub marks: Marks,
}

impl Item {
    pub fn new(data: i64) -> Self {
        Item {
            id: NodeId::fresh(),
            data,
            marks: Marks::empty(),
        }
    }
}

/// The working array a sorting run mutates in place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    pub items: Vec<Item>,
}

impl Sequence {
    pub fn from_values(values: &[i64]) -> Self {
        Sequence {
            items: values.iter().map(|&v| Item::new(v)).collect(),
        }
    }

    /// `len` values drawn uniformly from `1..=max`
    pub fn random<R: Rng>(rng: &mut R, len: usize, max: i64) -> Self {
        let max = max.max(1);
        Sequence {
            items: (0..len).map(|_| Item::new(rng.gen_range(1..=max))).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn values(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.data).collect()
    }

    /// Swap two items (identity travels with the value)
    pub fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
    }

    pub fn mark(&mut self, index: usize, marks: Marks) {
        if let Some(item) = self.items.get_mut(index) {
            item.marks.insert(marks);
        }
    }

    pub fn unmark(&mut self, index: usize, marks: Marks) {
        if let Some(item) = self.items.get_mut(index) {
            item.marks.remove(marks);
        }
    }

    /// Clear per-step marks on every item
    pub fn settle(&mut self) {
        for item in &mut self.items {
            item.marks.settle();
        }
    }

    pub fn mark_all(&mut self, marks: Marks) {
        for item in &mut self.items {
            item.marks.insert(marks);
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.items.windows(2).all(|w| w[0].data <= w[1].data)
    }
}
