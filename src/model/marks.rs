//! Visualization status bits
//!
//! Every node, cell and sequence item carries a [`Marks`] value instead of a
//! loose bag of booleans. The presentation layer maps each bit to a color.

bitflags::bitflags! {
    /// Status bits a renderer can highlight.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Marks: u16 {
        /// The element the engine is looking at right now
        const CURRENT       = 1 << 0;
        const VISITED       = 1 << 1;
        /// Ruled out (off the BST descent path, rejected candidate)
        const INVALID       = 1 << 2;
        const SORTED        = 1 << 3;
        const SWAPPED       = 1 << 4;
        const TARGET        = 1 << 5;
        const SHORTEST_PATH = 1 << 6;
        /// Compared against the current element (running minimum, merge cursor)
        const CANDIDATE     = 1 << 7;
        const PIVOT         = 1 << 8;
        const FOUND         = 1 << 9;
        const CYCLE         = 1 << 10;
        /// Returning to a parent during a depth-first walk
        const BACKTRACK     = 1 << 11;
        const VALID_PATH    = 1 << 12;
        const INSERTED      = 1 << 13;
        /// Floyd's slow and fast cursors
        const SLOW          = 1 << 14;
        const FAST          = 1 << 15;

        /// Bits that only describe a single step and are cleared before the next one
        const TRANSIENT = Self::CURRENT.bits()
            | Self::SWAPPED.bits()
            | Self::CANDIDATE.bits()
            | Self::PIVOT.bits()
            | Self::BACKTRACK.bits()
            | Self::SLOW.bits()
            | Self::FAST.bits();
    }
}

impl Marks {
    /// Clear the per-step bits, keeping the ones that persist for the whole run
    pub fn settle(&mut self) {
        self.remove(Marks::TRANSIENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_keeps_persistent_bits() {
        let mut marks = Marks::CURRENT | Marks::SORTED | Marks::SWAPPED | Marks::VISITED;
        marks.settle();
        assert_eq!(marks, Marks::SORTED | Marks::VISITED);
    }
}
