//! In-place sorting engines
//!
//! Every engine sorts a [`Sequence`] ascending and emits a checkpoint after each
//! comparison and each swap. Items carry their id with them when they move, so
//! a renderer can animate the exchange.
//!
//! | engine | marks used |
//! |--------|------------|
//! | selection | `TARGET` slot being filled, `CANDIDATE` running minimum, `CURRENT` scan cursor |
//! | bubble | `CURRENT` adjacent pair |
//! | quick | `PIVOT`, `CURRENT` converging cursors |
//! | merge | `CURRENT` slot just written |
//! | heap | `CURRENT` sift cursor, `CANDIDATE` children compared |

use crate::model::sequence::Sequence;
use crate::model::Marks;
use crate::runtime::context::{Counters, RunContext};
use crate::runtime::errors::EngineError;
use tracing::debug;

/// Which sorting engine to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAlgorithm {
    Selection,
    Bubble,
    Quick,
    Merge,
    Heap,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 5] = [
        SortAlgorithm::Selection,
        SortAlgorithm::Bubble,
        SortAlgorithm::Quick,
        SortAlgorithm::Merge,
        SortAlgorithm::Heap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortAlgorithm::Selection => "selection sort",
            SortAlgorithm::Bubble => "bubble sort",
            SortAlgorithm::Quick => "quick sort",
            SortAlgorithm::Merge => "merge sort",
            SortAlgorithm::Heap => "heap sort",
        }
    }
}

/// Run `algorithm` over `seq` and return the final counters
pub fn sort(ctx: &mut RunContext<'_>, algorithm: SortAlgorithm, seq: &mut Sequence) -> Result<Counters, EngineError> {
    match algorithm {
        SortAlgorithm::Selection => selection_sort(ctx, seq),
        SortAlgorithm::Bubble => bubble_sort(ctx, seq),
        SortAlgorithm::Quick => quick_sort(ctx, seq),
        SortAlgorithm::Merge => merge_sort(ctx, seq),
        SortAlgorithm::Heap => heap_sort(ctx, seq),
    }
}

fn finish(ctx: &mut RunContext<'_>, seq: &mut Sequence, name: &str) -> Result<Counters, EngineError> {
    seq.settle();
    seq.mark_all(Marks::SORTED);
    ctx.checkpoint("sorted", seq.clone())?;
    let counters = ctx.counters();
    debug!(
        engine = name,
        len = seq.len(),
        comparisons = counters.comparisons,
        swaps = counters.swaps,
        "sort complete"
    );
    Ok(counters)
}

/// Swap two slots, count it, and checkpoint with both highlighted
fn swap_step(ctx: &mut RunContext<'_>, seq: &mut Sequence, a: usize, b: usize) -> Result<(), EngineError> {
    seq.swap(a, b);
    ctx.swapped();
    seq.mark(a, Marks::SWAPPED);
    seq.mark(b, Marks::SWAPPED);
    ctx.checkpoint("swap", seq.clone())?;
    seq.unmark(a, Marks::SWAPPED);
    seq.unmark(b, Marks::SWAPPED);
    Ok(())
}

/// For each slot `i`, scan the rest for the first minimum and swap it in.
///
/// The swap happens for every slot but the last, even when the minimum is
/// already in place, so `n` items always cost `n - 1` swaps.
pub fn selection_sort(ctx: &mut RunContext<'_>, seq: &mut Sequence) -> Result<Counters, EngineError> {
    let n = seq.len();
    ctx.checkpoint("start", seq.clone())?;

    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        seq.mark(i, Marks::TARGET);
        seq.mark(min, Marks::CANDIDATE);
        for j in i + 1..n {
            seq.mark(j, Marks::CURRENT);
            ctx.compared();
            ctx.checkpoint("compare", seq.clone())?;
            if seq.items[j].data < seq.items[min].data {
                seq.unmark(min, Marks::CANDIDATE);
                min = j;
                seq.mark(min, Marks::CANDIDATE);
            }
            seq.unmark(j, Marks::CURRENT);
        }
        seq.settle();
        seq.unmark(i, Marks::TARGET);
        swap_step(ctx, seq, i, min)?;
        seq.mark(i, Marks::SORTED);
    }

    finish(ctx, seq, "selection")
}

/// Adjacent-pair passes; after each pass the last unsorted slot is final.
pub fn bubble_sort(ctx: &mut RunContext<'_>, seq: &mut Sequence) -> Result<Counters, EngineError> {
    let n = seq.len();
    ctx.checkpoint("start", seq.clone())?;

    for pass in 0..n.saturating_sub(1) {
        let end = n - 1 - pass;
        for j in 0..end {
            seq.mark(j, Marks::CURRENT);
            seq.mark(j + 1, Marks::CURRENT);
            ctx.compared();
            ctx.checkpoint("compare", seq.clone())?;
            if seq.items[j].data > seq.items[j + 1].data {
                swap_step(ctx, seq, j, j + 1)?;
            }
            seq.unmark(j, Marks::CURRENT);
            seq.unmark(j + 1, Marks::CURRENT);
        }
        seq.mark(end, Marks::SORTED);
        ctx.checkpoint("pass complete", seq.clone())?;
    }

    finish(ctx, seq, "bubble")
}

/// Partition around the first element of each range; cursors converge from
/// both ends and the pivot is swapped into the meeting point.
///
/// Pending ranges are kept on an explicit stack, left range first.
pub fn quick_sort(ctx: &mut RunContext<'_>, seq: &mut Sequence) -> Result<Counters, EngineError> {
    let n = seq.len();
    ctx.checkpoint("start", seq.clone())?;

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    if n > 0 {
        ranges.push((0, n - 1));
    }

    while let Some((lo, hi)) = ranges.pop() {
        if lo == hi {
            seq.mark(lo, Marks::SORTED);
            ctx.checkpoint("single element", seq.clone())?;
            continue;
        }

        let pivot = seq.items[lo].data;
        seq.mark(lo, Marks::PIVOT);
        ctx.checkpoint("choose pivot", seq.clone())?;

        let mut i = lo + 1;
        let mut j = hi;
        loop {
            while i <= j && seq.items[i].data <= pivot {
                seq.mark(i, Marks::CURRENT);
                ctx.compared();
                ctx.checkpoint("advance left cursor", seq.clone())?;
                seq.unmark(i, Marks::CURRENT);
                i += 1;
            }
            while i <= j && seq.items[j].data > pivot {
                seq.mark(j, Marks::CURRENT);
                ctx.compared();
                ctx.checkpoint("advance right cursor", seq.clone())?;
                seq.unmark(j, Marks::CURRENT);
                j -= 1;
            }
            if i < j {
                swap_step(ctx, seq, i, j)?;
                i += 1;
                j -= 1;
            } else {
                break;
            }
        }

        seq.unmark(lo, Marks::PIVOT);
        if j != lo {
            swap_step(ctx, seq, lo, j)?;
        }
        seq.mark(j, Marks::SORTED);
        ctx.checkpoint("pivot placed", seq.clone())?;

        if j < hi {
            ranges.push((j + 1, hi));
        }
        if j > lo {
            ranges.push((lo, j - 1));
        }
    }

    finish(ctx, seq, "quick")
}

/// Top-down merge sort; equal values take the left half first.
pub fn merge_sort(ctx: &mut RunContext<'_>, seq: &mut Sequence) -> Result<Counters, EngineError> {
    let n = seq.len();
    ctx.checkpoint("start", seq.clone())?;
    if n > 1 {
        merge_range(ctx, seq, 0, n)?;
    }
    finish(ctx, seq, "merge")
}

/// Sort the half-open range `lo..hi`
fn merge_range(ctx: &mut RunContext<'_>, seq: &mut Sequence, lo: usize, hi: usize) -> Result<(), EngineError> {
    if hi - lo < 2 {
        return Ok(());
    }
    let mid = lo + (hi - lo) / 2;
    merge_range(ctx, seq, lo, mid)?;
    merge_range(ctx, seq, mid, hi)?;

    let left = seq.items[lo..mid].to_vec();
    let right = seq.items[mid..hi].to_vec();
    let (mut i, mut j, mut k) = (0, 0, lo);

    while i < left.len() && j < right.len() {
        ctx.compared();
        let take_left = left[i].data <= right[j].data;
        let mut item = if take_left {
            i += 1;
            left[i - 1].clone()
        } else {
            j += 1;
            right[j - 1].clone()
        };
        item.marks = Marks::CURRENT;
        seq.items[k] = item;
        ctx.checkpoint("merge", seq.clone())?;
        seq.unmark(k, Marks::CURRENT);
        k += 1;
    }

    // Remainders are already ordered; copy them without comparing
    for item in left[i..].iter().chain(right[j..].iter()) {
        let mut item = item.clone();
        item.marks = Marks::CURRENT;
        seq.items[k] = item;
        ctx.checkpoint("copy remainder", seq.clone())?;
        seq.unmark(k, Marks::CURRENT);
        k += 1;
    }
    Ok(())
}

/// Build a max-heap bottom-up, then repeatedly move the root behind the heap.
pub fn heap_sort(ctx: &mut RunContext<'_>, seq: &mut Sequence) -> Result<Counters, EngineError> {
    let n = seq.len();
    ctx.checkpoint("start", seq.clone())?;

    for root in (0..n / 2).rev() {
        sift_down(ctx, seq, root, n)?;
    }
    ctx.checkpoint("heap built", seq.clone())?;

    for end in (1..n).rev() {
        swap_step(ctx, seq, 0, end)?;
        seq.mark(end, Marks::SORTED);
        sift_down(ctx, seq, 0, end)?;
    }

    finish(ctx, seq, "heap")
}

fn sift_down(ctx: &mut RunContext<'_>, seq: &mut Sequence, mut root: usize, len: usize) -> Result<(), EngineError> {
    loop {
        let left = 2 * root + 1;
        if left >= len {
            return Ok(());
        }
        let right = left + 1;
        let mut largest = root;

        seq.mark(root, Marks::CURRENT);
        for child in [left, right] {
            if child < len {
                seq.mark(child, Marks::CANDIDATE);
                ctx.compared();
                if seq.items[child].data > seq.items[largest].data {
                    largest = child;
                }
            }
        }
        ctx.checkpoint("heapify", seq.clone())?;
        seq.unmark(root, Marks::CURRENT);
        seq.unmark(left, Marks::CANDIDATE);
        seq.unmark(right, Marks::CANDIDATE);

        if largest == root {
            return Ok(());
        }
        swap_step(ctx, seq, root, largest)?;
        root = largest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::sink::RecordingSink;

    #[test]
    fn every_engine_handles_tiny_inputs() {
        for algorithm in SortAlgorithm::ALL {
            for values in [vec![], vec![42]] {
                let mut sink = RecordingSink::new();
                let mut seq = Sequence::from_values(&values);
                let mut ctx = RunContext::detached(&mut sink);
                let counters = sort(&mut ctx, algorithm, &mut seq).unwrap();
                assert_eq!(seq.values(), values, "{}", algorithm.name());
                assert_eq!(counters.swaps, 0, "{}", algorithm.name());
            }
        }
    }

    #[test]
    fn quick_sort_handles_all_equal() {
        let mut sink = RecordingSink::new();
        let mut seq = Sequence::from_values(&[4, 4, 4, 4]);
        let mut ctx = RunContext::detached(&mut sink);
        quick_sort(&mut ctx, &mut seq).unwrap();
        assert_eq!(seq.values(), vec![4, 4, 4, 4]);
    }
}
