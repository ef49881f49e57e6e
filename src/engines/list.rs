//! Linked-list engines
//!
//! Positions are 1-based. Inputs are validated against the list length before
//! anything is touched; the length itself comes from a visited-set walk, so a
//! cyclic list is measured by its distinct nodes.

use crate::model::list::LinkedList;
use crate::model::snapshot::Snapshot;
use crate::model::{Marks, NodeId};
use crate::runtime::context::RunContext;
use crate::runtime::errors::{EngineError, InvalidInput};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Row positions used when several lists are shown together
const ROW_GAP: f64 = 120.0;

/// Outcome of a search by value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found { position: usize, id: NodeId },
    NotFound,
}

/// Where Floyd's algorithm found the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// First node of the cycle when walking from head
    pub start: NodeId,
    /// The node whose `next` points back to `start`
    pub end: NodeId,
    pub length: usize,
}

fn snap(list: &LinkedList) -> Snapshot {
    Snapshot::Lists(vec![list.clone()])
}

/// Insert `value` so that it ends up at `position`.
///
/// Position 1 replaces the head; `len + 1` appends.
pub fn insert_at(ctx: &mut RunContext<'_>, list: &mut LinkedList, position: usize, value: i64) -> Result<NodeId, EngineError> {
    let len = list.len();
    if position == 0 || position > len + 1 {
        return Err(InvalidInput::PositionOutOfRange { position, len }.into());
    }
    list.clear_marks();
    ctx.checkpoint(format!("insert {} at {}", value, position), snap(list))?;

    let new = list.add_node(Some(value));
    list.mark(new, Marks::INSERTED);

    if position == 1 {
        let head = list.head();
        list.set_next(new, head)?;
        list.set_head(Some(new))?;
        list.layout();
        ctx.checkpoint("new head", snap(list))?;
        return Ok(new);
    }

    let prev = walk_to(ctx, list, position - 1)?;
    let after = list.next_of(prev);
    list.set_next(new, after)?;
    list.set_next(prev, Some(new))?;
    list.layout();
    list.settle();
    ctx.checkpoint("linked", snap(list))?;
    Ok(new)
}

/// Remove the node at `position` and return its value
pub fn delete_at(ctx: &mut RunContext<'_>, list: &mut LinkedList, position: usize) -> Result<Option<i64>, EngineError> {
    let len = list.len();
    if position == 0 || position > len {
        return Err(InvalidInput::PositionOutOfRange { position, len }.into());
    }
    list.clear_marks();
    ctx.checkpoint(format!("delete position {}", position), snap(list))?;

    let target = if position == 1 {
        list.head()
    } else {
        let prev = walk_to(ctx, list, position - 1)?;
        list.next_of(prev)
    };
    let Some(target) = target else {
        return Err(InvalidInput::PositionOutOfRange { position, len }.into());
    };

    list.settle();
    list.mark(target, Marks::TARGET);
    ctx.checkpoint("unlink", snap(list))?;

    let successor = list.next_of(target).filter(|&n| n != target);
    // Every link into the removed node (its predecessor, or the tail closing a
    // cycle through it) is redirected to its successor.
    let referrers: Vec<NodeId> = list
        .nodes()
        .filter(|n| n.next == Some(target) && n.id != target)
        .map(|n| n.id)
        .collect();
    for referrer in referrers {
        list.set_next(referrer, successor)?;
    }
    let removed = list.remove_node(target).and_then(|n| n.value);
    if list.head() == Some(target) {
        list.set_head(successor)?;
    }
    list.layout();
    list.settle();
    ctx.checkpoint("deleted", snap(list))?;
    Ok(removed)
}

/// Walk from head to the node at `position`, checkpointing each hop
fn walk_to(ctx: &mut RunContext<'_>, list: &mut LinkedList, position: usize) -> Result<NodeId, EngineError> {
    let len = list.len();
    let mut cursor = list
        .head()
        .ok_or(InvalidInput::PositionOutOfRange { position, len })?;
    let mut remaining = position;
    loop {
        list.settle();
        list.mark(cursor, Marks::CURRENT);
        ctx.checkpoint(format!("{} step(s) to go", remaining - 1), snap(list))?;
        list.mark(cursor, Marks::VISITED);
        remaining -= 1;
        if remaining == 0 {
            return Ok(cursor);
        }
        cursor = list
            .next_of(cursor)
            .filter(|&n| list.contains(n))
            .ok_or(InvalidInput::PositionOutOfRange { position, len })?;
    }
}

/// Find the first node holding `target`
pub fn search(ctx: &mut RunContext<'_>, list: &mut LinkedList, target: Option<i64>) -> Result<Lookup, EngineError> {
    let target = target.ok_or(InvalidInput::EmptyTarget)?;
    list.clear_marks();
    ctx.checkpoint(format!("search for {}", target), snap(list))?;

    for (i, id) in list.walk().into_iter().enumerate() {
        list.settle();
        list.mark(id, Marks::CURRENT);
        ctx.compared();
        ctx.checkpoint("compare", snap(list))?;
        if list.value(id) == Some(target) {
            list.settle();
            list.mark(id, Marks::FOUND);
            ctx.checkpoint(format!("found {} at {}", target, i + 1), snap(list))?;
            return Ok(Lookup::Found { position: i + 1, id });
        }
        list.mark(id, Marks::VISITED);
    }

    list.settle();
    ctx.checkpoint(format!("{} not found", target), snap(list))?;
    Ok(Lookup::NotFound)
}

/// Reverse the links in place, then lay the nodes out again so the visual
/// order follows the new link order.
pub fn reverse(ctx: &mut RunContext<'_>, list: &mut LinkedList) -> Result<(), EngineError> {
    if list.has_cycle() {
        return Err(InvalidInput::CyclicList.into());
    }
    list.clear_marks();
    ctx.checkpoint("start reversal", snap(list))?;

    let mut prev: Option<NodeId> = None;
    let mut cursor = list.head();
    while let Some(id) = cursor {
        let next = list.next_of(id);
        list.settle();
        list.mark(id, Marks::CURRENT);
        if let Some(p) = prev {
            list.mark(p, Marks::CANDIDATE);
        }
        list.set_next(id, prev)?;
        ctx.checkpoint("flip link", snap(list))?;
        list.mark(id, Marks::VISITED);
        prev = Some(id);
        cursor = next;
    }

    list.set_head(prev)?;
    list.layout();
    list.settle();
    ctx.checkpoint("reversed", snap(list))?;
    Ok(())
}

/// Merge two ascending lists into a third one built from fresh nodes.
///
/// Ties take from `first`. Once either input runs out, the rest of the other
/// is appended in a single step.
pub fn merge_sorted(ctx: &mut RunContext<'_>, first: &LinkedList, second: &LinkedList) -> Result<LinkedList, EngineError> {
    for list in [first, second] {
        if list.has_cycle() {
            return Err(InvalidInput::CyclicList.into());
        }
        if !list.is_sorted() {
            return Err(InvalidInput::UnsortedList.into());
        }
    }

    let mut left = first.clone();
    let mut right = second.clone();
    let mut out = LinkedList::new();
    left.row = 0.0;
    right.row = ROW_GAP;
    out.row = ROW_GAP * 2.0;
    for list in [&mut left, &mut right] {
        list.clear_marks();
        list.layout();
    }
    let frame = |l: &LinkedList, r: &LinkedList, o: &LinkedList| Snapshot::Lists(vec![l.clone(), r.clone(), o.clone()]);
    ctx.checkpoint("start merge", frame(&left, &right, &out))?;

    let left_ids = left.walk();
    let right_ids = right.walk();
    let (mut i, mut j) = (0, 0);
    let mut tail: Option<NodeId> = None;

    while i < left_ids.len() && j < right_ids.len() {
        let (a, b) = (left_ids[i], right_ids[j]);
        left.mark(a, Marks::CURRENT);
        right.mark(b, Marks::CURRENT);
        ctx.compared();
        ctx.checkpoint("compare heads", frame(&left, &right, &out))?;

        let take_left = left.value(a) <= right.value(b);
        let value = if take_left {
            left.unmark(a, Marks::CURRENT);
            left.mark(a, Marks::VISITED);
            right.unmark(b, Marks::CURRENT);
            i += 1;
            left.value(a)
        } else {
            right.unmark(b, Marks::CURRENT);
            right.mark(b, Marks::VISITED);
            left.unmark(a, Marks::CURRENT);
            j += 1;
            right.value(b)
        };
        tail = Some(append(&mut out, tail, value)?);
        out.settle();
        if let Some(t) = tail {
            out.mark(t, Marks::INSERTED);
        }
        ctx.checkpoint("append", frame(&left, &right, &out))?;
    }

    let rest: Vec<Option<i64>> = left_ids[i..]
        .iter()
        .map(|&id| left.value(id))
        .chain(right_ids[j..].iter().map(|&id| right.value(id)))
        .collect();
    if !rest.is_empty() {
        for &id in &left_ids[i..] {
            left.mark(id, Marks::VISITED);
        }
        for &id in &right_ids[j..] {
            right.mark(id, Marks::VISITED);
        }
        out.settle();
        for value in rest {
            let id = append(&mut out, tail, value)?;
            out.mark(id, Marks::INSERTED);
            tail = Some(id);
        }
        ctx.checkpoint("append remainder", frame(&left, &right, &out))?;
    }

    out.settle();
    out.layout();
    ctx.checkpoint("merged", frame(&left, &right, &out))?;
    debug!(len = out.len(), "lists merged");
    Ok(out)
}

fn append(list: &mut LinkedList, tail: Option<NodeId>, value: Option<i64>) -> Result<NodeId, EngineError> {
    let id = list.add_node(value);
    match tail {
        Some(t) => list.set_next(t, Some(id))?,
        None => list.set_head(Some(id))?,
    }
    list.layout();
    Ok(id)
}

/// Floyd's slow/fast pointers. On a meeting, one pointer restarts from head
/// and both advance one step until they coincide at the cycle's start.
pub fn detect_cycle(ctx: &mut RunContext<'_>, list: &mut LinkedList) -> Result<Option<CycleReport>, EngineError> {
    list.clear_marks();
    ctx.checkpoint("start cycle detection", snap(list))?;

    let Some(head) = list.head() else {
        ctx.checkpoint("empty list", snap(list))?;
        return Ok(None);
    };

    let mut slow = head;
    let mut fast = head;
    let meeting = loop {
        let Some(fast_next) = list.next_of(fast).filter(|&n| list.contains(n)) else {
            break None;
        };
        let Some(fast_next2) = list.next_of(fast_next).filter(|&n| list.contains(n)) else {
            break None;
        };
        let Some(slow_next) = list.next_of(slow) else {
            break None;
        };
        slow = slow_next;
        fast = fast_next2;
        mark_cursors(list, slow, fast);
        ctx.compared();
        ctx.checkpoint("advance slow and fast", snap(list))?;
        if slow == fast {
            break Some(slow);
        }
    };

    let Some(meeting) = meeting else {
        list.settle();
        ctx.checkpoint("no cycle", snap(list))?;
        debug!("no cycle found");
        return Ok(None);
    };

    // Locate the start: restart one pointer from head
    let mut from_head = head;
    let mut from_meeting = meeting;
    mark_cursors(list, from_head, from_meeting);
    ctx.checkpoint("restart slow from head", snap(list))?;
    while from_head != from_meeting {
        from_head = list.next_of(from_head).ok_or_else(|| crate::runtime::errors::unknown(from_head))?;
        from_meeting = list
            .next_of(from_meeting)
            .ok_or_else(|| crate::runtime::errors::unknown(from_meeting))?;
        mark_cursors(list, from_head, from_meeting);
        ctx.checkpoint("advance both", snap(list))?;
    }
    let start = from_head;

    // Walk the loop once to find its end and length
    let mut seen = FxHashSet::default();
    let mut end = start;
    let mut length = 1;
    seen.insert(start);
    while let Some(next) = list.next_of(end) {
        if next == start || !seen.insert(next) {
            break;
        }
        end = next;
        length += 1;
    }

    list.settle();
    for &id in &seen {
        list.mark(id, Marks::CYCLE);
    }
    list.mark(start, Marks::TARGET);
    list.mark(end, Marks::FOUND);
    ctx.checkpoint("cycle found", snap(list))?;
    debug!(length, "cycle found");
    Ok(Some(CycleReport { start, end, length }))
}

fn mark_cursors(list: &mut LinkedList, slow: NodeId, fast: NodeId) {
    list.settle();
    list.mark(slow, Marks::SLOW | Marks::CURRENT);
    list.mark(fast, Marks::FAST | Marks::CURRENT);
}
