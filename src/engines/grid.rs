//! Maze and island engines over a [`Grid`]
//!
//! Movement is 4-connected. The start is `(0, 0)` and the goal is the
//! bottom-right cell.

use crate::model::grid::Grid;
use crate::model::Marks;
use crate::runtime::context::RunContext;
use crate::runtime::errors::EngineError;
use std::collections::VecDeque;
use tracing::debug;

type Coord = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridPath {
    /// Cells from start to goal inclusive
    Found(Vec<Coord>),
    Unreachable,
}

impl GridPath {
    pub fn len(&self) -> Option<usize> {
        match self {
            GridPath::Found(cells) => Some(cells.len()),
            GridPath::Unreachable => None,
        }
    }
}

/// Breadth-first search from start to goal; each discovered cell records the
/// cell it was reached from, and the path is read back through those parents.
pub fn shortest_path(ctx: &mut RunContext<'_>, grid: &mut Grid) -> Result<GridPath, EngineError> {
    grid.reset();
    let (start, goal) = (grid.start(), grid.goal());
    let mut seen = vec![false; grid.rows() * grid.cols()];
    let idx = |(r, c): Coord, cols: usize| r * cols + c;
    let cols = grid.cols();

    seen[idx(start, cols)] = true;
    let mut queue = VecDeque::from([start]);
    grid.mark(start.0, start.1, Marks::TARGET);
    ctx.checkpoint("start", grid.clone())?;

    let mut reached = false;
    while let Some((r, c)) = queue.pop_front() {
        grid.settle();
        grid.mark(r, c, Marks::CURRENT | Marks::VISITED);
        ctx.visited();
        ctx.checkpoint(format!("visit ({}, {})", r, c), grid.clone())?;
        if (r, c) == goal {
            reached = true;
            break;
        }

        let mut queued = false;
        for (nr, nc) in grid.neighbours(r, c) {
            if !grid.is_open(nr, nc) || seen[idx((nr, nc), cols)] {
                continue;
            }
            seen[idx((nr, nc), cols)] = true;
            if let Some(cell) = grid.cell_mut(nr, nc) {
                cell.parent = Some((r, c));
            }
            grid.mark(nr, nc, Marks::CANDIDATE);
            queue.push_back((nr, nc));
            queued = true;
        }
        if queued {
            ctx.checkpoint("enqueue neighbours", grid.clone())?;
        }
    }

    grid.settle();
    if !reached {
        ctx.checkpoint("goal unreachable", grid.clone())?;
        debug!(visited = ctx.counters().visited, "maze goal unreachable");
        return Ok(GridPath::Unreachable);
    }

    // Bounded by the cell count in case a parent chain were ever malformed
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start && path.len() <= grid.cells().len() {
        let Some(parent) = grid.cell(cursor.0, cursor.1).and_then(|c| c.parent) else {
            break;
        };
        path.push(parent);
        cursor = parent;
    }
    if cursor != start {
        ctx.checkpoint("goal unreachable", grid.clone())?;
        return Ok(GridPath::Unreachable);
    }
    path.reverse();

    for &(r, c) in &path {
        grid.mark(r, c, Marks::VALID_PATH);
    }
    ctx.checkpoint(format!("path of {} cells", path.len()), grid.clone())?;
    debug!(len = path.len(), "maze solved");
    Ok(GridPath::Found(path))
}

#[derive(Debug, Clone, Copy)]
struct Step {
    cell: Coord,
    next_neighbour: usize,
}

/// Depth-first enumeration of every simple path from start to goal.
///
/// Each complete path is shown with `VALID_PATH` and counted through the
/// paths-found signal. Returns the number of paths.
pub fn enumerate_paths(ctx: &mut RunContext<'_>, grid: &mut Grid) -> Result<usize, EngineError> {
    grid.reset();
    let (start, goal) = (grid.start(), grid.goal());
    let cols = grid.cols();
    let mut on_path = vec![false; grid.rows() * cols];
    let mut found = 0;

    on_path[start.0 * cols + start.1] = true;
    grid.mark(start.0, start.1, Marks::CURRENT | Marks::VISITED);
    ctx.checkpoint("start", grid.clone())?;
    let mut stack = vec![Step {
        cell: start,
        next_neighbour: 0,
    }];

    while let Some(&Step { cell, next_neighbour }) = stack.last() {
        if cell == goal {
            found += 1;
            ctx.path_found();
            for step in &stack {
                grid.mark(step.cell.0, step.cell.1, Marks::VALID_PATH);
            }
            ctx.checkpoint(format!("path {}", found), grid.clone())?;
            for step in &stack {
                grid.unmark(step.cell.0, step.cell.1, Marks::VALID_PATH);
            }
            retreat(ctx, grid, &mut stack, &mut on_path, cols)?;
            continue;
        }

        let neighbours = grid.neighbours(cell.0, cell.1);
        let next = neighbours
            .iter()
            .enumerate()
            .skip(next_neighbour)
            .find(|&(_, &(r, c))| grid.is_open(r, c) && !on_path[r * cols + c]);

        match next {
            Some((i, &(r, c))) => {
                if let Some(top) = stack.last_mut() {
                    top.next_neighbour = i + 1;
                }
                on_path[r * cols + c] = true;
                grid.settle();
                grid.mark(r, c, Marks::CURRENT | Marks::VISITED);
                ctx.visited();
                ctx.checkpoint(format!("step to ({}, {})", r, c), grid.clone())?;
                stack.push(Step {
                    cell: (r, c),
                    next_neighbour: 0,
                });
            }
            None => retreat(ctx, grid, &mut stack, &mut on_path, cols)?,
        }
    }

    grid.settle();
    ctx.checkpoint(format!("{} path(s) found", found), grid.clone())?;
    debug!(paths = found, "maze enumeration complete");
    Ok(found)
}

/// Pop the top step and take its cell off the current path
fn retreat(ctx: &mut RunContext<'_>, grid: &mut Grid, stack: &mut Vec<Step>, on_path: &mut [bool], cols: usize) -> Result<(), EngineError> {
    let Some(Step { cell: (r, c), .. }) = stack.pop() else {
        return Ok(());
    };
    on_path[r * cols + c] = false;
    grid.settle();
    grid.unmark(r, c, Marks::VISITED);
    if let Some(top) = stack.last() {
        grid.mark(top.cell.0, top.cell.1, Marks::CURRENT | Marks::BACKTRACK);
        ctx.checkpoint("backtrack", grid.clone())?;
    }
    Ok(())
}

/// Count 4-connected components of open cells by flood fill
pub fn count_islands(ctx: &mut RunContext<'_>, grid: &mut Grid) -> Result<usize, EngineError> {
    grid.reset();
    ctx.checkpoint("start", grid.clone())?;
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut seen = vec![false; rows * cols];
    let mut islands = 0;

    for r in 0..rows {
        for c in 0..cols {
            if seen[r * cols + c] || !grid.is_open(r, c) {
                continue;
            }
            islands += 1;
            ctx.note(format!("island {}", islands));
            seen[r * cols + c] = true;
            grid.mark(r, c, Marks::TARGET);

            let mut stack = vec![(r, c)];
            while let Some((cr, cc)) = stack.pop() {
                grid.settle();
                grid.mark(cr, cc, Marks::CURRENT | Marks::VISITED);
                ctx.visited();
                ctx.checkpoint(format!("fill island {}", islands), grid.clone())?;
                for (nr, nc) in grid.neighbours(cr, cc) {
                    if grid.is_open(nr, nc) && !seen[nr * cols + nc] {
                        seen[nr * cols + nc] = true;
                        stack.push((nr, nc));
                    }
                }
            }
        }
    }

    grid.settle();
    ctx.checkpoint(format!("{} island(s)", islands), grid.clone())?;
    debug!(islands, "island count complete");
    Ok(islands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::sink::RecordingSink;

    #[test]
    fn single_cell_grid() {
        let mut grid = Grid::parse(&["1"]).unwrap();
        let mut sink = RecordingSink::new();
        let mut ctx = RunContext::detached(&mut sink);
        assert_eq!(shortest_path(&mut ctx, &mut grid).unwrap(), GridPath::Found(vec![(0, 0)]));
        assert_eq!(enumerate_paths(&mut ctx, &mut grid).unwrap(), 1);
        assert_eq!(count_islands(&mut ctx, &mut grid).unwrap(), 1);
    }
}
