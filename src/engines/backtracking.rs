//! Backtracking search over fixed-size boards
//!
//! Both engines keep an explicit stack of decision frames. A frame records
//! which slot it fills and the next alternative still to try; failure pops the
//! frame and clears its slot, which restores the board to exactly what it was
//! before that frame's first attempt. The stack never grows past the number of
//! slots on the board.

use crate::model::board::{QueensBoard, SudokuBoard};
use crate::model::Marks;
use crate::runtime::context::RunContext;
use crate::runtime::errors::{EngineError, Infeasibility, InvalidInput};
use tracing::debug;

pub const MIN_QUEENS: usize = 1;
pub const MAX_QUEENS: usize = 12;

/// One column of the N-Queens search
#[derive(Debug, Clone, Copy)]
struct QueenFrame {
    col: usize,
    next_row: usize,
}

/// Place `n` queens column by column so no two attack each other.
///
/// Returns the solved board, or `Infeasible(Unsolvable)` with every queen
/// removed when no placement exists (n = 2 or 3).
pub fn n_queens(ctx: &mut RunContext<'_>, n: usize) -> Result<QueensBoard, EngineError> {
    if !(MIN_QUEENS..=MAX_QUEENS).contains(&n) {
        return Err(InvalidInput::InvalidSize {
            what: "board size",
            value: n,
            min: MIN_QUEENS,
            max: MAX_QUEENS,
        }
        .into());
    }

    let mut board = QueensBoard::new(n);
    ctx.checkpoint(format!("{n} queens"), board.clone())?;

    let mut frames = vec![QueenFrame { col: 0, next_row: 0 }];

    'search: while let Some(&QueenFrame { col, next_row }) = frames.last() {
        for row in next_row..n {
            board.settle();
            board.mark(row, col, Marks::CURRENT | Marks::CANDIDATE);
            ctx.compared();
            ctx.checkpoint(format!("try row {} in column {}", row + 1, col + 1), board.clone())?;

            if board.is_safe(row, col) {
                board.place(row, col);
                if let Some(top) = frames.last_mut() {
                    top.next_row = row + 1;
                }
                board.settle();
                ctx.checkpoint("place queen", board.clone())?;
                if col + 1 == n {
                    board.clear_marks();
                    for c in 0..n {
                        if let Some(r) = board.queen_in(c) {
                            board.mark(r, c, Marks::FOUND);
                        }
                    }
                    ctx.checkpoint("solved", board.clone())?;
                    debug!(n, "queens placed");
                    return Ok(board);
                }
                frames.push(QueenFrame { col: col + 1, next_row: 0 });
                continue 'search;
            }

            board.mark(row, col, Marks::INVALID);
            ctx.checkpoint("attacked", board.clone())?;
            board.unmark(row, col, Marks::INVALID);
        }

        // Column exhausted: undo the queen that led here
        frames.pop();
        if let Some(prev) = frames.last() {
            if let Some(row) = board.queen_in(prev.col) {
                board.remove(prev.col);
                board.settle();
                board.mark(row, prev.col, Marks::BACKTRACK);
                ctx.checkpoint(format!("backtrack from column {}", prev.col + 1), board.clone())?;
            }
        }
    }

    board.clear_marks();
    ctx.checkpoint("no solution", board.clone())?;
    debug!(n, "no placement exists");
    Err(Infeasibility::Unsolvable.into())
}

/// Fill every empty cell so each row, column and box holds 1-9 once.
///
/// A board that already repeats a digit is rejected before any cell changes.
/// On failure every cell the search filled is empty again.
pub fn sudoku_solve(ctx: &mut RunContext<'_>, board: &mut SudokuBoard) -> Result<(), EngineError> {
    if let Some((unit, index, digit)) = board.find_duplicate() {
        return Err(Infeasibility::InvalidBoard { unit, index, digit }.into());
    }

    let empties = board.empty_cells();
    ctx.checkpoint(format!("{} empty cells", empties.len()), board.clone())?;

    // frames[depth] is the next digit to try in empties[depth]
    let mut frames: Vec<u8> = Vec::with_capacity(empties.len());
    if !empties.is_empty() {
        frames.push(1);
    }

    'search: while let Some(&next) = frames.last() {
        let depth = frames.len() - 1;
        let (row, col) = empties[depth];

        for digit in next..=9 {
            ctx.compared();
            if !board.can_place(row, col, digit) {
                continue;
            }
            board.set(row, col, Some(digit));
            if let Some(top) = frames.last_mut() {
                *top = digit + 1;
            }
            board.settle();
            board.mark(row, col, Marks::CURRENT);
            ctx.checkpoint(format!("place {} at ({}, {})", digit, row + 1, col + 1), board.clone())?;
            if depth + 1 == empties.len() {
                break 'search;
            }
            frames.push(1);
            continue 'search;
        }

        frames.pop();
        board.set(row, col, None);
        board.settle();
        board.mark(row, col, Marks::BACKTRACK);
        ctx.checkpoint(format!("backtrack from ({}, {})", row + 1, col + 1), board.clone())?;
    }

    board.settle();
    if board.is_solved() {
        for &(row, col) in &empties {
            board.mark(row, col, Marks::FOUND);
        }
        ctx.checkpoint("solved", board.clone())?;
        debug!(filled = empties.len(), "sudoku solved");
        Ok(())
    } else {
        ctx.checkpoint("no solution", board.clone())?;
        debug!("sudoku has no solution");
        Err(Infeasibility::Unsolvable.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::sink::RecordingSink;

    #[test]
    fn single_queen() {
        let mut sink = RecordingSink::new();
        let mut ctx = RunContext::detached(&mut sink);
        let board = n_queens(&mut ctx, 1).unwrap();
        assert!(board.is_solved());
    }

    #[test]
    fn zero_queens_is_invalid() {
        let mut sink = RecordingSink::new();
        let mut ctx = RunContext::detached(&mut sink);
        assert!(matches!(
            n_queens(&mut ctx, 0),
            Err(EngineError::InvalidInput(InvalidInput::InvalidSize { .. }))
        ));
        assert_eq!(ctx.steps(), 0);
    }

    #[test]
    fn three_queens_unsolvable_and_cleared() {
        let mut sink = RecordingSink::new();
        let mut ctx = RunContext::detached(&mut sink);
        assert_eq!(n_queens(&mut ctx, 3), Err(Infeasibility::Unsolvable.into()));
        drop(ctx);
        match sink.last_snapshot() {
            Some(crate::model::snapshot::Snapshot::Queens(board)) => {
                assert!((0..3).all(|c| board.queen_in(c).is_none()));
            }
            other => panic!("unexpected final snapshot {:?}", other),
        }
    }
}
