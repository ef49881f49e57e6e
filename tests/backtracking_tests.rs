// Integration tests for the N-Queens and Sudoku engines

use algoviz::catalog::PUZZLES;
use algoviz::engines::backtracking::{self, MAX_QUEENS};
use algoviz::model::board::SudokuBoard;
use algoviz::model::snapshot::Snapshot;
use algoviz::runtime::errors::{EngineError, Infeasibility, InvalidInput};
use algoviz::runtime::sink::{NullSink, RecordingSink};
use algoviz::runtime::RunContext;

/// Every row, column and 3x3 box holds the digits 1 to 9 exactly once
fn assert_valid_solution(board: &SudokuBoard) {
    let digits = |cells: Vec<(usize, usize)>| {
        let mut seen: Vec<u8> = cells.into_iter().filter_map(|(r, c)| board.get(r, c)).collect();
        seen.sort_unstable();
        seen
    };
    let all: Vec<u8> = (1..=9).collect();
    for i in 0..9 {
        assert_eq!(digits((0..9).map(|c| (i, c)).collect()), all, "row {}", i);
        assert_eq!(digits((0..9).map(|r| (r, i)).collect()), all, "column {}", i);
        let (br, bc) = (i / 3 * 3, i % 3 * 3);
        let cells = (0..9).map(|k| (br + k / 3, bc + k % 3)).collect();
        assert_eq!(digits(cells), all, "box {}", i);
    }
}

#[test]
fn test_n_queens_solves_four_through_eight() {
    for n in 4..=8 {
        let mut sink = RecordingSink::new();
        let mut ctx = RunContext::detached(&mut sink);
        let board = backtracking::n_queens(&mut ctx, n).expect("solvable");
        assert!(board.is_solved(), "n = {}", n);
        assert!((0..n).all(|col| board.queen_in(col).is_some()), "n = {}", n);
    }
}

#[test]
fn test_n_queens_two_is_unsolvable() {
    let mut sink = RecordingSink::new();
    let mut ctx = RunContext::detached(&mut sink);
    let err = backtracking::n_queens(&mut ctx, 2).unwrap_err();
    assert_eq!(err, EngineError::Infeasible(Infeasibility::Unsolvable));
}

#[test]
fn test_n_queens_rejects_oversized_board() {
    let mut sink = RecordingSink::new();
    {
        let mut ctx = RunContext::detached(&mut sink);
        let err = backtracking::n_queens(&mut ctx, MAX_QUEENS + 1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(InvalidInput::InvalidSize { .. })));
    }
    assert!(sink.checkpoints().is_empty());
}

#[test]
fn test_sudoku_solves_bundled_puzzles() {
    for puzzle in PUZZLES {
        let mut board = SudokuBoard::parse(puzzle).unwrap();
        let givens: Vec<_> = (0..81).map(|i| board.get(i / 9, i % 9)).collect();
        let mut sink = NullSink;
        {
            let mut ctx = RunContext::detached(&mut sink);
            backtracking::sudoku_solve(&mut ctx, &mut board).expect("puzzle is solvable");
        }
        assert!(board.is_solved());
        assert_valid_solution(&board);
        for (i, given) in givens.into_iter().enumerate() {
            if given.is_some() {
                assert_eq!(board.get(i / 9, i % 9), given);
            }
        }
    }
}

#[test]
fn test_sudoku_final_snapshot_is_solved_board() {
    let mut board = SudokuBoard::parse(PUZZLES[0]).unwrap();
    let mut sink = RecordingSink::new();
    {
        let mut ctx = RunContext::detached(&mut sink);
        backtracking::sudoku_solve(&mut ctx, &mut board).unwrap();
    }
    let Some(Snapshot::Sudoku(last)) = sink.last_snapshot() else {
        panic!("expected a sudoku snapshot");
    };
    assert!(last.is_solved());
}

#[test]
fn test_sudoku_rejects_repeated_digit() {
    let mut text = PUZZLES[0].to_string();
    // "53..." becomes "55...": two fives in the first row
    text.replace_range(1..2, "5");
    let mut board = SudokuBoard::parse(&text).unwrap();
    let mut sink = RecordingSink::new();
    {
        let mut ctx = RunContext::detached(&mut sink);
        let err = backtracking::sudoku_solve(&mut ctx, &mut board).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Infeasible(Infeasibility::InvalidBoard { digit: 5, .. })
        ));
    }
    assert!(sink.checkpoints().is_empty());
}

#[test]
fn test_sudoku_unsolvable_restores_empty_cells() {
    let text = format!("12345678#{}{}", "########9", "#".repeat(63));
    let mut board = SudokuBoard::parse(&text).unwrap();
    let mut sink = RecordingSink::new();
    {
        let mut ctx = RunContext::detached(&mut sink);
        let err = backtracking::sudoku_solve(&mut ctx, &mut board).unwrap_err();
        assert_eq!(err, EngineError::Infeasible(Infeasibility::Unsolvable));
    }
    assert_eq!(board.get(0, 8), None);
    assert_eq!(board.empty_cells().len(), 72);
}

#[test]
fn test_malformed_board_text() {
    assert!(matches!(
        SudokuBoard::parse("123"),
        Err(EngineError::InvalidInput(InvalidInput::MalformedBoard(_)))
    ));
    assert!(SudokuBoard::parse(&"x".repeat(81)).is_err());
}
