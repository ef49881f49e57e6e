//! Boards for the backtracking engines
//!
//! - [`QueensBoard`]: an N×N board holding at most one queen per column
//! - [`SudokuBoard`]: a 9×9 grid where `#` marks an empty cell

use super::{Marks, NodeId};
use crate::runtime::errors::{BoardUnit, EngineError, InvalidInput};
use std::fmt;

/// Character used for an empty Sudoku cell
pub const EMPTY_CELL: char = '#';

#[derive(Debug, Clone, PartialEq)]
pub struct QueensBoard {
    n: usize,
    /// Row of the queen in each column
    queens: Vec<Option<usize>>,
    marks: Vec<Marks>,
}

impl QueensBoard {
    pub fn new(n: usize) -> Self {
        QueensBoard {
            n,
            queens: vec![None; n],
            marks: vec![Marks::empty(); n * n],
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn queen_in(&self, col: usize) -> Option<usize> {
        self.queens.get(col).copied().flatten()
    }

    pub fn has_queen(&self, row: usize, col: usize) -> bool {
        self.queen_in(col) == Some(row)
    }

    pub fn place(&mut self, row: usize, col: usize) {
        if let Some(slot) = self.queens.get_mut(col) {
            *slot = Some(row);
        }
    }

    pub fn remove(&mut self, col: usize) {
        if let Some(slot) = self.queens.get_mut(col) {
            *slot = None;
        }
    }

    /// No queen in an earlier column shares the row or a diagonal
    pub fn is_safe(&self, row: usize, col: usize) -> bool {
        (0..col).all(|c| match self.queen_in(c) {
            Some(r) => r != row && r.abs_diff(row) != c.abs_diff(col),
            None => true,
        })
    }

    /// Every column holds a queen and no two queens attack each other
    pub fn is_solved(&self) -> bool {
        let placed: Vec<(usize, usize)> = self
            .queens
            .iter()
            .enumerate()
            .filter_map(|(c, r)| r.map(|r| (r, c)))
            .collect();
        placed.len() == self.n
            && placed.iter().enumerate().all(|(i, &(r1, c1))| {
                placed[i + 1..]
                    .iter()
                    .all(|&(r2, c2)| r1 != r2 && c1 != c2 && r1.abs_diff(r2) != c1.abs_diff(c2))
            })
    }

    pub fn marks(&self, row: usize, col: usize) -> Marks {
        self.marks.get(row * self.n + col).copied().unwrap_or_default()
    }

    pub fn mark(&mut self, row: usize, col: usize, marks: Marks) {
        if let Some(m) = self.marks.get_mut(row * self.n + col) {
            m.insert(marks);
        }
    }

    pub fn unmark(&mut self, row: usize, col: usize, marks: Marks) {
        if let Some(m) = self.marks.get_mut(row * self.n + col) {
            m.remove(marks);
        }
    }

    pub fn settle(&mut self) {
        for m in &mut self.marks {
            m.settle();
        }
    }

    pub fn clear_marks(&mut self) {
        for m in &mut self.marks {
            *m = Marks::empty();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SudokuCell {
    pub id: NodeId,
    pub value: Option<u8>,
    /// Part of the starting board; never overwritten
    pub given: bool,
    pub marks: Marks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SudokuBoard {
    cells: Vec<SudokuCell>,
}

impl SudokuBoard {
    pub const SIDE: usize = 9;

    /// Parse 81 cells, ignoring whitespace. Digits `1`-`9` are givens; `#`, `.`
    /// and `0` are empty.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let mut cells = Vec::with_capacity(81);
        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            let value = match ch {
                '1'..='9' => Some(ch as u8 - b'0'),
                EMPTY_CELL | '.' | '0' => None,
                other => {
                    return Err(InvalidInput::MalformedBoard(format!("unexpected character '{}'", other)).into())
                }
            };
            cells.push(SudokuCell {
                id: NodeId::fresh(),
                value,
                given: value.is_some(),
                marks: Marks::empty(),
            });
        }
        if cells.len() != 81 {
            return Err(InvalidInput::MalformedBoard(format!("expected 81 cells, got {}", cells.len())).into());
        }
        Ok(SudokuBoard { cells })
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cell(row, col).and_then(|c| c.value)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&SudokuCell> {
        if row < 9 && col < 9 {
            self.cells.get(row * 9 + col)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: Option<u8>) {
        if let Some(cell) = self.cells.get_mut(row * 9 + col).filter(|_| row < 9 && col < 9) {
            cell.value = value;
        }
    }

    pub fn mark(&mut self, row: usize, col: usize, marks: Marks) {
        if let Some(cell) = self.cells.get_mut(row * 9 + col).filter(|_| row < 9 && col < 9) {
            cell.marks.insert(marks);
        }
    }

    pub fn unmark(&mut self, row: usize, col: usize, marks: Marks) {
        if let Some(cell) = self.cells.get_mut(row * 9 + col).filter(|_| row < 9 && col < 9) {
            cell.marks.remove(marks);
        }
    }

    pub fn settle(&mut self) {
        for cell in &mut self.cells {
            cell.marks.settle();
        }
    }

    /// `digit` is absent from the cell's row, column and 3×3 box
    pub fn can_place(&self, row: usize, col: usize, digit: u8) -> bool {
        let box_row = row / 3 * 3;
        let box_col = col / 3 * 3;
        (0..9).all(|i| {
            (i == col || self.get(row, i) != Some(digit))
                && (i == row || self.get(i, col) != Some(digit))
                && {
                    let (r, c) = (box_row + i / 3, box_col + i % 3);
                    (r == row && c == col) || self.get(r, c) != Some(digit)
                }
        })
    }

    /// First unit that repeats a digit, scanning rows, then columns, then boxes
    pub fn find_duplicate(&self) -> Option<(BoardUnit, usize, u8)> {
        let units: [(BoardUnit, fn(usize, usize) -> (usize, usize)); 3] = [
            (BoardUnit::Row, |u, i| (u, i)),
            (BoardUnit::Column, |u, i| (i, u)),
            (BoardUnit::Box, |u, i| (u / 3 * 3 + i / 3, u % 3 * 3 + i % 3)),
        ];
        for (unit, coord) in units {
            for u in 0..9 {
                let mut seen = [false; 10];
                for i in 0..9 {
                    let (r, c) = coord(u, i);
                    if let Some(d) = self.get(r, c) {
                        if seen[d as usize] {
                            return Some((unit, u, d));
                        }
                        seen[d as usize] = true;
                    }
                }
            }
        }
        None
    }

    /// Coordinates of every empty cell in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..81)
            .filter(|&i| self.cells[i].value.is_none())
            .map(|i| (i / 9, i % 9))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.value.is_some())
    }

    /// Filled and free of duplicates
    pub fn is_solved(&self) -> bool {
        self.is_complete() && self.find_duplicate().is_none()
    }
}

impl fmt::Display for SudokuBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9 {
            for col in 0..9 {
                match self.get(row, col) {
                    Some(d) => write!(f, "{}", d)?,
                    None => write!(f, "{}", EMPTY_CELL)?,
                }
            }
            if row < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str = "
        53##7####
        6##195###
        #98####6#
        8###6###3
        4##8#3##1
        7###2###6
        #6####28#
        ###419##5
        ####8##79";

    #[test]
    fn parse_and_print_round_trip() {
        let board = SudokuBoard::parse(PUZZLE).unwrap();
        assert_eq!(board.get(0, 0), Some(5));
        assert_eq!(board.get(0, 2), None);
        assert!(board.cell(0, 0).unwrap().given);
        assert_eq!(board.to_string().lines().next(), Some("53##7####"));
    }

    #[test]
    fn can_place_checks_row_column_and_box() {
        let board = SudokuBoard::parse(PUZZLE).unwrap();
        assert!(!board.can_place(0, 2, 5)); // row
        assert!(!board.can_place(0, 2, 8)); // column
        assert!(!board.can_place(0, 2, 9)); // box
        assert!(board.can_place(0, 2, 4));
    }

    #[test]
    fn finds_column_duplicate() {
        let mut text: Vec<char> = PUZZLE.chars().filter(|c| !c.is_whitespace()).collect();
        text[9 * 8] = '5'; // second 5 in column 0
        let board = SudokuBoard::parse(&text.iter().collect::<String>()).unwrap();
        assert_eq!(board.find_duplicate(), Some((BoardUnit::Column, 0, 5)));
    }

    #[test]
    fn queens_diagonal_attack() {
        let mut board = QueensBoard::new(4);
        board.place(0, 0);
        assert!(!board.is_safe(1, 1));
        assert!(!board.is_safe(0, 1));
        assert!(board.is_safe(2, 1));
    }
}
