//! Rectangular grid of open and blocked cells
//!
//! `data == 1` is open (land), `data == 0` is blocked (water). The start cell
//! `(0, 0)` and the goal cell `(rows - 1, cols - 1)` are always open.

use super::{Marks, NodeId};
use crate::runtime::errors::{EngineError, InvalidInput};
use rand::Rng;

pub const OPEN: u8 = 1;
pub const BLOCKED: u8 = 0;

/// Largest grid side accepted by [`Grid::new`]
pub const MAX_SIDE: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: NodeId,
    pub row: usize,
    pub col: usize,
    pub data: u8,
    pub marks: Marks,
    /// Coordinate of the cell this one was discovered from
    pub parent: Option<(usize, usize)>,
}

impl Cell {
    pub fn is_open(&self) -> bool {
        self.data == OPEN
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from row-major `data`; start and goal are forced open
    pub fn new(rows: usize, cols: usize, data: &[u8]) -> Result<Self, EngineError> {
        for (what, value) in [("rows", rows), ("cols", cols)] {
            if value == 0 || value > MAX_SIDE {
                return Err(InvalidInput::InvalidSize {
                    what,
                    value,
                    min: 1,
                    max: MAX_SIDE,
                }
                .into());
            }
        }
        if data.len() != rows * cols {
            return Err(InvalidInput::MalformedBoard(format!(
                "expected {} cells, got {}",
                rows * cols,
                data.len()
            ))
            .into());
        }
        let cells = data
            .iter()
            .enumerate()
            .map(|(i, &d)| Cell {
                id: NodeId::fresh(),
                row: i / cols,
                col: i % cols,
                data: if d == BLOCKED { BLOCKED } else { OPEN },
                marks: Marks::empty(),
                parent: None,
            })
            .collect();
        let mut grid = Grid { rows, cols, cells };
        let (start, goal) = (grid.start(), grid.goal());
        for (r, c) in [start, goal] {
            if let Some(cell) = grid.cell_mut(r, c) {
                cell.data = OPEN;
            }
        }
        Ok(grid)
    }

    /// Parse rows of `1`/`.` (open) and `0`/`#` (blocked)
    pub fn parse(rows: &[&str]) -> Result<Self, EngineError> {
        let cols = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(InvalidInput::MalformedBoard(format!("row {} has the wrong width", r)).into());
            }
            for ch in line.chars() {
                data.push(match ch {
                    '1' | '.' => OPEN,
                    '0' | '#' => BLOCKED,
                    other => {
                        return Err(InvalidInput::MalformedBoard(format!("unexpected cell '{}'", other)).into())
                    }
                });
            }
        }
        Grid::new(rows.len(), cols, &data)
    }

    /// Each cell open with probability `open_ratio`
    pub fn random<R: Rng>(rng: &mut R, rows: usize, cols: usize, open_ratio: f64) -> Result<Self, EngineError> {
        let p = open_ratio.clamp(0.0, 1.0);
        let data: Vec<u8> = (0..rows * cols)
            .map(|_| if rng.gen_bool(p) { OPEN } else { BLOCKED })
            .collect();
        Grid::new(rows, cols, &data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> (usize, usize) {
        (0, 0)
    }

    pub fn goal(&self) -> (usize, usize) {
        (self.rows - 1, self.cols - 1)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(Cell::is_open)
    }

    /// In-bounds 4-neighbourhood in up, right, down, left order
    pub fn neighbours(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(4);
        if row > 0 {
            out.push((row - 1, col));
        }
        if col + 1 < self.cols {
            out.push((row, col + 1));
        }
        if row + 1 < self.rows {
            out.push((row + 1, col));
        }
        if col > 0 {
            out.push((row, col - 1));
        }
        out
    }

    pub fn mark(&mut self, row: usize, col: usize, marks: Marks) {
        if let Some(cell) = self.cell_mut(row, col) {
            cell.marks.insert(marks);
        }
    }

    pub fn unmark(&mut self, row: usize, col: usize, marks: Marks) {
        if let Some(cell) = self.cell_mut(row, col) {
            cell.marks.remove(marks);
        }
    }

    pub fn settle(&mut self) {
        for cell in &mut self.cells {
            cell.marks.settle();
        }
    }

    /// Forget marks and parents left by an earlier search
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.marks = Marks::empty();
            cell.parent = None;
        }
    }
}
