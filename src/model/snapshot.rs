//! Deep copies of a working structure
//!
//! A [`Snapshot`] is what the State Sink receives at each checkpoint. The engine
//! keeps mutating its own working copy after emitting, so a snapshot never
//! changes once it has been handed out.

use super::board::{QueensBoard, SudokuBoard};
use super::graph::{DistanceMatrix, Graph};
use super::grid::Grid;
use super::list::LinkedList;
use super::sequence::Sequence;
use super::tree::Tree;

#[derive(Debug, Clone)]
pub enum Snapshot {
    Sequence(Sequence),
    Tree(Tree),
    /// One or more lists; a merge shows both inputs and the output
    Lists(Vec<LinkedList>),
    Graph {
        graph: Graph,
        /// Present while the all-pairs engine is running
        matrix: Option<DistanceMatrix>,
    },
    Grid(Grid),
    Queens(QueensBoard),
    Sudoku(SudokuBoard),
}

impl Snapshot {
    pub fn kind(&self) -> &'static str {
        match self {
            Snapshot::Sequence(_) => "sequence",
            Snapshot::Tree(_) => "tree",
            Snapshot::Lists(_) => "lists",
            Snapshot::Graph { .. } => "graph",
            Snapshot::Grid(_) => "grid",
            Snapshot::Queens(_) => "queens",
            Snapshot::Sudoku(_) => "sudoku",
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough per-record estimates, good enough for the history budget
        match self {
            Snapshot::Sequence(seq) => seq.len() * 32,
            Snapshot::Tree(tree) => tree.len() * 80,
            Snapshot::Lists(lists) => lists.iter().map(|l| l.nodes().count() * 64).sum(),
            Snapshot::Graph { graph, matrix } => {
                graph.node_count() * 64
                    + graph.edges().len() * 40
                    + matrix.as_ref().map_or(0, |m| m.len() * m.len() * 8)
            }
            Snapshot::Grid(grid) => grid.cells().len() * 48,
            Snapshot::Queens(board) => board.size() * board.size() * 4,
            Snapshot::Sudoku(_) => 81 * 32,
        }
    }
}

impl From<Sequence> for Snapshot {
    fn from(seq: Sequence) -> Self {
        Snapshot::Sequence(seq)
    }
}

impl From<Tree> for Snapshot {
    fn from(tree: Tree) -> Self {
        Snapshot::Tree(tree)
    }
}

impl From<Grid> for Snapshot {
    fn from(grid: Grid) -> Self {
        Snapshot::Grid(grid)
    }
}

impl From<QueensBoard> for Snapshot {
    fn from(board: QueensBoard) -> Self {
        Snapshot::Queens(board)
    }
}

impl From<SudokuBoard> for Snapshot {
    fn from(board: SudokuBoard) -> Self {
        Snapshot::Sudoku(board)
    }
}
