//! Every runnable algorithm and how to prepare its input
//!
//! [`prepare`] builds fresh input (new node ids every time) from a
//! [`RunConfig`] and packages the engine call as a [`Job`] ready for
//! [`Scheduler::start`](crate::runtime::Scheduler::start).

use crate::config::RunConfig;
use crate::engines::backtracking::{self, MAX_QUEENS};
use crate::engines::graph::{self, PathOutcome};
use crate::engines::grid::{self, GridPath};
use crate::engines::list::{self, Lookup};
use crate::engines::sorting::{self, SortAlgorithm};
use crate::engines::tree::{self, SearchOutcome, TraversalOrder};
use crate::model::board::SudokuBoard;
use crate::model::graph::Graph;
use crate::model::grid::{Grid, MAX_SIDE};
use crate::model::list::LinkedList;
use crate::model::sequence::Sequence;
use crate::runtime::errors::{EngineError, InvalidInput};
use crate::runtime::RunContext;
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::ops::RangeInclusive;

/// Largest value placed in random sequences, trees and lists
const MAX_VALUE: i64 = 99;

/// Largest maze side for path enumeration; a fully open maze of this side
/// stays well inside [`History::DEFAULT_LIMIT`](crate::runtime::history::History::DEFAULT_LIMIT)
pub const MAX_MAZE_PATHS_SIDE: usize = 4;

/// A prepared engine run; resolves to a one-line summary of the outcome
pub type Job = Box<dyn FnOnce(&mut RunContext<'_>) -> Result<String, EngineError> + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Sorting,
    Tree,
    List,
    Graph,
    Backtracking,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    SelectionSort,
    BubbleSort,
    QuickSort,
    MergeSort,
    HeapSort,
    BstBuild,
    BstSearch,
    PreOrder,
    InOrder,
    PostOrder,
    LevelOrder,
    ListInsert,
    ListDelete,
    ListSearch,
    ListReverse,
    ListMerge,
    ListCycle,
    Dijkstra,
    BellmanFord,
    FloydWarshall,
    NQueens,
    Sudoku,
    MazeBfs,
    MazePaths,
    Islands,
}

impl Algorithm {
    pub const ALL: [Algorithm; 25] = [
        Algorithm::SelectionSort,
        Algorithm::BubbleSort,
        Algorithm::QuickSort,
        Algorithm::MergeSort,
        Algorithm::HeapSort,
        Algorithm::BstBuild,
        Algorithm::BstSearch,
        Algorithm::PreOrder,
        Algorithm::InOrder,
        Algorithm::PostOrder,
        Algorithm::LevelOrder,
        Algorithm::ListInsert,
        Algorithm::ListDelete,
        Algorithm::ListSearch,
        Algorithm::ListReverse,
        Algorithm::ListMerge,
        Algorithm::ListCycle,
        Algorithm::Dijkstra,
        Algorithm::BellmanFord,
        Algorithm::FloydWarshall,
        Algorithm::NQueens,
        Algorithm::Sudoku,
        Algorithm::MazeBfs,
        Algorithm::MazePaths,
        Algorithm::Islands,
    ];

    pub fn family(self) -> Family {
        use Algorithm::*;
        match self {
            SelectionSort | BubbleSort | QuickSort | MergeSort | HeapSort => Family::Sorting,
            BstBuild | BstSearch | PreOrder | InOrder | PostOrder | LevelOrder => Family::Tree,
            ListInsert | ListDelete | ListSearch | ListReverse | ListMerge | ListCycle => Family::List,
            Dijkstra | BellmanFord | FloydWarshall => Family::Graph,
            NQueens | Sudoku => Family::Backtracking,
            MazeBfs | MazePaths | Islands => Family::Grid,
        }
    }

    pub fn title(self) -> &'static str {
        use Algorithm::*;
        match self {
            SelectionSort => "Selection sort",
            BubbleSort => "Bubble sort",
            QuickSort => "Quick sort",
            MergeSort => "Merge sort",
            HeapSort => "Heap sort",
            BstBuild => "Balanced BST construction",
            BstSearch => "BST search",
            PreOrder => "Pre-order traversal",
            InOrder => "In-order traversal",
            PostOrder => "Post-order traversal",
            LevelOrder => "Level-order traversal",
            ListInsert => "List insert at position",
            ListDelete => "List delete at position",
            ListSearch => "List search by value",
            ListReverse => "List reversal",
            ListMerge => "Merge two sorted lists",
            ListCycle => "Floyd cycle detection",
            Dijkstra => "Dijkstra",
            BellmanFord => "Bellman-Ford",
            FloydWarshall => "Floyd-Warshall",
            NQueens => "N-Queens",
            Sudoku => "Sudoku",
            MazeBfs => "Maze shortest path (BFS)",
            MazePaths => "Maze path enumeration (DFS)",
            Islands => "Island count",
        }
    }

    /// Accepted values for `--size`; `None` when the size is fixed
    pub fn size_range(self) -> Option<RangeInclusive<usize>> {
        use Algorithm::*;
        match self {
            SelectionSort | BubbleSort | QuickSort | MergeSort | HeapSort => Some(2..=64),
            BstBuild | BstSearch | PreOrder | InOrder | PostOrder | LevelOrder => Some(1..=31),
            ListInsert | ListDelete | ListSearch | ListReverse | ListMerge | ListCycle => Some(1..=12),
            Dijkstra | BellmanFord | FloydWarshall => Some(2..=26),
            NQueens => Some(backtracking::MIN_QUEENS..=MAX_QUEENS),
            Sudoku => None,
            // every simple path is enumerated; a fully open 5x5 maze already
            // needs millions of checkpoints
            MazePaths => Some(2..=MAX_MAZE_PATHS_SIDE),
            MazeBfs | Islands => Some(2..=MAX_SIDE.min(24)),
        }
    }

    pub fn default_size(self) -> usize {
        match self.family() {
            Family::Sorting => 16,
            Family::Tree => 15,
            Family::List => 6,
            Family::Graph => 7,
            Family::Backtracking => 8,
            Family::Grid if self == Algorithm::MazePaths => 4,
            Family::Grid => 10,
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&a| a == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&a| a == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Check `size` against what `algorithm` accepts
pub fn check_size(algorithm: Algorithm, size: usize) -> Result<(), EngineError> {
    match algorithm.size_range() {
        Some(range) if !range.contains(&size) => Err(InvalidInput::InvalidSize {
            what: "size",
            value: size,
            min: *range.start(),
            max: *range.end(),
        }
        .into()),
        _ => Ok(()),
    }
}

fn rng_for(config: &RunConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Build fresh input for `algorithm` and wrap the engine call in a [`Job`]
pub fn prepare(algorithm: Algorithm, config: &RunConfig) -> Result<Job, EngineError> {
    let size = config.size_for(algorithm);
    check_size(algorithm, size)?;
    let mut rng = rng_for(config);

    let job: Job = match algorithm.family() {
        Family::Sorting => {
            let engine = match algorithm {
                Algorithm::SelectionSort => SortAlgorithm::Selection,
                Algorithm::BubbleSort => SortAlgorithm::Bubble,
                Algorithm::QuickSort => SortAlgorithm::Quick,
                Algorithm::MergeSort => SortAlgorithm::Merge,
                _ => SortAlgorithm::Heap,
            };
            let mut seq = Sequence::random(&mut rng, size, MAX_VALUE);
            Box::new(move |ctx| {
                let counters = sorting::sort(ctx, engine, &mut seq)?;
                Ok(format!(
                    "sorted {} items: {} comparisons, {} swaps",
                    seq.len(),
                    counters.comparisons,
                    counters.swaps
                ))
            })
        }
        Family::Tree => tree_job(algorithm, &mut rng, size),
        Family::List => list_job(algorithm, &mut rng, size)?,
        Family::Graph => graph_job(algorithm, &mut rng, size)?,
        Family::Backtracking => match algorithm {
            Algorithm::NQueens => Box::new(move |ctx| {
                backtracking::n_queens(ctx, size)?;
                Ok(format!("placed {} queens", size))
            }),
            _ => {
                let puzzle = PUZZLES.choose(&mut rng).copied().unwrap_or(PUZZLES[0]);
                let mut board = SudokuBoard::parse(puzzle)?;
                Box::new(move |ctx| {
                    let empty = board.empty_cells().len();
                    backtracking::sudoku_solve(ctx, &mut board)?;
                    Ok(format!("filled {} cells", empty))
                })
            }
        },
        Family::Grid => {
            let mut grid = Grid::random(&mut rng, size, size, 0.7)?;
            match algorithm {
                Algorithm::MazeBfs => Box::new(move |ctx| {
                    Ok(match grid::shortest_path(ctx, &mut grid)? {
                        GridPath::Found(path) => format!("shortest path visits {} cells", path.len()),
                        GridPath::Unreachable => "goal is unreachable".to_string(),
                    })
                }),
                Algorithm::MazePaths => Box::new(move |ctx| {
                    let paths = grid::enumerate_paths(ctx, &mut grid)?;
                    Ok(format!("{} simple path(s) from start to goal", paths))
                }),
                _ => Box::new(move |ctx| {
                    let islands = grid::count_islands(ctx, &mut grid)?;
                    Ok(format!("{} island(s)", islands))
                }),
            }
        }
    };
    Ok(job)
}

fn random_values(rng: &mut StdRng, size: usize) -> Vec<i64> {
    (0..size).map(|_| rng.gen_range(1..=MAX_VALUE)).collect()
}

fn tree_job(algorithm: Algorithm, rng: &mut StdRng, size: usize) -> Job {
    let values = random_values(rng, size);
    let order = match algorithm {
        Algorithm::PreOrder => Some(TraversalOrder::PreOrder),
        Algorithm::InOrder => Some(TraversalOrder::InOrder),
        Algorithm::PostOrder => Some(TraversalOrder::PostOrder),
        Algorithm::LevelOrder => Some(TraversalOrder::LevelOrder),
        _ => None,
    };
    // Half the time search for a value that is present
    let target = if rng.gen_bool(0.5) {
        values.choose(rng).copied()
    } else {
        Some(rng.gen_range(1..=MAX_VALUE))
    };

    match (algorithm, order) {
        (_, Some(order)) => Box::new(move |ctx| {
            let mut tree = tree::build_balanced(ctx, &values)?;
            let visited = tree::traverse(ctx, &mut tree, order)?;
            Ok(format!("{} visited {} nodes", order.name(), visited.len()))
        }),
        (Algorithm::BstSearch, None) => Box::new(move |ctx| {
            let mut tree = tree::build_balanced(ctx, &values)?;
            let shown = target.map_or_else(|| "nothing".to_string(), |t| t.to_string());
            Ok(match tree::search(ctx, &mut tree, target)? {
                SearchOutcome::Found(_) => format!("found {}", shown),
                SearchOutcome::NotFound => format!("{} is not in the tree", shown),
            })
        }),
        _ => Box::new(move |ctx| {
            let tree = tree::build_balanced(ctx, &values)?;
            Ok(format!("built tree of {} nodes, height {}", tree.len(), tree.height()))
        }),
    }
}

fn list_job(algorithm: Algorithm, rng: &mut StdRng, size: usize) -> Result<Job, EngineError> {
    let job: Job = match algorithm {
        Algorithm::ListInsert => {
            let mut list = LinkedList::random(rng, size, MAX_VALUE, false);
            let position = rng.gen_range(1..=size + 1);
            let value = rng.gen_range(1..=MAX_VALUE);
            Box::new(move |ctx| {
                list::insert_at(ctx, &mut list, position, value)?;
                Ok(format!("inserted {} at position {}", value, position))
            })
        }
        Algorithm::ListDelete => {
            let mut list = LinkedList::random(rng, size, MAX_VALUE, false);
            let position = rng.gen_range(1..=size);
            Box::new(move |ctx| {
                let removed = list::delete_at(ctx, &mut list, position)?;
                let shown = removed.map_or_else(|| "empty node".to_string(), |v| v.to_string());
                Ok(format!("deleted {} from position {}", shown, position))
            })
        }
        Algorithm::ListSearch => {
            let mut list = LinkedList::random(rng, size, MAX_VALUE, false);
            let values = list.values();
            let target = if rng.gen_bool(0.5) {
                values.choose(rng).copied()
            } else {
                Some(rng.gen_range(1..=MAX_VALUE))
            };
            Box::new(move |ctx| {
                let shown = target.map_or_else(|| "nothing".to_string(), |t| t.to_string());
                Ok(match list::search(ctx, &mut list, target)? {
                    Lookup::Found { position, .. } => format!("found {} at position {}", shown, position),
                    Lookup::NotFound => format!("{} is not in the list", shown),
                })
            })
        }
        Algorithm::ListReverse => {
            let mut list = LinkedList::random(rng, size, MAX_VALUE, false);
            Box::new(move |ctx| {
                list::reverse(ctx, &mut list)?;
                Ok(format!("reversed {} nodes", list.len()))
            })
        }
        Algorithm::ListMerge => {
            let first = LinkedList::random(rng, size.div_ceil(2), MAX_VALUE, true);
            let second = LinkedList::random(rng, size / 2 + 1, MAX_VALUE, true);
            Box::new(move |ctx| {
                let merged = list::merge_sorted(ctx, &first, &second)?;
                Ok(format!("merged into {} nodes", merged.len()))
            })
        }
        _ => {
            let mut list = LinkedList::random(rng, size, MAX_VALUE, false);
            // Leave the list acyclic about one time in four
            if !rng.gen_ratio(1, 4) {
                let position = rng.gen_range(1..=size);
                list.link_tail_to(position)?;
            }
            Box::new(move |ctx| {
                Ok(match list::detect_cycle(ctx, &mut list)? {
                    Some(report) => format!(
                        "cycle of length {} starting at {}",
                        report.length,
                        list.value(report.start).map_or_else(|| "?".to_string(), |v| v.to_string())
                    ),
                    None => "no cycle".to_string(),
                })
            })
        }
    };
    Ok(job)
}

fn graph_job(algorithm: Algorithm, rng: &mut StdRng, size: usize) -> Result<Job, EngineError> {
    let extra = size / 2 + 1;
    let (directed, negative) = match algorithm {
        Algorithm::BellmanFord => (true, true),
        Algorithm::FloydWarshall => (true, false),
        _ => (false, false),
    };
    let mut graph = Graph::random(rng, size, extra, directed, negative)?;
    let ids: Vec<_> = graph.nodes().iter().map(|n| n.id).collect();
    let (Some(&source), Some(&target)) = (ids.first(), ids.last()) else {
        return Err(InvalidInput::InvalidSize {
            what: "graph nodes",
            value: size,
            min: 2,
            max: 26,
        }
        .into());
    };

    let describe = |outcome: &PathOutcome| match outcome {
        PathOutcome::Found(path) => format!("distance {} over {} edge(s)", path.distance, path.edges.len()),
        PathOutcome::Unreachable => "destination unreachable".to_string(),
    };

    let job: Job = match algorithm {
        Algorithm::Dijkstra => Box::new(move |ctx| Ok(describe(&graph::dijkstra(ctx, &mut graph, source, target)?))),
        Algorithm::BellmanFord => Box::new(move |ctx| Ok(describe(&graph::bellman_ford(ctx, &mut graph, source, target)?))),
        _ => Box::new(move |ctx| Ok(describe(&graph::floyd_warshall(ctx, &mut graph, source, target)?.path))),
    };
    Ok(job)
}

/// Built-in starting boards; `#` marks an empty cell
pub const PUZZLES: [&str; 3] = [
    "53##7####6##195####98####6#8###6###34##8#3##17###2###6#6####28####419##5####8##79",
    "#2#6#8###58###97######4####37####5##6#######4##8####13####2######98###36###3#6#9#",
    "###26#7#168##7##9#19###45##82#1###4###46#29###5###3#28##93###74#4##5##367#3#18###",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_visits_every_algorithm() {
        let mut seen = vec![Algorithm::ALL[0]];
        let mut a = Algorithm::ALL[0].next();
        while a != Algorithm::ALL[0] {
            seen.push(a);
            a = a.next();
        }
        assert_eq!(seen.len(), Algorithm::ALL.len());
        assert_eq!(Algorithm::ALL[0].prev(), Algorithm::Islands);
    }

    #[test]
    fn default_sizes_are_accepted() {
        for algorithm in Algorithm::ALL {
            assert!(check_size(algorithm, algorithm.default_size()).is_ok(), "{}", algorithm);
        }
    }

    #[test]
    fn builtin_puzzles_parse_without_duplicates() {
        for puzzle in PUZZLES {
            let board = SudokuBoard::parse(puzzle).unwrap();
            assert!(board.find_duplicate().is_none());
        }
    }
}
