//! Fill a crossword grid from a vocabulary by treating it as a constraint-satisfaction problem.
//!
//! Each slot in the grid is a variable whose domain starts out as the whole vocabulary. Node
//! consistency cuts every domain down to words of the slot's length, AC-3 removes words that
//! can't agree with any candidate in a crossing slot, and a backtracking search using the
//! minimum-remaining-values, degree and least-constraining-value heuristics looks for a complete
//! assignment with no repeated words. Domain narrowing done while exploring a branch is undone
//! when the search backs out of it.
//!
//! ```
//! use gridcsp::{find_fill, Crossword, Direction, Variable, Vocabulary};
//!
//! let crossword = Crossword::from_variables(vec![
//!     Variable::new((0, 0), Direction::Across, 3),
//!     Variable::new((0, 0), Direction::Down, 3),
//! ]).unwrap();
//! let vocabulary = Vocabulary::new(["CAT", "CAR", "DOG", "BAT"]);
//!
//! let result = find_fill(&crossword, &vocabulary).expect("Failed to find a fill");
//! assert!(result.assignment.is_valid(&crossword, &vocabulary));
//! ```

mod assignment;
mod config;
pub mod consistency;
mod crossword;
mod domains;
pub mod error;
mod search;
mod vocabulary;

pub use assignment::{Assignment, Choice};
pub use config::SolverConfig;
pub use consistency::{ac3, enforce_node_consistency, revise, Arc};
pub use crossword::{Crossing, Crossword, Variable};
pub use domains::Domains;
pub use error::{ConfigError, PuzzleError};
pub use search::{find_fill, find_fill_with_config, FillSuccess, Filler, NoSolution, Statistics};
pub use vocabulary::{Vocabulary, Word};

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given slot, based on its index in the crossword's variable list.
pub type SlotId = usize;

/// An identifier for a given word, based on its index in the `Vocabulary`.
pub type WordId = usize;

/// Zero-indexed (row, column) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
}
