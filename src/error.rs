use thiserror::Error;

use crate::{Direction, GridCoord};

/// Errors raised while building a `Crossword` from a grid or a list of entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("grid has no rows")]
    EmptyGrid,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("grid contains no slots of two or more cells")]
    NoSlots,

    #[error("entry at {loc:?} ({dir:?}) has zero length")]
    ZeroLength { loc: GridCoord, dir: Direction },

    #[error("two entries start at {loc:?} going {dir:?}")]
    DuplicateSlot { loc: GridCoord, dir: Direction },

    #[error("entries {first} and {second} run the same direction through cell {cell:?}")]
    ParallelOverlap { first: usize, second: usize, cell: GridCoord },
}

/// Errors raised while loading a `SolverConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
