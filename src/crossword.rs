use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::error::PuzzleError;
use crate::{Assignment, Direction, GridCoord, SlotId, Vocabulary, MAX_SLOT_LENGTH};

/// A word slot in the grid. Two variables are the same slot if they start in the same cell and run
/// the same direction; `length` is carried along but isn't part of the identity.
#[derive(Debug, Clone, Copy)]
pub struct Variable {
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.start_cell == other.start_cell && self.direction == other.direction
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start_cell.hash(state);
        self.direction.hash(state);
    }
}

impl Variable {
    pub fn new(start_cell: GridCoord, direction: Direction, length: usize) -> Variable {
        Variable { start_cell, direction, length }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        let (row, col) = self.start_cell;
        (0..self.length).map(|cell_idx| {
            match self.direction {
                Direction::Across => (row, col + cell_idx),
                Direction::Down => (row + cell_idx, col),
            }
        }).collect()
    }
}

/// A struct representing a crossing between one slot and another: `cell` is the position of the
/// shared cell within this slot and `other_slot_cell` its position within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub cell: usize,
    pub other_slot_cell: usize,
}

/// The immutable structure of a puzzle: which cells are fillable, which slots exist, and where
/// they cross.
pub struct Crossword {
    height: usize,
    width: usize,
    structure: Vec<Vec<bool>>,
    variables: Vec<Variable>,
    crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,
    ids_by_variable: HashMap<Variable, SlotId>,
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossword")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("variables", &self.variables)
            .field("crossings", &self.crossings)
            .finish()
    }
}

impl Crossword {
    /// Derive slots from a grid of fillable (`true`) and blocked (`false`) cells. Every maximal run
    /// of two or more fillable cells in a row or column becomes a slot.
    pub fn from_structure(structure: Vec<Vec<bool>>) -> Result<Crossword, PuzzleError> {
        let width = structure.first().map(|row| row.len()).ok_or(PuzzleError::EmptyGrid)?;
        if width == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        for (row, cells) in structure.iter().enumerate() {
            if cells.len() != width {
                return Err(PuzzleError::RaggedRow { row, expected: width, found: cells.len() });
            }
        }

        fn collect_runs(
            lines: impl Iterator<Item=Vec<bool>>,
            direction: Direction,
            variables: &mut Vec<Variable>,
        ) {
            for (line_idx, line) in lines.enumerate() {
                let mut run_start: Option<usize> = None;

                // A trailing `false` flushes a run that reaches the edge of the grid.
                for (idx, fillable) in line.iter().copied().chain(std::iter::once(false)).enumerate() {
                    match (fillable, run_start) {
                        (true, None) => run_start = Some(idx),
                        (false, Some(start)) => {
                            if idx - start > 1 {
                                let start_cell = match direction {
                                    Direction::Across => (line_idx, start),
                                    Direction::Down => (start, line_idx),
                                };
                                variables.push(Variable::new(start_cell, direction, idx - start));
                            }
                            run_start = None;
                        }
                        _ => {}
                    }
                }
            }
        }

        let mut variables: Vec<Variable> = vec![];
        collect_runs(structure.iter().cloned(), Direction::Across, &mut variables);
        collect_runs(
            (0..width).map(|col| structure.iter().map(|row| row[col]).collect::<Vec<bool>>()),
            Direction::Down,
            &mut variables,
        );

        if variables.is_empty() {
            return Err(PuzzleError::NoSlots);
        }

        Crossword::build(structure, variables)
    }

    /// Build a crossword from an explicit list of slots. The grid is sized to the extents of the
    /// slots, and a cell is fillable iff some slot covers it.
    pub fn from_variables(variables: Vec<Variable>) -> Result<Crossword, PuzzleError> {
        if variables.is_empty() {
            return Err(PuzzleError::NoSlots);
        }

        let mut height = 0;
        let mut width = 0;
        for variable in &variables {
            if variable.length == 0 {
                return Err(PuzzleError::ZeroLength {
                    loc: variable.start_cell,
                    dir: variable.direction,
                });
            }
            for (row, col) in variable.cell_coords() {
                height = height.max(row + 1);
                width = width.max(col + 1);
            }
        }

        let mut structure = vec![vec![false; width]; height];
        for variable in &variables {
            for (row, col) in variable.cell_coords() {
                structure[row][col] = true;
            }
        }

        Crossword::build(structure, variables)
    }

    /// An open `size` x `size` grid with one across and one down slot per row and column.
    pub fn square(size: usize) -> Result<Crossword, PuzzleError> {
        Crossword::from_structure(vec![vec![true; size]; size])
    }

    fn build(structure: Vec<Vec<bool>>, variables: Vec<Variable>) -> Result<Crossword, PuzzleError> {
        let mut ids_by_variable: HashMap<Variable, SlotId> = HashMap::with_capacity(variables.len());
        for (slot_id, &variable) in variables.iter().enumerate() {
            if ids_by_variable.insert(variable, slot_id).is_some() {
                return Err(PuzzleError::DuplicateSlot {
                    loc: variable.start_cell,
                    dir: variable.direction,
                });
            }
        }

        // (slot id, cell index within slot) for each slot covering a cell.
        let mut entries_by_cell: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();
        for (slot_id, variable) in variables.iter().enumerate() {
            for (cell_idx, loc) in variable.cell_coords().into_iter().enumerate() {
                let entries = entries_by_cell.entry(loc).or_default();

                if let Some(&(other_id, _)) = entries.iter()
                    .find(|&&(other_id, _)| variables[other_id].direction == variable.direction)
                {
                    return Err(PuzzleError::ParallelOverlap {
                        first: other_id,
                        second: slot_id,
                        cell: loc,
                    });
                }
                entries.push((slot_id, cell_idx));
            }
        }

        // Only two directions exist and same-direction sharing is rejected above, so each cell has
        // at most one crossing and each pair of slots shares at most one cell.
        let crossings = variables.iter().enumerate().map(|(slot_id, variable)| {
            variable.cell_coords().iter().enumerate().filter_map(|(cell_idx, loc)| {
                entries_by_cell[loc].iter()
                    .find(|&&(other_id, _)| other_id != slot_id)
                    .map(|&(other_slot_id, other_slot_cell)| Crossing {
                        other_slot_id,
                        cell: cell_idx,
                        other_slot_cell,
                    })
            }).collect()
        }).collect();

        let height = structure.len();
        let width = structure.first().map(|row| row.len()).unwrap_or(0);

        Ok(Crossword { height, width, structure, variables, crossings, ids_by_variable })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_fillable(&self, (row, col): GridCoord) -> bool {
        self.structure.get(row).and_then(|cells| cells.get(col)).copied().unwrap_or(false)
    }

    pub fn slot_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, slot_id: SlotId) -> &Variable {
        &self.variables[slot_id]
    }

    /// Find the slot id for a variable, matching on start cell and direction.
    pub fn slot_id(&self, variable: &Variable) -> Option<SlotId> {
        self.ids_by_variable.get(variable).copied()
    }

    pub fn crossings(&self, slot_id: SlotId) -> &[Crossing] {
        &self.crossings[slot_id]
    }

    /// The slots crossing the given one.
    pub fn neighbors(&self, slot_id: SlotId) -> impl Iterator<Item=SlotId> + '_ {
        self.crossings[slot_id].iter().map(|crossing| crossing.other_slot_id)
    }

    /// Number of slots crossing the given one.
    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.crossings[slot_id].len()
    }

    /// For slots `x` and `y` sharing a cell, the index of that cell in `x` and in `y`.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<(usize, usize)> {
        self.crossings[x].iter()
            .find(|crossing| crossing.other_slot_id == y)
            .map(|crossing| (crossing.cell, crossing.other_slot_cell))
    }

    /// Lay an assignment out on the grid. Blocked and unassigned cells are `None`.
    pub fn letter_grid(&self, assignment: &Assignment, vocabulary: &Vocabulary) -> Vec<Vec<Option<char>>> {
        let mut letters = vec![vec![None; self.width]; self.height];

        for (slot_id, word_id) in assignment.iter() {
            let word = vocabulary.word(word_id);
            for (&(row, col), &glyph) in self.variables[slot_id].cell_coords().iter().zip(&word.glyphs) {
                letters[row][col] = Some(glyph);
            }
        }

        letters
    }
}
