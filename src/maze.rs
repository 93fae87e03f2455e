use std::fmt;

use smallvec::SmallVec;

use crate::cells::{Cell, CompassPrimary};
use crate::grid_dimensions::RectGridDimensions;
use crate::units::{ColumnsCount, RowsCount};

/// A snapshot of a maze: every cell in grid index order plus generation progress.
///
/// `done` is false while a stepped generation is still carving. `steps` counts carve loop
/// iterations performed so far.
#[derive(Clone, Eq, PartialEq)]
pub struct Maze {
    cells: Vec<Cell>,
    dimensions: RectGridDimensions,
    done: bool,
    steps: usize,
}

/// The new value of a single cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CellUpdate {
    pub index: usize,
    pub cell: Cell,
}

/// What one generation step changed: the cell departed, then the cell entered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MazeUpdate {
    pub cells: [CellUpdate; 2],
    pub steps: usize,
    pub done: bool,
}

impl Maze {
    /// A maze of fully enclosed, unvisited cells.
    pub fn new(dimensions: RectGridDimensions) -> Maze {
        Maze {
            cells: vec![Cell::enclosed(); dimensions.size().0],
            dimensions,
            done: false,
            steps: 0,
        }
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn dimensions(&self) -> &RectGridDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Can you walk from `index` one step in `direction`? Both sides of the shared wall must be
    /// open.
    pub fn is_passable(&self, index: usize, direction: CompassPrimary) -> bool {
        match self.dimensions.neighbour(index, direction) {
            Some(neighbour) => {
                !self.cells[index].has_wall(direction) &&
                !self.cells[neighbour].has_wall(direction.opposite())
            }
            None => false,
        }
    }

    /// Cells linked to `index` by a passage, in N-E-S-W order.
    pub fn links(&self, index: usize) -> SmallVec<[usize; 4]> {
        self.dimensions
            .neighbours(index)
            .into_iter()
            .filter(|(dir, _)| self.is_passable(index, *dir))
            .map(|(_, neighbour)| neighbour)
            .collect()
    }

    /// Number of carved passages between adjacent cells. A perfect maze has `size - 1`.
    pub fn links_count(&self) -> usize {
        (0..self.size())
            .map(|index| {
                [CompassPrimary::North, CompassPrimary::East]
                    .iter()
                    .filter(|dir| self.is_passable(index, **dir))
                    .count()
            })
            .sum()
    }

    pub fn dead_ends_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_dead_end()).count()
    }

    /// Every shared wall is either standing on both sides or open on both sides.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size()).all(|index| {
            self.dimensions.neighbours(index).into_iter().all(|(dir, neighbour)| {
                self.cells[index].has_wall(dir) == self.cells[neighbour].has_wall(dir.opposite())
            })
        })
    }

    /// Fold an incremental generation step into this snapshot.
    pub fn apply_update(&mut self, update: &MazeUpdate) {
        for cell_update in update.cells.iter() {
            if let Some(cell) = self.cells.get_mut(cell_update.index) {
                *cell = cell_update.cell;
            }
        }
        self.steps = update.steps;
        self.done = update.done;
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn set_progress(&mut self, steps: usize, done: bool) {
        self.steps = steps;
        self.done = done;
    }

    /// Clear the wall between `index` and its neighbour in `direction` on both sides.
    /// Returns false when there is no neighbour that way.
    pub(crate) fn carve(&mut self, index: usize, direction: CompassPrimary) -> bool {
        if let Some(neighbour) = self.dimensions.neighbour(index, direction) {
            self.cells[index].walls.remove(direction);
            self.cells[neighbour].walls.remove(direction.opposite());
            true
        } else {
            false
        }
    }
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Maze :: columns: {:?}, rows: {:?}, done: {:?}, steps: {:?}",
               self.columns().0, self.rows().0, self.done, self.steps)
    }
}
