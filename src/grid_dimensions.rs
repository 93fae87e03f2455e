use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::units::{ColumnIndex, ColumnsCount, NodesCount, RowIndex, RowsCount};

pub type NeighbourSmallVec = SmallVec<[(CompassPrimary, usize); 4]>;

/// Coordinate math for a rectangular grid stored column by column: a cell's linear index is
/// `row + column * rows`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RectGridDimensions {
    rows: RowsCount,
    columns: ColumnsCount,
}

impl RectGridDimensions {
    pub fn new(columns: ColumnsCount, rows: RowsCount) -> RectGridDimensions {
        RectGridDimensions { rows, columns }
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.rows.0 * self.columns.0)
    }

    #[inline(always)]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline(always)]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline]
    pub fn is_valid(&self, row: RowIndex, column: ColumnIndex) -> bool {
        row.0 < self.rows.0 && column.0 < self.columns.0
    }

    #[inline]
    pub fn index(&self, row: RowIndex, column: ColumnIndex) -> usize {
        row.0 + column.0 * self.rows.0
    }

    #[inline]
    pub fn position(&self, index: usize) -> (RowIndex, ColumnIndex) {
        (RowIndex(index % self.rows.0), ColumnIndex(index / self.rows.0))
    }

    pub fn coordinate(&self, index: usize) -> Cartesian2DCoordinate {
        let (RowIndex(row), ColumnIndex(column)) = self.position(index);
        Cartesian2DCoordinate::new(row as u32, column as u32)
    }

    /// Returns None if the coordinate lies outside the grid.
    pub fn coordinate_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        let (row, column) = (RowIndex(coord.x as usize), ColumnIndex(coord.y as usize));
        if self.is_valid(row, column) {
            Some(self.index(row, column))
        } else {
            None
        }
    }

    /// The cell one step away in `direction`, or None when that step leaves the grid.
    pub fn neighbour(&self, index: usize, direction: CompassPrimary) -> Option<usize> {
        let (RowIndex(row), ColumnIndex(column)) = self.position(index);

        let (next_row, next_column) = match direction {
            CompassPrimary::North => (Some(row), column.checked_add(1)),
            CompassPrimary::East => (row.checked_add(1), Some(column)),
            CompassPrimary::South => (Some(row), column.checked_sub(1)),
            CompassPrimary::West => (row.checked_sub(1), Some(column)),
        };

        match (next_row, next_column) {
            (Some(r), Some(c)) if self.is_valid(RowIndex(r), ColumnIndex(c)) => {
                Some(self.index(RowIndex(r), ColumnIndex(c)))
            }
            _ => None,
        }
    }

    /// Existing neighbours in N-E-S-W order.
    pub fn neighbours(&self, index: usize) -> NeighbourSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour(index, *dir).map(|n| (*dir, n)))
            .collect()
    }

    /// Strictly inside the outer boundary: not in the first or last row or column.
    pub fn is_interior(&self, index: usize) -> bool {
        let (RowIndex(row), ColumnIndex(column)) = self.position(index);
        row > 0 && column > 0 && row + 1 < self.rows.0 && column + 1 < self.columns.0
    }
}
