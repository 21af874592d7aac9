use serde::Serialize;

/// Logical board dimensions in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns `cell` with each coordinate wrapped onto the torus.
    #[must_use]
    pub fn wrap_cell(self, cell: Cell) -> Cell {
        Cell {
            x: wrap(cell.x, i32::from(self.width)),
            y: wrap(cell.y, i32::from(self.height)),
        }
    }

    /// Returns true when the cell lies inside the board.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i32::from(self.width)
            && cell.y < i32::from(self.height)
    }
}

/// Board position in cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this cell shifted by `(dx, dy)` without wrapping.
    #[must_use]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Maps a coordinate that stepped one cell off an axis back onto it.
///
/// Negative values land on the last cell, values at or past `axis_len` land
/// on zero, anything else is returned untouched.
#[must_use]
pub fn wrap(coordinate: i32, axis_len: i32) -> i32 {
    if coordinate < 0 {
        axis_len - 1
    } else if coordinate >= axis_len {
        0
    } else {
        coordinate
    }
}

#[cfg(test)]
mod tests {
    use super::{wrap, Cell, GridSize};

    #[test]
    fn wrap_moves_off_board_coordinates_to_the_opposite_edge() {
        assert_eq!(wrap(-1, 25), 24);
        assert_eq!(wrap(25, 25), 0);
        assert_eq!(wrap(0, 25), 0);
        assert_eq!(wrap(24, 25), 24);
    }

    #[test]
    fn wrap_cell_handles_both_axes() {
        let board = GridSize {
            width: 10,
            height: 8,
        };

        assert_eq!(board.wrap_cell(Cell::new(-1, 3)), Cell::new(9, 3));
        assert_eq!(board.wrap_cell(Cell::new(4, 8)), Cell::new(4, 0));
        assert_eq!(board.wrap_cell(Cell::new(10, -1)), Cell::new(0, 7));
    }

    #[test]
    fn total_cells_multiplies_axes() {
        let board = GridSize {
            width: 25,
            height: 25,
        };
        assert_eq!(board.total_cells(), 625);
        assert!(board.contains(Cell::new(24, 0)));
        assert!(!board.contains(Cell::new(25, 0)));
    }
}
