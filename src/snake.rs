use std::collections::VecDeque;

use crate::grid::{Cell, GridSize};

/// Ordered cells occupied by the snake, head first.
///
/// A body always holds at least two cells so that head, tail and the cell
/// before the tail are defined.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SnakeBody {
    cells: VecDeque<Cell>,
}

impl SnakeBody {
    /// Lays out `length` cells ending at `start` and extending towards
    /// negative x, wrapped onto `board`. The result faces right.
    #[must_use]
    pub fn new(start: Cell, length: usize, board: GridSize) -> Self {
        let mut body = Self {
            cells: VecDeque::with_capacity(length),
        };
        body.reset(start, length, board);
        body
    }

    /// Creates a body from explicit segments (front is head).
    ///
    /// Returns `None` for fewer than two segments.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>) -> Option<Self> {
        if segments.len() < 2 {
            return None;
        }

        Some(Self {
            cells: VecDeque::from(segments),
        })
    }

    /// Replaces the body with a fresh rightward-facing snake.
    pub fn reset(&mut self, start: Cell, length: usize, board: GridSize) {
        let width = i32::from(board.width);

        self.cells.clear();
        let mut x = start.x;
        for _ in 0..length.max(2) {
            self.cells.push_back(Cell::new(x.rem_euclid(width), start.y));
            x -= 1;
        }
    }

    /// Pushes `new_head` to the front and drops the tail unless the snake grew.
    pub fn advance(&mut self, new_head: Cell, grew: bool) {
        self.cells.push_front(new_head);
        if !grew {
            let _ = self.cells.pop_back();
        }
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    /// Returns the current tail cell.
    #[must_use]
    pub fn tail(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// Returns the cell directly in front of the tail.
    #[must_use]
    pub fn previous_to_tail(&self) -> Cell {
        self.cells[self.cells.len() - 2]
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}
