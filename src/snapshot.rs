use serde::Serialize;

use crate::direction::Direction;
use crate::grid::{Cell, GridSize};

/// Immutable view of one tick, handed to whoever draws the board.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub board: GridSize,
    /// Body cells, head first.
    pub body: Vec<Cell>,
    pub food: Cell,
    pub head: Direction,
    pub tail: Direction,
    /// Cells gained since the round started.
    pub score: u32,
    /// Ticks since the engine was created.
    pub tick: u64,
    /// Rounds finished by a collision or a full board.
    pub rounds: u32,
}

impl Snapshot {
    /// Returns the head cell.
    #[must_use]
    pub fn head_cell(&self) -> Option<Cell> {
        self.body.first().copied()
    }

    /// Returns the tail cell.
    #[must_use]
    pub fn tail_cell(&self) -> Option<Cell> {
        self.body.last().copied()
    }

    /// Returns the segments between head and tail.
    #[must_use]
    pub fn interior(&self) -> &[Cell] {
        match self.body.len() {
            0..=2 => &[],
            len => &self.body[1..len - 1],
        }
    }

    /// Score as shown on the scoreboard.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{:02}", self.score)
    }
}
