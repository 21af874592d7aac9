use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::grid::{Cell, GridSize};
use crate::snake::SnakeBody;

/// Food could not be placed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum SpawnError {
    #[error("no free cell left on the {width}x{height} board")]
    BoardFull { width: u16, height: u16 },
}

/// Places food on cells the snake does not occupy.
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    rng: StdRng,
}

impl FoodSpawner {
    /// Creates a spawner seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic spawner for tests and reproducible runs.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a free cell uniformly at random.
    pub fn spawn(&mut self, body: &SnakeBody, board: GridSize) -> Result<Cell, SpawnError> {
        spawn_position(&mut self.rng, body, board)
    }
}

/// Rejection-samples a cell in `[0, width) x [0, height)` not covered by `body`.
///
/// Fails instead of looping when the body already fills the board.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    body: &SnakeBody,
    board: GridSize,
) -> Result<Cell, SpawnError> {
    if body.len() >= board.total_cells() {
        return Err(SpawnError::BoardFull {
            width: board.width,
            height: board.height,
        });
    }

    loop {
        let candidate = Cell::new(
            rng.gen_range(0..i32::from(board.width)),
            rng.gen_range(0..i32::from(board.height)),
        );
        if !body.contains(candidate) {
            return Ok(candidate);
        }
    }
}
