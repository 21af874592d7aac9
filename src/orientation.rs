use crate::direction::Direction;
use crate::grid::GridSize;
use crate::snake::SnakeBody;

/// Derives which way the head and tail sprites should face.
///
/// Purely cosmetic: nothing here feeds back into movement or collisions.
#[derive(Debug, Clone)]
pub struct OrientationResolver {
    last_tail: Direction,
}

impl OrientationResolver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_tail: Direction::Left,
        }
    }

    /// The head always faces the heading the snake moves along.
    #[must_use]
    pub fn head(&self, heading: Direction) -> Direction {
        heading
    }

    /// Returns the direction pointing from the tail to the segment before it.
    ///
    /// A step across a board edge counts as a unit step. When the two cells
    /// are not neighbours, the last resolved orientation is reused.
    pub fn tail(&mut self, body: &SnakeBody, board: GridSize) -> Direction {
        let tail = body.tail();
        let previous = body.previous_to_tail();
        let delta = (
            unwrap_delta(previous.x - tail.x, i32::from(board.width)),
            unwrap_delta(previous.y - tail.y, i32::from(board.height)),
        );

        if let Some(direction) = Direction::from_delta(delta) {
            self.last_tail = direction;
        }
        self.last_tail
    }

    /// Returns the most recently resolved tail orientation.
    #[must_use]
    pub fn last_tail(&self) -> Direction {
        self.last_tail
    }
}

impl Default for OrientationResolver {
    fn default() -> Self {
        Self::new()
    }
}

// A difference of `axis_len - 1` means the neighbour sits across the seam.
fn unwrap_delta(delta: i32, axis_len: i32) -> i32 {
    if axis_len > 2 && delta == axis_len - 1 {
        -1
    } else if axis_len > 2 && delta == -(axis_len - 1) {
        1
    } else {
        delta
    }
}
