use serde::Serialize;

/// Axis-aligned heading of the snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Every heading, in the order tail orientation is matched against.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Returns the unit `(dx, dy)` step for this heading. `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }

    /// Returns the heading whose unit step equals `delta`, if any.
    #[must_use]
    pub fn from_delta(delta: (i32, i32)) -> Option<Self> {
        Self::ALL.into_iter().find(|direction| direction.delta() == delta)
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    pub(crate) fn to_bits(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Up => 2,
            Self::Down => 3,
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Up),
            3 => Some(Self::Down),
            _ => None,
        }
    }
}

/// Heading every round starts with.
pub const INITIAL_HEADING: Direction = Direction::Right;

/// Owns the current heading and filters illegal turns.
///
/// Requests are checked against the heading the snake last *moved* with,
/// not against a heading accepted earlier in the same tick. Several
/// requests between two ticks therefore cannot chain into a reversal:
/// moving right, `Up` then `Left` leaves the heading at `Up`.
#[derive(Debug, Clone)]
pub struct DirectionController {
    current: Direction,
    moved: Direction,
}

impl DirectionController {
    #[must_use]
    pub fn new(heading: Direction) -> Self {
        Self {
            current: heading,
            moved: heading,
        }
    }

    /// Returns the heading the next tick will move along.
    #[must_use]
    pub fn current(&self) -> Direction {
        self.current
    }

    /// Applies a heading request. Returns whether the heading changed.
    ///
    /// Repeating the current heading is a no-op and reversing onto the
    /// neck is silently ignored.
    pub fn set_heading(&mut self, requested: Direction) -> bool {
        if requested == self.current || requested == self.moved.opposite() {
            return false;
        }

        self.current = requested;
        true
    }

    /// Locks in the current heading for the tick that is about to move.
    pub fn commit(&mut self) -> Direction {
        self.moved = self.current;
        self.current
    }

    /// Restores the start-of-round heading.
    pub fn reset(&mut self) {
        *self = Self::new(INITIAL_HEADING);
    }
}

impl Default for DirectionController {
    fn default() -> Self {
        Self::new(INITIAL_HEADING)
    }
}
