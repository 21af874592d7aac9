use std::collections::HashSet;

use tracing::{debug, error, info, trace};

use crate::config::{ConfigError, GameConfig};
use crate::direction::{Direction, DirectionController};
use crate::food::{FoodSpawner, SpawnError};
use crate::grid::{Cell, GridSize};
use crate::orientation::OrientationResolver;
use crate::snake::SnakeBody;
use crate::snapshot::Snapshot;

/// What a single tick did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    /// The snake slid one cell.
    Moved,
    /// The snake ate and grew by one cell.
    Ate,
    /// The next cell was part of the body; the round was reset.
    Collided,
    /// The snake filled the board; the round was reset.
    BoardCleared,
}

/// Single owner of the game state; advances it one tick at a time.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: GameConfig,
    body: SnakeBody,
    food: Cell,
    heading: DirectionController,
    spawner: FoodSpawner,
    orientation: OrientationResolver,
    head_facing: Direction,
    tail_facing: Direction,
    tick: u64,
    rounds: u32,
}

impl SimulationEngine {
    /// Creates an engine with a fresh round, seeded from `config.seed` when set.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let spawner = match config.seed {
            Some(seed) => FoodSpawner::with_seed(seed),
            None => FoodSpawner::from_entropy(),
        };
        Self::build(config, spawner)
    }

    /// Creates a deterministic engine for tests and reproducible simulations.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, FoodSpawner::with_seed(seed))
    }

    /// Creates an engine from an explicit mid-round position.
    ///
    /// Every cell must lie on the board, the body must not repeat a cell, and
    /// `food` must not lie on `body`. Later food is placed with `seed`.
    pub fn with_state(
        config: GameConfig,
        body: SnakeBody,
        food: Cell,
        heading: Direction,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        check_position(config.board(), &body, food)?;

        let mut engine = Self {
            config,
            body,
            food,
            heading: DirectionController::new(heading),
            spawner: FoodSpawner::with_seed(seed),
            orientation: OrientationResolver::new(),
            head_facing: heading,
            tail_facing: heading,
            tick: 0,
            rounds: 0,
        };
        engine.resolve_orientation();
        Ok(engine)
    }

    fn build(config: GameConfig, spawner: FoodSpawner) -> Result<Self, ConfigError> {
        config.validate()?;

        let board = config.board();
        let heading = DirectionController::default();
        let mut engine = Self {
            config,
            body: SnakeBody::new(start_cell(board), config.starting_length, board),
            food: Cell::new(0, 0),
            head_facing: heading.current(),
            tail_facing: heading.current(),
            heading,
            spawner,
            orientation: OrientationResolver::new(),
            tick: 0,
            rounds: 0,
        };
        engine.reset();
        Ok(engine)
    }

    /// Starts a new round: fresh body in the centre, new food, heading right.
    pub fn reset(&mut self) {
        let board = self.board();
        self.body
            .reset(start_cell(board), self.config.starting_length, board);
        self.heading.reset();
        self.place_food();
        self.resolve_orientation();

        debug!(
            head = ?self.body.head(),
            food = ?self.food,
            length = self.body.len(),
            "round reset"
        );
    }

    /// Requests a new heading; returns whether it was accepted.
    ///
    /// Reversals and repeats are dropped silently.
    pub fn steer(&mut self, requested: Direction) -> bool {
        self.heading.set_heading(requested)
    }

    /// Advances the simulation by exactly one tick.
    pub fn step(&mut self) -> StepOutcome {
        self.tick += 1;

        let board = self.board();
        let heading = self.heading.commit();
        let candidate = board.wrap_cell(self.body.head().offset(heading.delta()));

        // Membership is tested before the tail moves, so the cell the tail is
        // about to leave still counts as occupied.
        if self.body.contains(candidate) {
            debug!(tick = self.tick, cell = ?candidate, score = self.score(), "self collision");
            self.finish_round();
            return StepOutcome::Collided;
        }

        let grew = candidate == self.food;
        self.body.advance(candidate, grew);

        let outcome = if grew {
            match self.spawner.spawn(&self.body, board) {
                Ok(food) => {
                    debug!(tick = self.tick, food = ?food, length = self.body.len(), "food eaten");
                    self.food = food;
                    StepOutcome::Ate
                }
                Err(SpawnError::BoardFull { .. }) => {
                    info!(tick = self.tick, score = self.score(), "board cleared");
                    self.finish_round();
                    return StepOutcome::BoardCleared;
                }
            }
        } else {
            StepOutcome::Moved
        };

        self.resolve_orientation();
        trace!(tick = self.tick, head = ?candidate, ?outcome, "tick");
        outcome
    }

    /// Builds an immutable copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board(),
            body: self.body.segments().copied().collect(),
            food: self.food,
            head: self.head_facing,
            tail: self.tail_facing,
            score: self.score(),
            tick: self.tick,
            rounds: self.rounds,
        }
    }

    /// Cells gained since the round started.
    #[must_use]
    pub fn score(&self) -> u32 {
        let grown = self.body.len().saturating_sub(self.config.starting_length);
        u32::try_from(grown).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn body(&self) -> &SnakeBody {
        &self.body
    }

    #[must_use]
    pub fn food(&self) -> Cell {
        self.food
    }

    /// Heading the next tick will move along.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading.current()
    }

    #[must_use]
    pub fn board(&self) -> GridSize {
        self.config.board()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn finish_round(&mut self) {
        self.rounds += 1;
        self.reset();
    }

    fn place_food(&mut self) {
        match self.spawner.spawn(&self.body, self.board()) {
            Ok(food) => self.food = food,
            // Unreachable for a validated config: a fresh body never fills the board.
            Err(err) => error!(%err, "could not place food after reset"),
        }
    }

    fn resolve_orientation(&mut self) {
        self.head_facing = self.orientation.head(self.heading.current());
        self.tail_facing = self.orientation.tail(&self.body, self.board());
    }
}

// Rejects positions a running game could never reach: cells off the board,
// a body crossing itself, or food that is off the board or under the snake.
fn check_position(board: GridSize, body: &SnakeBody, food: Cell) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(body.len());
    for cell in body.segments() {
        if !board.contains(*cell) {
            return Err(ConfigError::Invalid(format!(
                "snake cell ({}, {}) lies outside the {}x{} board",
                cell.x, cell.y, board.width, board.height
            )));
        }
        if !seen.insert(*cell) {
            return Err(ConfigError::Invalid(format!(
                "snake occupies ({}, {}) more than once",
                cell.x, cell.y
            )));
        }
    }

    if !board.contains(food) {
        return Err(ConfigError::Invalid(format!(
            "food at ({}, {}) lies outside the {}x{} board",
            food.x, food.y, board.width, board.height
        )));
    }
    if seen.contains(&food) {
        return Err(ConfigError::Invalid(format!(
            "food at ({}, {}) overlaps the snake",
            food.x, food.y
        )));
    }

    Ok(())
}

fn start_cell(board: GridSize) -> Cell {
    Cell::new(i32::from(board.width / 2), i32::from(board.height / 2))
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigError, GameConfig};
    use crate::direction::Direction;
    use crate::grid::{Cell, GridSize};
    use crate::snake::SnakeBody;

    use super::{SimulationEngine, StepOutcome};

    fn config(width: u16, height: u16, starting_length: usize) -> GameConfig {
        GameConfig {
            width,
            height,
            starting_length,
            ..GameConfig::default()
        }
    }

    fn body(cells: &[(i32, i32)]) -> SnakeBody {
        SnakeBody::from_segments(cells.iter().map(|&(x, y)| Cell::new(x, y)).collect())
            .expect("test body has at least two cells")
    }

    fn engine(
        config: GameConfig,
        cells: &[(i32, i32)],
        food: (i32, i32),
        heading: Direction,
    ) -> SimulationEngine {
        SimulationEngine::with_state(config, body(cells), Cell::new(food.0, food.1), heading, 1)
            .expect("test state is valid")
    }

    fn cells(engine: &SimulationEngine) -> Vec<Cell> {
        engine.body().segments().copied().collect()
    }

    #[test]
    fn fresh_engine_starts_in_the_centre_facing_right() {
        let engine = SimulationEngine::with_seed(GameConfig::default(), 3).expect("valid config");

        assert_eq!(engine.body().head(), Cell::new(12, 12));
        assert_eq!(engine.body().len(), 5);
        assert_eq!(engine.heading(), Direction::Right);
        assert_eq!(engine.score(), 0);
        assert!(!engine.body().contains(engine.food()));

        let snap = engine.snapshot();
        assert_eq!(snap.head, Direction::Right);
        assert_eq!(snap.tail, Direction::Right);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = SimulationEngine::with_seed(config(3, 3, 5), 1);

        assert!(result.is_err());
    }

    #[test]
    fn food_on_the_body_is_rejected() {
        let result = SimulationEngine::with_state(
            config(10, 10, 3),
            body(&[(5, 5), (6, 5), (7, 5)]),
            Cell::new(6, 5),
            Direction::Left,
            1,
        );

        assert!(result.is_err());
    }

    #[test]
    fn body_cells_off_the_board_are_rejected() {
        let result = SimulationEngine::with_state(
            config(10, 10, 3),
            body(&[(9, 5), (10, 5), (11, 5)]),
            Cell::new(0, 0),
            Direction::Left,
            1,
        );

        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = SimulationEngine::with_state(
            config(10, 10, 3),
            body(&[(0, 2), (-1, 2), (-2, 2)]),
            Cell::new(5, 5),
            Direction::Right,
            1,
        );

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn body_repeating_a_cell_is_rejected() {
        let result = SimulationEngine::with_state(
            config(10, 10, 3),
            body(&[(5, 5), (5, 5), (6, 5)]),
            Cell::new(0, 0),
            Direction::Left,
            1,
        );

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn food_off_the_board_is_rejected() {
        let result = SimulationEngine::with_state(
            config(10, 10, 3),
            body(&[(5, 5), (6, 5), (7, 5)]),
            Cell::new(99, 99),
            Direction::Left,
            1,
        );

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn plain_move_slides_the_body() {
        let mut engine = engine(
            config(10, 10, 3),
            &[(5, 5), (6, 5), (7, 5)],
            (0, 0),
            Direction::Left,
        );

        assert_eq!(engine.step(), StepOutcome::Moved);

        assert_eq!(
            cells(&engine),
            vec![Cell::new(4, 5), Cell::new(5, 5), Cell::new(6, 5)]
        );
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.food(), Cell::new(0, 0));
    }

    #[test]
    fn eating_grows_the_body_and_moves_the_food() {
        let mut engine = engine(
            config(10, 10, 3),
            &[(5, 5), (6, 5), (7, 5)],
            (4, 5),
            Direction::Left,
        );

        assert_eq!(engine.step(), StepOutcome::Ate);

        assert_eq!(
            cells(&engine),
            vec![
                Cell::new(4, 5),
                Cell::new(5, 5),
                Cell::new(6, 5),
                Cell::new(7, 5)
            ]
        );
        assert_eq!(engine.score(), 1);
        assert!(!engine.body().contains(engine.food()));
    }

    #[test]
    fn moving_right_off_the_last_column_wraps_to_zero() {
        let mut engine = engine(
            config(10, 10, 3),
            &[(9, 2), (8, 2), (7, 2)],
            (0, 9),
            Direction::Right,
        );

        engine.step();

        assert_eq!(engine.body().head(), Cell::new(0, 2));
        assert_eq!(engine.snapshot().tail, Direction::Right);
    }

    #[test]
    fn wrap_applies_to_all_four_edges() {
        let cases = [
            (Direction::Left, [(0, 4), (1, 4)], Cell::new(9, 4)),
            (Direction::Up, [(4, 0), (4, 1)], Cell::new(4, 9)),
            (Direction::Down, [(4, 9), (4, 8)], Cell::new(4, 0)),
            (Direction::Right, [(9, 4), (8, 4)], Cell::new(0, 4)),
        ];

        for (heading, cells, expected) in cases {
            let mut engine = engine(config(10, 10, 2), &cells, (5, 5), heading);
            engine.step();
            assert_eq!(engine.body().head(), expected, "heading {heading:?}");
        }
    }

    #[test]
    fn reversal_request_does_not_change_the_axis() {
        let mut engine = engine(
            config(10, 10, 3),
            &[(5, 5), (4, 5), (3, 5)],
            (0, 0),
            Direction::Right,
        );

        assert!(!engine.steer(Direction::Left));
        engine.step();

        assert_eq!(engine.heading(), Direction::Right);
        assert_eq!(engine.body().head(), Cell::new(6, 5));
    }

    #[test]
    fn turn_then_reverse_in_one_tick_keeps_the_turn() {
        let mut engine = engine(
            config(10, 10, 3),
            &[(5, 5), (4, 5), (3, 5)],
            (0, 0),
            Direction::Right,
        );

        assert!(engine.steer(Direction::Up));
        assert!(!engine.steer(Direction::Left));
        engine.step();

        assert_eq!(engine.body().head(), Cell::new(5, 4));
    }

    #[test]
    fn self_collision_resets_the_round() {
        let mut engine = engine(
            config(10, 10, 3),
            &[(2, 2), (1, 2), (1, 3), (2, 3), (3, 3), (3, 2)],
            (8, 8),
            Direction::Down,
        );
        assert_eq!(engine.score(), 3);

        assert_eq!(engine.step(), StepOutcome::Collided);

        assert_eq!(engine.body().len(), 3);
        assert_eq!(engine.body().head(), Cell::new(5, 5));
        assert_eq!(engine.heading(), Direction::Right);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.snapshot().rounds, 1);
        assert!(!engine.body().contains(engine.food()));
    }

    #[test]
    fn moving_into_the_vacating_tail_cell_resets() {
        // A 2x2 loop: the head's next cell is the current tail.
        let mut engine = engine(
            config(10, 10, 3),
            &[(1, 1), (2, 1), (2, 2), (1, 2)],
            (8, 8),
            Direction::Down,
        );

        assert_eq!(engine.step(), StepOutcome::Collided);
        assert_eq!(engine.body().len(), 3);
    }

    #[test]
    fn straight_slide_never_collides_with_its_own_tail() {
        let mut engine = engine(
            config(10, 10, 5),
            &[(6, 5), (5, 5), (4, 5), (3, 5), (2, 5)],
            (0, 0),
            Direction::Right,
        );

        for _ in 0..3 {
            assert_eq!(engine.step(), StepOutcome::Moved);
        }
        assert_eq!(engine.body().len(), 5);
        assert_eq!(engine.body().head(), Cell::new(9, 5));
    }

    #[test]
    fn filling_the_board_counts_as_a_cleared_round() {
        let config = GameConfig {
            width: 3,
            height: 2,
            starting_length: 2,
            ..GameConfig::default()
        };
        // Five of six cells occupied; the head eats the last free one.
        let mut engine = engine(
            config,
            &[(1, 1), (2, 1), (2, 0), (1, 0), (0, 0)],
            (0, 1),
            Direction::Left,
        );

        assert_eq!(engine.step(), StepOutcome::BoardCleared);

        let snap = engine.snapshot();
        assert_eq!(snap.body.len(), 2);
        assert_eq!(snap.rounds, 1);
        assert!(!snap.body.contains(&snap.food));
    }

    #[test]
    fn snapshot_reports_tail_orientation_after_a_turn() {
        let mut engine = engine(
            config(10, 10, 3),
            &[(5, 5), (4, 5), (3, 5)],
            (0, 0),
            Direction::Right,
        );

        engine.steer(Direction::Down);
        engine.step();
        engine.step();

        let snap = engine.snapshot();
        assert_eq!(
            snap.body,
            vec![Cell::new(5, 7), Cell::new(5, 6), Cell::new(5, 5)]
        );
        assert_eq!(snap.head, Direction::Down);
        assert_eq!(snap.tail, Direction::Down);
        assert_eq!(snap.tick, 2);
        assert_eq!(
            snap.board,
            GridSize {
                width: 10,
                height: 10
            }
        );
    }
}
