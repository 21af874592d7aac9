//! Wrap-around grid Snake.
//!
//! [`game::SimulationEngine`] owns the board and advances it one tick per
//! [`game::SimulationEngine::step`]; [`scheduler::TickScheduler`] drives it
//! on its own thread and publishes a [`snapshot::Snapshot`] after every
//! tick. The terminal front end in `renderer`, `input` and
//! `terminal_runtime` only ever reads snapshots.

pub mod config;
pub mod direction;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod logging;
pub mod orientation;
pub mod renderer;
pub mod scheduler;
pub mod snake;
pub mod snapshot;
pub mod terminal_runtime;
