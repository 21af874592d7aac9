use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{info, trace, warn};

use crate::direction::Direction;
use crate::game::SimulationEngine;
use crate::snapshot::Snapshot;

const EMPTY_SLOT: u8 = u8::MAX;

/// Single-slot mailbox for the latest heading request.
///
/// Writers never block; a later request overwrites an earlier one that the
/// tick loop has not picked up yet.
#[derive(Debug)]
pub struct HeadingSlot {
    pending: AtomicU8,
}

impl HeadingSlot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: AtomicU8::new(EMPTY_SLOT),
        }
    }

    /// Stores `direction` as the pending request.
    pub fn request(&self, direction: Direction) {
        self.pending.store(direction.to_bits(), Ordering::Release);
    }

    /// Removes and returns the pending request, if any.
    pub fn take(&self) -> Option<Direction> {
        Direction::from_bits(self.pending.swap(EMPTY_SLOT, Ordering::AcqRel))
    }
}

impl Default for HeadingSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the most recently published snapshot.
///
/// Snapshots are built completely before they are swapped in, so readers
/// only ever see whole ticks.
#[derive(Debug)]
pub struct SnapshotCell {
    latest: Mutex<Arc<Snapshot>>,
}

impl SnapshotCell {
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self {
            latest: Mutex::new(Arc::new(initial)),
        }
    }

    /// Replaces the published snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Returns the latest published snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<Snapshot> {
        Arc::clone(&self.latest.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Runs a `SimulationEngine` on its own thread at a fixed rate.
///
/// The tick thread is the only writer of game state. Input reaches it
/// through [`HeadingSlot`] and results leave through [`SnapshotCell`].
#[derive(Debug)]
pub struct TickScheduler {
    headings: Arc<HeadingSlot>,
    snapshots: Arc<SnapshotCell>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<SimulationEngine>>,
}

impl TickScheduler {
    /// Moves `engine` onto a new thread that steps it every `period`.
    pub fn spawn(engine: SimulationEngine, period: Duration) -> std::io::Result<Self> {
        let headings = Arc::new(HeadingSlot::new());
        let snapshots = Arc::new(SnapshotCell::new(engine.snapshot()));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = {
            let headings = Arc::clone(&headings);
            let snapshots = Arc::clone(&snapshots);
            thread::Builder::new()
                .name("tick-loop".to_owned())
                .spawn(move || {
                    run_loop(engine, period, &headings, &snapshots, |timeout| {
                        match stop_rx.recv_timeout(timeout) {
                            Err(RecvTimeoutError::Timeout) => false,
                            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
                        }
                    })
                })?
        };

        info!(?period, "tick loop started");

        Ok(Self {
            headings,
            snapshots,
            stop: Some(stop_tx),
            worker: Some(worker),
        })
    }

    /// Fire-and-forget heading request from any thread.
    pub fn request_heading(&self, direction: Direction) {
        self.headings.request(direction);
    }

    /// Returns the most recently completed tick.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshots.load()
    }

    /// Stops the tick loop, waits for it, and hands the engine back.
    ///
    /// A tick that is already running is allowed to finish first.
    pub fn shutdown(mut self) -> Option<SimulationEngine> {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> Option<SimulationEngine> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }

        let worker = self.worker.take()?;
        match worker.join() {
            Ok(engine) => {
                info!(tick = engine.snapshot().tick, "tick loop stopped");
                Some(engine)
            }
            Err(_) => {
                warn!("tick loop panicked");
                None
            }
        }
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        let _ = self.stop_and_join();
    }
}

/// Steps the engine on a fixed schedule until `wait` reports shutdown.
///
/// `wait` blocks for at most the given timeout and returns true when the
/// loop should stop.
fn run_loop<W>(
    mut engine: SimulationEngine,
    period: Duration,
    headings: &HeadingSlot,
    snapshots: &SnapshotCell,
    mut wait: W,
) -> SimulationEngine
where
    W: FnMut(Duration) -> bool,
{
    let mut deadline = Instant::now() + period;

    loop {
        let timeout = deadline.saturating_duration_since(Instant::now());
        if wait(timeout) {
            break;
        }

        if let Some(direction) = headings.take() {
            engine.steer(direction);
        }
        let outcome = engine.step();
        snapshots.publish(engine.snapshot());
        trace!(?outcome, "published snapshot");

        deadline += period;
        let now = Instant::now();
        if deadline < now {
            // Fell behind; skip missed ticks instead of bursting.
            deadline = now + period;
        }
    }

    engine
}
