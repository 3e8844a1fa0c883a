//! Game loop thread: runs the simulation engine at the fixed tick rate and
//! publishes snapshots.
//!
//! The engine is built by the caller so configuration errors surface before
//! the thread starts, then moved into the thread. Commands arrive via an
//! `mpsc` channel. Snapshots are stored in shared state for polling.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use skyswarm_core::constants::TICK_RATE;
use skyswarm_core::events::GameEvent;
use skyswarm_core::state::FrameSnapshot;
use skyswarm_sim::SimulationEngine;

use crate::state::{GameLoopCommand, SharedSnapshot};

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// When the loop stops on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopLimits {
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Stop as soon as a match ends.
    pub stop_on_match_over: bool,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: SharedSnapshot,
    limits: LoopLimits,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("skyswarm-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot, limits);
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, channel disconnect, or a limit is hit.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &std::sync::Mutex<Option<FrameSnapshot>>,
    limits: LoopLimits,
) {
    let mut next_tick_time = Instant::now();
    let mut ticks: u64 = 0;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::HostCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => {
                    info!(ticks, "game loop shut down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (engine handles menu semantics internally)
        let snapshot = engine.tick();
        ticks += 1;
        for event in &snapshot.events {
            debug!(?event, tick = snapshot.time.tick, "game event");
        }
        let match_over = snapshot
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::MatchOver { .. }));

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if limits.max_ticks.is_some_and(|max| ticks >= max)
            || (limits.stop_on_match_over && match_over)
        {
            info!(ticks, match_over, "game loop finished");
            return;
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}
