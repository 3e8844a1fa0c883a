//! Application state shared between the main thread and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use skyswarm_core::commands::HostCommand;
use skyswarm_core::state::FrameSnapshot;

/// Commands sent from the host side to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A host command to forward to the simulation engine.
    HostCommand(HostCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the game loop after every tick.
pub type SharedSnapshot = Arc<Mutex<Option<FrameSnapshot>>>;

/// Shared application state.
///
/// `mpsc::Sender` is Send but not Sync, so it sits behind a `Mutex`.
/// The snapshot slot is `None` until the first tick completes.
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    /// `None` until the loop has been spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub latest_snapshot: SharedSnapshot,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a host command to the game loop. Returns false if no loop is
    /// running or it has already exited.
    pub fn send(&self, command: HostCommand) -> bool {
        let Ok(guard) = self.command_tx.lock() else {
            return false;
        };
        guard
            .as_ref()
            .is_some_and(|tx| tx.send(GameLoopCommand::HostCommand(command)).is_ok())
    }

    /// Ask the game loop to stop. Harmless if it already has.
    pub fn shutdown(&self) {
        if let Ok(guard) = self.command_tx.lock() {
            if let Some(tx) = guard.as_ref() {
                let _ = tx.send(GameLoopCommand::Shutdown);
            }
        }
    }

    /// Clone of the most recent snapshot, if any.
    pub fn latest(&self) -> Option<FrameSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }
}
