//! Host commands sent from the frame loop, menu and network layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::components::Controls;

/// All possible host actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostCommand {
    // --- Session ---
    /// Reset score, health and clock, then start the match.
    StartMatch,
    /// Show or hide the menu (freezes or resumes the simulation).
    ToggleMenu,

    // --- Client authority ---
    /// A remote client is ready: spawn a ship it controls.
    ConnectClient { client_id: u32 },
    /// A remote client left: remove its ship and missile.
    DisconnectClient { client_id: u32 },
    /// Latest controls for a ship (local input or a client's replicated controls).
    SetControls { ship_id: u32, controls: Controls },

    // --- Combat bridge ---
    /// A host-side physics contact between a ship's missile and a boid.
    NotifyHit {
        set: usize,
        boid: usize,
        ship_id: u32,
    },
}
