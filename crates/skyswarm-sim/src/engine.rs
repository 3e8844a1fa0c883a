//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the flock, the hecs ECS world with ships and
//! missiles, and the match session. It processes host commands, runs all
//! systems, and produces `FrameSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use skyswarm_core::commands::HostCommand;
use skyswarm_core::components::Ship;
use skyswarm_core::config::{CombatConfig, FlockConfig};
use skyswarm_core::constants::DT;
use skyswarm_core::enums::{GamePhase, MatchEndReason};
use skyswarm_core::error::{ConfigError, FlockError};
use skyswarm_core::events::GameEvent;
use skyswarm_core::state::FrameSnapshot;
use skyswarm_core::types::SimTime;
use skyswarm_flock::Flock;

use crate::session::{ContactState, MatchClock};
use crate::systems;
use crate::world_setup;

/// Ship id of the host's own ship, present from construction.
pub const LOCAL_SHIP_ID: u32 = 0;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub flock: FlockConfig,
    pub combat: CombatConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            flock: FlockConfig::default(),
            combat: CombatConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flock.validate()?;
        self.combat.validate()
    }
}

/// The simulation engine. Owns the flock, the ECS world and all session state.
pub struct SimulationEngine {
    world: World,
    flock: Flock,
    combat: CombatConfig,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    clock: MatchClock,
    contacts: ContactState,
    match_over: bool,
    next_ship_id: u32,
    command_queue: VecDeque<HostCommand>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Validate `config`, populate the flock and spawn the local ship.
    pub fn new(config: SimConfig) -> Result<Self, FlockError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let flock = Flock::new(&config.flock, &mut rng)?;
        let mut world = World::new();
        world_setup::spawn_ship(&mut world, LOCAL_SHIP_ID, None, &config.combat);

        info!(
            seed = config.seed,
            sets = config.flock.set_count,
            slots = flock.total_slots(),
            "simulation engine created"
        );

        Ok(Self {
            world,
            flock,
            clock: MatchClock::new(&config.combat),
            combat: config.combat,
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng,
            contacts: ContactState::default(),
            match_over: false,
            next_ship_id: LOCAL_SHIP_ID + 1,
            command_queue: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Queue a host command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: HostCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = HostCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one fixed tick and return the resulting snapshot.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.advance(DT)
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    ///
    /// Commands are applied first. In the menu the world is frozen and only
    /// command side effects show up in the snapshot.
    pub fn advance(&mut self, dt: f32) -> FrameSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems(dt);
            self.time.advance(dt);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.flock,
            &self.time,
            self.phase,
            self.clock.remaining(),
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current countdown value.
    pub fn match_clock(&self) -> i32 {
        self.clock.remaining()
    }

    /// Mutable flock access (for tests that disable sets or place boids).
    #[cfg(test)]
    pub fn flock_mut(&mut self) -> &mut Flock {
        &mut self.flock
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single host command.
    fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::StartMatch => {
                if self.phase == GamePhase::Menu {
                    world_setup::reset_ships(&mut self.world, &self.combat);
                    self.flock.respawn_inactive(&mut self.rng);
                    self.clock.reset();
                    self.contacts.clear();
                    self.match_over = false;
                    self.time = SimTime::default();
                    self.phase = GamePhase::Active;
                    self.events.push(GameEvent::MatchStarted);
                    info!("match started");
                }
            }
            HostCommand::ToggleMenu => match self.phase {
                GamePhase::Active => {
                    self.phase = GamePhase::Menu;
                    debug!("menu opened");
                }
                GamePhase::Menu if self.match_over => {
                    warn!("match is over, StartMatch required to play again");
                }
                GamePhase::Menu => {
                    self.phase = GamePhase::Active;
                    debug!("menu closed");
                }
            },
            HostCommand::ConnectClient { client_id } => {
                if let Some(ship_id) = world_setup::ship_for_client(&self.world, client_id) {
                    warn!(client_id, ship_id, "client already has a ship");
                    return;
                }
                let ship_id = self.next_ship_id;
                self.next_ship_id += 1;
                world_setup::spawn_ship(&mut self.world, ship_id, Some(client_id), &self.combat);
                self.events
                    .push(GameEvent::ObjectAuthority { client_id, ship_id });
                info!(client_id, ship_id, "client connected");
            }
            HostCommand::DisconnectClient { client_id } => {
                let Some(ship_id) = world_setup::ship_for_client(&self.world, client_id) else {
                    warn!(client_id, "disconnect from unknown client");
                    return;
                };
                world_setup::despawn_ship(&mut self.world, ship_id);
                self.contacts.forget_ship(ship_id);
                info!(client_id, ship_id, "client disconnected");
            }
            HostCommand::SetControls { ship_id, controls } => {
                let mut found = false;
                for (_entity, ship) in self.world.query_mut::<&mut Ship>() {
                    if ship.ship_id == ship_id {
                        ship.controls = controls;
                        found = true;
                    }
                }
                if !found {
                    warn!(ship_id, "controls for unknown ship");
                }
            }
            HostCommand::NotifyHit { set, boid, ship_id } => {
                if self.phase != GamePhase::Active {
                    debug!(set, boid, ship_id, "hit ignored outside an active match");
                    return;
                }
                if systems::contact::ship_transform(&self.world, ship_id).is_none() {
                    warn!(ship_id, "hit credited to unknown ship");
                    return;
                }
                match systems::contact::apply_hit(
                    &mut self.world,
                    &mut self.flock,
                    &mut self.rng,
                    ship_id,
                    set,
                    boid,
                    &mut self.events,
                ) {
                    Ok(true) => systems::contact::park_missile_of(&mut self.world, ship_id),
                    Ok(false) => {}
                    Err(err) => warn!(%err, set, boid, ship_id, "hit rejected"),
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f32) {
        // 1. Flock: one half of the sets
        self.flock.advance(dt);
        // 2. Ship rotation and movement
        systems::controls::run(&mut self.world, self.combat.move_speed, dt);
        // 3. Missile launch, flight and expiry
        systems::missile::run(&mut self.world, &self.combat, dt, &mut self.events);
        // 4. Missile vs boid
        systems::contact::missile_hits(
            &mut self.world,
            &mut self.flock,
            &mut self.rng,
            &self.combat,
            &mut self.events,
        );
        // 5. Ship vs boid
        systems::contact::ship_contacts(
            &mut self.world,
            &self.flock,
            &self.combat,
            &mut self.contacts,
            &mut self.events,
        );
        // 6. Match clock and end conditions
        let clock_expired = self.clock.tick(&mut self.events);
        if clock_expired {
            self.end_match(MatchEndReason::ClockExpired);
        } else if self.local_ship_destroyed() {
            self.end_match(MatchEndReason::ShipDestroyed);
        }
    }

    fn local_ship_destroyed(&self) -> bool {
        self.world
            .query::<&Ship>()
            .iter()
            .any(|(_, ship)| ship.ship_id == LOCAL_SHIP_ID && ship.health < 0)
    }

    fn end_match(&mut self, reason: MatchEndReason) {
        self.phase = GamePhase::Menu;
        self.match_over = true;
        self.events.push(GameEvent::MatchOver { reason });
        info!(?reason, "match over");
    }
}
