//! Tests for the simulation engine, the combat bridge and the match session.

use glam::Vec3;

use skyswarm_core::commands::HostCommand;
use skyswarm_core::components::Controls;
use skyswarm_core::config::{CombatConfig, FlockConfig, SteeringParams};
use skyswarm_core::enums::*;
use skyswarm_core::error::{ConfigError, FlockError};
use skyswarm_core::events::GameEvent;
use skyswarm_core::state::{FrameSnapshot, ShipView};
use skyswarm_core::types::{orientation_from_yaw_pitch, Aabb};

use crate::engine::{SimConfig, SimulationEngine, LOCAL_SHIP_ID};
use crate::systems::contact::distance_to_segment;

fn engine(config: SimConfig) -> SimulationEngine {
    SimulationEngine::new(config).unwrap()
}

fn started(config: SimConfig) -> SimulationEngine {
    let mut engine = engine(config);
    engine.queue_command(HostCommand::StartMatch);
    engine
}

fn local_ship(snapshot: &FrameSnapshot) -> &ShipView {
    snapshot
        .ships
        .iter()
        .find(|s| s.ship_id == LOCAL_SHIP_ID)
        .unwrap()
}

fn count_events(snapshot: &FrameSnapshot, pred: impl Fn(&GameEvent) -> bool) -> usize {
    snapshot.events.iter().filter(|e| pred(e)).count()
}

fn set_controls(engine: &mut SimulationEngine, controls: Controls) {
    engine.queue_command(HostCommand::SetControls {
        ship_id: LOCAL_SHIP_ID,
        controls,
    });
}

/// A few nearly motionless boids all parked at `point`.
fn pinned_flock(point: Vec3, set_count: usize, hit_policy: HitPolicy) -> FlockConfig {
    FlockConfig {
        set_count,
        boids_per_set: 1,
        spawn: Aabb::new(point, point),
        hit_policy,
        steering: SteeringParams {
            max_speed: 1e-3,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Boids confined well in front of the ship, out of reach of a rear-facing missile.
fn distant_flock() -> FlockConfig {
    let center = Vec3::new(0.0, 30.0, 400.0);
    FlockConfig {
        bounds: Aabb::from_center(center, Vec3::splat(50.0)),
        spawn: Aabb::from_center(center, Vec3::splat(20.0)),
        ..Default::default()
    }
}

fn ship_spawn() -> Vec3 {
    CombatConfig::default().ship_spawn
}

// ---- Construction & config ----

#[test]
fn test_engine_rejects_invalid_config() {
    let config = SimConfig {
        flock: FlockConfig {
            boids_per_set: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(
        SimulationEngine::new(config).err(),
        Some(FlockError::Config(ConfigError::ZeroPopulation))
    );

    let config = SimConfig {
        combat: CombatConfig {
            missile_speed: -1.0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(
        SimulationEngine::new(config).err(),
        Some(FlockError::Config(ConfigError::NonPositive {
            field: "missile_speed"
        }))
    );
}

#[test]
fn test_sim_config_from_json() {
    let config = SimConfig::from_json_str(r#"{ "seed": 7, "flock": { "set_count": 4 } }"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.flock.set_count, 4);
    assert_eq!(config.flock.boids_per_set, FlockConfig::default().boids_per_set);
    assert_eq!(config.combat, CombatConfig::default());

    assert!(SimConfig::from_json_str("{ \"seed\": \"seven\" }").is_err());
}

#[test]
fn test_new_engine_starts_in_menu_with_local_ship() {
    let mut engine = engine(SimConfig::default());
    assert_eq!(engine.phase(), GamePhase::Menu);

    let snap = engine.tick();
    assert_eq!(snap.boids.len(), 200);
    assert_eq!(snap.flock.total_slots, 200);
    assert_eq!(snap.ships.len(), 1);
    assert_eq!(snap.missiles.len(), 1);
    assert_eq!(local_ship(&snap).health, 100);
    assert_eq!(local_ship(&snap).position, ship_spawn());
    assert_eq!(snap.match_clock, 100);
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = started(config.clone());
    let mut engine_b = started(config);

    let controls = Controls {
        forward: true,
        shoot: true,
        yaw: 15.0,
        pitch: -5.0,
        ..Default::default()
    };
    set_controls(&mut engine_a, controls);
    set_controls(&mut engine_b, controls);

    for _ in 0..300 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = engine(SimConfig {
        seed: 222,
        ..Default::default()
    });

    let snap_a = engine_a.tick();
    let snap_b = engine_b.tick();
    assert_ne!(
        snap_a.boids[0].position, snap_b.boids[0].position,
        "Different seeds should spawn different flocks"
    );
}

// ---- Phases ----

#[test]
fn test_menu_freezes_simulation() {
    let mut engine = engine(SimConfig::default());
    let before = engine.tick();
    for _ in 0..10 {
        engine.tick();
    }
    let after = engine.tick();
    assert_eq!(after.time.tick, 0);
    assert_eq!(before.boids, after.boids);
    assert_eq!(after.flock.next_half, UpdateHalf::First);
}

#[test]
fn test_start_match() {
    let mut engine = started(SimConfig::default());
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(
        count_events(&snap, |e| *e == GameEvent::MatchStarted),
        1
    );
}

#[test]
fn test_toggle_menu_pauses_and_resumes() {
    let mut engine = started(SimConfig::default());
    for _ in 0..5 {
        engine.tick();
    }

    engine.queue_command(HostCommand::ToggleMenu);
    let paused = engine.tick();
    assert_eq!(paused.phase, GamePhase::Menu);
    assert_eq!(paused.time.tick, 5);

    let still_paused = engine.tick();
    assert_eq!(paused.boids, still_paused.boids);

    engine.queue_command(HostCommand::ToggleMenu);
    let resumed = engine.tick();
    assert_eq!(resumed.phase, GamePhase::Active);
    assert_eq!(resumed.time.tick, 6);
}

// ---- Scheduler through the engine ----

#[test]
fn test_engine_alternates_flock_halves() {
    let mut engine = started(SimConfig::default());

    for i in 0..21 {
        let snap = engine.tick();
        let expected = if i % 2 == 0 {
            UpdateHalf::Second
        } else {
            UpdateHalf::First
        };
        assert_eq!(snap.flock.next_half, expected, "Wrong half after tick {i}");
    }

    let counts: Vec<u64> = engine
        .flock()
        .sets()
        .iter()
        .map(|s| s.update_count())
        .collect();
    assert!(counts[..5].iter().all(|&c| c == 11), "{counts:?}");
    assert!(counts[5..].iter().all(|&c| c == 10), "{counts:?}");
}

#[test]
fn test_disabled_set_is_frozen_in_engine() {
    let mut engine = started(SimConfig::default());
    engine.flock_mut().set_mut(0).unwrap().set_enabled(false);

    let before: Vec<Vec3> = engine.flock().sets()[0]
        .boids()
        .iter()
        .map(|b| b.position)
        .collect();
    for _ in 0..10 {
        engine.tick();
    }
    let after: Vec<Vec3> = engine.flock().sets()[0]
        .boids()
        .iter()
        .map(|b| b.position)
        .collect();
    assert_eq!(before, after);
    assert_eq!(engine.flock().sets()[0].update_count(), 0);
}

// ---- Ships ----

#[test]
fn test_ship_moves_forward() {
    let mut engine = started(SimConfig::default());
    set_controls(
        &mut engine,
        Controls {
            forward: true,
            ..Default::default()
        },
    );

    let mut snap = engine.tick();
    for _ in 1..60 {
        snap = engine.tick();
    }
    let ship = local_ship(&snap);
    let expected = ship_spawn() + Vec3::Z * 30.0;
    assert!(
        (ship.position - expected).length() < 1e-2,
        "Ship at {} expected {}",
        ship.position,
        expected
    );
}

#[test]
fn test_ship_pitch_is_clamped() {
    let mut engine = started(SimConfig::default());
    set_controls(
        &mut engine,
        Controls {
            yaw: 30.0,
            pitch: 200.0,
            ..Default::default()
        },
    );
    let snap = engine.tick();
    let expected = orientation_from_yaw_pitch(30.0, 90.0);
    assert!(local_ship(&snap).rotation.abs_diff_eq(expected, 1e-5));
}

#[test]
fn test_controls_for_unknown_ship_are_dropped() {
    let mut engine = started(SimConfig::default());
    engine.queue_command(HostCommand::SetControls {
        ship_id: 99,
        controls: Controls {
            forward: true,
            ..Default::default()
        },
    });
    let snap = engine.tick();
    assert_eq!(local_ship(&snap).position, ship_spawn());
}

// ---- Missiles ----

#[test]
fn test_missile_expires_after_lifetime() {
    let mut engine = started(SimConfig {
        flock: distant_flock(),
        ..Default::default()
    });
    // Face away from the flock and fire once.
    set_controls(
        &mut engine,
        Controls {
            shoot: true,
            yaw: 180.0,
            ..Default::default()
        },
    );
    let launch = engine.tick();
    assert_eq!(
        count_events(&launch, |e| matches!(e, GameEvent::MissileFired { .. })),
        1
    );
    assert!(launch.missiles[0].active);

    set_controls(
        &mut engine,
        Controls {
            yaw: 180.0,
            ..Default::default()
        },
    );
    for frame in 1..=100u32 {
        let snap = engine.tick();
        let expired = count_events(&snap, |e| matches!(e, GameEvent::MissileExpired { .. }));
        if frame < 100 {
            assert_eq!(expired, 0, "Missile expired early at frame {frame}");
            assert!(snap.missiles[0].active);
            assert_eq!(snap.missiles[0].frames, frame);
        } else {
            assert_eq!(expired, 1, "Missile should expire on frame 100");
            assert!(!snap.missiles[0].active);
        }
    }
}

#[test]
fn test_missile_kill_scores_once_per_boid() {
    let target = ship_spawn() + Vec3::Z * 40.0;
    let mut engine = started(SimConfig {
        flock: pinned_flock(target, 2, HitPolicy::Deactivate),
        ..Default::default()
    });
    set_controls(
        &mut engine,
        Controls {
            shoot: true,
            ..Default::default()
        },
    );

    let mut kills = Vec::new();
    let mut snap = engine.tick();
    assert!(snap.events.contains(&GameEvent::MissileFired {
        ship_id: LOCAL_SHIP_ID
    }));
    for _ in 0..30 {
        snap = engine.tick();
        for event in &snap.events {
            if let GameEvent::BoidDestroyed { set, boid, ship_id, .. } = event {
                assert_eq!(*ship_id, LOCAL_SHIP_ID);
                kills.push((*set, *boid));
            }
        }
    }

    assert_eq!(kills, vec![(0, 0), (1, 0)]);
    assert_eq!(local_ship(&snap).score, 2);
    assert_eq!(engine.flock().live_count(), 0);
    assert_eq!(engine.flock().total_slots(), 2);
}

#[test]
fn test_segment_distance() {
    let a = Vec3::ZERO;
    let b = Vec3::new(10.0, 0.0, 0.0);
    assert!((distance_to_segment(Vec3::new(5.0, 1.0, 0.0), a, b) - 1.0).abs() < 1e-6);
    assert!((distance_to_segment(Vec3::new(-3.0, 0.0, 0.0), a, b) - 3.0).abs() < 1e-6);
    assert!((distance_to_segment(Vec3::new(0.0, 2.0, 0.0), a, a) - 2.0).abs() < 1e-6);
}

// ---- Host-reported hits ----

#[test]
fn test_notify_hit_command_scores_once() {
    let mut engine = started(SimConfig {
        flock: FlockConfig {
            hit_policy: HitPolicy::Deactivate,
            ..Default::default()
        },
        ..Default::default()
    });
    engine.tick();

    let hit = HostCommand::NotifyHit {
        set: 3,
        boid: 7,
        ship_id: LOCAL_SHIP_ID,
    };
    engine.queue_command(hit.clone());
    let snap = engine.tick();
    assert_eq!(local_ship(&snap).score, 1);
    assert_eq!(snap.flock.live, 199);
    assert_eq!(
        count_events(&snap, |e| matches!(
            e,
            GameEvent::BoidDestroyed { set: 3, boid: 7, .. }
        )),
        1
    );

    engine.queue_command(hit);
    let snap = engine.tick();
    assert_eq!(local_ship(&snap).score, 1, "Dead boid must not score again");
    assert_eq!(snap.flock.live, 199);
}

#[test]
fn test_notify_hit_respawn_keeps_population() {
    let mut engine = started(SimConfig::default());
    engine.queue_command(HostCommand::NotifyHit {
        set: 0,
        boid: 0,
        ship_id: LOCAL_SHIP_ID,
    });
    let snap = engine.tick();
    assert_eq!(local_ship(&snap).score, 1);
    assert_eq!(snap.flock.live, 200);
}

#[test]
fn test_notify_hit_parks_credited_missile() {
    let mut engine = started(SimConfig {
        flock: distant_flock(),
        ..Default::default()
    });
    set_controls(
        &mut engine,
        Controls {
            shoot: true,
            yaw: 180.0,
            ..Default::default()
        },
    );
    let launch = engine.tick();
    assert!(launch.missiles[0].active);

    set_controls(
        &mut engine,
        Controls {
            yaw: 180.0,
            ..Default::default()
        },
    );
    engine.queue_command(HostCommand::NotifyHit {
        set: 0,
        boid: 0,
        ship_id: LOCAL_SHIP_ID,
    });
    let snap = engine.tick();
    assert_eq!(local_ship(&snap).score, 1);
    assert!(!snap.missiles[0].active, "A scoring hit returns the missile");
    assert_eq!(snap.missiles[0].frames, 0);
    assert_eq!(
        count_events(&snap, |e| matches!(e, GameEvent::MissileExpired { .. })),
        0
    );
}

#[test]
fn test_invalid_hits_are_dropped() {
    let mut engine = engine(SimConfig::default());
    engine.queue_command(HostCommand::NotifyHit {
        set: 0,
        boid: 0,
        ship_id: LOCAL_SHIP_ID,
    });
    let snap = engine.tick();
    assert_eq!(local_ship(&snap).score, 0, "Hits are ignored in the menu");

    engine.queue_commands([
        HostCommand::StartMatch,
        HostCommand::NotifyHit {
            set: 50,
            boid: 0,
            ship_id: LOCAL_SHIP_ID,
        },
        HostCommand::NotifyHit {
            set: 0,
            boid: 500,
            ship_id: LOCAL_SHIP_ID,
        },
        HostCommand::NotifyHit {
            set: 0,
            boid: 0,
            ship_id: 99,
        },
    ]);
    let snap = engine.tick();
    assert_eq!(local_ship(&snap).score, 0);
    assert_eq!(snap.flock.live, 200);
    assert_eq!(
        count_events(&snap, |e| matches!(e, GameEvent::BoidDestroyed { .. })),
        0
    );
}

// ---- Ship contact ----

#[test]
fn test_contact_damage_applies_once_per_contact() {
    let mut engine = started(SimConfig {
        flock: pinned_flock(ship_spawn() + Vec3::Z, 2, HitPolicy::Respawn),
        ..Default::default()
    });

    let mut struck = 0;
    let mut snap = engine.tick();
    struck += count_events(&snap, |e| matches!(e, GameEvent::ShipStruck { .. }));
    for _ in 0..10 {
        snap = engine.tick();
        struck += count_events(&snap, |e| matches!(e, GameEvent::ShipStruck { .. }));
    }

    assert_eq!(struck, 2, "One strike per touching boid");
    assert_eq!(local_ship(&snap).health, 60);
    assert_eq!(snap.phase, GamePhase::Active);
}

#[test]
fn test_client_ships_take_no_contact_damage() {
    let mut engine = engine(SimConfig {
        flock: pinned_flock(ship_spawn() + Vec3::Z, 2, HitPolicy::Respawn),
        ..Default::default()
    });
    engine.queue_commands([
        HostCommand::ConnectClient { client_id: 5 },
        HostCommand::StartMatch,
    ]);

    let mut snap = engine.tick();
    for _ in 0..10 {
        for event in &snap.events {
            if let GameEvent::ShipStruck { ship_id, .. } = event {
                assert_eq!(*ship_id, LOCAL_SHIP_ID);
            }
        }
        snap = engine.tick();
    }

    let client = snap.ships.iter().find(|s| s.client_id == Some(5)).unwrap();
    assert_eq!(client.health, 100);
    assert_eq!(local_ship(&snap).health, 60);
}

#[test]
fn test_ship_destroyed_ends_match() {
    let mut engine = started(SimConfig {
        flock: pinned_flock(ship_spawn() + Vec3::Z, 2, HitPolicy::Respawn),
        combat: CombatConfig {
            contact_damage: 60,
            ..Default::default()
        },
        ..Default::default()
    });

    let snap = engine.tick();
    assert_eq!(local_ship(&snap).health, -20);
    assert_eq!(snap.phase, GamePhase::Menu);
    assert!(snap.events.contains(&GameEvent::MatchOver {
        reason: MatchEndReason::ShipDestroyed
    }));

    engine.queue_command(HostCommand::ToggleMenu);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Menu, "A finished match cannot be resumed");
}

// ---- Match clock ----

#[test]
fn test_match_clock_expiry() {
    let mut engine = started(SimConfig {
        combat: CombatConfig {
            match_clock_start: 2,
            match_clock_frames_per_step: 3,
            ..Default::default()
        },
        ..Default::default()
    });

    for frame in 1..=5 {
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Active, "Ended early at frame {frame}");
    }
    assert_eq!(engine.match_clock(), 1);

    let snap = engine.tick();
    assert_eq!(snap.match_clock, 0);
    assert_eq!(snap.phase, GamePhase::Menu);
    assert!(snap.events.contains(&GameEvent::ClockTick { remaining: 0 }));
    assert!(snap.events.contains(&GameEvent::MatchOver {
        reason: MatchEndReason::ClockExpired
    }));
}

#[test]
fn test_start_match_resets_session() {
    let mut engine = started(SimConfig::default());
    engine.queue_command(HostCommand::NotifyHit {
        set: 0,
        boid: 0,
        ship_id: LOCAL_SHIP_ID,
    });
    for _ in 0..80 {
        engine.tick();
    }
    assert_eq!(engine.match_clock(), 99);

    engine.queue_commands([HostCommand::ToggleMenu, HostCommand::StartMatch]);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(snap.match_clock, 100);
    assert_eq!(local_ship(&snap).score, 0);
}

#[test]
fn test_start_match_revives_destroyed_boids() {
    let mut engine = started(SimConfig {
        flock: FlockConfig {
            hit_policy: HitPolicy::Deactivate,
            ..Default::default()
        },
        ..Default::default()
    });
    engine.queue_commands([
        HostCommand::NotifyHit {
            set: 0,
            boid: 0,
            ship_id: LOCAL_SHIP_ID,
        },
        HostCommand::NotifyHit {
            set: 4,
            boid: 2,
            ship_id: LOCAL_SHIP_ID,
        },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.flock.live, 198);

    engine.queue_commands([HostCommand::ToggleMenu, HostCommand::StartMatch]);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.flock.live, 200);
    assert_eq!(snap.flock.total_slots, 200);
}

// ---- Client authority ----

#[test]
fn test_client_connect_and_disconnect() {
    let mut engine = engine(SimConfig::default());

    engine.queue_command(HostCommand::ConnectClient { client_id: 7 });
    let snap = engine.tick();
    assert!(snap.events.contains(&GameEvent::ObjectAuthority {
        client_id: 7,
        ship_id: 1
    }));
    assert_eq!(snap.ships.len(), 2);
    assert_eq!(snap.missiles.len(), 2);
    assert_eq!(snap.ships[1].client_id, Some(7));

    engine.queue_command(HostCommand::ConnectClient { client_id: 7 });
    let snap = engine.tick();
    assert_eq!(snap.ships.len(), 2, "Second connect must not spawn another ship");

    engine.queue_command(HostCommand::DisconnectClient { client_id: 7 });
    let snap = engine.tick();
    assert_eq!(snap.ships.len(), 1);
    assert_eq!(snap.missiles.len(), 1);
    assert_eq!(snap.ships[0].ship_id, LOCAL_SHIP_ID);
}

#[test]
fn test_client_ship_follows_its_controls() {
    let mut engine = started(SimConfig::default());
    engine.queue_command(HostCommand::ConnectClient { client_id: 3 });
    engine.tick();

    engine.queue_command(HostCommand::SetControls {
        ship_id: 1,
        controls: Controls {
            right: true,
            ..Default::default()
        },
    });
    let snap = engine.tick();
    let client = snap.ships.iter().find(|s| s.ship_id == 1).unwrap();
    assert!(client.position.x > ship_spawn().x);
    assert_eq!(local_ship(&snap).position, ship_spawn());
}
