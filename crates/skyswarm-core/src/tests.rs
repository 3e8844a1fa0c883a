#[cfg(test)]
mod tests {
    use std::error::Error;

    use glam::Vec3;

    use crate::commands::HostCommand;
    use crate::components::{Controls, Transform};
    use crate::config::{CombatConfig, FlockConfig, SteeringParams};
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::{ConfigError, FlockError};
    use crate::events::GameEvent;
    use crate::state::FrameSnapshot;
    use crate::types::{orientation_from_heading, orientation_from_yaw_pitch, Aabb, SimTime};

    /// Verify the small enums round-trip through serde_json.
    #[test]
    fn test_policy_enums_serde() {
        for v in [
            OddSplitPolicy::SecondHalfLarger,
            OddSplitPolicy::FirstHalfLarger,
            OddSplitPolicy::Reject,
        ] {
            let json = serde_json::to_string(&v).unwrap();
            let back: OddSplitPolicy = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
        for v in [HitPolicy::Deactivate, HitPolicy::Respawn] {
            let json = serde_json::to_string(&v).unwrap();
            let back: HitPolicy = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
        for v in [EdgeBehavior::Wrap, EdgeBehavior::Reflect] {
            let json = serde_json::to_string(&v).unwrap();
            let back: EdgeBehavior = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_update_half_flips() {
        assert_eq!(UpdateHalf::default(), UpdateHalf::First);
        assert_eq!(UpdateHalf::First.flipped(), UpdateHalf::Second);
        assert_eq!(UpdateHalf::Second.flipped(), UpdateHalf::First);
    }

    #[test]
    fn test_default_flock_config_is_valid() {
        let config = FlockConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.set_count, DEFAULT_SET_COUNT);
        assert_eq!(config.total_population(), 200);
        assert_eq!(config.hit_policy, HitPolicy::Respawn);
        assert!(
            config.bounds.contains(config.spawn.min) && config.bounds.contains(config.spawn.max),
            "Spawn region should sit inside the arena"
        );
    }

    #[test]
    fn test_flock_config_rejects_zero_population() {
        let config = FlockConfig {
            boids_per_set: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPopulation));
    }

    #[test]
    fn test_flock_config_odd_count_only_rejected_on_request() {
        let lenient = FlockConfig {
            set_count: 7,
            ..Default::default()
        };
        assert_eq!(lenient.validate(), Ok(()));

        let strict = FlockConfig {
            odd_split: OddSplitPolicy::Reject,
            ..lenient
        };
        assert_eq!(
            strict.validate(),
            Err(ConfigError::OddSetCount { count: 7 })
        );
    }

    #[test]
    fn test_steering_params_reject_bad_values() {
        let nan = SteeringParams {
            cohesion_weight: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            nan.validate(),
            Err(ConfigError::NonFinite {
                field: "cohesion_weight"
            })
        );

        let stalled = SteeringParams {
            max_speed: 0.0,
            ..Default::default()
        };
        assert_eq!(
            stalled.validate(),
            Err(ConfigError::NonPositive { field: "max_speed" })
        );

        // A non-positive perception radius is legal and just disables neighbors.
        let blind = SteeringParams {
            perception_radius: -1.0,
            ..Default::default()
        };
        assert_eq!(blind.validate(), Ok(()));
        assert_eq!(blind.query_radius(), DEFAULT_SEPARATION_DISTANCE);
    }

    #[test]
    fn test_flock_config_rejects_inverted_bounds() {
        let config = FlockConfig {
            bounds: Aabb::new(Vec3::splat(1.0), Vec3::splat(-1.0)),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBounds { field: "bounds" })
        );
    }

    #[test]
    fn test_flock_config_partial_json() {
        let json = r#"{ "set_count": 4, "steering": { "max_speed": 12.5 }, "hit_policy": "Deactivate" }"#;
        let config: FlockConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.set_count, 4);
        assert_eq!(config.boids_per_set, DEFAULT_BOIDS_PER_SET);
        assert_eq!(config.steering.max_speed, 12.5);
        assert_eq!(config.steering.perception_radius, DEFAULT_PERCEPTION_RADIUS);
        assert_eq!(config.hit_policy, HitPolicy::Deactivate);
        assert_eq!(config.edge, EdgeBehavior::Wrap);
    }

    #[test]
    fn test_combat_config_defaults_and_validation() {
        let config = CombatConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.missile_lifetime_frames, 100);
        assert_eq!(config.ship_spawn, Vec3::new(0.0, 25.0, -100.0));

        let broken = CombatConfig {
            match_clock_frames_per_step: 0,
            ..Default::default()
        };
        assert_eq!(
            broken.validate(),
            Err(ConfigError::NonPositive {
                field: "match_clock_frames_per_step"
            })
        );
    }

    #[test]
    fn test_flock_error_wraps_config_error() {
        let err: FlockError = ConfigError::ZeroPopulation.into();
        assert_eq!(err, FlockError::Config(ConfigError::ZeroPopulation));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), ConfigError::ZeroPopulation.to_string());

        let err = FlockError::SetIndexOutOfRange { set: 12, count: 10 };
        assert!(err.source().is_none());
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_host_command_serde() {
        let cmd = HostCommand::SetControls {
            ship_id: 3,
            controls: Controls {
                forward: true,
                shoot: true,
                yaw: 45.0,
                pitch: -10.0,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(r#""type":"SetControls""#));
        let back: HostCommand = serde_json::from_str(&json).unwrap();
        match back {
            HostCommand::SetControls { ship_id, controls } => {
                assert_eq!(ship_id, 3);
                assert!(controls.forward && controls.shoot);
                assert!(!controls.back);
                assert_eq!(controls.yaw, 45.0);
            }
            other => panic!("Unexpected command {other:?}"),
        }

        let hit: HostCommand =
            serde_json::from_str(r#"{"type":"NotifyHit","set":2,"boid":5,"ship_id":1}"#).unwrap();
        assert!(matches!(
            hit,
            HostCommand::NotifyHit {
                set: 2,
                boid: 5,
                ship_id: 1
            }
        ));
    }

    #[test]
    fn test_game_event_serde() {
        let events = vec![
            GameEvent::MatchStarted,
            GameEvent::MatchOver {
                reason: MatchEndReason::ClockExpired,
            },
            GameEvent::ObjectAuthority {
                client_id: 9,
                ship_id: 2,
            },
            GameEvent::BoidDestroyed {
                ship_id: 1,
                set: 3,
                boid: 4,
                position: Vec3::new(1.0, 2.0, 3.0),
            },
            GameEvent::ClockTick { remaining: 99 },
        ];
        for event in events {
            let json = serde_json::to_string(&event).unwrap();
            let back: GameEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(event, back);
        }
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snapshot = FrameSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Menu);
        assert!(back.boids.is_empty());
        assert_eq!(back.time.tick, 0);
    }

    #[test]
    fn test_aabb_queries() {
        let aabb = Aabb::from_center(Vec3::new(0.0, 30.0, 0.0), Vec3::new(10.0, 5.0, 10.0));
        assert_eq!(aabb.center(), Vec3::new(0.0, 30.0, 0.0));
        assert_eq!(aabb.size(), Vec3::new(20.0, 10.0, 20.0));
        assert!(aabb.contains(Vec3::new(10.0, 35.0, -10.0)), "Faces are inclusive");
        assert!(!aabb.contains(Vec3::new(0.0, 36.0, 0.0)));
        assert!(aabb.is_well_formed());
        assert!(!Aabb::new(Vec3::ZERO, Vec3::new(f32::INFINITY, 1.0, 1.0)).is_well_formed());
    }

    #[test]
    fn test_aabb_shrunk_collapses_thin_axes() {
        let aabb = Aabb::from_center(Vec3::new(0.0, 30.0, 0.0), Vec3::new(10.0, 5.0, 10.0));
        let inner = aabb.shrunk(6.0);
        assert_eq!(inner.min, Vec3::new(-4.0, 30.0, -4.0));
        assert_eq!(inner.max, Vec3::new(4.0, 30.0, 4.0));
        assert!(inner.is_well_formed());
        assert_eq!(aabb.shrunk(0.0), aabb);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance(DT);
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_orientation_from_heading() {
        assert_eq!(orientation_from_heading(Vec3::ZERO), glam::Quat::IDENTITY);
        let q = orientation_from_heading(Vec3::new(0.0, 0.0, -5.0));
        assert!((q * Vec3::Z - Vec3::NEG_Z).length() < 1e-5);
        let q = orientation_from_heading(Vec3::new(0.0, 3.0, 0.0));
        assert!((q * Vec3::Z - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_orientation_from_yaw_pitch() {
        let level = Transform {
            position: Vec3::ZERO,
            rotation: orientation_from_yaw_pitch(90.0, 0.0),
        };
        assert!((level.forward() - Vec3::X).length() < 1e-5);

        // Positive pitch about X tips +Z forward downward.
        let nose_down = Transform {
            position: Vec3::ZERO,
            rotation: orientation_from_yaw_pitch(0.0, 90.0),
        };
        assert!((nose_down.forward() - Vec3::NEG_Y).length() < 1e-5);
    }
}
