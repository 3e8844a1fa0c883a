//! Headless host binary.
//!
//! Usage:
//!   cargo run -p skyswarm-app -- [--config sim.json] [--seed 42] [--ticks 600]
//!                                [--clients 2] [--fire] [--json]
//!
//! Starts a match with the local ship, connects the requested number of
//! remote clients, and runs at the fixed tick rate until the match ends or
//! the tick limit is reached. `--json` prints the final snapshot to stdout.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use tracing::{info, warn};

use skyswarm_app::game_loop::{self, LoopLimits};
use skyswarm_app::state::AppState;
use skyswarm_core::commands::HostCommand;
use skyswarm_core::components::Controls;
use skyswarm_sim::engine::LOCAL_SHIP_ID;
use skyswarm_sim::{SimConfig, SimulationEngine};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    ticks: Option<u64>,
    clients: u32,
    fire: bool,
    json: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                parsed.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--seed" if i + 1 < args.len() => {
                parsed.seed = Some(args[i + 1].parse().context("--seed expects an integer")?);
                i += 2;
            }
            "--ticks" if i + 1 < args.len() => {
                parsed.ticks = Some(args[i + 1].parse().context("--ticks expects an integer")?);
                i += 2;
            }
            "--clients" if i + 1 < args.len() => {
                parsed.clients = args[i + 1]
                    .parse()
                    .context("--clients expects an integer")?;
                i += 2;
            }
            "--fire" => {
                parsed.fire = true;
                i += 1;
            }
            "--json" => {
                parsed.json = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    Ok(parsed)
}

fn load_config(args: &Args) -> anyhow::Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            SimConfig::from_json_str(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn send_or_warn(state: &AppState, command: HostCommand) {
    if !state.send(command.clone()) {
        warn!(?command, "game loop is not accepting commands");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args()?;
    let config = load_config(&args)?;
    info!(
        seed = config.seed,
        sets = config.flock.set_count,
        boids_per_set = config.flock.boids_per_set,
        ticks = ?args.ticks,
        "starting skyswarm"
    );

    let engine = SimulationEngine::new(config).context("create simulation")?;
    let state = AppState::new();
    let limits = LoopLimits {
        max_ticks: args.ticks,
        stop_on_match_over: true,
    };
    let (tx, handle) = game_loop::spawn_game_loop(engine, state.latest_snapshot.clone(), limits)
        .context("spawn game loop")?;
    if let Ok(mut slot) = state.command_tx.lock() {
        *slot = Some(tx);
    }

    send_or_warn(&state, HostCommand::StartMatch);
    for client_id in 0..args.clients {
        send_or_warn(&state, HostCommand::ConnectClient { client_id });
    }
    if args.fire {
        send_or_warn(
            &state,
            HostCommand::SetControls {
                ship_id: LOCAL_SHIP_ID,
                controls: Controls {
                    shoot: true,
                    ..Default::default()
                },
            },
        );
    }

    handle
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))?;

    let snapshot = state
        .latest()
        .ok_or_else(|| anyhow!("game loop produced no snapshot"))?;
    for ship in &snapshot.ships {
        info!(
            ship_id = ship.ship_id,
            client_id = ?ship.client_id,
            score = ship.score,
            health = ship.health,
            "final ship state"
        );
    }
    info!(
        ticks = snapshot.time.tick,
        live = snapshot.flock.live,
        slots = snapshot.flock.total_slots,
        clock = snapshot.match_clock,
        "simulation finished"
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?
        );
    }
    Ok(())
}
