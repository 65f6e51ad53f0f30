//! Standalone server binary.
//!
//! Usage:
//!   cargo run -- [--config server.json] [--listen 0.0.0.0:9001] [--tick-hz 60] [--preset road-car]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tokio::time::{interval, Duration};
use tracing::{error, info};

use vehicle_server::config::ServerConfig;
use vehicle_server::net::run_websocket_server;
use vehicle_server::physics::PhysicsWorld;
use vehicle_server::state::SharedGameState;

fn parse_args() -> anyhow::Result<ServerConfig> {
    let args: Vec<String> = env::args().collect();

    let mut cfg = None;
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            let path = PathBuf::from(&args[i + 1]);
            cfg = Some(
                ServerConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
            );
            i += 2;
        } else {
            i += 1;
        }
    }
    let mut cfg = cfg.unwrap_or_default();

    // Flags override the file.
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--listen" if i + 1 < args.len() => {
                cfg.listen_addr = args[i + 1].clone();
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                cfg.tick_hz = args[i + 1].parse().unwrap_or(cfg.tick_hz);
                i += 2;
            }
            "--preset" if i + 1 < args.len() => {
                cfg.vehicle_preset = args[i + 1].clone();
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args()?;
    let spec = cfg.vehicle_spec().context("resolving vehicle preset")?;
    info!(addr = %cfg.listen_addr, tick_hz = cfg.tick_hz, preset = spec.name, "starting vehicle server");

    let state = Arc::new(Mutex::new(SharedGameState::new()));
    let physics = Arc::new(Mutex::new(PhysicsWorld::new()));

    {
        let listen_addr = cfg.listen_addr.clone();
        let state = Arc::clone(&state);
        let physics = Arc::clone(&physics);
        tokio::spawn(async move {
            if let Err(err) = run_websocket_server(listen_addr, spec, state, physics).await {
                error!(%err, "websocket server exited");
            }
        });
    }

    // Fixed timestep loop.
    let dt = 1.0 / cfg.tick_hz as f32;
    let mut ticker = interval(Duration::from_secs_f64(1.0 / cfg.tick_hz as f64));

    loop {
        ticker.tick().await;

        let mut phys = physics.lock().await;
        let mut game = state.lock().await;

        // Latest client axes → cars (setpoint writes happen inside step).
        for entity in game.entities.values() {
            if let Some(ref input) = entity.last_input {
                phys.apply_player_input(&entity.id, input.axes.steer, input.axes.throttle);
            }
        }

        phys.step(dt);

        game.tick += 1;
        game.broadcast_snapshot(&phys);
    }
}
