use futures::{SinkExt, StreamExt};
use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::Message;
use uuid::Uuid;

use crate::physics::{PhysicsWorld, VehicleSpec};
use crate::state::{Axes, SharedGameState};

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("failed to bind websocket listener on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("websocket handshake failed: {0}")]
    Handshake(#[from] tungstenite::Error),
}

/// Everything a client may send. Unknown fields are ignored, missing axes
/// default to zero, so a sparse `{"type":"input","steer":0.4}` is fine.
#[derive(Debug, Deserialize)]
struct ClientMessage {
    #[serde(rename = "type")]
    msg_type: String,
    #[serde(default)]
    steer: f32,
    #[serde(default)]
    throttle: f32,
}

pub async fn run_websocket_server(
    listen_addr: String,
    spec: VehicleSpec,
    state: Arc<Mutex<SharedGameState>>,
    physics: Arc<Mutex<PhysicsWorld>>,
) -> Result<(), NetError> {
    let listener = TcpListener::bind(&listen_addr)
        .await
        .map_err(|source| NetError::Bind {
            addr: listen_addr.clone(),
            source,
        })?;

    info!(addr = %listen_addr, "websocket listening");

    loop {
        let (raw, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(%err, "accept failed");
                continue;
            }
        };

        let state = Arc::clone(&state);
        let physics = Arc::clone(&physics);

        tokio::spawn(async move {
            if let Err(err) = handle_client(raw, spec, state, physics).await {
                debug!(%peer, %err, "client session ended with error");
            }
        });
    }
}

async fn handle_client(
    raw: TcpStream,
    spec: VehicleSpec,
    state: Arc<Mutex<SharedGameState>>,
    physics: Arc<Mutex<PhysicsWorld>>,
) -> Result<(), NetError> {
    let ws = accept_async(raw).await?;
    let (mut write, mut read) = ws.split();

    // Outgoing channel: the tick loop broadcasts through it.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if write.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Entity + physics body, scattered a little so cars don't stack.
    let player_id = Uuid::new_v4().to_string();
    let position = {
        let mut rng = rand::thread_rng();
        [rng.gen_range(-6.0..6.0), 1.5, rng.gen_range(-6.0..6.0)]
    };
    {
        // Lock order everywhere: physics, then game state.
        let mut phys = physics.lock().await;
        let mut game = state.lock().await;
        phys.spawn_vehicle(player_id.clone(), position, &spec);
        game.register_client(tx.clone());
        game.add_entity(player_id.clone());
    }

    info!(player = %player_id, "player connected");
    let welcome = serde_json::json!({ "type": "welcome", "player_id": player_id });
    let _ = tx.send(welcome.to_string());

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(_) => break,
        };
        if !msg.is_text() {
            continue;
        }
        let Ok(text) = msg.to_text() else {
            continue;
        };

        let Ok(parsed) = serde_json::from_str::<ClientMessage>(text) else {
            continue;
        };

        match parsed.msg_type.as_str() {
            "ping" => {
                let _ = tx.send(r#"{"type":"pong"}"#.into());
            }
            "input" => {
                let axes = Axes {
                    steer: parsed.steer,
                    throttle: parsed.throttle,
                };
                let mut game = state.lock().await;
                let tick = game.tick;
                game.update_input(&player_id, axes, tick);
            }
            _ => {}
        }
    }

    info!(player = %player_id, "player disconnected");
    let mut phys = physics.lock().await;
    let mut game = state.lock().await;
    phys.remove_vehicle(&player_id);
    game.remove_entity(&player_id);

    Ok(())
}
