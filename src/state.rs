use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::car_control::WheelId;
use crate::physics::PhysicsWorld;

/// The two normalized client axes: steer in [-1, 1], throttle/brake
/// combined in [-1, 1] (negative = back pedal).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Axes {
    pub steer: f32,
    pub throttle: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntityInput {
    pub tick: u64,
    pub axes: Axes,
}

pub struct Entity {
    pub id: String,
    pub last_input: Option<EntityInput>,
}

#[derive(Serialize)]
pub struct WheelSnapshot {
    pub id: &'static str,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub rpm: f32,
    pub motor_torque: f32,
}

#[derive(Serialize)]
pub struct PlayerSnapshot {
    pub id: String,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    // Drive telemetry (what the original debug display showed).
    pub speed_sq: f32,
    pub steer: f32,
    pub motor: f32,
    pub brake: f32,
    pub reverse: bool,
    pub wheels: Vec<WheelSnapshot>,
}

#[derive(Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub players: Vec<PlayerSnapshot>,
}

pub struct SharedGameState {
    pub tick: u64,
    pub clients: Vec<UnboundedSender<String>>,
    pub entities: HashMap<String, Entity>,
}

impl SharedGameState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            clients: Vec::new(),
            entities: HashMap::new(),
        }
    }

    pub fn register_client(&mut self, tx: UnboundedSender<String>) {
        self.clients.push(tx);
    }

    pub fn add_entity(&mut self, id: String) {
        self.entities.insert(
            id.clone(),
            Entity {
                id,
                last_input: None,
            },
        );
    }

    pub fn remove_entity(&mut self, id: &str) {
        self.entities.remove(id);
        self.clients.retain(|tx| !tx.is_closed());
    }

    pub fn update_input(&mut self, id: &str, axes: Axes, tick: u64) {
        if let Some(entity) = self.entities.get_mut(id) {
            entity.last_input = Some(EntityInput { tick, axes });
        }
    }

    /// Build and send a snapshot of every car to every connected client.
    pub fn broadcast_snapshot(&self, physics: &PhysicsWorld) {
        let mut players = Vec::with_capacity(self.entities.len());

        for entity in self.entities.values() {
            let Some(sim) = physics.vehicles.get(&entity.id) else {
                continue;
            };
            let (position, rotation) = physics.chassis_pose(sim);

            let wheels = WheelId::ALL
                .iter()
                .map(|&wheel_id| {
                    let i = wheel_id.index();
                    let visual = &sim.car.visuals[i];
                    WheelSnapshot {
                        id: wheel_id.as_str(),
                        position: visual.position(),
                        rotation: visual.rotation(&sim.poses[i]),
                        rpm: sim.rpm[i],
                        motor_torque: sim.car.commanded_motor_torque(wheel_id),
                    }
                })
                .collect();

            players.push(PlayerSnapshot {
                id: entity.id.clone(),
                position,
                rotation,
                speed_sq: sim.car.speed_sq,
                steer: sim.car.command.steer,
                motor: sim.car.command.motor,
                brake: sim.car.command.brake,
                reverse: sim.car.is_reversing(),
                wheels,
            });
        }

        let json = match serde_json::to_string(&Snapshot {
            tick: self.tick,
            players,
        }) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "snapshot serialization failed");
                return;
            }
        };

        for tx in &self.clients {
            let _ = tx.send(json.clone());
        }
    }
}
