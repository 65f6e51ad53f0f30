// src/physics.rs
//
// Host physics world. Everything wheel-shaped (suspension raycast, tire
// friction, wheel dynamics) lives inside the engine's raycast vehicle
// controller; this module writes setpoints on the engine wheels, steps the
// pipeline, and reads poses/rotation back out for visuals and snapshots.

use nalgebra::UnitQuaternion;
use rapier3d::control::{DynamicRayCastVehicleController, WheelTuning};
use rapier3d::prelude::*;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::car_control::{CarTuning, ControlScheme, Quat, Vec3, WheelActuator, WheelId, WheelPose};
use crate::vehicle::Car;

const GROUP_GROUND: Group = Group::from_bits_truncate(0b0001);
const GROUP_CHASSIS: Group = Group::from_bits_truncate(0b0010);

/// Bodies past this distance from the origin get reset (exploded physics).
const WORLD_BOUND: f32 = 1_000.0;

#[inline]
fn p3(p: Point<Real>) -> Vec3 {
    [p.x, p.y, p.z]
}

#[inline]
fn q4(q: &UnitQuaternion<Real>) -> Quat {
    [q.i, q.j, q.k, q.w]
}

// --------------------------------------------------
// Vehicle presets
// --------------------------------------------------

/// Full spawn description: control tuning + chassis geometry + the
/// suspension parameters handed to the engine's wheel component.
#[derive(Debug, Clone, Copy)]
pub struct VehicleSpec {
    pub name: &'static str,
    pub tuning: CarTuning,
    pub scheme: ControlScheme,

    pub mass: f32,                      // kg
    pub chassis_half_extents: [f32; 3], // [hx, hy, hz] meters
    pub linear_damping: f32,            // drag
    pub angular_damping: f32,           // rotational drag

    // --- Wheel geometry (chassis space) ---
    pub half_track: f32,     // meters (centerline to wheel)
    pub half_wheelbase: f32, // meters (center to axle)
    pub wheel_attach_y: f32, // meters (suspension anchor height)
    pub wheel_radius: f32,   // meters

    // --- Handed to the engine's suspension ---
    pub suspension_rest: f32,
    pub suspension_stiffness: f32,
    pub suspension_damping: f32,
    pub suspension_max_force: f32, // N per wheel; must carry the laden corner weight
}

pub const ROAD_CAR: VehicleSpec = VehicleSpec {
    name: "road-car",
    tuning: CarTuning {
        steer_max: 30.0,    // deg
        motor_max: 1200.0,  // N*m
        brake_max: 2400.0,  // N*m
        com_offset: [0.0, -0.15, 0.0], // slightly below visual center
    },
    scheme: ControlScheme::Latched,

    mass: 1350.0,
    chassis_half_extents: [0.9, 0.35, 2.1],
    linear_damping: 0.08,
    angular_damping: 0.6,

    half_track: 0.8,
    half_wheelbase: 1.25,
    wheel_attach_y: -0.3,
    wheel_radius: 0.35,

    suspension_rest: 0.4,
    suspension_stiffness: 100.0,
    suspension_damping: 10.0,
    suspension_max_force: 6_000.0,
};

pub const HAULER: VehicleSpec = VehicleSpec {
    name: "hauler",
    tuning: CarTuning {
        steer_max: 20.0,
        motor_max: 4000.0,
        brake_max: 9000.0,
        com_offset: [0.0, -0.25, 0.0],
    },
    // No reverse gear on the utility rig.
    scheme: ControlScheme::Simple,

    mass: 6000.0,
    chassis_half_extents: [1.1, 0.5, 2.8],
    linear_damping: 0.4,
    angular_damping: 1.2,

    half_track: 1.0,
    half_wheelbase: 1.7,
    wheel_attach_y: -0.4,
    wheel_radius: 0.45,

    suspension_rest: 0.5,
    suspension_stiffness: 140.0,
    suspension_damping: 14.0,
    suspension_max_force: 25_000.0,
};

pub const PRESETS: [&VehicleSpec; 2] = [&ROAD_CAR, &HAULER];

// --------------------------------------------------
// Host wheel adapter
// --------------------------------------------------

// The control core speaks torque (N*m) with the axle sign convention
// (forward command = negative torque). The engine wheel wants a forward-
// positive force, so convert at the seam. Unit mapping only; the wheel's
// behavior stays engine-owned.
impl WheelActuator for rapier3d::control::Wheel {
    fn set_motor_torque(&mut self, torque_nm: f32) {
        self.engine_force = -torque_nm / self.radius;
    }

    fn set_brake_torque(&mut self, torque_nm: f32) {
        self.brake = torque_nm / self.radius;
    }

    fn set_steer_angle(&mut self, angle_deg: f32) {
        self.steering = angle_deg.to_radians();
    }
}

// --------------------------------------------------
// Per-player simulation record
// --------------------------------------------------

pub struct VehicleSim {
    pub body: RigidBodyHandle,
    pub controller: DynamicRayCastVehicleController,
    pub car: Car,
    /// Engine wheel rotation at the previous step, for rpm readback.
    prev_rotation: [f32; 4],
    pub rpm: [f32; 4],
    pub poses: [WheelPose; 4],
}

pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd: CCDSolver,
    pub query_pipeline: QueryPipeline,
    pub vehicles: HashMap<String, VehicleSim>, // playerId → vehicle
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let gravity = vector![0.0, -9.81, 0.0];

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Big static ground slab, top surface at y = 0.
        let ground_rb = RigidBodyBuilder::fixed()
            .translation(vector![0.0, -1.0, 0.0])
            .build();
        let ground_handle = bodies.insert(ground_rb);

        let ground_collider = ColliderBuilder::cuboid(500.0, 1.0, 500.0)
            .collision_groups(InteractionGroups::new(GROUP_GROUND, GROUP_CHASSIS))
            .friction(1.2)
            .restitution(0.0)
            .build();
        colliders.insert_with_parent(ground_collider, ground_handle, &mut bodies);

        info!(
            bodies = bodies.len(),
            colliders = colliders.len(),
            "ground inserted"
        );

        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            vehicles: HashMap::new(),
        }
    }

    /// Store the latest raw axes on a player's car (actual setpoint writes
    /// happen in `step`).
    pub fn apply_player_input(&mut self, player_id: &str, steer: f32, throttle: f32) {
        if let Some(sim) = self.vehicles.get_mut(player_id) {
            sim.car.set_axes(steer, throttle);
        }
    }

    /// Spawn a car for this player: dynamic chassis body + the engine's
    /// raycast wheel component for all four wheels. The centre-of-mass
    /// offset is baked into the collider translation, once, here.
    pub fn spawn_vehicle(&mut self, id: String, position: [f32; 3], spec: &VehicleSpec) {
        let [hx, hy, hz] = spec.chassis_half_extents;
        let volume = 8.0 * hx * hy * hz;
        let density = spec.mass / volume;

        let rb = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .linear_damping(spec.linear_damping)
            .angular_damping(spec.angular_damping)
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(rb);

        let [cx, cy, cz] = spec.tuning.com_offset;
        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .translation(vector![cx, cy, cz]) // COM offset
            .collision_groups(InteractionGroups::new(GROUP_CHASSIS, GROUP_GROUND))
            .density(density)
            .friction(0.0)
            .restitution(0.0)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        let mut controller = DynamicRayCastVehicleController::new(handle);
        let tuning = WheelTuning {
            suspension_stiffness: spec.suspension_stiffness,
            suspension_damping: spec.suspension_damping,
            max_suspension_force: spec.suspension_max_force,
            ..WheelTuning::default()
        };

        // Registered FL, FR, RL, RR; WheelId::index relies on this order.
        for wheel_id in WheelId::ALL {
            let sx = match wheel_id {
                WheelId::FL | WheelId::RL => -spec.half_track,
                WheelId::FR | WheelId::RR => spec.half_track,
            };
            let sz = if wheel_id.is_front() {
                spec.half_wheelbase
            } else {
                -spec.half_wheelbase
            };
            controller.add_wheel(
                point![sx, spec.wheel_attach_y, sz],
                -Vector::y(),
                Vector::x(),
                spec.suspension_rest,
                spec.wheel_radius,
                &tuning,
            );
        }

        self.vehicles.insert(
            id.clone(),
            VehicleSim {
                body: handle,
                controller,
                car: Car::new(spec.tuning, spec.scheme),
                prev_rotation: [0.0; 4],
                rpm: [0.0; 4],
                poses: [WheelPose::default(); 4],
            },
        );

        info!(player = %id, preset = spec.name, ?position, "spawned vehicle");
    }

    pub fn remove_vehicle(&mut self, id: &str) {
        if let Some(sim) = self.vehicles.remove(id) {
            self.bodies.remove(
                sim.body,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    pub fn chassis_pose(&self, sim: &VehicleSim) -> (Vec3, Quat) {
        match self.bodies.get(sim.body) {
            Some(body) => {
                let iso = body.position();
                let t = iso.translation.vector;
                ([t.x, t.y, t.z], q4(&iso.rotation))
            }
            None => ([0.0; 3], [0.0, 0.0, 0.0, 1.0]),
        }
    }

    pub fn step(&mut self, dt: Real) {
        self.query_pipeline.update(&self.colliders);

        // 1) Controller tick per car: frame phase (input + visuals from last
        //    step's readback), fixed phase (setpoint writes), then hand the
        //    wheels to the engine.
        for sim in self.vehicles.values_mut() {
            let Some(body) = self.bodies.get(sim.body) else {
                continue;
            };
            let speed_sq = body.linvel().norm_squared();

            sim.car.frame_update(speed_sq, &sim.poses, &sim.rpm, dt);
            sim.car.fixed_update(sim.controller.wheels_mut());

            sim.controller.update_vehicle(
                dt,
                &mut self.bodies,
                &self.colliders,
                &self.query_pipeline,
                QueryFilter::default().exclude_rigid_body(sim.body),
            );
        }

        // 2) Step the engine.
        self.pipeline.step(
            &self.gravity,
            &IntegrationParameters {
                dt,
                ..IntegrationParameters::default()
            },
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        // 3) Read wheel poses + rotation speed back out for the next frame
        //    phase and the snapshot.
        for sim in self.vehicles.values_mut() {
            let Some(body) = self.bodies.get(sim.body) else {
                continue;
            };
            let chassis_rot = *body.rotation();

            for (i, wheel) in sim.controller.wheels().iter().enumerate() {
                let delta = wheel.rotation - sim.prev_rotation[i];
                sim.prev_rotation[i] = wheel.rotation;
                // Δrotation/dt (rad/s) → rev/min
                sim.rpm[i] = delta / dt * 60.0 / std::f32::consts::TAU;

                let rot =
                    chassis_rot * UnitQuaternion::from_axis_angle(&Vector::y_axis(), wheel.steering);
                sim.poses[i] = WheelPose {
                    position: p3(wheel.center()),
                    rotation: q4(&rot),
                };
            }
        }

        // 4) Safety: reset bodies that left the playable volume.
        for (_, body) in self.bodies.iter_mut() {
            let pos = *body.translation();
            let bad = !pos.x.is_finite()
                || !pos.y.is_finite()
                || !pos.z.is_finite()
                || pos.x.abs() > WORLD_BOUND
                || pos.y.abs() > WORLD_BOUND
                || pos.z.abs() > WORLD_BOUND;

            if bad {
                warn!("resetting body that escaped the world");
                body.set_translation(vector![0.0, 1.5, 0.0], true);
                body.set_linvel(vector![0.0, 0.0, 0.0], true);
                body.set_angvel(vector![0.0, 0.0, 0.0], true);
            }
        }
    }
}
