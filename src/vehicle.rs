//! One car: tuning, wheel sets, drive state, and render-side wheel visuals.
//!
//! The car splits its tick the way the host engine splits callbacks:
//! `frame_update` samples input, runs the forward/reverse latch, and syncs
//! the cosmetic wheel poses; `fixed_update` writes the actuation setpoints.

use crate::car_control::drive_state::resolve_direct;
use crate::car_control::{
    CarTuning, ControlScheme, DriveCommand, DriveState, PedalInput, WheelActuator, WheelId,
    WheelPose, WheelSet, WheelVisual,
};

pub struct Car {
    pub tuning: CarTuning,
    pub scheme: ControlScheme,
    pub drive_state: DriveState,
    pub front: WheelSet,  // steering + brakes
    pub back: WheelSet,   // drive + brakes
    pub pedals: PedalInput,
    pub command: DriveCommand,    // resolved this frame
    pub steer_angle_deg: f32,     // commanded steer angle
    pub speed_sq: f32,            // last sampled chassis speed² (m²/s²)
    pub visuals: [WheelVisual; 4],
}

impl Car {
    pub fn new(tuning: CarTuning, scheme: ControlScheme) -> Self {
        Self {
            tuning,
            scheme,
            drive_state: DriveState::new(),
            front: WheelSet {
                left: WheelId::FL,
                right: WheelId::FR,
                drive: false,
                brakes: true,
                steering: true,
            },
            back: WheelSet {
                left: WheelId::RL,
                right: WheelId::RR,
                drive: true,
                brakes: true,
                steering: false,
            },
            pedals: PedalInput::default(),
            command: DriveCommand::default(),
            steer_angle_deg: 0.0,
            speed_sq: 0.0,
            visuals: [
                WheelVisual::new(true),  // FL
                WheelVisual::new(true),  // FR
                WheelVisual::new(false), // RL
                WheelVisual::new(false), // RR
            ],
        }
    }

    /// Latest raw client axes, mapped to pedals.
    pub fn set_axes(&mut self, horizontal: f32, vertical: f32) {
        self.pedals = PedalInput::from_axes(horizontal, vertical);
    }

    /// Frame phase: resolve the drive command and sync wheel visuals from
    /// the host wheel poses and rotation speeds.
    pub fn frame_update(&mut self, speed_sq: f32, poses: &[WheelPose; 4], rpm: &[f32; 4], dt: f32) {
        self.speed_sq = speed_sq;

        self.command = match self.scheme {
            ControlScheme::Simple => resolve_direct(&self.pedals),
            ControlScheme::Latched => self.drive_state.resolve(&self.pedals, speed_sq),
        };
        self.steer_angle_deg = self.tuning.steer_max * self.command.steer;

        for id in WheelId::ALL {
            let i = id.index();
            self.visuals[i].sync(&poses[i], self.steer_angle_deg, rpm[i], dt);
        }
    }

    /// Fixed phase: write setpoints to the host wheels (indexed FL, FR, RL,
    /// RR). Channels whose capability flag is off are left untouched.
    pub fn fixed_update<W: WheelActuator>(&mut self, wheels: &mut [W]) {
        for set in [self.front, self.back] {
            for id in set.wheel_ids() {
                set.apply(&mut wheels[id.index()], &self.command, &self.tuning);
            }
        }
    }

    pub fn is_reversing(&self) -> bool {
        self.drive_state.is_reversing()
    }

    /// Motor torque currently commanded on a wheel (0 for undriven wheels).
    pub fn commanded_motor_torque(&self, id: WheelId) -> f32 {
        let set = if id.is_front() { &self.front } else { &self.back };
        if set.drive {
            -1.0 * self.tuning.motor_max * self.command.motor
        } else {
            0.0
        }
    }
}
