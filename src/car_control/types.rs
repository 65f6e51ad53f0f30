//! Core shared types for `car_control` (engine-agnostic).
use std::fmt;

pub type Vec3 = [f32; 3];

/// Quaternion as [x, y, z, w].
pub type Quat = [f32; 4];

// ----- tiny quaternion helpers (avoid pulling a math crate into the control core) -----
pub const Q_IDENTITY: Quat = [0.0, 0.0, 0.0, 1.0];

#[inline]
pub fn q_mul(a: Quat, b: Quat) -> Quat {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

/// Rotation of `angle_deg` degrees around a unit axis.
#[inline]
pub fn q_axis_angle_deg(axis: Vec3, angle_deg: f32) -> Quat {
    let half = angle_deg.to_radians() * 0.5;
    let (s, c) = half.sin_cos();
    [axis[0] * s, axis[1] * s, axis[2] * s, c]
}

#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

// ============================================
// Wheel identification
// ============================================

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WheelId { FL, FR, RL, RR }

impl WheelId {
    pub const ALL: [WheelId; 4] = [WheelId::FL, WheelId::FR, WheelId::RL, WheelId::RR];

    pub fn as_str(&self) -> &'static str {
        match self {
            WheelId::FL => "FL",
            WheelId::FR => "FR",
            WheelId::RL => "RL",
            WheelId::RR => "RR",
        }
    }

    /// Index into the host wheel array (wheels are registered FL, FR, RL, RR).
    pub fn index(&self) -> usize {
        match self {
            WheelId::FL => 0,
            WheelId::FR => 1,
            WheelId::RL => 2,
            WheelId::RR => 3,
        }
    }

    pub fn is_front(&self) -> bool {
        matches!(self, WheelId::FL | WheelId::FR)
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// ----- tuning / commands --------------------
// ============================================

/// Global car tuning. Angles in degrees, torques in N*m, offsets in meters.
#[derive(Debug, Clone, Copy)]
pub struct CarTuning {
    pub steer_max: f32,     // deg
    pub motor_max: f32,     // N*m
    pub brake_max: f32,     // N*m
    pub com_offset: Vec3,   // applied once at spawn
}

/// How pedal pressure becomes motor/brake commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlScheme {
    /// Vertical axis drives the motor directly; no reverse gear.
    Simple,
    /// Reverse/forward latch toggled at standstill (back pedal becomes
    /// reverse throttle, forward pedal becomes brake).
    Latched,
}

/// Resolved per-tick command, all channels normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveCommand {
    pub motor: f32,  // -1..1 (negative while reversing)
    pub brake: f32,  // 0..1
    pub steer: f32,  // -1..1
}
