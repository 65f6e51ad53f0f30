// ==============================================================================
// visual.rs — WHEEL VISUAL SYNC
// ==============================================================================
// Cosmetic only; never feeds back into physics. Per wheel, per frame:
// - copy the host wheel's world position onto the render pose
// - steering wheels: smooth the render yaw toward the commanded steer angle
// - non-steering wheels: take the host orientation directly
// - integrate spin from the host-reported rpm (forward Euler; decoupled from
//   the engine's own roll state, so it drifts; it is only ever looked at)
//
// Wheel meshes are modelled cylinder-up, so every orientation is composed
// with a fixed 90° correction about z; after the correction the model's
// local y is the roll axis.
// ==============================================================================

use crate::car_control::types::{lerp, q_axis_angle_deg, q_mul, Quat, Vec3, Q_IDENTITY};

/// rpm → deg/s.
pub const DEG_PER_SEC_PER_RPM: f32 = 6.0;

/// Per-frame yaw smoothing factor for steering wheels.
pub const STEER_SMOOTHING: f32 = 0.2;

const AXLE_CORRECTION: Quat = {
    // 90° about z, spelled out so it stays const.
    // sin(45°) = cos(45°) = FRAC_1_SQRT_2
    [0.0, 0.0, std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2]
};

const Y_AXIS: Vec3 = [0.0, 1.0, 0.0];

/// World pose of a host wheel, as read back from the engine.
#[derive(Debug, Clone, Copy)]
pub struct WheelPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for WheelPose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: Q_IDENTITY,
        }
    }
}

/// Render-side pose state for one wheel.
#[derive(Debug, Clone, Copy)]
pub struct WheelVisual {
    steering: bool,
    position: Vec3,
    yaw_deg: f32,
    spin_deg: f32,
}

impl WheelVisual {
    pub fn new(steering: bool) -> Self {
        Self {
            steering,
            position: [0.0; 3],
            yaw_deg: 0.0,
            spin_deg: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    pub fn spin_deg(&self) -> f32 {
        self.spin_deg
    }

    /// One frame of visual sync. `steer_angle_deg` is the current commanded
    /// steer angle, `rpm` the host wheel's rotational speed.
    pub fn sync(&mut self, host: &WheelPose, steer_angle_deg: f32, rpm: f32, dt: f32) {
        self.position = host.position;

        if self.steering {
            self.yaw_deg = lerp(self.yaw_deg, steer_angle_deg, STEER_SMOOTHING);
        }

        // Incremental roll; composed rotations are periodic, so keep the
        // accumulator in [0, 360).
        self.spin_deg = (self.spin_deg + rpm * DEG_PER_SEC_PER_RPM * dt).rem_euclid(360.0);
    }

    /// Render orientation: smoothed yaw for steering wheels, host orientation
    /// otherwise, both corrected for the mesh's up-axis and spun on the roll
    /// axis.
    pub fn rotation(&self, host: &WheelPose) -> Quat {
        let base = if self.steering {
            q_mul(q_axis_angle_deg(Y_AXIS, self.yaw_deg), AXLE_CORRECTION)
        } else {
            q_mul(host.rotation, AXLE_CORRECTION)
        };
        q_mul(base, q_axis_angle_deg(Y_AXIS, self.spin_deg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_at(position: Vec3) -> WheelPose {
        WheelPose {
            position,
            rotation: Q_IDENTITY,
        }
    }

    #[test]
    fn position_tracks_host_wheel() {
        let mut visual = WheelVisual::new(false);
        visual.sync(&pose_at([1.0, 0.4, -2.0]), 0.0, 0.0, 0.016);
        assert_eq!(visual.position(), [1.0, 0.4, -2.0]);
    }

    #[test]
    fn steering_yaw_smooths_toward_steer_angle() {
        let mut visual = WheelVisual::new(true);
        visual.sync(&pose_at([0.0; 3]), 30.0, 0.0, 0.016);
        assert!((visual.yaw_deg() - 6.0).abs() < 1e-4); // 0.2 of the way

        // Converges monotonically.
        let mut prev = visual.yaw_deg();
        for _ in 0..50 {
            visual.sync(&pose_at([0.0; 3]), 30.0, 0.0, 0.016);
            assert!(visual.yaw_deg() >= prev);
            prev = visual.yaw_deg();
        }
        assert!((visual.yaw_deg() - 30.0).abs() < 0.1);
    }

    #[test]
    fn non_steering_wheel_ignores_steer_angle() {
        let mut visual = WheelVisual::new(false);
        visual.sync(&pose_at([0.0; 3]), 30.0, 0.0, 0.016);
        assert_eq!(visual.yaw_deg(), 0.0);
    }

    #[test]
    fn spin_integrates_rpm() {
        let mut visual = WheelVisual::new(false);
        // 100 rpm * 6 deg/s-per-rpm * 0.5 s = 300 deg
        visual.sync(&pose_at([0.0; 3]), 0.0, 100.0, 0.5);
        assert!((visual.spin_deg() - 300.0).abs() < 1e-3);

        // Another half second wraps past 360.
        visual.sync(&pose_at([0.0; 3]), 0.0, 100.0, 0.5);
        assert!((visual.spin_deg() - 240.0).abs() < 1e-3);
    }

    #[test]
    fn spin_stays_in_range_over_long_runs() {
        let mut visual = WheelVisual::new(false);
        for _ in 0..10_000 {
            visual.sync(&pose_at([0.0; 3]), 0.0, 850.0, 0.016);
            assert!(visual.spin_deg() >= 0.0 && visual.spin_deg() < 360.0);
        }
    }

    #[test]
    fn rotation_composes_host_orientation_for_fixed_wheels() {
        let visual = WheelVisual::new(false);
        // Host rotated 180° about y; expect base = host * correction.
        let host = WheelPose {
            position: [0.0; 3],
            rotation: q_axis_angle_deg([0.0, 1.0, 0.0], 180.0),
        };
        let expected = q_mul(host.rotation, super::AXLE_CORRECTION);
        let got = visual.rotation(&host);
        for i in 0..4 {
            assert!((got[i] - expected[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn rotation_uses_smoothed_yaw_for_steering_wheels() {
        let mut visual = WheelVisual::new(true);
        for _ in 0..100 {
            visual.sync(&pose_at([0.0; 3]), 20.0, 0.0, 0.016);
        }
        // Host orientation must not matter for steering wheels.
        let host = WheelPose {
            position: [0.0; 3],
            rotation: q_axis_angle_deg([1.0, 0.0, 0.0], 90.0),
        };
        let expected = q_mul(
            q_axis_angle_deg([0.0, 1.0, 0.0], visual.yaw_deg()),
            super::AXLE_CORRECTION,
        );
        let got = visual.rotation(&host);
        for i in 0..4 {
            assert!((got[i] - expected[i]).abs() < 1e-5);
        }
    }
}
