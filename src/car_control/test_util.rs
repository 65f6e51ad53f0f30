//! Test doubles shared by the control-core tests.

use crate::car_control::wheel_set::WheelActuator;

/// Records setpoint writes; `None` means the channel was never touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockWheel {
    pub motor_torque: Option<f32>,
    pub brake_torque: Option<f32>,
    pub steer_angle: Option<f32>,
}

impl WheelActuator for MockWheel {
    fn set_motor_torque(&mut self, torque_nm: f32) {
        self.motor_torque = Some(torque_nm);
    }

    fn set_brake_torque(&mut self, torque_nm: f32) {
        self.brake_torque = Some(torque_nm);
    }

    fn set_steer_angle(&mut self, angle_deg: f32) {
        self.steer_angle = Some(angle_deg);
    }
}
