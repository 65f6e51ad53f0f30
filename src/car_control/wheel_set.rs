// ==============================================================================
// wheel_set.rs — WHEEL ACTUATOR
// ==============================================================================
// A WheelSet is a left/right wheel pair sharing three capability flags:
// - drive:    the pair receives motor torque
// - brakes:   the pair receives brake torque
// - steering: the pair receives steer angle
//
// A disabled capability performs NO write on that channel; the host keeps
// whatever resting value the engine component holds.
//
// Sign convention: motor torque is `-motor_max * motor`. A forward command
// carries negative torque on the axle, reverse positive; the host adapter
// owns the flip to its own forward axis.
// ==============================================================================

use crate::car_control::types::{CarTuning, DriveCommand, WheelId};

/// Host-side wheel setpoints (the engine-owned wheel component interface).
pub trait WheelActuator {
    fn set_motor_torque(&mut self, torque_nm: f32);
    fn set_brake_torque(&mut self, torque_nm: f32);
    fn set_steer_angle(&mut self, angle_deg: f32);
}

#[derive(Debug, Clone, Copy)]
pub struct WheelSet {
    pub left: WheelId,
    pub right: WheelId,
    pub drive: bool,
    pub brakes: bool,
    pub steering: bool,
}

impl WheelSet {
    pub fn wheel_ids(&self) -> [WheelId; 2] {
        [self.left, self.right]
    }

    /// Write this tick's command to one wheel of the pair, honoring the
    /// capability flags.
    pub fn apply<W: WheelActuator>(&self, wheel: &mut W, cmd: &DriveCommand, tuning: &CarTuning) {
        if self.drive {
            wheel.set_motor_torque(-1.0 * tuning.motor_max * cmd.motor);
        }
        if self.brakes {
            wheel.set_brake_torque(tuning.brake_max * cmd.brake);
        }
        if self.steering {
            wheel.set_steer_angle(tuning.steer_max * cmd.steer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car_control::test_util::MockWheel;

    const TUNING: CarTuning = CarTuning {
        steer_max: 30.0,
        motor_max: 1000.0,
        brake_max: 2000.0,
        com_offset: [0.0, -0.2, 0.0],
    };

    fn set(drive: bool, brakes: bool, steering: bool) -> WheelSet {
        WheelSet {
            left: WheelId::FL,
            right: WheelId::FR,
            drive,
            brakes,
            steering,
        }
    }

    #[test]
    fn disabled_capabilities_produce_no_writes() {
        let mut wheel = MockWheel::default();
        let cmd = DriveCommand { motor: 1.0, brake: 1.0, steer: 1.0 };

        set(false, false, false).apply(&mut wheel, &cmd, &TUNING);
        assert_eq!(wheel.motor_torque, None);
        assert_eq!(wheel.brake_torque, None);
        assert_eq!(wheel.steer_angle, None);

        set(true, false, false).apply(&mut wheel, &cmd, &TUNING);
        assert!(wheel.motor_torque.is_some());
        assert_eq!(wheel.brake_torque, None);
        assert_eq!(wheel.steer_angle, None);
    }

    #[test]
    fn forward_command_is_negative_torque() {
        let mut wheel = MockWheel::default();
        let cmd = DriveCommand { motor: 0.5, brake: 0.0, steer: 0.0 };
        set(true, true, false).apply(&mut wheel, &cmd, &TUNING);
        assert_eq!(wheel.motor_torque, Some(-500.0));
        assert_eq!(wheel.brake_torque, Some(0.0));
    }

    #[test]
    fn reverse_command_is_positive_torque() {
        let mut wheel = MockWheel::default();
        let cmd = DriveCommand { motor: -0.25, brake: 0.0, steer: 0.0 };
        set(true, false, false).apply(&mut wheel, &cmd, &TUNING);
        assert_eq!(wheel.motor_torque, Some(250.0));
    }

    #[test]
    fn outputs_bounded_by_tuning_maxima() {
        for mi in -10..=10 {
            for bi in 0..=10 {
                for si in -10..=10 {
                    let cmd = DriveCommand {
                        motor: mi as f32 / 10.0,
                        brake: bi as f32 / 10.0,
                        steer: si as f32 / 10.0,
                    };
                    let mut wheel = MockWheel::default();
                    set(true, true, true).apply(&mut wheel, &cmd, &TUNING);
                    assert!(wheel.motor_torque.unwrap().abs() <= TUNING.motor_max);
                    let brake = wheel.brake_torque.unwrap();
                    assert!(brake >= 0.0 && brake <= TUNING.brake_max);
                    assert!(wheel.steer_angle.unwrap().abs() <= TUNING.steer_max);
                }
            }
        }
    }

    #[test]
    fn steer_angle_scales_with_max() {
        let mut wheel = MockWheel::default();
        let cmd = DriveCommand { motor: 0.0, brake: 0.0, steer: -0.5 };
        set(false, false, true).apply(&mut wheel, &cmd, &TUNING);
        assert_eq!(wheel.steer_angle, Some(-15.0));
    }
}
