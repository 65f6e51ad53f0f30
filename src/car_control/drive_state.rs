// ==============================================================================
// drive_state.rs — FORWARD/REVERSE LATCH
// ==============================================================================
// Decides whether pedal pressure means "drive" or "brake". Exactly one of
// forward/reverse is active at a time, and the latch only toggles while the
// car is (near) stationary; a moving car brakes instead of reversing.
//
// The standstill test works on *squared* speed truncated to whole units:
// physics jitter keeps the measured value from ever being exactly zero, so
// anything below 1 m²/s² counts as stopped.
// ==============================================================================

use crate::car_control::input::PedalInput;
use crate::car_control::types::DriveCommand;

#[derive(Debug, Clone, Copy, Default)]
pub struct DriveState {
    reverse: bool,
}

impl DriveState {
    pub fn new() -> Self {
        Self { reverse: false }
    }

    pub fn is_reversing(&self) -> bool {
        self.reverse
    }

    /// One tick of the latch + command mapping. `speed_sq` is the chassis
    /// velocity squared magnitude (m²/s²).
    pub fn resolve(&mut self, pedals: &PedalInput, speed_sq: f32) -> DriveCommand {
        if speed_sq < 1.0 {
            // Back first, forward second: a simultaneous press latches forward.
            if pedals.back > 0.0 {
                self.reverse = true;
            }
            if pedals.forward > 0.0 {
                self.reverse = false;
            }
        }

        let (motor, brake) = if self.reverse {
            (-pedals.back, pedals.forward)
        } else {
            (pedals.forward, pedals.back)
        };

        DriveCommand {
            motor,
            brake,
            steer: pedals.steer,
        }
    }
}

/// Latch-free mapping: vertical axis drives, never reverses.
pub fn resolve_direct(pedals: &PedalInput) -> DriveCommand {
    DriveCommand {
        motor: pedals.forward,
        brake: pedals.back,
        steer: pedals.steer,
    }
}
