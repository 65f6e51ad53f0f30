//! car_control - engine-agnostic car control (pure types + command logic)

pub mod types;
pub mod input;
pub mod drive_state;
pub mod wheel_set;
pub mod visual;

pub use types::*;
pub use input::PedalInput;
pub use drive_state::DriveState;
pub use wheel_set::{WheelActuator, WheelSet};
pub use visual::{WheelPose, WheelVisual};

#[cfg(test)]
pub(crate) mod test_util;
