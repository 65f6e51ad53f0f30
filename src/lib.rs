//! Four-wheel vehicle control server.
//!
//! Clients connect over websocket and stream two normalized axes (steer +
//! throttle/brake). Each tick the server maps axes to per-wheel motor/brake/
//! steer setpoints, hands them to the host physics engine's wheel component,
//! steps the world, and broadcasts pose + wheel-visual snapshots.
//!
//! The split matters: `car_control` is pure input→command logic (testable in
//! isolation), `physics` is the only module that talks to the engine.

pub mod car_control;
pub mod config;
pub mod net;
pub mod physics;
pub mod state;
pub mod vehicle;
