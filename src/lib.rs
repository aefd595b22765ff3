// RingTap: Smart-ring double-tap firmware core
//
// Everything here is hardware-free so it builds and tests on the host.
// The ESP-IDF binary in `main.rs` owns the drivers and tasks and feeds
// this crate samples, button levels and timestamps.

pub mod config;
pub mod engine;
pub mod events;
pub mod haptic;
pub mod input;
pub mod led;
pub mod sim;
pub mod transport;

pub use engine::TapEngine;
pub use events::{AccelSample, TapEvent};
