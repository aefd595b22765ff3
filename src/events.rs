// RingTap: System Events & Data Types

use crate::led::LedMode;
use crate::haptic::VibrationMode;

// ---------------------------------------------------------------------------
// Sensor Data (raw 3-axis accelerometer reading from the MPU6050)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccelSample {
    pub ax: i16,
    pub ay: i16,
    pub az: i16,
}

impl AccelSample {
    pub const fn new(ax: i16, ay: i16, az: i16) -> Self {
        Self { ax, ay, az }
    }

    /// Each axis in g-units.
    pub fn to_g(&self, scale: f32) -> (f32, f32, f32) {
        (
            f32::from(self.ax) / scale,
            f32::from(self.ay) / scale,
            f32::from(self.az) / scale,
        )
    }

    /// Euclidean norm in g-units.
    pub fn magnitude(&self, scale: f32) -> f32 {
        let (x, y, z) = self.to_g(scale);
        (x * x + y * y + z * z).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Engine output
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapEvent {
    #[default]
    None,
    DoubleTapDetected,
}

impl TapEvent {
    pub fn is_double_tap(&self) -> bool {
        matches!(self, Self::DoubleTapDetected)
    }
}

/// Periodic telemetry snapshot. Not consumed by engine logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub gravity_reference: f32,
    pub calibrated: bool,
    pub current_magnitude: f32,
}

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub index: usize,
    pub pressed: bool,
}

// ---------------------------------------------------------------------------
// Ring Events: sent to the UI task via channel
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingEvent {
    /// The tap engine recognised a double-tap.
    DoubleTap,
    /// Periodic engine health snapshot.
    Diagnostics(Diagnostics),
    /// Debounced button edge.
    Button(ButtonEvent),
}

// ---------------------------------------------------------------------------
// Motor Commands: sent to the motor task via channel
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCommand {
    /// Switch the continuously repeated waveform.
    SetMode(VibrationMode),
    /// Play one waveform now, then resume the current mode.
    Pulse(VibrationMode),
}

/// Outcome of a button press routed through [`crate::input::ModeSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Led(LedMode),
    Motor(VibrationMode),
}
