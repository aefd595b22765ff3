// RingTap: Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V) on the ring carrier board

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON_SW0: i32 = 2;  // D0 - LED mode button (INPUT_PULLUP, active LOW)
pub const PIN_BUTTON_SW1: i32 = 3;  // D1 - Motor mode button
pub const PIN_BUTTON_SW2: i32 = 4;  // D2 - Spare button
pub const PIN_BUTTON_SW3: i32 = 5;  // D3 - Spare button
pub const PIN_I2C_SDA: i32 = 6;     // D4 - I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5 - I2C clock line
pub const PIN_LED_RED: i32 = 21;    // D6 - Bicolor LED, red die (LEDC PWM)
pub const PIN_LED_BLUE: i32 = 20;   // D7 - Bicolor LED, blue die (LEDC PWM)
pub const PIN_MOTOR: i32 = 10;      // D10 - Vibration motor gate (LEDC PWM)

pub const BUTTON_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SENSOR: usize = 6144;
pub const STACK_UI: usize = 4096;
pub const STACK_MOTOR: usize = 3072;
pub const STACK_BUTTONS: usize = 2048;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SAMPLING_INTERVAL_MS: u64 = 20;           // 50 Hz accelerometer tick
pub const DIAGNOSTIC_EVERY_TICKS: u32 = 250;        // ~5 s status snapshot
pub const MAX_CONSECUTIVE_READ_FAILURES: u32 = 10;  // then reinitialise the IMU
pub const BUTTON_POLL_INTERVAL_MS: u64 = 10;
pub const DEBOUNCE_MS: u64 = 20;
pub const LED_REFRESH_MS: u64 = 15;                 // static colour re-apply period
pub const BREATH_PERIOD_MS: u64 = 2000;
pub const BREATH_UPDATE_MS: u64 = 10;
pub const FLASH_TOGGLE_MS: u64 = 250;
pub const DOUBLE_TAP_FLASH_TOGGLES: u8 = 4;         // LED burst on double-tap
pub const DOUBLE_TAP_FLASH_TOGGLE_MS: u64 = 80;

// ---------------------------------------------------------------------------
// MPU6050 Sensor Scale Factor
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_2G: f32 = 16384.0; // LSB/g at ±2 g

// ---------------------------------------------------------------------------
// Tap Detection Defaults
// ---------------------------------------------------------------------------
pub const SMOOTH_WINDOW: usize = 3;
pub const POSTURE_WINDOW: usize = 6;

pub const POSTURE_VARIANCE_MAX: f32 = 0.040;
pub const POSTURE_RANGE_MAX: f32 = 0.15;
pub const POSTURE_GRAVITY_TOLERANCE: f32 = 0.25;
pub const NEAR_GRAVITY_TOLERANCE: f32 = 0.18;

pub const TAP_SPIKE_THRESHOLD: f32 = 0.30;
pub const TAP_FALL_MULTIPLIER: f32 = 0.4;
pub const TAP_PEAK_THRESHOLD: f32 = 1.20;
pub const TAP_MIN_DURATION_MS: u64 = 25;
pub const TAP_TIMEOUT_MULTIPLIER: u64 = 4;
pub const TAP_COOLDOWN_MS: u64 = 180;

pub const DOUBLE_TAP_MIN_MS: u64 = 100;
pub const DOUBLE_TAP_MAX_MS: u64 = 500;
pub const DOUBLE_TAP_COOLDOWN_MS: u64 = 1000;

pub const AXIS_DOMINANCE_MIN: f32 = 0.8;
pub const AXIS_DOMINANCE_RATIO: f32 = 1.4;
pub const AXIS_OTHER_FLOOR: f32 = 0.01;
pub const TAP_CONSISTENCY_RATIO: f32 = 2.5;

pub const CALIBRATION_SAMPLES: u32 = 50;
pub const CALIBRATION_TOLERANCE: f32 = 0.3;
pub const GRAVITY_NOMINAL: f32 = 1.0;

/// Tunable parameters of the tap-gesture engine.
///
/// Window capacities are not here: they size fixed arrays and are const
/// generic parameters of [`crate::engine::TapEngine`] instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapConfig {
    /// Raw accelerometer counts per g.
    pub accel_scale: f32,
    pub posture_variance_max: f32,
    pub posture_range_max: f32,
    pub posture_gravity_tolerance: f32,
    pub near_gravity_tolerance: f32,
    pub spike_threshold: f32,
    /// Fraction of `spike_threshold` the smoothed signal must fall by to
    /// confirm the end of an impulse.
    pub fall_multiplier: f32,
    pub peak_threshold: f32,
    pub min_duration_ms: u64,
    pub timeout_multiplier: u64,
    pub tap_cooldown_ms: u64,
    pub double_tap_min_ms: u64,
    pub double_tap_max_ms: u64,
    pub double_tap_cooldown_ms: u64,
    pub axis_dominance_min: f32,
    pub axis_dominance_ratio: f32,
    pub consistency_ratio: f32,
    pub calibration_samples: u32,
    pub calibration_tolerance: f32,
    pub gravity_nominal: f32,
    pub sampling_interval_ms: u64,
}

impl TapConfig {
    /// Spike level (negative) that confirms an impulse has fallen.
    pub fn fall_threshold(&self) -> f32 {
        -self.spike_threshold * self.fall_multiplier
    }

    /// Impulses held longer than this without falling are discarded.
    pub fn impulse_timeout_ms(&self) -> u64 {
        self.min_duration_ms * self.timeout_multiplier
    }
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            accel_scale: ACCEL_SCALE_2G,
            posture_variance_max: POSTURE_VARIANCE_MAX,
            posture_range_max: POSTURE_RANGE_MAX,
            posture_gravity_tolerance: POSTURE_GRAVITY_TOLERANCE,
            near_gravity_tolerance: NEAR_GRAVITY_TOLERANCE,
            spike_threshold: TAP_SPIKE_THRESHOLD,
            fall_multiplier: TAP_FALL_MULTIPLIER,
            peak_threshold: TAP_PEAK_THRESHOLD,
            min_duration_ms: TAP_MIN_DURATION_MS,
            timeout_multiplier: TAP_TIMEOUT_MULTIPLIER,
            tap_cooldown_ms: TAP_COOLDOWN_MS,
            double_tap_min_ms: DOUBLE_TAP_MIN_MS,
            double_tap_max_ms: DOUBLE_TAP_MAX_MS,
            double_tap_cooldown_ms: DOUBLE_TAP_COOLDOWN_MS,
            axis_dominance_min: AXIS_DOMINANCE_MIN,
            axis_dominance_ratio: AXIS_DOMINANCE_RATIO,
            consistency_ratio: TAP_CONSISTENCY_RATIO,
            calibration_samples: CALIBRATION_SAMPLES,
            calibration_tolerance: CALIBRATION_TOLERANCE,
            gravity_nominal: GRAVITY_NOMINAL,
            sampling_interval_ms: SAMPLING_INTERVAL_MS,
        }
    }
}
