// RingTap: Synthetic accelerometer traces
//
// Deterministic sample streams for exercising the tap engine without a
// sensor or a clock. Used by the engine tests and by the host replay
// binary.

use crate::config::{ACCEL_SCALE_2G, SAMPLING_INTERVAL_MS};
use crate::events::AccelSample;

/// One scheduled tick: `None` stands for a failed acquisition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimTick {
    pub now_ms: u64,
    pub sample: Option<AccelSample>,
}

fn to_raw(g: f32) -> i16 {
    (g * ACCEL_SCALE_2G)
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Ring lying still with gravity on the z axis.
pub fn resting(level_g: f32) -> AccelSample {
    AccelSample::new(0, 0, to_raw(level_g))
}

/// Builds a trace at the fixed sampling interval.
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    now_ms: u64,
    interval_ms: u64,
    rest_g: f32,
    ticks: Vec<SimTick>,
}

impl TraceBuilder {
    pub fn new(start_ms: u64, rest_g: f32) -> Self {
        Self {
            now_ms: start_ms,
            interval_ms: SAMPLING_INTERVAL_MS,
            rest_g,
            ticks: Vec::new(),
        }
    }

    fn push(&mut self, sample: Option<AccelSample>) {
        self.ticks.push(SimTick {
            now_ms: self.now_ms,
            sample,
        });
        self.now_ms += self.interval_ms;
    }

    /// Timestamp the next tick will carry.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn rest(mut self, ticks: usize) -> Self {
        for _ in 0..ticks {
            self.push(Some(resting(self.rest_g)));
        }
        self
    }

    /// A finger tap as the smoothed signal sees it: a short dip, a sharp
    /// lateral impulse, then back to rest. The fall is confirmed on the
    /// last of the five ticks. Needs a rest level (and calibrated
    /// reference) a little above 1 g to clear the peak threshold while
    /// staying near gravity.
    pub fn tap(mut self) -> Self {
        let rest = self.rest_g;
        let dip = rest - 0.45;
        let peak = rest + 0.95;
        let lateral = (peak * peak - rest * rest).sqrt();

        self.push(Some(resting(dip)));
        self.push(Some(AccelSample::new(to_raw(lateral), 0, to_raw(rest))));
        for _ in 0..3 {
            self.push(Some(resting(rest)));
        }
        self
    }

    /// Omnidirectional wrist shake.
    pub fn shake(mut self, ticks: usize) -> Self {
        for i in 0..ticks {
            let sample = if i % 2 == 0 {
                AccelSample::new(to_raw(1.2), to_raw(1.1), to_raw(1.1))
            } else {
                AccelSample::new(to_raw(0.2), to_raw(-0.2), to_raw(0.1))
            };
            self.push(Some(sample));
        }
        self
    }

    /// Ticks where the sensor read failed.
    pub fn dropout(mut self, ticks: usize) -> Self {
        for _ in 0..ticks {
            self.push(None);
        }
        self
    }

    pub fn build(self) -> Vec<SimTick> {
        self.ticks
    }
}

/// Rest level the canned scenarios use; typical of an MPU6050 whose z
/// offset reads slightly high.
pub const DEMO_REST_G: f32 = 1.15;

/// Calibrate, then two taps 240 ms apart.
pub fn double_tap_scenario() -> Vec<SimTick> {
    TraceBuilder::new(0, DEMO_REST_G)
        .rest(60)
        .tap()
        .rest(7)
        .tap()
        .rest(10)
        .build()
}
