// RingTap: Sensor acquisition failure policy
//
// Counts consecutive failed reads and tells the sampling loop when the
// sensor should be brought up again. Lives outside the engine: failed
// ticks are never fed to it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionAction {
    /// Keep sampling on the next tick.
    Continue,
    /// Too many consecutive failures: reinitialise the sensor.
    Reinitialize,
}

#[derive(Debug, Clone, Copy)]
pub struct AcquisitionPolicy {
    max_consecutive_failures: u32,
    consecutive_failures: u32,
    reinit_count: u32,
}

impl AcquisitionPolicy {
    pub const fn new(max_consecutive_failures: u32) -> Self {
        Self {
            max_consecutive_failures,
            consecutive_failures: 0,
            reinit_count: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Reinitialise once the count goes above the limit; the counter
    /// restarts from zero afterwards.
    pub fn record_failure(&mut self) -> AcquisitionAction {
        self.consecutive_failures += 1;
        if self.consecutive_failures > self.max_consecutive_failures {
            self.consecutive_failures = 0;
            self.reinit_count += 1;
            AcquisitionAction::Reinitialize
        } else {
            AcquisitionAction::Continue
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn reinit_count(&self) -> u32 {
        self.reinit_count
    }
}

impl Default for AcquisitionPolicy {
    fn default() -> Self {
        Self::new(crate::config::MAX_CONSECUTIVE_READ_FAILURES)
    }
}
