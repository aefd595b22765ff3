// RingTap: Vibration Motor Driver
//
// PWM-driven motor gate. Waveform steps come from `ringtap::haptic`.

use std::thread;
use std::time::Duration;

use esp_idf_hal::ledc::LedcDriver;

use ringtap::haptic::VibrationMode;

use super::led::set_percent;

pub struct MotorDriver {
    channel: LedcDriver<'static>,
}

impl MotorDriver {
    pub fn new(channel: LedcDriver<'static>) -> Self {
        Self { channel }
    }

    pub fn set_duty(&mut self, percent: u8) {
        if let Err(e) = set_percent(&mut self.channel, percent) {
            log::warn!("Motor duty update failed: {}", e);
        }
    }

    /// Play one full period of a waveform (blocks the calling thread).
    pub fn play_once(&mut self, mode: VibrationMode) {
        for step in mode.waveform() {
            self.set_duty(step.duty_percent);
            thread::sleep(Duration::from_millis(step.hold_ms));
        }
        self.stop();
    }

    pub fn stop(&mut self) {
        self.set_duty(0);
    }
}
