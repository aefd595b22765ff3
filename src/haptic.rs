// RingTap: Vibration motor waveforms
//
// Each mode is a fixed table of (duty %, hold ms) steps. The motor task
// walks the table and drives the PWM channel; nothing here touches
// hardware.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VibrationStep {
    pub duty_percent: u8,
    pub hold_ms: u64,
}

const fn step(duty_percent: u8, hold_ms: u64) -> VibrationStep {
    VibrationStep {
        duty_percent,
        hold_ms,
    }
}

const HEARTBEAT: [VibrationStep; 4] = [step(95, 60), step(0, 80), step(70, 40), step(0, 820)];
const TAP: [VibrationStep; 2] = [step(90, 50), step(0, 200)];
const LONG: [VibrationStep; 2] = [step(90, 400), step(0, 600)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VibrationMode {
    Off,
    #[default]
    Heartbeat,
    Tap,
    Long,
}

impl VibrationMode {
    pub const ALL: [VibrationMode; 4] = [Self::Off, Self::Heartbeat, Self::Tap, Self::Long];

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Steps of one waveform period. `Off` has none: the motor is simply
    /// held at zero duty.
    pub fn waveform(self) -> &'static [VibrationStep] {
        match self {
            Self::Off => &[],
            Self::Heartbeat => &HEARTBEAT,
            Self::Tap => &TAP,
            Self::Long => &LONG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_audible_waveform_ends_with_the_motor_off() {
        for mode in VibrationMode::ALL {
            if let Some(last) = mode.waveform().last() {
                assert_eq!(last.duty_percent, 0, "{mode:?}");
            }
        }
        assert!(VibrationMode::Off.waveform().is_empty());
    }

    #[test]
    fn waveform_periods() {
        let period = |mode: VibrationMode| -> u64 { mode.waveform().iter().map(|s| s.hold_ms).sum() };
        assert_eq!(period(VibrationMode::Heartbeat), 1000);
        assert_eq!(period(VibrationMode::Tap), 250);
        assert_eq!(period(VibrationMode::Long), 1000);
        assert_eq!(period(VibrationMode::Off), 0);
    }

    #[test]
    fn modes_cycle() {
        assert_eq!(VibrationMode::Off.next(), VibrationMode::Heartbeat);
        assert_eq!(VibrationMode::Long.next(), VibrationMode::Off);
    }
}
