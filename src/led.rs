// RingTap: Bicolor LED pattern renderer
//
// Pure colour logic for the red/blue LED. The UI task calls `step` and
// applies the returned duty cycles to the PWM channels, then waits for
// the returned delay.

use core::f32::consts::PI;

use crate::config::{
    BREATH_PERIOD_MS, BREATH_UPDATE_MS, DOUBLE_TAP_FLASH_TOGGLES, DOUBLE_TAP_FLASH_TOGGLE_MS,
    FLASH_TOGGLE_MS, LED_REFRESH_MS,
};

const BREATH_STEPS: u32 = (BREATH_PERIOD_MS / BREATH_UPDATE_MS) as u32;
const BREATH_GAMMA: f32 = 2.0;
const USER_BREATH_FLOOR: f32 = 0.2;
const USER_BREATH_BLUE_SHARE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedMode {
    Off,
    #[default]
    Red,
    Blue,
    Purple,
    Breath,
    Flash,
    User,
    UserBreath,
}

impl LedMode {
    pub const ALL: [LedMode; 8] = [
        Self::Off,
        Self::Red,
        Self::Blue,
        Self::Purple,
        Self::Breath,
        Self::Flash,
        Self::User,
        Self::UserBreath,
    ];

    /// Next mode in button-cycling order, wrapping back to `Off`.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Duty cycle percentages, each clamped to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedColor {
    pub red: u8,
    pub blue: u8,
}

impl LedColor {
    pub const OFF: LedColor = LedColor { red: 0, blue: 0 };

    pub fn new(red: u8, blue: u8) -> Self {
        Self {
            red: red.min(100),
            blue: blue.min(100),
        }
    }
}

/// One rendered frame: colour to apply and how long to hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedFrame {
    pub color: LedColor,
    pub hold_ms: u64,
}

/// Gamma-corrected sine breathing curve, 0..=1, dark at phase 0.
fn breathe_level(phase: f32) -> f32 {
    let raw = ((phase - PI / 2.0).sin() + 1.0) / 2.0;
    raw.powf(BREATH_GAMMA)
}

pub struct LedAnimator {
    mode: LedMode,
    breath_step: u32,
    blink: u32,
    burst_remaining: u8,
}

impl LedAnimator {
    pub fn new(mode: LedMode) -> Self {
        Self {
            mode,
            breath_step: 0,
            blink: 0,
            burst_remaining: 0,
        }
    }

    pub fn set_mode(&mut self, mode: LedMode) {
        self.mode = mode;
        self.breath_step = 0;
        self.blink = 0;
    }

    /// Override the current mode with a short red/blue burst.
    pub fn flash_burst(&mut self) {
        self.burst_remaining = DOUBLE_TAP_FLASH_TOGGLES;
    }

    pub fn step(&mut self) -> LedFrame {
        if self.burst_remaining > 0 {
            self.burst_remaining -= 1;
            let color = if self.burst_remaining % 2 == 1 {
                LedColor::new(100, 0)
            } else {
                LedColor::new(0, 100)
            };
            return LedFrame {
                color,
                hold_ms: DOUBLE_TAP_FLASH_TOGGLE_MS,
            };
        }

        match self.mode {
            LedMode::Off => Self::solid(LedColor::OFF),
            LedMode::Red => Self::solid(LedColor::new(100, 0)),
            LedMode::Blue => Self::solid(LedColor::new(0, 100)),
            LedMode::Purple => Self::solid(LedColor::new(50, 50)),
            LedMode::User => Self::solid(LedColor::new(80, 60)),
            LedMode::Breath => {
                let level = self.advance_breath();
                let blue = ((level * 100.0) as u8).min(100);
                LedFrame {
                    color: LedColor::new(100 - blue, blue),
                    hold_ms: BREATH_UPDATE_MS,
                }
            }
            LedMode::UserBreath => {
                let level = self.advance_breath();
                let red = ((USER_BREATH_FLOOR + (1.0 - USER_BREATH_FLOOR) * level) * 100.0) as u8;
                let blue = (f32::from(red) * USER_BREATH_BLUE_SHARE) as u8;
                LedFrame {
                    color: LedColor::new(red, blue),
                    hold_ms: BREATH_UPDATE_MS,
                }
            }
            LedMode::Flash => {
                self.blink = self.blink.wrapping_add(1);
                let color = if self.blink % 2 == 0 {
                    LedColor::new(100, 0)
                } else {
                    LedColor::new(0, 100)
                };
                LedFrame {
                    color,
                    hold_ms: FLASH_TOGGLE_MS,
                }
            }
        }
    }

    fn solid(color: LedColor) -> LedFrame {
        LedFrame {
            color,
            hold_ms: LED_REFRESH_MS,
        }
    }

    fn advance_breath(&mut self) -> f32 {
        self.breath_step = (self.breath_step + 1) % BREATH_STEPS;
        let phase = self.breath_step as f32 / BREATH_STEPS as f32 * 2.0 * PI;
        breathe_level(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_cycle_and_wrap() {
        let mut mode = LedMode::Off;
        for _ in 0..LedMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, LedMode::Off);
        assert_eq!(LedMode::UserBreath.next(), LedMode::Off);
        assert_eq!(LedMode::Red.next(), LedMode::Blue);
    }

    #[test]
    fn static_modes_hold_their_colour() {
        let mut led = LedAnimator::new(LedMode::Purple);
        let frame = led.step();
        assert_eq!(frame.color, LedColor::new(50, 50));
        assert_eq!(frame.hold_ms, LED_REFRESH_MS);

        led.set_mode(LedMode::User);
        assert_eq!(led.step().color, LedColor::new(80, 60));
    }

    #[test]
    fn breath_peaks_blue_half_way() {
        let mut led = LedAnimator::new(LedMode::Breath);
        let frames: Vec<LedFrame> = (0..BREATH_STEPS).map(|_| led.step()).collect();

        let first = frames[0].color;
        assert!(first.blue < 2);
        assert_eq!(u16::from(first.red) + u16::from(first.blue), 100);

        let middle = frames[(BREATH_STEPS / 2 - 1) as usize].color;
        assert!(middle.blue >= 99, "blue at mid-period: {}", middle.blue);
        assert!(frames.iter().all(|f| f.hold_ms == BREATH_UPDATE_MS));
    }

    #[test]
    fn user_breath_never_goes_dark() {
        let mut led = LedAnimator::new(LedMode::UserBreath);
        for _ in 0..BREATH_STEPS {
            let color = led.step().color;
            assert!(color.red >= 19);
            assert!(color.blue <= color.red);
        }
    }

    #[test]
    fn flash_alternates() {
        let mut led = LedAnimator::new(LedMode::Flash);
        let a = led.step();
        let b = led.step();
        assert_ne!(a.color, b.color);
        assert_eq!(a.hold_ms, FLASH_TOGGLE_MS);
    }

    #[test]
    fn burst_overrides_then_resumes_mode() {
        let mut led = LedAnimator::new(LedMode::Red);
        led.flash_burst();
        let burst: Vec<LedFrame> = (0..DOUBLE_TAP_FLASH_TOGGLES).map(|_| led.step()).collect();
        assert!(burst.iter().all(|f| f.hold_ms == DOUBLE_TAP_FLASH_TOGGLE_MS));
        assert!(burst.iter().any(|f| f.color == LedColor::new(0, 100)));
        assert_eq!(led.step().color, LedColor::new(100, 0));
        assert_eq!(led.mode, LedMode::Red);
    }

    #[test]
    fn colour_is_clamped() {
        assert_eq!(LedColor::new(150, 200), LedColor::new(100, 100));
    }
}
