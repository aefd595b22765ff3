// RingTap: Button Input Manager
//
// Debounced edge detection for the four ring buttons, polled at ~100 Hz
// by the button task, and the mapping from presses to LED/motor modes.

use crate::config::{BUTTON_COUNT, DEBOUNCE_MS};
use crate::events::{ButtonEvent, ModeChange};
use crate::haptic::VibrationMode;
use crate::led::LedMode;

pub const BUTTON_LED_MODE: usize = 0;
pub const BUTTON_MOTOR_MODE: usize = 1;

#[derive(Debug, Clone, Copy)]
struct Debouncer {
    last_raw: bool,
    last_change_ms: u64,
    pressed: bool,
}

impl Debouncer {
    const fn new() -> Self {
        Self {
            last_raw: false,
            last_change_ms: 0,
            pressed: false,
        }
    }

    /// Returns the new state once the raw level has been steady for the
    /// debounce period and differs from the reported state.
    fn update(&mut self, now_ms: u64, raw_pressed: bool) -> Option<bool> {
        if raw_pressed != self.last_raw {
            self.last_raw = raw_pressed;
            self.last_change_ms = now_ms;
            return None;
        }

        let stable_ms = now_ms.saturating_sub(self.last_change_ms);
        if stable_ms < DEBOUNCE_MS || raw_pressed == self.pressed {
            return None;
        }

        self.pressed = raw_pressed;
        Some(raw_pressed)
    }
}

pub struct InputManager {
    buttons: [Debouncer; BUTTON_COUNT],
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            buttons: [Debouncer::new(); BUTTON_COUNT],
        }
    }

    /// Feed the raw pressed levels (already inverted from active-LOW) and
    /// collect any debounced press/release edges.
    pub fn update(
        &mut self,
        now_ms: u64,
        raw_pressed: [bool; BUTTON_COUNT],
    ) -> impl Iterator<Item = ButtonEvent> {
        let mut edges = [None; BUTTON_COUNT];
        for (index, (button, raw)) in self.buttons.iter_mut().zip(raw_pressed).enumerate() {
            edges[index] = button
                .update(now_ms, raw)
                .map(|pressed| ButtonEvent { index, pressed });
        }
        edges.into_iter().flatten()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Cycles the LED and motor modes on button presses.
pub struct ModeSelector {
    led: LedMode,
    motor: VibrationMode,
}

impl ModeSelector {
    pub fn new(led: LedMode, motor: VibrationMode) -> Self {
        Self { led, motor }
    }

    pub fn led_mode(&self) -> LedMode {
        self.led
    }

    pub fn motor_mode(&self) -> VibrationMode {
        self.motor
    }

    /// Releases are ignored.
    pub fn on_button(&mut self, event: ButtonEvent) -> Option<ModeChange> {
        if !event.pressed {
            return None;
        }

        match event.index {
            BUTTON_LED_MODE => {
                self.led = self.led.next();
                log::info!("LED mode switched to {:?}", self.led);
                Some(ModeChange::Led(self.led))
            }
            BUTTON_MOTOR_MODE => {
                self.motor = self.motor.next();
                log::info!("Motor mode switched to {:?}", self.motor);
                Some(ModeChange::Motor(self.motor))
            }
            other => {
                log::info!("Button SW{} pressed", other);
                None
            }
        }
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new(LedMode::default(), VibrationMode::default())
    }
}
