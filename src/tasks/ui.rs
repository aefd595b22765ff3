// RingTap: UI Task
//
// Owns the bicolor LED and the mode selector. Renders the current LED
// pattern between events and reacts to double-taps and button presses.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use ringtap::events::{ModeChange, MotorCommand, RingEvent};
use ringtap::haptic::VibrationMode;
use ringtap::input::ModeSelector;
use ringtap::led::LedAnimator;

use crate::drivers::led::BicolorLed;

pub fn ui_task(mut led: BicolorLed, ring_rx: Receiver<RingEvent>, motor_tx: Sender<MotorCommand>) {
    log::info!("UI task started");

    let mut selector = ModeSelector::default();
    let mut animator = LedAnimator::new(selector.led_mode());

    if motor_tx
        .send(MotorCommand::SetMode(selector.motor_mode()))
        .is_err()
    {
        log::warn!("Motor channel closed");
    }

    loop {
        let frame = animator.step();
        if let Err(e) = led.apply(frame.color) {
            log::warn!("LED update failed: {}", e);
        }

        let event = match ring_rx.recv_timeout(Duration::from_millis(frame.hold_ms)) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Ring channel closed, exiting UI task");
                return;
            }
        };

        match event {
            RingEvent::DoubleTap => {
                log::info!("Double tap");
                animator.flash_burst();
                let _ = motor_tx.send(MotorCommand::Pulse(VibrationMode::Tap));
            }

            RingEvent::Diagnostics(snapshot) => {
                log::debug!("Diagnostics received: {:?}", snapshot);
            }

            RingEvent::Button(button) => match selector.on_button(button) {
                Some(ModeChange::Led(mode)) => animator.set_mode(mode),
                Some(ModeChange::Motor(mode)) => {
                    let _ = motor_tx.send(MotorCommand::SetMode(mode));
                }
                None => {}
            },
        }
    }
}
