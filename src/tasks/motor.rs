// RingTap: Motor Task
//
// Repeats the selected vibration waveform and plays one-shot pulses on
// request. Commands are checked between waveform steps.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use ringtap::events::MotorCommand;
use ringtap::haptic::VibrationMode;

use crate::drivers::haptic::MotorDriver;

pub fn motor_task(mut motor: MotorDriver, motor_rx: Receiver<MotorCommand>) {
    log::info!("Motor task started");

    let mut mode = VibrationMode::Off;
    motor.stop();

    loop {
        let command = if mode == VibrationMode::Off {
            // Nothing to play: block until told otherwise.
            match motor_rx.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            }
        } else {
            match play_until_command(&mut motor, mode, &motor_rx) {
                Ok(command) => command,
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => None,
            }
        };

        match command {
            Some(MotorCommand::SetMode(next)) => {
                log::info!("Vibration mode {:?}", next);
                mode = next;
                motor.stop();
            }
            Some(MotorCommand::Pulse(pulse)) => {
                motor.stop();
                motor.play_once(pulse);
            }
            None => {}
        }
    }

    motor.stop();
    log::warn!("Motor channel closed, exiting motor task");
}

/// Play one period of `mode`, returning early with the first command that
/// arrives. `Ok(None)` means the period completed.
fn play_until_command(
    motor: &mut MotorDriver,
    mode: VibrationMode,
    motor_rx: &Receiver<MotorCommand>,
) -> Result<Option<MotorCommand>, RecvTimeoutError> {
    for step in mode.waveform() {
        motor.set_duty(step.duty_percent);
        match motor_rx.recv_timeout(Duration::from_millis(step.hold_ms)) {
            Ok(command) => return Ok(Some(command)),
            Err(RecvTimeoutError::Timeout) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}
