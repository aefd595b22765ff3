// RingTap: Button Task
//
// Polls the four active-LOW buttons at 100 Hz and sends debounced edges
// to the UI task.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver};

use ringtap::config::*;
use ringtap::events::RingEvent;
use ringtap::input::InputManager;

pub fn button_task(
    buttons: [PinDriver<'static, AnyIOPin, Input>; BUTTON_COUNT],
    ring_tx: Sender<RingEvent>,
) {
    log::info!("Button task started");

    let mut input = InputManager::new();
    let poll_interval = Duration::from_millis(BUTTON_POLL_INTERVAL_MS);

    loop {
        let levels = std::array::from_fn(|i| buttons[i].is_low());
        for event in input.update(crate::now_ms(), levels) {
            log::debug!("SW{} {}", event.index, if event.pressed { "pressed" } else { "released" });
            if ring_tx.send(RingEvent::Button(event)).is_err() {
                log::warn!("Ring channel closed, exiting button task");
                return;
            }
        }

        thread::sleep(poll_interval);
    }
}
