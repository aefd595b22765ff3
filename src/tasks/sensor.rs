// RingTap: Sensor Task
//
// Reads the accelerometer every 20 ms, runs the tap engine and forwards
// double-taps and periodic diagnostics to the UI task.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use ringtap::config::*;
use ringtap::events::RingEvent;
use ringtap::transport::{AcquisitionAction, AcquisitionPolicy};
use ringtap::TapEngine;

use crate::drivers::imu::Mpu6050;

pub fn sensor_task(mut imu: Mpu6050, ring_tx: Sender<RingEvent>) {
    log::info!("Sensor task started");

    let mut engine: TapEngine = TapEngine::default();
    let mut policy = AcquisitionPolicy::default();
    let mut ticks: u32 = 0;

    let interval = Duration::from_millis(SAMPLING_INTERVAL_MS);

    loop {
        let tick_start = Instant::now();

        match imu.read_accel() {
            Ok(sample) => {
                policy.record_success();

                if engine.update(&sample, crate::now_ms()).is_double_tap()
                    && ring_tx.send(RingEvent::DoubleTap).is_err()
                {
                    log::warn!("Ring channel closed, exiting sensor task");
                    return;
                }

                ticks = ticks.wrapping_add(1);
                if ticks % DIAGNOSTIC_EVERY_TICKS == 0 {
                    let snapshot = engine.diagnostics();
                    log::info!(
                        "Gravity ref {:.3} g (calibrated: {}), magnitude {:.3} g",
                        snapshot.gravity_reference,
                        snapshot.calibrated,
                        snapshot.current_magnitude
                    );
                    // Diagnostics are best effort; a closed channel is
                    // caught on the next double-tap.
                    let _ = ring_tx.send(RingEvent::Diagnostics(snapshot));
                }
            }
            Err(e) => {
                log::warn!("IMU read error: {}", e);
                if policy.record_failure() == AcquisitionAction::Reinitialize {
                    log::error!(
                        "{} consecutive read failures, reinitialising MPU6050",
                        MAX_CONSECUTIVE_READ_FAILURES + 1
                    );
                    if let Err(e) = imu.init() {
                        log::error!("MPU6050 reinit failed: {}", e);
                    }
                }
            }
        }

        // Sleep for the remainder of the sampling interval to hold 50 Hz.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
