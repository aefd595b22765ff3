// RingTap: Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging and take the peripherals.
//   2. Bring up the I2C bus and check that the MPU6050 answers.
//   3. Configure the four mode buttons (pull-up, active LOW).
//   4. Configure the LEDC PWM channels for the bicolor LED and the motor.
//   5. Spawn sensor, button, UI and motor tasks.
//
// On a non-ESP host the binary replays a synthetic double-tap trace
// through the detection engine instead.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod tasks;

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{AnyIOPin, IOPin, Input, PinDriver, Pull};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::ledc::config::TimerConfig;
    use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver};
    use esp_idf_hal::prelude::*;

    use ringtap::config::*;

    use crate::drivers::haptic::MotorDriver;
    use crate::drivers::imu::Mpu6050;
    use crate::drivers::led::BicolorLed;
    use crate::tasks;

    // -----------------------------------------------------------------------
    // Utility: milliseconds since boot
    // -----------------------------------------------------------------------
    pub fn now_ms() -> u64 {
        // SAFETY: esp_timer is started by the IDF before `main` runs.
        unsafe { (esp_idf_svc::sys::esp_timer_get_time() / 1000) as u64 }
    }

    pub fn run() -> anyhow::Result<()> {
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("RingTap firmware starting");

        let peripherals = Peripherals::take()?;

        // ---- I2C bus (MPU6050 only) ---------------------------------------
        let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio6, // SDA
            peripherals.pins.gpio7, // SCL
            &i2c_config,
        )?;
        let mut imu = Mpu6050::new(i2c);
        if !imu.is_connected() {
            // Keep going: the sampling loop retries and reinitialises.
            log::error!("MPU6050 not detected at 0x{:02X}", I2C_ADDR_MPU6050);
        }

        // ---- Buttons --------------------------------------------------------
        let buttons = [
            button(peripherals.pins.gpio2.downgrade())?,
            button(peripherals.pins.gpio3.downgrade())?,
            button(peripherals.pins.gpio4.downgrade())?,
            button(peripherals.pins.gpio5.downgrade())?,
        ];

        // ---- PWM outputs ----------------------------------------------------
        let timer_config = TimerConfig::default().frequency(5.kHz().into());
        // Shared by all three channels for the life of the firmware.
        let timer = &*Box::leak(Box::new(LedcTimerDriver::new(
            peripherals.ledc.timer0,
            &timer_config,
        )?));
        let led = BicolorLed::new(
            LedcDriver::new(peripherals.ledc.channel0, timer, peripherals.pins.gpio21)?,
            LedcDriver::new(peripherals.ledc.channel1, timer, peripherals.pins.gpio20)?,
        );
        let motor = MotorDriver::new(LedcDriver::new(
            peripherals.ledc.channel2,
            timer,
            peripherals.pins.gpio10,
        )?);

        // ---- Channels -------------------------------------------------------
        let (ring_tx, ring_rx) = mpsc::channel();
        let (motor_tx, motor_rx) = mpsc::channel();

        // ---- Spawn tasks (map to FreeRTOS tasks via std::thread) -----------
        let button_tx = ring_tx.clone();
        thread::Builder::new()
            .name("sensor".into())
            .stack_size(STACK_SENSOR)
            .spawn(move || {
                if let Err(e) = imu.init() {
                    log::error!("MPU6050 init failed: {}", e);
                }
                tasks::sensor::sensor_task(imu, ring_tx);
            })?;

        thread::Builder::new()
            .name("buttons".into())
            .stack_size(STACK_BUTTONS)
            .spawn(move || {
                tasks::buttons::button_task(buttons, button_tx);
            })?;

        thread::Builder::new()
            .name("ui".into())
            .stack_size(STACK_UI)
            .spawn(move || {
                tasks::ui::ui_task(led, ring_rx, motor_tx);
            })?;

        thread::Builder::new()
            .name("motor".into())
            .stack_size(STACK_MOTOR)
            .spawn(move || {
                tasks::motor::motor_task(motor, motor_rx);
            })?;

        log::info!("Boot complete, double-tap detection running");

        // All work happens in the spawned FreeRTOS tasks.
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }

    fn button(pin: AnyIOPin) -> anyhow::Result<PinDriver<'static, AnyIOPin, Input>> {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        Ok(driver)
    }
}

#[cfg(target_os = "espidf")]
pub use firmware::now_ms;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use ringtap::sim::double_tap_scenario;
    use ringtap::TapEngine;

    let mut engine: TapEngine = TapEngine::default();
    let mut detected = 0;

    for tick in double_tap_scenario() {
        let Some(sample) = tick.sample else {
            continue;
        };
        if engine.update(&sample, tick.now_ms).is_double_tap() {
            detected += 1;
            println!("{:>6} ms  double tap", tick.now_ms);
        }
    }

    let diagnostics = engine.diagnostics();
    println!(
        "gravity reference {:.3} g (calibrated: {}), double taps: {}",
        diagnostics.gravity_reference, diagnostics.calibrated, detected
    );

    anyhow::ensure!(detected == 1, "expected one double tap, saw {detected}");
    Ok(())
}
