// RingTap: MPU6050 Accelerometer Driver
//
// Register-level driver over I2C. Only the accelerometer is used; the
// gyro is configured but never read.

use std::thread;
use std::time::Duration;

use esp_idf_hal::i2c::I2cDriver;

use ringtap::config::*;
use ringtap::events::AccelSample;

// MPU6050 register addresses
const REG_SMPLRT_DIV: u8 = 0x19;
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 6-byte accel burst
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

const PWR_DEVICE_RESET: u8 = 0x80;
const PWR_CLKSEL_PLL_X: u8 = 0x01;

pub struct Mpu6050 {
    bus: I2cDriver<'static>,
}

impl Mpu6050 {
    pub fn new(bus: I2cDriver<'static>) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&mut self) -> bool {
        let mut buf = [0u8; 1];
        match self
            .bus
            .write_read(I2C_ADDR_MPU6050, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS)
        {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Reset, select the gyro PLL clock and configure ±2 g / ±250 °/s.
    /// Also used to recover the sensor after repeated read failures.
    pub fn init(&mut self) -> anyhow::Result<()> {
        self.write_reg(REG_PWR_MGMT_1, PWR_DEVICE_RESET)?;
        thread::sleep(Duration::from_millis(100));

        self.write_reg(REG_PWR_MGMT_1, PWR_CLKSEL_PLL_X)?;
        thread::sleep(Duration::from_millis(10));

        // 1 kHz / (1 + 7) = 125 Hz internal sample rate
        self.write_reg(REG_SMPLRT_DIV, 0x07)?;
        self.write_reg(REG_GYRO_CONFIG, 0x00)?;
        self.write_reg(REG_ACCEL_CONFIG, 0x00)?;

        log::info!("MPU6050 initialised (±2g, ±250°/s, 125Hz)");
        Ok(())
    }

    /// Burst-read the three accelerometer axes as raw counts.
    pub fn read_accel(&mut self) -> anyhow::Result<AccelSample> {
        let mut raw = [0u8; 6];
        self.bus.write_read(
            I2C_ADDR_MPU6050,
            &[REG_ACCEL_XOUT_H],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        Ok(AccelSample::new(
            i16::from_be_bytes([raw[0], raw[1]]),
            i16::from_be_bytes([raw[2], raw[3]]),
            i16::from_be_bytes([raw[4], raw[5]]),
        ))
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> anyhow::Result<()> {
        self.bus
            .write(I2C_ADDR_MPU6050, &[reg, value], I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}
