pub mod haptic;
pub mod imu;
pub mod led;
