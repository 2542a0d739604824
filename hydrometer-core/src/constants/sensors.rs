//! Tilt Sensor Characteristics
//!
//! Values for MPU6050-class accelerometer/gyro chips used as tilt sensors.

/// Raw gyro rate above which the float is considered moving.
///
/// Readings taken while the float bobs are discarded.
///
/// Source: firmware default for `gyro_moving_threashold`
pub const GYRO_MOVING_THRESHOLD: i16 = 500;

/// LSB per °C of the MPU6050 die temperature register.
///
/// Source: MPU-6000/MPU-6050 Register Map rev 4.2, section 4.18
pub const GYRO_TEMP_LSB_PER_C: f32 = 340.0;

/// Die temperature offset of the MPU6050 (°C).
///
/// Source: MPU-6000/MPU-6050 Register Map rev 4.2, section 4.18
pub const GYRO_TEMP_OFFSET_C: f32 = 36.53;

/// Default number of gyro samples averaged per reading.
pub const GYRO_READ_COUNT: u16 = 50;
