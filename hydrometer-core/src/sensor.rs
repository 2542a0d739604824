//! Tilt from raw accelerometer and gyro readings
//!
//! The float tilts more the less dense the liquid is. The angle is taken
//! between the device's y axis (its long axis) and the gravity vector, from a
//! still accelerometer reading. The gyro only tells whether the float is
//! still bobbing; readings taken while it moves are thrown away.
//!
//! Chip drivers deliver a [`RawGyroData`] and implement
//! [`TiltSensor`](crate::traits::TiltSensor) on top of
//! [`RawGyroData::to_sample`].

use crate::{
    constants::{
        physics::DEGREES_PER_RADIAN,
        sensors::{GYRO_MOVING_THRESHOLD, GYRO_TEMP_LSB_PER_C, GYRO_TEMP_OFFSET_C},
    },
    traits::RawSample,
};

/// Raw MPU6050-style register values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawGyroData {
    /// Acceleration x
    pub ax: i16,
    /// Acceleration y
    pub ay: i16,
    /// Acceleration z
    pub az: i16,
    /// Rotation rate x
    pub gx: i16,
    /// Rotation rate y
    pub gy: i16,
    /// Rotation rate z
    pub gz: i16,
    /// Die temperature register
    pub temp: i16,
}

impl RawGyroData {
    /// Average of several consecutive readings, `None` for an empty slice
    pub fn average(readings: &[RawGyroData]) -> Option<Self> {
        if readings.is_empty() {
            return None;
        }

        let mut sum = [0_i32; 7];
        for r in readings {
            for (acc, v) in sum
                .iter_mut()
                .zip([r.ax, r.ay, r.az, r.gx, r.gy, r.gz, r.temp])
            {
                *acc += i32::from(v);
            }
        }

        let n = readings.len() as i32;
        // Mean of i16 values always fits in i16
        let avg = |i: usize| (sum[i] / n) as i16;

        Some(Self {
            ax: avg(0),
            ay: avg(1),
            az: avg(2),
            gx: avg(3),
            gy: avg(4),
            gz: avg(5),
            temp: avg(6),
        })
    }

    /// Whether any gyro axis exceeds `threshold`
    pub fn is_moving(&self, threshold: i16) -> bool {
        is_sensor_moving(self.gx, self.gy, self.gz, threshold)
    }

    /// Die temperature (°C)
    pub fn temperature_c(&self) -> f32 {
        gyro_temperature_c(self.temp)
    }

    /// Tilt angle (degrees) from the acceleration registers
    pub fn angle(&self) -> f32 {
        tilt_from_acceleration(f32::from(self.ax), f32::from(self.ay), f32::from(self.az))
    }

    /// Convert to a sample, `None` while the float is moving
    pub fn to_sample(&self) -> Option<RawSample> {
        if self.is_moving(GYRO_MOVING_THRESHOLD) {
            log_debug!("Sensor is moving ({}, {}, {})", self.gx, self.gy, self.gz);
            return None;
        }

        Some(RawSample {
            angle: self.angle(),
            temp_c: self.temperature_c(),
        })
    }
}

/// Angle in degrees between the y axis and the measured gravity vector
///
/// Any unit works since only the direction matters. A zero vector (sensor not
/// responding) gives 0.0.
///
/// Source: NXP AN3461, tilt sensing using a three-axis accelerometer
pub fn tilt_from_acceleration(ax: f32, ay: f32, az: f32) -> f32 {
    let magnitude = libm::sqrtf(ax * ax + ay * ay + az * az);
    if magnitude == 0.0 || !magnitude.is_finite() {
        return 0.0;
    }

    // Rounding can push the ratio a hair past ±1
    let cos = (ay / magnitude).clamp(-1.0, 1.0);
    (libm::acos(f64::from(cos)) * DEGREES_PER_RADIAN) as f32
}

/// Whether any gyro rate exceeds `threshold` in magnitude
pub fn is_sensor_moving(gx: i16, gy: i16, gz: i16, threshold: i16) -> bool {
    let limit = threshold.unsigned_abs();
    gx.unsigned_abs() > limit || gy.unsigned_abs() > limit || gz.unsigned_abs() > limit
}

/// MPU6050 die temperature register to °C
pub fn gyro_temperature_c(raw: i16) -> f32 {
    f32::from(raw) / GYRO_TEMP_LSB_PER_C + GYRO_TEMP_OFFSET_C
}
