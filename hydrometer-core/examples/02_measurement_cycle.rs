//! Measurement Cycle Example
//!
//! Simulates a device waking up, averaging a burst of gyro readings and
//! turning the result into a gravity measurement.
//!
//! ## What You'll Learn
//!
//! - Implementing `TiltSensor` on top of raw register reads
//! - Keeping filter state across cycles
//! - How the configuration picks the reported gravity
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_measurement_cycle
//! ```

use hydrometer_core::{
    config::GravityConfig,
    constants::sensors::{GYRO_MOVING_THRESHOLD, GYRO_READ_COUNT},
    filter::FilterData,
    sensor::RawGyroData,
    units::GravityUnit,
    MeasurementCycle, RawSample, TiltSensor,
};

/// Fake MPU6050 returning a slowly changing orientation
struct SimulatedGyro {
    ay: i16,
    az: i16,
    wobble: i16,
}

impl SimulatedGyro {
    fn read_raw(&mut self) -> RawGyroData {
        RawGyroData {
            ax: 0,
            ay: self.ay,
            az: self.az,
            gx: self.wobble,
            gy: 0,
            gz: 0,
            temp: -5280, // ~21 °C
        }
    }
}

impl TiltSensor for SimulatedGyro {
    fn read(&mut self) -> Option<RawSample> {
        let burst: Vec<RawGyroData> = (0..GYRO_READ_COUNT).map(|_| self.read_raw()).collect();
        let raw = RawGyroData::average(&burst)?;

        if raw.is_moving(GYRO_MOVING_THRESHOLD) {
            println!("  sensor moving (gx={}), skipping", raw.gx);
            return None;
        }
        raw.to_sample()
    }
}

fn main() {
    println!("Hydrometer Measurement Cycle Example");
    println!("====================================\n");

    let mut config = GravityConfig::default();
    if let Err(e) = config.set_gravity_formula("0.00000909*tilt^2+0.00124545*tilt+0.96445455") {
        println!("Invalid formula: {}", e);
        return;
    }
    config.gyro_filter = true;
    config.gravity_temp_adjustment = true;
    config.gravity_unit = GravityUnit::Plato;

    println!("Formula: {}", config.gravity_formula);
    println!("Filter: {}, temperature adjustment: {}\n", config.gyro_filter, config.gravity_temp_adjustment);

    // Survives deep sleep on the device
    let mut filter_data = FilterData::new();
    let mut gyro = SimulatedGyro { ay: 9000, az: 9000, wobble: 0 };

    for cycle in 0..8 {
        // The float gets knocked on cycle 3
        gyro.wobble = if cycle == 3 { 1500 } else { 20 };
        gyro.az = 9000 - 150 * cycle;

        println!("Cycle {}:", cycle);
        match MeasurementCycle::run(&mut gyro, &config, &mut filter_data) {
            Some(m) => {
                println!("  angle {:.2}° (filtered {:.2}°), {:.1} °C", m.angle, m.filtered_angle, m.temperature());
                println!(
                    "  raw {:.4} SG, filtered {:.4} SG, corrected {:.4} SG",
                    m.raw_gravity_sg, m.filtered_gravity_sg, m.corrected_gravity_sg
                );
                println!("  reported {:.2} °P", m.gravity());
            }
            None => println!("  no measurement"),
        }
    }
}
