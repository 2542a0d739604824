//! Gravity Velocity Example
//!
//! Tracks how fast a fermentation progresses over two simulated days.
//!
//! ## What You'll Learn
//!
//! - Sizing velocity periods from the sleep interval
//! - Keeping velocity state in retained memory
//! - When the velocity becomes meaningful
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 03_gravity_velocity
//! ```

use hydrometer_core::{
    units::reduce_float_precision,
    velocity::{GravityVelocity, GravityVelocityData},
};

const SLEEP_INTERVAL_S: u32 = 30 * 60;

/// Gravity of a typical ale, fast start then slowing down
fn gravity_at(hour: f32) -> f32 {
    let og = 1.052;
    let fg = 1.012;
    fg + (og - fg) * libm::expf(-hour / 18.0)
}

fn main() {
    println!("Hydrometer Gravity Velocity Example");
    println!("===================================\n");

    // Lives in RTC memory on the device
    let mut data = GravityVelocityData::new();

    let readings_per_hour = 3600 / SLEEP_INTERVAL_S;
    let samples_per_period = GravityVelocity::new(&mut data, SLEEP_INTERVAL_S).samples_per_period();
    println!("Sleep interval {} s, {} readings per period\n", SLEEP_INTERVAL_S, samples_per_period);

    for reading in 0..48 * readings_per_hour {
        let hour = reading as f32 / readings_per_hour as f32;
        let gravity = gravity_at(hour);

        // A new tracker each wake-up, the state carries over
        let mut velocity = GravityVelocity::new(&mut data, SLEEP_INTERVAL_S);
        velocity.add_value(gravity);

        if reading % (4 * readings_per_hour) == 0 {
            if velocity.is_valid() {
                println!(
                    "{:4.1} h: {:.4} SG, {:6.1} points/day",
                    hour,
                    gravity,
                    reduce_float_precision(velocity.velocity(), 1)
                );
            } else {
                println!("{:4.1} h: {:.4} SG, not enough data", hour, gravity);
            }
        }
    }
}
