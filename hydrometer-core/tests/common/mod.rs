//! Shared fixtures for integration tests
//!
//! - Calibration series recorded with real hydrometers
//! - Deterministic noisy angle series with occasional spikes
//! - A scripted tilt sensor

#![allow(dead_code)]

use hydrometer_core::{RawFormulaData, RawSample, TiltSensor};

/// Formula created by earlier firmware from [`legacy_calibration`]
pub const LEGACY_FORMULA: &str = "0.00000909*tilt^2+0.00124545*tilt+0.96445455";

/// Ten-point calibration series, 25° to 70° in 5° steps
pub fn legacy_calibration() -> RawFormulaData {
    let mut data = RawFormulaData::new();
    data.tilt = [25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0];
    data.gravity = [1.0, 1.01, 1.02, 1.03, 1.04, 1.05, 1.06, 1.07, 1.08, 1.1];
    data
}

/// Calibration series whose first slot is empty, so no point is valid
pub fn leading_gap_calibration() -> RawFormulaData {
    RawFormulaData {
        tilt: [0.0, 25.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        gravity: [0.0, 1.0, 1.02, 1.033, 1.00011, 1.0, 1.0, 1.0, 1.0, 1.0],
    }
}

/// Points lying exactly on `c0 + c1·x + c2·x²` at the given tilts
pub fn quadratic_calibration(c: [f64; 3], tilts: &[f64]) -> RawFormulaData {
    let mut data = RawFormulaData::new();
    for (i, &x) in tilts.iter().enumerate() {
        data.tilt[i] = x;
        data.gravity[i] = c[0] + c[1] * x + c[2] * x * x;
    }
    data
}

/// Angle series around `base` with ±0.2° noise and a spike every 7th sample
pub fn noisy_angles(base: f32, count: usize, seed: u32) -> Vec<f32> {
    let mut state = seed.max(1);
    (0..count)
        .map(|i| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = (state % 401) as f32 / 1000.0 - 0.2;

            if i % 7 == 6 {
                base + 25.0
            } else {
                base + noise
            }
        })
        .collect()
}

/// Tilt sensor replaying a fixed script, then reporting no reading
pub struct ScriptedSensor {
    samples: Vec<Option<RawSample>>,
    next: usize,
}

impl ScriptedSensor {
    pub fn new(samples: Vec<Option<RawSample>>) -> Self {
        Self { samples, next: 0 }
    }

    /// Still sensor at `temp_c` reading each angle in turn
    pub fn from_angles(angles: &[f32], temp_c: f32) -> Self {
        Self::new(
            angles
                .iter()
                .map(|&angle| Some(RawSample { angle, temp_c }))
                .collect(),
        )
    }
}

impl TiltSensor for ScriptedSensor {
    fn read(&mut self) -> Option<RawSample> {
        let sample = self.samples.get(self.next).copied().flatten();
        self.next += 1;
        sample
    }
}
