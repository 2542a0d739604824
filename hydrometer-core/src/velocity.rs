//! Gravity Velocity Tracking
//!
//! ## Overview
//!
//! Fermentation speed is reported as the change in gravity points per day.
//! Gravity readings are grouped into four consecutive periods of four hours
//! each (16 hours in total). The velocity compares the average of the oldest
//! period with the average of the newest one.
//!
//! ```text
//! period:   [0] oldest   [1]        [2]        [3] newest
//!           ┌──────────┬──────────┬──────────┬──────────┐
//!           │ 4h avg   │ 4h avg   │ 4h avg   │ 4h avg   │
//!           └──────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! Once all periods are full the oldest is dropped and a fresh one opened.
//!
//! ## Retained State
//!
//! Like [`FilterData`], [`GravityVelocityData`] is plain `#[repr(C)]` data that
//! survives deep sleep in retained memory. [`GravityVelocity`] borrows it for
//! the duration of one measurement cycle.

use crate::{
    constants::{
        buffers::VELOCITY_PERIODS,
        time::{
            GRAVITY_POINTS_PER_SG, HOURS_PER_DAY, SECONDS_PER_HOUR, VELOCITY_MIN_HOURS,
            VELOCITY_PERIOD_HOURS,
        },
    },
    filter::{FilterData, MovingAverageFilter},
    traits::Filter,
};

/// Accumulated readings of one period
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityPeriod {
    /// Sum of smoothed gravity values
    pub total: f32,
    /// Lowest raw gravity value
    pub min: f32,
    /// Highest raw gravity value
    pub max: f32,
    /// Number of values in the period
    pub count: i16,
    _padding: i16,
}

impl VelocityPeriod {
    const EMPTY: Self = Self {
        total: 0.0,
        min: 0.0,
        max: 0.0,
        count: 0,
        _padding: 0,
    };

    /// Number of values, clamped to zero for corrupt retained state
    pub fn len(&self) -> usize {
        self.count.max(0) as usize
    }

    /// Check if the period holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Average of the smoothed values, `None` when empty
    pub fn average(&self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.total / self.len() as f32)
        }
    }
}

/// Velocity state kept across deep sleep
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GravityVelocityData {
    /// Smoothing window for incoming gravity values
    pub filter: FilterData,
    /// Periods, oldest first
    pub periods: [VelocityPeriod; VELOCITY_PERIODS],
}

impl Default for GravityVelocityData {
    fn default() -> Self {
        Self::new()
    }
}

impl GravityVelocityData {
    /// Empty state
    pub const fn new() -> Self {
        Self {
            filter: FilterData::new(),
            periods: [VelocityPeriod::EMPTY; VELOCITY_PERIODS],
        }
    }
}

/// Gravity velocity over the last 16 hours
///
/// ```rust
/// use hydrometer_core::velocity::{GravityVelocity, GravityVelocityData};
///
/// let mut data = GravityVelocityData::new();
/// // One reading per hour
/// let mut velocity = GravityVelocity::new(&mut data, 3600);
///
/// for hour in 0..16 {
///     velocity.add_value(1.050 - 0.0005 * hour as f32);
/// }
/// assert!(velocity.is_valid());
/// assert!(velocity.velocity() < 0.0);
/// ```
#[derive(Debug)]
pub struct GravityVelocity<'a> {
    data: &'a mut GravityVelocityData,
    samples_per_period: usize,
}

impl<'a> GravityVelocity<'a> {
    /// Track velocity in `data` for readings taken every `sleep_interval_s` seconds
    pub fn new(data: &'a mut GravityVelocityData, sleep_interval_s: u32) -> Self {
        let period_s = VELOCITY_PERIOD_HOURS * SECONDS_PER_HOUR;
        let samples_per_period = if sleep_interval_s >= period_s {
            1
        } else {
            // A zero interval is treated as one second
            (period_s / sleep_interval_s.max(1)) as usize
        };

        Self { data, samples_per_period }
    }

    /// Readings that make up one period
    pub fn samples_per_period(&self) -> usize {
        self.samples_per_period
    }

    /// The retained state
    pub fn data(&self) -> &GravityVelocityData {
        &*self.data
    }

    /// Add a gravity reading (SG), returning the smoothed value
    pub fn add_value(&mut self, value: f32) -> f32 {
        if self.sample_count() >= self.samples_per_period * VELOCITY_PERIODS {
            self.data.periods.copy_within(1.., 0);
            self.data.periods[VELOCITY_PERIODS - 1] = VelocityPeriod::EMPTY;
        }

        let smoothed = MovingAverageFilter::new(&mut self.data.filter).filter(value);
        let per_period = self.samples_per_period;

        if let Some(period) = self.data.periods.iter_mut().find(|p| p.len() < per_period) {
            period.total += smoothed;
            period.count = period.count.max(0) + 1;

            if period.count == 1 || value < period.min {
                period.min = value;
            }
            if period.count == 1 || value > period.max {
                period.max = value;
            }
        }

        smoothed
    }

    /// Change in gravity points per day, 0.0 until an hour is covered
    pub fn velocity(&self) -> f32 {
        let Some(hours) = self.covered_hours() else {
            return 0.0;
        };

        let first = self.first_average().unwrap_or(0.0);
        let last = self.last_average().unwrap_or(0.0);

        ((last - first) / hours as f32) * HOURS_PER_DAY * GRAVITY_POINTS_PER_SG
    }

    /// Whether enough readings are held for a meaningful velocity
    pub fn is_valid(&self) -> bool {
        self.covered_hours().is_some()
    }

    fn sample_count(&self) -> usize {
        self.data.periods.iter().map(VelocityPeriod::len).sum()
    }

    /// Whole hours covered, `None` while at or below the minimum
    fn covered_hours(&self) -> Option<usize> {
        let hours = self.sample_count() * VELOCITY_PERIOD_HOURS as usize / self.samples_per_period;
        (hours > VELOCITY_MIN_HOURS as usize).then_some(hours)
    }

    fn first_average(&self) -> Option<f32> {
        self.data.periods.iter().find_map(VelocityPeriod::average)
    }

    fn last_average(&self) -> Option<f32> {
        self.data
            .periods
            .iter()
            .take_while(|p| !p.is_empty())
            .last()
            .and_then(VelocityPeriod::average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_per_period_from_interval() {
        let mut data = GravityVelocityData::new();
        assert_eq!(GravityVelocity::new(&mut data, 900).samples_per_period(), 16);
        assert_eq!(GravityVelocity::new(&mut data, 3600).samples_per_period(), 4);
        assert_eq!(GravityVelocity::new(&mut data, 4 * 3600).samples_per_period(), 1);
        assert_eq!(GravityVelocity::new(&mut data, 24 * 3600).samples_per_period(), 1);
        assert_eq!(GravityVelocity::new(&mut data, 0).samples_per_period(), 14400);
    }

    #[test]
    fn no_velocity_without_data() {
        let mut data = GravityVelocityData::new();
        let velocity = GravityVelocity::new(&mut data, 900);
        assert_eq!(velocity.velocity(), 0.0);
        assert!(!velocity.is_valid());
    }

    #[test]
    fn needs_more_than_one_hour() {
        let mut data = GravityVelocityData::new();
        let mut velocity = GravityVelocity::new(&mut data, 900);

        // 7 readings at 15 min cover 1h (integer hours)
        for _ in 0..7 {
            velocity.add_value(1.05);
        }
        assert!(!velocity.is_valid());

        velocity.add_value(1.05);
        assert!(velocity.is_valid());
    }

    #[test]
    fn fills_periods_in_order_and_tracks_extremes() {
        let mut data = GravityVelocityData::new();
        let mut velocity = GravityVelocity::new(&mut data, 4 * 3600);

        velocity.add_value(1.040);
        velocity.add_value(1.030);

        let periods = &velocity.data().periods;
        assert_eq!(periods[0].count, 1);
        assert_eq!(periods[1].count, 1);
        assert_eq!(periods[1].min, 1.030);
        assert_eq!(periods[1].max, 1.030);
        assert!(periods[2].is_empty());
    }

    #[test]
    fn steady_drop_gives_negative_velocity() {
        let mut data = GravityVelocityData::new();
        // One reading per period
        let mut velocity = GravityVelocity::new(&mut data, 4 * 3600);

        for v in [1.050, 1.050, 1.050, 1.050] {
            velocity.add_value(v);
        }
        assert_eq!(velocity.velocity(), 0.0);

        // Full: oldest period is dropped
        velocity.add_value(1.030);
        let periods = velocity.data().periods;
        assert_eq!(periods[3].count, 1);
        assert!(velocity.velocity() < 0.0);
    }

    #[test]
    fn velocity_formula() {
        let mut data = GravityVelocityData::new();
        data.periods[0] = VelocityPeriod { total: 1.05, count: 1, ..VelocityPeriod::EMPTY };
        data.periods[1] = VelocityPeriod { total: 1.04, count: 1, ..VelocityPeriod::EMPTY };

        // 2 samples * 4h / 1 sample per period = 8h
        let velocity = GravityVelocity::new(&mut data, 4 * 3600);
        let expected = ((1.04_f32 - 1.05) / 8.0) * 24.0 * 1000.0;
        assert!((velocity.velocity() - expected).abs() < 1e-3);
        assert!((velocity.velocity() + 30.0).abs() < 0.01);
    }

    #[test]
    fn layout_is_word_aligned() {
        assert_eq!(core::mem::size_of::<VelocityPeriod>(), 16);
        assert_eq!(core::mem::size_of::<GravityVelocityData>(), 24 + 4 * 16);
    }
}
