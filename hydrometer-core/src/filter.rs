//! Low-Pass Filters for Raw Sensor Samples
//!
//! ## Overview
//!
//! Tilt readings from a floating hydrometer are noisy: bubbles, convection and
//! the odd knock against the fermenter wall all show up in the angle. The filters
//! here smooth the angle before it reaches the gravity formula.
//!
//! ## Retained State
//!
//! The device deep-sleeps between readings and only a few kilobytes of RTC memory
//! survive. [`FilterData`] is therefore a plain `#[repr(C)]` value with no
//! pointers, so it can be placed in retained memory and picked up again after
//! wake-up:
//!
//! ```text
//! FilterData (24 bytes):
//! ┌────────┬────────┬────────┬────────┬────────┬───────┐
//! │ buf[0] │ buf[1] │ buf[2] │ buf[3] │ buf[4] │ count │
//! └────────┴────────┴────────┴────────┴────────┴───────┘
//!   oldest                              newest
//! ```
//!
//! Samples are kept oldest first. Once the window is full, each new sample shifts
//! the others down and drops the oldest.
//!
//! ## Ownership
//!
//! A filter holds a `&mut FilterData` for as long as it lives, so two filters can
//! never average over the same window at the same time.
//!
//! ## Usage Example
//!
//! ```rust
//! use hydrometer_core::filter::{FilterData, TrimmedMovingAverageFilter};
//! use hydrometer_core::traits::Filter;
//!
//! let mut data = FilterData::new();
//! let mut filter = TrimmedMovingAverageFilter::new(&mut data);
//!
//! for angle in [35.0, 35.2, 80.0, 35.1, 34.9] {
//!     filter.filter(angle);
//! }
//! // 80.0 (spike) and 34.9 (lowest) are dropped
//! assert!((filter.filter(35.0) - 35.1).abs() < 0.01);
//! ```

use crate::{constants::buffers::FILTER_BUFFER_SIZE, traits::Filter};

/// Sliding window of recent samples, safe to keep in retained memory
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterData {
    buffer: [f32; FILTER_BUFFER_SIZE],
    // i32 keeps the layout 4-byte aligned for RTC memory
    count: i32,
}

impl Default for FilterData {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterData {
    /// Creates an empty window
    pub const fn new() -> Self {
        Self {
            buffer: [0.0; FILTER_BUFFER_SIZE],
            count: 0,
        }
    }

    /// Number of samples held
    ///
    /// Retained memory is not initialised after a cold boot, so a stored count
    /// outside `0..=FILTER_BUFFER_SIZE` is clamped instead of trusted.
    pub fn len(&self) -> usize {
        self.count.clamp(0, FILTER_BUFFER_SIZE as i32) as usize
    }

    /// Check if no samples are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the window is full
    pub fn is_full(&self) -> bool {
        self.len() == FILTER_BUFFER_SIZE
    }

    /// Samples held, oldest first
    pub fn values(&self) -> &[f32] {
        &self.buffer[..self.len()]
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn add_value(&mut self, value: f32) {
        let mut len = self.len();

        if len >= FILTER_BUFFER_SIZE {
            self.buffer.copy_within(1.., 0);
            len -= 1;
        }

        self.buffer[len] = value;
        self.count = (len + 1) as i32;
    }

    fn sum(&self) -> f32 {
        self.values().iter().sum()
    }

    fn mean(&self) -> f32 {
        // Only called right after add_value, so len >= 1
        self.sum() / self.len() as f32
    }
}

/// Arithmetic mean of the last [`FILTER_BUFFER_SIZE`] samples
///
/// With fewer samples the mean covers whatever is held.
#[derive(Debug)]
pub struct MovingAverageFilter<'a> {
    data: &'a mut FilterData,
}

impl<'a> MovingAverageFilter<'a> {
    /// Create a filter over `data`, continuing from whatever it holds
    pub fn new(data: &'a mut FilterData) -> Self {
        Self { data }
    }

    /// The window this filter averages over
    pub fn data(&self) -> &FilterData {
        &*self.data
    }
}

impl Filter for MovingAverageFilter<'_> {
    fn filter(&mut self, value: f32) -> f32 {
        self.data.add_value(value);
        self.data.mean()
    }
}

/// Mean of the window after discarding one minimum and one maximum sample
///
/// Until the window is full this is a plain moving average. Exactly one
/// instance of each extreme is skipped, even when several samples share the
/// value, so a full window always averages over three samples.
#[derive(Debug)]
pub struct TrimmedMovingAverageFilter<'a> {
    data: &'a mut FilterData,
}

impl<'a> TrimmedMovingAverageFilter<'a> {
    /// Create a filter over `data`, continuing from whatever it holds
    pub fn new(data: &'a mut FilterData) -> Self {
        Self { data }
    }

    /// The window this filter averages over
    pub fn data(&self) -> &FilterData {
        &*self.data
    }

    fn trimmed_mean(&self) -> f32 {
        let values = self.data.values();
        let min = values.iter().copied().fold(values[0], f32::min);
        let max = values.iter().copied().fold(values[0], f32::max);

        let mut min_excluded = false;
        let mut max_excluded = false;
        let mut sum = 0.0;

        for &v in values {
            if !min_excluded && v == min {
                min_excluded = true;
                continue;
            }
            if !max_excluded && v == max {
                max_excluded = true;
                continue;
            }
            sum += v;
        }

        sum / (values.len() - 2) as f32
    }
}

impl Filter for TrimmedMovingAverageFilter<'_> {
    fn filter(&mut self, value: f32) -> f32 {
        self.data.add_value(value);

        if !self.data.is_full() {
            return self.data.mean();
        }

        self.trimmed_mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_partial_window() {
        let mut data = FilterData::new();
        let mut filter = MovingAverageFilter::new(&mut data);

        assert_eq!(filter.filter(1.0), 1.0);
        assert_eq!(filter.filter(1.0), 1.0);
        assert_eq!(filter.filter(4.0), 2.0);
    }

    #[test]
    fn moving_average_slides_when_full() {
        let mut data = FilterData::new();
        let mut filter = MovingAverageFilter::new(&mut data);

        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            filter.filter(v);
        }
        // 1.0 drops out: (2+3+4+5+6)/5
        assert_eq!(filter.filter(6.0), 4.0);
        assert_eq!(data.values(), &[2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn trimmed_average_partial_window_is_plain_mean() {
        let mut data = FilterData::new();
        let mut filter = TrimmedMovingAverageFilter::new(&mut data);

        filter.filter(10.0);
        filter.filter(20.0);
        filter.filter(30.0);
        assert_eq!(filter.filter(40.0), 25.0);
    }

    #[test]
    fn trimmed_average_drops_extremes() {
        let mut data = FilterData::new();
        let mut filter = TrimmedMovingAverageFilter::new(&mut data);

        for v in [2.0, 100.0, 3.0, -50.0] {
            filter.filter(v);
        }
        // Window [2, 100, 3, -50, 4] -> (2 + 3 + 4) / 3
        assert_eq!(filter.filter(4.0), 3.0);
    }

    #[test]
    fn trimmed_average_identical_values() {
        let mut data = FilterData::new();
        let mut filter = TrimmedMovingAverageFilter::new(&mut data);

        let mut out = 0.0;
        for _ in 0..5 {
            out = filter.filter(7.5);
        }
        assert_eq!(out, 7.5);
    }

    #[test]
    fn trimmed_average_duplicate_extremes_skip_one_each() {
        let mut data = FilterData::new();
        let mut filter = TrimmedMovingAverageFilter::new(&mut data);

        for v in [1.0, 1.0, 5.0, 9.0] {
            filter.filter(v);
        }
        // Window [1, 1, 5, 9, 9] -> (1 + 5 + 9) / 3
        assert_eq!(filter.filter(9.0), 5.0);
    }

    #[test]
    fn state_survives_filter_recreation() {
        let mut data = FilterData::new();
        MovingAverageFilter::new(&mut data).filter(2.0);

        // Next wake-up: new filter over the retained window
        let mut filter = MovingAverageFilter::new(&mut data);
        assert_eq!(filter.filter(4.0), 3.0);
    }

    #[test]
    fn corrupt_count_is_clamped() {
        let mut data = FilterData { buffer: [1.0; FILTER_BUFFER_SIZE], count: 9999 };
        assert_eq!(data.len(), FILTER_BUFFER_SIZE);

        data.count = -3;
        assert!(data.is_empty());
        assert_eq!(MovingAverageFilter::new(&mut data).filter(8.0), 8.0);
    }

    #[test]
    fn layout_is_word_aligned() {
        assert_eq!(core::mem::size_of::<FilterData>(), 24);
        assert_eq!(core::mem::align_of::<FilterData>(), 4);
    }
}
