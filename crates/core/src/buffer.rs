use std::collections::VecDeque;

use crate::state::Sample;

/// Number of samples kept for the chart: five minutes at the default
/// five-second polling interval.
pub const DEFAULT_CAPACITY: usize = 60;

/// Rolling history of bandwidth samples, oldest first.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples:  VecDeque<Sample>,
    capacity: usize,
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A buffer holding at most `capacity` samples (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest ones beyond capacity.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Largest rx or tx value currently stored, `0.0` when empty.
    #[must_use]
    pub fn current_max(&self) -> f64 {
        self.samples
            .iter()
            .map(Sample::peak)
            .fold(0.0, f64::max)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Chronological copy of the stored samples.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
