use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Copyable summary of a [`TimingInfo`], cheap to hand across threads.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TimingStats {
    pub average: Duration,
    pub last: Duration,
    pub samples: usize,
    pub skipped: u64,
}

impl TimingStats {
    /// Average in milliseconds, as shown on the debug overlay.
    pub fn average_ms(&self) -> f64 {
        self.average.as_secs_f64() * 1000.0
    }
}

/// Rolling duration tracker for one pipeline stage.
///
/// Keeps the last `window` samples. A skip only bumps a counter; it never
/// touches the samples, so the average reflects completed work only.
#[derive(Debug, Clone)]
pub struct TimingInfo {
    samples: VecDeque<Duration>,
    window: usize,
    started: Option<Instant>,
    last: Duration,
    skipped: u64,
}

impl TimingInfo {
    pub const DEFAULT_WINDOW: usize = 20;

    pub fn new() -> Self {
        Self::with_window(Self::DEFAULT_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            started: None,
            last: Duration::ZERO,
            skipped: 0,
        }
    }

    /// Starts a measurement. Calling it twice restarts from the second call.
    pub fn begin_timing(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Ends the measurement started by `begin_timing`. Ignored if none is running.
    pub fn stop_timing(&mut self) {
        if let Some(start) = self.started.take() {
            self.record(start.elapsed());
        }
    }

    /// Appends a sample directly.
    pub fn record(&mut self, sample: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.last = sample;
    }

    pub fn mark_skipped(&mut self) {
        self.skipped = self.skipped.saturating_add(1);
    }

    /// Mean of the retained samples; zero when there are none.
    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.samples.iter().sum::<Duration>() / self.samples.len() as u32
    }

    /// Operations per second implied by the average; zero without samples.
    pub fn rate(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    pub fn last_duration(&self) -> Duration {
        self.last
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_measuring(&self) -> bool {
        self.started.is_some()
    }

    /// Clears samples, skip count and any running measurement.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.started = None;
        self.last = Duration::ZERO;
        self.skipped = 0;
    }

    pub fn stats(&self) -> TimingStats {
        TimingStats {
            average: self.average(),
            last: self.last,
            samples: self.samples.len(),
            skipped: self.skipped,
        }
    }
}

impl Default for TimingInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_average_is_zero() {
        let t = TimingInfo::new();
        assert_eq!(t.average(), Duration::ZERO);
        assert_eq!(t.rate(), 0.0);
    }

    #[test]
    fn window_drops_oldest_sample() {
        let mut t = TimingInfo::with_window(2);
        t.record(Duration::from_millis(10));
        t.record(Duration::from_millis(20));
        t.record(Duration::from_millis(40));
        assert_eq!(t.sample_count(), 2);
        assert_eq!(t.average(), Duration::from_millis(30));
        assert_eq!(t.last_duration(), Duration::from_millis(40));
    }

    #[test]
    fn skip_does_not_touch_average() {
        let mut t = TimingInfo::new();
        t.record(Duration::from_millis(8));
        t.mark_skipped();
        t.mark_skipped();
        assert_eq!(t.average(), Duration::from_millis(8));
        assert_eq!(t.skipped(), 2);
        assert_eq!(t.sample_count(), 1);
    }

    #[test]
    fn stop_without_begin_is_ignored() {
        let mut t = TimingInfo::new();
        t.stop_timing();
        assert_eq!(t.sample_count(), 0);

        t.begin_timing();
        assert!(t.is_measuring());
        t.stop_timing();
        assert_eq!(t.sample_count(), 1);
        assert!(!t.is_measuring());
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = TimingInfo::new();
        t.record(Duration::from_millis(3));
        t.mark_skipped();
        t.begin_timing();
        t.reset();
        assert_eq!(t.stats(), TimingStats::default());
        assert!(!t.is_measuring());
    }
}
