//! Session stopwatch.
//!
//! The stopwatch does not read a clock itself; the owner drives it with
//! [`Stopwatch::tick`] so elapsed time only accumulates while running and
//! tests stay deterministic.

use std::time::Duration;

/// Accumulates elapsed time while running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwatch {
    running: bool,
    elapsed: Duration,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stops the stopwatch and clears the elapsed total.
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    /// Adds `delta` to the elapsed total if running.
    pub fn tick(&mut self, delta: Duration) {
        if self.running {
            self.elapsed = self.elapsed.saturating_add(delta);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time as `hh:mm:ss`; hours keep counting past 99.
    pub fn display(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_only_counts_while_running() {
        let mut sw = Stopwatch::new();
        sw.tick(Duration::from_secs(5));
        assert_eq!(sw.elapsed(), Duration::ZERO);

        sw.start();
        sw.tick(Duration::from_secs(5));
        sw.pause();
        sw.tick(Duration::from_secs(5));
        assert_eq!(sw.elapsed(), Duration::from_secs(5));
    }

    #[test]
    fn test_reset_clears_and_stops() {
        let mut sw = Stopwatch::new();
        sw.start();
        sw.tick(Duration::from_secs(42));
        sw.reset();
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_display_formats_hours_minutes_seconds() {
        let mut sw = Stopwatch::new();
        sw.start();
        sw.tick(Duration::from_secs(3 * 3600 + 7 * 60 + 9));
        assert_eq!(sw.display(), "03:07:09");
    }
}
