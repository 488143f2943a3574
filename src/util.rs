use std::time::{Duration, Instant};

/// Tracks frames per second over a fixed reporting interval.
pub struct FpsCounter {
    frame_count: u32,
    last_time: Instant,
    interval: Duration,
}

impl FpsCounter {
    /// Creates a counter reporting once per second.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frame_count: 0,
            last_time: Instant::now(),
            interval,
        }
    }

    /// Records a frame. Returns `Some(fps)` once per reporting interval.
    pub fn tick(&mut self) -> Option<f32> {
        self.frame_count += 1;
        let elapsed = self.last_time.elapsed();

        if elapsed >= self.interval {
            let fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_time = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_report_before_interval_elapses() {
        let mut counter = FpsCounter::with_interval(Duration::from_secs(60));
        assert!(counter.tick().is_none());
        assert!(counter.tick().is_none());
    }

    #[test]
    fn reports_after_interval() {
        let mut counter = FpsCounter::with_interval(Duration::ZERO);
        let fps = counter.tick();
        assert!(fps.is_some());
    }
}
