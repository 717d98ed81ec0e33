use std::time::{Duration, Instant};

/// How often the frame rate is reported.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counts presented frames and yields the count once per [`REPORT_INTERVAL`].
pub struct FrameCounter {
    last_report: Instant,
    frames: u32,
}

impl FrameCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            last_report: now,
            frames: 0,
        }
    }

    /// Record a frame finishing at `now`.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.last_report) >= REPORT_INTERVAL {
            let frames = self.frames;
            self.frames = 0;
            self.last_report = now;
            Some(frames)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_a_second_and_resets() {
        let start = Instant::now();
        let mut counter = FrameCounter::new(start);
        let frame = Duration::from_millis(100);

        for i in 1..10 {
            assert_eq!(counter.tick(start + frame * i), None);
        }
        assert_eq!(counter.tick(start + frame * 10), Some(10));

        assert_eq!(counter.tick(start + frame * 11), None);
        assert_eq!(counter.tick(start + frame * 25), Some(2));
    }
}
