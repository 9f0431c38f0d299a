//! Frame-rate limiting.

use std::time::Duration;

/// Decides whether a frame callback should do work, given a frame-rate cap.
///
/// Timestamps are milliseconds from any monotonic origin. Skipped frames do
/// not move the reference point, so the cap is measured from the last frame
/// that was actually processed.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    target_fps: u32,
    last_ms: Option<f64>,
}

impl FrameClock {
    /// A clock capped at `target_fps`; 0 means uncapped.
    pub fn new(target_fps: u32) -> Self {
        Self {
            target_fps,
            last_ms: None,
        }
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.target_fps = target_fps;
    }

    /// Minimum time between processed frames, if capped.
    pub fn interval_ms(&self) -> Option<f64> {
        (self.target_fps > 0).then(|| 1000.0 / self.target_fps as f64)
    }

    /// Forget the last processed timestamp.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Returns `true` when the frame at `now_ms` should be processed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(interval) = self.interval_ms() else {
            self.last_ms = Some(now_ms);
            return true;
        };

        match self.last_ms {
            Some(last) if now_ms >= last => {
                let elapsed = now_ms - last;
                if elapsed < interval {
                    return false;
                }
                // Keep the phase so a 60 Hz cap on a 144 Hz display does not drift.
                self.last_ms = Some(now_ms - elapsed % interval);
                true
            }
            // First frame, or the clock went backwards.
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// How long the host may wait before the next frame is due.
    pub fn until_next(&self, now_ms: f64) -> Duration {
        match (self.interval_ms(), self.last_ms) {
            (Some(interval), Some(last)) => {
                let remaining = interval - (now_ms - last);
                if remaining > 0.0 {
                    Duration::from_secs_f64(remaining / 1000.0)
                } else {
                    Duration::ZERO
                }
            }
            _ => Duration::ZERO,
        }
    }
}
