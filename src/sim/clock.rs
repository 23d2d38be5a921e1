//! Frame clock: turns host timestamps into clamped per-frame deltas

use crate::consts::FIRST_FRAME_MS;

/// Tracks the previous frame timestamp
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ts: Option<f64>,
    max_ms: f32,
}

impl FrameClock {
    /// `max_ms` caps a single delta so a stalled host cannot tunnel entities
    pub fn new(max_ms: f32) -> Self {
        Self { last_ts: None, max_ms }
    }

    /// Delta in ms since the previous call, clamped to `[0, max_ms]`
    ///
    /// The first call (or first after a reset) reports a nominal frame.
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ts {
            None => FIRST_FRAME_MS,
            Some(last) => (timestamp_ms - last) as f32,
        };
        self.last_ts = Some(timestamp_ms);
        dt.clamp(0.0, self.max_ms)
    }

    pub fn reset(&mut self) {
        self.last_ts = None;
    }
}
