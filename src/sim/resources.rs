//! Hearts and the session countdown

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Per-session resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    hearts: u8,
    max_hearts: u8,
    countdown_ms: f32,
    expired: bool,
}

impl Resources {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            hearts: tuning.start_hearts.min(tuning.max_hearts),
            max_hearts: tuning.max_hearts,
            countdown_ms: tuning.time_limit_ms.max(0.0),
            expired: false,
        }
    }

    pub fn hearts(&self) -> u8 {
        self.hearts
    }

    pub fn max_hearts(&self) -> u8 {
        self.max_hearts
    }

    pub fn countdown_ms(&self) -> f32 {
        self.countdown_ms
    }

    /// Whole seconds left, rounded up for display
    pub fn seconds_left(&self) -> u32 {
        (self.countdown_ms / 1000.0).ceil() as u32
    }

    /// Add a heart; returns false when already at the ceiling
    pub fn gain(&mut self) -> bool {
        if self.hearts >= self.max_hearts {
            return false;
        }
        self.hearts += 1;
        true
    }

    /// Remove a heart, never going below zero
    pub fn lose(&mut self) {
        self.hearts = self.hearts.saturating_sub(1);
    }

    pub fn is_depleted(&self) -> bool {
        self.hearts == 0
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Run the countdown; returns true on the single frame it reaches zero
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.expired {
            return false;
        }
        self.countdown_ms = (self.countdown_ms - dt.max(0.0)).max(0.0);
        if self.countdown_ms <= 0.0 {
            self.expired = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hearts_are_bounded() {
        let mut res = Resources::new(&Tuning::default());
        assert_eq!(res.hearts(), 3);
        for _ in 0..20 {
            res.gain();
        }
        assert_eq!(res.hearts(), 12);
        assert!(!res.gain());
        for _ in 0..20 {
            res.lose();
        }
        assert_eq!(res.hearts(), 0);
        assert!(res.is_depleted());
    }

    #[test]
    fn test_countdown_expires_once() {
        let tuning = Tuning {
            time_limit_ms: 100.0,
            ..Default::default()
        };
        let mut res = Resources::new(&tuning);
        assert!(!res.tick(60.0));
        assert_eq!(res.seconds_left(), 1);
        assert!(res.tick(60.0));
        assert_eq!(res.countdown_ms(), 0.0);
        assert!(!res.tick(60.0));
        assert!(res.is_expired());
    }
}
