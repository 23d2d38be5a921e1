//! Sound cue dispatch
//!
//! The simulation only names cues; playback belongs to whatever sink the
//! host installs. Playback is fire-and-forget and never feeds back.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Symbolic sound cues fired by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player leaves the ground
    Jump,
    /// Runner collision or wrong answer
    Hit,
    /// Right answer or bonus heart
    Correct,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Hit => "hit",
            SoundCue::Correct => "correct",
        }
    }

    /// Audio file the host is expected to provide
    pub fn file_name(self) -> &'static str {
        match self {
            SoundCue::Jump => "jump.wav",
            SoundCue::Hit => "hit.wav",
            SoundCue::Correct => "correct.wav",
        }
    }
}

/// Anything that can play a cue
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Sink used by the headless runner: logs cues and keeps a tally
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: Vec<SoundCue>,
}

impl AudioSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("♪ {} ({}) at {:.2}", cue.name(), cue.file_name(), volume);
        self.played.push(cue);
    }
}

/// Forward every sound event in `events` to `sink`, honouring volume settings
///
/// Returns the number of cues actually played (muted cues are skipped).
pub fn dispatch_cues(events: &[GameEvent], settings: &Settings, sink: &mut dyn AudioSink) -> usize {
    let volume = settings.effective_volume();
    if volume <= 0.0 {
        return 0;
    }
    let mut played = 0;
    for event in events {
        if let GameEvent::Sound(cue) = event {
            sink.play(*cue, volume);
            played += 1;
        }
    }
    played
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_plays_only_sound_events() {
        let events = vec![
            GameEvent::Sound(SoundCue::Jump),
            GameEvent::RunnersEnabled,
            GameEvent::Sound(SoundCue::Hit),
        ];
        let mut sink = LogSink::default();
        let played = dispatch_cues(&events, &Settings::default(), &mut sink);
        assert_eq!(played, 2);
        assert_eq!(sink.played, vec![SoundCue::Jump, SoundCue::Hit]);
    }

    #[test]
    fn test_muted_skips_everything() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut sink = LogSink::default();
        let played = dispatch_cues(&[GameEvent::Sound(SoundCue::Correct)], &settings, &mut sink);
        assert_eq!(played, 0);
        assert!(sink.played.is_empty());
    }
}
