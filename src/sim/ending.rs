//! Ending sequences
//!
//! Once triggered, the ending replaces normal play updates. The final heart
//! count is snapshotted and classified into either the game-over screen or
//! one of the narrative tiers. Phases only ever move forward.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use super::state::{Elapsed, GameEvent, GameState, Mode, SessionTransition};
use super::tick::Controls;
use crate::consts::VIEW_HEIGHT;
use crate::tuning::EndingTuning;

/// Game-over headline waits this long before the retry menu appears (ms)
pub const RETRY_MENU_DELAY_MS: f32 = 2000.0;
/// Retry menu fade-in duration (ms)
pub const RETRY_FADE_MS: f32 = 500.0;
/// Typewriter speed (ms per character)
pub const TYPEWRITER_MS: f32 = 50.0;
/// Menu alpha above which confirm is accepted
pub const MENU_CONFIRM_ALPHA: f32 = 0.5;
/// Low-tier cinematic length before the retry menu (ms)
pub const ANGRY_CINEMATIC_MS: f32 = 5000.0;
/// Character fade-out and sequence fade-in duration (ms)
pub const CROSSFADE_MS: f32 = 600.0;
/// Dimmer fade duration and ceiling
pub const DIMMER_FADE_MS: f32 = 1200.0;
pub const DIMMER_MAX: f32 = 0.5;
/// Sequence alpha needed before frames animate / the title appears
pub const SEQ_ANIMATE_ALPHA: f32 = 0.05;
pub const SEQ_TITLE_ALPHA: f32 = 0.8;
/// Cinematic frame period (ms) and frame count
pub const SEQ_FRAME_MS: f32 = 80.0;
pub const SEQ_FRAME_COUNT: u8 = 3;
/// Overall ending fade-in (ms)
pub const ENDING_FADE_MS: f32 = 800.0;
/// Solid black flash at the very start of an ending (ms)
pub const ENDING_FLASH_MS: f32 = 100.0;
/// Credits scroll speed (px per ms) and line height (px)
pub const CREDITS_SPEED: f32 = 0.02;
pub const CREDITS_LINE_HEIGHT: f32 = 35.0;
/// Veil opacity over the low-tier retry menu at full menu alpha
pub const VEIL_MAX_ALPHA: f32 = 0.3;

/// What started the ending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    HeartsDepleted,
    DogReached,
    Requested,
}

/// Outcome bucket for the final heart count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EndingTier {
    GameOver,
    Low,
    Mid,
    High,
    Top,
}

impl EndingTier {
    /// Time running out or an empty heart count is always game over;
    /// otherwise hearts (saturated at the top threshold) pick the tier
    pub fn classify(reason: EndReason, hearts: u8, tuning: &EndingTuning) -> Self {
        if reason == EndReason::TimeUp || hearts == 0 {
            return EndingTier::GameOver;
        }
        let hearts = hearts.min(tuning.top_hearts);
        if hearts <= tuning.low_max {
            EndingTier::Low
        } else if hearts <= tuning.mid_max {
            EndingTier::Mid
        } else if hearts <= tuning.high_max {
            EndingTier::High
        } else {
            EndingTier::Top
        }
    }

    pub fn theme(self) -> Option<CinematicTheme> {
        match self {
            EndingTier::GameOver => None,
            EndingTier::Low => Some(CinematicTheme::Angry),
            EndingTier::Mid | EndingTier::High => Some(CinematicTheme::Cake),
            EndingTier::Top => Some(CinematicTheme::Kiss),
        }
    }
}

/// Frame set and background used by a narrative cinematic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CinematicTheme {
    Angry,
    Cake,
    Kiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Headline {
    TimeUp,
    GameOver,
    TryAgain,
}

/// Ending phases in the order they may occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EndingPhase {
    /// Breathing headline, retry menu after a delay
    GameOver,
    /// Low tier: animated cinematic before the retry menu
    AngryCinematic,
    /// Low tier: retry menu over a veil
    AngryMenu,
    /// Score popup waiting for confirm
    ShowScore,
    /// Characters fading out
    CharFade,
    /// Cinematic fading in with caption
    SeqFadeIn,
}

/// Single-entry retry menu with typewriter reveal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetryMenu {
    pub alpha: f32,
    /// Characters of the option text revealed so far
    pub revealed: usize,
    pub typewriter: Elapsed,
}

impl RetryMenu {
    pub fn update(&mut self, dt: f32, text_len: usize) {
        self.alpha = (self.alpha + dt / RETRY_FADE_MS).min(1.0);
        if self.revealed == 0 {
            self.revealed = 1.min(text_len);
            return;
        }
        if self.revealed < text_len && self.typewriter.fire_every(dt, TYPEWRITER_MS) {
            self.revealed += 1;
        }
    }

    pub fn accepts_confirm(&self) -> bool {
        self.alpha > MENU_CONFIRM_ALPHA
    }
}

/// End credits scroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub scroll_y: f32,
    pub total: f32,
    pub finished: bool,
}

impl Credits {
    pub fn new(lines: usize) -> Self {
        Self {
            scroll_y: 0.0,
            total: lines as f32 * CREDITS_LINE_HEIGHT + VIEW_HEIGHT,
            finished: false,
        }
    }

    /// Returns true on the frame the scroll completes
    pub fn update(&mut self, dt: f32) -> bool {
        if self.finished {
            return false;
        }
        self.scroll_y += CREDITS_SPEED * dt;
        if self.scroll_y >= self.total {
            self.scroll_y = self.total;
            self.finished = true;
            return true;
        }
        false
    }
}

/// Live ending sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingState {
    pub reason: EndReason,
    pub tier: EndingTier,
    /// Heart count when the ending fired; never changes afterwards
    pub hearts: u8,
    pub phase: EndingPhase,
    /// Time since trigger (ms)
    pub elapsed_ms: f32,
    /// Time in the current phase (ms)
    pub phase_ms: f32,
    pub fade: f32,
    pub char_alpha: f32,
    pub seq_alpha: f32,
    pub dimmer: f32,
    pub title_alpha: f32,
    pub frame: u8,
    pub frame_timer: Elapsed,
    pub menu: RetryMenu,
    pub credits: Option<Credits>,
}

impl EndingState {
    pub fn new(reason: EndReason, hearts: u8, tuning: &EndingTuning, credit_lines: usize) -> Self {
        let tier = EndingTier::classify(reason, hearts, tuning);
        let phase = match tier {
            EndingTier::GameOver => EndingPhase::GameOver,
            EndingTier::Low => EndingPhase::AngryCinematic,
            _ => EndingPhase::ShowScore,
        };
        Self {
            reason,
            tier,
            hearts,
            phase,
            elapsed_ms: 0.0,
            phase_ms: 0.0,
            fade: 0.0,
            char_alpha: 1.0,
            seq_alpha: 0.0,
            dimmer: 0.0,
            title_alpha: 0.0,
            frame: 0,
            frame_timer: Elapsed::default(),
            menu: RetryMenu::default(),
            credits: (tier == EndingTier::Top).then(|| Credits::new(credit_lines)),
        }
    }

    pub fn headline(&self) -> Option<Headline> {
        match self.phase {
            EndingPhase::GameOver if self.reason == EndReason::TimeUp => Some(Headline::TimeUp),
            EndingPhase::GameOver => Some(Headline::GameOver),
            EndingPhase::AngryMenu => Some(Headline::TryAgain),
            _ => None,
        }
    }

    /// Breathing headline opacity on the game-over screen
    pub fn headline_alpha(&self) -> f32 {
        0.7 + 0.3 * (self.elapsed_ms / 1000.0 * PI).sin()
    }

    /// Blinking selection marker opacity
    pub fn blink_alpha(&self) -> f32 {
        0.4 + 0.6 * (self.elapsed_ms / 1500.0 * 2.0 * PI).sin()
    }

    /// Veil drawn behind the low-tier retry menu
    pub fn veil_alpha(&self) -> f32 {
        if self.phase == EndingPhase::AngryMenu {
            VEIL_MAX_ALPHA * self.menu.alpha
        } else {
            0.0
        }
    }

    /// Full-screen black flash opacity
    pub fn flash_alpha(&self) -> f32 {
        if self.elapsed_ms < ENDING_FLASH_MS { 1.0 } else { 0.0 }
    }

    pub fn retry_menu_visible(&self) -> bool {
        match self.phase {
            EndingPhase::GameOver => self.elapsed_ms >= RETRY_MENU_DELAY_MS,
            EndingPhase::AngryMenu => true,
            _ => false,
        }
    }

    fn enter(&mut self, phase: EndingPhase) {
        if phase <= self.phase {
            return;
        }
        log::info!("Ending phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_ms = 0.0;
    }

    /// Sequence fade-in and frame loop
    fn animate_sequence(&mut self, dt: f32) {
        self.seq_alpha = (self.seq_alpha + dt / CROSSFADE_MS).min(1.0);
        if self.seq_alpha >= SEQ_ANIMATE_ALPHA && self.frame_timer.fire_every(dt, SEQ_FRAME_MS) {
            self.frame = (self.frame + 1) % SEQ_FRAME_COUNT;
        }
    }

    /// Advance one frame; returns the session transition the player asked for
    pub fn update(&mut self, confirm: bool, dt: f32, retry_len: usize) -> Option<SessionTransition> {
        self.elapsed_ms += dt;
        self.phase_ms += dt;
        self.fade = (self.fade + dt / ENDING_FADE_MS).min(1.0);

        if let Some(credits) = self.credits.as_mut() {
            if credits.update(dt) {
                log::info!("Credits finished");
                return Some(SessionTransition::ReturnToTitle);
            }
        }

        match self.phase {
            EndingPhase::GameOver => {
                if self.elapsed_ms >= RETRY_MENU_DELAY_MS {
                    self.menu.update(dt, retry_len);
                }
                if confirm && self.menu.accepts_confirm() {
                    return Some(SessionTransition::Restart);
                }
            }
            EndingPhase::AngryCinematic => {
                self.animate_sequence(dt);
                if self.phase_ms >= ANGRY_CINEMATIC_MS {
                    self.enter(EndingPhase::AngryMenu);
                }
            }
            EndingPhase::AngryMenu => {
                self.animate_sequence(dt);
                self.menu.update(dt, retry_len);
                if confirm && self.menu.accepts_confirm() {
                    return Some(SessionTransition::Restart);
                }
            }
            EndingPhase::ShowScore => {
                if confirm {
                    self.enter(EndingPhase::CharFade);
                }
            }
            EndingPhase::CharFade => {
                self.char_alpha = (self.char_alpha - dt / CROSSFADE_MS).max(0.0);
                if self.char_alpha <= 0.0 {
                    self.enter(EndingPhase::SeqFadeIn);
                }
            }
            EndingPhase::SeqFadeIn => {
                self.animate_sequence(dt);
                self.dimmer = (self.dimmer + dt / DIMMER_FADE_MS).min(DIMMER_MAX);
                if self.seq_alpha >= SEQ_TITLE_ALPHA {
                    self.title_alpha = (self.title_alpha + dt / CROSSFADE_MS).min(1.0);
                }
                if self.credits.is_none() && self.title_alpha >= 1.0 && confirm {
                    return Some(SessionTransition::ReturnToTitle);
                }
            }
        }
        None
    }
}

/// Start the ending unless one is already running
pub fn trigger(state: &mut GameState, reason: EndReason) {
    if state.ending.is_some() || state.mode != Mode::Play {
        return;
    }
    let hearts = state.resources.hearts().min(state.tuning.max_hearts);
    let ending = EndingState::new(
        reason,
        hearts,
        &state.tuning.ending,
        state.content.ending.credits.len(),
    );
    let tier = ending.tier;
    log::info!("Ending triggered by {:?}: {} hearts -> {:?}", reason, hearts, tier);

    state.ending = Some(ending);
    state.mode = Mode::Ending;
    state.overlay = super::dialogue::Overlay::None;
    state.pending_question = None;
    state.paused = false;
    state.emit(GameEvent::EndingStarted { reason, tier });
}

/// Per-frame ending update
pub fn update(state: &mut GameState, controls: &Controls, dt: f32) {
    let retry_len = state.content.ending.retry_option.chars().count();
    let Some(ending) = state.ending.as_mut() else {
        return;
    };
    if let Some(transition) = ending.update(controls.confirm_pressed, dt, retry_len) {
        state.request(transition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> EndingTuning {
        EndingTuning::default()
    }

    #[test]
    fn test_classify_boundaries() {
        let t = tiers();
        let dog = EndReason::DogReached;
        assert_eq!(EndingTier::classify(dog, 0, &t), EndingTier::GameOver);
        assert_eq!(EndingTier::classify(dog, 1, &t), EndingTier::Low);
        assert_eq!(EndingTier::classify(dog, 2, &t), EndingTier::Low);
        assert_eq!(EndingTier::classify(dog, 3, &t), EndingTier::Mid);
        assert_eq!(EndingTier::classify(dog, 4, &t), EndingTier::Mid);
        assert_eq!(EndingTier::classify(dog, 5, &t), EndingTier::High);
        assert_eq!(EndingTier::classify(dog, 6, &t), EndingTier::Top);
        assert_eq!(EndingTier::classify(dog, 12, &t), EndingTier::Top);
        assert_eq!(EndingTier::classify(EndReason::TimeUp, 12, &t), EndingTier::GameOver);
    }

    #[test]
    fn test_game_over_menu_needs_fade_before_confirm() {
        let mut ending = EndingState::new(EndReason::TimeUp, 3, &tiers(), 0);
        assert_eq!(ending.headline(), Some(Headline::TimeUp));
        for _ in 0..100 {
            assert_eq!(ending.update(true, 16.0, 13), None);
        }
        assert!(!ending.retry_menu_visible());
        let mut restarted = None;
        for _ in 0..60 {
            restarted = ending.update(true, 16.0, 13);
            if restarted.is_some() {
                break;
            }
        }
        assert_eq!(restarted, Some(SessionTransition::Restart));
        assert!(ending.menu.alpha > MENU_CONFIRM_ALPHA);
    }

    #[test]
    fn test_typewriter_reveals_first_char_immediately() {
        let mut menu = RetryMenu::default();
        menu.update(1.0, 5);
        assert_eq!(menu.revealed, 1);
        menu.update(49.0, 5);
        assert_eq!(menu.revealed, 1);
        menu.update(1.0, 5);
        assert_eq!(menu.revealed, 2);
        for _ in 0..10 {
            menu.update(50.0, 5);
        }
        assert_eq!(menu.revealed, 5);
    }

    #[test]
    fn test_low_tier_converts_to_retry_menu() {
        let mut ending = EndingState::new(EndReason::DogReached, 1, &tiers(), 0);
        assert_eq!(ending.phase, EndingPhase::AngryCinematic);
        assert_eq!(ending.tier.theme(), Some(CinematicTheme::Angry));
        for _ in 0..250 {
            ending.update(false, 20.0, 13);
        }
        assert_eq!(ending.phase, EndingPhase::AngryMenu);
        assert_eq!(ending.headline(), Some(Headline::TryAgain));
        assert!(ending.veil_alpha() <= VEIL_MAX_ALPHA);
    }

    #[test]
    fn test_narrative_phases_move_forward() {
        let mut ending = EndingState::new(EndReason::DogReached, 4, &tiers(), 0);
        assert_eq!(ending.phase, EndingPhase::ShowScore);
        ending.update(false, 1000.0, 13);
        assert_eq!(ending.phase, EndingPhase::ShowScore);
        ending.update(true, 16.0, 13);
        assert_eq!(ending.phase, EndingPhase::CharFade);
        let mut last = ending.phase;
        for _ in 0..200 {
            let transition = ending.update(false, 16.0, 13);
            assert!(ending.phase >= last);
            assert!(transition.is_none());
            last = ending.phase;
        }
        assert_eq!(ending.phase, EndingPhase::SeqFadeIn);
        assert_eq!(ending.char_alpha, 0.0);
        assert_eq!(ending.seq_alpha, 1.0);
        assert_eq!(ending.dimmer, DIMMER_MAX);
        assert_eq!(ending.title_alpha, 1.0);
        assert_eq!(ending.update(true, 16.0, 13), Some(SessionTransition::ReturnToTitle));
    }

    #[test]
    fn test_top_tier_credits_return_to_title() {
        let mut ending = EndingState::new(EndReason::DogReached, 9, &tiers(), 21);
        assert_eq!(ending.hearts, 9);
        let total = ending.credits.as_ref().map(|c| c.total).unwrap_or_default();
        assert_eq!(total, 21.0 * CREDITS_LINE_HEIGHT + VIEW_HEIGHT);
        let mut frames = 0;
        let transition = loop {
            frames += 1;
            if let Some(t) = ending.update(false, 50.0, 13) {
                break t;
            }
            assert!(frames < 10_000);
        };
        assert_eq!(transition, SessionTransition::ReturnToTitle);
        // Credits run on their own clock, even if the score popup was never dismissed
        assert_eq!(ending.phase, EndingPhase::ShowScore);
    }

    #[test]
    fn test_trigger_only_once() {
        let mut state = GameState::with_seed(3);
        state.start_session();
        trigger(&mut state, EndReason::DogReached);
        let first = state.ending.clone();
        state.resources.gain();
        trigger(&mut state, EndReason::TimeUp);
        assert_eq!(state.ending, first);
        let started = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EndingStarted { .. }))
            .count();
        assert_eq!(started, 1);
    }
}
