//! Per-frame simulation tick
//!
//! One entry point advances the whole game by a variable `dt` (ms).

use serde::{Deserialize, Serialize};

use super::ending::{self, EndReason};
use super::state::{GameState, Mode};
use super::{approach, dialogue, physics, quiz, spawn, title, trigger};

/// Held-key snapshot supplied by the host each frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump in play, previous entry in menus
    pub up: bool,
    /// Next entry in menus
    pub down: bool,
    /// Enter: advance dialogue, pick an answer, activate a menu entry
    pub confirm: bool,
}

/// Held keys plus the presses that started this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub held: TickInput,
    pub up_pressed: bool,
    pub down_pressed: bool,
    pub confirm_pressed: bool,
}

impl Controls {
    pub fn from_edges(prev: &TickInput, now: &TickInput) -> Self {
        Self {
            held: *now,
            up_pressed: now.up && !prev.up,
            down_pressed: now.down && !prev.down,
            confirm_pressed: now.confirm && !prev.confirm,
        }
    }
}

/// Advance the game by `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.clamp(0.0, state.tuning.max_frame_ms) } else { 0.0 };

    // Keys held across a restart must not count as fresh presses
    let prev = state.prev_input;
    state.apply_pending_transition();
    let controls = Controls::from_edges(&prev, input);
    state.prev_input = *input;
    state.time_ms += dt as f64;

    match state.mode {
        Mode::Title => title::update_title(state, &controls),
        Mode::Play => play_frame(state, &controls, dt),
        Mode::Ending => ending::update(state, &controls, dt),
    }
}

fn play_frame(state: &mut GameState, controls: &Controls, dt: f32) {
    if state.in_dialogue() {
        dialogue::update_overlay(state, controls);
    }
    if state.paused {
        return;
    }

    physics::step_player(state, controls, dt);
    physics::update_camera(state);

    trigger::update_dog(state, dt);
    if state.mode != Mode::Play {
        return;
    }

    spawn::update_runner_gate(state, dt);
    if !state.in_dialogue() {
        spawn::update_runners(state, dt);
        spawn::update_bubbles(state, dt);
        spawn::update_bubble_spawner(state, dt);
    }
    quiz::open_pending(state);
    approach::update_companion(state, dt);

    if state.resources.tick(dt) {
        ending::trigger(state, EndReason::TimeUp);
        return;
    }
    if state.resources.is_depleted() {
        ending::trigger(state, EndReason::HeartsDepleted);
    }
}
