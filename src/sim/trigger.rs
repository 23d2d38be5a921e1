//! Decorative dog at the end of the path
//!
//! Touching it starts a short animation; the last frame starts the ending.

use super::ending::{self, EndReason};
use super::state::{GameState, Mode};
use crate::consts::{DOG_FRAME_MS, DOG_LAST_FRAME};

pub fn update_dog(state: &mut GameState, dt: f32) {
    if state.mode != Mode::Play {
        return;
    }

    if !state.dog.triggered && state.player.rect().intersects(&state.dog.rect()) {
        state.dog.triggered = true;
        state.dog.frame = 0;
        state.dog.timer.reset();
        log::info!("Player reached the dog");
    }

    if !state.dog.triggered || state.dog.finished {
        return;
    }

    if state.dog.timer.fire_every(dt, DOG_FRAME_MS) {
        state.dog.frame = (state.dog.frame + 1).min(DOG_LAST_FRAME);
        if state.dog.frame == DOG_LAST_FRAME {
            state.dog.finished = true;
            ending::trigger(state, EndReason::DogReached);
        }
    }
}
