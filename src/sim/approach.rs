//! Companion walks toward the player and opens the greeting once close

use super::dialogue::open_greeting;
use super::physics::{clamp_companion, frame_scale};
use super::state::{Facing, GameState};
use crate::consts::COMPANION_ANIM_MS;

pub fn update_companion(state: &mut GameState, dt: f32) {
    if !state.companion.idle || state.in_dialogue() {
        state.companion.vel.x = 0.0;
        return;
    }

    let gap = state.player.center_x() - state.companion.center_x();
    let reach = state.tuning.approach_gap;
    let speed = state.tuning.approach_speed;

    if gap.abs() > reach {
        let companion = &mut state.companion;
        companion.facing = if gap > 0.0 { Facing::Right } else { Facing::Left };
        companion.vel.x = speed * companion.facing.sign() as f32;
        companion.pos.x += companion.vel.x * frame_scale(dt);
        companion.walk.advance(dt, COMPANION_ANIM_MS);
        clamp_companion(state);
        return;
    }

    state.companion.vel.x = 0.0;
    state.companion.walk.frame = 0;
    if !state.greeted {
        state.greeted = true;
        state.companion.idle = false;
        open_greeting(state);
    }
}
