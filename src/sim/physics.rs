//! Player movement, gravity, world bounds and the camera

use super::collision::resolve_ground;
use super::state::{Facing, GameState, Player};
use super::tick::Controls;
use crate::audio::SoundCue;
use crate::consts::*;

/// Reference frames represented by `dt` milliseconds
#[inline]
pub fn frame_scale(dt: f32) -> f32 {
    dt / REFERENCE_FRAME_MS
}

/// Step the player for one frame
///
/// While any overlay is open the player is frozen in place: velocity is
/// zeroed and ground contact is left as it was. A zero-length frame leaves
/// the player untouched.
pub fn step_player(state: &mut GameState, controls: &Controls, dt: f32) {
    let frozen = state.in_dialogue();
    let player = &mut state.player;

    if frozen {
        player.vel = glam::Vec2::ZERO;
        return;
    }
    if dt <= 0.0 {
        return;
    }

    let k = frame_scale(dt);
    let held = controls.held;

    player.vel.x = match (held.left, held.right) {
        (true, false) => {
            player.facing = Facing::Left;
            -PLAYER_WALK_SPEED
        }
        (false, true) => {
            player.facing = Facing::Right;
            PLAYER_WALK_SPEED
        }
        _ => 0.0,
    };

    // Walls stop horizontal motion outright
    if (player.vel.x < 0.0 && player.pos.x <= LEFT_WALL_X)
        || (player.vel.x > 0.0 && player.pos.x + player.size.x >= RIGHT_WALL_X)
    {
        player.vel.x = 0.0;
    }

    let mut jumped = false;
    if held.up && player.on_ground {
        player.vel.y = JUMP_VELOCITY;
        player.on_ground = false;
        jumped = true;
    }

    player.vel.y += GRAVITY * k;
    player.pos += player.vel * k;

    let contact = resolve_ground(player.rect(), player.vel.y, &state.tiles);
    player.pos.y = contact.y;
    player.on_ground = contact.on_ground;
    if contact.on_ground {
        player.vel.y = 0.0;
    }

    clamp_to_world(player);

    if player.vel.x != 0.0 && player.on_ground {
        player.walk.advance(dt, PLAYER_ANIM_MS);
    } else {
        player.walk.frame = 0;
        player.walk.timer.reset();
    }

    if jumped {
        state.play(SoundCue::Jump);
    }
}

fn clamp_to_world(player: &mut Player) {
    player.pos.x = player.pos.x.clamp(LEFT_WALL_X, RIGHT_WALL_X - player.size.x);
    player.pos.y = player.pos.y.clamp(0.0, WORLD_HEIGHT - player.size.y);
}

/// Keep the companion inside the walls as well
pub fn clamp_companion(state: &mut GameState) {
    let companion = &mut state.companion;
    companion.pos.x = companion.pos.x.clamp(LEFT_WALL_X, RIGHT_WALL_X - companion.size.x);
}

/// Camera position that centres the player, bounded by the walkable area
pub fn camera_target(player: &Player) -> f32 {
    let max_x = (RIGHT_WALL_X - VIEW_WIDTH).max(0.0);
    (player.center_x() - VIEW_WIDTH / 2.0).clamp(0.0, max_x)
}

pub fn update_camera(state: &mut GameState) {
    state.camera_x = camera_target(&state.player);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dialogue::open_popup;
    use crate::sim::tick::TickInput;

    fn held(input: TickInput) -> Controls {
        Controls {
            held: input,
            ..Default::default()
        }
    }

    fn grounded_state() -> GameState {
        let mut state = GameState::with_seed(5);
        state.start_session();
        state.player.pos.y = GROUND_Y - PLAYER_HEIGHT;
        state.player.on_ground = true;
        state.drain_events();
        state
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut state = GameState::with_seed(5);
        state.start_session();
        for _ in 0..120 {
            step_player(&mut state, &Controls::default(), REFERENCE_FRAME_MS);
        }
        assert!(state.player.on_ground);
        assert_eq!(state.player.pos.y, GROUND_Y - PLAYER_HEIGHT);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut state = grounded_state();
        let up = held(TickInput {
            up: true,
            ..Default::default()
        });
        step_player(&mut state, &up, REFERENCE_FRAME_MS);
        assert!(!state.player.on_ground);
        assert!(state.player.vel.y < 0.0);
        assert_eq!(state.drain_events().len(), 1);
        // Holding up mid-air does not jump again
        step_player(&mut state, &up, REFERENCE_FRAME_MS);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_left_wall_blocks() {
        let mut state = grounded_state();
        state.player.pos.x = LEFT_WALL_X;
        let left = held(TickInput {
            left: true,
            ..Default::default()
        });
        step_player(&mut state, &left, REFERENCE_FRAME_MS);
        assert_eq!(state.player.pos.x, LEFT_WALL_X);
        assert_eq!(state.player.vel.x, 0.0);
        assert_eq!(state.player.facing, Facing::Left);
    }

    #[test]
    fn test_frozen_during_dialogue() {
        let mut state = grounded_state();
        state.player.vel.x = 3.0;
        open_popup(&mut state, "hi", false);
        let before = state.player.pos;
        let right = held(TickInput {
            right: true,
            ..Default::default()
        });
        step_player(&mut state, &right, REFERENCE_FRAME_MS);
        assert_eq!(state.player.pos, before);
        assert_eq!(state.player.vel, glam::Vec2::ZERO);
        assert!(state.player.on_ground);
    }

    #[test]
    fn test_zero_dt_keeps_ground_contact() {
        let mut state = grounded_state();
        let up = held(TickInput {
            up: true,
            ..Default::default()
        });
        let before = state.player.pos;
        step_player(&mut state, &Controls::default(), 0.0);
        assert!(state.player.on_ground);
        assert_eq!(state.player.pos, before);

        step_player(&mut state, &up, 0.0);
        assert!(state.player.on_ground);
        assert!(state.drain_events().is_empty());
        // The held jump lands on the next real frame
        step_player(&mut state, &up, REFERENCE_FRAME_MS);
        assert!(state.player.vel.y < 0.0);
        assert_eq!(state.drain_events().len(), 1);
    }

    #[test]
    fn test_camera_is_clamped() {
        let mut player = Player::default();
        player.pos.x = LEFT_WALL_X;
        assert_eq!(camera_target(&player), LEFT_WALL_X + PLAYER_WIDTH / 2.0 - VIEW_WIDTH / 2.0);
        player.pos.x = RIGHT_WALL_X - PLAYER_WIDTH;
        assert_eq!(camera_target(&player), RIGHT_WALL_X - VIEW_WIDTH);
    }

    #[test]
    fn test_movement_scales_with_dt() {
        let mut a = grounded_state();
        let mut b = grounded_state();
        let right = held(TickInput {
            right: true,
            ..Default::default()
        });
        step_player(&mut a, &right, REFERENCE_FRAME_MS);
        step_player(&mut b, &right, REFERENCE_FRAME_MS * 2.0);
        let da = a.player.pos.x - PLAYER_START_X;
        let db = b.player.pos.x - PLAYER_START_X;
        assert!((db - 2.0 * da).abs() < 1e-3);
    }
}
