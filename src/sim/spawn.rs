//! Runner and bubble lifecycles: gating, spawning, contact and culling

use glam::Vec2;
use rand::Rng;

use super::collision::{passed_runner, runner_contact};
use super::physics::frame_scale;
use super::state::{Bubble, GameEvent, GameState};
use crate::audio::SoundCue;
use crate::consts::*;

/// Drift velocity ranges for bubbles (px per reference frame)
const BUBBLE_DRIFT_X: std::ops::Range<f32> = -0.36..-0.24;
const BUBBLE_DRIFT_Y: std::ops::Range<f32> = -0.11..-0.05;

/// Where a runner may (re)appear: beyond the wall, off screen and far enough
/// ahead of the player to be jumpable
pub fn runner_spawn_x(state: &GameState) -> f32 {
    (RIGHT_WALL_X + RUNNER_SPAWN_WALL_OFFSET)
        .max(state.camera_x + VIEW_WIDTH + RUNNER_SPAWN_VIEW_MARGIN)
        .max(state.player.pos.x + state.tuning.runner_min_runway)
}

/// Respawn runner `index` at the spawn rule, staggered behind any runner
/// already placed further out
fn respawn_runner(state: &mut GameState, index: usize) {
    let base = runner_spawn_x(state);
    let x = state
        .runners
        .iter()
        .enumerate()
        .filter(|(i, r)| *i != index && !r.fallen && r.pos.x >= base - RUNNER_STAGGER)
        .map(|(_, r)| r.pos.x + RUNNER_STAGGER)
        .fold(base, f32::max);
    let speed = state.tuning.runner_speed;
    if let Some(runner) = state.runners.get_mut(index) {
        runner.respawn_at(x, speed);
        log::debug!("Runner {} respawned at x={:.0}", runner.id, x);
    }
}

/// Count continuous forward movement after the greeting and release the runners
pub fn update_runner_gate(state: &mut GameState, dt: f32) {
    if !state.greeting_complete || state.runners_enabled || state.paused {
        return;
    }
    if state.player.vel.x > 0.0 {
        state.forward_timer.advance(dt);
    } else {
        state.forward_timer.reset();
    }
    if state.forward_timer.ms < state.tuning.runner_gate_ms {
        return;
    }

    let base = runner_spawn_x(state);
    let speed = state.tuning.runner_speed;
    for (i, runner) in state.runners.iter_mut().enumerate() {
        runner.respawn_at(base + i as f32 * RUNNER_STAGGER, speed);
    }
    state.runners_enabled = true;
    state.emit(GameEvent::RunnersEnabled);
    log::info!("Runners enabled after {:.0} ms of forward movement", state.forward_timer.ms);
}

pub fn update_runners(state: &mut GameState, dt: f32) {
    if !state.runners_enabled {
        return;
    }
    let k = frame_scale(dt);
    let respawn_ms = state.tuning.runner_respawn_ms;
    let clearance = state.tuning.jump_clearance;
    let despawn_x = state.camera_x - RUNNER_DESPAWN_MARGIN;

    for i in 0..state.runners.len() {
        let runner = &mut state.runners[i];

        if runner.fallen {
            runner.fall_timer.advance(dt);
            if runner.fall_timer.ms >= respawn_ms {
                respawn_runner(state, i);
            }
            continue;
        }

        runner.pos += runner.vel * k;
        runner.walk.advance(dt, RUNNER_ANIM_MS);

        if runner.pos.x + runner.size.x < despawn_x {
            respawn_runner(state, i);
            continue;
        }

        let player = state.player.rect();
        let runner = &mut state.runners[i];
        if runner_contact(&player, &runner.rect(), clearance) {
            runner.vel = Vec2::ZERO;
            runner.fallen = true;
            runner.fall_timer.reset();
            let id = runner.id;
            state.resources.lose();
            state.play(SoundCue::Hit);
            state.emit(GameEvent::RunnerHit { id });
            log::info!("Runner {} knocked the player over ({} hearts left)", id, state.resources.hearts());
        } else if !runner.passed && passed_runner(&player, &runner.rect()) {
            runner.passed = true;
        }
    }
}

/// Create a bubble with a fresh drift velocity
pub fn spawn_bubble(state: &mut GameState, x: f32, y: f32, question: Option<usize>) -> u32 {
    let id = state.next_entity_id();
    let vel = Vec2::new(
        state.rng.random_range(BUBBLE_DRIFT_X),
        state.rng.random_range(BUBBLE_DRIFT_Y),
    );
    state.bubbles.push(Bubble {
        id,
        pos: Vec2::new(x, y),
        vel,
        size: Vec2::splat(BUBBLE_SIZE),
        alive: true,
        question,
        hit: false,
    });
    log::debug!("Bubble {} spawned at ({:.0}, {:.0}) question={:?}", id, x, y, question);
    id
}

/// Drift, collect and cull bubbles
pub fn update_bubbles(state: &mut GameState, dt: f32) {
    let k = frame_scale(dt);
    let player = state.player.rect();
    let mut collected = Vec::new();

    for bubble in state.bubbles.iter_mut().filter(|b| b.alive) {
        bubble.pos += bubble.vel * k;
        if player.intersects(&bubble.rect()) {
            bubble.alive = false;
            bubble.hit = true;
            collected.push((bubble.id, bubble.question));
            continue;
        }
        if bubble.pos.x + bubble.size.x < LEFT_WALL_X - BUBBLE_CULL_LEFT_MARGIN
            || bubble.pos.y + bubble.size.y < BUBBLE_CULL_TOP
        {
            bubble.alive = false;
        }
    }

    for (id, question) in collected {
        collect_bubble(state, id, question);
    }
    state.bubbles.retain(|b| b.alive);
}

fn collect_bubble(state: &mut GameState, id: u32, question: Option<usize>) {
    state.emit(GameEvent::BubbleCollected { id, question });
    match question.filter(|&q| state.content.question(q).is_some()) {
        Some(q) if state.pending_question.is_none() => {
            state.pending_question = Some(q);
            log::debug!("Question {} pending until the player lands", q);
        }
        Some(q) => {
            // Only one question may wait at a time; this one is spent
            log::debug!("Question {} dropped, another is pending", q);
        }
        None => {
            if state.resources.gain() {
                log::info!("Bonus heart ({} hearts)", state.resources.hearts());
            }
            state.play(SoundCue::Correct);
            state.emit(GameEvent::BonusHeart);
        }
    }
}

/// Periodic bubble spawner
pub fn update_bubble_spawner(state: &mut GameState, dt: f32) {
    let interval = state.tuning.bubble_spawn_interval_ms;
    if !state.bubble_spawn_timer.fire_every(dt, interval) {
        return;
    }

    let x = state.camera_x + VIEW_WIDTH + BUBBLE_SPAWN_VIEW_MARGIN;
    if let Some(last) = state.last_bubble_spawn_x {
        if (x - last).abs() < state.tuning.bubble_min_gap_x {
            return;
        }
    }

    let min_sep = state.tuning.bubble_min_y_separation;
    let mut y = state.rng.random_range(BUBBLE_Y_MIN..BUBBLE_Y_MAX);
    for _ in 0..BUBBLE_RESAMPLE_ATTEMPTS {
        let crowded = state
            .bubbles
            .iter()
            .any(|b| b.alive && (b.pos.y - y).abs() < min_sep);
        if !crowded {
            break;
        }
        y = state.rng.random_range(BUBBLE_Y_MIN..BUBBLE_Y_MAX);
    }

    let question = state.deck.draw(&mut state.rng);
    spawn_bubble(state, x, y, question);
    state.last_bubble_spawn_x = Some(x);
    enforce_bubble_cap(state);
}

/// Deactivate the oldest bubbles beyond the population cap
fn enforce_bubble_cap(state: &mut GameState) {
    let max = state.tuning.max_bubbles;
    let alive = state.alive_bubbles();
    if alive <= max {
        return;
    }
    let mut excess = alive - max;
    // Bubbles are stored in spawn order
    for bubble in state.bubbles.iter_mut().filter(|b| b.alive) {
        if excess == 0 {
            break;
        }
        bubble.alive = false;
        excess -= 1;
    }
    state.bubbles.retain(|b| b.alive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_FRAME_MS;

    fn playing() -> GameState {
        let mut state = GameState::with_seed(21);
        state.start_session();
        state.drain_events();
        state
    }

    #[test]
    fn test_spawn_rule_respects_runway() {
        let mut state = playing();
        state.player.pos.x = 3600.0;
        state.camera_x = 3100.0;
        assert_eq!(runner_spawn_x(&state), 4300.0);
        state.player.pos.x = 500.0;
        state.camera_x = 100.0;
        assert_eq!(runner_spawn_x(&state), RIGHT_WALL_X + RUNNER_SPAWN_WALL_OFFSET);
    }

    #[test]
    fn test_gate_needs_continuous_forward_movement() {
        let mut state = playing();
        state.greeting_complete = true;
        state.player.vel.x = 3.0;
        for _ in 0..100 {
            update_runner_gate(&mut state, 20.0);
        }
        assert!(!state.runners_enabled);
        state.player.vel.x = 0.0;
        update_runner_gate(&mut state, 20.0);
        assert_eq!(state.forward_timer.ms, 0.0);
        state.player.vel.x = 3.0;
        for _ in 0..150 {
            update_runner_gate(&mut state, 20.0);
        }
        assert!(state.runners_enabled);
        let xs: Vec<f32> = state.runners.iter().map(|r| r.pos.x).collect();
        assert!((xs[1] - xs[0]).abs() >= RUNNER_STAGGER);
        assert!(state.events.contains(&GameEvent::RunnersEnabled));
    }

    #[test]
    fn test_runner_hit_costs_a_heart() {
        let mut state = playing();
        state.runners_enabled = true;
        state.player.pos.y = GROUND_Y - PLAYER_HEIGHT;
        state.runners[0].pos.x = state.player.pos.x + 10.0;
        update_runners(&mut state, REFERENCE_FRAME_MS);
        assert!(state.runners[0].fallen);
        assert_eq!(state.runners[0].vel, Vec2::ZERO);
        assert_eq!(state.resources.hearts(), 2);
        assert!(state.events.contains(&GameEvent::Sound(SoundCue::Hit)));
    }

    #[test]
    fn test_fallen_runner_respawns_after_delay() {
        let mut state = playing();
        state.runners_enabled = true;
        state.runners[0].fallen = true;
        state.runners[0].vel = Vec2::ZERO;
        update_runners(&mut state, 400.0);
        assert!(state.runners[0].fallen);
        update_runners(&mut state, 400.0);
        assert!(!state.runners[0].fallen);
        assert!(state.runners[0].pos.x >= state.player.pos.x + state.tuning.runner_min_runway);
        assert!(state.runners[0].vel.x < 0.0);
    }

    #[test]
    fn test_bubble_without_question_grants_heart() {
        let mut state = playing();
        state.bubbles.clear();
        let pos = state.player.pos;
        spawn_bubble(&mut state, pos.x, pos.y, None);
        update_bubbles(&mut state, REFERENCE_FRAME_MS);
        assert_eq!(state.resources.hearts(), 4);
        assert!(state.bubbles.is_empty());
        assert!(state.pending_question.is_none());
    }

    #[test]
    fn test_second_question_stays_spent() {
        let mut state = playing();
        state.bubbles.clear();
        state.pending_question = Some(0);
        let q = state.deck.draw(&mut state.rng);
        let remaining = state.deck.remaining();
        let pos = state.player.pos;
        spawn_bubble(&mut state, pos.x, pos.y, q);
        update_bubbles(&mut state, REFERENCE_FRAME_MS);
        assert_eq!(state.pending_question, Some(0));
        assert_eq!(state.deck.remaining(), remaining);
        assert_eq!(state.resources.hearts(), 3);
    }

    #[test]
    fn test_spawner_caps_population() {
        let mut state = playing();
        let interval = state.tuning.bubble_spawn_interval_ms;
        for step in 0..10 {
            state.camera_x = step as f32 * 300.0;
            update_bubble_spawner(&mut state, interval);
            assert!(state.alive_bubbles() <= state.tuning.max_bubbles);
        }
        // Newest bubble survives the cap
        let newest = state.bubbles.iter().map(|b| b.id).max();
        assert_eq!(state.bubbles.last().map(|b| b.id), newest);
    }

    #[test]
    fn test_spawned_questions_never_repeat() {
        let mut state = playing();
        let interval = state.tuning.bubble_spawn_interval_ms;
        let pool = state.content.questions.len();
        let mut handed: Vec<usize> = state.bubbles.iter().filter_map(|b| b.question).collect();
        let mut blank = 0;
        for step in 0..(pool as u32 + 10) {
            state.camera_x = step as f32 * 300.0;
            let newest = state.bubbles.iter().map(|b| b.id).max();
            update_bubble_spawner(&mut state, interval);
            let Some(bubble) = state.bubbles.last().filter(|b| Some(b.id) != newest) else {
                continue;
            };
            match bubble.question {
                Some(q) => {
                    assert!(!handed.contains(&q), "question {} handed out twice", q);
                    handed.push(q);
                }
                None => blank += 1,
            }
            assert!(state.alive_bubbles() <= state.tuning.max_bubbles);
        }
        // The pool runs dry and later bubbles carry no question
        assert_eq!(handed.len(), pool);
        assert!(blank > 0);
        assert_eq!(state.deck.remaining(), 0);
    }

    #[test]
    fn test_spawner_respects_min_gap() {
        let mut state = playing();
        let before = state.bubbles.len();
        let interval = state.tuning.bubble_spawn_interval_ms;
        update_bubble_spawner(&mut state, interval);
        assert_eq!(state.bubbles.len(), before + 1);
        update_bubble_spawner(&mut state, interval);
        assert_eq!(state.bubbles.len(), before + 1);
    }
}
