use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use riverside_vignette::consts::*;
use riverside_vignette::sim::spawn::{runner_spawn_x, update_runners};
use riverside_vignette::sim::{GameEvent, GameState, Mode, QuestionDeck, TickInput, tick};

fn input_from_bits(bits: u8) -> TickInput {
    TickInput {
        left: bits & 1 != 0,
        right: bits & 2 != 0,
        up: bits & 4 != 0,
        down: bits & 8 != 0,
        confirm: bits & 16 != 0,
    }
}

fn frames() -> impl Strategy<Value = Vec<(u8, f32)>> {
    prop::collection::vec((0u8..32, 0.0f32..60.0), 1..600)
}

proptest! {
    #[test]
    fn hearts_stay_in_bounds(seed in any::<u64>(), inputs in frames()) {
        let mut state = GameState::with_seed(seed);
        for (bits, dt) in inputs {
            tick(&mut state, &input_from_bits(bits), dt);
            prop_assert!(state.resources.hearts() <= state.tuning.max_hearts);
            if let Some(ending) = &state.ending {
                prop_assert!(ending.hearts <= state.tuning.max_hearts);
            }
        }
    }

    #[test]
    fn countdown_never_increases_within_a_session(seed in any::<u64>(), inputs in frames()) {
        let mut state = GameState::with_seed(seed);
        let mut endings_this_session = 0;
        for (bits, dt) in inputs {
            let before = state.resources.countdown_ms();
            tick(&mut state, &input_from_bits(bits), dt);
            let events = state.drain_events();
            let fresh = events
                .iter()
                .any(|e| matches!(e, GameEvent::SessionStarted | GameEvent::ReturnedToTitle));
            if fresh {
                endings_this_session = 0;
            } else {
                prop_assert!(state.resources.countdown_ms() <= before);
            }
            prop_assert!(state.resources.countdown_ms() >= 0.0);
            endings_this_session += events
                .iter()
                .filter(|e| matches!(e, GameEvent::EndingStarted { .. }))
                .count();
            prop_assert!(endings_this_session <= 1);
        }
    }

    #[test]
    fn bubble_population_is_capped(seed in any::<u64>(), inputs in frames()) {
        let mut state = GameState::new_session(seed, Default::default(), Default::default());
        for (bits, dt) in inputs {
            // Keep the player moving forward so the spawner sees new ground
            let mut input = input_from_bits(bits);
            input.right = input.right || bits % 3 == 0;
            tick(&mut state, &input, dt);
            prop_assert!(state.alive_bubbles() <= state.tuning.max_bubbles);
            prop_assert!(state.bubbles.iter().all(|b| b.alive));
        }
    }

    #[test]
    fn bubble_questions_never_repeat_in_a_session(seed in any::<u64>(), inputs in frames()) {
        let mut state = GameState::new_session(seed, Default::default(), Default::default());
        state.drain_events();
        let mut seen_ids: Vec<u32> = Vec::new();
        let mut handed: Vec<usize> = Vec::new();
        for (bits, dt) in inputs {
            let mut input = input_from_bits(bits);
            input.right = input.right || bits % 3 == 0;
            tick(&mut state, &input, dt);
            if state.drain_events().contains(&GameEvent::SessionStarted) {
                break;
            }
            for bubble in &state.bubbles {
                if seen_ids.contains(&bubble.id) {
                    continue;
                }
                seen_ids.push(bubble.id);
                if let Some(q) = bubble.question {
                    prop_assert!(!handed.contains(&q), "question {} handed out twice", q);
                    handed.push(q);
                }
            }
        }
    }

    #[test]
    fn deck_draws_are_distinct(seed in any::<u64>(), size in 0usize..40) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut deck = QuestionDeck::new(size);
        let mut seen = vec![false; size];
        for _ in 0..size {
            let index = deck.draw(&mut rng);
            prop_assert!(index.is_some());
            let index = index.unwrap_or_default();
            prop_assert!(!seen[index]);
            seen[index] = true;
        }
        prop_assert_eq!(deck.draw(&mut rng), None);
    }

    #[test]
    fn respawn_keeps_runway(player_x in LEFT_WALL_X..RIGHT_WALL_X, camera_x in 0.0f32..3100.0) {
        let mut state = GameState::with_seed(1);
        state.player.pos.x = player_x;
        state.camera_x = camera_x;
        let x = runner_spawn_x(&state);
        prop_assert!(x >= player_x + state.tuning.runner_min_runway);
        prop_assert!(x >= RIGHT_WALL_X + RUNNER_SPAWN_WALL_OFFSET);
        prop_assert!(x >= camera_x + VIEW_WIDTH + RUNNER_SPAWN_VIEW_MARGIN);
    }

    #[test]
    fn fallen_runner_waits_for_respawn_delay(dts in prop::collection::vec(1.0f32..50.0, 1..80)) {
        let mut state = GameState::new_session(9, Default::default(), Default::default());
        state.runners_enabled = true;
        state.runners[0].fallen = true;
        state.runners[0].vel = glam::Vec2::ZERO;
        let delay = state.tuning.runner_respawn_ms;

        let mut elapsed = 0.0;
        for dt in dts {
            update_runners(&mut state, dt);
            elapsed += dt;
            if elapsed < delay {
                prop_assert!(state.runners[0].fallen);
            } else {
                prop_assert!(!state.runners[0].fallen);
                prop_assert!(state.runners[0].pos.x >= state.player.pos.x + state.tuning.runner_min_runway);
                break;
            }
        }
        prop_assert_eq!(state.mode, Mode::Play);
    }
}
