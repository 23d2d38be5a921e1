//! Riverside Vignette headless runner
//!
//! Drives the simulation with a scripted player at 60 Hz, routes sound cues
//! to a logging sink and prints the final frame snapshot as JSON.
//!
//! ```text
//! riverside-vignette [--seed N] [--script idle|dash] [--frames N]
//!                    [--tuning FILE] [--content FILE] [--settings FILE]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::{Parser, ValueEnum};
    use riverside_vignette::assets::{LoadProgress, manifest};
    use riverside_vignette::audio::{LogSink, dispatch_cues};
    use riverside_vignette::consts::REFERENCE_FRAME_MS;
    use riverside_vignette::sim::{
        FrameClock, FrameView, GameEvent, GameState, Mode, Overlay, TickInput, tick,
    };
    use riverside_vignette::{Content, Settings, Tuning};

    /// Frames to keep running after an ending starts when nothing will dismiss it
    const IDLE_ENDING_FRAMES: u64 = 300;
    /// Start a jump when a runner is this close ahead (px)
    const JUMP_TRIGGER_GAP: f32 = 60.0;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum Script {
        /// Start the session and never touch anything again
        Idle,
        /// Run right, hop runners, click through dialogue, answer correctly
        Dash,
    }

    impl Script {
        /// Held keys for this frame; presses only land on even frames so
        /// every press has a release in between
        fn input(self, state: &GameState, frame: u64) -> TickInput {
            let press = frame % 2 == 0;
            match (self, state.mode) {
                (_, Mode::Title) => TickInput {
                    confirm: press,
                    ..Default::default()
                },
                (Script::Idle, _) => TickInput::default(),
                (Script::Dash, Mode::Ending) => TickInput {
                    confirm: press,
                    ..Default::default()
                },
                (Script::Dash, Mode::Play) => dash_input(state, press),
            }
        }
    }

    fn dash_input(state: &GameState, press: bool) -> TickInput {
        match &state.overlay {
            Overlay::Quiz(session) => {
                let correct = state
                    .content
                    .question(session.question)
                    .and_then(|q| q.correct_index())
                    .unwrap_or(0);
                if session.selected == correct {
                    TickInput {
                        confirm: press,
                        ..Default::default()
                    }
                } else {
                    TickInput {
                        down: press,
                        ..Default::default()
                    }
                }
            }
            Overlay::Greeting(_) | Overlay::Popup(_) => TickInput {
                confirm: press,
                ..Default::default()
            },
            Overlay::None => {
                let front = state.player.pos.x + state.player.size.x;
                let runner_close = state.runners_enabled
                    && state.runners.iter().any(|r| {
                        let gap = r.pos.x - front;
                        !r.fallen && gap > 0.0 && gap < JUMP_TRIGGER_GAP
                    });
                TickInput {
                    right: true,
                    up: runner_close,
                    ..Default::default()
                }
            }
        }
    }

    #[derive(Debug, Parser)]
    #[command(name = "riverside-vignette")]
    #[command(about = "Run a scripted session headless and print the final frame as JSON")]
    pub struct Args {
        /// RNG seed (defaults to the settings seed, then the clock)
        #[arg(long)]
        pub seed: Option<u64>,
        /// Scripted player
        #[arg(long, value_enum, default_value_t = Script::Dash)]
        pub script: Script,
        /// Frames to simulate at 60 Hz
        #[arg(long, default_value_t = 60 * 180)]
        pub frames: u64,
        /// Tuning overrides (JSON)
        #[arg(long)]
        pub tuning: Option<PathBuf>,
        /// Question pool and dialogue (JSON)
        #[arg(long)]
        pub content: Option<PathBuf>,
        /// Player settings (JSON)
        #[arg(long)]
        pub settings: Option<PathBuf>,
    }

    pub fn run(args: Args) -> Result<String, serde_json::Error> {
        let settings = args
            .settings
            .as_deref()
            .map(Settings::load_or_default)
            .unwrap_or_default();
        let tuning = args
            .tuning
            .as_deref()
            .map(Tuning::load_or_default)
            .unwrap_or_default();
        let content = args
            .content
            .as_deref()
            .map(Content::load_or_default)
            .unwrap_or_default();
        let seed = args.seed.unwrap_or_else(|| settings.resolve_seed());
        log::info!("Seed {} running the {:?} script", seed, args.script);

        let mut state = GameState::new(seed, tuning, content);
        let mut clock = FrameClock::new(state.tuning.max_frame_ms);
        let mut sink = LogSink::default();

        // Nothing to fetch headless: every asset settles at once
        let files = manifest();
        let mut loading = LoadProgress::new(files.len());
        files.iter().for_each(|_| loading.settle());

        let mut timestamp = 0.0_f64;
        let mut loaded = false;
        let mut ending_frame = None;
        let mut script_frame = 0_u64;

        for frame in 0..args.frames {
            let dt = clock.delta(timestamp);
            timestamp += REFERENCE_FRAME_MS as f64;

            if !loaded {
                loaded = loading.poll(dt);
                continue;
            }

            let input = args.script.input(&state, script_frame);
            script_frame += 1;
            tick(&mut state, &input, dt);

            let events = state.drain_events();
            dispatch_cues(&events, &settings, &mut sink);
            let mut back_on_title = false;
            for event in &events {
                match event {
                    GameEvent::EndingStarted { reason, tier } => {
                        log::info!("Frame {}: ending {:?} ({:?})", frame, tier, reason);
                        ending_frame = Some(frame);
                    }
                    GameEvent::ReturnedToTitle => back_on_title = true,
                    _ => {}
                }
            }
            if back_on_title {
                break;
            }
            let settled = ending_frame.is_some_and(|start| frame - start >= IDLE_ENDING_FRAMES);
            if args.script == Script::Idle && settled {
                break;
            }
        }

        log::info!(
            "Finished in {:?} mode with {} hearts, {} cues played",
            state.mode,
            state.resources.hearts(),
            sink.played.len()
        );
        FrameView::capture(&state).to_json()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_default_to_dash() {
            let args = Args::try_parse_from(["riverside-vignette"]).expect("no args parse");
            assert_eq!(args.script, Script::Dash);
            assert_eq!(args.frames, 60 * 180);
            assert!(args.seed.is_none());
        }

        #[test]
        fn test_args_parse_flags() {
            let args = Args::try_parse_from([
                "riverside-vignette",
                "--seed",
                "7",
                "--script",
                "idle",
                "--frames",
                "120",
                "--tuning",
                "tuning.json",
            ])
            .expect("flags parse");
            assert_eq!(args.seed, Some(7));
            assert_eq!(args.script, Script::Idle);
            assert_eq!(args.frames, 120);
            assert_eq!(args.tuning, Some(PathBuf::from("tuning.json")));
        }

        #[test]
        fn test_args_reject_unknown_script() {
            assert!(Args::try_parse_from(["riverside-vignette", "--script", "moonwalk"]).is_err());
        }

        #[test]
        fn test_idle_run_reaches_time_up() {
            let args = Args {
                seed: Some(3),
                script: Script::Idle,
                frames: 60 * 70,
                tuning: None,
                content: None,
                settings: None,
            };
            let json = run(args).expect("frame serializes");
            assert!(json.contains("TIME UP"));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Riverside Vignette (headless) starting...");

    let args = headless::Args::parse();
    match headless::run(args) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize final frame: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm entry point; this only satisfies the compiler
}
