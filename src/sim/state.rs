//! Game state and core simulation types
//!
//! `GameState` is the single simulation context; every subsystem receives it
//! by reference and nothing reads ambient globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::dialogue::Overlay;
use super::ending::{EndReason, EndingState, EndingTier};
use super::quiz::QuestionDeck;
use super::resources::Resources;
use super::tick::TickInput;
use super::title::TitleMenu;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::content::Content;
use crate::tuning::Tuning;

/// Top-level mode of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Start screen with its menu
    Title,
    /// Active session
    Play,
    /// Ending sequence replaces normal updates
    Ending,
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> i8 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    /// Facing that looks from `from_x` toward `to_x` (ties face right)
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x >= from_x { Facing::Right } else { Facing::Left }
    }
}

/// Elapsed-time accumulator shared by every periodic behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Elapsed {
    pub ms: f32,
}

impl Elapsed {
    pub fn advance(&mut self, dt: f32) {
        self.ms += dt;
    }

    /// Advance and report whether `period_ms` has been reached; resets on fire
    pub fn fire_every(&mut self, dt: f32, period_ms: f32) -> bool {
        self.ms += dt;
        if self.ms >= period_ms {
            self.ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.ms = 0.0;
    }
}

/// Two-frame walk cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkCycle {
    pub frame: u8,
    pub timer: Elapsed,
}

impl WalkCycle {
    pub fn advance(&mut self, dt: f32, period_ms: f32) {
        if self.timer.fire_every(dt, period_ms) {
            self.frame = (self.frame + 1) % 2;
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
    pub walk: WalkCycle,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            facing: Facing::Right,
            on_ground: false,
            walk: WalkCycle::default(),
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Non-hazard NPC that walks up and opens the greeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    /// Still approaching (greeting not yet triggered)
    pub idle: bool,
    pub walk: WalkCycle,
}

impl Default for Companion {
    fn default() -> Self {
        Self {
            pos: Vec2::new(COMPANION_START_X, COMPANION_Y),
            vel: Vec2::ZERO,
            size: Vec2::new(COMPANION_WIDTH, COMPANION_HEIGHT),
            facing: Facing::Right,
            idle: true,
            walk: WalkCycle::default(),
        }
    }
}

impl Companion {
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Obstacle running toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Knocked over; immobile until the respawn delay elapses
    pub fallen: bool,
    pub fall_timer: Elapsed,
    /// Player has got past this runner since its last spawn
    pub passed: bool,
    pub walk: WalkCycle,
}

impl Runner {
    pub fn parked(id: u32, x: f32, speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, RUNNER_Y),
            vel: Vec2::new(-speed, 0.0),
            size: Vec2::new(RUNNER_WIDTH, RUNNER_HEIGHT),
            fallen: false,
            fall_timer: Elapsed::default(),
            passed: false,
            walk: WalkCycle::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Put the runner back on its feet at `x`
    pub fn respawn_at(&mut self, x: f32, speed: f32) {
        self.pos.x = x;
        self.vel = Vec2::new(-speed, 0.0);
        self.fallen = false;
        self.passed = false;
        self.fall_timer.reset();
    }
}

/// Drifting collectible that may carry a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub alive: bool,
    /// Index into the question pool drawn at spawn time
    pub question: Option<usize>,
    /// Touched by the player
    pub hit: bool,
}

impl Bubble {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Stationary decorative trigger that starts the ending once it has animated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    pub pos: Vec2,
    pub size: Vec2,
    /// Animation index, 0..=DOG_LAST_FRAME, never decreases
    pub frame: u8,
    pub timer: Elapsed,
    pub triggered: bool,
    pub finished: bool,
}

impl Default for Dog {
    fn default() -> Self {
        Self {
            pos: Vec2::new(DOG_X, DOG_Y),
            size: Vec2::new(DOG_WIDTH, DOG_HEIGHT),
            frame: 0,
            timer: Elapsed::default(),
            triggered: false,
            finished: false,
        }
    }
}

impl Dog {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Events produced during a frame, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    SessionStarted,
    ReturnedToTitle,
    GreetingStarted,
    GreetingFinished,
    RunnersEnabled,
    RunnerHit { id: u32 },
    BubbleCollected { id: u32, question: Option<usize> },
    BonusHeart,
    QuizOpened { question: usize },
    QuizAnswered { question: usize, correct: bool },
    EndingStarted { reason: EndReason, tier: EndingTier },
}

/// Session transitions requested during a frame, applied at the start of the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionTransition {
    /// Fresh session in play mode
    Restart,
    /// Back to the start screen
    ReturnToTitle,
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub content: Content,

    pub mode: Mode,
    /// Suspends physics, entities and the countdown
    pub paused: bool,
    pub title: TitleMenu,

    pub player: Player,
    pub companion: Companion,
    pub dog: Dog,
    pub tiles: Vec<Rect>,
    pub camera_x: f32,

    pub runners: Vec<Runner>,
    pub runners_enabled: bool,
    /// Continuous forward movement since the greeting ended
    pub forward_timer: Elapsed,

    pub bubbles: Vec<Bubble>,
    pub bubble_spawn_timer: Elapsed,
    pub last_bubble_spawn_x: Option<f32>,
    pub deck: QuestionDeck,
    /// Question waiting for the player to land
    pub pending_question: Option<usize>,

    /// Dialogue, quiz or popup currently on screen
    pub overlay: Overlay,
    /// Greeting has been triggered this session
    pub greeted: bool,
    /// Greeting script has run to completion
    pub greeting_complete: bool,

    pub resources: Resources,
    pub ending: Option<EndingState>,

    /// Held keys from the previous frame (for press edges)
    pub prev_input: TickInput,
    /// Simulated time since the state was created (ms)
    pub time_ms: f64,
    pub events: Vec<GameEvent>,
    pub pending_transition: Option<SessionTransition>,
    next_id: u32,
}

impl GameState {
    /// Create a state on the title screen
    pub fn new(seed: u64, tuning: Tuning, content: Content) -> Self {
        let resources = Resources::new(&tuning);
        let deck = QuestionDeck::new(content.questions.len());
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            content,
            mode: Mode::Title,
            paused: false,
            title: TitleMenu::default(),
            player: Player::default(),
            companion: Companion::default(),
            dog: Dog::default(),
            tiles: Vec::new(),
            camera_x: 0.0,
            runners: Vec::new(),
            runners_enabled: false,
            forward_timer: Elapsed::default(),
            bubbles: Vec::new(),
            bubble_spawn_timer: Elapsed::default(),
            last_bubble_spawn_x: None,
            deck,
            pending_question: None,
            overlay: Overlay::None,
            greeted: false,
            greeting_complete: false,
            resources,
            ending: None,
            prev_input: TickInput::default(),
            time_ms: 0.0,
            events: Vec::new(),
            pending_transition: None,
            next_id: 1,
        };
        state.reset_world();
        state
    }

    /// Title-screen state with default tuning and built-in content
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, Tuning::default(), Content::builtin())
    }

    /// State already in play mode (skips the title screen)
    pub fn new_session(seed: u64, tuning: Tuning, content: Content) -> Self {
        let mut state = Self::new(seed, tuning, content);
        state.start_session();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rebuild every per-session value; RNG, tuning and content survive
    fn reset_world(&mut self) {
        self.paused = false;
        self.player = Player::default();
        self.companion = Companion::default();
        self.dog = Dog::default();
        self.tiles = ground_tiles();
        self.camera_x = super::physics::camera_target(&self.player);

        self.runners_enabled = false;
        self.forward_timer.reset();
        self.runners.clear();
        for offset in RUNNER_PARK_OFFSETS {
            let id = self.next_entity_id();
            self.runners
                .push(Runner::parked(id, RIGHT_WALL_X + offset, self.tuning.runner_speed));
        }

        self.deck = QuestionDeck::new(self.content.questions.len());
        self.pending_question = None;
        self.bubbles.clear();
        self.bubble_spawn_timer.reset();
        self.last_bubble_spawn_x = None;
        for &(x, y) in BUBBLE_SEED_POSITIONS.iter() {
            let question = self.deck.draw(&mut self.rng);
            super::spawn::spawn_bubble(self, x, y, question);
        }

        self.overlay = Overlay::None;
        self.greeted = false;
        self.greeting_complete = false;
        self.resources = Resources::new(&self.tuning);
        self.ending = None;
        self.prev_input = TickInput::default();
    }

    /// Begin a fresh session in play mode
    pub fn start_session(&mut self) {
        self.reset_world();
        self.mode = Mode::Play;
        self.emit(GameEvent::SessionStarted);
        log::info!(
            "Session started: {} hearts, {:.0}s on the clock",
            self.resources.hearts(),
            self.resources.countdown_ms() / 1000.0
        );
    }

    /// Reset everything and show the start screen
    pub fn return_to_title(&mut self) {
        self.reset_world();
        self.mode = Mode::Title;
        self.title = TitleMenu::default();
        self.emit(GameEvent::ReturnedToTitle);
        log::info!("Returned to title screen");
    }

    /// Ask for a restart / title return at the start of the next frame
    pub fn request(&mut self, transition: SessionTransition) {
        if self.pending_transition.is_none() {
            log::debug!("Session transition requested: {:?}", transition);
            self.pending_transition = Some(transition);
        }
    }

    /// Apply a requested transition; returns true if one was applied
    pub fn apply_pending_transition(&mut self) -> bool {
        match self.pending_transition.take() {
            Some(SessionTransition::Restart) => {
                self.start_session();
                true
            }
            Some(SessionTransition::ReturnToTitle) => {
                self.return_to_title();
                true
            }
            None => false,
        }
    }

    /// End the session explicitly (same path as the in-game triggers)
    pub fn end_session(&mut self) {
        super::ending::trigger(self, EndReason::Requested);
    }

    /// Any dialogue, quiz or popup is open
    pub fn in_dialogue(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of bubbles currently alive
    pub fn alive_bubbles(&self) -> usize {
        self.bubbles.iter().filter(|b| b.alive).count()
    }
}

/// Ground tiles across the whole world
pub fn ground_tiles() -> Vec<Rect> {
    let count = (WORLD_WIDTH / TILE_WIDTH).ceil() as usize;
    (0..count)
        .map(|i| {
            Rect::new(
                Vec2::new(i as f32 * TILE_WIDTH, GROUND_Y),
                Vec2::new(TILE_WIDTH, TILE_HEIGHT),
            )
        })
        .collect()
}
