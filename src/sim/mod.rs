//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module is deterministic for a given
//! seed and sequence of `(TickInput, dt)` pairs:
//! - Seeded RNG only, owned by `GameState`
//! - Entities stored and updated in spawn order
//! - No rendering, audio or platform dependencies (sound is emitted as events)

pub mod approach;
pub mod clock;
pub mod collision;
pub mod dialogue;
pub mod ending;
pub mod physics;
pub mod quiz;
pub mod resources;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod title;
pub mod trigger;
pub mod view;

pub use clock::FrameClock;
pub use collision::Rect;
pub use dialogue::{DialogueInput, GreetingPhase, Overlay};
pub use ending::{CinematicTheme, EndReason, EndingPhase, EndingState, EndingTier};
pub use quiz::{QuestionDeck, QuizSession};
pub use resources::Resources;
pub use state::{
    Bubble, Companion, Dog, Facing, GameEvent, GameState, Mode, Player, Runner, SessionTransition,
};
pub use tick::{Controls, TickInput, tick};
pub use title::TitleItem;
pub use view::FrameView;
