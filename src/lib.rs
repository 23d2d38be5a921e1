//! Riverside Vignette - simulation core for a side-scrolling quiz vignette
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, entities, dialogue, quiz, endings)
//! - `content`: Question pool, scripted dialogue and ending captions
//! - `tuning`: Data-driven gameplay constants
//! - `settings`: Player preferences (audio, seed)
//! - `assets`: Typed asset registry with declared fallbacks
//! - `audio`: Sink for the symbolic sound cues the simulation emits

pub mod assets;
pub mod audio;
pub mod content;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use content::Content;
pub use settings::Settings;
pub use tuning::Tuning;

/// World geometry and fixed physics constants
///
/// Velocities are in pixels per reference frame (60 Hz); the simulation
/// scales every step by `dt / REFERENCE_FRAME_MS`.
pub mod consts {
    /// Duration of one reference frame in milliseconds
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// dt reported for the very first frame (no previous timestamp)
    pub const FIRST_FRAME_MS: f32 = 16.0;

    /// Visible viewport
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 450.0;

    /// World bounds
    pub const WORLD_WIDTH: f32 = 4000.0;
    pub const WORLD_HEIGHT: f32 = 1024.0;
    /// Invisible walls
    pub const LEFT_WALL_X: f32 = 400.0;
    pub const RIGHT_WALL_X: f32 = 3900.0;

    /// Ground tiles
    pub const TILE_WIDTH: f32 = 64.0;
    pub const TILE_HEIGHT: f32 = 32.0;
    pub const GROUND_Y: f32 = 384.0;
    /// Maximum overlap depth that still snaps a falling body onto a tile top
    pub const GROUND_SNAP_DEPTH: f32 = 20.0;

    /// Player
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 56.0;
    pub const PLAYER_START_X: f32 = LEFT_WALL_X + 20.0;
    pub const PLAYER_START_Y: f32 = 300.0;
    pub const PLAYER_WALK_SPEED: f32 = 3.0;
    pub const JUMP_VELOCITY: f32 = -10.0;
    pub const GRAVITY: f32 = 0.6;
    pub const PLAYER_ANIM_MS: f32 = 150.0;

    /// Companion
    pub const COMPANION_WIDTH: f32 = 40.0;
    pub const COMPANION_HEIGHT: f32 = 56.0;
    pub const COMPANION_START_X: f32 = 800.0;
    pub const COMPANION_Y: f32 = 328.0;
    pub const COMPANION_ANIM_MS: f32 = 180.0;

    /// Runners (obstacles)
    pub const RUNNER_WIDTH: f32 = 40.0;
    pub const RUNNER_HEIGHT: f32 = 48.0;
    pub const RUNNER_Y: f32 = 355.0;
    pub const RUNNER_ANIM_MS: f32 = 150.0;
    /// Parking offsets beyond the right wall while the population is disabled
    pub const RUNNER_PARK_OFFSETS: [f32; 2] = [800.0, 1200.0];
    /// Spawn candidate: distance beyond the right wall
    pub const RUNNER_SPAWN_WALL_OFFSET: f32 = 400.0;
    /// Spawn candidate: margin beyond the camera's right edge
    pub const RUNNER_SPAWN_VIEW_MARGIN: f32 = 200.0;
    /// A runner this far left of the camera is recycled
    pub const RUNNER_DESPAWN_MARGIN: f32 = 200.0;
    /// Horizontal spacing between runners placed in the same frame
    pub const RUNNER_STAGGER: f32 = 400.0;

    /// Bubbles (collectibles)
    pub const BUBBLE_SIZE: f32 = 48.0;
    pub const BUBBLE_SEED_POSITIONS: [(f32, f32); 3] = [(900.0, 320.0), (1300.0, 320.0), (1700.0, 320.0)];
    pub const BUBBLE_SPAWN_VIEW_MARGIN: f32 = 100.0;
    pub const BUBBLE_Y_MIN: f32 = 300.0;
    pub const BUBBLE_Y_MAX: f32 = 360.0;
    pub const BUBBLE_RESAMPLE_ATTEMPTS: u32 = 3;
    pub const BUBBLE_CULL_LEFT_MARGIN: f32 = 400.0;
    pub const BUBBLE_CULL_TOP: f32 = -200.0;

    /// Decorative trigger (dog)
    pub const DOG_X: f32 = 3063.0;
    pub const DOG_Y: f32 = 360.0;
    pub const DOG_WIDTH: f32 = 64.0;
    pub const DOG_HEIGHT: f32 = 40.0;
    pub const DOG_FRAME_MS: f32 = 180.0;
    pub const DOG_LAST_FRAME: u8 = 3;

    /// Background scrolls at half the camera speed
    pub const PARALLAX_FACTOR: f32 = 0.5;
}
