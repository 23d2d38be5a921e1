//! Typed asset registry
//!
//! Every asset the renderer may ask for is an `AssetId` with a declared list
//! of candidate files. The host reports which files actually loaded; lookups
//! walk the candidates in order and background lookups end in a solid fill.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::audio::SoundCue;
use crate::sim::ending::CinematicTheme;
use crate::sim::state::Facing;

/// Start the session after this long even if some assets never settled (ms)
pub const LOAD_WATCHDOG_MS: f32 = 4000.0;

/// Fill colour used when no background image is available
pub const SKY_FILL: [u8; 3] = [0xa7, 0xea, 0xff];

/// Everything the renderer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    StartBackground,
    RiversideBackground,
    EndingBackground(CinematicTheme),
    /// Cinematic frame 0..3 of a theme
    CinematicFrame(CinematicTheme, u8),
    PlayerStand,
    PlayerWalk(Facing, u8),
    CompanionStand,
    CompanionWalk(Facing, u8),
    /// Companion portrait while talking
    CompanionChat,
    RunnerRun(u8),
    RunnerFallen,
    DogFrame(u8),
    Tile,
    Bubble,
    Heart,
    Banner,
}

impl AssetId {
    /// Candidate files, most preferred first
    pub fn candidates(self) -> &'static [&'static str] {
        use CinematicTheme::*;
        use Facing::*;
        match self {
            AssetId::StartBackground => &["start_bg.png", "start_bg.jpg"],
            AssetId::RiversideBackground => &[
                "bg_riverside2.jpg",
                "bg_riverside2.png",
                "bg_riverside.jpg",
                "bg_riverside.png",
            ],
            AssetId::EndingBackground(Kiss) => &["ending1.png"],
            AssetId::EndingBackground(Cake) => &["ending2.png"],
            AssetId::EndingBackground(Angry) => &["ending3.png", "angry.jpg"],
            AssetId::CinematicFrame(theme, frame) => match (theme, frame % 3) {
                (Angry, 0) => &["angry01.png"],
                (Angry, 1) => &["angry02.png"],
                (Angry, _) => &["angry03.png"],
                (Cake, 0) => &["cake01.png"],
                (Cake, 1) => &["cake02.png"],
                (Cake, _) => &["cake03.png"],
                (Kiss, 0) => &["kiss01.png"],
                (Kiss, 1) => &["kiss02.png"],
                (Kiss, _) => &["kiss03.png"],
            },
            AssetId::PlayerStand => &["player_stand.png", "player_right.png"],
            AssetId::PlayerWalk(Right, 0) => &["player_right.png"],
            AssetId::PlayerWalk(Right, _) => &["player_right2.png", "player_right.png"],
            AssetId::PlayerWalk(Left, 0) => &["player_left.png"],
            AssetId::PlayerWalk(Left, _) => &["player_left2.png", "player_left.png"],
            AssetId::CompanionStand => &["companion_stand.png", "companion_left.png"],
            AssetId::CompanionWalk(Right, 0) => &["companion_right.png"],
            AssetId::CompanionWalk(Right, _) => &["companion_right2.png", "companion_right.png"],
            AssetId::CompanionWalk(Left, 0) => &["companion_left.png"],
            AssetId::CompanionWalk(Left, _) => &["companion_left2.png", "companion_left.png"],
            AssetId::CompanionChat => &["companion_chat_left.png", "companion chat left.png", "companion_left.png"],
            AssetId::RunnerRun(0) => &["runner_run_left.png", "RUNNER RUN LEFT.png"],
            AssetId::RunnerRun(_) => &["runner_run_left2.png", "RUNNER RUN LEFT2.png"],
            AssetId::RunnerFallen => &["runner_fall_left.png", "RUNNER FALL LEFT.png"],
            AssetId::DogFrame(0) => &["dog1.png"],
            AssetId::DogFrame(1) => &["dog 2.png", "dog2.png"],
            AssetId::DogFrame(2) => &["dog 3.png", "dog3.png"],
            AssetId::DogFrame(_) => &["dog4.png"],
            AssetId::Tile => &["tile.png"],
            AssetId::Bubble => &["bubble.png", "question.png"],
            AssetId::Heart => &["heart.png"],
            AssetId::Banner => &["banner.png"],
        }
    }

    /// Every id the renderer can request
    pub fn all() -> Vec<AssetId> {
        let themes = [CinematicTheme::Angry, CinematicTheme::Cake, CinematicTheme::Kiss];
        let mut ids = vec![
            AssetId::StartBackground,
            AssetId::RiversideBackground,
            AssetId::PlayerStand,
            AssetId::CompanionStand,
            AssetId::CompanionChat,
            AssetId::RunnerFallen,
            AssetId::Tile,
            AssetId::Bubble,
            AssetId::Heart,
            AssetId::Banner,
        ];
        for theme in themes {
            ids.push(AssetId::EndingBackground(theme));
            ids.extend((0..3).map(|f| AssetId::CinematicFrame(theme, f)));
        }
        for facing in [Facing::Left, Facing::Right] {
            ids.extend((0..2).map(|f| AssetId::PlayerWalk(facing, f)));
            ids.extend((0..2).map(|f| AssetId::CompanionWalk(facing, f)));
        }
        ids.extend((0..2).map(AssetId::RunnerRun));
        ids.extend((0..4).map(AssetId::DogFrame));
        ids
    }
}

/// Files the host should try to load, deduplicated, images then sounds
pub fn manifest() -> Vec<&'static str> {
    let mut seen = HashSet::new();
    let mut files: Vec<&'static str> = AssetId::all()
        .into_iter()
        .flat_map(|id| id.candidates().iter().copied())
        .filter(|file| seen.insert(*file))
        .collect();
    files.extend([SoundCue::Jump, SoundCue::Hit, SoundCue::Correct].map(SoundCue::file_name));
    files
}

/// How a background should be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Backdrop {
    Image(&'static str),
    Fill([u8; 3]),
}

/// Files the host managed to load
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    loaded: HashSet<String>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that pretends every manifest file loaded
    pub fn with_all_loaded() -> Self {
        let mut registry = Self::new();
        for file in manifest() {
            registry.mark_loaded(file);
        }
        registry
    }

    pub fn mark_loaded(&mut self, file: &str) {
        self.loaded.insert(file.to_string());
    }

    pub fn is_loaded(&self, file: &str) -> bool {
        self.loaded.contains(file)
    }

    /// First candidate that loaded
    pub fn resolve(&self, id: AssetId) -> Option<&'static str> {
        let found = id.candidates().iter().copied().find(|file| self.is_loaded(file));
        if found.is_none() {
            log::debug!("No loaded file for {:?}", id);
        }
        found
    }

    /// Background image, or the sky fill when none of the candidates loaded
    pub fn backdrop(&self, id: AssetId) -> Backdrop {
        match self.resolve(id) {
            Some(file) => Backdrop::Image(file),
            None => Backdrop::Fill(SKY_FILL),
        }
    }
}

/// Tracks asset loading and decides when the session may start
#[derive(Debug, Clone)]
pub struct LoadProgress {
    total: usize,
    settled: usize,
    elapsed_ms: f32,
    started: bool,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            settled: 0,
            elapsed_ms: 0.0,
            started: false,
        }
    }

    /// An asset finished loading or failed; both count as settled
    pub fn settle(&mut self) {
        self.settled = (self.settled + 1).min(self.total);
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 { 1.0 } else { self.settled as f32 / self.total as f32 }
    }

    /// Returns true exactly once: when everything settled or the watchdog expired
    pub fn poll(&mut self, dt: f32) -> bool {
        if self.started {
            return false;
        }
        self.elapsed_ms += dt;
        if self.settled >= self.total {
            self.started = true;
            log::info!("All {} assets settled", self.total);
        } else if self.elapsed_ms >= LOAD_WATCHDOG_MS {
            self.started = true;
            log::warn!(
                "Starting despite incomplete asset load ({} of {})",
                self.settled,
                self.total
            );
        }
        self.started
    }
}
