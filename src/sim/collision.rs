//! Axis-aligned collision tests and ground resolution
//!
//! Every entity is a box; overlap is strict, so touching edges do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GROUND_SNAP_DEPTH;

/// Axis-aligned rectangle (top-left corner + size), y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict overlap test
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.right()
            && self.right() > other.min.x
            && self.min.y < other.bottom()
            && self.bottom() > other.min.y
    }

    /// Strict horizontal overlap only
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.min.x < other.right() && self.right() > other.min.x
    }
}

/// Outcome of resolving a body against the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Corrected top-left y of the body
    pub y: f32,
    pub on_ground: bool,
}

/// Snap a falling body onto the first tile it sinks into by less than the snap depth
///
/// Only descending bodies (`vel_y > 0`) are resolved; a body moving up or
/// resting passes through unchanged and is reported airborne.
pub fn resolve_ground(body: Rect, vel_y: f32, tiles: &[Rect]) -> GroundContact {
    if vel_y > 0.0 {
        for tile in tiles {
            if !body.intersects(tile) {
                continue;
            }
            let depth = body.bottom() - tile.min.y;
            if depth < GROUND_SNAP_DEPTH {
                return GroundContact {
                    y: tile.min.y - body.size.y,
                    on_ground: true,
                };
            }
        }
    }
    GroundContact {
        y: body.min.y,
        on_ground: false,
    }
}

/// Player collides with a runner unless its feet are above the runner's top
/// minus the jump clearance
pub fn runner_contact(player: &Rect, runner: &Rect, clearance: f32) -> bool {
    player.overlaps_x(runner) && player.bottom() > runner.min.y - clearance
}

/// Player's right edge has moved past the runner's right edge
pub fn passed_runner(player: &Rect, runner: &Rect) -> bool {
    player.right() > runner.right()
}
