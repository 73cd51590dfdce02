//! Egg Patrol - A 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hero, eggs, enemies, waypoints, coordinator)
//! - `renderer`: WebGPU rendering pipeline
//! - `hud`: HUD text derived from game state
//! - `tuning`: Data-driven game balance

pub mod hud;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use hud::HudLines;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
#[inline]
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to_target = target - current;
    let dist = to_target.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + to_target / dist * max_delta
    }
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp_clamped(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from.lerp(to, t.clamp(0.0, 1.0))
}
