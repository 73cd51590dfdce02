//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod targeting;
pub mod tick;

pub use collision::{circles_overlap, enemies_touching, first_enemy_hit, waypoint_contacts};
pub use state::{
    ControlMode, Egg, Enemy, EntityId, FocusCamera, GameEvent, GameState, Hero, Waypoint,
};
pub use targeting::{WaypointMode, next_waypoint};
pub use tick::{TickInput, tick};
