//! Waypoint selection for patrolling enemies
//!
//! Enemies walk from waypoint to waypoint. The coordinator decides where each
//! one goes next, either cycling through the layout in order or picking at
//! random while avoiding the waypoint just reached.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, Waypoint};

/// Re-roll budget when a random pick lands on the current waypoint
pub const MAX_RANDOM_ATTEMPTS: u32 = 10;

/// How enemies choose their next waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaypointMode {
    #[default]
    Sequential,
    Random,
}

impl WaypointMode {
    pub fn toggled(self) -> Self {
        match self {
            WaypointMode::Sequential => WaypointMode::Random,
            WaypointMode::Random => WaypointMode::Sequential,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaypointMode::Sequential => "Sequential",
            WaypointMode::Random => "Random",
        }
    }
}

/// Pick the waypoint an enemy should head to after `current`
///
/// Sequential mode returns the waypoint after `current` in layout order,
/// wrapping around; an unknown or missing `current` starts at the first one.
/// Random mode picks uniformly, re-rolling up to [`MAX_RANDOM_ATTEMPTS`] times
/// to avoid returning `current` when there is any alternative.
pub fn next_waypoint<R: Rng + ?Sized>(
    waypoints: &[Waypoint],
    current: Option<EntityId>,
    mode: WaypointMode,
    rng: &mut R,
) -> Option<EntityId> {
    if waypoints.is_empty() {
        log::warn!("No waypoints defined, enemy left without a target");
        return None;
    }

    let count = waypoints.len();
    match mode {
        WaypointMode::Sequential => {
            let next = current
                .and_then(|id| waypoints.iter().position(|w| w.id == id))
                .map_or(0, |i| (i + 1) % count);
            Some(waypoints[next].id)
        }
        WaypointMode::Random => {
            let mut attempts = 0;
            loop {
                let pick = waypoints[rng.random_range(0..count)].id;
                attempts += 1;
                if Some(pick) != current || count == 1 || attempts >= MAX_RANDOM_ATTEMPTS {
                    return Some(pick);
                }
            }
        }
    }
}
