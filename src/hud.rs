//! HUD text derived from game state
//!
//! Front ends bind these strings to whatever text widgets they have.

use crate::sim::GameState;

/// One frame's worth of HUD text
#[derive(Debug, Clone, PartialEq)]
pub struct HudLines {
    pub hero_mode: String,
    pub egg_count: String,
    pub enemy_count: String,
    pub enemies_destroyed: String,
    pub enemy_mode: String,
    pub waypoints: String,
    pub egg_cooldown: String,
    pub paused: bool,
    /// Label of the active focus camera, if its label is showing
    pub focus_label: Option<String>,
}

impl HudLines {
    pub fn from_state(state: &GameState) -> Self {
        let cooldown = state.remaining_fire_cooldown();
        let focus_label = state
            .focus
            .and_then(|id| state.waypoint(id))
            .filter(|wp| wp.camera.label_visible)
            .map(|wp| wp.camera.label.clone());

        Self {
            hero_mode: format!("Hero Mode: {}", state.hero.control.label()),
            egg_count: "Eggs: Infinite".to_string(),
            enemy_count: format!("Enemies: {}", state.enemies.len()),
            enemies_destroyed: format!("Destroyed: {}", state.enemies_destroyed),
            enemy_mode: format!("Enemy Mode: {}", state.enemy_mode.label()),
            waypoints: format!(
                "Waypoints: {}",
                if state.waypoints_visible { "Shown" } else { "Hidden" }
            ),
            egg_cooldown: if cooldown > 0.0 {
                format!("Egg CD: {:.1}s", cooldown)
            } else {
                "Egg CD: Ready".to_string()
            },
            paused: state.paused,
            focus_label,
        }
    }

    /// All status lines in display order
    pub fn lines(&self) -> [&str; 7] {
        [
            self.hero_mode.as_str(),
            self.egg_count.as_str(),
            self.enemy_count.as_str(),
            self.enemies_destroyed.as_str(),
            self.enemy_mode.as_str(),
            self.waypoints.as_str(),
            self.egg_cooldown.as_str(),
        ]
    }
}
