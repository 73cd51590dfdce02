//! Game state and core simulation types
//!
//! `GameState` is the coordinator: it owns every entity, keeps the enemy
//! population topped up, counts destructions and tracks which waypoint (if
//! any) currently holds the focus camera.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::targeting::{self, WaypointMode};
use crate::tuning::Tuning;

/// Stable identifier for eggs, enemies and waypoints
pub type EntityId = u32;

/// How the hero is steered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Axis input moves the hero at a fixed speed
    #[default]
    Keyboard,
    /// The hero eases toward the pointer
    Mouse,
}

impl ControlMode {
    pub fn toggled(self) -> Self {
        match self {
            ControlMode::Keyboard => ControlMode::Mouse,
            ControlMode::Mouse => ControlMode::Keyboard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlMode::Keyboard => "Keyboard",
            ControlMode::Mouse => "Mouse",
        }
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Hero {
    pub pos: Vec2,
    /// Unit vector eggs are fired along
    pub facing: Vec2,
    pub control: ControlMode,
    /// Game time (seconds) at which the next egg may be fired
    pub next_fire_time: f32,
}

impl Hero {
    pub fn new(control: ControlMode) -> Self {
        Self {
            pos: Vec2::ZERO,
            facing: Vec2::Y,
            control,
            next_fire_time: 0.0,
        }
    }
}

/// A projectile fired by the hero
#[derive(Debug, Clone)]
pub struct Egg {
    pub id: EntityId,
    pub pos: Vec2,
    /// Normalized travel direction
    pub dir: Vec2,
    /// Seconds since fired
    pub age: f32,
    /// Waypoints this egg currently overlaps (hits register on entry only)
    pub overlapping: Vec<EntityId>,
}

/// A patrolling enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub name: String,
    pub pos: Vec2,
    pub health: i32,
    /// Sprite opacity, faded on every hit
    pub alpha: f32,
    pub target: Option<EntityId>,
}

impl Enemy {
    pub fn new(id: EntityId, pos: Vec2, health: i32) -> Self {
        Self {
            id,
            name: format!("Enemy {id}"),
            pos,
            health,
            alpha: 1.0,
            target: None,
        }
    }

    /// Apply one egg hit. Returns true once health is exhausted.
    pub fn take_hit(&mut self, fade: f32) -> bool {
        self.health -= 1;
        self.alpha *= fade;
        log::debug!(
            "{} hit by egg. Health: {}, alpha: {:.2}",
            self.name,
            self.health,
            self.alpha
        );
        self.health <= 0
    }

    /// Restore a freshly spawned enemy
    pub fn reset(&mut self, health: i32) {
        self.health = health;
        self.alpha = 1.0;
        self.target = None;
    }

    pub fn set_target(&mut self, target: Option<EntityId>, waypoints: &[Waypoint]) {
        self.target = target;
        match target.and_then(|id| waypoints.iter().find(|w| w.id == id)) {
            Some(wp) => log::debug!("{} targeting waypoint: {}", self.name, wp.name),
            None => log::debug!("{} has no target waypoint.", self.name),
        }
    }
}

/// Per-waypoint camera shown in the focus inset
#[derive(Debug, Clone, Default)]
pub struct FocusCamera {
    pub enabled: bool,
    pub label: String,
    pub label_visible: bool,
}

/// A capturable waypoint
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub id: EntityId,
    pub name: String,
    pub pos: Vec2,
    /// Layout position respawns are scattered around
    pub home: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Egg hits since the last respawn
    pub hits: u32,
    /// Hidden waypoints are neither drawn nor hit
    pub visible: bool,
    pub camera: FocusCamera,
}

impl Waypoint {
    pub fn new(id: EntityId, name: impl Into<String>, pos: Vec2, max_health: i32) -> Self {
        Self {
            id,
            name: name.into(),
            pos,
            home: pos,
            health: max_health,
            max_health,
            hits: 0,
            visible: true,
            camera: FocusCamera::default(),
        }
    }

    /// Opacity tracks remaining health
    pub fn alpha(&self) -> f32 {
        (self.health.max(0) as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    pub fn take_hit(&mut self) {
        self.hits += 1;
        self.health -= 1;
        log::debug!(
            "Waypoint {} hit! Health: {}, hits: {}",
            self.name,
            self.health,
            self.hits
        );
    }

    pub fn reset(&mut self) {
        self.health = self.max_health;
        self.hits = 0;
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn collidable(&self) -> bool {
        self.visible
    }

    pub fn set_camera_active(&mut self, active: bool, label: &str) {
        log::debug!("{} camera active: {}, label: {:?}", self.name, active, label);
        self.camera.enabled = active;
        self.camera.label = label.to_string();
        self.camera.label_visible = active;
    }
}

/// Things that happened during a tick, for front ends to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EggFired { id: EntityId },
    EggExpired { id: EntityId },
    EnemySpawned { id: EntityId },
    EnemyHit { id: EntityId, health: i32 },
    EnemyDestroyed { id: EntityId, by_hero: bool },
    WaypointHit { id: EntityId, health: i32 },
    WaypointCaptured { id: EntityId },
    FocusChanged { id: Option<EntityId> },
    EnemyModeChanged(WaypointMode),
    ControlModeChanged(ControlMode),
    WaypointsVisibilityChanged(bool),
    Paused,
    Resumed,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    /// Scaled game time in seconds (frozen while paused)
    pub time: f32,
    pub paused: bool,
    pub waypoints_visible: bool,
    pub enemy_mode: WaypointMode,
    pub hero: Hero,
    /// Active eggs (sorted by id)
    pub eggs: Vec<Egg>,
    /// Active enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Waypoints in layout order
    pub waypoints: Vec<Waypoint>,
    /// Waypoint whose camera is currently active
    pub focus: Option<EntityId>,
    pub enemies_destroyed: u32,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create a new run: lay out waypoints, then fill the enemy population
    ///
    /// `tuning` must pass [`Tuning::validate`]; inverted spawn or respawn
    /// ranges panic inside the RNG. [`Tuning::from_json`] validates for you.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "invalid tuning: {:?}", tuning.validate());
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            paused: false,
            waypoints_visible: tuning.waypoint.start_visible,
            enemy_mode: tuning.enemy.start_mode,
            hero: Hero::new(tuning.hero.start_control),
            eggs: Vec::new(),
            enemies: Vec::new(),
            waypoints: Vec::new(),
            focus: None,
            enemies_destroyed: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        let layout = state.tuning.waypoint.layout.clone();
        let max_health = state.tuning.waypoint.max_health;
        for spec in &layout {
            let id = state.next_entity_id();
            state
                .waypoints
                .push(Waypoint::new(id, spec.name.clone(), spec.position(), max_health));
        }
        state.apply_waypoint_visibility();

        while state.enemies.len() < state.tuning.enemy.max_enemies {
            state.spawn_enemy();
        }

        log::info!(
            "Game started: seed {}, {} waypoints, {} enemies, mode {}",
            seed,
            state.waypoints.len(),
            state.enemies.len(),
            state.enemy_mode.label()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn waypoint(&self, id: EntityId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id == id)
    }

    pub fn waypoint_mut(&mut self, id: EntityId) -> Option<&mut Waypoint> {
        self.waypoints.iter_mut().find(|w| w.id == id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Choose the waypoint after `current` using the active enemy mode
    pub fn next_waypoint(&mut self, current: Option<EntityId>) -> Option<EntityId> {
        targeting::next_waypoint(&self.waypoints, current, self.enemy_mode, &mut self.rng)
    }

    /// Spawn one enemy somewhere inside the view and send it to its first waypoint
    pub fn spawn_enemy(&mut self) -> EntityId {
        let extent = self.tuning.view.half() * self.tuning.view.spawn_fraction;
        let pos = Vec2::new(
            self.rng.random_range(-extent.x..=extent.x),
            self.rng.random_range(-extent.y..=extent.y),
        );

        let id = self.next_entity_id();
        let mut enemy = Enemy::new(id, pos, self.tuning.enemy.health);
        let target = self.next_waypoint(None);
        enemy.set_target(target, &self.waypoints);

        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned { id });
        id
    }

    /// Record an enemy's destruction. Each enemy is counted at most once.
    pub fn enemy_destroyed(&mut self, id: EntityId, by_hero: bool) -> bool {
        let Some(index) = self.enemies.iter().position(|e| e.id == id) else {
            log::debug!("Enemy {} already gone, not counted again", id);
            return false;
        };
        self.enemies.remove(index);
        self.enemies_destroyed += 1;
        self.events.push(GameEvent::EnemyDestroyed { id, by_hero });
        log::info!(
            "Enemy destroyed (by hero: {}). Total: {}, active: {}",
            by_hero,
            self.enemies_destroyed,
            self.enemies.len()
        );
        true
    }

    /// A waypoint ran out of health: drop the focus if it held it
    pub fn waypoint_destroyed(&mut self, id: EntityId) {
        if self.focus == Some(id) {
            if let Some(wp) = self.waypoint_mut(id) {
                wp.set_camera_active(false, "");
            }
            self.focus = None;
            self.events.push(GameEvent::FocusChanged { id: None });
        }
        self.events.push(GameEvent::WaypointCaptured { id });
        match self.waypoint(id) {
            Some(wp) => log::info!("Waypoint {} destroyed and respawned.", wp.name),
            None => log::warn!("Destroyed waypoint {} is not registered", id),
        }
    }

    /// Switch the focus camera to `id`, turning off the previous one
    pub fn activate_focus(&mut self, id: EntityId, label: &str) {
        let previous = self.focus;
        if let Some(prev) = previous.filter(|&prev| prev != id) {
            if let Some(wp) = self.waypoint_mut(prev) {
                wp.set_camera_active(false, "");
            }
        }

        match self.waypoint_mut(id) {
            Some(wp) => {
                wp.set_camera_active(true, label);
                self.focus = Some(id);
            }
            None => {
                log::warn!("Cannot focus waypoint {}: not registered", id);
                self.focus = None;
            }
        }

        if self.focus != previous {
            self.events.push(GameEvent::FocusChanged { id: self.focus });
        }
    }

    /// Move a captured waypoint near its home, inside the central safe area
    pub fn respawn_waypoint(&mut self, id: EntityId) {
        let view_min = self.tuning.view.min();
        let view_max = self.tuning.view.max();
        let safe = (view_max - view_min) * self.tuning.waypoint.safe_fraction;
        let (lo, hi) = (view_min + safe, view_max - safe);

        let range = self.tuning.waypoint.respawn_offset;
        let offset = Vec2::new(
            self.rng.random_range(-range..=range),
            self.rng.random_range(-range..=range),
        );

        let Some(wp) = self.waypoint_mut(id) else {
            log::warn!("Cannot respawn waypoint {}: not registered", id);
            return;
        };
        wp.pos = (wp.home + offset).clamp(lo, hi);
        wp.reset();
        log::info!("Waypoint {} respawned at {}", wp.name, wp.pos);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.events.push(if self.paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
        log::info!("Game paused: {}", self.paused);
    }

    pub fn toggle_waypoints_visibility(&mut self) {
        self.waypoints_visible = !self.waypoints_visible;
        self.apply_waypoint_visibility();
        self.events
            .push(GameEvent::WaypointsVisibilityChanged(self.waypoints_visible));
        log::info!("Waypoints visible: {}", self.waypoints_visible);
    }

    fn apply_waypoint_visibility(&mut self) {
        let visible = self.waypoints_visible;
        for wp in &mut self.waypoints {
            wp.set_visibility(visible);
        }
    }

    /// Flip sequential/random and re-target every enemy from where it is headed
    pub fn toggle_enemy_mode(&mut self) {
        self.enemy_mode = self.enemy_mode.toggled();
        log::info!("Enemy mode: {}", self.enemy_mode.label());

        for i in 0..self.enemies.len() {
            let current = self.enemies[i].target;
            let next =
                targeting::next_waypoint(&self.waypoints, current, self.enemy_mode, &mut self.rng);
            self.enemies[i].set_target(next, &self.waypoints);
        }
        self.events.push(GameEvent::EnemyModeChanged(self.enemy_mode));
    }

    pub fn toggle_control_mode(&mut self) {
        self.hero.control = self.hero.control.toggled();
        self.events
            .push(GameEvent::ControlModeChanged(self.hero.control));
        log::info!("Hero mode: {}", self.hero.control.label());
    }

    /// Spawn an egg at the hero's fire point, travelling the way the hero faces
    pub fn fire_egg(&mut self) -> EntityId {
        let dir = match self.hero.facing.normalize_or_zero() {
            Vec2::ZERO => Vec2::Y,
            dir => dir,
        };
        let pos = self.hero.pos + dir * self.tuning.hero.fire_offset;
        let id = self.next_entity_id();
        self.eggs.push(Egg {
            id,
            pos,
            dir,
            age: 0.0,
            overlapping: Vec::new(),
        });
        self.events.push(GameEvent::EggFired { id });
        id
    }

    /// Seconds until the hero may fire again (0 when ready)
    pub fn remaining_fire_cooldown(&self) -> f32 {
        (self.hero.next_fire_time - self.time).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::WaypointSpec;

    fn small_tuning(max_enemies: usize) -> Tuning {
        let mut tuning = Tuning::default();
        tuning.enemy.max_enemies = max_enemies;
        tuning
    }

    #[test]
    fn test_new_fills_population_and_targets_first_waypoint() {
        let state = GameState::new(42, small_tuning(5));
        assert_eq!(state.enemies.len(), 5);
        assert_eq!(state.waypoints.len(), 6);

        let first = state.waypoints[0].id;
        assert!(state.enemies.iter().all(|e| e.target == Some(first)));

        let half = state.tuning.view.half() * state.tuning.view.spawn_fraction;
        for enemy in &state.enemies {
            assert!(enemy.pos.x.abs() <= half.x && enemy.pos.y.abs() <= half.y);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid tuning")]
    fn test_new_rejects_unvalidated_tuning() {
        let mut tuning = small_tuning(1);
        tuning.view.spawn_fraction = -1.0;
        GameState::new(1, tuning);
    }

    #[test]
    fn test_enemy_destroyed_counts_once() {
        let mut state = GameState::new(1, small_tuning(3));
        let id = state.enemies[0].id;

        assert!(state.enemy_destroyed(id, true));
        assert!(!state.enemy_destroyed(id, false));
        assert_eq!(state.enemies_destroyed, 1);
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_activate_focus_switches_cameras() {
        let mut state = GameState::new(1, small_tuning(0));
        let a = state.waypoints[0].id;
        let b = state.waypoints[1].id;

        state.activate_focus(a, "Waypoint A Active");
        assert_eq!(state.focus, Some(a));
        assert!(state.waypoint(a).unwrap().camera.enabled);
        assert_eq!(state.waypoint(a).unwrap().camera.label, "Waypoint A Active");

        state.activate_focus(b, "Waypoint B Active");
        assert_eq!(state.focus, Some(b));
        assert!(!state.waypoint(a).unwrap().camera.enabled);
        assert!(!state.waypoint(a).unwrap().camera.label_visible);
        assert!(state.waypoint(b).unwrap().camera.enabled);

        let enabled = state.waypoints.iter().filter(|w| w.camera.enabled).count();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_activate_unknown_waypoint_clears_focus() {
        let mut state = GameState::new(1, small_tuning(0));
        let a = state.waypoints[0].id;
        state.activate_focus(a, "Waypoint A Active");
        state.activate_focus(999, "nope");
        assert_eq!(state.focus, None);
        assert!(!state.waypoint(a).unwrap().camera.enabled);
    }

    #[test]
    fn test_waypoint_destroyed_releases_focus() {
        let mut state = GameState::new(1, small_tuning(0));
        let a = state.waypoints[0].id;
        let b = state.waypoints[1].id;

        state.activate_focus(a, "Waypoint A Active");
        state.waypoint_destroyed(b);
        assert_eq!(state.focus, Some(a));

        state.waypoint_destroyed(a);
        assert_eq!(state.focus, None);
        assert!(!state.waypoint(a).unwrap().camera.enabled);
        assert!(state.events.contains(&GameEvent::WaypointCaptured { id: a }));
    }

    #[test]
    fn test_respawn_stays_in_safe_area_and_resets() {
        let mut state = GameState::new(3, small_tuning(0));
        let id = state.waypoints[0].id;
        let wt = state.tuning.waypoint.clone();
        let view = state.tuning.view.clone();
        let safe = (view.max() - view.min()) * wt.safe_fraction;

        for _ in 0..50 {
            if let Some(wp) = state.waypoint_mut(id) {
                wp.take_hit();
                wp.take_hit();
            }
            state.respawn_waypoint(id);
            let wp = state.waypoint(id).unwrap();
            assert!(wp.pos.x >= view.min().x + safe.x - 1e-4);
            assert!(wp.pos.x <= view.max().x - safe.x + 1e-4);
            assert!(wp.pos.y >= view.min().y + safe.y - 1e-4);
            assert!(wp.pos.y <= view.max().y - safe.y + 1e-4);
            assert_eq!(wp.health, wt.max_health);
            assert_eq!(wp.hits, 0);
        }
    }

    #[test]
    fn test_toggle_to_sequential_advances_each_target() {
        let mut tuning = small_tuning(3);
        tuning.enemy.start_mode = WaypointMode::Random;
        tuning.waypoint.layout = vec![
            WaypointSpec::new("A", -10.0, 0.0),
            WaypointSpec::new("B", 0.0, 10.0),
            WaypointSpec::new("C", 10.0, 0.0),
        ];
        let mut state = GameState::new(5, tuning);
        let (a, b, c) = (state.waypoints[0].id, state.waypoints[1].id, state.waypoints[2].id);

        state.enemies[0].target = Some(c);
        state.enemies[1].target = Some(a);
        state.enemies[2].target = None;

        state.toggle_enemy_mode();
        assert_eq!(state.enemy_mode, WaypointMode::Sequential);
        let targets: Vec<_> = state.enemies.iter().map(|e| e.target).collect();
        // C wraps to A, A moves on to B, no target starts at A
        assert_eq!(targets, vec![Some(a), Some(b), Some(a)]);
        assert!(state.events.contains(&GameEvent::EnemyModeChanged(WaypointMode::Sequential)));
    }

    #[test]
    fn test_toggle_to_random_leaves_current_target() {
        let mut tuning = small_tuning(4);
        tuning.waypoint.layout = vec![
            WaypointSpec::new("A", -10.0, 0.0),
            WaypointSpec::new("B", 10.0, 0.0),
        ];
        let mut state = GameState::new(5, tuning);
        let a = state.waypoints[0].id;
        let b = state.waypoints[1].id;
        assert!(state.enemies.iter().all(|e| e.target == Some(a)));

        state.toggle_enemy_mode();
        assert_eq!(state.enemy_mode, WaypointMode::Random);
        // With two waypoints the only way off A is B
        assert!(state.enemies.iter().all(|e| e.target == Some(b)));
    }

    #[test]
    fn test_enemy_hits_fade_and_kill() {
        let mut enemy = Enemy::new(1, Vec2::ZERO, 4);
        assert!(!enemy.take_hit(0.8));
        assert!((enemy.alpha - 0.8).abs() < 1e-6);
        assert!(!enemy.take_hit(0.8));
        assert!(!enemy.take_hit(0.8));
        assert!(enemy.take_hit(0.8));
        assert!((enemy.alpha - 0.8f32.powi(4)).abs() < 1e-6);

        enemy.reset(4);
        assert_eq!(enemy.health, 4);
        assert_eq!(enemy.alpha, 1.0);
        assert_eq!(enemy.target, None);
    }

    #[test]
    fn test_waypoint_alpha_tracks_health() {
        let mut wp = Waypoint::new(1, "A", Vec2::ZERO, 4);
        assert_eq!(wp.alpha(), 1.0);
        wp.take_hit();
        assert!((wp.alpha() - 0.75).abs() < 1e-6);
        for _ in 0..5 {
            wp.take_hit();
        }
        assert_eq!(wp.alpha(), 0.0);
    }

    #[test]
    fn test_fire_cooldown_never_negative() {
        let mut state = GameState::new(1, small_tuning(0));
        assert_eq!(state.remaining_fire_cooldown(), 0.0);
        state.hero.next_fire_time = 0.2;
        state.time = 0.05;
        assert!((state.remaining_fire_cooldown() - 0.15).abs() < 1e-6);
        state.time = 1.0;
        assert_eq!(state.remaining_fire_cooldown(), 0.0);
    }
}
