//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be re-balanced from a JSON
//! file without touching the simulation. Missing fields fall back to defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::WaypointMode;
use crate::sim::state::ControlMode;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Hero movement and firing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroTuning {
    /// Units per second (keyboard) / lerp rate (mouse)
    pub speed: f32,
    /// Seconds between eggs while fire is held
    pub fire_interval: f32,
    /// Distance ahead of the hero where eggs appear
    pub fire_offset: f32,
    pub radius: f32,
    pub start_control: ControlMode,
}

impl Default for HeroTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            fire_interval: 0.2,
            fire_offset: 1.0,
            radius: 1.0,
            start_control: ControlMode::Keyboard,
        }
    }
}

/// Egg projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EggTuning {
    pub speed: f32,
    /// Seconds before an egg despawns on its own
    pub lifetime: f32,
    pub radius: f32,
}

impl Default for EggTuning {
    fn default() -> Self {
        Self {
            speed: 40.0,
            lifetime: 5.0,
            radius: 0.3,
        }
    }
}

/// Patrolling enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub speed: f32,
    pub health: i32,
    /// Alpha multiplier applied on every egg hit
    pub hit_fade: f32,
    /// Distance at which a waypoint counts as reached
    pub arrive_tolerance: f32,
    pub radius: f32,
    /// Population cap kept topped up by the coordinator
    pub max_enemies: usize,
    pub start_mode: WaypointMode,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            speed: 2.0,
            health: 4,
            hit_fade: 0.8,
            arrive_tolerance: 0.1,
            radius: 1.0,
            max_enemies: 10,
            start_mode: WaypointMode::Sequential,
        }
    }
}

/// A waypoint in the initial layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointSpec {
    pub name: String,
    pub pos: (f32, f32),
}

impl WaypointSpec {
    pub fn new(name: &str, x: f32, y: f32) -> Self {
        Self {
            name: name.to_string(),
            pos: (x, y),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.pos.0, self.pos.1)
    }
}

/// Capturable waypoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointTuning {
    pub max_health: i32,
    pub radius: f32,
    /// Respawn jitter range (each axis, +/-)
    pub respawn_offset: f32,
    /// Fraction of the view width/height kept clear on each side when respawning
    pub safe_fraction: f32,
    pub start_visible: bool,
    pub layout: Vec<WaypointSpec>,
}

impl Default for WaypointTuning {
    fn default() -> Self {
        Self {
            max_health: 4,
            radius: 1.5,
            respawn_offset: 15.0,
            safe_fraction: 0.4,
            start_visible: true,
            layout: vec![
                WaypointSpec::new("A", -25.0, 18.0),
                WaypointSpec::new("B", 0.0, 22.0),
                WaypointSpec::new("C", 25.0, 18.0),
                WaypointSpec::new("D", 25.0, -18.0),
                WaypointSpec::new("E", 0.0, -22.0),
                WaypointSpec::new("F", -25.0, -18.0),
            ],
        }
    }
}

/// Visible world region
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewTuning {
    /// Half width/height of the main view, centred on the origin
    pub half_extents: (f32, f32),
    /// Fraction of the half extents enemies may spawn within
    pub spawn_fraction: f32,
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            half_extents: (40.0, 30.0),
            spawn_fraction: 0.9,
        }
    }
}

impl ViewTuning {
    pub fn half(&self) -> Vec2 {
        Vec2::new(self.half_extents.0, self.half_extents.1)
    }

    pub fn min(&self) -> Vec2 {
        -self.half()
    }

    pub fn max(&self) -> Vec2 {
        self.half()
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub hero: HeroTuning,
    pub egg: EggTuning,
    pub enemy: EnemyTuning,
    pub waypoint: WaypointTuning,
    pub view: ViewTuning,
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn non_negative(field: &'static str, v: f32) -> Result<(), TuningError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("expected a non-negative number, got {v}"),
                })
            }
        }
        fn positive(field: &'static str, v: f32) -> Result<(), TuningError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("expected a positive number, got {v}"),
                })
            }
        }

        non_negative("hero.speed", self.hero.speed)?;
        non_negative("hero.fire_interval", self.hero.fire_interval)?;
        non_negative("egg.speed", self.egg.speed)?;
        positive("egg.lifetime", self.egg.lifetime)?;
        non_negative("enemy.speed", self.enemy.speed)?;
        // Arrival is a strict distance check, so zero would strand enemies on a waypoint
        positive("enemy.arrive_tolerance", self.enemy.arrive_tolerance)?;
        non_negative("waypoint.respawn_offset", self.waypoint.respawn_offset)?;
        positive("view.half_extents.0", self.view.half_extents.0)?;
        positive("view.half_extents.1", self.view.half_extents.1)?;

        if self.enemy.health <= 0 {
            return Err(TuningError::Invalid {
                field: "enemy.health",
                reason: format!("must be at least 1, got {}", self.enemy.health),
            });
        }
        if self.waypoint.max_health <= 0 {
            return Err(TuningError::Invalid {
                field: "waypoint.max_health",
                reason: format!("must be at least 1, got {}", self.waypoint.max_health),
            });
        }
        if !(0.0..=1.0).contains(&self.view.spawn_fraction) {
            return Err(TuningError::Invalid {
                field: "view.spawn_fraction",
                reason: format!("must be in [0, 1], got {}", self.view.spawn_fraction),
            });
        }
        if !(0.0..0.5).contains(&self.waypoint.safe_fraction) {
            return Err(TuningError::Invalid {
                field: "waypoint.safe_fraction",
                reason: format!("must be in [0, 0.5), got {}", self.waypoint.safe_fraction),
            });
        }

        let layout = &self.waypoint.layout;
        for (i, spec) in layout.iter().enumerate() {
            if layout[..i].iter().any(|other| other.name == spec.name) {
                return Err(TuningError::Invalid {
                    field: "waypoint.layout",
                    reason: format!("duplicate waypoint name `{}`", spec.name),
                });
            }
        }

        Ok(())
    }
}
