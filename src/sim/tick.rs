//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision;
use super::state::{ControlMode, EntityId, GameEvent, GameState};
use super::targeting;
use crate::{lerp_clamped, move_towards};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard movement axis, each component in [-1, 1]
    pub move_axis: Vec2,
    /// Pointer position in world coordinates (mouse control)
    pub pointer: Option<Vec2>,
    /// Fire held
    pub fire: bool,
    /// Switch keyboard/mouse control
    pub toggle_control: bool,
    /// Pause toggle
    pub toggle_pause: bool,
    /// Show/hide waypoints
    pub toggle_waypoints: bool,
    /// Switch sequential/random patrols
    pub toggle_enemy_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.toggle_pause {
        state.toggle_pause();
    }

    // Coordinator toggles and control switching keep working while paused
    if input.toggle_waypoints {
        state.toggle_waypoints_visibility();
    }
    if input.toggle_enemy_mode {
        state.toggle_enemy_mode();
    }
    if input.toggle_control {
        state.toggle_control_mode();
    }

    // Top up the population one enemy per tick
    if state.enemies.len() < state.tuning.enemy.max_enemies {
        state.spawn_enemy();
    }

    // Time is frozen while paused
    if state.paused {
        return;
    }

    state.time += dt;

    move_hero(state, input, dt);

    if input.fire && state.time >= state.hero.next_fire_time {
        state.fire_egg();
        state.hero.next_fire_time = state.time + state.tuning.hero.fire_interval;
    }

    advance_eggs(state, dt);
    advance_enemies(state, dt);

    resolve_egg_enemy_hits(state);
    resolve_egg_waypoint_hits(state);
    resolve_hero_contacts(state);
}

fn move_hero(state: &mut GameState, input: &TickInput, dt: f32) {
    let speed = state.tuning.hero.speed;
    let hero = &mut state.hero;
    match hero.control {
        ControlMode::Keyboard => {
            let axis = input.move_axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
            hero.pos += axis * speed * dt;
        }
        ControlMode::Mouse => {
            if let Some(pointer) = input.pointer {
                hero.pos = lerp_clamped(hero.pos, pointer, speed * dt);
            }
        }
    }
}

fn advance_eggs(state: &mut GameState, dt: f32) {
    let speed = state.tuning.egg.speed;
    let lifetime = state.tuning.egg.lifetime;

    for egg in &mut state.eggs {
        egg.pos += egg.dir * speed * dt;
        egg.age += dt;
    }

    let events = &mut state.events;
    state.eggs.retain(|egg| {
        let alive = egg.age < lifetime;
        if !alive {
            events.push(GameEvent::EggExpired { id: egg.id });
        }
        alive
    });
}

fn advance_enemies(state: &mut GameState, dt: f32) {
    let step = state.tuning.enemy.speed * dt;
    let tolerance = state.tuning.enemy.arrive_tolerance;

    for i in 0..state.enemies.len() {
        let Some(target) = state.enemies[i].target else {
            continue;
        };
        let Some(target_pos) = state.waypoint(target).map(|w| w.pos) else {
            log::warn!("{} lost its waypoint {}", state.enemies[i].name, target);
            state.enemies[i].target = None;
            continue;
        };

        let enemy = &mut state.enemies[i];
        enemy.pos = move_towards(enemy.pos, target_pos, step);

        if enemy.pos.distance(target_pos) < tolerance {
            let next = targeting::next_waypoint(
                &state.waypoints,
                Some(target),
                state.enemy_mode,
                &mut state.rng,
            );
            state.enemies[i].set_target(next, &state.waypoints);
        }
    }
}

/// Eggs that touch an enemy are spent and damage it
fn resolve_egg_enemy_hits(state: &mut GameState) {
    let egg_radius = state.tuning.egg.radius;
    let enemy_radius = state.tuning.enemy.radius;
    let fade = state.tuning.enemy.hit_fade;
    let mut spent: Vec<EntityId> = Vec::new();

    for egg_idx in 0..state.eggs.len() {
        let (egg_id, egg_pos) = (state.eggs[egg_idx].id, state.eggs[egg_idx].pos);
        let Some(enemy_idx) =
            collision::first_enemy_hit(egg_pos, egg_radius, &state.enemies, enemy_radius)
        else {
            continue;
        };
        spent.push(egg_id);

        let enemy = &mut state.enemies[enemy_idx];
        let killed = enemy.take_hit(fade);
        let (enemy_id, health) = (enemy.id, enemy.health);
        state.events.push(GameEvent::EnemyHit {
            id: enemy_id,
            health,
        });
        if killed {
            state.enemy_destroyed(enemy_id, false);
        }
    }

    if !spent.is_empty() {
        state.eggs.retain(|egg| !spent.contains(&egg.id));
    }
}

/// Eggs pass through waypoints, damaging each one once per entry
fn resolve_egg_waypoint_hits(state: &mut GameState) {
    let egg_radius = state.tuning.egg.radius;
    let waypoint_radius = state.tuning.waypoint.radius;

    for egg_idx in 0..state.eggs.len() {
        let egg_pos = state.eggs[egg_idx].pos;
        let contacts =
            collision::waypoint_contacts(egg_pos, egg_radius, &state.waypoints, waypoint_radius);
        let entered: Vec<EntityId> = contacts
            .iter()
            .copied()
            .filter(|id| !state.eggs[egg_idx].overlapping.contains(id))
            .collect();
        state.eggs[egg_idx].overlapping = contacts;

        for waypoint_id in entered {
            hit_waypoint(state, waypoint_id);
        }
    }
}

fn hit_waypoint(state: &mut GameState, id: EntityId) {
    let Some(wp) = state.waypoint_mut(id) else {
        return;
    };
    wp.take_hit();
    let health = wp.health;
    let label = format!("Waypoint {} Active", wp.name);

    state.events.push(GameEvent::WaypointHit { id, health });
    state.activate_focus(id, &label);

    if health <= 0 {
        state.waypoint_destroyed(id);
        state.respawn_waypoint(id);
    }
}

/// Enemies that reach the hero are destroyed on contact
fn resolve_hero_contacts(state: &mut GameState) {
    let touching = collision::enemies_touching(
        state.hero.pos,
        state.tuning.hero.radius,
        &state.enemies,
        state.tuning.enemy.radius,
    );
    for id in touching {
        log::info!("Enemy {} touched the hero", id);
        state.enemy_destroyed(id, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::Enemy;
    use crate::sim::targeting::WaypointMode;
    use crate::tuning::{Tuning, WaypointSpec};

    fn tuning(max_enemies: usize) -> Tuning {
        let mut tuning = Tuning::default();
        tuning.enemy.max_enemies = max_enemies;
        tuning
    }

    /// Empty arena with one enemy placed by hand
    fn place_enemy(state: &mut GameState, pos: Vec2) -> EntityId {
        let id = state.next_entity_id();
        let mut enemy = Enemy::new(id, pos, state.tuning.enemy.health);
        enemy.target = None;
        state.enemies.push(enemy);
        id
    }

    #[test]
    fn test_population_refills_one_per_tick() {
        let mut state = GameState::new(7, tuning(3));
        let ids: Vec<_> = state.enemies.iter().map(|e| e.id).collect();
        for id in &ids {
            state.enemy_destroyed(*id, false);
        }
        assert_eq!(state.enemies.len(), 0);

        // Keep the hero well away from spawns
        state.hero.pos = Vec2::new(1000.0, 1000.0);
        let input = TickInput::default();
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.enemies.len(), 1);
        tick(&mut state, &input, SIM_DT);
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.enemies.len(), 3);
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.enemies_destroyed, 3);
    }

    #[test]
    fn test_pause_freezes_time_but_refills() {
        let mut state = GameState::new(7, tuning(2));
        state.hero.pos = Vec2::new(1000.0, 1000.0);
        let pause = TickInput {
            toggle_pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert!(state.paused);
        assert!(state.events.contains(&GameEvent::Paused));

        let id = state.enemies[0].id;
        state.enemy_destroyed(id, false);
        let before: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();

        let fire = TickInput {
            fire: true,
            move_axis: Vec2::X,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.time, 0.0);
        assert!(state.eggs.is_empty());
        assert_eq!(state.hero.pos, Vec2::new(1000.0, 1000.0));
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.enemies[0].pos, before[0]);

        tick(&mut state, &pause, SIM_DT);
        assert!(!state.paused);
        assert!(state.time > 0.0);
    }

    #[test]
    fn test_keyboard_and_mouse_movement() {
        let mut state = GameState::new(1, tuning(0));
        let input = TickInput {
            move_axis: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        tick(&mut state, &input, 0.5);
        assert!((state.hero.pos.x - 2.5).abs() < 1e-5);

        let toggle = TickInput {
            toggle_control: true,
            pointer: Some(Vec2::new(2.5, 10.0)),
            ..Default::default()
        };
        tick(&mut state, &toggle, 0.1);
        assert_eq!(state.hero.control, ControlMode::Mouse);
        // lerp factor speed * dt = 0.5: halfway to the pointer
        assert!((state.hero.pos.y - 5.0).abs() < 1e-4);

        // Without a pointer the hero stays put
        let idle = TickInput::default();
        let before = state.hero.pos;
        tick(&mut state, &idle, 0.1);
        assert_eq!(state.hero.pos, before);
    }

    #[test]
    fn test_fire_rate_limited() {
        let mut t = tuning(0);
        t.hero.fire_interval = 0.25;
        let mut state = GameState::new(1, t);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        // Ten ticks of 1/16 s with a 0.25 s interval: fires on ticks 1, 5 and 9
        for _ in 0..10 {
            tick(&mut state, &fire, 0.0625);
        }
        let fired = state.eggs.len();
        assert_eq!(fired, 3);
        assert!(state.eggs.iter().all(|e| e.dir == Vec2::Y));
        assert!(state.remaining_fire_cooldown() > 0.0);
    }

    #[test]
    fn test_eggs_expire_after_lifetime() {
        let mut state = GameState::new(1, tuning(0));
        state.waypoints.clear();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, 0.1);
        assert_eq!(state.eggs.len(), 1);

        let idle = TickInput::default();
        for _ in 0..60 {
            tick(&mut state, &idle, 0.1);
        }
        assert!(state.eggs.is_empty());
    }

    #[test]
    fn test_egg_kills_enemy_after_four_hits() {
        let mut state = GameState::new(1, tuning(0));
        state.waypoints.clear();
        let enemy_id = place_enemy(&mut state, Vec2::new(0.0, 10.0));

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut hits = 0;
        for _ in 0..600 {
            tick(&mut state, &fire, SIM_DT);
            hits += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyHit { .. }))
                .count();
            if state.enemy(enemy_id).is_none() {
                break;
            }
        }
        assert_eq!(hits, 4);
        assert!(state.enemy(enemy_id).is_none());
        assert_eq!(state.enemies_destroyed, 1);
    }

    #[test]
    fn test_enemy_touching_hero_is_destroyed_once() {
        let mut state = GameState::new(1, tuning(0));
        state.waypoints.clear();
        let id = place_enemy(&mut state, Vec2::new(0.5, 0.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemy(id).is_none());
        assert_eq!(state.enemies_destroyed, 1);
        assert!(state.events.contains(&GameEvent::EnemyDestroyed { id, by_hero: true }));
    }

    #[test]
    fn test_enemy_patrols_sequentially() {
        let mut t = tuning(0);
        t.waypoint.layout = vec![
            WaypointSpec::new("A", 10.0, 0.0),
            WaypointSpec::new("B", 20.0, 0.0),
        ];
        t.enemy.speed = 100.0;
        let mut state = GameState::new(1, t);
        state.hero.pos = Vec2::new(-1000.0, 0.0);
        let a = state.waypoints[0].id;
        let b = state.waypoints[1].id;

        let id = place_enemy(&mut state, Vec2::ZERO);
        let first = state.next_waypoint(None);
        state.enemies[0].set_target(first, &state.waypoints);
        assert_eq!(state.enemy(id).unwrap().target, Some(a));

        // 10 units at 100/s: arrives within a tenth of a second
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.enemy(id).unwrap().target, Some(b));
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.enemy(id).unwrap().target, Some(a));
    }

    #[test]
    fn test_egg_hits_waypoint_once_per_entry_and_focuses() {
        let mut t = tuning(0);
        t.waypoint.layout = vec![WaypointSpec::new("A", 0.0, 5.0)];
        let mut state = GameState::new(1, t);
        let a = state.waypoints[0].id;

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        let idle = TickInput::default();
        for _ in 0..60 {
            tick(&mut state, &idle, SIM_DT);
        }

        let wp = state.waypoint(a).unwrap();
        assert_eq!(wp.hits, 1);
        assert_eq!(wp.health, 3);
        assert_eq!(state.focus, Some(a));
        assert!(wp.camera.enabled);
        assert_eq!(wp.camera.label, "Waypoint A Active");
        // The egg flew on through the waypoint
        assert_eq!(state.eggs.len(), 1);
    }

    #[test]
    fn test_waypoint_capture_respawns_and_drops_focus() {
        let mut t = tuning(0);
        t.waypoint.layout = vec![WaypointSpec::new("A", 0.0, 5.0)];
        let mut state = GameState::new(1, t);
        let a = state.waypoints[0].id;

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut captured = false;
        for _ in 0..300 {
            tick(&mut state, &fire, SIM_DT);
            if state.events.contains(&GameEvent::WaypointCaptured { id: a }) {
                captured = true;
                break;
            }
        }
        assert!(captured);
        let wp = state.waypoint(a).unwrap();
        assert_eq!(wp.health, wp.max_health);
        assert_eq!(wp.hits, 0);
        assert_eq!(state.focus, None);
        assert!(!wp.camera.enabled);
    }

    #[test]
    fn test_hidden_waypoints_are_not_hit() {
        let mut t = tuning(0);
        t.waypoint.layout = vec![WaypointSpec::new("A", 0.0, 5.0)];
        let mut state = GameState::new(1, t);
        let a = state.waypoints[0].id;

        let hide = TickInput {
            toggle_waypoints: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &hide, SIM_DT);
        assert!(!state.waypoints_visible);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.waypoint(a).unwrap().hits, 0);
        assert_eq!(state.focus, None);
    }

    #[test]
    fn test_enemy_mode_toggle_applies_while_paused() {
        let mut state = GameState::new(3, tuning(4));
        state.hero.pos = Vec2::new(1000.0, 1000.0);
        let input = TickInput {
            toggle_pause: true,
            toggle_enemy_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.paused);
        assert_eq!(state.enemy_mode, WaypointMode::Random);
        assert!(state.events.contains(&GameEvent::EnemyModeChanged(WaypointMode::Random)));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        let inputs = [
            TickInput {
                fire: true,
                move_axis: Vec2::new(0.3, 0.0),
                ..Default::default()
            },
            TickInput {
                toggle_enemy_mode: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.enemies_destroyed, state2.enemies_destroyed);
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.target, b.target);
        }
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn population_never_exceeds_cap(
                seed in any::<u64>(),
                cap in 1usize..8,
                script in proptest::collection::vec((any::<bool>(), -1.0f32..1.0, -1.0f32..1.0), 1..120),
            ) {
                let mut state = GameState::new(seed, tuning(cap));
                prop_assert!(state.enemies.len() <= cap);

                for (fire, x, y) in script {
                    let input = TickInput {
                        fire,
                        move_axis: Vec2::new(x, y),
                        ..Default::default()
                    };
                    tick(&mut state, &input, SIM_DT);
                    prop_assert!(state.enemies.len() <= cap);
                    // Stable iteration order by id
                    prop_assert!(state.enemies.windows(2).all(|w| w[0].id < w[1].id));
                }
            }
        }
    }
}
