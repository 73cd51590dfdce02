//! Trigger detection between circular bodies
//!
//! Every body in the game is a circle, so a trigger fires when two circles
//! overlap. These helpers only report contacts; the tick decides what a
//! contact means.

use glam::Vec2;

use super::state::{Enemy, EntityId, Waypoint};

/// True if two circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) <= reach * reach
}

/// Index of the first enemy (in id order) an egg overlaps
pub fn first_enemy_hit(
    egg_pos: Vec2,
    egg_radius: f32,
    enemies: &[Enemy],
    enemy_radius: f32,
) -> Option<usize> {
    enemies
        .iter()
        .position(|e| circles_overlap(egg_pos, egg_radius, e.pos, enemy_radius))
}

/// Collidable waypoints an egg overlaps
///
/// Hidden waypoints have their colliders disabled and never report contacts.
pub fn waypoint_contacts(
    egg_pos: Vec2,
    egg_radius: f32,
    waypoints: &[Waypoint],
    waypoint_radius: f32,
) -> Vec<EntityId> {
    waypoints
        .iter()
        .filter(|w| w.collidable())
        .filter(|w| circles_overlap(egg_pos, egg_radius, w.pos, waypoint_radius))
        .map(|w| w.id)
        .collect()
}

/// Enemies touching the hero
pub fn enemies_touching(
    hero_pos: Vec2,
    hero_radius: f32,
    enemies: &[Enemy],
    enemy_radius: f32,
) -> Vec<EntityId> {
    enemies
        .iter()
        .filter(|e| circles_overlap(hero_pos, hero_radius, e.pos, enemy_radius))
        .map(|e| e.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 1.0, Vec2::new(1.5, 0.0), 1.0));
        // Exactly touching counts
        assert!(circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.1, 0.0), 1.0));
    }

    #[test]
    fn test_first_enemy_hit_prefers_lowest_index() {
        let enemies = vec![
            Enemy::new(1, Vec2::new(10.0, 0.0), 4),
            Enemy::new(2, Vec2::new(0.5, 0.0), 4),
            Enemy::new(3, Vec2::new(-0.5, 0.0), 4),
        ];
        assert_eq!(first_enemy_hit(Vec2::ZERO, 0.3, &enemies, 1.0), Some(1));
        assert_eq!(first_enemy_hit(Vec2::new(0.0, 50.0), 0.3, &enemies, 1.0), None);
    }

    #[test]
    fn test_hidden_waypoints_do_not_collide() {
        let mut waypoints = vec![
            Waypoint::new(1, "A", Vec2::ZERO, 4),
            Waypoint::new(2, "B", Vec2::new(0.5, 0.0), 4),
        ];
        assert_eq!(waypoint_contacts(Vec2::ZERO, 0.3, &waypoints, 1.5), vec![1, 2]);

        waypoints[0].set_visibility(false);
        assert_eq!(waypoint_contacts(Vec2::ZERO, 0.3, &waypoints, 1.5), vec![2]);
    }

    #[test]
    fn test_enemies_touching_hero() {
        let enemies = vec![
            Enemy::new(1, Vec2::new(1.5, 0.0), 4),
            Enemy::new(2, Vec2::new(5.0, 0.0), 4),
        ];
        assert_eq!(enemies_touching(Vec2::ZERO, 1.0, &enemies, 1.0), vec![1]);
    }
}
