//! Builds the frame's geometry from game state, in world coordinates

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::GameState;

const CIRCLE_SEGMENTS: u32 = 24;
const EGG_SEGMENTS: u32 = 10;

/// Every visible entity, back to front
pub fn build(state: &GameState) -> Vec<Vertex> {
    let tuning = &state.tuning;
    let mut vertices = Vec::new();

    vertices.extend(shapes::rect_outline(
        Vec2::ZERO,
        tuning.view.half(),
        0.3,
        colors::VIEW_EDGE,
    ));

    for wp in state.waypoints.iter().filter(|w| w.visible) {
        let r = tuning.waypoint.radius;
        vertices.extend(shapes::circle(
            wp.pos,
            r,
            colors::faded(colors::WAYPOINT, wp.alpha()),
            CIRCLE_SEGMENTS,
        ));
        vertices.extend(shapes::ring(
            wp.pos,
            r * 0.85,
            r,
            colors::WAYPOINT_RIM,
            CIRCLE_SEGMENTS,
        ));
    }

    // Focus highlight shows even when waypoints are hidden
    if let Some(wp) = state.focus.and_then(|id| state.waypoint(id)) {
        let r = tuning.waypoint.radius;
        vertices.extend(shapes::ring(
            wp.pos,
            r * 1.2,
            r * 1.4,
            colors::FOCUS_RING,
            CIRCLE_SEGMENTS,
        ));
    }

    for enemy in &state.enemies {
        vertices.extend(shapes::circle(
            enemy.pos,
            tuning.enemy.radius,
            colors::faded(colors::ENEMY, enemy.alpha),
            CIRCLE_SEGMENTS,
        ));
    }

    for egg in &state.eggs {
        vertices.extend(shapes::circle(
            egg.pos,
            tuning.egg.radius,
            colors::EGG,
            EGG_SEGMENTS,
        ));
    }

    let hero = &state.hero;
    let r = tuning.hero.radius;
    vertices.extend(shapes::circle(hero.pos, r, colors::HERO, CIRCLE_SEGMENTS));
    vertices.extend(shapes::segment(
        hero.pos,
        hero.pos + hero.facing * r * 1.4,
        r * 0.5,
        colors::HERO_BEAK,
    ));

    vertices
}

/// Backdrop for the focus inset, covering the whole inset viewport
pub fn inset_backdrop() -> Vec<Vertex> {
    let mut vertices = shapes::rect(Vec2::ZERO, Vec2::ONE, colors::INSET_BACKGROUND);
    vertices.extend(shapes::rect_outline(
        Vec2::ZERO,
        Vec2::splat(0.98),
        0.04,
        colors::FOCUS_RING,
    ));
    vertices
}
