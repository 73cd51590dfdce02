//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        push_quad(&mut vertices, inner1, outer1, inner2, outer2, color);
    }

    vertices
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(center: Vec2, half_size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let min = center - half_size;
    let max = center + half_size;
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        min,
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        max,
        color,
    );
    vertices
}

/// Generate vertices for a thick line segment
pub fn segment(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        from + perp,
        from - perp,
        to + perp,
        to - perp,
        color,
    );
    vertices
}

/// Outline of an axis-aligned rectangle
pub fn rect_outline(center: Vec2, half_size: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let min = center - half_size;
    let max = center + half_size;
    let corners = [
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    ];

    let mut vertices = Vec::with_capacity(24);
    for i in 0..corners.len() {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        vertices.extend(segment(a, b, width, color));
    }
    vertices
}

/// Two triangles covering the quad a1-b1-a2-b2 (a/b are opposite edges)
fn push_quad(vertices: &mut Vec<Vertex>, a1: Vec2, b1: Vec2, a2: Vec2, b2: Vec2, color: [f32; 4]) {
    vertices.push(Vertex::new(a1.x, a1.y, color));
    vertices.push(Vertex::new(b1.x, b1.y, color));
    vertices.push(Vertex::new(a2.x, a2.y, color));

    vertices.push(Vertex::new(a2.x, a2.y, color));
    vertices.push(Vertex::new(b1.x, b1.y, color));
    vertices.push(Vertex::new(b2.x, b2.y, color));
}
