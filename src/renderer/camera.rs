//! World-to-screen mapping for the main view and the focus inset

use glam::Vec2;

/// Zoom applied to the focus inset relative to the main view
pub const INSET_ZOOM: f32 = 3.0;

/// Orthographic 2D camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    /// Half width/height of world space that must stay visible
    pub half_extents: Vec2,
}

impl Camera {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Camera centred on `target`, zoomed in from `half_extents`
    pub fn focused(target: Vec2, half_extents: Vec2, zoom: f32) -> Self {
        Self::new(target, half_extents / zoom.max(f32::EPSILON))
    }

    /// World units to NDC scale for a viewport of the given aspect (w / h)
    ///
    /// The whole of `half_extents` stays visible; the spare axis gets extra room.
    fn scale(&self, aspect: f32) -> Vec2 {
        let view_aspect = self.half_extents.x / self.half_extents.y;
        if aspect > view_aspect {
            // Wider than the view: fit height
            let sy = 1.0 / self.half_extents.y;
            Vec2::new(sy / aspect, sy)
        } else {
            // Taller than the view: fit width
            let sx = 1.0 / self.half_extents.x;
            Vec2::new(sx, sx * aspect)
        }
    }

    /// Convert a world position to normalized device coordinates
    pub fn world_to_ndc(&self, world: Vec2, aspect: f32) -> Vec2 {
        (world - self.center) * self.scale(aspect)
    }

    /// Convert a pixel position (origin top-left) to world coordinates
    pub fn screen_to_world(&self, screen: Vec2, size: Vec2) -> Vec2 {
        let aspect = size.x / size.y;
        let ndc = Vec2::new(screen.x / size.x * 2.0 - 1.0, 1.0 - screen.y / size.y * 2.0);
        self.center + ndc / self.scale(aspect)
    }
}
