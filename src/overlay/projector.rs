//! World-to-screen projection

use crate::core::types::{Matrix4x4, Vector3};

/// Points whose clip-space `w` falls below this are behind the camera
pub const MIN_CLIP_W: f32 = 0.0001;

/// Converts world coordinates into overlay pixels
///
/// Holds the last view-projection matrix read from the target and the
/// current viewport. A stale matrix is valid input; the projector never
/// validates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projector {
    projection: Matrix4x4,
    width: i32,
    height: i32,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the view-projection matrix
    pub fn set_projection(&mut self, matrix: Matrix4x4) {
        self.projection = matrix;
    }

    /// Set the overlay size; the frame bridge calls this every frame
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub fn projection(&self) -> &Matrix4x4 {
        &self.projection
    }

    pub fn viewport(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Project a world-space point
    ///
    /// Returns `None` when the point is behind the camera. Otherwise `x` and
    /// `y` are pixels and `z` carries the clip-space `w`. The viewport is
    /// halved with integer division, so odd sizes round the center down.
    pub fn world_to_screen(&self, point: Vector3) -> Option<Vector3> {
        let m = &self.projection.m;
        let Vector3 { x, y, z } = point;

        let w = m[0][3] * x + m[1][3] * y + (m[2][3] * z + m[3][3]);
        if w < MIN_CLIP_W {
            return None;
        }

        let clip_x = m[0][0] * x + m[1][0] * y + (m[2][0] * z + m[3][0]);
        let clip_y = m[0][1] * x + m[1][1] * y + (m[2][1] * z + m[3][1]);

        let half_w = (self.width / 2) as f32;
        let half_h = (self.height / 2) as f32;

        Some(Vector3::new(
            half_w + half_w * clip_x / w,
            half_h - half_h * clip_y / w,
            w,
        ))
    }

    /// Whether a projected point lands inside the viewport
    pub fn is_on_screen(&self, screen: Vector3) -> bool {
        screen.x >= 0.0
            && screen.y >= 0.0
            && screen.x <= self.width as f32
            && screen.y <= self.height as f32
    }
}
