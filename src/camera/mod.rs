//! World → screen projection.
//!
//! Renderers see the camera only through [`Projection`]; [`Viewport`] is the
//! glam-backed perspective implementation.

/// Core camera struct.
pub mod core;
/// Camera bound to a pixel canvas.
pub mod viewport;

use glam::Vec3;

pub use self::core::Camera;
pub use self::viewport::Viewport;
use crate::g3d::ScreenPoint;

/// Projection state consumed by renderers.
pub trait Projection {
    /// Project to float screen coordinates (x, y pixels; z depth).
    fn transform_point_f(&self, p: Vec3) -> Vec3;

    /// Rotate a direction into view space; +z points toward the viewer.
    fn transform_vector(&self, v: Vec3) -> Vec3;

    /// Pixel width of `mad` milliangstroms at screen depth `z`.
    fn scale_to_screen(&self, z: i32, mad: i32) -> i32;

    /// Canvas size.
    fn screen_size(&self) -> (i32, i32);

    /// Project to integer screen coordinates.
    fn transform_point(&self, p: Vec3) -> ScreenPoint {
        let f = self.transform_point_f(p);
        ScreenPoint::new(f.x.round() as i32, f.y.round() as i32, f.z.round() as i32)
    }

    /// Whether a projected point is within a one-screen margin of the
    /// canvas. Primitives outside it are skipped.
    fn is_in_display_range(&self, x: i32, y: i32) -> bool {
        let (w, h) = self.screen_size();
        (-w..=2 * w).contains(&x) && (-h..=2 * h).contains(&y)
    }
}
