use glam::{Mat4, Vec3};

use super::{Camera, Projection};

/// Screen depth units per angstrom.
pub const DEPTH_SCALE: f32 = 100.0;

/// A camera bound to a pixel canvas.
#[derive(Debug, Clone)]
pub struct Viewport {
    camera: Camera,
    view: Mat4,
    width: i32,
    height: i32,
    /// Pixels per angstrom at unit depth.
    focal: f32,
}

impl Viewport {
    /// Bind `camera` to a `width` x `height` canvas.
    #[must_use]
    pub fn new(camera: Camera, width: i32, height: i32) -> Self {
        let half_fov = (camera.fovy.to_radians() / 2.0).max(1e-3);
        Self {
            view: camera.build_view(),
            focal: height.max(1) as f32 / 2.0 / half_fov.tan(),
            camera,
            width,
            height,
        }
    }

    /// The bound camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera, keeping the canvas.
    pub fn set_camera(&mut self, camera: Camera) {
        *self = Self::new(camera, self.width, self.height);
    }

    fn depth(&self, view: Vec3) -> f32 {
        (-view.z).max(self.camera.znear.max(1e-3))
    }
}

impl Projection for Viewport {
    fn transform_point_f(&self, p: Vec3) -> Vec3 {
        let v = self.view.transform_point3(p);
        let d = self.depth(v);
        Vec3::new(
            self.width as f32 / 2.0 + v.x * self.focal / d,
            self.height as f32 / 2.0 - v.y * self.focal / d,
            d * DEPTH_SCALE,
        )
    }

    fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.view.transform_vector3(v)
    }

    fn scale_to_screen(&self, z: i32, mad: i32) -> i32 {
        let d = (z.max(1) as f32 / DEPTH_SCALE).max(1e-3);
        (mad as f32 / 1000.0 * self.focal / d).round() as i32
    }

    fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CameraOptions;

    fn viewport() -> Viewport {
        let cam = Camera::framing(Vec3::ZERO, 10.0, 1.0, &CameraOptions::default());
        Viewport::new(cam, 400, 400)
    }

    #[test]
    fn target_projects_to_center() {
        let vp = viewport();
        let s = vp.transform_point(Vec3::ZERO);
        assert_eq!((s.x, s.y), (200, 200));
        assert_eq!(s.z, 3000);
    }

    #[test]
    fn screen_y_grows_downward() {
        let vp = viewport();
        let up = vp.transform_point(Vec3::Y);
        let right = vp.transform_point(Vec3::X);
        assert!(up.y < 200);
        assert!(right.x > 200);
    }

    #[test]
    fn nearer_points_have_smaller_depth_and_larger_width() {
        let vp = viewport();
        let near = vp.transform_point(Vec3::Z * 5.0);
        let far = vp.transform_point(-Vec3::Z * 5.0);
        assert!(near.z < far.z);
        assert!(vp.scale_to_screen(near.z, 1000) > vp.scale_to_screen(far.z, 1000));
    }

    #[test]
    fn vectors_toward_eye_have_positive_z() {
        let vp = viewport();
        assert!(vp.transform_vector(Vec3::Z).z > 0.99);
    }

    #[test]
    fn display_range_has_one_screen_margin() {
        let vp = viewport();
        assert!(vp.is_in_display_range(-399, 799));
        assert!(!vp.is_in_display_range(-401, 0));
    }
}
