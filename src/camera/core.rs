use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Camera looking down -z at a sphere of `radius` around `center`.
    #[must_use]
    pub fn framing(
        center: Vec3,
        radius: f32,
        aspect: f32,
        opts: &CameraOptions,
    ) -> Self {
        let distance = radius.max(1.0) * opts.distance_factor.max(1.0);
        Self {
            eye: center + Vec3::Z * distance,
            target: center,
            up: Vec3::Y,
            aspect,
            fovy: opts.fovy,
            znear: opts.znear,
            zfar: opts.zfar,
        }
    }

    /// World → view transform.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Rotate the eye about the target around the view's up axis.
    pub fn orbit(&mut self, radians: f32) {
        let rot = Mat4::from_axis_angle(self.up.normalize_or(Vec3::Y), radians);
        self.eye = self.target + rot.transform_vector3(self.eye - self.target);
    }
}
