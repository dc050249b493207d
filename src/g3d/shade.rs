//! Flat shade computation for faces the backend cannot shade from normixes.

use glam::Vec3;

use super::ScreenPoint;
use crate::options::LightingOptions;

/// Discrete intensity level, 0 = darkest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Shade(pub u8);

/// Directional light in screen orientation (+z toward the viewer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    direction: Vec3,
    ambient: f32,
    diffuse: f32,
    levels: u8,
}

impl Lighting {
    /// Build from options; a zero direction falls back to head-on light.
    #[must_use]
    pub fn from_options(opts: &LightingOptions) -> Self {
        let d = Vec3::from_array(opts.light_direction);
        Self {
            direction: d.try_normalize().unwrap_or(Vec3::Z),
            ambient: opts.ambient.clamp(0.0, 1.0),
            diffuse: opts.diffuse.clamp(0.0, 1.0),
            levels: opts.shade_levels.max(2),
        }
    }

    /// Shade for a view-oriented normal. Surfaces are two-sided.
    #[must_use]
    pub fn shade(&self, normal: Vec3) -> Shade {
        let Some(n) = normal.try_normalize() else {
            return Shade(self.levels / 2);
        };
        let i = (self.ambient + self.diffuse * n.dot(self.direction).abs())
            .clamp(0.0, 1.0);
        Shade((i * f32::from(self.levels - 1)).round() as u8)
    }

    /// Shade of the plane through three screen points.
    #[must_use]
    pub fn surface_shade(
        &self,
        a: ScreenPoint,
        b: ScreenPoint,
        c: ScreenPoint,
    ) -> Shade {
        // screen y grows down and z grows away; flip both into view space
        let v = |p: ScreenPoint| {
            Vec3::new(p.x as f32, -(p.y as f32), -(p.z as f32) / 100.0)
        };
        let (a, b, c) = (v(a), v(b), v(c));
        self.shade((b - a).cross(c - a))
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::from_options(&LightingOptions::default())
    }
}
