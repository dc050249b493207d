//! Scalar → RGB color ramps, used by the temperature palette.
//!
//! A [`ColorRamp`] holds N evenly spaced stops; `t = 0` maps to the first stop
//! and `t = 1` to the last. The default ramp runs blue (rigid, low B-factor)
//! through white to red (mobile, high B-factor).

use serde::{Deserialize, Serialize};

/// A color ramp defined by N evenly-spaced color stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    stops: Vec<[f32; 3]>,
}

impl ColorRamp {
    /// Build a ramp from explicit stops. Fewer than two stops yields the
    /// default ramp.
    #[must_use]
    pub fn new(stops: Vec<[f32; 3]>) -> Self {
        if stops.len() < 2 {
            return Self::default();
        }
        Self { stops }
    }

    /// Interpolate the ramp at position `t` in [0, 1].
    #[must_use]
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let n = self.stops.len() - 1;
        let scaled = t * n as f32;
        let idx = (scaled as usize).min(n - 1);
        let frac = scaled - idx as f32;

        let a = &self.stops[idx];
        let b = &self.stops[idx + 1];
        [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        ]
    }

    /// Sample and pack as `0xRRGGBB`.
    #[must_use]
    pub fn sample_rgb(&self, t: f32) -> u32 {
        pack_rgb(self.sample(t))
    }
}

impl Default for ColorRamp {
    /// Blue → White → Red
    fn default() -> Self {
        Self {
            stops: vec![
                [0.0, 0.0, 1.0], // blue (rigid)
                [1.0, 1.0, 1.0], // white
                [1.0, 0.0, 0.0], // red (mobile)
            ],
        }
    }
}

/// Pack a linear `[0, 1]` RGB triple into `0xRRGGBB`.
#[must_use]
pub fn pack_rgb(rgb: [f32; 3]) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(rgb[0]) << 16) | (channel(rgb[1]) << 8) | channel(rgb[2])
}
