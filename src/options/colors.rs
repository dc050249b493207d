use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Color palette options for shapes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// Color of freshly created meshes.
    pub mesh_default: [f32; 3],
    /// RGB color for helix residues.
    pub helix: [f32; 3],
    /// RGB color for sheet residues.
    pub sheet: [f32; 3],
    /// RGB color for turn/coil residues.
    pub turn: [f32; 3],
    /// RGB color for DNA residues.
    pub dna: [f32; 3],
    /// RGB color for RNA residues.
    pub rna: [f32; 3],
    /// Stops of the temperature (B-factor) ramp, low to high.
    pub temperature_ramp: Vec<[f32; 3]>,
    /// Per-chain colors keyed by chain id.
    pub chain_colors: HashMap<String, [f32; 3]>,
}

impl ColorOptions {
    /// Color for a chain id, cycling a fallback hue when the chain has no
    /// entry.
    #[must_use]
    pub fn chain_color(&self, chain: char) -> [f32; 3] {
        let mut key = [0u8; 4];
        if let Some(rgb) = self.chain_colors.get(chain.encode_utf8(&mut key)) {
            return *rgb;
        }
        let hue = (u32::from(chain) % 12) as f32 / 12.0;
        hue_to_rgb(hue)
    }
}

fn hue_to_rgb(h: f32) -> [f32; 3] {
    let sector = h * 6.0;
    let f = sector.fract();
    match sector as u32 {
        0 => [1.0, f, 0.0],
        1 => [1.0 - f, 1.0, 0.0],
        2 => [0.0, 1.0, f],
        3 => [0.0, 1.0 - f, 1.0],
        4 => [f, 0.0, 1.0],
        _ => [1.0, 0.0, 1.0 - f],
    }
}

impl Default for ColorOptions {
    fn default() -> Self {
        let mut chain_colors = HashMap::new();
        let _ = chain_colors.insert("A".to_owned(), [0.75, 0.8, 1.0]);
        let _ = chain_colors.insert("B".to_owned(), [0.69, 1.0, 0.69]);
        let _ = chain_colors.insert("C".to_owned(), [1.0, 0.75, 0.8]);
        let _ = chain_colors.insert("D".to_owned(), [1.0, 1.0, 0.5]);

        Self {
            mesh_default: [1.0, 0.84, 0.0],
            helix: [1.0, 0.0, 0.5],
            sheet: [1.0, 0.78, 0.0],
            turn: [0.38, 0.5, 1.0],
            dna: [0.68, 0.0, 0.68],
            rna: [0.99, 0.0, 0.5],
            temperature_ramp: vec![
                [0.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
                [1.0, 0.0, 0.0],
            ],
            chain_colors,
        }
    }
}
