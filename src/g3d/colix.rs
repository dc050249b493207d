//! Color handles ("colixes") and the color table that interns them.
//!
//! A [`Colix`] is a 16-bit handle: the low 14 bits index the [`ColorTable`],
//! bit 14 marks translucency. Index 0 is [`Colix::INHERIT`] and the highest
//! index is reserved for [`Colix::UNRECOGNIZED`], the "use the palette"
//! sentinel.

use rustc_hash::FxHashMap;

use crate::model::Element;
use crate::util::color_ramp::pack_rgb;

const TRANSLUCENT_FLAG: u16 = 0x4000;
const INDEX_MASK: u16 = 0x3FFF;
/// First of the fixed per-element CPK slots.
const ELEMENT_BASE: u16 = 11;

/// 16-bit color handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colix(u16);

impl Colix {
    /// Take the owning atom's color.
    pub const INHERIT: Self = Self(0);
    /// Resolve through the active palette.
    pub const UNRECOGNIZED: Self = Self(INDEX_MASK);
    /// Predefined black.
    pub const BLACK: Self = Self(1);
    /// Predefined white.
    pub const WHITE: Self = Self(2);
    /// Predefined gray.
    pub const GRAY: Self = Self(3);
    /// Predefined red.
    pub const RED: Self = Self(4);
    /// Predefined green.
    pub const GREEN: Self = Self(5);
    /// Predefined blue.
    pub const BLUE: Self = Self(6);
    /// Predefined yellow.
    pub const YELLOW: Self = Self(7);
    /// Predefined gold, the default mesh color.
    pub const GOLD: Self = Self(8);
    /// Predefined orange.
    pub const ORANGE: Self = Self(9);
    /// Predefined pink.
    pub const PINK: Self = Self(10);

    /// The fixed CPK slot of the `ordinal`-th [`Element`].
    #[must_use]
    pub(crate) fn element(ordinal: usize) -> Self {
        Self(ELEMENT_BASE + ordinal as u16)
    }

    /// Palette index without the translucency flag.
    #[must_use]
    pub fn index(self) -> u16 {
        self.0 & INDEX_MASK
    }

    /// Whether the translucency flag is set.
    #[must_use]
    pub fn is_translucent(self) -> bool {
        self.0 & TRANSLUCENT_FLAG != 0
    }

    /// Copy with the translucency flag set or cleared.
    #[must_use]
    pub fn with_translucency(self, translucent: bool) -> Self {
        if translucent {
            Self(self.0 | TRANSLUCENT_FLAG)
        } else {
            Self(self.0 & !TRANSLUCENT_FLAG)
        }
    }

    /// True for [`Self::INHERIT`], ignoring translucency.
    #[must_use]
    pub fn is_inherit(self) -> bool {
        self.index() == 0
    }

    /// True for [`Self::UNRECOGNIZED`], ignoring translucency.
    #[must_use]
    pub fn is_unrecognized(self) -> bool {
        self.index() == INDEX_MASK
    }

    /// `explicit` unless it is INHERIT, in which case `owner`. Translucency on
    /// an inheriting handle carries over to the owner's color.
    #[must_use]
    pub fn inherit(explicit: Self, owner: Self) -> Self {
        if explicit.is_inherit() {
            if explicit.is_translucent() {
                owner.with_translucency(true)
            } else {
                owner
            }
        } else {
            explicit
        }
    }
}

/// Named atom palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    /// Element colors.
    Cpk,
    /// Secondary structure colors.
    Structure,
    /// B-factor ramp.
    Temperature,
    /// Per-chain colors.
    Chain,
}

/// A color as given in a property write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorValue {
    /// `0xRRGGBB`.
    Rgb(u32),
    /// Per-atom color from a palette.
    Palette(Palette),
    /// Reset to inherit.
    None,
}

/// Interning table mapping colixes to `0xRRGGBB`.
#[derive(Debug, Clone)]
pub struct ColorTable {
    argb: Vec<u32>,
    lookup: FxHashMap<u32, u16>,
}

impl ColorTable {
    /// A table containing the predefined colors.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            argb: vec![0],
            lookup: FxHashMap::default(),
        };
        for rgb in [
            0x00_0000, 0xFF_FFFF, 0x80_8080, 0xFF_0000, 0x00_8000, 0x00_00FF,
            0xFF_FF00, 0xFF_D700, 0xFF_A500, 0xFF_C0CB,
        ] {
            let _ = table.colix(rgb);
        }
        // element slots are positional, so they bypass de-duplication
        for element in Element::ALL {
            let rgb = element.cpk_rgb();
            let i = table.argb.len() as u16;
            table.argb.push(rgb);
            let _ = table.lookup.entry(rgb).or_insert(i);
        }
        table
    }

    /// Intern `rgb`. When the table is full it returns the nearest existing
    /// entry.
    pub fn colix(&mut self, rgb: u32) -> Colix {
        let rgb = rgb & 0xFF_FFFF;
        if let Some(&i) = self.lookup.get(&rgb) {
            return Colix(i);
        }
        if self.argb.len() >= INDEX_MASK as usize {
            return self.nearest(rgb);
        }
        let i = self.argb.len() as u16;
        self.argb.push(rgb);
        let _ = self.lookup.insert(rgb, i);
        Colix(i)
    }

    /// Intern a linear RGB triple.
    pub fn colix_f(&mut self, rgb: [f32; 3]) -> Colix {
        self.colix(pack_rgb(rgb))
    }

    /// Resolve a handle; INHERIT and UNRECOGNIZED have no color.
    #[must_use]
    pub fn rgb(&self, colix: Colix) -> Option<u32> {
        if colix.is_inherit() || colix.is_unrecognized() {
            return None;
        }
        self.argb.get(colix.index() as usize).copied()
    }

    /// Number of interned colors, INHERIT included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.argb.len()
    }

    /// Always false: INHERIT occupies slot 0.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.argb.is_empty()
    }

    fn nearest(&self, rgb: u32) -> Colix {
        let dist = |c: u32| {
            let d = |shift: u32| {
                let a = ((c >> shift) & 0xFF) as i32;
                let b = ((rgb >> shift) & 0xFF) as i32;
                (a - b) * (a - b)
            };
            d(16) + d(8) + d(0)
        };
        let best = (1..self.argb.len())
            .min_by_key(|&i| dist(self.argb[i]))
            .unwrap_or(0);
        Colix(best as u16)
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_colors_are_stable() {
        let mut table = ColorTable::new();
        assert_eq!(table.colix(0xFF_D700), Colix::GOLD);
        assert_eq!(table.colix(0xFF_0000), Colix::RED);
        assert_eq!(table.rgb(Colix::PINK), Some(0xFF_C0CB));
        assert_eq!(table.rgb(Element::N.colix()), Some(0x30_50F8));
        assert_eq!(table.rgb(Element::H.colix()), Some(0xFF_FFFF));
    }

    #[test]
    fn interning_is_idempotent() {
        let mut table = ColorTable::new();
        let a = table.colix(0x12_3456);
        let b = table.colix(0x12_3456);
        assert_eq!(a, b);
        assert_eq!(table.rgb(a), Some(0x12_3456));
    }

    #[test]
    fn inherit_rules() {
        let owner = Colix::BLUE;
        assert_eq!(Colix::inherit(Colix::INHERIT, owner), owner);
        assert_eq!(Colix::inherit(Colix::RED, owner), Colix::RED);
        let t = Colix::inherit(Colix::INHERIT.with_translucency(true), owner);
        assert!(t.is_translucent());
        assert_eq!(t.index(), owner.index());
    }

    #[test]
    fn sentinels_have_no_rgb() {
        let table = ColorTable::new();
        assert_eq!(table.rgb(Colix::INHERIT), None);
        assert_eq!(table.rgb(Colix::UNRECOGNIZED), None);
        assert!(Colix::UNRECOGNIZED.with_translucency(true).is_unrecognized());
    }
}
