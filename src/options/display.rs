use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// When bonds of order > 1 are drawn as parallel stripes.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MultipleBondMode {
    /// Always draw a single stripe.
    Never,
    /// Draw stripes unless the bond is thinner than a pixel-ish width.
    #[default]
    NotSmall,
    /// Always draw stripes.
    Always,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Selection and display toggles shared by all shapes.
pub struct DisplayOptions {
    /// A bond/segment is styled when either endpoint is selected.
    #[schemars(title = "Bond Selection OR")]
    pub bond_selection_mode_or: bool,
    /// Whether bond order is visualised at all.
    #[schemars(title = "Show Multiple Bonds")]
    pub show_multiple_bonds: bool,
    /// Stripe policy for multiple bonds.
    #[schemars(title = "Multiple Bond Mode")]
    pub multiple_bond_mode: MultipleBondMode,
    /// Draw hydrogen bonds as solid rather than dashed.
    #[schemars(title = "Solid H-Bonds")]
    pub hbonds_solid: bool,
    /// Whether hydrogen atoms are rendered.
    #[schemars(title = "Show Hydrogens")]
    pub show_hydrogens: bool,
    /// The view is being rotated interactively.
    #[schemars(skip)]
    #[serde(skip)]
    pub in_motion: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            bond_selection_mode_or: false,
            show_multiple_bonds: true,
            multiple_bond_mode: MultipleBondMode::NotSmall,
            hbonds_solid: false,
            show_hydrogens: true,
            in_motion: false,
        }
    }
}
