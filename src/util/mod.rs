//! Small shared utilities.

pub mod bitset;
pub mod color_ramp;

pub use bitset::BitSet;
pub use color_ramp::ColorRamp;
