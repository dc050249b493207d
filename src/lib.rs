// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Shape geometry and renderers for molecular visualization.
//!
//! molshape turns a molecular model into draw calls: polymer splines,
//! ribbons and cartoons, dot and geodesic surfaces, triangle meshes,
//! coordination polyhedra, axes and text. Drawing goes through the
//! [`g3d::Graphics3D`] contract, so any software rasterizer (or the
//! in-crate [`g3d::recording::RecordingGraphics`]) can sit underneath.
//!
//! # Key entry points
//!
//! - [`engine::ShapeManager`] - the per-viewer shape table and frame loop
//! - [`model::MolecularModel`] - atoms, bonds and polymers
//! - [`shape::ShapeProperty`] - typed property writes for every shape family
//! - [`mesh::Mesh`] - indexed polygon mesh with quantized normals
//! - [`options::Options`] - runtime configuration (geometry, display,
//!   surface, camera, lighting, colors)
//!
//! # Architecture
//!
//! Shapes own derived geometry and style arrays and are written only
//! between frames. Each frame, [`engine::ShapeManager::render_frame`] runs
//! a prepare pass that builds polymer segment meshes, then hands every
//! loaded shape, in painter's order, to its renderer from the
//! [`renderer::RendererRegistry`]. Renderers read shapes, project through
//! [`camera::Projection`] and borrow scratch screen buffers from a pool
//! with scoped release.

pub mod camera;
pub mod engine;
pub mod error;
pub mod g3d;
pub mod mesh;
pub mod model;
pub mod options;
pub mod polymer;
pub mod renderer;
pub mod shape;
pub mod surface;
pub mod util;
