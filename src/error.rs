//! Crate-level error types.

use std::fmt;

use crate::shape::ShapeKind;

/// Errors produced by the molshape crate.
#[derive(Debug)]
pub enum ShapeError {
    /// A polygon referenced a vertex outside `[0, vertex_count)`, or a
    /// polygon record was incomplete. The mesh build is abandoned.
    MalformedGeometry {
        /// Id of the mesh being built.
        mesh: String,
        /// What was wrong.
        reason: String,
    },
    /// Polygon with an arity other than 2, 3 or 4.
    UnsupportedArity(usize),
    /// No renderer could be constructed for the shape kind.
    RendererUnavailable(ShapeKind),
    /// A property was sent to a shape family that does not accept it.
    UnsupportedProperty {
        /// Receiving shape.
        kind: ShapeKind,
        /// Property name.
        property: &'static str,
    },
    /// A mesh id was looked up that does not exist in the collection.
    UnknownMesh(String),
    /// An atom, bond or monomer index outside the model.
    InvalidModel(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl ShapeError {
    /// Shorthand for [`ShapeError::MalformedGeometry`].
    pub fn malformed(mesh: &str, reason: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            mesh: mesh.to_owned(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedGeometry { mesh, reason } => {
                write!(f, "malformed geometry in mesh '{mesh}': {reason}")
            }
            Self::UnsupportedArity(n) => {
                write!(f, "unsupported polygon arity {n}")
            }
            Self::RendererUnavailable(kind) => {
                write!(f, "renderer unavailable for {kind:?}")
            }
            Self::UnsupportedProperty { kind, property } => {
                write!(f, "{kind:?} does not accept property '{property}'")
            }
            Self::UnknownMesh(id) => write!(f, "unknown mesh '{id}'"),
            Self::InvalidModel(msg) => write!(f, "invalid model: {msg}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ShapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ShapeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
