//! Named meshes with a current-mesh cursor.
//!
//! Property writes go to the current mesh. Naming an unknown id creates it;
//! writing geometry with no current mesh creates one with an automatic id
//! (`mesh1`, `mesh2`, ...).

use std::fmt::Write as _;

use glam::Vec3;

use super::{Mesh, MeshLighting};
use crate::error::ShapeError;
use crate::g3d::Colix;

/// Property writes accepted by a [`MeshCollection`].
#[derive(Debug, Clone, PartialEq)]
pub enum MeshProperty {
    /// Select (creating if needed) the mesh with this id; `None` creates a
    /// mesh with the next automatic id.
    ThisId(Option<String>),
    /// Remove the current mesh, or every mesh when none is current.
    Delete,
    /// Clear the current mesh's geometry and restore its display defaults.
    Reset,
    /// Show or hide the current mesh.
    Visible(bool),
    /// Replace vertices, discarding polygons and per-element colors.
    Vertices(Vec<Vec3>),
    /// Replace polygons (2, 3 or 4 indices each) and rebuild normals.
    Polygons(Vec<Vec<usize>>),
    /// One color per polygon; empty removes them.
    PolygonColixes(Vec<Colix>),
    /// One color per vertex; empty removes them.
    VertexColixes(Vec<Colix>),
    /// Draw vertices as dots.
    Dots(bool),
    /// Draw polygon edges.
    Mesh(bool),
    /// Fill polygons.
    Fill(bool),
    /// Draw line polygons as cylinders of this width; 0 for pixel lines.
    Width(i16),
    /// Hide back faces.
    FrontOnly(bool),
    /// Lighting mode.
    Lighting(MeshLighting),
    /// Invert normals.
    InsideOut(bool),
}

impl MeshProperty {
    /// Property name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ThisId(_) => "thisID",
            Self::Delete => "delete",
            Self::Reset => "reset",
            Self::Visible(_) => "visible",
            Self::Vertices(_) => "vertices",
            Self::Polygons(_) => "polygons",
            Self::PolygonColixes(_) => "polygonColixes",
            Self::VertexColixes(_) => "vertexColixes",
            Self::Dots(_) => "dots",
            Self::Mesh(_) => "mesh",
            Self::Fill(_) => "fill",
            Self::Width(_) => "width",
            Self::FrontOnly(_) => "frontOnly",
            Self::Lighting(_) => "lighting",
            Self::InsideOut(_) => "insideOut",
        }
    }
}

/// Registry of meshes of one shape family.
#[derive(Debug, Clone)]
pub struct MeshCollection {
    id_prefix: &'static str,
    default_colix: Colix,
    meshes: Vec<Mesh>,
    current: Option<usize>,
    next_auto_id: usize,
}

impl MeshCollection {
    /// Empty collection whose automatic ids start with `id_prefix`.
    #[must_use]
    pub fn new(id_prefix: &'static str, default_colix: Colix) -> Self {
        Self {
            id_prefix,
            default_colix,
            meshes: Vec::new(),
            current: None,
            next_auto_id: 1,
        }
    }

    /// Number of meshes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.meshes.len()
    }

    /// All meshes in creation order.
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Look up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.id() == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Mesh> {
        self.meshes.iter_mut().find(|m| m.id() == id)
    }

    /// The mesh under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Mesh> {
        self.current.and_then(|i| self.meshes.get(i))
    }

    /// Mutable mesh under the cursor.
    pub fn current_mut(&mut self) -> Option<&mut Mesh> {
        self.current.and_then(|i| self.meshes.get_mut(i))
    }

    /// Move the cursor to an existing mesh.
    pub fn select(&mut self, id: &str) -> Result<(), ShapeError> {
        let i = self
            .index_of(id)
            .ok_or_else(|| ShapeError::UnknownMesh(id.to_owned()))?;
        self.current = Some(i);
        Ok(())
    }

    /// Create (or select, if it exists) a mesh and make it current.
    pub fn create(&mut self, id: Option<&str>) -> &mut Mesh {
        let id = id.map_or_else(|| self.next_id(), str::to_owned);
        let i = if let Some(i) = self.index_of(&id) {
            i
        } else {
            log::debug!("creating mesh '{id}'");
            self.meshes.push(Mesh::new(&id, self.default_colix));
            self.meshes.len() - 1
        };
        self.current = Some(i);
        &mut self.meshes[i]
    }

    /// Remove a mesh by id.
    pub fn remove(&mut self, id: &str) -> Result<Mesh, ShapeError> {
        let i = self
            .index_of(id)
            .ok_or_else(|| ShapeError::UnknownMesh(id.to_owned()))?;
        self.current = match self.current {
            Some(c) if c == i => None,
            Some(c) if c > i => Some(c - 1),
            other => other,
        };
        Ok(self.meshes.remove(i))
    }

    /// One line per mesh: id, vertex and polygon counts, visibility.
    #[must_use]
    pub fn list(&self) -> String {
        let mut out = String::new();
        for m in &self.meshes {
            let _ = writeln!(
                out,
                "{}\t{} vertices\t{} polygons\t{}",
                m.id(),
                m.vertex_count(),
                m.polygon_count(),
                if m.visible { "visible" } else { "hidden" }
            );
        }
        out
    }

    /// Set the color of the current mesh, or of all meshes when none is
    /// current.
    pub fn set_colix(&mut self, colix: Colix) {
        self.for_targets(|m| m.colix = colix.with_translucency(m.colix.is_translucent()));
    }

    /// Set translucency of the current mesh, or of all meshes.
    pub fn set_translucent(&mut self, translucent: bool) {
        self.for_targets(|m| m.set_translucent(translucent));
    }

    /// Apply one property write.
    ///
    /// Malformed polygon data clears the current mesh and is returned as an
    /// error. Polygons with an unsupported arity are logged and skipped.
    pub fn set_property(&mut self, property: MeshProperty) -> Result<(), ShapeError> {
        match property {
            MeshProperty::ThisId(id) => {
                let _ = self.create(id.as_deref());
            }
            MeshProperty::Delete => match self.current.take() {
                Some(i) => {
                    let _ = self.meshes.remove(i);
                }
                None => self.meshes.clear(),
            },
            MeshProperty::Reset => {
                let colix = self.default_colix;
                if let Some(m) = self.current_mut() {
                    m.reset(colix);
                }
            }
            MeshProperty::Visible(on) => self.for_targets(|m| m.visible = on),
            MeshProperty::Vertices(points) => {
                self.current_or_new().set_vertices(points);
            }
            MeshProperty::Polygons(polygons) => {
                let mesh = self.current_or_new();
                return load_polygons(mesh, &polygons);
            }
            MeshProperty::PolygonColixes(colixes) => {
                return self.current_or_new().set_polygon_colixes(colixes);
            }
            MeshProperty::VertexColixes(colixes) => {
                return self.current_or_new().set_vertex_colixes(colixes);
            }
            MeshProperty::Dots(on) => self.for_targets(|m| m.show_points = on),
            MeshProperty::Mesh(on) => self.for_targets(|m| m.draw_triangles = on),
            MeshProperty::Fill(on) => self.for_targets(|m| m.fill_triangles = on),
            MeshProperty::Width(mad) => self.for_targets(|m| m.width_mad = mad),
            MeshProperty::FrontOnly(on) => self.for_targets(|m| m.front_only = on),
            MeshProperty::Lighting(lighting) => {
                return self.rebuild_targets(|m| m.set_lighting(lighting));
            }
            MeshProperty::InsideOut(on) => {
                return self.rebuild_targets(|m| m.set_inside_out(on));
            }
        }
        Ok(())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.meshes.iter().position(|m| m.id() == id)
    }

    fn next_id(&mut self) -> String {
        loop {
            let id = format!("{}{}", self.id_prefix, self.next_auto_id);
            self.next_auto_id += 1;
            if self.index_of(&id).is_none() {
                return id;
            }
        }
    }

    fn current_or_new(&mut self) -> &mut Mesh {
        match self.current {
            Some(i) if i < self.meshes.len() => &mut self.meshes[i],
            _ => self.create(None),
        }
    }

    fn for_targets(&mut self, mut f: impl FnMut(&mut Mesh)) {
        match self.current {
            Some(i) => {
                if let Some(m) = self.meshes.get_mut(i) {
                    f(m);
                }
            }
            None => self.meshes.iter_mut().for_each(f),
        }
    }

    /// Apply `f` and re-derive normals of meshes that had them.
    fn rebuild_targets(&mut self, mut f: impl FnMut(&mut Mesh)) -> Result<(), ShapeError> {
        let mut result = Ok(());
        self.for_targets(|m| {
            let had_normals = m.is_initialized();
            f(m);
            if had_normals {
                if let Err(e) = m.initialize() {
                    result = Err(e);
                }
            }
        });
        result
    }
}

/// Replace `mesh`'s polygons and rebuild its normals.
fn load_polygons(mesh: &mut Mesh, polygons: &[Vec<usize>]) -> Result<(), ShapeError> {
    mesh.set_polygon_count(polygons.len());
    for indices in polygons {
        match mesh.add_polygon(indices) {
            Ok(_) => {}
            Err(ShapeError::UnsupportedArity(n)) => {
                log::warn!("mesh '{}': skipping polygon with {n} vertices", mesh.id());
            }
            Err(e) => {
                log::error!("{e}");
                mesh.clear();
                return Err(e);
            }
        }
    }
    mesh.initialize().inspect_err(|e| {
        log::error!("{e}");
    })
}
