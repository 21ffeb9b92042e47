//! Triangle meshes for the offline model
//!
//! Solids are axis-aligned boxes. Each face is split into an `n × n` grid
//! of quads, two triangles per quad, wound counter-clockwise seen from
//! outside.

use crate::domain::job::{LengthUnit, MeshRefinement};
use serde::{Deserialize, Serialize};

/// A solved box, millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidBox {
    /// Minimum corner
    pub origin: [f64; 3],
    /// Extent along x, y, z
    pub size: [f64; 3],
}

impl SolidBox {
    /// Whether the box encloses any volume
    pub fn is_degenerate(&self) -> bool {
        self.size.iter().any(|s| !s.is_finite() || *s <= 0.0)
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<[f64; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

/// Grid subdivisions per face edge
pub fn subdivisions(refinement: MeshRefinement) -> usize {
    match refinement {
        MeshRefinement::Low => 1,
        MeshRefinement::Medium => 2,
        MeshRefinement::High => 4,
    }
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Tessellate a box; degenerate boxes yield an empty mesh
    pub fn from_box(solid: &SolidBox, refinement: MeshRefinement) -> Self {
        let mut mesh = Mesh::default();
        if solid.is_degenerate() {
            return mesh;
        }

        let [ox, oy, oz] = solid.origin;
        let [w, d, h] = solid.size;
        let x = [w, 0.0, 0.0];
        let y = [0.0, d, 0.0];
        let z = [0.0, 0.0, h];

        // (corner, u, v) with u × v pointing out of the box
        let faces = [
            ([ox, oy, oz], y, x),
            ([ox, oy, oz + h], x, y),
            ([ox, oy, oz], x, z),
            ([ox, oy + d, oz], z, x),
            ([ox, oy, oz], z, y),
            ([ox + w, oy, oz], y, z),
        ];

        let n = subdivisions(refinement);
        for (corner, u, v) in faces {
            mesh.push_grid(corner, u, v, n);
        }
        mesh
    }

    fn push_grid(&mut self, corner: [f64; 3], u: [f64; 3], v: [f64; 3], n: usize) {
        let base = self.vertices.len() as u32;
        let step = n as f64;

        for j in 0..=n {
            for i in 0..=n {
                let (fu, fv) = (i as f64 / step, j as f64 / step);
                self.vertices.push([
                    corner[0] + u[0] * fu + v[0] * fv,
                    corner[1] + u[1] * fu + v[1] * fv,
                    corner[2] + u[2] * fu + v[2] * fv,
                ]);
            }
        }

        let row = (n + 1) as u32;
        for j in 0..n as u32 {
            for i in 0..n as u32 {
                let a = base + j * row + i;
                let b = a + 1;
                let c = a + row + 1;
                let d = a + row;
                self.triangles.push([a, b, c]);
                self.triangles.push([a, c, d]);
            }
        }
    }

    /// Append another mesh
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
    }

    /// Copy of the mesh with coordinates expressed in `unit`
    pub fn in_unit(&self, unit: LengthUnit) -> Mesh {
        Mesh {
            vertices: self
                .vertices
                .iter()
                .map(|p| [unit.from_mm(p[0]), unit.from_mm(p[1]), unit.from_mm(p[2])])
                .collect(),
            triangles: self.triangles.clone(),
        }
    }

    /// Unit normal of a triangle; +Z for degenerate triangles
    pub fn normal(&self, triangle: &[u32; 3]) -> [f64; 3] {
        let p0 = self.vertices[triangle[0] as usize];
        let p1 = self.vertices[triangle[1] as usize];
        let p2 = self.vertices[triangle[2] as usize];

        let a = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
        let b = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
        let n = [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > 1e-12 {
            [n[0] / len, n[1] / len, n[2] / len]
        } else {
            [0.0, 0.0, 1.0]
        }
    }
}
