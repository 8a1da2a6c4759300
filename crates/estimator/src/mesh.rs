use crate::error::ParseError;

/// Raw vertex/triangle data extracted from an uploaded file.
///
/// Either a flat triangle soup (every three consecutive vertices form a
/// triangle) or an indexed mesh. Owned exclusively by one analysis call and
/// never mutated after construction.
#[derive(Debug, Clone)]
pub struct MeshBuffer {
    vertices: Vec<[f64; 3]>,
    indices: Option<Vec<[u32; 3]>>,
}

impl MeshBuffer {
    /// Build a non-indexed buffer. The vertex count must be a non-zero
    /// multiple of 3.
    pub fn soup(vertices: Vec<[f64; 3]>) -> Result<Self, ParseError> {
        if vertices.is_empty() {
            return Err(ParseError::NoTriangles);
        }
        if vertices.len() % 3 != 0 {
            return Err(ParseError::invalid(format!(
                "vertex count {} is not a multiple of 3",
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            indices: None,
        })
    }

    /// Build an indexed buffer. Every index must address a vertex.
    pub fn indexed(vertices: Vec<[f64; 3]>, indices: Vec<[u32; 3]>) -> Result<Self, ParseError> {
        if indices.is_empty() {
            return Err(ParseError::NoTriangles);
        }
        let n = vertices.len() as u32;
        for tri in &indices {
            if tri.iter().any(|&i| i >= n) {
                return Err(ParseError::invalid(format!(
                    "triangle index out of bounds ({} vertices)",
                    n
                )));
            }
        }
        Ok(Self {
            vertices,
            indices: Some(indices),
        })
    }

    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    /// Index-triplet count when indexed, vertex count / 3 otherwise.
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertices.len() / 3,
        }
    }

    /// Iterate triangles, resolving through the index buffer or by
    /// consecutive grouping of the flat vertex list.
    pub fn triangles(&self) -> impl Iterator<Item = [[f64; 3]; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| match &self.indices {
            Some(indices) => {
                let [a, b, c] = indices[t];
                [
                    self.vertices[a as usize],
                    self.vertices[b as usize],
                    self.vertices[c as usize],
                ]
            }
            None => [
                self.vertices[t * 3],
                self.vertices[t * 3 + 1],
                self.vertices[t * 3 + 2],
            ],
        })
    }
}

/// Axis-aligned bounding box in the mesh's native unit (millimeters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Per-axis min/max over all vertices.
    pub fn of(vertices: &[[f64; 3]]) -> Self {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for v in vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn depth(&self) -> f64 {
        self.max[2] - self.min[2]
    }

    pub fn volume_mm3(&self) -> f64 {
        self.width() * self.height() * self.depth()
    }
}
