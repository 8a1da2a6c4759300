//! Factory functions for creating test meshes and STL payloads.
//!
//! Used by the unit tests here and by the server's integration tests, which
//! need real upload bytes to feed through the estimation pipeline.

use crate::mesh::MeshBuffer;

/// The 12 triangles of an axis-aligned cube spanning `[0, side]³`, with
/// consistent outward winding.
pub fn cube_soup(side: f64) -> Vec<[f64; 3]> {
    let s = side;
    let quads: [[[f64; 3]; 6]; 6] = [
        // bottom (z = 0)
        [
            [0.0, 0.0, 0.0], [s, s, 0.0], [s, 0.0, 0.0],
            [0.0, 0.0, 0.0], [0.0, s, 0.0], [s, s, 0.0],
        ],
        // top (z = s)
        [
            [0.0, 0.0, s], [s, 0.0, s], [s, s, s],
            [0.0, 0.0, s], [s, s, s], [0.0, s, s],
        ],
        // front (y = 0)
        [
            [0.0, 0.0, 0.0], [s, 0.0, 0.0], [s, 0.0, s],
            [0.0, 0.0, 0.0], [s, 0.0, s], [0.0, 0.0, s],
        ],
        // back (y = s)
        [
            [0.0, s, 0.0], [s, s, s], [s, s, 0.0],
            [0.0, s, 0.0], [0.0, s, s], [s, s, s],
        ],
        // left (x = 0)
        [
            [0.0, 0.0, 0.0], [0.0, 0.0, s], [0.0, s, s],
            [0.0, 0.0, 0.0], [0.0, s, s], [0.0, s, 0.0],
        ],
        // right (x = s)
        [
            [s, 0.0, 0.0], [s, s, s], [s, 0.0, s],
            [s, 0.0, 0.0], [s, s, 0.0], [s, s, s],
        ],
    ];
    quads.iter().flatten().copied().collect()
}

/// Cube as a flat triangle soup.
pub fn cube_mesh(side: f64) -> MeshBuffer {
    MeshBuffer::soup(cube_soup(side)).expect("cube soup is valid")
}

/// The same cube through an 8-vertex index buffer.
pub fn cube_indexed(side: f64) -> MeshBuffer {
    let s = side;
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [s, 0.0, 0.0],
        [s, s, 0.0],
        [0.0, s, 0.0],
        [0.0, 0.0, s],
        [s, 0.0, s],
        [s, s, s],
        [0.0, s, s],
    ];
    let indices = vec![
        [0, 2, 1], [0, 3, 2], // bottom
        [4, 5, 6], [4, 6, 7], // top
        [0, 1, 5], [0, 5, 4], // front
        [3, 6, 2], [3, 7, 6], // back
        [0, 4, 7], [0, 7, 3], // left
        [1, 6, 5], [1, 2, 6], // right
    ];
    MeshBuffer::indexed(vertices, indices).expect("cube indices are valid")
}

/// Reverse the winding of every triangle in a soup.
pub fn reverse_winding(vertices: &[[f64; 3]]) -> Vec<[f64; 3]> {
    let mut out = Vec::with_capacity(vertices.len());
    for tri in vertices.chunks_exact(3) {
        out.push(tri[0]);
        out.push(tri[2]);
        out.push(tri[1]);
    }
    out
}

/// Assemble a binary STL payload from triangles.
pub fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut out = vec![0u8; 80];
    out.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for tri in triangles {
        out.extend_from_slice(&[0u8; 12]); // normal, ignored by the parser
        for v in tri {
            for c in v {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        out.extend_from_slice(&[0u8; 2]); // attribute byte count
    }
    out
}

/// Binary STL of the `[0, side]³` cube.
pub fn cube_stl(side: f32) -> Vec<u8> {
    let soup = cube_soup(side as f64);
    let triangles: Vec<[[f32; 3]; 3]> = soup
        .chunks_exact(3)
        .map(|tri| {
            let v = |p: [f64; 3]| [p[0] as f32, p[1] as f32, p[2] as f32];
            [v(tri[0]), v(tri[1]), v(tri[2])]
        })
        .collect();
    binary_stl(&triangles)
}

/// Binary STL declaring zero triangles.
pub fn empty_stl() -> Vec<u8> {
    binary_stl(&[])
}
