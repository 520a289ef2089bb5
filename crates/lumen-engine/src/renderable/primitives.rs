//! Procedural geometry.

use super::vertex::{Index, SimpleVertex};

/// Cube centered at the origin with corners at ±1, one quad per face.
///
/// Returns 24 vertices with per-face normals and texture coordinates, and
/// 36 indices wound clockwise when viewed from outside (left-handed front face).
pub fn cube() -> (Vec<SimpleVertex>, Vec<Index>) {
    // (normal, u axis, v axis) per face
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),  // top
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),  // bottom
        ([-1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, -1.0, 0.0]), // left
        ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),  // right
        ([0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]), // front
        ([0.0, 0.0, 1.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]), // back
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, (n, u, v)) in FACES.iter().enumerate() {
        for &(cu, cv) in &CORNERS {
            let position = [
                n[0] + u[0] * cu + v[0] * cv,
                n[1] + u[1] * cu + v[1] * cv,
                n[2] + u[2] * cu + v[2] * cv,
            ];
            let tex_coord = [(cu + 1.0) * 0.5, (cv + 1.0) * 0.5];
            vertices.push(SimpleVertex::new(position, tex_coord, *n));
        }

        let base = (face * 4) as Index;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}
