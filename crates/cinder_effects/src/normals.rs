//! The 162 evenly spread unit directions used by the entity halo.
//!
//! Generated by subdividing an icosahedron twice and projecting every
//! vertex onto the unit sphere: 12 + 30 + 120 vertices.

use std::collections::HashMap;

use cinder_core::Vec3;

/// Number of directions in the table.
pub const VERTEX_NORMAL_COUNT: usize = 162;

const PHI: f32 = 1.618_034;

const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Builds the direction table.
#[must_use]
pub fn vertex_normals() -> Box<[Vec3]> {
    let mut vertices: Vec<Vec3> = ICOSAHEDRON_VERTICES
        .iter()
        .map(|v| Vec3::from_array(*v).normalize_or_zero())
        .collect();
    let mut faces = ICOSAHEDRON_FACES.to_vec();

    for _ in 0..2 {
        faces = subdivide(&mut vertices, &faces);
    }

    debug_assert_eq!(vertices.len(), VERTEX_NORMAL_COUNT);
    vertices.into_boxed_slice()
}

fn subdivide(vertices: &mut Vec<Vec3>, faces: &[[usize; 3]]) -> Vec<[usize; 3]> {
    let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();

    let mut refined = Vec::with_capacity(faces.len() * 4);
    for &[a, b, c] in faces {
        let ab = midpoint(&mut midpoints, vertices, a, b);
        let bc = midpoint(&mut midpoints, vertices, b, c);
        let ca = midpoint(&mut midpoints, vertices, c, a);
        refined.extend_from_slice(&[[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
    }
    refined
}

/// Index of the projected midpoint of edge `a`-`b`, shared by both faces on the edge.
fn midpoint(
    cache: &mut HashMap<(usize, usize), usize>,
    vertices: &mut Vec<Vec3>,
    a: usize,
    b: usize,
) -> usize {
    let key = (a.min(b), a.max(b));
    if let Some(&index) = cache.get(&key) {
        return index;
    }
    let mid = ((vertices[a] + vertices[b]) * 0.5).normalize_or_zero();
    vertices.push(mid);
    let index = vertices.len() - 1;
    cache.insert(key, index);
    index
}
