//! Small meshes shared by the unit tests.

use glam::Vec3;

use crate::types::Face;

/// One triangle in the XY plane
pub fn single_triangle() -> (Vec<Vec3>, Vec<Face>) {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.5, 1.0, 0.0),
    ];
    (positions, vec![Face::new([0, 1, 2])])
}

/// Unit cube with 4 vertex slots per face (24 total), outward winding.
///
/// Returns per-slot normals equal to the face normal, as a flat-shaded cube
/// would have.
pub fn unit_cube() -> (Vec<Vec3>, Vec<Face>, Vec<Vec3>) {
    let sides: [([[f32; 3]; 4], Vec3); 6] = [
        ([[0., 0., 0.], [0., 1., 0.], [1., 1., 0.], [1., 0., 0.]], Vec3::NEG_Z),
        ([[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]], Vec3::Z),
        ([[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]], Vec3::NEG_Y),
        ([[0., 1., 0.], [0., 1., 1.], [1., 1., 1.], [1., 1., 0.]], Vec3::Y),
        ([[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 1., 0.]], Vec3::NEG_X),
        ([[1., 0., 0.], [1., 1., 0.], [1., 1., 1.], [1., 0., 1.]], Vec3::X),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(6);
    for (corners, normal) in sides {
        let base = positions.len() as u32;
        for c in corners {
            positions.push(Vec3::from_array(c));
            normals.push(normal);
        }
        faces.push(Face::new([base, base + 1, base + 2, base + 3]));
    }
    (positions, faces, normals)
}

/// Normals pointing from the cube center through each corner, as a fully
/// smoothed cube would have.
pub fn cube_corner_normals(positions: &[Vec3]) -> Vec<Vec3> {
    positions
        .iter()
        .map(|p| (*p - Vec3::splat(0.5)).normalize())
        .collect()
}

/// `n` unit quads along +X, each with its own 4 vertex slots
pub fn split_quad_strip(n: usize) -> (Vec<Vec3>, Vec<Face>) {
    let mut positions = Vec::with_capacity(n * 4);
    let mut faces = Vec::with_capacity(n);
    for i in 0..n {
        let x = i as f32;
        let base = positions.len() as u32;
        positions.extend([
            Vec3::new(x, 0.0, 0.0),
            Vec3::new(x + 1.0, 0.0, 0.0),
            Vec3::new(x + 1.0, 1.0, 0.0),
            Vec3::new(x, 1.0, 0.0),
        ]);
        faces.push(Face::new([base, base + 1, base + 2, base + 3]));
    }
    (positions, faces)
}

/// Unit square split along its diagonal into two triangles that share
/// positions but no vertex slots
pub fn coplanar_triangles() -> (Vec<Vec3>, Vec<Face>) {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    (positions, vec![Face::new([0, 1, 2]), Face::new([3, 4, 5])])
}

/// Two triangles far apart
pub fn disjoint_triangles() -> (Vec<Vec3>, Vec<Face>) {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::new(6.0, 0.0, 0.0),
        Vec3::new(5.0, 1.0, 0.0),
    ];
    (positions, vec![Face::new([0, 1, 2]), Face::new([3, 4, 5])])
}

/// A quad, three triangles and a pentagon. Some neighbours share vertex
/// slots, the pentagon only shares positions.
pub fn mixed_polygons() -> (Vec<Vec3>, Vec<Face>) {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
        Vec3::new(1.0, 2.0, 0.0),
        // Pentagon copies of 4, 5 and 6 plus two corners of its own
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
        Vec3::new(2.5, 1.5, 0.0),
        Vec3::new(2.0, 2.0, 0.0),
        Vec3::new(1.0, 2.0, 0.0),
    ];
    let faces = vec![
        Face::new([0, 1, 4, 3]),
        Face::new([1, 2, 5]),
        Face::new([1, 5, 4]),
        Face::new([3, 4, 6]),
        Face::new([7, 8, 9, 10, 11]),
    ];
    (positions, faces)
}

/// Three triangles hinged on the edge between positions 0 and 1
pub fn fin() -> (Vec<Vec3>, Vec<Face>) {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.5, 1.0, 0.0),
        Vec3::new(0.5, -1.0, 0.0),
        Vec3::new(0.5, 0.0, 1.0),
    ];
    let faces = vec![
        Face::new([0, 1, 2]),
        Face::new([1, 0, 3]),
        Face::new([0, 1, 4]),
    ];
    (positions, faces)
}
