//! Procedural mesh primitives.
//!
//! Indexed generators for the three shapes the room is built from: boxes,
//! cylinders, and cones. All primitives are centered on the origin, use
//! per-face normals (hard edges), carry UVs, and wind counter-clockwise
//! viewed from outside.

use glam::{Vec2, Vec3};

/// De-interleaved mesh data produced by the primitive generators.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex positions in object space.
    pub positions: Vec<Vec3>,
    /// Unit vertex normals, one per position.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, one per position.
    pub tex_coords: Vec<Vec2>,
    /// Triangle list indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3, tex_coord: Vec2) {
        self.positions.push(position);
        self.normals.push(normal);
        self.tex_coords.push(tex_coord);
    }
}

/// An axis-aligned box of the given full extents.
///
/// 24 vertices (4 per face, so each face has its own normal) and 12
/// triangles.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let hd = depth / 2.0;

    let mut mesh = MeshData::default();

    // Each face lists its corners counter-clockwise viewed from outside,
    // starting at the face's (0, 0) texture corner.
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        // +Z
        (
            Vec3::Z,
            [
                Vec3::new(-hw, -hh, hd),
                Vec3::new(hw, -hh, hd),
                Vec3::new(hw, hh, hd),
                Vec3::new(-hw, hh, hd),
            ],
        ),
        // -Z
        (
            Vec3::NEG_Z,
            [
                Vec3::new(hw, -hh, -hd),
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(-hw, hh, -hd),
                Vec3::new(hw, hh, -hd),
            ],
        ),
        // +X
        (
            Vec3::X,
            [
                Vec3::new(hw, -hh, hd),
                Vec3::new(hw, -hh, -hd),
                Vec3::new(hw, hh, -hd),
                Vec3::new(hw, hh, hd),
            ],
        ),
        // -X
        (
            Vec3::NEG_X,
            [
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(-hw, -hh, hd),
                Vec3::new(-hw, hh, hd),
                Vec3::new(-hw, hh, -hd),
            ],
        ),
        // +Y
        (
            Vec3::Y,
            [
                Vec3::new(-hw, hh, hd),
                Vec3::new(hw, hh, hd),
                Vec3::new(hw, hh, -hd),
                Vec3::new(-hw, hh, -hd),
            ],
        ),
        // -Y
        (
            Vec3::NEG_Y,
            [
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(hw, -hh, -hd),
                Vec3::new(hw, -hh, hd),
                Vec3::new(-hw, -hh, hd),
            ],
        ),
    ];

    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    for (normal, corners) in faces {
        let base = mesh.vertex_count() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            mesh.push_vertex(corner, normal, uv);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

/// A cylinder along the Y axis with independent top and bottom radii.
///
/// The side shares a duplicated seam column so UVs wrap cleanly; a radius
/// of zero skips that cap. Side normals tilt with the slope so a tapered
/// cylinder shades correctly.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let hh = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    let mut mesh = MeshData::default();

    // Side rings, top then bottom per column
    let side_base = 0u32;
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let theta = u * std::f32::consts::TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = Vec3::new(sin, slope, cos).normalize();

        mesh.push_vertex(
            Vec3::new(radius_top * sin, hh, radius_top * cos),
            normal,
            Vec2::new(u, 1.0),
        );
        mesh.push_vertex(
            Vec3::new(radius_bottom * sin, -hh, radius_bottom * cos),
            normal,
            Vec2::new(u, 0.0),
        );
    }

    for i in 0..segments {
        let top = side_base + i * 2;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;

        mesh.indices.extend_from_slice(&[top, bottom, next_bottom]);
        // With a zero top radius the second triangle collapses to a line.
        if radius_top > 0.0 {
            mesh.indices.extend_from_slice(&[top, next_bottom, next_top]);
        }
    }

    if radius_top > 0.0 {
        cap(&mut mesh, radius_top, hh, segments, Vec3::Y);
    }
    if radius_bottom > 0.0 {
        cap(&mut mesh, radius_bottom, -hh, segments, Vec3::NEG_Y);
    }

    mesh
}

/// A cone along the Y axis: a cylinder with a zero top radius.
pub fn cone(radius: f32, height: f32, segments: u32) -> MeshData {
    cylinder(0.0, radius, height, segments)
}

fn cap(mesh: &mut MeshData, radius: f32, y: f32, segments: u32, normal: Vec3) {
    let center = mesh.vertex_count() as u32;
    mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal, Vec2::new(0.5, 0.5));

    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.push_vertex(
            Vec3::new(radius * sin, y, radius * cos),
            normal,
            Vec2::new(0.5 + 0.5 * sin, 0.5 + 0.5 * cos),
        );
    }

    let ring = center + 1;
    for i in 0..segments {
        if normal.y > 0.0 {
            mesh.indices.extend_from_slice(&[center, ring + i, ring + i + 1]);
        } else {
            mesh.indices.extend_from_slice(&[center, ring + i + 1, ring + i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mesh_invariants(mesh: &MeshData) {
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.positions.len(), mesh.tex_coords.len());
        assert_eq!(mesh.indices.len() % 3, 0, "index count not a triangle list");

        let vertex_count = mesh.vertex_count() as u32;
        for &index in &mesh.indices {
            assert!(index < vertex_count, "index {} out of range", index);
        }

        for normal in &mesh.normals {
            assert!(
                (normal.length() - 1.0).abs() < 1e-4,
                "normal {:?} not unit length",
                normal
            );
        }

        for uv in &mesh.tex_coords {
            assert!((0.0..=1.0).contains(&uv.x), "u out of range: {}", uv.x);
            assert!((0.0..=1.0).contains(&uv.y), "v out of range: {}", uv.y);
        }
    }

    #[test]
    fn test_cuboid_counts() {
        let mesh = cuboid(5.0, 0.125, 4.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_mesh_invariants(&mesh);
    }

    #[test]
    fn test_cuboid_extents() {
        let mesh = cuboid(5.0, 0.125, 4.0);
        for p in &mesh.positions {
            assert!(p.x.abs() <= 2.5 + 1e-6);
            assert!(p.y.abs() <= 0.0625 + 1e-6);
            assert!(p.z.abs() <= 2.0 + 1e-6);
        }
    }

    #[test]
    fn test_cuboid_winding_faces_outward() {
        let mesh = cuboid(2.0, 2.0, 2.0);
        for triangle in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [
                mesh.positions[triangle[0] as usize],
                mesh.positions[triangle[1] as usize],
                mesh.positions[triangle[2] as usize],
            ];
            let face_normal = (b - a).cross(c - b);
            let centroid = (a + b + c) / 3.0;
            // CCW from outside: the geometric normal points away from center.
            assert!(
                face_normal.dot(centroid) > 0.0,
                "inward-facing triangle {:?}",
                triangle
            );
        }
    }

    #[test]
    fn test_cylinder_counts() {
        let segments = 32;
        let mesh = cylinder(0.1, 0.1, 1.0, segments);
        // Side: 2 vertices per seam column; caps: center + ring.
        let expected_vertices = 2 * (segments + 1) + 2 * (segments + 2);
        assert_eq!(mesh.vertex_count(), expected_vertices as usize);
        // Side quads are two triangles; each cap fans one per segment.
        assert_eq!(mesh.triangle_count(), (4 * segments) as usize);
        assert_mesh_invariants(&mesh);
    }

    #[test]
    fn test_cylinder_side_normals_are_radial() {
        let mesh = cylinder(0.5, 0.5, 2.0, 16);
        // Equal radii: side normals are horizontal.
        for (normal, position) in mesh.normals.iter().zip(&mesh.positions) {
            if normal.y.abs() < 0.5 {
                assert!(normal.y.abs() < 1e-5);
                let radial = Vec3::new(position.x, 0.0, position.z).normalize();
                assert!((*normal - radial).length() < 1e-4);
            }
        }
    }

    #[test]
    fn test_cone_counts() {
        let segments = 32;
        let mesh = cone(0.5, 1.0, segments);
        // Side columns plus one bottom cap.
        let expected_vertices = 2 * (segments + 1) + (segments + 2);
        assert_eq!(mesh.vertex_count(), expected_vertices as usize);
        // One side triangle per segment, one cap triangle per segment.
        assert_eq!(mesh.triangle_count(), (2 * segments) as usize);
        assert_mesh_invariants(&mesh);
    }

    #[test]
    fn test_cone_has_no_top_cap() {
        let mesh = cone(0.5, 1.0, 8);
        // Every vertex at the apex height sits on the axis.
        for p in &mesh.positions {
            if p.y > 0.49 {
                assert!(p.x.abs() < 1e-6 && p.z.abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_cylinder_minimum_segments() {
        let mesh = cylinder(1.0, 1.0, 1.0, 0);
        // Segment counts below 3 are raised to 3.
        assert!(mesh.triangle_count() >= 12);
        assert_mesh_invariants(&mesh);
    }
}
