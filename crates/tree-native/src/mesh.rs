//! Procedural meshes for the instanced batches and the photo quad.
//!
//! Every mesh fits the unit cube centred on the origin so instance scales
//! read as world sizes.

use glam::Vec3;
use std::f32::consts::{PI, TAU};
use tree_core::Batch;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Sphere,
    Cube,
    Cylinder,
    Tetrahedron,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Sphere, Shape::Cube, Shape::Cylinder, Shape::Tetrahedron];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn build(self) -> Mesh {
        match self {
            Shape::Sphere => uv_sphere(12, 16),
            Shape::Cube => cube(),
            Shape::Cylinder => cylinder(12),
            Shape::Tetrahedron => tetrahedron(),
        }
    }
}

/// Mesh each batch is drawn with.
pub fn shape_for(batch: Batch) -> Shape {
    match batch {
        Batch::Sphere | Batch::Star => Shape::Sphere,
        Batch::Cube | Batch::Gingerbread | Batch::Meteor => Shape::Cube,
        Batch::Cane => Shape::Cylinder,
        Batch::Dust | Batch::Snow | Batch::StarField => Shape::Tetrahedron,
    }
}

impl Mesh {
    fn push(&mut self, position: Vec3, normal: Vec3) -> u16 {
        let i = self.vertices.len() as u16;
        self.vertices.push(Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
        });
        i
    }
}

/// Unit cube with flat per-face normals.
pub fn cube() -> Mesh {
    let mut mesh = Mesh::default();
    let faces = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    for n in faces {
        // two tangents spanning the face, oriented so (u, v, n) is right-handed
        let u = if n.x.abs() > 0.5 { Vec3::Y } else { Vec3::X };
        let v = n.cross(u);
        let u = v.cross(n);
        let c = n * 0.5;
        let base = mesh.push(c - u * 0.5 - v * 0.5, n);
        mesh.push(c + u * 0.5 - v * 0.5, n);
        mesh.push(c + u * 0.5 + v * 0.5, n);
        mesh.push(c - u * 0.5 + v * 0.5, n);
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Sphere of radius 0.5.
pub fn uv_sphere(rings: u16, segments: u16) -> Mesh {
    let mut mesh = Mesh::default();
    for r in 0..=rings {
        let phi = PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let theta = TAU * s as f32 / segments as f32;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.push(n * 0.5, n);
        }
    }
    let stride = segments + 1;
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            mesh.indices
                .extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

/// Capped cylinder along Y, radius 0.5, height 1.
pub fn cylinder(segments: u16) -> Mesh {
    let mut mesh = Mesh::default();
    for s in 0..=segments {
        let theta = TAU * s as f32 / segments as f32;
        let n = Vec3::new(theta.cos(), 0.0, theta.sin());
        mesh.push(n * 0.5 - Vec3::Y * 0.5, n);
        mesh.push(n * 0.5 + Vec3::Y * 0.5, n);
    }
    for s in 0..segments {
        let a = s * 2;
        mesh.indices
            .extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }
    for (y, n) in [(0.5, Vec3::Y), (-0.5, Vec3::NEG_Y)] {
        let center = mesh.push(Vec3::new(0.0, y, 0.0), n);
        let first = center + 1;
        for s in 0..=segments {
            let theta = TAU * s as f32 / segments as f32;
            mesh.push(Vec3::new(theta.cos() * 0.5, y, theta.sin() * 0.5), n);
        }
        for s in 0..segments {
            mesh.indices
                .extend_from_slice(&[center, first + s, first + s + 1]);
        }
    }
    mesh
}

/// Regular tetrahedron inscribed in the unit cube, flat shaded.
pub fn tetrahedron() -> Mesh {
    let p = [
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
    ];
    let mut mesh = Mesh::default();
    for [a, b, c] in [[0, 1, 3], [0, 2, 1], [0, 3, 2], [1, 2, 3]] {
        let n = (p[b] - p[a]).cross(p[c] - p[a]).normalize();
        let i = mesh.push(p[a], n);
        mesh.push(p[b], n);
        mesh.push(p[c], n);
        mesh.indices.extend_from_slice(&[i, i + 1, i + 2]);
    }
    mesh
}

/// Unit quad in the XY plane facing +Z, as a triangle list.
pub fn photo_quad() -> [QuadVertex; 6] {
    let v = |x: f32, y: f32, u: f32, w: f32| QuadVertex {
        position: [x, y, 0.0],
        uv: [u, w],
    };
    [
        v(-0.5, -0.5, 0.0, 1.0),
        v(0.5, -0.5, 1.0, 1.0),
        v(0.5, 0.5, 1.0, 0.0),
        v(-0.5, -0.5, 0.0, 1.0),
        v(0.5, 0.5, 1.0, 0.0),
        v(-0.5, 0.5, 0.0, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_unit_cube(mesh: &Mesh) {
        for v in &mesh.vertices {
            for c in v.position {
                assert!(c.abs() <= 0.5 + 1e-5);
            }
        }
    }

    #[test]
    fn meshes_fit_the_unit_cube() {
        for shape in Shape::ALL {
            let mesh = shape.build();
            assert!(!mesh.indices.is_empty());
            assert_eq!(mesh.indices.len() % 3, 0);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
            assert_in_unit_cube(&mesh);
        }
    }

    #[test]
    fn cube_normals_point_outward() {
        let mesh = cube();
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.vertices[tri[k] as usize].position));
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            // counter-clockwise when seen from outside
            assert!((b - a).cross(c - a).dot(n) > 0.0);
            assert!(a.dot(n) > 0.0);
        }
    }

    #[test]
    fn tetrahedron_faces_outward() {
        let mesh = tetrahedron();
        for tri in mesh.indices.chunks(3) {
            let a = Vec3::from(mesh.vertices[tri[0] as usize].position);
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(a.dot(n) > 0.0);
        }
    }

    #[test]
    fn every_batch_has_a_shape() {
        for batch in Batch::ALL {
            let _ = shape_for(batch).build();
        }
        assert_eq!(shape_for(Batch::Cane), Shape::Cylinder);
    }
}
