/// Object-space meshes drawn under the model stack
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    /// Build a flat-shaded triangle: every vertex carries the face normal
    pub fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = (b - a).cross(&(c - a));
        let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        Self {
            vertices: [
                Vertex::new(a, normal),
                Vertex::new(b, normal),
                Vertex::new(c, normal),
            ],
        }
    }

    /// Counter-clockwise face normal; zero for a degenerate triangle
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [a, b, c] = self.vertices.map(|v| v.position);
        (b - a)
            .cross(&(c - a))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangulate an indexed vertex list, three indices per face.
    /// A trailing partial face is ignored.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range for `positions`.
    pub fn from_indexed(positions: &[Point3<f32>], indices: &[usize]) -> Self {
        let triangles = indices
            .chunks_exact(3)
            .map(|face| Triangle::flat(positions[face[0]], positions[face[1]], positions[face[2]]))
            .collect();
        Self { triangles }
    }

    /// Axis-aligned cube centered on the origin with outward faces
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners: Vec<Point3<f32>> = (0..8)
            .map(|i| {
                let pick = |bit: usize| if i & bit != 0 { h } else { -h };
                Point3::new(pick(1), pick(2), pick(4))
            })
            .collect();

        // Corner index bits: 1 = +x, 2 = +y, 4 = +z.
        #[rustfmt::skip]
        let indices = [
            4, 5, 7,  4, 7, 6, // +z
            0, 2, 3,  0, 3, 1, // -z
            2, 6, 7,  2, 7, 3, // +y
            0, 1, 5,  0, 5, 4, // -y
            1, 3, 7,  1, 7, 5, // +x
            0, 4, 6,  0, 6, 2, // -x
        ];
        Self::from_indexed(&corners, &indices)
    }

    /// Small four-faced pyramid pointing toward +z
    pub fn pyramid() -> Self {
        let apex = Point3::new(0.0, 0.3, 0.0);
        let right = Point3::new(-0.3, -0.1, -0.1);
        let left = Point3::new(0.3, -0.1, -0.1);
        let front = Point3::new(0.0, -0.1, 0.7);

        #[rustfmt::skip]
        let indices = [
            1, 2, 3, // underside
            1, 3, 0, // starboard
            3, 2, 0, // port
            2, 1, 0, // back
        ];
        Self::from_indexed(&[apex, right, left, front], &indices)
    }
}
