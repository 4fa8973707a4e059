use areasurf_geometry::Point3;
use areasurf_geometry::polygon::triangle_area;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[usize; 3]>,
}

impl SurfaceMesh {
    pub fn with_vertices(points: &[Point3]) -> Self {
        Self {
            vertices: points.iter().map(|p| [p.x, p.y, p.z]).collect(),
            faces: Vec::new(),
        }
    }

    pub fn push_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    pub fn vertex(&self, index: usize) -> Point3 {
        let [x, y, z] = self.vertices[index];
        Point3::new(x, y, z)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn area(&self) -> f64 {
        self.faces
            .iter()
            .map(|&[a, b, c]| triangle_area(self.vertex(a), self.vertex(b), self.vertex(c)))
            .sum()
    }

    pub fn flat_vertices(&self) -> Vec<f64> {
        self.vertices.iter().flatten().copied().collect()
    }

    /// Faces in the host's mesh encoding: a vertex count before each face's indices.
    pub fn encoded_faces(&self) -> Vec<usize> {
        self.faces
            .iter()
            .flat_map(|&[a, b, c]| [3, a, b, c])
            .collect()
    }
}
