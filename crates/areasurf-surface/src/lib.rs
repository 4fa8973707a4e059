pub mod mesh;
pub mod triangulation;

use areasurf_base::AREA_EPSILON;
use areasurf_geometry::{BoundaryLoops, InnerSpace, Point3};
use thiserror::Error;
use tracing::debug;

pub use mesh::SurfaceMesh;

#[derive(Error, Debug)]
pub enum Error {
    #[error("triangulation failed: {0}")]
    Triangulation(String),
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Relative slack allowed between the triangulated area and the loop area.
pub const AREA_RELATIVE_TOLERANCE: f64 = 1.0e-6;

pub struct SurfaceBuilder;

impl SurfaceBuilder {
    /// Vertices are the loop points themselves, outer loop first, then each hole
    /// in order. Triangles are wound to face along the fitted plane's normal.
    pub fn planar_mesh(boundary: &BoundaryLoops) -> Result<SurfaceMesh> {
        let plane = &boundary.plane;
        let outer_2d = plane.project(boundary.outer.points());
        let holes_2d: Vec<_> = boundary
            .holes
            .iter()
            .map(|hole| plane.project(hole.points()))
            .collect();

        let indices = triangulation::triangulate_with_holes(&outer_2d, &holes_2d)?;

        let vertices: Vec<Point3> = boundary
            .outer
            .points()
            .iter()
            .chain(boundary.holes.iter().flat_map(|hole| hole.points()))
            .copied()
            .collect();

        let mut mesh = SurfaceMesh::with_vertices(&vertices);
        for triangle in indices.chunks_exact(3) {
            let (a, b, c) = (triangle[0], triangle[1], triangle[2]);
            let facing = (vertices[b] - vertices[a])
                .cross(vertices[c] - vertices[a])
                .dot(plane.normal);
            if facing.abs() <= AREA_EPSILON {
                continue;
            }
            if facing > 0.0 {
                mesh.push_face([a, b, c]);
            } else {
                mesh.push_face([a, c, b]);
            }
        }

        if mesh.face_count() == 0 {
            return Err(Error::Degenerate("triangulation produced no faces".to_string()));
        }

        let expected = boundary.net_area();
        let actual = mesh.area();
        let slack = (expected.abs() * AREA_RELATIVE_TOLERANCE).max(AREA_EPSILON);
        if (actual - expected).abs() > slack {
            debug!(expected, actual, "triangulated area does not match boundary area");
            return Err(Error::Degenerate(format!(
                "triangulated area {actual} differs from boundary area {expected}"
            )));
        }

        Ok(mesh)
    }
}
