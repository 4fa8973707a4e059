use areasurf_geometry::Point2;

use crate::{Error, Result};

/// Indices address the concatenation of `outer` followed by every hole.
pub fn triangulate_with_holes(outer: &[Point2], holes: &[Vec<Point2>]) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::Triangulation(
            "need at least 3 points in outer boundary".to_string(),
        ));
    }
    if holes.iter().any(|hole| hole.len() < 3) {
        return Err(Error::Triangulation(
            "need at least 3 points in every hole".to_string(),
        ));
    }

    if holes.is_empty() && outer.len() == 3 {
        return Ok(vec![0, 1, 2]);
    }

    let total = outer.len() + holes.iter().map(Vec::len).sum::<usize>();
    let mut vertices = Vec::with_capacity(total * 2);
    for point in outer {
        vertices.push(point.x);
        vertices.push(point.y);
    }

    let mut hole_starts = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_starts.push(vertices.len() / 2);
        for point in hole {
            vertices.push(point.x);
            vertices.push(point.y);
        }
    }

    earcutr::earcut(&vertices, &hole_starts, 2)
        .map_err(|error| Error::Triangulation(format!("{error:?}")))
}
