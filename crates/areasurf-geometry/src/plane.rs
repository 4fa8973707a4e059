use crate::{EuclideanSpace, InnerSpace, Loop, Point2, Point3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneFit {
    pub origin: Point3,
    /// Unit length.
    pub normal: Vector3,
}

impl PlaneFit {
    /// The normal is the sum of the loops' Newell normals, each flipped to agree
    /// with the dominant loop so that holes wound the other way do not cancel the
    /// outer boundary. Returns `None` when the points span no plane.
    pub fn fit(loops: &[Loop]) -> Option<Self> {
        let normals: Vec<Vector3> = loops.iter().map(|l| newell_normal(l.points())).collect();
        let reference = normals
            .iter()
            .copied()
            .max_by(|a, b| a.magnitude2().total_cmp(&b.magnitude2()))?;

        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        for n in normals {
            normal += if n.dot(reference) < 0.0 { -n } else { n };
        }
        let length = normal.magnitude();
        if length <= f64::EPSILON {
            return None;
        }

        let mut sum = Vector3::new(0.0, 0.0, 0.0);
        let mut count = 0usize;
        for point in loops.iter().flat_map(|l| l.points()) {
            sum += point.to_vec();
            count += 1;
        }
        if count == 0 {
            return None;
        }

        Some(Self {
            origin: Point3::from_vec(sum / count as f64),
            normal: normal / length,
        })
    }

    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    pub fn max_deviation<'a>(&self, points: impl IntoIterator<Item = &'a Point3>) -> f64 {
        points
            .into_iter()
            .map(|&point| self.signed_distance(point).abs())
            .fold(0.0, f64::max)
    }

    /// In-plane orthonormal axes; `u × v` points along the normal.
    pub fn basis(&self) -> (Vector3, Vector3) {
        let n = self.normal;
        let reference = if n.x.abs() <= n.y.abs() && n.x.abs() <= n.z.abs() {
            Vector3::unit_x()
        } else if n.y.abs() <= n.z.abs() {
            Vector3::unit_y()
        } else {
            Vector3::unit_z()
        };
        let v = n.cross(reference).normalize();
        let u = v.cross(n).normalize();
        (u, v)
    }

    pub fn project(&self, points: &[Point3]) -> Vec<Point2> {
        let (u, v) = self.basis();
        points
            .iter()
            .map(|&point| {
                let offset = point - self.origin;
                Point2::new(offset.dot(u), offset.dot(v))
            })
            .collect()
    }
}

/// Newell's polygon normal; its length is twice the enclosed area.
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    for i in 0..n {
        let current = points[i];
        let next = points[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}
