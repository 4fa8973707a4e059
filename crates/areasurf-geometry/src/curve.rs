use crate::{InnerSpace, Point3, Vector3};

pub const FULL_TURN_SEGMENTS: usize = 32;

#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    points: Vec<Point3>,
}

impl Curve {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn closed(mut points: Vec<Point3>) -> Self {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if points.len() > 1 && first != last {
                points.push(first);
            }
        }
        Self { points }
    }

    pub fn line(start: Point3, end: Point3) -> Self {
        Self::new(vec![start, end])
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<Point3> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point3> {
        self.points.last().copied()
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }
}

/// Returns `None` when the three points are collinear.
pub fn sample_arc(start: Point3, mid: Point3, end: Point3) -> Option<Curve> {
    let ab = mid - start;
    let ac = end - start;
    let n = ab.cross(ac);
    let n2 = n.magnitude2();
    if n2 <= f64::EPSILON * ab.magnitude2().max(ac.magnitude2()).max(1.0) {
        return None;
    }

    let offset = (n.cross(ab) * ac.magnitude2() + ac.cross(n) * ab.magnitude2()) / (2.0 * n2);
    let center = start + offset;
    let radius = offset.magnitude();
    let u = (start - center) / radius;
    let v = n.normalize().cross(u);

    let to_end = end - center;
    let mut sweep = to_end.dot(v).atan2(to_end.dot(u));
    if sweep <= 0.0 {
        sweep += std::f64::consts::TAU;
    }

    let segments = ((FULL_TURN_SEGMENTS as f64) * sweep / std::f64::consts::TAU)
        .ceil()
        .max(4.0) as usize;
    let mut points: Vec<Point3> = (0..=segments)
        .map(|i| {
            let theta = sweep * i as f64 / segments as f64;
            center + u * (radius * theta.cos()) + v * (radius * theta.sin())
        })
        .collect();
    points[0] = start;
    points[segments] = end;
    Some(Curve::new(points))
}

pub fn sample_ellipse(
    origin: Point3,
    x_axis: Vector3,
    y_axis: Vector3,
    first_radius: f64,
    second_radius: f64,
) -> Curve {
    let x_axis = x_axis.normalize();
    let y_axis = y_axis.normalize();
    let points = (0..FULL_TURN_SEGMENTS)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / FULL_TURN_SEGMENTS as f64;
            origin + x_axis * (first_radius * theta.cos()) + y_axis * (second_radius * theta.sin())
        })
        .collect();
    Curve::closed(points)
}
