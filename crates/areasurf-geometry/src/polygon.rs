use crate::{InnerSpace, Point2, Point3};

pub fn signed_area(ring: &[Point2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

/// Even-odd ray cast. Points exactly on an edge may land either way.
pub fn contains(ring: &[Point2], point: Point2) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

pub fn triangle_area(a: Point3, b: Point3, c: Point3) -> f64 {
    (b - a).cross(c - a).magnitude() * 0.5
}
