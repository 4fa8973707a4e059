use crate::{Curve, MetricSpace, Point3};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct Loop {
    points: Vec<Point3>,
}

impl Loop {
    /// Consecutive coincident points collapse into one. Returns `None` when the
    /// run is open or fewer than three distinct points remain.
    pub fn from_closed_points(points: &[Point3], tolerance: f64) -> Option<Self> {
        let (first, last) = (*points.first()?, *points.last()?);
        if points.len() < 2 || !coincident(first, last, tolerance) {
            return None;
        }

        let mut distinct: Vec<Point3> = Vec::with_capacity(points.len());
        for &point in points {
            match distinct.last() {
                Some(&previous) if coincident(previous, point, tolerance) => {}
                _ => distinct.push(point),
            }
        }
        while distinct.len() > 1 && coincident(distinct[0], distinct[distinct.len() - 1], tolerance)
        {
            distinct.pop();
        }

        if distinct.len() < 3 {
            return None;
        }
        Some(Self { points: distinct })
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

    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].distance(self.points[(i + 1) % n]))
            .sum()
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoopGrouping {
    pub loops: Vec<Loop>,
    pub rejected_chains: usize,
}

pub fn coincident(a: Point3, b: Point3, tolerance: f64) -> bool {
    a.distance(b) <= tolerance
}

/// Each curve is used once. A curve joins the current chain when either of its
/// endpoints coincides with the chain's free end; it is reversed if needed.
pub fn group_into_loops(curves: &[Curve], tolerance: f64) -> LoopGrouping {
    let usable: Vec<&Curve> = curves.iter().filter(|curve| curve.len() >= 2).collect();
    let mut used = vec![false; usable.len()];
    let mut grouping = LoopGrouping::default();

    for seed in 0..usable.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;
        let mut chain: Vec<Point3> = usable[seed].points().to_vec();

        while !is_closed(&chain, tolerance) {
            let Some(tail) = chain.last().copied() else {
                break;
            };
            let next = (0..usable.len()).find_map(|index| {
                if used[index] {
                    return None;
                }
                let curve = usable[index];
                match (curve.start(), curve.end()) {
                    (Some(start), _) if coincident(tail, start, tolerance) => {
                        Some((index, curve.clone()))
                    }
                    (_, Some(end)) if coincident(tail, end, tolerance) => {
                        Some((index, curve.reversed()))
                    }
                    _ => None,
                }
            });

            let Some((index, curve)) = next else {
                break;
            };
            used[index] = true;
            chain.extend_from_slice(&curve.points()[1..]);
        }

        match Loop::from_closed_points(&chain, tolerance) {
            Some(found) => grouping.loops.push(found),
            None => {
                debug!(points = chain.len(), "discarding chain that does not form a loop");
                grouping.rejected_chains += 1;
            }
        }
    }

    grouping
}

fn is_closed(chain: &[Point3], tolerance: f64) -> bool {
    match (chain.first(), chain.last()) {
        (Some(&first), Some(&last)) => chain.len() > 2 && coincident(first, last, tolerance),
        _ => false,
    }
}
