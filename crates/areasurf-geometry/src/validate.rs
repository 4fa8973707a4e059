use areasurf_base::{AREA_EPSILON, ConversionSettings};
use tracing::debug;

use crate::plane::PlaneFit;
use crate::polygon::{contains, signed_area};
use crate::{Curve, Error, Loop, Result, group_into_loops};

#[derive(Clone, Debug)]
pub struct BoundaryLoops {
    pub plane: PlaneFit,
    pub outer: Loop,
    pub holes: Vec<Loop>,
    pub outer_area: f64,
    pub hole_area: f64,
}

impl BoundaryLoops {
    pub fn net_area(&self) -> f64 {
        self.outer_area - self.hole_area
    }
}

#[derive(Clone, Debug)]
pub enum Verdict {
    Accepted(BoundaryLoops),
    BelowMinimumArea { area: f64 },
}

/// The loop with the largest enclosed area becomes the outer boundary. With
/// `merge_holes` set, the remaining loops lying inside it become holes; all
/// other loops are dropped.
pub fn validate_boundary(curves: &[Curve], settings: &ConversionSettings) -> Result<Verdict> {
    let tolerance = settings.surface_tolerance;
    let grouping = group_into_loops(curves, tolerance);
    if grouping.loops.is_empty() {
        return Err(Error::NoClosedLoop {
            curves: curves.len(),
            open_chains: grouping.rejected_chains,
        });
    }
    let loops = grouping.loops;

    let plane = PlaneFit::fit(&loops)
        .ok_or_else(|| Error::Degenerate("boundary points do not span a plane".to_string()))?;
    let deviation = plane.max_deviation(loops.iter().flat_map(|l| l.points()));
    if deviation > tolerance {
        return Err(Error::NotCoplanar {
            deviation,
            tolerance,
        });
    }

    let rings: Vec<_> = loops.iter().map(|l| plane.project(l.points())).collect();
    let areas: Vec<f64> = rings.iter().map(|ring| signed_area(ring).abs()).collect();
    let (outer_index, outer_area) = areas
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| Error::Degenerate("no loops".to_string()))?;
    if outer_area <= AREA_EPSILON {
        return Err(Error::Degenerate(
            "outer boundary encloses no area".to_string(),
        ));
    }

    if outer_area < settings.min_area_threshold {
        return Ok(Verdict::BelowMinimumArea { area: outer_area });
    }

    let mut holes = Vec::new();
    let mut hole_area = 0.0;
    if settings.merge_holes {
        let outer_ring = &rings[outer_index];
        for (index, candidate) in loops.iter().enumerate() {
            if index == outer_index {
                continue;
            }
            let inside = rings[index].iter().all(|&point| contains(outer_ring, point));
            if areas[index] <= AREA_EPSILON || !inside {
                debug!(
                    area = areas[index],
                    inside, "ignoring interior loop that cannot be used as a hole"
                );
                continue;
            }
            hole_area += areas[index];
            holes.push(candidate.clone());
        }
    }

    Ok(Verdict::Accepted(BoundaryLoops {
        plane,
        outer: loops[outer_index].clone(),
        holes,
        outer_area,
        hole_area,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point3;
    use approx::assert_relative_eq;

    fn square(origin: (f64, f64), size: f64, z: f64) -> Curve {
        let (x, y) = origin;
        Curve::closed(vec![
            Point3::new(x, y, z),
            Point3::new(x + size, y, z),
            Point3::new(x + size, y + size, z),
            Point3::new(x, y + size, z),
        ])
    }

    fn accepted(verdict: Verdict) -> BoundaryLoops {
        match verdict {
            Verdict::Accepted(loops) => loops,
            Verdict::BelowMinimumArea { area } => panic!("unexpected skip at area {area}"),
        }
    }

    #[test]
    fn largest_loop_is_outer() -> Result<()> {
        let curves = vec![square((1.0, 1.0), 1.0, 0.0), square((0.0, 0.0), 4.0, 0.0)];
        let loops = accepted(validate_boundary(&curves, &ConversionSettings::default())?);
        assert_relative_eq!(loops.outer_area, 16.0, epsilon = 1.0e-9);
        assert_eq!(loops.holes.len(), 1);
        assert_relative_eq!(loops.net_area(), 15.0, epsilon = 1.0e-9);
        Ok(())
    }

    #[test]
    fn holes_dropped_when_merge_disabled() -> Result<()> {
        let curves = vec![square((0.0, 0.0), 4.0, 0.0), square((1.0, 1.0), 1.0, 0.0)];
        let settings = ConversionSettings {
            merge_holes: false,
            ..ConversionSettings::default()
        };
        let loops = accepted(validate_boundary(&curves, &settings)?);
        assert!(loops.holes.is_empty());
        assert_relative_eq!(loops.net_area(), 16.0, epsilon = 1.0e-9);
        Ok(())
    }

    #[test]
    fn loop_outside_outer_is_not_a_hole() -> Result<()> {
        let curves = vec![square((0.0, 0.0), 4.0, 0.0), square((10.0, 10.0), 1.0, 0.0)];
        let loops = accepted(validate_boundary(&curves, &ConversionSettings::default())?);
        assert!(loops.holes.is_empty());
        Ok(())
    }

    #[test]
    fn deviation_equal_to_tolerance_is_accepted() -> Result<()> {
        let t = 0.01;
        let curve = Curve::closed(vec![
            Point3::new(0.0, 0.0, t),
            Point3::new(1.0, 0.0, -t),
            Point3::new(1.0, 1.0, t),
            Point3::new(0.0, 1.0, -t),
        ]);
        let verdict = validate_boundary(&[curve], &ConversionSettings::default())?;
        assert!(matches!(verdict, Verdict::Accepted(_)));
        Ok(())
    }

    #[test]
    fn deviation_above_tolerance_is_rejected() {
        let t = 0.0101;
        let curve = Curve::closed(vec![
            Point3::new(0.0, 0.0, t),
            Point3::new(1.0, 0.0, -t),
            Point3::new(1.0, 1.0, t),
            Point3::new(0.0, 1.0, -t),
        ]);
        let result = validate_boundary(&[curve], &ConversionSettings::default());
        assert!(matches!(result, Err(Error::NotCoplanar { .. })));
    }

    #[test]
    fn collinear_loop_is_degenerate() {
        let curve = Curve::closed(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        let result = validate_boundary(&[curve], &ConversionSettings::default());
        assert!(matches!(result, Err(Error::Degenerate(_))));
    }

    #[test]
    fn open_curve_has_no_loop() {
        let curve = Curve::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]);
        let result = validate_boundary(&[curve], &ConversionSettings::default());
        assert!(matches!(result, Err(Error::NoClosedLoop { .. })));
    }

    #[test]
    fn minimum_area_applies_to_the_gross_outer_area() -> Result<()> {
        let settings = ConversionSettings {
            min_area_threshold: 10.0,
            ..ConversionSettings::default()
        };
        let curves = vec![square((0.0, 0.0), 4.0, 0.0), square((0.5, 0.5), 3.0, 0.0)];
        let loops = accepted(validate_boundary(&curves, &settings)?);
        assert_relative_eq!(loops.outer_area, 16.0, epsilon = 1.0e-9);
        assert_relative_eq!(loops.net_area(), 7.0, epsilon = 1.0e-9);
        Ok(())
    }

    #[test]
    fn small_outer_boundary_is_skipped() -> Result<()> {
        let settings = ConversionSettings {
            min_area_threshold: 10.0,
            ..ConversionSettings::default()
        };
        let verdict = validate_boundary(&[square((0.0, 0.0), 2.0, 0.0)], &settings)?;
        match verdict {
            Verdict::BelowMinimumArea { area } => assert_relative_eq!(area, 4.0, epsilon = 1.0e-9),
            Verdict::Accepted(_) => panic!("expected skip"),
        }
        Ok(())
    }
}
