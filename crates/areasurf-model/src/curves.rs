use areasurf_geometry::curve::{sample_arc, sample_ellipse};
use areasurf_geometry::{Curve, EuclideanSpace, PlaneFit, Point3, Vector3};

use crate::graph::{ModelObject, ObjectGraph, Value};

pub const VOIDS_PROPERTY: &str = "voids";

const MAX_CURVE_NESTING: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveLookup {
    pub path: &'static [&'static str],
}

impl CurveLookup {
    const fn at(path: &'static [&'static str]) -> Self {
        Self { path }
    }

    pub fn label(&self) -> String {
        self.path.join(".")
    }
}

/// Lookups tried in order; the first yielding any curve wins.
pub const CURVE_LOOKUPS: &[CurveLookup] = &[
    CurveLookup::at(&["curves"]),
    CurveLookup::at(&["outline"]),
    CurveLookup::at(&["outline", "segments"]),
    CurveLookup::at(&["outline", "curves"]),
    CurveLookup::at(&["boundary"]),
    CurveLookup::at(&["boundary", "segments"]),
    CurveLookup::at(&["boundary", "curves"]),
    CurveLookup::at(&["geometry"]),
    CurveLookup::at(&["displayValue"]),
];

#[derive(Clone, Debug)]
pub struct ExtractedCurves {
    pub lookup: CurveLookup,
    pub curves: Vec<Curve>,
    pub void_curves: usize,
}

pub fn extract_curves(graph: &ObjectGraph, object: &ModelObject) -> Option<ExtractedCurves> {
    let (lookup, mut curves) = CURVE_LOOKUPS.iter().find_map(|lookup| {
        let value = graph.resolve_path(object, lookup.path)?;
        let curves = coerce_curves(graph, value);
        (!curves.is_empty()).then_some((*lookup, curves))
    })?;

    let voids = object
        .get(VOIDS_PROPERTY)
        .map(|value| coerce_curves(graph, value))
        .unwrap_or_default();
    let void_curves = voids.len();
    curves.extend(voids);

    Some(ExtractedCurves {
        lookup,
        curves,
        void_curves,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    Line,
    Polyline,
    Polycurve,
    Curve,
    Arc,
    Circle,
    Ellipse,
}

impl CurveKind {
    pub fn of(object: &ModelObject) -> Option<Self> {
        object.type_names().find_map(|name| match name {
            "Line" => Some(Self::Line),
            "Polyline" => Some(Self::Polyline),
            "Polycurve" => Some(Self::Polycurve),
            "Curve" => Some(Self::Curve),
            "Arc" => Some(Self::Arc),
            "Circle" => Some(Self::Circle),
            "Ellipse" => Some(Self::Ellipse),
            _ => None,
        })
    }
}

pub fn coerce_curves(graph: &ObjectGraph, value: &Value) -> Vec<Curve> {
    let mut curves = Vec::new();
    collect_curves(graph, value, &mut curves, 0);
    curves
}

fn collect_curves(graph: &ObjectGraph, value: &Value, out: &mut Vec<Curve>, depth: usize) {
    if depth > MAX_CURVE_NESTING {
        return;
    }
    match value {
        Value::Object(key) => {
            if let Some(object) = graph.get(*key) {
                curves_from_object(graph, object, out, depth);
            }
        }
        Value::List(items) => {
            for item in items {
                collect_curves(graph, item, out, depth + 1);
            }
        }
        _ => {}
    }
}

fn curves_from_object(graph: &ObjectGraph, object: &ModelObject, out: &mut Vec<Curve>, depth: usize) {
    let Some(kind) = CurveKind::of(object) else {
        return;
    };
    let closed = object
        .get("closed")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let curve = match kind {
        CurveKind::Line => read_line(graph, object),
        CurveKind::Polyline => object
            .get("value")
            .and_then(read_coordinates)
            .or_else(|| object.get("points").and_then(|v| read_point_list(graph, v)))
            .map(|points| finish(points, closed)),
        CurveKind::Polycurve => {
            if let Some(segments) = object.get("segments") {
                collect_curves(graph, segments, out, depth + 1);
            }
            None
        }
        CurveKind::Curve => {
            let before = out.len();
            if let Some(display) = object.get("displayValue") {
                collect_curves(graph, display, out, depth + 1);
            }
            if out.len() > before {
                None
            } else {
                object
                    .get("points")
                    .and_then(read_coordinates)
                    .or_else(|| {
                        object
                            .get("controlPoints")
                            .and_then(|v| read_point_list(graph, v))
                    })
                    .map(|points| finish(points, closed))
            }
        }
        CurveKind::Arc => read_arc(graph, object),
        CurveKind::Circle => {
            let radius = object.get("radius").and_then(Value::as_number);
            read_plane(graph, object).zip(radius).map(|((origin, x, y), r)| {
                sample_ellipse(origin, x, y, r, r)
            })
        }
        CurveKind::Ellipse => {
            let first = object.get("firstRadius").and_then(Value::as_number);
            let second = object.get("secondRadius").and_then(Value::as_number);
            read_plane(graph, object)
                .zip(first.zip(second))
                .map(|((origin, x, y), (r1, r2))| sample_ellipse(origin, x, y, r1, r2))
        }
    };

    if let Some(curve) = curve.filter(|curve| curve.len() >= 2) {
        out.push(curve);
    }
}

fn finish(points: Vec<Point3>, closed: bool) -> Curve {
    if closed {
        Curve::closed(points)
    } else {
        Curve::new(points)
    }
}

fn read_line(graph: &ObjectGraph, object: &ModelObject) -> Option<Curve> {
    let start = read_point(graph, object.get("start")?)?;
    let end = read_point(graph, object.get("end")?)?;
    Some(Curve::line(start, end))
}

fn read_arc(graph: &ObjectGraph, object: &ModelObject) -> Option<Curve> {
    let start = read_point(graph, object.get("startPoint")?)?;
    let end = read_point(graph, object.get("endPoint")?)?;
    let mid = object.get("midPoint").and_then(|v| read_point(graph, v));
    match mid {
        Some(mid) => sample_arc(start, mid, end).or_else(|| Some(Curve::line(start, end))),
        None => Some(Curve::line(start, end)),
    }
}

fn read_plane(graph: &ObjectGraph, object: &ModelObject) -> Option<(Point3, Vector3, Vector3)> {
    let plane = graph.get(object.get("plane")?.as_object()?)?;
    let origin = read_point(graph, plane.get("origin")?)?;
    let axis = |name: &str| {
        plane
            .get(name)
            .and_then(|v| read_point(graph, v))
            .map(|p| p.to_vec())
    };

    match (axis("xdir"), axis("ydir")) {
        (Some(x), Some(y)) => Some((origin, x, y)),
        _ => {
            let normal = axis("normal").unwrap_or_else(Vector3::unit_z);
            let (x, y) = PlaneFit { origin, normal }.basis();
            Some((origin, x, y))
        }
    }
}

pub fn read_point(graph: &ObjectGraph, value: &Value) -> Option<Point3> {
    match value {
        Value::Object(key) => {
            let point = graph.get(*key)?;
            let coordinate = |name: &str| point.get(name).and_then(Value::as_number);
            Some(Point3::new(
                coordinate("x")?,
                coordinate("y")?,
                coordinate("z").unwrap_or(0.0),
            ))
        }
        Value::Map(map) => {
            let coordinate = |name: &str| map.get(name).and_then(Value::as_number);
            Some(Point3::new(
                coordinate("x")?,
                coordinate("y")?,
                coordinate("z").unwrap_or(0.0),
            ))
        }
        Value::List(items) if items.len() == 2 || items.len() == 3 => {
            let numbers: Option<Vec<f64>> = items.iter().map(Value::as_number).collect();
            let numbers = numbers?;
            Some(Point3::new(
                numbers[0],
                numbers[1],
                numbers.get(2).copied().unwrap_or(0.0),
            ))
        }
        _ => None,
    }
}

fn read_point_list(graph: &ObjectGraph, value: &Value) -> Option<Vec<Point3>> {
    value
        .as_list()?
        .iter()
        .map(|item| read_point(graph, item))
        .collect()
}

/// Reads a flat `x, y, z, x, y, z, ...` number list.
fn read_coordinates(value: &Value) -> Option<Vec<Point3>> {
    let items = value.as_list()?;
    if items.is_empty() || items.len() % 3 != 0 {
        return None;
    }
    let numbers: Vec<f64> = items.iter().map(Value::as_number).collect::<Option<_>>()?;
    Some(
        numbers
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use serde_json::json;

    fn point(x: f64, y: f64) -> serde_json::Value {
        json!({ "speckle_type": "Objects.Geometry.Point", "x": x, "y": y, "z": 0.0 })
    }

    fn line(a: (f64, f64), b: (f64, f64)) -> serde_json::Value {
        json!({
            "speckle_type": "Objects.Geometry.Line",
            "start": point(a.0, a.1),
            "end": point(b.0, b.1)
        })
    }

    fn graph_of(json: serde_json::Value) -> Result<ObjectGraph> {
        ObjectGraph::from_json(&json)
    }

    #[test]
    fn polycurve_outline_expands_segments() -> Result<()> {
        let graph = graph_of(json!({
            "speckle_type": "Objects.BuiltElements.Area",
            "outline": {
                "speckle_type": "Objects.Geometry.Polycurve",
                "segments": [
                    line((0.0, 0.0), (1.0, 0.0)),
                    line((1.0, 0.0), (1.0, 1.0)),
                    line((1.0, 1.0), (0.0, 0.0))
                ]
            }
        }))?;
        let area = graph.object(graph.roots()[0]);
        let extracted = extract_curves(&graph, area).expect("curves");
        assert_eq!(extracted.lookup.label(), "outline");
        assert_eq!(extracted.curves.len(), 3);
        Ok(())
    }

    #[test]
    fn earlier_lookup_wins() -> Result<()> {
        let graph = graph_of(json!({
            "speckle_type": "Objects.BuiltElements.Area",
            "boundary": [line((5.0, 5.0), (6.0, 5.0))],
            "curves": [line((0.0, 0.0), (1.0, 0.0)), line((1.0, 0.0), (0.0, 1.0))]
        }))?;
        let area = graph.object(graph.roots()[0]);
        let extracted = extract_curves(&graph, area).expect("curves");
        assert_eq!(extracted.lookup.label(), "curves");
        assert_eq!(extracted.curves.len(), 2);
        Ok(())
    }

    #[test]
    fn nested_container_and_missing_intermediates() -> Result<()> {
        let graph = graph_of(json!({
            "speckle_type": "Objects.BuiltElements.AreaBoundary",
            "outline": { "kind": "container", "segments": [line((0.0, 0.0), (2.0, 0.0))] },
            "geometry": { "speckle_type": "Objects.Geometry.Mesh", "vertices": [] }
        }))?;
        let area = graph.object(graph.roots()[0]);
        let extracted = extract_curves(&graph, area).expect("curves");
        assert_eq!(extracted.lookup.label(), "outline.segments");
        Ok(())
    }

    #[test]
    fn non_curve_values_yield_nothing() -> Result<()> {
        let graph = graph_of(json!({
            "speckle_type": "Objects.BuiltElements.Area",
            "outline": 12.5,
            "displayValue": [{ "speckle_type": "Objects.Geometry.Mesh" }]
        }))?;
        let area = graph.object(graph.roots()[0]);
        assert!(extract_curves(&graph, area).is_none());
        Ok(())
    }

    #[test]
    fn closed_polyline_and_voids() -> Result<()> {
        let graph = graph_of(json!({
            "speckle_type": "Objects.BuiltElements.Area",
            "outline": {
                "speckle_type": "Objects.Geometry.Polyline",
                "value": [0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 4.0, 4.0, 0.0, 0.0, 4.0, 0.0],
                "closed": true
            },
            "voids": [{
                "speckle_type": "Objects.Geometry.Polyline",
                "value": [1.0, 1.0, 0.0, 2.0, 1.0, 0.0, 2.0, 2.0, 0.0],
                "closed": true
            }]
        }))?;
        let area = graph.object(graph.roots()[0]);
        let extracted = extract_curves(&graph, area).expect("curves");
        assert_eq!(extracted.curves.len(), 2);
        assert_eq!(extracted.void_curves, 1);
        assert_eq!(extracted.curves[0].len(), 5);
        assert_eq!(extracted.curves[0].start(), extracted.curves[0].end());
        Ok(())
    }

    #[test]
    fn circle_is_sampled_from_plane() -> Result<()> {
        let graph = graph_of(json!({
            "speckle_type": "Objects.Geometry.Circle",
            "radius": 2.0,
            "plane": {
                "speckle_type": "Objects.Geometry.Plane",
                "origin": point(1.0, 1.0),
                "normal": { "speckle_type": "Objects.Geometry.Vector", "x": 0.0, "y": 0.0, "z": 1.0 }
            }
        }))?;
        let curves = coerce_curves(&graph, &Value::Object(graph.roots()[0]));
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].start(), curves[0].end());
        Ok(())
    }
}
