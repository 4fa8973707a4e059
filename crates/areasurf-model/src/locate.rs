use crate::curves::{CURVE_LOOKUPS, coerce_curves};
use crate::graph::{ModelObject, ObjectGraph};

pub const BOUNDARY_TYPE_NAMES: [&str; 2] = ["AreaBoundary", "Area"];

pub const CURVE_PROPERTY_NAMES: [&str; 3] = ["outline", "boundary", "curves"];

pub fn is_area_boundary(graph: &ObjectGraph, object: &ModelObject) -> bool {
    if object
        .type_names()
        .any(|name| BOUNDARY_TYPE_NAMES.contains(&name))
    {
        return true;
    }
    CURVE_LOOKUPS
        .iter()
        .filter(|lookup| {
            lookup
                .path
                .first()
                .is_some_and(|root| CURVE_PROPERTY_NAMES.contains(root))
        })
        .any(|lookup| {
            graph
                .resolve_path(object, lookup.path)
                .is_some_and(|value| !coerce_curves(graph, value).is_empty())
        })
}

pub fn locate_boundaries<'g>(
    graph: &'g ObjectGraph,
    objects: impl IntoIterator<Item = &'g ModelObject>,
) -> Vec<&'g ModelObject> {
    objects
        .into_iter()
        .filter(|object| is_area_boundary(graph, object))
        .collect()
}
