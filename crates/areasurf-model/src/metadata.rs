use std::collections::BTreeMap;

use crate::graph::{ModelObject, ObjectGraph, Value};

pub type Metadata = BTreeMap<String, serde_json::Value>;

pub const PRESERVED_PROPERTIES: [&str; 13] = [
    "area",
    "perimeter",
    "name",
    "number",
    "level",
    "roomNumber",
    "roomName",
    "room",
    "department",
    "occupancy",
    "parameters",
    "properties",
    "units",
];

pub const GEOMETRY_PROPERTIES: [&str; 6] = [
    "curves",
    "outline",
    "boundary",
    "voids",
    "geometry",
    "displayValue",
];

pub const BOOKKEEPING_PROPERTIES: [&str; 2] = ["totalChildrenCount", "__closure"];

const PARAMETERS_PROPERTY: &str = "parameters";

/// Entries of a `parameters` collection are also lifted to top-level keys
/// unless a property of that name already exists.
pub fn extract_metadata(graph: &ObjectGraph, object: &ModelObject) -> Metadata {
    let mut metadata = Metadata::new();

    for name in PRESERVED_PROPERTIES {
        if let Some(value) = object.get(name) {
            metadata.insert(name.to_string(), graph.value_to_json(value));
        }
    }

    for (name, value) in object.properties() {
        let name = name.as_str();
        if metadata.contains_key(name)
            || GEOMETRY_PROPERTIES.contains(&name)
            || BOOKKEEPING_PROPERTIES.contains(&name)
        {
            continue;
        }
        metadata.insert(name.to_string(), graph.value_to_json(value));
    }

    let parameters = match object.get(PARAMETERS_PROPERTY) {
        Some(Value::Map(map)) => Some(map),
        Some(Value::Object(key)) => graph.get(*key).map(ModelObject::properties),
        _ => None,
    };
    for (name, value) in parameters.into_iter().flatten() {
        if !metadata.contains_key(name) && !BOOKKEEPING_PROPERTIES.contains(&name.as_str()) {
            metadata.insert(name.clone(), graph.value_to_json(value));
        }
    }

    metadata
}
