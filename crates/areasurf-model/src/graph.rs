use serde_json::{Map, Number, Value as Json, json};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::{Error, Result};

pub const ID_KEY: &str = "id";
pub const TYPE_KEY: &str = "speckle_type";
pub const REFERENCE_KEY: &str = "referencedId";
pub const REFERENCE_TYPE: &str = "reference";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(usize);

impl ObjectKey {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Kept as parsed so integers and large ids are written back unchanged.
    Number(Number),
    Text(String),
    Object(ObjectKey),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectKey> {
        match self {
            Self::Object(key) => Some(*key),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ModelObject {
    key: ObjectKey,
    id: String,
    speckle_type: String,
    id_declared: bool,
    type_declared: bool,
    properties: BTreeMap<String, Value>,
}

impl ModelObject {
    pub fn key(&self) -> ObjectKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn speckle_type(&self) -> &str {
        &self.speckle_type
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    /// `Objects.BuiltElements.Area:Objects.BuiltElements.Revit.RevitArea` yields
    /// `Area` then `RevitArea`.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.speckle_type
            .split(':')
            .filter_map(|full| full.rsplit('.').next())
            .filter(|name| !name.is_empty())
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.type_names().any(|candidate| candidate == name)
    }
}

/// Shared and cyclic references resolve to the same [`ObjectKey`].
#[derive(Clone, Debug, Default)]
pub struct ObjectGraph {
    objects: Vec<ModelObject>,
    index: HashMap<String, ObjectKey>,
    roots: Vec<ObjectKey>,
}

impl ObjectGraph {
    /// Every array entry becomes a root. Objects carrying a `referencedId` are
    /// resolved against every identified object in the document, wherever it sits.
    pub fn from_json(json: &Json) -> Result<Self> {
        let mut builder = GraphBuilder::default();
        builder.collect_identified(json);

        let roots: Vec<ObjectKey> = match json {
            Json::Object(map) => vec![builder.intern(map)],
            Json::Array(items) => items
                .iter()
                .filter_map(Json::as_object)
                .map(|map| builder.intern(map))
                .collect(),
            other => return Err(Error::UnexpectedRoot(json_kind(other))),
        };
        if roots.is_empty() {
            return Err(Error::EmptyGraph);
        }

        Ok(Self {
            objects: builder.objects,
            index: builder.index,
            roots,
        })
    }

    pub fn roots(&self) -> &[ObjectKey] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Panics if `key` was not issued by this graph.
    pub fn object(&self, key: ObjectKey) -> &ModelObject {
        &self.objects[key.0]
    }

    pub fn get(&self, key: ObjectKey) -> Option<&ModelObject> {
        self.objects.get(key.0)
    }

    pub fn find(&self, id: &str) -> Option<&ModelObject> {
        self.index.get(id).map(|&key| self.object(key))
    }

    pub fn resolve_path<'a>(&'a self, object: &'a ModelObject, path: &[&str]) -> Option<&'a Value> {
        let (first, rest) = path.split_first()?;
        let mut current = object.get(first)?;
        for segment in rest {
            current = match current {
                Value::Object(key) => self.get(*key)?.get(segment)?,
                Value::Map(map) => map.get(*segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// An object reached again while already being written becomes a reference.
    pub fn object_to_json(&self, key: ObjectKey) -> Json {
        self.write_object(key, &mut Vec::new())
    }

    pub fn value_to_json(&self, value: &Value) -> Json {
        self.write_value(value, &mut Vec::new())
    }

    fn write_object(&self, key: ObjectKey, path: &mut Vec<ObjectKey>) -> Json {
        let object = self.object(key);
        if path.contains(&key) {
            return json!({ REFERENCE_KEY: object.id, TYPE_KEY: REFERENCE_TYPE });
        }

        path.push(key);
        let mut map = Map::new();
        if object.id_declared {
            map.insert(ID_KEY.to_string(), Json::String(object.id.clone()));
        }
        if object.type_declared {
            map.insert(
                TYPE_KEY.to_string(),
                Json::String(object.speckle_type.clone()),
            );
        }
        for (name, value) in &object.properties {
            map.insert(name.clone(), self.write_value(value, path));
        }
        path.pop();
        Json::Object(map)
    }

    fn write_value(&self, value: &Value, path: &mut Vec<ObjectKey>) -> Json {
        match value {
            Value::Null => Json::Null,
            Value::Bool(value) => Json::Bool(*value),
            Value::Number(value) => Json::Number(value.clone()),
            Value::Text(value) => Json::String(value.clone()),
            Value::Object(key) => self.write_object(*key, path),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.write_value(item, path))
                    .collect(),
            ),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(name, item)| (name.clone(), self.write_value(item, path)))
                    .collect(),
            ),
        }
    }
}

#[derive(Default)]
struct GraphBuilder<'j> {
    identified: HashMap<&'j str, &'j Map<String, Json>>,
    objects: Vec<ModelObject>,
    index: HashMap<String, ObjectKey>,
}

impl<'j> GraphBuilder<'j> {
    fn collect_identified(&mut self, json: &'j Json) {
        match json {
            Json::Object(map) => {
                if map.contains_key(TYPE_KEY) {
                    if let Some(id) = map.get(ID_KEY).and_then(Json::as_str) {
                        self.identified.entry(id).or_insert(map);
                    }
                }
                for value in map.values() {
                    self.collect_identified(value);
                }
            }
            Json::Array(items) => {
                for item in items {
                    self.collect_identified(item);
                }
            }
            _ => {}
        }
    }

    fn intern(&mut self, map: &'j Map<String, Json>) -> ObjectKey {
        let declared_id = map.get(ID_KEY).and_then(Json::as_str);
        if let Some(&key) = declared_id.and_then(|id| self.index.get(id)) {
            return key;
        }

        let key = ObjectKey(self.objects.len());
        let id = declared_id
            .map(str::to_string)
            .unwrap_or_else(|| format!("local-{}", key.0));
        let declared_type = map.get(TYPE_KEY).and_then(Json::as_str);
        let speckle_type = declared_type.unwrap_or("Base").to_string();

        // Registered before the properties so cycles back to this object resolve.
        // Synthesized ids stay out of the index; nothing can refer to them.
        if declared_id.is_some() {
            self.index.insert(id.clone(), key);
        }
        self.objects.push(ModelObject {
            key,
            id,
            speckle_type,
            id_declared: declared_id.is_some(),
            type_declared: declared_type.is_some(),
            properties: BTreeMap::new(),
        });

        let mut properties = BTreeMap::new();
        for (name, value) in map {
            if (name == ID_KEY && declared_id.is_some())
                || (name == TYPE_KEY && declared_type.is_some())
            {
                continue;
            }
            properties.insert(name.clone(), self.convert(value));
        }
        self.objects[key.0].properties = properties;
        key
    }

    fn convert(&mut self, json: &'j Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(value) => Value::Bool(*value),
            Json::Number(value) => Value::Number(value.clone()),
            Json::String(value) => Value::Text(value.clone()),
            Json::Array(items) => Value::List(items.iter().map(|item| self.convert(item)).collect()),
            Json::Object(map) => {
                if let Some(target) = map.get(REFERENCE_KEY).and_then(Json::as_str) {
                    return self.resolve_reference(target);
                }
                if map.contains_key(TYPE_KEY) {
                    return Value::Object(self.intern(map));
                }
                Value::Map(
                    map.iter()
                        .map(|(name, value)| (name.clone(), self.convert(value)))
                        .collect(),
                )
            }
        }
    }

    fn resolve_reference(&mut self, id: &str) -> Value {
        if let Some(&key) = self.index.get(id) {
            return Value::Object(key);
        }
        match self.identified.get(id).copied() {
            Some(map) => Value::Object(self.intern(map)),
            None => {
                debug!(id, "skipping reference to an object missing from the document");
                Value::Null
            }
        }
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
