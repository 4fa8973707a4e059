use std::collections::HashSet;

use crate::graph::{ModelObject, ObjectGraph, ObjectKey, Value};

enum Step {
    Enter(ObjectKey),
    Leave(ObjectKey),
}

/// Lazy and single-use. An object already on the current path is never
/// re-entered, so the walk ends on cyclic graphs. With identity de-duplication
/// (the default from [`flatten`]) each object is produced at most once.
pub struct Flatten<'g> {
    graph: &'g ObjectGraph,
    stack: Vec<Step>,
    visited: HashSet<ObjectKey>,
    on_path: HashSet<ObjectKey>,
    dedup: bool,
}

pub fn flatten<'g>(graph: &'g ObjectGraph, roots: &[ObjectKey]) -> Flatten<'g> {
    Flatten::new(graph, roots, true)
}

impl<'g> Flatten<'g> {
    pub fn new(graph: &'g ObjectGraph, roots: &[ObjectKey], dedup: bool) -> Self {
        Self {
            graph,
            stack: roots.iter().rev().copied().map(Step::Enter).collect(),
            visited: HashSet::new(),
            on_path: HashSet::new(),
            dedup,
        }
    }
}

impl<'g> Iterator for Flatten<'g> {
    type Item = &'g ModelObject;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(step) = self.stack.pop() {
            let key = match step {
                Step::Leave(key) => {
                    self.on_path.remove(&key);
                    continue;
                }
                Step::Enter(key) => key,
            };
            if self.on_path.contains(&key) || (self.dedup && !self.visited.insert(key)) {
                continue;
            }
            let Some(object) = self.graph.get(key) else {
                continue;
            };

            self.on_path.insert(key);
            self.stack.push(Step::Leave(key));
            let mut children = Vec::new();
            for value in object.properties().values() {
                child_keys(value, &mut children);
            }
            self.stack.extend(children.into_iter().rev().map(Step::Enter));
            return Some(object);
        }
        None
    }
}

fn child_keys(value: &Value, out: &mut Vec<ObjectKey>) {
    match value {
        Value::Object(key) => out.push(*key),
        Value::List(items) => items.iter().for_each(|item| child_keys(item, out)),
        Value::Map(map) => map.values().for_each(|item| child_keys(item, out)),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Text(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use serde_json::json;
    use std::collections::HashSet;

    fn graph_with_cycle_and_shared_child() -> Result<ObjectGraph> {
        ObjectGraph::from_json(&json!({
            "id": "root",
            "speckle_type": "Base",
            "@elements": [
                {
                    "id": "a",
                    "speckle_type": "Base",
                    "child": { "referencedId": "shared" },
                    "parent": { "referencedId": "root" }
                },
                {
                    "id": "b",
                    "speckle_type": "Base",
                    "nested": { "deeper": [{ "referencedId": "shared" }] }
                }
            ],
            "shared": { "id": "shared", "speckle_type": "Base", "loop": { "referencedId": "a" } }
        }))
    }

    #[test]
    fn each_reachable_object_once() -> Result<()> {
        let graph = graph_with_cycle_and_shared_child()?;
        let ids: Vec<&str> = flatten(&graph, graph.roots()).map(ModelObject::id).collect();
        assert_eq!(ids.len(), 4);
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 4);
        Ok(())
    }

    #[test]
    fn duplicates_without_dedup_but_still_finite() -> Result<()> {
        let graph = graph_with_cycle_and_shared_child()?;
        let count = Flatten::new(&graph, graph.roots(), false).count();
        // "shared" is reachable through a, b and the root; cycles are cut.
        assert!(count > 4);
        assert!(count < 32);
        Ok(())
    }

    #[test]
    fn repeated_roots_are_deduplicated() -> Result<()> {
        let graph = graph_with_cycle_and_shared_child()?;
        let root = graph.roots()[0];
        assert_eq!(flatten(&graph, &[root, root]).count(), 4);
        Ok(())
    }
}
