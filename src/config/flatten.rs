use crate::config::{FieldPath, FlatField};
use crate::schema::{ObjectKind, SchemaModel};
use serde_json::{Map, Value};

/// Flatten a configuration value into editable fields.
///
/// Depth-first, in the property order of `value`:
/// - nested mappings are recursed into (they are not editable themselves),
///   unless the schema marks the path as a rule dict
/// - a rule dict becomes exactly one field holding the whole table
/// - children of a scalar-group object are tagged with the group path
/// - everything else becomes one leaf field
pub fn flatten(value: &Value, schema: &SchemaModel) -> Vec<FlatField> {
    let mut out = Vec::new();
    if let Value::Object(map) = value {
        walk(map, &FieldPath::root(), None, schema, &mut out);
    }
    out
}

fn walk(
    map: &Map<String, Value>,
    prefix: &FieldPath,
    group: Option<&FieldPath>,
    schema: &SchemaModel,
    out: &mut Vec<FlatField>,
) {
    for (key, value) in map {
        let path = prefix.child(key);
        let node = schema.node_at(&path);

        match (value, node.object_kind()) {
            (_, Some(ObjectKind::RuleDict)) => {
                out.push(FlatField::new(path, node.clone(), None, value.clone()));
            }
            (Value::Object(children), shape) => {
                let child_group = (shape == Some(ObjectKind::ScalarGroup)).then(|| path.clone());
                walk(children, &path, child_group.as_ref(), schema, out);
            }
            _ => {
                out.push(FlatField::new(
                    path,
                    node.clone(),
                    group.cloned(),
                    value.clone(),
                ));
            }
        }
    }
}
