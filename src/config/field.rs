use crate::config::FieldPath;
use crate::schema::{ElementKind, ObjectKind, SchemaNode};
use serde_json::Value;

/// One editable unit of a flattened configuration.
///
/// `path` and `schema` are fixed at creation; the view may only replace the
/// text `input`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField {
    path: FieldPath,
    schema: SchemaNode,
    group: Option<FieldPath>,
    value: Value,
    input: String,
}

impl FlatField {
    pub(crate) fn new(
        path: FieldPath,
        schema: SchemaNode,
        group: Option<FieldPath>,
        value: Value,
    ) -> Self {
        let input = render_input(&schema, &value);
        Self {
            path,
            schema,
            group,
            value,
            input,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Scalar group this field belongs to, if any (e.g. `reply.public_probs`).
    pub fn group(&self) -> Option<&FieldPath> {
        self.group.as_ref()
    }

    /// Value the field was flattened from.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Current editable text.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_dirty(&self) -> bool {
        self.input != render_input(&self.schema, &self.value)
    }
}

/// Text shown in the editing control for `value` under `schema`.
pub(crate) fn render_input(schema: &SchemaNode, value: &Value) -> String {
    match schema {
        SchemaNode::Boolean => match value {
            Value::Bool(b) => b.to_string(),
            Value::Null => "false".to_string(),
            other => scalar_text(other),
        },
        SchemaNode::Integer | SchemaNode::Number => match value {
            Value::Null => "0".to_string(),
            other => scalar_text(other),
        },
        SchemaNode::String => scalar_text(value),
        SchemaNode::Array(ElementKind::String) => match value {
            Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Null => String::new(),
            other => scalar_text(other),
        },
        SchemaNode::Object {
            shape: ObjectKind::RuleDict,
            ..
        } => match value {
            Value::Object(rules) => rules
                .iter()
                .map(|(pattern, category)| format!("{} = {}", pattern, scalar_text(category)))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        },
        SchemaNode::Array(ElementKind::Other) => json_text(value, Value::Array(Vec::new())),
        SchemaNode::Object { .. } => json_text(value, Value::Object(Default::default())),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_text(value: &Value, empty: Value) -> String {
    let value = if value.is_null() { &empty } else { value };
    serde_json::to_string_pretty(value).unwrap_or_default()
}
