use crate::config::FieldPath;
use serde_json::Value;
use std::collections::BTreeMap;

/// Paths edited as `pattern = category` rule tables rather than as nested objects.
pub const DEFAULT_RULE_DICTS: &[&str] = &["fact_rules"];

/// Flat kind of a schema node, as seen by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
    Dict,
}

/// Element type of an `array` node. Only string elements get line editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    String,
    Other,
}

/// How an `object` node is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Non-empty set of scalar children (e.g. probability tables).
    ScalarGroup,
    /// Anything else; edited as a JSON literal when it is a leaf.
    GenericBlob,
    /// Pattern string -> category string table.
    RuleDict,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Boolean,
    Integer,
    Number,
    String,
    Array(ElementKind),
    Object {
        shape: ObjectKind,
        properties: BTreeMap<String, SchemaNode>,
    },
}

static FALLBACK: SchemaNode = SchemaNode::String;

static RULE_DICT: SchemaNode = SchemaNode::Object {
    shape: ObjectKind::RuleDict,
    properties: BTreeMap::new(),
};

impl SchemaNode {
    pub fn kind(&self) -> Kind {
        match self {
            SchemaNode::Boolean => Kind::Boolean,
            SchemaNode::Integer => Kind::Integer,
            SchemaNode::Number => Kind::Number,
            SchemaNode::String => Kind::String,
            SchemaNode::Array(_) => Kind::Array,
            SchemaNode::Object {
                shape: ObjectKind::RuleDict,
                ..
            } => Kind::Dict,
            SchemaNode::Object { .. } => Kind::Object,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            SchemaNode::Boolean | SchemaNode::Integer | SchemaNode::Number | SchemaNode::String
        )
    }

    pub fn object_kind(&self) -> Option<ObjectKind> {
        match self {
            SchemaNode::Object { shape, .. } => Some(*shape),
            _ => None,
        }
    }

    fn child(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Object { properties, .. } => properties.get(name),
            _ => None,
        }
    }

    /// Resolve a raw schema value. Never fails: unknown or missing `type`
    /// information resolves to `String`.
    fn resolve(raw: &Value, path: &FieldPath, rule_dicts: &[&str]) -> SchemaNode {
        let ty = raw.get("type").and_then(Value::as_str).unwrap_or("string");

        if !path.is_root() && rule_dicts.contains(&path.to_string().as_str()) {
            return SchemaNode::Object {
                shape: ObjectKind::RuleDict,
                properties: BTreeMap::new(),
            };
        }

        match ty {
            "boolean" => SchemaNode::Boolean,
            "integer" => SchemaNode::Integer,
            "number" => SchemaNode::Number,
            "array" => {
                let item_ty = raw
                    .get("items")
                    .and_then(|items| items.get("type"))
                    .and_then(Value::as_str);
                match item_ty {
                    Some("string") => SchemaNode::Array(ElementKind::String),
                    _ => SchemaNode::Array(ElementKind::Other),
                }
            }
            "object" => {
                let mut properties = BTreeMap::new();
                if let Some(props) = raw.get("properties").and_then(Value::as_object) {
                    for (name, sub) in props {
                        let child = SchemaNode::resolve(sub, &path.child(name), rule_dicts);
                        properties.insert(name.clone(), child);
                    }
                }
                let shape = if !properties.is_empty() && properties.values().all(|p| p.is_scalar())
                {
                    ObjectKind::ScalarGroup
                } else {
                    ObjectKind::GenericBlob
                };
                SchemaNode::Object { shape, properties }
            }
            _ => SchemaNode::String,
        }
    }
}

/// Resolved schema for one configuration document.
///
/// Rule-dict paths are kept next to the tree: they are rule tables whether or
/// not the schema mentions them.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaModel {
    root: SchemaNode,
    rule_dicts: Vec<FieldPath>,
}

impl SchemaModel {
    pub fn load(raw: &Value) -> Self {
        Self::load_with_rule_dicts(raw, DEFAULT_RULE_DICTS)
    }

    pub fn load_with_rule_dicts(raw: &Value, rule_dicts: &[&str]) -> Self {
        let root = match SchemaNode::resolve(raw, &FieldPath::root(), rule_dicts) {
            // The root always describes a mapping; anything else is unusable.
            root @ SchemaNode::Object { .. } => root,
            _ => empty_object(),
        };
        Self {
            root,
            rule_dicts: rule_dicts.iter().map(|p| FieldPath::parse(p)).collect(),
        }
    }

    /// Schema that describes nothing. Rule-dict paths still resolve to rule
    /// tables; every other path falls back to `String`.
    pub fn permissive() -> Self {
        Self {
            root: empty_object(),
            rule_dicts: DEFAULT_RULE_DICTS.iter().map(|p| FieldPath::parse(p)).collect(),
        }
    }

    /// Look up the node describing `path`. Paths the schema does not cover
    /// degrade to `String`.
    pub fn node_at(&self, path: &FieldPath) -> &SchemaNode {
        if self.rule_dicts.contains(path) {
            return &RULE_DICT;
        }

        let mut cur = &self.root;
        for seg in path.segments() {
            match cur.child(seg) {
                Some(next) => cur = next,
                None => return &FALLBACK,
            }
        }
        cur
    }
}

fn empty_object() -> SchemaNode {
    SchemaNode::Object {
        shape: ObjectKind::GenericBlob,
        properties: BTreeMap::new(),
    }
}
