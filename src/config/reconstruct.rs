use crate::config::{FieldPath, FlatField};
use crate::schema::{ElementKind, ObjectKind, SchemaNode};
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::LazyLock;

// "<pattern> = <category>"; the pattern is matched lazily so the first '='
// separates the two halves.
static RULE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*=\s*(.+)$").expect("rule line regex"));

/// Rebuild a configuration value from edited fields.
///
/// Starts from a deep copy of `base`, so keys that were never flattened
/// survive untouched. Coercion is lenient: bad input becomes a default value,
/// never an error.
pub fn reconstruct(base: &Value, fields: &[FlatField]) -> Value {
    let mut out = base.clone();
    for field in fields {
        set_path(&mut out, field.path(), coerce(field.schema(), field.input()));
    }
    out
}

/// Coerce editor text into a value for `schema`.
pub fn coerce(schema: &SchemaNode, input: &str) -> Value {
    match schema {
        SchemaNode::Boolean => Value::Bool(input.trim().eq_ignore_ascii_case("true")),
        SchemaNode::Integer | SchemaNode::Number => parse_number(input),
        SchemaNode::String => Value::String(input.to_string()),
        SchemaNode::Array(ElementKind::String) => Value::Array(
            input
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| Value::String(line.to_string()))
                .collect(),
        ),
        SchemaNode::Array(ElementKind::Other) => {
            parse_json_or(input, Value::Array(Vec::new()))
        }
        SchemaNode::Object {
            shape: ObjectKind::RuleDict,
            ..
        } => Value::Object(parse_rules(input)),
        SchemaNode::Object { .. } => parse_json_or(input, Value::Object(Map::new())),
    }
}

/// Parse newline-delimited `pattern = category` lines. Lines that do not
/// match the grammar are dropped.
pub fn parse_rules(text: &str) -> Map<String, Value> {
    let mut rules = Map::new();
    for line in text.lines() {
        let Some(caps) = RULE_LINE_RE.captures(line.trim()) else {
            continue;
        };
        let pattern = caps[1].trim();
        let category = caps[2].trim();
        if pattern.is_empty() || category.is_empty() {
            continue;
        }
        rules.insert(pattern.to_string(), Value::String(category.to_string()));
    }
    rules
}

fn parse_number(input: &str) -> Value {
    let text = input.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Value::from(i);
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0))
}

fn parse_json_or(input: &str, fallback: Value) -> Value {
    if input.trim().is_empty() {
        return fallback;
    }
    serde_json::from_str(input).unwrap_or(fallback)
}

/// Write `value` at `path`, creating intermediate mappings as needed.
pub fn set_path(root: &mut Value, path: &FieldPath, value: Value) {
    let Some((last, parents)) = path.segments().split_last() else {
        *root = value;
        return;
    };

    let mut cur = root;
    for seg in parents {
        cur = object_mut(cur)
            .entry(seg.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    object_mut(cur).insert(last.clone(), value);
}

fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::flatten;
    use crate::schema::SchemaModel;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> SchemaModel {
        SchemaModel::load(&json!({
            "type": "object",
            "properties": {
                "discord_user_token": {"type": "string"},
                "channel_ids": {"type": "array", "items": {"type": "string"}},
                "mirror": {
                    "type": "object",
                    "properties": {
                        "enable": {"type": "boolean"},
                        "weight_emoji": {"type": "number"}
                    }
                },
                "reply": {
                    "type": "object",
                    "properties": {
                        "max_reply_chars": {"type": "integer"},
                        "min_delay_sec": {"type": "number"},
                        "public_probs": {
                            "type": "object",
                            "properties": {
                                "stranger": {"type": "number"},
                                "acquaintance": {"type": "number"},
                                "friend": {"type": "number"},
                                "bestfriend": {"type": "number"}
                            }
                        }
                    }
                },
                "fact_rules": {"type": "object", "properties": {}},
                "extra": {"type": "object"}
            }
        }))
    }

    fn sample() -> Value {
        json!({
            "discord_user_token": "tok",
            "channel_ids": ["111", "222"],
            "mirror": {"enable": true, "weight_emoji": 0.5},
            "reply": {
                "max_reply_chars": 280,
                "min_delay_sec": 2.0,
                "public_probs": {"stranger": 0.05, "acquaintance": 0.2, "friend": 0.5, "bestfriend": 0.9}
            },
            "fact_rules": {
                "\\bmy name is\\s+([a-zA-Z]+)": "name",
                "\\bi am from\\s+([a-zA-Z]+)": "location"
            }
        })
    }

    fn edit(fields: &mut [FlatField], path: &str, input: &str) {
        let field = fields
            .iter_mut()
            .find(|f| f.path().to_string() == path)
            .expect("field exists");
        field.set_input(input);
    }

    #[test]
    fn unedited_fields_round_trip() {
        let value = sample();
        let fields = flatten(&value, &schema());
        assert_eq!(reconstruct(&value, &fields), value);
    }

    #[test]
    fn reconstruct_is_idempotent() {
        let value = sample();
        let mut fields = flatten(&value, &schema());
        edit(&mut fields, "reply.max_reply_chars", "120");
        edit(&mut fields, "channel_ids", " 9 \n\n8");

        let once = reconstruct(&value, &fields);
        let twice = reconstruct(&once, &fields);
        assert_eq!(once, twice);
        assert_eq!(once["channel_ids"], json!(["9", "8"]));
    }

    #[test]
    fn edits_are_coerced_by_kind() {
        let value = sample();
        let mut fields = flatten(&value, &schema());
        edit(&mut fields, "mirror.enable", "TRUE");
        edit(&mut fields, "mirror.weight_emoji", "not a number");
        edit(&mut fields, "reply.max_reply_chars", "");
        edit(&mut fields, "reply.min_delay_sec", "1.5");
        edit(&mut fields, "reply.public_probs.friend", "0.75");

        let out = reconstruct(&value, &fields);
        assert_eq!(out["mirror"], json!({"enable": true, "weight_emoji": 0}));
        assert_eq!(out["reply"]["max_reply_chars"], json!(0));
        assert_eq!(out["reply"]["min_delay_sec"], json!(1.5));
        assert_eq!(
            out["reply"]["public_probs"],
            json!({"stranger": 0.05, "acquaintance": 0.2, "friend": 0.75, "bestfriend": 0.9})
        );
    }

    #[test]
    fn boolean_accepts_only_true_literal() {
        assert_eq!(coerce(&SchemaNode::Boolean, "True"), json!(true));
        assert_eq!(coerce(&SchemaNode::Boolean, "yes"), json!(false));
        assert_eq!(coerce(&SchemaNode::Boolean, ""), json!(false));
    }

    #[test]
    fn rule_lines_are_parsed_leniently() {
        let rules = parse_rules(
            "\\bmy name is\\s+(\\w+) = name\nnot a rule\n\n  \\bi like (\\w+)=hobby  \n= orphan",
        );
        assert_eq!(
            Value::Object(rules),
            json!({"\\bmy name is\\s+(\\w+)": "name", "\\bi like (\\w+)": "hobby"})
        );
    }

    #[test]
    fn rule_dict_without_valid_lines_is_empty() {
        let value = sample();
        let mut fields = flatten(&value, &schema());
        edit(&mut fields, "fact_rules", "garbage\nmore garbage");
        assert_eq!(reconstruct(&value, &fields)["fact_rules"], json!({}));
    }

    #[test]
    fn empty_string_array_round_trips() {
        let value = json!({"channel_ids": []});
        let fields = flatten(&value, &schema());
        assert_eq!(fields[0].input(), "");
        assert_eq!(reconstruct(&value, &fields), value);
    }

    #[test]
    fn unknown_key_round_trips_as_string() {
        let value = json!({"storage": {"db_file": "bot.db"}});
        let fields = flatten(&value, &schema());
        assert_eq!(reconstruct(&value, &fields), value);
    }

    #[test]
    fn generic_object_leaf_parses_json_or_empties() {
        let value = json!({"extra": "raw"});
        let mut fields = flatten(&value, &schema());
        assert_eq!(fields[0].input(), "\"raw\"");

        edit(&mut fields, "extra", "{\"a\": [1, 2]}");
        assert_eq!(reconstruct(&value, &fields)["extra"], json!({"a": [1, 2]}));

        edit(&mut fields, "extra", "{oops");
        assert_eq!(reconstruct(&value, &fields)["extra"], json!({}));
    }

    #[test]
    fn set_path_creates_intermediate_mappings() {
        let mut root = json!({"reply": "flat"});
        set_path(&mut root, &FieldPath::parse("a.b.c"), json!(1));
        set_path(&mut root, &FieldPath::parse("reply.max_reply_chars"), json!(5));
        assert_eq!(
            root,
            json!({"reply": {"max_reply_chars": 5}, "a": {"b": {"c": 1}}})
        );
    }

    #[test]
    fn keys_not_flattened_survive() {
        let base = json!({"schedules": [{"name": "nightly", "cron": "0 3 * * *"}], "persona": {"name": "Ava"}});
        let fields = flatten(&json!({"persona": {"name": "Bea"}}), &schema());
        let out = reconstruct(&base, &fields);
        assert_eq!(out["schedules"], base["schedules"]);
        assert_eq!(out["persona"]["name"], json!("Bea"));
    }
}
