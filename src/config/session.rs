use crate::Result;
use crate::config::{FlatField, flatten, reconstruct};
use crate::schema::SchemaModel;
use anyhow::bail;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Response body of the config fetch endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub schema: Option<Value>,
}

/// One edit cycle for one entity: the fetched value, its resolved schema and
/// the editable fields derived from them.
#[derive(Debug, Clone)]
pub struct EditSession {
    entity_id: String,
    base: Value,
    fields: Vec<FlatField>,
}

impl EditSession {
    pub fn open(entity_id: impl Into<String>, doc: ConfigDocument) -> Self {
        let base = match doc.config {
            Some(v @ Value::Object(_)) => v,
            _ => Value::Object(Map::new()),
        };
        let schema = doc
            .schema
            .as_ref()
            .map(SchemaModel::load)
            .unwrap_or_else(SchemaModel::permissive);
        let fields = flatten(&base, &schema);

        Self {
            entity_id: entity_id.into(),
            base,
            fields,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn fields(&self) -> &[FlatField] {
        &self.fields
    }

    pub fn field(&self, path: &str) -> Option<&FlatField> {
        self.fields.iter().find(|f| f.path().to_string() == path)
    }

    /// Replace the text of the field at `path`.
    pub fn set(&mut self, path: &str, input: impl Into<String>) -> Result<()> {
        match self.fields.iter_mut().find(|f| f.path().to_string() == path) {
            Some(field) => {
                field.set_input(input);
                Ok(())
            }
            None => bail!(
                "no editable field {} in config of {}",
                path,
                self.entity_id
            ),
        }
    }

    pub fn dirty_fields(&self) -> impl Iterator<Item = &FlatField> {
        self.fields.iter().filter(|f| f.is_dirty())
    }

    /// Value to hand to the save call.
    pub fn build(&self) -> Value {
        reconstruct(&self.base, &self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Kind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc() -> ConfigDocument {
        serde_json::from_value(json!({
            "config": {
                "persona": {"name": "Ava", "moods": ["calm", "playful"]},
                "active_hours": {"start_hour": 9, "end_hour": 23}
            },
            "schema": {
                "type": "object",
                "properties": {
                    "persona": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "moods": {"type": "array", "items": {"type": "string"}}
                        }
                    },
                    "active_hours": {
                        "type": "object",
                        "properties": {
                            "start_hour": {"type": "integer"},
                            "end_hour": {"type": "integer"}
                        }
                    }
                }
            }
        }))
        .expect("valid document")
    }

    #[test]
    fn edit_and_build() {
        let mut session = EditSession::open("bot_1", doc());
        session.set("persona.moods", "calm\nsleepy\n").expect("field");
        session.set("active_hours.end_hour", "21").expect("field");

        assert_eq!(
            session
                .dirty_fields()
                .map(|f| f.path().to_string())
                .collect::<Vec<_>>(),
            vec!["persona.moods", "active_hours.end_hour"]
        );
        assert_eq!(
            session.build(),
            json!({
                "persona": {"name": "Ava", "moods": ["calm", "sleepy"]},
                "active_hours": {"start_hour": 9, "end_hour": 21}
            })
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut session = EditSession::open("bot_1", doc());
        let err = session.set("persona.age", "3").unwrap_err();
        assert!(err.to_string().contains("persona.age"));
    }

    #[test]
    fn absent_parts_default_to_empty_and_permissive() {
        let doc: ConfigDocument = serde_json::from_value(json!({})).expect("doc");
        let session = EditSession::open("bot_2", doc);
        assert!(session.fields().is_empty());
        assert_eq!(session.build(), json!({}));
    }

    #[test]
    fn fact_rules_stay_one_field_without_schema() {
        let doc: ConfigDocument = serde_json::from_value(json!({
            "config": {"fact_rules": {"\\bmy name is\\s+(\\w+)": "name", "\\bi live in (.+)": "location"}}
        }))
        .expect("doc");
        let mut session = EditSession::open("bot_4", doc);

        assert_eq!(session.fields().len(), 1);
        let rules = session.field("fact_rules").expect("rule table field");
        assert_eq!(rules.schema().kind(), Kind::Dict);

        session
            .set("fact_rules", "\\bmy name is\\s+(\\w+) = name\n\\bi work at (.+) = job")
            .expect("field");
        assert_eq!(
            session.build(),
            json!({"fact_rules": {"\\bmy name is\\s+(\\w+)": "name", "\\bi work at (.+)": "job"}})
        );
    }

    #[test]
    fn config_without_schema_edits_as_strings() {
        let doc: ConfigDocument =
            serde_json::from_value(json!({"config": {"storage": {"db_file": "a.db"}}})).expect("doc");
        let mut session = EditSession::open("bot_3", doc);
        session.set("storage.db_file", "b.db").expect("field");
        assert_eq!(session.build(), json!({"storage": {"db_file": "b.db"}}));
    }
}
