use serde::{Deserialize, Serialize};
use std::fmt;

/// Run state of one managed bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityStatus {
    Running,
    Stopped,
    /// Any other status string; the text is the message.
    Error(String),
}

impl EntityStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, EntityStatus::Running)
    }
}

impl From<String> for EntityStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "running" => EntityStatus::Running,
            "stopped" => EntityStatus::Stopped,
            _ => EntityStatus::Error(s),
        }
    }
}

impl From<EntityStatus> for String {
    fn from(status: EntityStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityStatus::Running => f.write_str("running"),
            EntityStatus::Stopped => f.write_str("stopped"),
            EntityStatus::Error(msg) => f.write_str(msg),
        }
    }
}

/// Status record of one bot, as pushed on the status stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub status: EntityStatus,
    #[serde(rename = "pid", default)]
    pub process_id: Option<u32>,
    #[serde(rename = "cpu", default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_mb: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
}

impl EntitySnapshot {
    /// Name to show; falls back to the id for unnamed bots.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_wire_fields() {
        let snap: EntitySnapshot = serde_json::from_value(json!({
            "id": "bot_1",
            "name": "Ava",
            "status": "running",
            "pid": 4242,
            "cpu": 3.5,
            "memory_mb": 88.1,
            "started_at": "2025-01-02T03:04:05",
            "log": "/data/bot_1/bot.log"
        }))
        .expect("snapshot");

        assert_eq!(snap.status, EntityStatus::Running);
        assert_eq!(snap.process_id, Some(4242));
        assert_eq!(snap.cpu_percent, 3.5);
        assert_eq!(snap.memory_mb, 88.1);
    }

    #[test]
    fn unknown_status_is_an_error_message() {
        let snap: EntitySnapshot = serde_json::from_value(json!({
            "id": "bot_2",
            "status": "crashed: exit 1",
            "pid": null
        }))
        .expect("snapshot");

        assert_eq!(snap.status, EntityStatus::Error("crashed: exit 1".to_string()));
        assert_eq!(snap.process_id, None);
        assert_eq!(snap.display_name(), "bot_2");
        assert_eq!(serde_json::to_value(&snap.status).expect("json"), json!("crashed: exit 1"));
    }
}
