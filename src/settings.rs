//! Dashboard settings (`/api/manager/settings`).
//!
//! Three fixed groups, read and written wholesale. Absent groups and keys
//! fall back to the defaults below.

use crate::Result;
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub logs: LogSettings,
    #[serde(default)]
    pub web: WebSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub theme: String,
    /// Milliseconds.
    pub refresh_interval: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            refresh_interval: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub max_lines: usize,
    pub auto_scroll: bool,
    pub buffer_size: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            max_lines: 1000,
            auto_scroll: true,
            buffer_size: 8192,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSettings {
    pub host: String,
    pub port: u16,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl DashboardSettings {
    /// Apply one `group.key=value` assignment.
    pub fn assign(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "ui.theme" => self.ui.theme = value.to_string(),
            "ui.refresh_interval" => self.ui.refresh_interval = parse(key, value)?,
            "logs.max_lines" => self.logs.max_lines = parse(key, value)?,
            "logs.auto_scroll" => self.logs.auto_scroll = value.eq_ignore_ascii_case("true"),
            "logs.buffer_size" => self.logs.buffer_size = parse(key, value)?,
            "web.host" => self.web.host = value.to_string(),
            "web.port" => self.web.port = parse(key, value)?,
            _ => bail!("unknown setting {}", key),
        }
        Ok(())
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("bad value for {}: {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn absent_groups_use_defaults() {
        let s: DashboardSettings = serde_json::from_value(json!({})).expect("settings");
        assert_eq!(s, DashboardSettings::default());
        assert_eq!(s.ui.theme, "dark");
        assert_eq!(s.ui.refresh_interval, 2000);
        assert_eq!(s.logs.max_lines, 1000);
        assert!(s.logs.auto_scroll);
        assert_eq!(s.logs.buffer_size, 8192);
        assert_eq!(s.web.host, "0.0.0.0");
        assert_eq!(s.web.port, 8080);
    }

    #[test]
    fn partial_groups_keep_other_defaults() {
        let s: DashboardSettings =
            serde_json::from_value(json!({"logs": {"max_lines": 50}, "web": {"port": 9000}}))
                .expect("settings");
        assert_eq!(s.logs.max_lines, 50);
        assert!(s.logs.auto_scroll);
        assert_eq!(s.web.port, 9000);
        assert_eq!(s.web.host, "0.0.0.0");
    }

    #[test]
    fn assignments() {
        let mut s = DashboardSettings::default();
        s.assign("ui.theme", "light").expect("theme");
        s.assign("logs.auto_scroll", "false").expect("auto_scroll");
        s.assign("web.port", " 8081 ").expect("port");
        assert_eq!(s.ui.theme, "light");
        assert!(!s.logs.auto_scroll);
        assert_eq!(s.web.port, 8081);

        assert!(s.assign("web.port", "eighty").is_err());
        assert!(s.assign("ui.font", "mono").is_err());
    }
}
