use crate::Result;
use crate::api::{Action, ActionGate};
use crate::config::ConfigDocument;
use crate::settings::DashboardSettings;
use crate::status::EntitySnapshot;
use anyhow::{Context, anyhow, bail};
use reqwest::{Client, Method, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Lifecycle operations keyed by bot id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Start,
    Stop,
    Restart,
    Delete,
}

impl Lifecycle {
    fn action(self) -> Action {
        match self {
            Lifecycle::Start => Action::Start,
            Lifecycle::Stop => Action::Stop,
            Lifecycle::Restart => Action::Restart,
            Lifecycle::Delete => Action::Delete,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Created {
    pub id: String,
}

/// Client for the manager's one-shot REST endpoints. Failures are returned to
/// the caller as-is; nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
    gate: ActionGate,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            http: Client::new(),
            gate: ActionGate::default(),
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("base url {} cannot carry a path", self.base))?
            .clear()
            .extend(segments);
        url.set_query(None);
        Ok(url)
    }

    async fn send(&self, what: &str, req: reqwest::RequestBuilder) -> Result<Response> {
        let resp = req
            .send()
            .await
            .with_context(|| format!("{} request", what))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("{} failed ({}): {}", what, status, body.trim());
        }
        debug!(%status, "{what} ok");
        Ok(resp)
    }

    pub async fn list(&self) -> Result<Vec<EntitySnapshot>> {
        let url = self.endpoint(&["api", "bots"])?;
        self.send("list bots", self.http.get(url))
            .await?
            .json()
            .await
            .context("list bots decode")
    }

    pub async fn create(&self, name: &str) -> Result<Created> {
        let name = match name.trim() {
            "" => "Bot",
            trimmed => trimmed,
        };
        let _pending = self.gate.begin(Action::Create, name)?;
        let url = self.endpoint(&["api", "bots"])?;
        self.send("create", self.http.post(url).json(&CreateRequest { name }))
            .await?
            .json()
            .await
            .context("create decode")
    }

    pub async fn lifecycle(&self, op: Lifecycle, id: &str) -> Result<()> {
        let action = op.action();
        let _pending = self.gate.begin(action, id)?;
        let (method, url) = match op {
            Lifecycle::Delete => (Method::DELETE, self.endpoint(&["api", "bots", id])?),
            _ => (
                Method::POST,
                self.endpoint(&["api", "bots", id, &action.to_string()])?,
            ),
        };
        self.send(&format!("{} {}", action, id), self.http.request(method, url))
            .await?;
        Ok(())
    }

    pub async fn fetch_config(&self, id: &str) -> Result<ConfigDocument> {
        let url = self.endpoint(&["api", "bots", id, "config"])?;
        self.send(&format!("fetch config {}", id), self.http.get(url))
            .await?
            .json()
            .await
            .context("config decode")
    }

    pub async fn save_config(&self, id: &str, config: &Value) -> Result<()> {
        let _pending = self.gate.begin(Action::SaveConfig, id)?;
        let url = self.endpoint(&["api", "bots", id, "config"])?;
        self.send(&format!("save config {}", id), self.http.put(url).json(config))
            .await?;
        Ok(())
    }

    /// Whole log file of one bot.
    pub async fn log_text(&self, id: &str) -> Result<String> {
        let url = self.endpoint(&["api", "bots", id, "logs.txt"])?;
        self.send(&format!("read log {}", id), self.http.get(url))
            .await?
            .text()
            .await
            .context("log decode")
    }

    pub async fn fetch_settings(&self) -> Result<DashboardSettings> {
        let url = self.endpoint(&["api", "manager", "settings"])?;
        self.send("fetch settings", self.http.get(url))
            .await?
            .json()
            .await
            .context("settings decode")
    }

    pub async fn save_settings(&self, settings: &DashboardSettings) -> Result<()> {
        let _pending = self.gate.begin(Action::SaveSettings, "manager")?;
        let url = self.endpoint(&["api", "manager", "settings"])?;
        self.send("save settings", self.http.put(url).json(settings))
            .await?;
        Ok(())
    }
}
