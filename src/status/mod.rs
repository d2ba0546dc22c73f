//! Fleet status: snapshot records, the fleet cache and the status stream.
//!
//! The stream at `/ws/status` pushes the complete snapshot list on every
//! message; nothing is merged client side.

pub mod fleet;
pub mod snapshot;

pub use fleet::{DetailView, Fleet, StatusEvent};
pub use snapshot::{EntitySnapshot, EntityStatus};

use crate::Result;
use crate::channel::{self, ChannelHandle, ChannelSpec, Connector};
use reqwest::Url;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

pub const STATUS_RECONNECT_DELAY: Duration = Duration::from_millis(1500);

/// Parse one status message. Malformed payloads are logged and dropped.
pub fn decode_snapshots(text: &str) -> Option<Vec<EntitySnapshot>> {
    match serde_json::from_str(text) {
        Ok(list) => Some(list),
        Err(err) => {
            warn!("dropping malformed status message: {err}");
            None
        }
    }
}

pub fn open<C: Connector>(
    connector: C,
    base: &Url,
) -> Result<(ChannelHandle, mpsc::Receiver<StatusEvent>)> {
    let url = channel::stream_url(base, &["ws", "status"])?;
    Ok(channel::spawn(
        connector,
        url,
        ChannelSpec {
            name: "status",
            reconnect_delay: STATUS_RECONNECT_DELAY,
            decode: decode_snapshots,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelState;
    use crate::channel::testing::{ScriptedConnector, text};
    use pretty_assertions::assert_eq;

    const M1: &str = r#"[{"id":"a","name":"Ava","status":"stopped","pid":null,"cpu":0.0,"memory_mb":0.0}]"#;
    const M2: &str = r#"[{"id":"a","name":"Ava","status":"running","pid":42,"cpu":1.5,"memory_mb":64.0}]"#;
    const M3: &str = r#"[{"id":"b","name":"Bo","status":"running","pid":7,"cpu":0.1,"memory_mb":12.0}]"#;

    #[test]
    fn malformed_payload_is_dropped() {
        assert!(decode_snapshots("{not json").is_none());
        assert!(decode_snapshots(r#"{"id":"a"}"#).is_none());
        assert_eq!(decode_snapshots("[]"), Some(vec![]));
    }

    #[tokio::test(start_paused = true)]
    async fn detail_view_tracks_stream_across_reconnects() {
        let base = Url::parse("http://127.0.0.1:8080").expect("url");
        let connector = ScriptedConnector::new(vec![text(&[M1, "garbage"]), text(&[M2, M3])]);
        let (_handle, mut rx) = open(connector, &base).expect("open");

        let mut fleet = Fleet::default();
        let mut view = DetailView::new("a");
        let mut seen = Vec::new();

        while let Some(event) = rx.recv().await {
            fleet.apply(event);
            if fleet.has_data() {
                view.observe(fleet.entities());
            }
            if let Some(current) = view.current() {
                seen.push((current.status.to_string(), current.process_id));
            }
            // Second session delivered M2 then M3; the view must stay on M2.
            if fleet.entities().iter().any(|e| e.id == "b") {
                break;
            }
        }

        assert_eq!(seen.first(), Some(&("stopped".to_string(), None)));
        assert_eq!(seen.last(), Some(&("running".to_string(), Some(42))));
        assert_eq!(fleet.state(), ChannelState::Open);
        assert_eq!(view.current().map(|s| s.cpu_percent), Some(1.5));
    }
}
