//! Log tail: per-bot live log stream and its consumer-side buffer.
//!
//! Every stream message is one opaque text line, kept exactly as received;
//! the renderer adds the line break. The channel reconnects on a fixed delay
//! slightly longer than the status stream's.

pub mod buffer;

pub use buffer::{LogEvent, LogTail, LogUpdate, PaneCommand};

use crate::Result;
use crate::channel::{self, ChannelHandle, ChannelSpec, Connector};
use reqwest::Url;
use std::time::Duration;
use tokio::sync::mpsc;

pub const LOG_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Which log stream to tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Bot(String),
    /// The manager process's own log.
    Manager,
}

impl LogSource {
    fn segments(&self) -> Vec<&str> {
        match self {
            LogSource::Bot(id) => vec!["ws", "logs", id.as_str()],
            LogSource::Manager => vec!["ws", "manager", "logs"],
        }
    }
}

fn decode_line(text: &str) -> Option<String> {
    Some(text.to_string())
}

pub fn open<C: Connector>(
    connector: C,
    base: &Url,
    source: &LogSource,
) -> Result<(ChannelHandle, mpsc::Receiver<LogEvent>)> {
    let url = channel::stream_url(base, &source.segments())?;
    Ok(channel::spawn(
        connector,
        url,
        ChannelSpec {
            name: "logs",
            reconnect_delay: LOG_RECONNECT_DELAY,
            decode: decode_line,
        },
    ))
}
