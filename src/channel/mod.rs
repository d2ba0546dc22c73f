//! Live stream channels with a fixed-delay reconnect loop.
//!
//! A channel is one spawned task that owns its transport, its reconnect timer
//! and nothing else. It reports lifecycle changes and decoded messages to a
//! single consumer (the render loop) over a bounded mpsc queue:
//!
//!   Disconnected -> Connecting -> Open -> Disconnected -> (delay) -> Connecting ...
//!
//! Transport failures never leave the task; they are logged and retried
//! forever. The task stops when its handle is dropped or its receiver goes
//! away.

pub mod ws;

pub use ws::WsConnector;

use crate::Result;
use anyhow::anyhow;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::Url;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Queue depth between a channel task and the render loop.
const EVENT_BUFFER: usize = 256;

/// Inbound text frames of one open connection.
pub type FrameStream = BoxStream<'static, Result<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent<T> {
    State(ChannelState),
    Message(T),
}

/// Opens a transport to a stream URL.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self, url: &Url) -> impl Future<Output = Result<FrameStream>> + Send;
}

/// Owns a running channel task. Dropping it tears the channel down.
#[derive(Debug)]
pub struct ChannelHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl ChannelHandle {
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        debug!(channel = self.name, "closing channel");
        self.task.abort();
    }
}

/// Static description of one channel kind.
pub struct ChannelSpec<T> {
    pub name: &'static str,
    pub reconnect_delay: Duration,
    /// Turns one inbound frame into a message; `None` drops the frame.
    pub decode: fn(&str) -> Option<T>,
}

pub fn spawn<C, T>(
    connector: C,
    url: Url,
    spec: ChannelSpec<T>,
) -> (ChannelHandle, mpsc::Receiver<ChannelEvent<T>>)
where
    C: Connector,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let name = spec.name;
    let task = tokio::spawn(run(connector, url, spec, tx));
    (ChannelHandle { name, task }, rx)
}

async fn run<C, T>(connector: C, url: Url, spec: ChannelSpec<T>, tx: mpsc::Sender<ChannelEvent<T>>)
where
    C: Connector,
    T: Send + 'static,
{
    loop {
        if tx
            .send(ChannelEvent::State(ChannelState::Connecting))
            .await
            .is_err()
        {
            return;
        }

        match connector.connect(&url).await {
            Ok(mut frames) => {
                if tx
                    .send(ChannelEvent::State(ChannelState::Open))
                    .await
                    .is_err()
                {
                    return;
                }
                while let Some(frame) = frames.next().await {
                    match frame {
                        Ok(text) => {
                            let Some(msg) = (spec.decode)(&text) else {
                                continue;
                            };
                            if tx.send(ChannelEvent::Message(msg)).await.is_err() {
                                return;
                            }
                        }
                        Err(err) => {
                            warn!(channel = spec.name, %url, "stream error: {err:#}");
                            break;
                        }
                    }
                }
                debug!(channel = spec.name, %url, "stream closed");
            }
            Err(err) => {
                warn!(channel = spec.name, %url, "connect failed: {err:#}");
            }
        }

        if tx
            .send(ChannelEvent::State(ChannelState::Disconnected))
            .await
            .is_err()
        {
            return;
        }
        tokio::time::sleep(spec.reconnect_delay).await;
    }
}

/// Derive the stream URL for `path` from the HTTP base URL.
pub fn stream_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    let scheme = match base.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|_| anyhow!("cannot derive a stream url from {}", base))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("base url {} cannot carry a path", base))?
        .clear()
        .extend(segments);
    url.set_query(None);
    Ok(url)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use futures_util::stream;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// What the scripted transport does on one connect attempt.
    pub enum Session {
        Refuse,
        /// Deliver these frames, then close.
        Frames(Vec<Result<String>>),
    }

    /// In-memory connector replaying scripted sessions. Once the script is
    /// exhausted, connections open and stay silent.
    #[derive(Clone, Default)]
    pub struct ScriptedConnector {
        script: Arc<Mutex<VecDeque<Session>>>,
        attempts: Arc<AtomicUsize>,
    }

    impl ScriptedConnector {
        pub fn new(sessions: Vec<Session>) -> Self {
            Self {
                script: Arc::new(Mutex::new(sessions.into())),
                attempts: Arc::default(),
            }
        }

        pub fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl Connector for ScriptedConnector {
        async fn connect(&self, _url: &Url) -> Result<FrameStream> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().expect("script lock").pop_front();
            match next {
                Some(Session::Refuse) => Err(anyhow!("connection refused")),
                Some(Session::Frames(frames)) => Ok(stream::iter(frames).boxed()),
                None => Ok(stream::pending().boxed()),
            }
        }
    }

    pub fn text(lines: &[&str]) -> Session {
        Session::Frames(lines.iter().map(|l| Ok(l.to_string())).collect())
    }
}
