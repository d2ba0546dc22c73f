use crate::Result;
use crate::channel::{Connector, FrameStream};
use anyhow::Context;
use futures_util::StreamExt;
use reqwest::Url;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// WebSocket transport. Only inbound text is of interest; the console never
/// writes to a stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    async fn connect(&self, url: &Url) -> Result<FrameStream> {
        let (ws, _response) = connect_async(url.as_str())
            .await
            .with_context(|| format!("connect {}", url))?;

        let frames = ws.filter_map(|msg| async move {
            match msg {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(Message::Binary(bytes)) => Some(Ok(String::from_utf8_lossy(&bytes).into_owned())),
                // Ping/pong are answered by tungstenite; close ends the stream.
                Ok(_) => None,
                Err(err) => Some(Err(anyhow::Error::from(err).context("websocket read"))),
            }
        });
        Ok(frames.boxed())
    }
}
